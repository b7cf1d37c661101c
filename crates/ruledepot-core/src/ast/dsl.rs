//! Free-form lines and DSL sentences
//!
//! Both node kinds can appear on either side of a rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw text passed through to the generated source unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeFormLine {
    pub text: String,
}

impl FreeFormLine {
    pub fn new(text: impl Into<String>) -> Self {
        FreeFormLine { text: text.into() }
    }
}

/// A DSL sentence with `{placeholder}` values filled in
///
/// A placeholder may carry a constraint after a colon (`{value:ENUM:Type.field}`);
/// only the part before the first colon is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DslSentence {
    pub sentence: String,
}

impl DslSentence {
    pub fn new(sentence: impl Into<String>) -> Self {
        DslSentence {
            sentence: sentence.into(),
        }
    }
}

impl fmt::Display for DslSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = String::with_capacity(self.sentence.len());
        let mut in_placeholder = false;
        let mut past_colon = false;

        for c in self.sentence.chars() {
            match c {
                '{' => {
                    in_placeholder = true;
                    past_colon = false;
                }
                '}' => in_placeholder = false,
                ':' if in_placeholder => past_colon = true,
                _ if in_placeholder && past_colon => {}
                _ => rendered.push(c),
            }
        }

        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dsl_sentence_strips_braces() {
        let sentence = DslSentence::new("There is a customer named {Bob}");
        assert_eq!(sentence.to_string(), "There is a customer named Bob");
    }

    #[test]
    fn test_dsl_sentence_drops_placeholder_constraint() {
        let sentence = DslSentence::new("Status is {active:ENUM:Account.status}");
        assert_eq!(sentence.to_string(), "Status is active");
    }

    #[test]
    fn test_dsl_sentence_keeps_colons_outside_placeholders() {
        let sentence = DslSentence::new("Log: {msg}");
        assert_eq!(sentence.to_string(), "Log: msg");
    }
}
