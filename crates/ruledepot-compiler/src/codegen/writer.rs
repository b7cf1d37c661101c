//! Output buffer for DRL text

use std::fmt::{self, Display};

/// Marker that opens a structured line in a DSL-enhanced rule
pub const DSL_MARKER: char = '>';

/// Accumulates rendered DRL
///
/// The writer never adds whitespace of its own. Callers supply every
/// separator so the output is byte-for-byte predictable.
#[derive(Debug, Default, Clone)]
pub struct DrlWriter {
    buf: String,
}

impl DrlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw text
    pub fn push(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    pub fn push_char(&mut self, c: char) -> &mut Self {
        self.buf.push(c);
        self
    }

    /// Append a value through its `Display` impl
    pub fn push_display(&mut self, value: impl Display) -> &mut Self {
        use std::fmt::Write;
        // Writing into a String cannot fail
        let _ = write!(self.buf, "{}", value);
        self
    }

    /// Append `text` followed by a newline
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self.buf.push('\n');
        self
    }

    /// Start a structured line: indentation, then `>` when DSL-enhanced
    pub fn begin_line(&mut self, indentation: &str, dsl_enhanced: bool) -> &mut Self {
        self.buf.push_str(indentation);
        if dsl_enhanced {
            self.buf.push(DSL_MARKER);
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Display for DrlWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}
