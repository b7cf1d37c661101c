//! RHS action rendering

use super::writer::DrlWriter;
use crate::error::{MarshalError, Result};
use ruledepot_core::ast::{
    ActionCallMethod, ActionFieldValue, ActionGlobalCollectionAdd, ActionInsertFact,
    ActionRetractFact, ActionSetField, ActionVisitor, DslSentence, FieldNature, FreeFormLine,
};

/// Renders RHS actions into a [`DrlWriter`]
///
/// Inserts that need a variable but have no bound name get a synthesized
/// `factN` name. The counter starts at zero for every renderer.
pub struct RhsActionRenderer<'a> {
    out: &'a mut DrlWriter,
    dsl_enhanced: bool,
    indentation: String,
    fact_index: usize,
}

impl<'a> RhsActionRenderer<'a> {
    pub fn new(out: &'a mut DrlWriter, dsl_enhanced: bool, indentation: impl Into<String>) -> Self {
        RhsActionRenderer {
            out,
            dsl_enhanced,
            indentation: indentation.into(),
            fact_index: 0,
        }
    }

    fn begin_line(&mut self) {
        self.out.begin_line(&self.indentation, self.dsl_enhanced);
    }

    fn render_insert(&mut self, action: &ActionInsertFact, logical: bool) {
        let call = if logical { "insertLogical" } else { "insert" };

        if action.field_values.is_empty() && action.bound_name.is_none() {
            self.begin_line();
            self.out
                .push(call)
                .push("( new ")
                .push(&action.fact_type)
                .push("() );\n");
            return;
        }

        let variable = match &action.bound_name {
            Some(name) => name.clone(),
            None => {
                let name = format!("fact{}", self.fact_index);
                self.fact_index += 1;
                name
            }
        };

        self.begin_line();
        self.out
            .push(&action.fact_type)
            .push(" ")
            .push(&variable)
            .push(" = new ")
            .push(&action.fact_type)
            .push("();\n");
        self.render_setters(&variable, &action.field_values);
        self.begin_line();
        self.out.push(call).push("(").push(&variable).push(" );\n");
    }

    fn render_setters(&mut self, variable: &str, values: &[ActionFieldValue]) {
        for value in values {
            self.begin_line();
            self.out.push(variable);
            if value.function {
                self.out.push(".").push(&value.field);
            } else {
                self.out.push(".set").push(&capitalize(&value.field));
            }
            self.out.push("( ");
            self.render_field_value(value);
            self.out.push(" );\n");
        }
    }

    fn render_field_value(&mut self, value: &ActionFieldValue) {
        if value.is_formula() {
            let formula = value.value.trim_start();
            self.out.push(formula.strip_prefix('=').unwrap_or(formula));
        } else if value.nature == FieldNature::Template {
            self.out.push("@{").push(&value.value).push("}");
        } else if value.field_type == ActionFieldValue::TYPE_STRING {
            self.out.push("\"").push(&value.value).push("\"");
        } else {
            self.out.push(&value.value);
        }
    }
}

/// Upper-case the first character, as in a bean setter name
fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ActionVisitor for RhsActionRenderer<'_> {
    type Error = MarshalError;

    fn visit_insert_fact(&mut self, action: &ActionInsertFact) -> Result<()> {
        self.render_insert(action, false);
        Ok(())
    }

    fn visit_insert_logical_fact(&mut self, action: &ActionInsertFact) -> Result<()> {
        self.render_insert(action, true);
        Ok(())
    }

    fn visit_set_field(&mut self, action: &ActionSetField) -> Result<()> {
        self.render_setters(&action.variable, &action.field_values);
        Ok(())
    }

    fn visit_call_method(&mut self, action: &ActionCallMethod) -> Result<()> {
        self.begin_line();
        self.out
            .push(&action.variable)
            .push(".")
            .push(&action.method_name)
            .push("(");
        for (i, argument) in action.arguments.iter().enumerate() {
            if i > 0 {
                self.out.push(",");
            }
            self.out.push(&argument.value);
        }
        self.out.push(" );\n");
        Ok(())
    }

    fn visit_update_field(&mut self, action: &ActionSetField) -> Result<()> {
        self.visit_set_field(action)?;
        self.begin_line();
        self.out.push("update( ").push(&action.variable).push(" );\n");
        Ok(())
    }

    fn visit_retract_fact(&mut self, action: &ActionRetractFact) -> Result<()> {
        self.begin_line();
        self.out.push("retract( ").push(&action.variable).push(" );\n");
        Ok(())
    }

    fn visit_global_collection_add(&mut self, action: &ActionGlobalCollectionAdd) -> Result<()> {
        self.begin_line();
        self.out
            .push(&action.global_name)
            .push(".add(")
            .push(&action.fact_name)
            .push(");\n");
        Ok(())
    }

    fn visit_free_form_line(&mut self, line: &FreeFormLine) -> Result<()> {
        self.begin_line();
        self.out.line(&line.text);
        Ok(())
    }

    fn visit_dsl_sentence(&mut self, sentence: &DslSentence) -> Result<()> {
        self.out.push(&self.indentation).push_display(sentence).push("\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruledepot_core::ast::Action;

    fn render(actions: Vec<Action>) -> String {
        let mut out = DrlWriter::new();
        let mut renderer = RhsActionRenderer::new(&mut out, false, "\t\t");
        for action in &actions {
            action.accept(&mut renderer).unwrap();
        }
        out.into_string()
    }

    #[test]
    fn test_insert_without_fields() {
        let out = render(vec![
            ActionInsertFact::new("Alert").insert(),
            ActionInsertFact::new("Alert").insert_logical(),
        ]);
        assert_eq!(
            out,
            "\t\tinsert( new Alert() );\n\t\tinsertLogical( new Alert() );\n"
        );
    }

    #[test]
    fn test_insert_synthesizes_fact_names() {
        let field = ActionFieldValue::new("message", "hi", ActionFieldValue::TYPE_STRING);
        let out = render(vec![
            ActionInsertFact::new("Alert")
                .with_field_value(field.clone())
                .insert(),
            ActionInsertFact::new("Alert")
                .bound_to("$a")
                .with_field_value(field.clone())
                .insert(),
            ActionInsertFact::new("Log").with_field_value(field).insert_logical(),
        ]);
        let expected = "\t\tAlert fact0 = new Alert();\n\
                        \t\tfact0.setMessage( \"hi\" );\n\
                        \t\tinsert(fact0 );\n\
                        \t\tAlert $a = new Alert();\n\
                        \t\t$a.setMessage( \"hi\" );\n\
                        \t\tinsert($a );\n\
                        \t\tLog fact1 = new Log();\n\
                        \t\tfact1.setMessage( \"hi\" );\n\
                        \t\tinsertLogical(fact1 );\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_set_field_value_kinds() {
        let out = render(vec![ActionSetField::new("$p")
            .with_field_value(ActionFieldValue::new("age", "42", "Integer"))
            .with_field_value(ActionFieldValue::new("name", "=$n", "String"))
            .with_field_value(
                ActionFieldValue::new("city", "town", "String").with_nature(FieldNature::Template),
            )
            .set()]);
        let expected = "\t\t$p.setAge( 42 );\n\
                        \t\t$p.setName( $n );\n\
                        \t\t$p.setCity( @{town} );\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_update_field() {
        let out = render(vec![ActionSetField::new("$p")
            .with_field_value(ActionFieldValue::function("addItem", "$i", "Item"))
            .update()]);
        assert_eq!(out, "\t\t$p.addItem( $i );\n\t\tupdate( $p );\n");
    }

    #[test]
    fn test_call_method_retract_and_global() {
        let out = render(vec![
            ActionCallMethod::new("$p", "doIt")
                .with_argument(ActionFieldValue::new("a", "1", "Integer"))
                .with_argument(ActionFieldValue::new("b", "2", "Integer"))
                .into(),
            ActionRetractFact::new("$p").into(),
            ActionGlobalCollectionAdd::new("results", "$p").into(),
        ]);
        let expected = "\t\t$p.doIt(1,2 );\n\
                        \t\tretract( $p );\n\
                        \t\tresults.add($p);\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("name"), "Name");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclair"), "Éclair");
    }
}
