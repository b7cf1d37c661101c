//! Rule renderer
//!
//! Renders a whole [`RuleModel`] to DRL: header, metadata, attributes, the
//! `when` section and the `then` section.

use super::action_codegen::RhsActionRenderer;
use super::pattern_codegen::LhsPatternRenderer;
use super::writer::DrlWriter;
use crate::error::Result;
use ruledepot_core::ast::{RuleAttribute, RuleModel};

const SECTION_INDENT: &str = "\t\t";
const NEGATED_INDENT: &str = "\t\t\t";

/// Rule renderer
pub struct RuleRenderer;

impl RuleRenderer {
    /// Render a rule model to DRL source
    pub fn render(model: &RuleModel) -> Result<String> {
        let dsl_enhanced = model.has_dsl_sentences();
        let mut out = DrlWriter::new();

        Self::render_header(model, &mut out);
        Self::render_metadata(model, &mut out);
        Self::render_attributes(model, &mut out);

        out.push("\twhen\n");
        Self::render_lhs(model, dsl_enhanced, &mut out)?;

        out.push("\tthen\n");
        Self::render_rhs(model, dsl_enhanced, &mut out)?;

        out.push("end\n");
        Ok(out.into_string())
    }

    fn render_header(model: &RuleModel, out: &mut DrlWriter) {
        out.push("rule \"").push(&model.name).push("\"");
        match model.parent_name.as_deref().filter(|p| !p.is_empty()) {
            Some(parent) => {
                out.push(" extends \"").push(parent).push("\"\n");
            }
            None => {
                out.push("\n");
            }
        }
    }

    fn render_metadata(model: &RuleModel, out: &mut DrlWriter) {
        for metadata in &model.metadata {
            out.push("\t").push_display(metadata).push("\n");
        }
    }

    fn render_attributes(model: &RuleModel, out: &mut DrlWriter) {
        for attribute in &model.attributes {
            out.push("\t").push_display(attribute).push("\n");
        }
        if !model.has_attribute(RuleAttribute::DIALECT) {
            out.push("\t")
                .push_display(RuleAttribute::default_dialect())
                .push("\n");
        }
    }

    fn render_lhs(model: &RuleModel, dsl_enhanced: bool, out: &mut DrlWriter) -> Result<()> {
        if model.negated {
            out.push(SECTION_INDENT).push("not (\n");
            {
                let mut renderer = LhsPatternRenderer::new(out, dsl_enhanced, NEGATED_INDENT);
                for pattern in &model.lhs {
                    pattern.accept(&mut renderer)?;
                }
            }
            out.push(SECTION_INDENT).push(")\n");
        } else {
            let mut renderer = LhsPatternRenderer::new(out, dsl_enhanced, SECTION_INDENT);
            for pattern in &model.lhs {
                pattern.accept(&mut renderer)?;
            }
        }
        Ok(())
    }

    fn render_rhs(model: &RuleModel, dsl_enhanced: bool, out: &mut DrlWriter) -> Result<()> {
        let mut renderer = RhsActionRenderer::new(out, dsl_enhanced, SECTION_INDENT);
        for action in &model.rhs {
            action.accept(&mut renderer)?;
        }
        Ok(())
    }
}
