//! Rule persistence entry points

use crate::codegen::RuleRenderer;
use crate::error::{MarshalError, Result};
use ruledepot_core::RuleModel;

/// Converts rule models to and from a textual form
pub trait RulePersistence: Send + Sync {
    /// Render a rule model to text
    fn marshal(&self, model: &RuleModel) -> Result<String>;

    /// Parse text back into a rule model
    fn unmarshal(&self, source: &str) -> Result<RuleModel>;
}

/// Marshals rule models to DRL
///
/// The projection is one-way: [`RulePersistence::unmarshal`] always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrlMarshaller;

impl DrlMarshaller {
    pub fn new() -> Self {
        DrlMarshaller
    }
}

impl RulePersistence for DrlMarshaller {
    fn marshal(&self, model: &RuleModel) -> Result<String> {
        RuleRenderer::render(model)
    }

    fn unmarshal(&self, _source: &str) -> Result<RuleModel> {
        Err(MarshalError::Unmarshal(
            "DRL source cannot be converted to a rule model".to_string(),
        ))
    }
}
