use crate::domain::form::{FieldKey, FormFields};
use crate::wizard::steps::{FieldKind, StepDefinition};

pub trait StepValidator: Send + Sync {
    /// Required fields on `step` that still need a value. Never looks outside the step.
    fn missing_fields(&self, step: &StepDefinition, fields: &FormFields) -> Vec<FieldKey>;

    fn is_valid(&self, step: &StepDefinition, fields: &FormFields) -> bool {
        self.missing_fields(step, fields).is_empty()
    }
}

/// Mirrors browser `required` handling, except that required checkboxes always pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequiredFieldValidator;

impl StepValidator for RequiredFieldValidator {
    fn missing_fields(&self, step: &StepDefinition, fields: &FormFields) -> Vec<FieldKey> {
        step.fields
            .iter()
            .filter(|spec| spec.required && spec.kind != FieldKind::Checkbox)
            .filter(|spec| fields.field_value(spec.key).trim().is_empty())
            .map(|spec| spec.key)
            .collect()
    }
}
