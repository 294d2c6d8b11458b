use serde::Serialize;

use crate::config::WizardVariant;
use crate::domain::form::FieldKey;
use crate::errors::DomainError;

pub const FALLBACK_STEP_HINT: &str = "Step";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Number,
    Select,
    TextArea,
    Checkbox,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(key: FieldKey, kind: FieldKind) -> Self {
        Self { key, kind, required: true }
    }

    pub const fn optional(key: FieldKey, kind: FieldKind) -> Self {
        Self { key, kind, required: false }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub label: String,
    pub fields: Vec<FieldSpec>,
}

impl StepDefinition {
    pub fn new(label: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self { label: label.into(), fields }
    }
}

/// Ordered steps of one wizard deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WizardLayout {
    steps: Vec<StepDefinition>,
}

impl WizardLayout {
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::EmptyLayout);
        }
        Ok(Self { steps })
    }

    pub fn for_variant(variant: WizardVariant) -> Self {
        match variant {
            WizardVariant::Standard => Self::standard(),
            WizardVariant::Extended => Self::extended(),
        }
    }

    /// Contact, Fleet, Coverage, Loss runs.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                contact_step(),
                StepDefinition::new(
                    "Fleet",
                    vec![
                        FieldSpec::required(FieldKey::Company, FieldKind::Text),
                        FieldSpec::optional(FieldKey::McNumber, FieldKind::Text),
                        FieldSpec::required(FieldKey::Trucks, FieldKind::Number),
                        FieldSpec::optional(FieldKey::CdlBand, FieldKind::Select),
                    ],
                ),
                coverage_step(),
                loss_runs_step(),
            ],
        }
    }

    /// Five-step flow that asks for operating authority on its own step.
    pub fn extended() -> Self {
        Self {
            steps: vec![
                contact_step(),
                StepDefinition::new(
                    "Authority",
                    vec![
                        FieldSpec::required(FieldKey::Company, FieldKind::Text),
                        FieldSpec::required(FieldKey::McNumber, FieldKind::Text),
                    ],
                ),
                StepDefinition::new(
                    "Fleet",
                    vec![
                        FieldSpec::required(FieldKey::Trucks, FieldKind::Number),
                        FieldSpec::optional(FieldKey::CdlBand, FieldKind::Select),
                    ],
                ),
                coverage_step(),
                loss_runs_step(),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Result<&StepDefinition, DomainError> {
        self.steps
            .get(index)
            .ok_or(DomainError::StepOutOfRange { index, step_count: self.steps.len() })
    }

    pub fn hint(&self, index: usize) -> &str {
        self.steps.get(index).map(|step| step.label.as_str()).unwrap_or(FALLBACK_STEP_HINT)
    }
}

impl Default for WizardLayout {
    fn default() -> Self {
        Self::standard()
    }
}

fn contact_step() -> StepDefinition {
    StepDefinition::new(
        "Contact",
        vec![
            FieldSpec::required(FieldKey::FullName, FieldKind::Text),
            FieldSpec::required(FieldKey::Email, FieldKind::Email),
            FieldSpec::required(FieldKey::Phone, FieldKind::Tel),
        ],
    )
}

fn coverage_step() -> StepDefinition {
    StepDefinition::new(
        "Coverage",
        vec![
            FieldSpec::optional(FieldKey::Policies, FieldKind::Checkbox),
            FieldSpec::optional(FieldKey::States, FieldKind::Text),
        ],
    )
}

fn loss_runs_step() -> StepDefinition {
    StepDefinition::new(
        "Loss runs",
        vec![
            FieldSpec::optional(FieldKey::LossRuns, FieldKind::TextArea),
            FieldSpec::required(FieldKey::Consent, FieldKind::Checkbox),
            FieldSpec::required(FieldKey::Timeline, FieldKind::Select),
        ],
    )
}
