use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::form::FieldKey;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("a submission is already in flight for this session")]
    SubmissionInProgress,
    #[error("wizard layout must contain at least one step")]
    EmptyLayout,
    #[error("step index {index} is outside the layout of {step_count} steps")]
    StepOutOfRange { index: usize, step_count: usize },
    #[error("submission is only allowed from the final step (at step {index} of {step_count})")]
    NotOnFinalStep { index: usize, step_count: usize },
    #[error("step {step} is missing required fields: {missing_fields:?}")]
    StepIncomplete { step: usize, missing_fields: Vec<FieldKey> },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("lead endpoint is not configured")]
    EndpointMissing,
    #[error("lead delivery timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
    #[error("lead endpoint responded with status {status}")]
    Rejected { status: u16 },
    #[error("lead delivery transport failure: {0}")]
    Transport(String),
    #[error("lead payload could not be serialized: {0}")]
    Serialization(String),
    #[error("lead http client could not be built: {0}")]
    ClientBuild(String),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    /// Stable machine-readable class used in CLI envelopes.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::Delivery(DeliveryError::EndpointMissing)
            | Self::Delivery(DeliveryError::ClientBuild(_)) => "delivery_configuration",
            Self::Delivery(_) => "delivery",
            Self::Configuration(_) => "config_validation",
        }
    }
}
