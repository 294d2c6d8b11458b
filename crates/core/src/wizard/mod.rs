pub mod navigator;
pub mod state;
pub mod steps;
pub mod validator;

pub use navigator::{AdvanceOutcome, StepNavigator};
pub use state::{DeliveryStatus, WizardState};
pub use steps::{FieldKind, FieldSpec, StepDefinition, WizardLayout};
pub use validator::{RequiredFieldValidator, StepValidator};
