pub mod audit;
pub mod config;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod session;
pub mod wizard;

pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink};
pub use config::{AppConfig, ConfigOverrides, ContactConfig, LoadOptions, WizardVariant};
pub use delivery::{
    DeliveryReport, HttpLeadTransport, InMemoryLeadTransport, LeadSubmitter, LeadTransport,
};
pub use domain::form::{CdlBand, FieldKey, FormFields, Timeline};
pub use domain::lead::LeadPayload;
pub use domain::quote::{PremiumBreakdown, PremiumRange, QuoteResult};
pub use errors::{ApplicationError, DeliveryError, DomainError};
pub use pricing::{estimate, HeuristicPremiumEstimator, PremiumEstimator};
pub use session::{PendingDelivery, WizardSession};
pub use wizard::{
    AdvanceOutcome, DeliveryStatus, StepDefinition, StepNavigator, WizardLayout, WizardState,
};
