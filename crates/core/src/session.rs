//! One user's run through the wizard, from open to restart.
//!
//! The session owns the mutable form and step state. Pricing happens
//! synchronously when a submission begins, so the quote is already stored
//! before the lead delivery (the only suspending operation) starts.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, TracingAuditSink,
};
use crate::config::{AppConfig, ContactConfig, DEFAULT_LEAD_SOURCE};
use crate::delivery::{DeliveryReport, LeadSubmitter};
use crate::domain::form::{FieldKey, FormFields};
use crate::domain::lead::LeadPayload;
use crate::domain::quote::QuoteResult;
use crate::errors::{DeliveryError, DomainError};
use crate::pricing::{HeuristicPremiumEstimator, PremiumEstimator};
use crate::wizard::{
    AdvanceOutcome, DeliveryStatus, StepDefinition, StepNavigator, WizardLayout, WizardState,
};

const SESSION_ACTOR: &str = "wizard";

pub struct WizardSession {
    id: Uuid,
    fields: FormFields,
    state: WizardState,
    navigator: StepNavigator,
    estimator: Arc<dyn PremiumEstimator>,
    submitter: LeadSubmitter,
    contact: ContactConfig,
    source: String,
    audit: Arc<dyn AuditSink>,
}

/// A captured lead waiting to be delivered. Detached from the session so it
/// can be spawned onto a runtime while the caller renders the quote.
///
/// The session stays busy until [`WizardSession::complete_submission`] runs.
/// A caller that drops this without running it must still complete the
/// submission, typically with [`DeliveryReport::failed`].
pub struct PendingDelivery {
    submitter: LeadSubmitter,
    payload: LeadPayload,
    context: AuditContext,
}

impl PendingDelivery {
    pub fn payload(&self) -> &LeadPayload {
        &self.payload
    }

    pub async fn run(self) -> DeliveryReport {
        if self.submitter.submit(&self.payload, &self.context).await {
            DeliveryReport::delivered()
        } else {
            DeliveryReport::failed()
        }
    }
}

/// Clears the busy flag if the owning future is dropped mid-delivery.
struct SubmittingGuard<'a> {
    state: &'a mut WizardState,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.state.is_submitting = false;
    }
}

impl WizardSession {
    pub fn new(layout: WizardLayout, submitter: LeadSubmitter) -> Self {
        Self {
            id: Uuid::new_v4(),
            fields: FormFields::default(),
            state: WizardState::new(),
            navigator: StepNavigator::new(layout),
            estimator: Arc::new(HeuristicPremiumEstimator),
            submitter,
            contact: ContactConfig::default(),
            source: DEFAULT_LEAD_SOURCE.to_string(),
            audit: Arc::new(TracingAuditSink),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, DeliveryError> {
        let submitter = LeadSubmitter::from_config(&config.lead)?;
        Ok(Self::new(WizardLayout::for_variant(config.wizard.variant), submitter)
            .with_contact(config.contact.clone())
            .with_source(config.lead.source.clone()))
    }

    pub fn with_contact(mut self, contact: ContactConfig) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn PremiumEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// The sink is shared with the submitter so delivery events land in the same trail.
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.submitter = self.submitter.with_audit_sink(audit.clone());
        self.audit = audit;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    pub fn contact(&self) -> &ContactConfig {
        &self.contact
    }

    pub fn set_field(&mut self, key: FieldKey, raw: &str) {
        self.fields.set_field(key, raw);
    }

    pub fn field_value(&self, key: FieldKey) -> String {
        self.fields.field_value(key)
    }

    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.navigator.current_step(&self.state)
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        let outcome = self.navigator.advance(&mut self.state, &self.fields);
        let context = self.context(self.id.to_string());
        match &outcome {
            AdvanceOutcome::Moved { from, to } => {
                info!(
                    event_name = "wizard.step_advanced",
                    correlation_id = %context.correlation_id,
                    session_id = %self.id,
                    from,
                    to,
                    "wizard advanced"
                );
                self.audit.emit(
                    AuditEvent::new(
                        &context,
                        "wizard.step_advanced",
                        AuditCategory::Navigation,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", from.to_string())
                    .with_metadata("to", to.to_string()),
                );
            }
            AdvanceOutcome::Blocked { step, missing_fields } => {
                let missing = join_keys(missing_fields);
                info!(
                    event_name = "wizard.step_blocked",
                    correlation_id = %context.correlation_id,
                    session_id = %self.id,
                    step,
                    missing = %missing,
                    "wizard step incomplete"
                );
                self.audit.emit(
                    AuditEvent::new(
                        &context,
                        "wizard.step_blocked",
                        AuditCategory::Navigation,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("step", step.to_string())
                    .with_metadata("missing", missing),
                );
            }
            AdvanceOutcome::SubmitRequested | AdvanceOutcome::Busy => {}
        }
        outcome
    }

    pub fn retreat(&mut self) -> bool {
        let moved = self.navigator.retreat(&mut self.state);
        if moved {
            let context = self.context(self.id.to_string());
            self.audit.emit(
                AuditEvent::new(
                    &context,
                    "wizard.step_retreated",
                    AuditCategory::Navigation,
                    AuditOutcome::Success,
                )
                .with_metadata("to", self.state.current_step_index.to_string()),
            );
        }
        moved
    }

    /// Prices the form, stores the result and captures the lead.
    ///
    /// Only allowed from the final step with every step complete, the same
    /// gate `advance` applies before it answers `SubmitRequested`. The
    /// returned delivery must be finished with [`Self::complete_submission`],
    /// which is what clears the busy flag.
    pub fn begin_submission(&mut self) -> Result<PendingDelivery, DomainError> {
        if self.state.is_submitting {
            return Err(DomainError::SubmissionInProgress);
        }
        self.ensure_submittable()?;

        self.state.is_submitting = true;
        self.state.delivery_status = None;

        let result = self.estimator.estimate(&self.fields);
        let context = self.context(Uuid::new_v4().to_string());
        info!(
            event_name = "wizard.submission_started",
            correlation_id = %context.correlation_id,
            session_id = %self.id,
            low = result.low,
            high = result.high,
            "quote computed, delivering lead"
        );
        self.audit.emit(
            AuditEvent::new(
                &context,
                "quote.estimated",
                AuditCategory::Pricing,
                AuditOutcome::Success,
            )
            .with_metadata("low", result.low.to_string())
            .with_metadata("high", result.high.to_string()),
        );

        let payload = LeadPayload::capture(&self.fields, &result, self.source.clone(), Utc::now());
        self.state.last_result = Some(result);

        Ok(PendingDelivery { submitter: self.submitter.clone(), payload, context })
    }

    pub fn complete_submission(&mut self, report: DeliveryReport) -> &DeliveryStatus {
        self.state.is_submitting = false;
        self.state.delivery_status.insert(DeliveryStatus {
            delivered: report.delivered,
            message: report.message(&self.contact),
        })
    }

    pub fn last_result(&self) -> Option<&QuoteResult> {
        self.state.last_result.as_ref()
    }

    pub fn delivery_status(&self) -> Option<&DeliveryStatus> {
        self.state.delivery_status.as_ref()
    }

    /// Dropping the returned future mid-delivery still clears the busy flag.
    pub async fn submit(&mut self) -> Result<DeliveryStatus, DomainError> {
        let pending = self.begin_submission()?;
        let guard = SubmittingGuard { state: &mut self.state };
        let report = pending.run().await;
        drop(guard);
        Ok(self.complete_submission(report).clone())
    }

    /// Destructive reset: fields, step state and session id all start over.
    pub fn restart(&mut self) {
        let previous = self.id;
        self.id = Uuid::new_v4();
        self.fields = FormFields::default();
        self.state = WizardState::new();

        let context = self.context(previous.to_string());
        self.audit.emit(
            AuditEvent::new(
                &context,
                "wizard.restarted",
                AuditCategory::System,
                AuditOutcome::Success,
            )
            .with_metadata("previous_session_id", previous.to_string()),
        );
    }

    fn ensure_submittable(&self) -> Result<(), DomainError> {
        if !self.navigator.is_last_step(&self.state) {
            return Err(DomainError::NotOnFinalStep {
                index: self.state.current_step_index,
                step_count: self.navigator.step_count(),
            });
        }
        match self.navigator.first_incomplete_step(&self.fields) {
            Some((step, missing_fields)) => {
                Err(DomainError::StepIncomplete { step, missing_fields })
            }
            None => Ok(()),
        }
    }

    fn context(&self, correlation_id: String) -> AuditContext {
        AuditContext::new(Some(self.id.to_string()), correlation_id, SESSION_ACTOR)
    }
}

fn join_keys(keys: &[FieldKey]) -> String {
    keys.iter().map(FieldKey::as_str).collect::<Vec<_>>().join(",")
}
