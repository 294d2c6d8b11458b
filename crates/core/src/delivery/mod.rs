//! Lead delivery to the broker's intake endpoint.
//!
//! Delivery is best effort: one attempt, bounded by a timeout, and every
//! failure collapses into `false` for the caller after it has been logged and
//! audited. The quote the user already sees never depends on it.

pub mod http;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, TracingAuditSink,
};
use crate::config::{ContactConfig, LeadConfig, DEFAULT_LEAD_TIMEOUT_MS};
use crate::domain::lead::LeadPayload;
use crate::errors::DeliveryError;

pub use http::HttpLeadTransport;
pub use memory::InMemoryLeadTransport;

pub const DELIVERED_MESSAGE: &str = "Lead submitted securely. Our team will call/text shortly.";

#[async_trait]
pub trait LeadTransport: Send + Sync {
    async fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: bool,
}

impl DeliveryReport {
    pub fn delivered() -> Self {
        Self { delivered: true }
    }

    pub fn failed() -> Self {
        Self { delivered: false }
    }

    /// User-facing status line; failures point at the fallback contact channel.
    pub fn message(&self, contact: &ContactConfig) -> String {
        if self.delivered {
            DELIVERED_MESSAGE.to_string()
        } else {
            fallback_message(contact)
        }
    }
}

pub fn fallback_message(contact: &ContactConfig) -> String {
    format!(
        "We could not reach the server. Please call {} or email {}.",
        contact.phone, contact.email
    )
}

#[derive(Clone)]
pub struct LeadSubmitter {
    transport: Arc<dyn LeadTransport>,
    timeout: Duration,
    audit: Arc<dyn AuditSink>,
}

impl LeadSubmitter {
    pub fn new(transport: Arc<dyn LeadTransport>, timeout: Duration) -> Self {
        Self { transport, timeout, audit: Arc::new(TracingAuditSink) }
    }

    pub fn from_config(config: &LeadConfig) -> Result<Self, DeliveryError> {
        let transport = HttpLeadTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport), config.timeout()))
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One bounded attempt. On timeout the in-flight request future is dropped.
    pub async fn try_submit(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        match tokio::time::timeout(self.timeout, self.transport.deliver(payload)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::TimedOut { timeout_ms: self.timeout.as_millis() as u64 }),
        }
    }

    pub async fn submit(&self, payload: &LeadPayload, context: &AuditContext) -> bool {
        match self.try_submit(payload).await {
            Ok(()) => {
                info!(
                    event_name = "lead.delivered",
                    correlation_id = %context.correlation_id,
                    session_id = context.session_id.as_deref().unwrap_or("unknown"),
                    trucks = payload.trucks(),
                    "lead delivered to intake endpoint"
                );
                self.audit.emit(
                    AuditEvent::new(
                        context,
                        "lead.delivered",
                        AuditCategory::Delivery,
                        AuditOutcome::Success,
                    )
                    .with_metadata("source", payload.source()),
                );
                true
            }
            Err(error) => {
                warn!(
                    event_name = "lead.delivery_failed",
                    correlation_id = %context.correlation_id,
                    session_id = context.session_id.as_deref().unwrap_or("unknown"),
                    error = %error,
                    "lead delivery failed"
                );
                self.audit.emit(
                    AuditEvent::new(
                        context,
                        "lead.delivery_failed",
                        AuditCategory::Delivery,
                        AuditOutcome::Failed,
                    )
                    .with_metadata("error", error.to_string()),
                );
                false
            }
        }
    }
}

impl Default for LeadSubmitter {
    /// No endpoint: every submission resolves to the fallback path.
    fn default() -> Self {
        Self::new(
            Arc::new(HttpLeadTransport::unconfigured()),
            Duration::from_millis(DEFAULT_LEAD_TIMEOUT_MS),
        )
    }
}
