use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::delivery::LeadTransport;
use crate::domain::lead::LeadPayload;
use crate::errors::DeliveryError;

/// Records every payload it is handed. Used by tests and dry runs.
#[derive(Clone, Default)]
pub struct InMemoryLeadTransport {
    delivered: Arc<Mutex<Vec<LeadPayload>>>,
    failure: Option<DeliveryError>,
}

impl InMemoryLeadTransport {
    pub fn failing(error: DeliveryError) -> Self {
        Self { delivered: Arc::default(), failure: Some(error) }
    }

    pub fn payloads(&self) -> Vec<LeadPayload> {
        match self.delivered.lock() {
            Ok(payloads) => payloads.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl LeadTransport for InMemoryLeadTransport {
    async fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        match self.delivered.lock() {
            Ok(mut payloads) => payloads.push(payload.clone()),
            Err(poisoned) => poisoned.into_inner().push(payload.clone()),
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
