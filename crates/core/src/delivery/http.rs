use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::LeadConfig;
use crate::delivery::LeadTransport;
use crate::domain::lead::LeadPayload;
use crate::errors::DeliveryError;

/// POSTs the lead as JSON to the configured intake endpoint.
#[derive(Clone)]
pub struct HttpLeadTransport {
    client: Client,
    endpoint: Option<String>,
    auth_token: Option<SecretString>,
}

impl HttpLeadTransport {
    pub fn from_config(config: &LeadConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .user_agent(concat!("haulquote/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| DeliveryError::ClientBuild(error.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone().filter(|endpoint| !endpoint.trim().is_empty()),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn unconfigured() -> Self {
        Self { client: Client::new(), endpoint: None, auth_token: None }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

#[async_trait]
impl LeadTransport for HttpLeadTransport {
    async fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        let endpoint = self.endpoint.as_deref().ok_or(DeliveryError::EndpointMissing)?;

        let mut request = self.client.post(endpoint).json(payload);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|error| {
            if error.is_builder() {
                DeliveryError::Serialization(error.to_string())
            } else {
                DeliveryError::Transport(error.to_string())
            }
        })?;

        let status = response.status();
        debug!(
            event_name = "lead.endpoint_response",
            status = status.as_u16(),
            "intake endpoint responded"
        );
        if !status.is_success() {
            return Err(DeliveryError::Rejected { status: status.as_u16() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::HttpLeadTransport;
    use crate::config::{LeadConfig, DEFAULT_LEAD_SOURCE, DEFAULT_LEAD_TIMEOUT_MS};

    fn lead_config(endpoint: Option<&str>) -> LeadConfig {
        LeadConfig {
            endpoint: endpoint.map(str::to_owned),
            timeout_ms: DEFAULT_LEAD_TIMEOUT_MS,
            source: DEFAULT_LEAD_SOURCE.to_owned(),
            auth_token: Some(SecretString::from("intake-token".to_owned())),
        }
    }

    #[test]
    fn blank_endpoint_is_treated_as_unconfigured() {
        let transport = HttpLeadTransport::from_config(&lead_config(Some("  "))).expect("client");
        assert_eq!(transport.endpoint(), None);
    }

    #[test]
    fn configured_endpoint_is_kept() {
        let config = lead_config(Some("https://intake.test/leads"));
        let transport = HttpLeadTransport::from_config(&config).expect("client");
        assert_eq!(transport.endpoint(), Some("https://intake.test/leads"));
    }
}
