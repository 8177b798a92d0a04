//! Outbound delivery of relayed events.

use crate::config::Endpoints;
use crate::event::RelayEvent;
use reqwest::header::ACCEPT;
use sidecar_core::{ActionPerformer, ServiceError, ServiceResult};
use std::future::Future;
use std::time::Duration;

/// Posts each event's payload to the endpoint configured for its kind.
///
/// One attempt per event. A transport error or a non-2xx answer is an
/// `ActionFailed` for the caller to log.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpForwarder {
    /// Create a forwarder whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. the TLS
    /// backend fails to initialise).
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoints))
    }

    /// Create a forwarder around an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// The configured targets.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn forward(&self, event: RelayEvent) -> ServiceResult<()> {
        let url = self.endpoints.url_for(event.kind);
        let payload = event.payload();
        tracing::debug!(%url, %payload, "Forwarding event");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::action_failed(format!("POST {url} failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(kind = %event.kind, %url, status = status.as_u16(), "Event forwarded");
            Ok(())
        } else {
            Err(ServiceError::action_failed(format!(
                "POST {url} answered {status}"
            )))
        }
    }
}

impl ActionPerformer<RelayEvent> for HttpForwarder {
    type Output = ();

    fn perform(&self, input: RelayEvent) -> impl Future<Output = ServiceResult<()>> + Send {
        self.forward(input)
    }
}
