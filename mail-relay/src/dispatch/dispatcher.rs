//! Provider client that performs a single send per request.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{error, info, warn};
use url::Url;

use super::payload::SendPayload;
use crate::email::EmailRequest;
use crate::Config;

/// What happened to a dispatched email.
///
/// Informational only. None of these reach the HTTP caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Provider answered with a 2xx status
    Delivered,
    /// Provider answered with a non-success status
    Rejected { status: u16 },
    /// Connection, timeout, or other transport failure
    TransportFailed,
}

/// Sends validated emails to the provider endpoint.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl Dispatcher {
    /// Create a dispatcher from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_endpoint(
            config.provider_url.clone(),
            config.provider_api_key.clone(),
            config.dispatch_timeout,
        )
    }

    /// Create a dispatcher for an explicit endpoint.
    pub fn with_endpoint(endpoint: Url, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one email. Exactly one outbound request is made; failures are
    /// logged with the recipient address and swallowed.
    pub async fn dispatch(&self, email: EmailRequest) -> DispatchOutcome {
        let recipient = email.recipient().email().to_string();
        let payload = SendPayload::from(&email);

        info!(
            recipient = %recipient,
            content_parts = payload.content.len(),
            "email_dispatch_starting"
        );

        // `.json()` sets `Content-Type: application/json`.
        let mut request = self.client.post(self.endpoint.clone()).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(
                    recipient = %recipient,
                    status_code = resp.status().as_u16(),
                    "email_dispatch_complete"
                );
                DispatchOutcome::Delivered
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                warn!(
                    recipient = %recipient,
                    status_code = status,
                    "email_dispatch_rejected"
                );
                DispatchOutcome::Rejected { status }
            }
            Err(e) => {
                if e.is_timeout() {
                    error!(recipient = %recipient, error = %e, "email_dispatch_timeout");
                } else {
                    error!(recipient = %recipient, error = %e, "email_dispatch_failed");
                }
                DispatchOutcome::TransportFailed
            }
        }
    }
}
