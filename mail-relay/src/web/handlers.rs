//! Endpoint handlers.
//!
//! The send handler never waits on the provider. It only:
//! 1. Verifies the bearer token
//! 2. Validates the payload
//! 3. Schedules dispatch on the deferred task set
//! 4. Returns immediately

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::Authenticator;
use crate::dispatch::Dispatcher;
use crate::email::EmailValidator;
use crate::web::deferred::DeferredTasks;
use crate::web::error::RejectReason;
use crate::Config;

/// Largest request body the relay will buffer.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Authenticator,
    pub validator: Arc<EmailValidator>,
    pub dispatcher: Dispatcher,
    pub deferred: DeferredTasks,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let dispatcher = Dispatcher::new(&config)?;
        Ok(Self::with_dispatcher(&config, dispatcher))
    }

    pub fn with_dispatcher(config: &Config, dispatcher: Dispatcher) -> Self {
        Self {
            authenticator: Authenticator::new(config.auth_secret.as_deref()),
            validator: Arc::new(EmailValidator::new()),
            dispatcher,
            deferred: DeferredTasks::new(),
        }
    }
}

/// Any route or method other than `POST /email`.
pub async fn not_found() -> RejectReason {
    RejectReason::NotFound
}

/// `POST /email` endpoint.
///
/// The body is only read once the caller has authenticated.
pub async fn send_email(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, RejectReason> {
    // The principal only gates the request; it is not carried further.
    if state.authenticator.authenticate(request.headers()).is_none() {
        warn!("email_request_unauthorized");
        return Err(RejectReason::Unauthorized);
    }

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            warn!(error = %e, "email_request_body_unreadable");
            RejectReason::BodyUnreadable
        })?;

    let raw: Value = serde_json::from_slice(&body).inspect_err(|e| {
        warn!(error = %e, body_length = body.len(), "email_request_parse_failed");
    })?;

    let email = state.validator.validate(&raw).inspect_err(|e| {
        warn!(path = %e.path, kind = ?e.kind, "email_request_invalid");
    })?;

    info!(
        recipient = %email.recipient().email(),
        content_parts = email.content_parts().len(),
        "email_request_accepted"
    );

    let dispatcher = state.dispatcher.clone();
    state.deferred.spawn(async move {
        dispatcher.dispatch(email).await;
    });

    Ok((StatusCode::OK, "mail sent"))
}
