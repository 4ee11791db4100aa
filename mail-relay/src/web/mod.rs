//! HTTP surface of the relay.
//!
//! A single route, `POST /email`. The handler:
//! 1. Authenticates the bearer token
//! 2. Reads and validates the JSON body
//! 3. Hands the email to the dispatcher as deferred work
//! 4. Returns `mail sent` without waiting for delivery
//!
//! Every other method or path answers 404.

pub mod deferred;
pub mod error;
pub mod handlers;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

pub use deferred::DeferredTasks;
pub use error::RejectReason;
pub use handlers::{not_found, send_email, AppState};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/email", post(send_email).fallback(not_found))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
