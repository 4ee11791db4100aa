//! Mail relay - authenticated HTTP front for transactional email.
//!
//! One endpoint, `POST /email`, accepts a JSON send request, checks the
//! bearer token, validates the payload, and answers immediately. Delivery to
//! MailChannels happens afterwards on a tracked background task.
//!
//! ## Architecture
//!
//! ```text
//! Request → Authenticator → EmailValidator → 200 "mail sent"
//!                                          ↘ DeferredTasks → Dispatcher → MailChannels
//! ```

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod email;
pub mod web;

// Re-export commonly used types
pub use auth::{Authenticator, Principal};
pub use config::Config;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use email::{EmailRequest, EmailValidator, ValidationError};
pub use web::{router, AppState, DeferredTasks};
