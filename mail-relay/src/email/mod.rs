//! Email request model and validation.
//!
//! ```text
//! serde_json::Value → EmailValidator::validate() → EmailRequest
//! ```
//!
//! An `EmailRequest` can only be obtained from the validator, so holding one
//! means every field has already been checked.

pub mod types;
pub mod validate;

pub use types::{ContentPart, EmailRequest, Recipient, Sender};
pub use validate::{EmailValidator, ValidationError, ViolationKind};
