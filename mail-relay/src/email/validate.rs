//! Structural validation of untyped JSON into an [`EmailRequest`].
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "from": { "email": "a@x.com", "name": "A" },
//!   "to": { "email": "b@y.com" },
//!   "subject": "Hi",
//!   "content": [{ "type": "text/plain", "value": "hello" }]
//! }
//! ```
//!
//! Fields are checked in document order and the first violation is reported.
//! Unknown keys are rejected at every level.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::ValidateEmail;

use super::types::{ContentPart, EmailRequest, Recipient, Sender};

const ROOT_KEYS: &[&str] = &["from", "to", "subject", "content"];
const FROM_KEYS: &[&str] = &["email", "name"];
const TO_KEYS: &[&str] = &["email"];
const CONTENT_KEYS: &[&str] = &["type", "value"];

/// Machine-readable category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    InvalidType,
    Empty,
    InvalidEmail,
    TooFewItems,
    UnknownKey,
}

/// First violation found in a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("\"{path}\" {message}")]
pub struct ValidationError {
    /// Location of the offending value, e.g. `content[1].type`
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    fn missing(path: String) -> Self {
        Self::new(path, ViolationKind::Missing, "is required")
    }

    fn invalid_type(path: String, expected: &str) -> Self {
        Self::new(path, ViolationKind::InvalidType, format!("must be {}", expected))
    }
}

/// Immutable ruleset for email payloads, built once and shared.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    min_content_parts: usize,
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailValidator {
    pub fn new() -> Self {
        Self {
            min_content_parts: 1,
        }
    }

    /// Validate a raw JSON value and construct the typed request.
    pub fn validate(&self, raw: &Value) -> Result<EmailRequest, ValidationError> {
        let root = as_object(raw, "value")?;

        let from = as_object(required(root, "", "from")?, "from")?;
        let sender_email = email_field(from, "from", "email")?;
        let sender_name = string_field(from, "from", "name")?;
        reject_unknown(from, "from", FROM_KEYS)?;

        // `to` is required as a whole, not only its inner fields.
        let to = as_object(required(root, "", "to")?, "to")?;
        let recipient_email = email_field(to, "to", "email")?;
        reject_unknown(to, "to", TO_KEYS)?;

        let subject = string_field(root, "", "subject")?;

        let content_parts = self.content_parts(required(root, "", "content")?)?;

        reject_unknown(root, "", ROOT_KEYS)?;

        Ok(EmailRequest::new(
            Sender::new(sender_email, sender_name),
            Recipient::new(recipient_email),
            subject,
            content_parts,
        ))
    }

    fn content_parts(&self, value: &Value) -> Result<Vec<ContentPart>, ValidationError> {
        let items = value
            .as_array()
            .ok_or_else(|| ValidationError::invalid_type("content".to_string(), "an array"))?;

        if items.len() < self.min_content_parts {
            return Err(ValidationError::new(
                "content",
                ViolationKind::TooFewItems,
                format!("must contain at least {} item(s)", self.min_content_parts),
            ));
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let path = format!("content[{}]", index);
                let part = as_object(item, &path)?;
                let mime_type = string_field(part, &path, "type")?;
                let value = string_field(part, &path, "value")?;
                reject_unknown(part, &path, CONTENT_KEYS)?;
                Ok(ContentPart::new(mime_type, value))
            })
            .collect()
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::invalid_type(path.to_string(), "an object"))
}

fn required<'a>(
    object: &'a Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<&'a Value, ValidationError> {
    object
        .get(key)
        .ok_or_else(|| ValidationError::missing(join(parent, key)))
}

fn string_field(
    object: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<String, ValidationError> {
    let path = join(parent, key);
    let value = object
        .get(key)
        .ok_or_else(|| ValidationError::missing(path.clone()))?;

    match value.as_str() {
        Some("") => Err(ValidationError::new(
            path,
            ViolationKind::Empty,
            "is not allowed to be empty",
        )),
        Some(s) => Ok(s.to_string()),
        None => Err(ValidationError::invalid_type(path, "a string")),
    }
}

/// A non-empty string that is also a syntactically valid address.
fn email_field(
    object: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<String, ValidationError> {
    let email = string_field(object, parent, key)?;

    if !is_valid_address(&email) {
        return Err(ValidationError::new(
            join(parent, key),
            ViolationKind::InvalidEmail,
            "must be a valid email",
        ));
    }

    Ok(email)
}

/// `dot-atom@domain` with at least two domain labels.
///
/// The local part may contain non-ASCII letters. IP-literal domains are
/// rejected. No registered public suffix is required, so internal domains
/// such as `mail.internal` pass.
fn is_valid_address(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    if !is_dot_atom(local) || domain.starts_with('[') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return false;
    }

    // Hostname syntax and IDN handling come from `validator`; the local part
    // was already checked above.
    format!("postmaster@{}", domain).validate_email()
}

fn is_dot_atom(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= 64
        && local
            .split('.')
            .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || "!#$%&'*+-/=?^_`{|}~".contains(c)
        || (!c.is_ascii() && c.is_alphanumeric())
}

fn reject_unknown(
    object: &Map<String, Value>,
    parent: &str,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    match object.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(ValidationError::new(
            join(parent, key),
            ViolationKind::UnknownKey,
            "is not allowed",
        )),
        None => Ok(()),
    }
}
