//! MailChannels send API body.
//!
//! Reference: https://api.mailchannels.net/tx/v1/documentation

use serde::{Deserialize, Serialize};

use crate::email::EmailRequest;

/// Request body for `POST /tx/v1/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendPayload {
    pub personalizations: Vec<Personalization>,
    pub from: Address,
    pub subject: String,
    pub content: Vec<Content>,
}

/// One envelope. This relay always sends exactly one with one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personalization {
    pub to: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

impl From<&EmailRequest> for SendPayload {
    fn from(email: &EmailRequest) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: email.recipient().email().to_string(),
                    name: None,
                }],
            }],
            from: Address {
                email: email.sender().email().to_string(),
                name: Some(email.sender().name().to_string()),
            },
            subject: email.subject().to_string(),
            content: email
                .content_parts()
                .iter()
                .map(|part| Content {
                    content_type: part.mime_type().to_string(),
                    value: part.value().to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::EmailValidator;
    use serde_json::json;

    #[test]
    fn test_payload_wire_format() {
        let email = EmailValidator::new()
            .validate(&json!({
                "from": { "email": "a@x.com", "name": "A" },
                "to": { "email": "b@y.com" },
                "subject": "Hi",
                "content": [
                    { "type": "text/plain", "value": "hello" },
                    { "type": "text/html", "value": "<b>hello</b>" }
                ]
            }))
            .unwrap();

        let body = serde_json::to_value(SendPayload::from(&email)).unwrap();

        assert_eq!(
            body,
            json!({
                "personalizations": [{ "to": [{ "email": "b@y.com" }] }],
                "from": { "email": "a@x.com", "name": "A" },
                "subject": "Hi",
                "content": [
                    { "type": "text/plain", "value": "hello" },
                    { "type": "text/html", "value": "<b>hello</b>" }
                ]
            })
        );
    }
}
