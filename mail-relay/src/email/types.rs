//! Validated email request types.

/// Sender identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    email: String,
    name: String,
}

impl Sender {
    pub(crate) fn new(email: String, name: String) -> Self {
        Self { email, name }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The single addressed recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    email: String,
}

impl Recipient {
    pub(crate) fn new(email: String) -> Self {
        Self { email }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// One body part, e.g. `text/plain` or `text/html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPart {
    mime_type: String,
    value: String,
}

impl ContentPart {
    pub(crate) fn new(mime_type: String, value: String) -> Self {
        Self { mime_type, value }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A fully validated send request.
///
/// Constructed only by [`EmailValidator`](super::EmailValidator); there is no
/// public constructor and no mutation after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRequest {
    sender: Sender,
    recipient: Recipient,
    subject: String,
    content_parts: Vec<ContentPart>,
}

impl EmailRequest {
    pub(crate) fn new(
        sender: Sender,
        recipient: Recipient,
        subject: String,
        content_parts: Vec<ContentPart>,
    ) -> Self {
        Self {
            sender,
            recipient,
            subject,
            content_parts,
        }
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Content parts in submission order. Never empty.
    pub fn content_parts(&self) -> &[ContentPart] {
        &self.content_parts
    }
}
