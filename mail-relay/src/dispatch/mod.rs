//! Outbound delivery to the transactional email provider.
//!
//! ```text
//! EmailRequest → SendPayload (MailChannels wire format) → POST → DispatchOutcome
//! ```
//!
//! Dispatch runs after the HTTP response has been sent, so failures are only
//! ever logged. There is no retry and no persistence of failed sends.

pub mod dispatcher;
pub mod payload;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use payload::SendPayload;
