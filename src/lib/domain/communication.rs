//! Message composition: addresses, headers, content and the message builder.

pub mod content;
pub mod email_addresses;
pub mod errors;
pub mod headers;
pub mod mailer;
pub mod message;
