//! Built message

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use lettre::{
    message::{
        header::{HeaderName, HeaderValue},
        Mailbox,
    },
    Message,
};

use crate::{
    domain::communication::{
        content::Content,
        errors::{EmailError, ValidationError},
        headers::HeaderMap,
        mailer::Mailer,
    },
    infrastructure::email::smtp::Session,
};

/// Headers written by a body part itself; a custom value would duplicate them.
const CONTENT_HEADERS: [&str; 2] = ["Content-Type", "Content-Transfer-Encoding"];

/// Recipient field of a message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecipientType {
    /// `To`
    To,

    /// `Cc`
    Cc,

    /// `Bcc`
    Bcc,
}

/// Immutable snapshot produced by [`MessageBuilder::build`](super::MessageBuilder::build)
#[derive(Clone, Debug)]
pub struct BuiltMessage {
    pub(super) from: Mailbox,
    pub(super) to: Vec<Mailbox>,
    pub(super) cc: Vec<Mailbox>,
    pub(super) bcc: Vec<Mailbox>,
    pub(super) reply_to: Vec<Mailbox>,
    pub(super) subject: Option<String>,
    pub(super) headers: HeaderMap,
    pub(super) content: Option<Content>,
    pub(super) sent_date: DateTime<Utc>,
    pub(super) session: Session,
}

impl BuiltMessage {
    /// The sender
    pub fn from_address(&self) -> &Mailbox {
        &self.from
    }

    /// Recipients of the given type, in insertion order
    pub fn recipients(&self, recipient_type: RecipientType) -> &[Mailbox] {
        match recipient_type {
            RecipientType::To => &self.to,
            RecipientType::Cc => &self.cc,
            RecipientType::Bcc => &self.bcc,
        }
    }

    /// Reply-To addresses
    pub fn reply_to(&self) -> &[Mailbox] {
        &self.reply_to
    }

    /// The subject
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Value of the custom header `name`
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// All custom headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The body
    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// The send timestamp; the build time when none was set on the draft
    pub fn sent_date(&self) -> DateTime<Utc> {
        self.sent_date
    }

    /// The session the message was built against
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Render the message through `lettre`.
    ///
    /// MIME types and header names are checked here, by the transport. A
    /// custom `Content-Type` or `Content-Transfer-Encoding` header is rejected
    /// when the message has content, since the body part writes its own.
    pub fn to_transport_message(&self) -> Result<Message, EmailError> {
        if self.content.is_some() {
            if let Some((name, _)) = self.headers.iter().find(|(name, _)| {
                CONTENT_HEADERS
                    .iter()
                    .any(|reserved| name.eq_ignore_ascii_case(reserved))
            }) {
                return Err(ValidationError::ConflictingHeader(name.to_string()).into());
            }
        }

        let mut builder = Message::builder()
            .from(self.from.clone())
            .date(SystemTime::from(self.sent_date));

        if let Some(subject) = &self.subject {
            builder = builder.subject(subject.clone());
        }

        for mailbox in &self.to {
            builder = builder.to(mailbox.clone());
        }
        for mailbox in &self.cc {
            builder = builder.cc(mailbox.clone());
        }
        for mailbox in &self.bcc {
            builder = builder.bcc(mailbox.clone());
        }
        for mailbox in &self.reply_to {
            builder = builder.reply_to(mailbox.clone());
        }

        let mut message = match &self.content {
            None => builder.body(String::new())?,
            Some(Content::Part(part)) => builder.singlepart(part.to_single_part()?)?,
            Some(Content::Multipart(multipart)) => builder.multipart(multipart.to_multi_part()?)?,
        };

        for (name, value) in self.headers.iter() {
            let header_name = HeaderName::new_from_ascii(name.to_string())
                .map_err(|_| ValidationError::InvalidHeaderName(name.to_string()))?;

            message
                .headers_mut()
                .insert_raw(HeaderValue::new(header_name, value.to_string()));
        }

        Ok(message)
    }

    /// The RFC 5322 rendering of the message
    pub fn formatted(&self) -> Result<Vec<u8>, EmailError> {
        Ok(self.to_transport_message()?.formatted())
    }

    /// Render the message and hand it to `mailer`
    pub fn send_via<M: Mailer>(&self, mailer: &M) -> Result<(), EmailError> {
        let message = self.to_transport_message()?;

        mailer.send_message(&message)?;

        Ok(())
    }
}
