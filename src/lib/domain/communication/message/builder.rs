//! Message builder

use std::fmt;

use chrono::{DateTime, Utc};
use lettre::message::Mailbox;
use tracing::debug;

use crate::{
    domain::communication::{
        content::{BodyPart, Content},
        email_addresses::EmailAddress,
        errors::{EmailError, ValidationError},
        headers::HeaderMap,
    },
    infrastructure::email::smtp::{Session, SmtpConfig, DEFAULT_SMTP_PORT, SOCKET_TIMEOUT_MS},
};

use super::BuiltMessage;

/// Accumulates addressing, headers and content, then builds a message exactly once.
///
/// Mutators may be called in any order. Once [`build`](Self::build) has
/// succeeded the builder is terminal: further `build` calls fail with
/// [`EmailError::AlreadyBuilt`], and mutators still validate their input but
/// otherwise do nothing.
#[derive(Default)]
pub struct MessageBuilder {
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    reply_to: Vec<Mailbox>,
    subject: Option<String>,
    headers: HeaderMap,
    content: Option<Content>,
    sent_date: Option<DateTime<Utc>>,
    host_name: Option<String>,
    smtp_port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    starttls: bool,
    socket_connection_timeout: Option<u64>,
    session: Option<Session>,
    built: Option<BuiltMessage>,
}

impl fmt::Debug for MessageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("bcc", &self.bcc)
            .field("reply_to", &self.reply_to)
            .field("subject", &self.subject)
            .field("headers", &self.headers)
            .field("content", &self.content)
            .field("sent_date", &self.sent_date)
            .field("host_name", &self.host_name)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("starttls", &self.starttls)
            .field("socket_connection_timeout", &self.socket_connection_timeout)
            .field("session", &self.session)
            .field("built", &self.built.is_some())
            .finish()
    }
}

fn parse_addresses<I, S>(addresses: I) -> Result<Vec<Mailbox>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mailboxes = addresses
        .into_iter()
        .map(|address| EmailAddress::parse_mailbox(address.as_ref(), None))
        .collect::<Result<Vec<_>, _>>()?;

    if mailboxes.is_empty() {
        return Err(ValidationError::EmptyAddressList);
    }

    Ok(mailboxes)
}

impl MessageBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    fn ignored_after_build(&self, operation: &str) -> bool {
        if self.built.is_some() {
            debug!(operation, "message already built, ignoring");
            return true;
        }

        false
    }

    /// Append `addresses` to the `To` list.
    ///
    /// # Returns
    /// - [`Err`] with [`ValidationError::EmptyAddressList`] if `addresses` is empty.
    /// - [`Err`] with [`ValidationError::InvalidAddress`] if any entry is not a valid mailbox.
    ///
    /// Nothing is appended on failure.
    pub fn add_to<I, S>(&mut self, addresses: I) -> Result<(), EmailError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mailboxes = parse_addresses(addresses)?;

        if !self.ignored_after_build("add_to") {
            self.to.extend(mailboxes);
        }

        Ok(())
    }

    /// Append `addresses` to the `Cc` list. Same contract as [`add_to`](Self::add_to).
    pub fn add_cc<I, S>(&mut self, addresses: I) -> Result<(), EmailError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mailboxes = parse_addresses(addresses)?;

        if !self.ignored_after_build("add_cc") {
            self.cc.extend(mailboxes);
        }

        Ok(())
    }

    /// Append `addresses` to the `Bcc` list. Same contract as [`add_to`](Self::add_to).
    pub fn add_bcc<I, S>(&mut self, addresses: I) -> Result<(), EmailError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mailboxes = parse_addresses(addresses)?;

        if !self.ignored_after_build("add_bcc") {
            self.bcc.extend(mailboxes);
        }

        Ok(())
    }

    /// Append `addresses` to the `Reply-To` list. Same contract as [`add_to`](Self::add_to).
    pub fn add_reply_to<I, S>(&mut self, addresses: I) -> Result<(), EmailError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mailboxes = parse_addresses(addresses)?;

        if !self.ignored_after_build("add_reply_to") {
            self.reply_to.extend(mailboxes);
        }

        Ok(())
    }

    /// Append a single `Reply-To` address with a display name
    pub fn add_reply_to_named(&mut self, address: &str, name: &str) -> Result<(), EmailError> {
        let mailbox = EmailAddress::parse_mailbox(address, Some(name))?;

        if !self.ignored_after_build("add_reply_to_named") {
            self.reply_to.push(mailbox);
        }

        Ok(())
    }

    /// Set the sender, replacing any previous one
    pub fn set_from(&mut self, address: &str) -> Result<(), EmailError> {
        let mailbox = EmailAddress::parse_mailbox(address, None)?;

        if !self.ignored_after_build("set_from") {
            self.from = Some(mailbox);
        }

        Ok(())
    }

    /// Set the sender with a display name, replacing any previous one
    pub fn set_from_named(&mut self, address: &str, name: &str) -> Result<(), EmailError> {
        let mailbox = EmailAddress::parse_mailbox(address, Some(name))?;

        if !self.ignored_after_build("set_from_named") {
            self.from = Some(mailbox);
        }

        Ok(())
    }

    /// Add a custom header; a repeated name overwrites the earlier value.
    ///
    /// # Returns
    /// [`Err`] with [`ValidationError::BlankArgument`] if `name` or `value` is blank.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), EmailError> {
        if name.trim().is_empty() || value.trim().is_empty() {
            return Err(ValidationError::BlankArgument.into());
        }

        if !self.ignored_after_build("add_header") {
            self.headers.insert(name, value)?;
        }

        Ok(())
    }

    /// Set the subject
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        if !self.ignored_after_build("set_subject") {
            self.subject = Some(subject.into());
        }
    }

    /// Set the body
    pub fn set_content(&mut self, content: impl Into<Content>) {
        if !self.ignored_after_build("set_content") {
            self.content = Some(content.into());
        }
    }

    /// Set a single-part body with an explicit MIME type.
    ///
    /// `mime_type` replaces any type already on `part`; it is checked by the
    /// transport when the message is rendered.
    pub fn set_content_with_type(&mut self, part: BodyPart, mime_type: &str) {
        let part = BodyPart::with_content_type(part.content(), mime_type);

        self.set_content(part);
    }

    /// Set an explicit send timestamp
    pub fn set_sent_date(&mut self, date: DateTime<Utc>) {
        if !self.ignored_after_build("set_sent_date") {
            self.sent_date = Some(date);
        }
    }

    /// Set the SMTP host. Discards a cached session.
    pub fn set_host_name(&mut self, host_name: impl Into<String>) {
        if !self.ignored_after_build("set_host_name") {
            self.host_name = Some(host_name.into());
            self.session = None;
        }
    }

    /// Set the SMTP port. Discards a cached session.
    ///
    /// # Returns
    /// [`Err`] with [`ValidationError::InvalidPort`] for port `0`.
    pub fn set_smtp_port(&mut self, port: u16) -> Result<(), EmailError> {
        if port == 0 {
            return Err(ValidationError::InvalidPort.into());
        }

        if !self.ignored_after_build("set_smtp_port") {
            self.smtp_port = Some(port);
            self.session = None;
        }

        Ok(())
    }

    /// Set SMTP credentials. Discards a cached session.
    pub fn set_authentication(&mut self, username: impl Into<String>, password: impl Into<String>) {
        if !self.ignored_after_build("set_authentication") {
            self.username = Some(username.into());
            self.password = Some(password.into());
            self.session = None;
        }
    }

    /// Enable or disable STARTTLS. Discards a cached session.
    pub fn set_starttls(&mut self, enabled: bool) {
        if !self.ignored_after_build("set_starttls") {
            self.starttls = enabled;
            self.session = None;
        }
    }

    /// Set the socket connection timeout in milliseconds. Discards a cached session.
    pub fn set_socket_connection_timeout(&mut self, timeout_ms: u64) {
        if !self.ignored_after_build("set_socket_connection_timeout") {
            self.socket_connection_timeout = Some(timeout_ms);
            self.session = None;
        }
    }

    /// Use `session` instead of creating one from the host configuration
    pub fn set_mail_session(&mut self, session: Session) {
        if !self.ignored_after_build("set_mail_session") {
            self.session = Some(session);
        }
    }

    /// The SMTP host
    pub fn host_name(&self) -> Option<&str> {
        self.host_name.as_deref()
    }

    /// The SMTP port
    pub fn smtp_port(&self) -> u16 {
        self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT)
    }

    /// The explicit send timestamp, if one was set
    pub fn sent_date(&self) -> Option<DateTime<Utc>> {
        self.sent_date
    }

    /// The socket connection timeout in milliseconds
    pub fn socket_connection_timeout(&self) -> u64 {
        self.socket_connection_timeout.unwrap_or(SOCKET_TIMEOUT_MS)
    }

    /// The subject
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// The sender
    pub fn from_address(&self) -> Option<&Mailbox> {
        self.from.as_ref()
    }

    /// `To` addresses
    pub fn to_addresses(&self) -> &[Mailbox] {
        &self.to
    }

    /// `Cc` addresses
    pub fn cc_addresses(&self) -> &[Mailbox] {
        &self.cc
    }

    /// `Bcc` addresses
    pub fn bcc_addresses(&self) -> &[Mailbox] {
        &self.bcc
    }

    /// `Reply-To` addresses
    pub fn reply_to_addresses(&self) -> &[Mailbox] {
        &self.reply_to
    }

    /// Custom headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The body
    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Whether [`build`](Self::build) has succeeded
    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    /// The message produced by [`build`](Self::build)
    pub fn mime_message(&self) -> Option<&BuiltMessage> {
        self.built.as_ref()
    }

    fn smtp_config(&self) -> SmtpConfig {
        SmtpConfig {
            host: self.host_name.clone(),
            port: self.smtp_port(),
            username: self.username.clone(),
            password: self.password.clone(),
            starttls: self.starttls,
            connection_timeout_ms: self.socket_connection_timeout(),
        }
    }

    /// The cached session, creating it from the host configuration on first use.
    ///
    /// # Returns
    /// [`Err`] with [`ValidationError::MissingHostName`] if no host name is set
    /// and no session was supplied.
    pub fn mail_session(&mut self) -> Result<&Session, EmailError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => Session::new(&self.smtp_config())?,
        };

        Ok(self.session.insert(session))
    }

    /// Validate the draft and produce the message.
    ///
    /// # Returns
    /// - [`Ok`] with the [`BuiltMessage`] on the first successful call.
    /// - [`Err`] with [`ValidationError::MissingFrom`] if no sender is set.
    /// - [`Err`] with [`ValidationError::MissingRecipients`] if to, cc and bcc are all empty.
    /// - [`Err`] with [`EmailError::AlreadyBuilt`] on every call after a successful one.
    /// - [`Err`] with [`ValidationError::MissingHostName`] if no session can be created.
    pub fn build(&mut self) -> Result<BuiltMessage, EmailError> {
        let from = self.from.clone().ok_or(ValidationError::MissingFrom)?;

        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(ValidationError::MissingRecipients.into());
        }

        if self.built.is_some() {
            debug!("rejecting build: message already built");
            return Err(EmailError::AlreadyBuilt);
        }

        let session = self.mail_session()?.clone();

        let message = BuiltMessage {
            from,
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            reply_to: self.reply_to.clone(),
            subject: self.subject.clone(),
            headers: self.headers.clone(),
            content: self.content.clone(),
            sent_date: self.sent_date.unwrap_or_else(Utc::now),
            session,
        };

        debug!(
            to = message.to.len(),
            cc = message.cc.len(),
            bcc = message.bcc.len(),
            headers = message.headers.len(),
            "built message"
        );

        self.built = Some(message.clone());

        Ok(message)
    }

    /// Build the message and hand it to the session's transport
    #[mutants::skip]
    pub fn send(&mut self) -> Result<BuiltMessage, EmailError> {
        let message = self.build()?;

        message.send_via(message.session())?;

        Ok(message)
    }
}
