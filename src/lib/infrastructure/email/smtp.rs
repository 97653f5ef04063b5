//! SMTP session built on `lettre`

use std::{fmt, time::Duration};

use clap::Parser;
use lettre::{transport::smtp::authentication::Credentials, Message, SmtpTransport, Transport};
use tracing::{debug, warn};

use crate::domain::communication::{
    errors::{EmailError, ValidationError},
    mailer::{Mailer, MailerError},
};

/// Default SMTP port
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Default socket connection timeout in milliseconds
pub const SOCKET_TIMEOUT_MS: u64 = 60_000;

/// SMTP configuration
#[derive(Clone, PartialEq, Eq, Parser)]
pub struct SmtpConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST")]
    pub host: Option<String>,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD")]
    pub password: Option<String>,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long = "smtp-starttls", env = "SMTP_STARTTLS")]
    pub starttls: bool,

    /// Socket connection timeout in milliseconds
    #[clap(long = "smtp-timeout-ms", env = "SMTP_TIMEOUT_MS", default_value_t = SOCKET_TIMEOUT_MS)]
    pub connection_timeout_ms: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            starttls: false,
            connection_timeout_ms: SOCKET_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("starttls", &self.starttls)
            .field("connection_timeout_ms", &self.connection_timeout_ms)
            .finish()
    }
}

/// A configured transport session.
///
/// Creating a session opens no connection; `lettre` connects on send.
#[derive(Clone)]
pub struct Session {
    host: String,
    port: u16,
    connection_timeout: Duration,
    transport: SmtpTransport,
}

impl Session {
    /// Create a session from `config`
    ///
    /// # Returns
    /// - [`Ok`] with the [`Session`].
    /// - [`Err`] with [`ValidationError::MissingHostName`] when no host is configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let host = config
            .host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .ok_or(ValidationError::MissingHostName)?;

        let relay = if config.starttls {
            SmtpTransport::starttls_relay(host)?
        } else {
            SmtpTransport::builder_dangerous(host)
        };

        let connection_timeout = Duration::from_millis(config.connection_timeout_ms);

        let mut relay = relay
            .port(config.port)
            .timeout(Some(connection_timeout));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            relay = relay.credentials(Credentials::new(username.clone(), password.clone()));
        }

        debug!(host, port = config.port, "created mail session");

        Ok(Self {
            host: host.to_string(),
            port: config.port,
            connection_timeout,
            transport: relay.build(),
        })
    }

    /// The SMTP host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The SMTP port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The socket connection timeout
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("connection_timeout", &self.connection_timeout)
            .finish_non_exhaustive()
    }
}

impl Mailer for Session {
    fn send_message(&self, message: &Message) -> Result<(), MailerError> {
        match self.transport.send(message) {
            Ok(_) => Ok(()),
            Err(e) if e.is_permanent() || e.is_transient() => {
                warn!(host = %self.host, port = self.port, "server rejected message: {e}");

                Err(MailerError::SendError)
            }
            Err(e) => {
                warn!(host = %self.host, port = self.port, "send failed: {e}");

                Err(MailerError::UnknownError(e.into()))
            }
        }
    }
}
