//! Error types for the email module

use lettre::transport::smtp;
use thiserror::Error;
use tracing::debug;

use crate::domain::communication::{
    email_addresses::EmailAddressError, mailer::MailerError,
};

/// Input that does not satisfy a precondition of the builder.
///
/// Recoverable: fix the input and retry the same operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// An address list was given no addresses
    #[error("address list must not be empty")]
    EmptyAddressList,

    /// An address is not a valid mailbox
    #[error(transparent)]
    InvalidAddress(#[from] EmailAddressError),

    /// A header name or value was empty or blank
    #[error("argument must not be blank")]
    BlankArgument,

    /// No from address was set before building
    #[error("from address must be set")]
    MissingFrom,

    /// None of the to, cc or bcc lists holds an address
    #[error("at least one receiver address required")]
    MissingRecipients,

    /// A session was required but no host name is configured
    #[error("cannot find valid hostname for mail session")]
    MissingHostName,

    /// The SMTP port is outside 1-65535
    #[error("SMTP port must be in the range 1-65535")]
    InvalidPort,

    /// A multipart container has no parts
    #[error("multipart content must hold at least one part")]
    EmptyMultipart,

    /// The transport rejected a header name
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// The transport rejected a MIME type
    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    /// A custom header would duplicate one written by the message content
    #[error("header {0} is set by the message content")]
    ConflictingHeader(String),
}

/// Email errors
#[derive(Debug, Error)]
pub enum EmailError {
    /// Invalid input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `build` was called on a message that was already built
    #[error("message already built")]
    AlreadyBuilt,

    /// The mailer could not deliver the message
    #[error(transparent)]
    Mailer(#[from] MailerError),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for EmailError {
    fn from(err: anyhow::Error) -> Self {
        EmailError::UnknownError(err)
    }
}

impl From<EmailAddressError> for EmailError {
    fn from(err: EmailAddressError) -> Self {
        EmailError::Validation(err.into())
    }
}

impl From<lettre::error::Error> for EmailError {
    fn from(err: lettre::error::Error) -> Self {
        debug!("lettre::error::Error -> EmailError");

        EmailError::UnknownError(err.into())
    }
}

impl From<smtp::Error> for EmailError {
    fn from(err: smtp::Error) -> Self {
        debug!("smtp::Error -> EmailError");

        EmailError::UnknownError(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_argument_message() {
        assert_eq!(
            EmailError::from(ValidationError::BlankArgument).to_string(),
            "argument must not be blank"
        );
    }

    #[test]
    fn test_already_built_message() {
        assert_eq!(EmailError::AlreadyBuilt.to_string(), "message already built");
    }

    #[test]
    fn test_address_error_becomes_validation_error() {
        let err = EmailError::from(EmailAddressError::EmptyEmailAddress);

        assert!(matches!(
            err,
            EmailError::Validation(ValidationError::InvalidAddress(
                EmailAddressError::EmptyEmailAddress
            ))
        ));
    }
}
