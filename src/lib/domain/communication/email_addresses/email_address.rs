//! Email Address

use lazy_static::lazy_static;
use lettre::{message::Mailbox, Address};
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

use std::fmt;

use thiserror::Error;

use EmailAddressError::*;

/// An error that can occur when creating an email address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    /// The email address is empty
    #[error("email is empty")]
    EmptyEmailAddress,

    /// The email address is invalid
    #[error("email is invalid: {0}")]
    InvalidEmailAddress(String),
}

/// A syntactically valid mailbox string (`local-part@domain`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(EmptyEmailAddress);
        }

        if !EMAIL_REGEX.is_match(trimmed) {
            return Err(InvalidEmailAddress(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Pair the address with an optional display name, producing a transport mailbox.
    ///
    /// Blank display names are dropped.
    pub fn to_mailbox(&self, name: Option<&str>) -> Result<Mailbox, EmailAddressError> {
        let address: Address = self
            .0
            .parse()
            .map_err(|_| InvalidEmailAddress(self.0.clone()))?;

        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(Mailbox::new(name, address))
    }

    /// Validate `raw` and turn it into a transport mailbox in one step
    pub fn parse_mailbox(raw: &str, name: Option<&str>) -> Result<Mailbox, EmailAddressError> {
        Self::new(raw)?.to_mailbox(name)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
