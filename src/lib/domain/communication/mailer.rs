//! Mailer module

mod errors;

use lettre::Message;

#[cfg(test)]
use mockall::mock;

pub use errors::MailerError;

/// Hands rendered messages to a transport
pub trait Mailer {
    /// Send a rendered message
    ///
    /// # Arguments
    /// * `message` - The transport-ready [`Message`].
    ///
    /// # Returns
    /// A [`Result`] indicating success or failure.
    fn send_message(&self, message: &Message) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Mailer for Mailer {
        fn send_message(&self, message: &Message) -> Result<(), MailerError>;
    }
}
