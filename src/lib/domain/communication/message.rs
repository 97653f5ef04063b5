//! Message composition: the builder and the message it produces.

mod builder;
mod built;

pub use builder::MessageBuilder;
pub use built::{BuiltMessage, RecipientType};
