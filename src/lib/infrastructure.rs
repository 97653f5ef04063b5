//! Transport plumbing

pub mod email;
