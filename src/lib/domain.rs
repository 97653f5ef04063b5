//! Domain types for composing messages

pub mod communication;
