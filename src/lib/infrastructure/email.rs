//! Email transport

pub mod smtp;
