//! Caller-supplied credentials.

pub mod credentials;

pub use credentials::*;
