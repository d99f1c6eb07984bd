//! Asynchronous job protocol: submit, poll to a terminal status, extract results.
//!
//! [`JobSubmitter`] turns a payload into a [`JobId`] (or an error that stops the session before
//! any poll is issued). [`JobPoller`] drives a bounded [`PollSession`] state machine, and
//! [`ResultExtractor`] maps the terminal success into a [`GenerationResult`].

pub mod extract;
pub mod id;
pub mod metrics;
pub mod payload;
pub mod poll;
pub mod policy;
pub mod status;
pub mod submit;

pub use extract::*;
pub use id::*;
pub use metrics::*;
pub use payload::*;
pub use poll::*;
pub use policy::*;
pub use status::*;
pub use submit::*;
