//! Optional observability helpers for signing and job orchestration.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `tc3_jobs.op` with the `op` and `stage`
//!   fields, plus `debug` events for every poll attempt.
//! - Enable `metrics` to increment `tc3_jobs_op_total` for every attempt/success/failure
//!   (labeled by `op` + `outcome`) and `tc3_jobs_poll_attempt_total` (labeled by `status`).
//!
//! Credentials and signatures are never recorded.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Job submission.
	Submit,
	/// Status polling for one job.
	Poll,
	/// Submit, poll, and extract as one unit.
	Generate,
	/// One-shot synchronous generation.
	TextToImage,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Submit => "submit",
			OpKind::Poll => "poll",
			OpKind::Generate => "generate",
			OpKind::TextToImage => "text_to_image",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the success/failure label for a finished operation.
pub(crate) fn record_result<T>(kind: OpKind, result: &Result<T>) {
	match result {
		Ok(_) => record_op_outcome(kind, OpOutcome::Success),
		Err(_) => record_op_outcome(kind, OpOutcome::Failure),
	}
}
