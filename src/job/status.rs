//! Raw provider status codes and poll session states.

// self
use crate::_prelude::*;

/// Raw status code of a successful job.
pub const STATUS_SUCCEEDED: &str = "5";
/// Raw status code of a failed job.
pub const STATUS_FAILED: &str = "4";

/// Job status derived from the provider's raw status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
	/// Any non-terminal code (queued, processing, or unknown).
	Running,
	/// Code `"5"`.
	Succeeded,
	/// Code `"4"`.
	Failed,
}
impl JobStatus {
	/// Maps a raw code; only `"5"` and `"4"` are terminal.
	pub fn from_code(code: &str) -> Self {
		match code.trim() {
			STATUS_SUCCEEDED => Self::Succeeded,
			STATUS_FAILED => Self::Failed,
			_ => Self::Running,
		}
	}

	/// Returns `true` for statuses from which no further transition occurs.
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::Succeeded | Self::Failed)
	}

	/// Returns a stable label suitable for metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Running => "running",
			Self::Succeeded => "succeeded",
			Self::Failed => "failed",
		}
	}
}
impl Display for JobStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// States of the poll state machine.
///
/// `Submitted -> Polling -> {Succeeded, Failed, TimedOut}`; `Cancelled` and `Errored` end a
/// session early when the caller abandons it or a dispatch fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PollState {
	/// Job id known, no status query issued yet.
	Submitted,
	/// At least one status query issued, no terminal status seen.
	Polling,
	/// Terminal success.
	Succeeded,
	/// Terminal failure reported by the provider.
	Failed,
	/// Attempt or deadline bound exceeded.
	TimedOut,
	/// Caller cancelled the session.
	Cancelled,
	/// A status query failed in transport or was rejected by the provider.
	Errored,
}
impl PollState {
	/// Returns `true` once the session can make no further progress.
	pub const fn is_terminal(self) -> bool {
		!matches!(self, Self::Submitted | Self::Polling)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_four_and_five_are_terminal() {
		assert_eq!(JobStatus::from_code("5"), JobStatus::Succeeded);
		assert_eq!(JobStatus::from_code("4"), JobStatus::Failed);

		for code in ["0", "1", "2", "3", "6", "", "RUN", "50"] {
			assert_eq!(JobStatus::from_code(code), JobStatus::Running, "code {code:?}");
		}

		assert!(JobStatus::Succeeded.is_terminal());
		assert!(!JobStatus::Running.is_terminal());
	}

	#[test]
	fn poll_state_terminality() {
		assert!(!PollState::Submitted.is_terminal());
		assert!(!PollState::Polling.is_terminal());

		for state in [
			PollState::Succeeded,
			PollState::Failed,
			PollState::TimedOut,
			PollState::Cancelled,
			PollState::Errored,
		] {
			assert!(state.is_terminal());
		}
	}
}
