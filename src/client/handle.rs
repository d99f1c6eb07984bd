//! Background generation handles.

// crates.io
use tokio::task::JoinHandle;
// self
use crate::{_prelude::*, job::GenerationResult};

/// Handle to a generation running on a background task.
///
/// Dropping the handle cancels the task; call [`GenerationHandle::join`] to wait for its result.
#[derive(Debug)]
pub struct GenerationHandle {
	task: Option<JoinHandle<Result<GenerationResult>>>,
	cancel: CancellationToken,
}
impl GenerationHandle {
	pub(crate) fn new(task: JoinHandle<Result<GenerationResult>>, cancel: CancellationToken) -> Self {
		Self { task: Some(task), cancel }
	}

	/// Requests cancellation; the task stops at its next suspension point.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns a token that cancels this generation when triggered.
	pub fn cancellation_token(&self) -> CancellationToken {
		self.cancel.clone()
	}

	/// Returns `true` once the background task has finished.
	pub fn is_finished(&self) -> bool {
		self.task.as_ref().is_none_or(JoinHandle::is_finished)
	}

	/// Waits for the generation to finish.
	///
	/// A task that was aborted by the runtime reports [`Error::Cancelled`]; a panic inside the
	/// task is resumed on the caller.
	pub async fn join(mut self) -> Result<GenerationResult> {
		let Some(task) = self.task.take() else {
			return Err(Error::Cancelled);
		};

		match task.await {
			Ok(result) => result,
			Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
			Err(_) => Err(Error::Cancelled),
		}
	}
}
impl Drop for GenerationHandle {
	fn drop(&mut self) {
		if self.task.is_some() {
			self.cancel.cancel();
		}
	}
}
