//! Per-client poll counters.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters describing poll sessions driven through one client.
#[derive(Debug, Default)]
pub struct PollMetrics {
	sessions: AtomicU64,
	queries: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl PollMetrics {
	/// Returns the number of poll sessions started.
	pub fn sessions(&self) -> u64 {
		self.sessions.load(Ordering::Relaxed)
	}

	/// Returns the number of status queries dispatched across all sessions.
	pub fn queries(&self) -> u64 {
		self.queries.load(Ordering::Relaxed)
	}

	/// Returns the number of sessions that reached `Succeeded`.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of sessions that ended in any other terminal state.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_session(&self) {
		self.sessions.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_query(&self) {
		self.queries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
