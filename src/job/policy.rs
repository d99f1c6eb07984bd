//! Bounds for the poll state machine.

// self
use crate::_prelude::*;

/// Errors raised while validating a [`PollPolicy`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PollPolicyError {
	/// At least one status query is required.
	#[error("Poll policy must allow at least one attempt.")]
	ZeroAttempts,
	/// Interval must be positive.
	#[error("Poll interval must be greater than zero.")]
	ZeroInterval,
	/// Overall timeout, when set, must be positive.
	#[error("Poll timeout must be greater than zero.")]
	ZeroTimeout,
}

/// Attempt, interval, and deadline bounds for one poll session.
///
/// Every session is finite: it stops after `max_attempts` status queries or once `timeout` has
/// elapsed since the session started, whichever comes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
	/// Delay between consecutive status queries.
	pub interval: Duration,
	/// Maximum number of status queries.
	pub max_attempts: u32,
	/// Wall-clock budget for the whole session.
	pub timeout: Option<Duration>,
}
impl PollPolicy {
	/// Default delay between status queries.
	pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
	/// Default attempt bound.
	pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;
	/// Default session budget.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

	/// Returns a builder seeded with the defaults.
	pub fn builder() -> PollPolicyBuilder {
		PollPolicyBuilder::default()
	}
}
impl Default for PollPolicy {
	fn default() -> Self {
		Self {
			interval: Self::DEFAULT_INTERVAL,
			max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
			timeout: Some(Self::DEFAULT_TIMEOUT),
		}
	}
}

/// Builder for [`PollPolicy`] values.
#[derive(Clone, Debug)]
pub struct PollPolicyBuilder {
	policy: PollPolicy,
}
impl PollPolicyBuilder {
	/// Overrides the delay between status queries.
	pub fn interval(mut self, interval: Duration) -> Self {
		self.policy.interval = interval;

		self
	}

	/// Overrides the attempt bound.
	pub fn max_attempts(mut self, max_attempts: u32) -> Self {
		self.policy.max_attempts = max_attempts;

		self
	}

	/// Overrides the session budget.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.policy.timeout = Some(timeout);

		self
	}

	/// Removes the wall-clock budget; the attempt bound still applies.
	pub fn without_timeout(mut self) -> Self {
		self.policy.timeout = None;

		self
	}

	/// Validates and returns the policy.
	pub fn build(self) -> Result<PollPolicy, PollPolicyError> {
		let policy = self.policy;

		if policy.max_attempts == 0 {
			return Err(PollPolicyError::ZeroAttempts);
		}
		if policy.interval.is_zero() {
			return Err(PollPolicyError::ZeroInterval);
		}
		if policy.timeout.is_some_and(|timeout| timeout.is_zero()) {
			return Err(PollPolicyError::ZeroTimeout);
		}

		Ok(policy)
	}
}
impl Default for PollPolicyBuilder {
	fn default() -> Self {
		Self { policy: PollPolicy::default() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_observed_provider_cadence() {
		let policy = PollPolicy::builder().build().expect("Default policy should be valid.");

		assert_eq!(policy.interval, Duration::from_millis(500));
		assert_eq!(policy.max_attempts, 120);
		assert_eq!(policy.timeout, Some(Duration::from_secs(60)));
	}

	#[test]
	fn build_rejects_unbounded_or_degenerate_policies() {
		assert_eq!(
			PollPolicy::builder().max_attempts(0).build(),
			Err(PollPolicyError::ZeroAttempts)
		);
		assert_eq!(
			PollPolicy::builder().interval(Duration::ZERO).build(),
			Err(PollPolicyError::ZeroInterval)
		);
		assert_eq!(
			PollPolicy::builder().timeout(Duration::ZERO).build(),
			Err(PollPolicyError::ZeroTimeout)
		);

		let policy = PollPolicy::builder()
			.max_attempts(5)
			.without_timeout()
			.build()
			.expect("Attempt-bounded policy should be valid.");

		assert_eq!(policy.timeout, None);
		assert_eq!(policy.max_attempts, 5);
	}
}
