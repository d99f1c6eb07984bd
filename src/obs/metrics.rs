// self
use crate::{
	job::JobStatus,
	obs::{OpKind, OpOutcome},
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"tc3_jobs_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records one status query labeled by the status it observed.
pub fn record_poll_attempt(status: JobStatus) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("tc3_jobs_poll_attempt_total", "status" => status.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = status;
	}
}
