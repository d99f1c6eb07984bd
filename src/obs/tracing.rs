// self
use crate::{_prelude::*, obs::OpKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by orchestration entry points.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("tc3_jobs.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `debug` event for one status query.
pub fn trace_poll_attempt(job_id: &str, attempt: u32, status_code: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(job_id, attempt, status_code, "polled job status");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (job_id, attempt, status_code);
	}
}

/// Emits a `debug` event for one dispatched request.
pub fn trace_dispatch(action: &str, status: u16) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(action, status, "dispatched signed request");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (action, status);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn op_span_noop_without_tracing() {
		let span = OpSpan::new(OpKind::Submit, "test");

		trace_poll_attempt("1", 1, "0");
		trace_dispatch("SubmitHunyuanImageJob", 200);

		let _ = span;
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OpSpan::new(OpKind::Poll, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
