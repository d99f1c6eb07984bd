//! Orchestration facade tying signing, dispatch, and the job protocol together.

pub mod handle;

pub use handle::*;

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	descriptor::RequestDescriptor,
	dispatch::{DispatchOptions, RequestDispatcher},
	http::ApiHttpClient,
	job::{
		GenerationResult, JobPoller, JobSubmitter, PollMetrics, PollPolicy, ResultExtractor,
	},
	obs::{self, OpKind, OpOutcome, OpSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Job client specialized for the crate's default reqwest transport.
pub type ReqwestJobClient = JobClient<ReqwestHttpClient>;

/// Runs submit-then-poll generations against one asynchronous action pair.
///
/// The client owns the dispatcher (and through it the pooled HTTP transport), the submit/query
/// descriptor pair, and the caller's credentials. It is cheap to clone; clones share the
/// transport and [`PollMetrics`] but every generation gets its own poll session.
pub struct JobClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Dispatcher shared by every generation.
	pub dispatcher: RequestDispatcher<C>,
	/// Descriptor of the submit action.
	pub submit_descriptor: RequestDescriptor,
	/// Descriptor of the matching status-query action.
	pub query_descriptor: RequestDescriptor,
	/// Bounds applied to every poll session.
	pub poll_policy: PollPolicy,
	/// Shared counters for poll outcomes.
	pub poll_metrics: Arc<PollMetrics>,
	credentials: Credentials,
}
impl<C> JobClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client over the caller-provided transport.
	///
	/// The query descriptor is derived from `submit_descriptor`; actions without a `Query*`
	/// counterpart are rejected.
	pub fn with_http_client(
		submit_descriptor: RequestDescriptor,
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let query_descriptor =
			submit_descriptor.query_descriptor().map_err(crate::error::ConfigError::from)?;

		Ok(Self {
			dispatcher: RequestDispatcher::new(http_client),
			submit_descriptor,
			query_descriptor,
			poll_policy: PollPolicy::default(),
			poll_metrics: Default::default(),
			credentials,
		})
	}

	/// Replaces the query descriptor, for providers that break the `Submit*`/`Query*` pairing.
	pub fn with_query_descriptor(mut self, descriptor: RequestDescriptor) -> Self {
		self.query_descriptor = descriptor;

		self
	}

	/// Replaces the poll bounds.
	pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
		self.poll_policy = policy;

		self
	}

	/// Replaces the transport options.
	pub fn with_dispatch_options(mut self, options: DispatchOptions) -> Self {
		self.dispatcher = self.dispatcher.with_options(options);

		self
	}

	/// Returns the credentials used for signing.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Borrows a submitter bound to the submit descriptor.
	pub fn submitter(&self) -> JobSubmitter<'_, C> {
		JobSubmitter::new(&self.dispatcher, &self.submit_descriptor, &self.credentials)
	}

	/// Borrows a poller bound to the query descriptor and this client's metrics.
	pub fn poller(&self) -> JobPoller<'_, C> {
		JobPoller::new(&self.dispatcher, &self.query_descriptor, &self.credentials, self.poll_policy)
			.with_metrics(&self.poll_metrics)
	}

	/// Submits `payload`, polls the job to a terminal state, and extracts its images.
	///
	/// The submit response completes strictly before the first status query. Submit failures
	/// are returned without polling.
	pub async fn generate<P>(&self, payload: &P, cancel: &CancellationToken) -> Result<GenerationResult>
	where
		P: ?Sized + Serialize,
	{
		let span = OpSpan::new(OpKind::Generate, "generate");

		obs::record_op_outcome(OpKind::Generate, OpOutcome::Attempt);

		let result = span
			.instrument(async {
				if cancel.is_cancelled() {
					return Err(Error::Cancelled);
				}

				let submitter = self.submitter();
				let submitted = tokio::select! {
					biased;
					_ = cancel.cancelled() => None,
					job_id = submitter.submit(payload) => Some(job_id),
				};
				let job_id = submitted.ok_or(Error::Cancelled)??;
				let job = self.poller().poll(job_id, cancel).await?;

				ResultExtractor::from_job(job)
			})
			.await;

		obs::record_result(OpKind::Generate, &result);

		result
	}

	/// Runs [`JobClient::generate`] on a background task.
	///
	/// The returned handle cancels the task when dropped, so abandoning it never leaks the poll
	/// loop or its connection.
	pub fn spawn_generation<P>(&self, payload: P) -> GenerationHandle
	where
		P: 'static + Send + Sync + Serialize,
	{
		let client = self.clone();
		let cancel = CancellationToken::new();
		let task_cancel = cancel.clone();
		let task = tokio::spawn(async move { client.generate(&payload, &task_cancel).await });

		GenerationHandle::new(task, cancel)
	}

	/// Calls a synchronous generation action (e.g. `TextToImage`) with this client's credentials.
	///
	/// `descriptor` names the synchronous action; its success envelope carries `ImgUrl` or
	/// `ResultImage` directly.
	pub async fn text_to_image<P>(
		&self,
		descriptor: &RequestDescriptor,
		payload: &P,
	) -> Result<GenerationResult>
	where
		P: ?Sized + Serialize,
	{
		let span = OpSpan::new(OpKind::TextToImage, "text_to_image");

		obs::record_op_outcome(OpKind::TextToImage, OpOutcome::Attempt);

		let result = span
			.instrument(async {
				let envelope = self.dispatcher.dispatch(&self.credentials, descriptor, payload).await?;

				ResultExtractor::from_envelope(envelope)
			})
			.await;

		obs::record_result(OpKind::TextToImage, &result);

		result
	}
}
#[cfg(feature = "reqwest")]
impl JobClient<ReqwestHttpClient> {
	/// Creates a client that provisions its own pooled reqwest transport.
	pub fn new(submit_descriptor: RequestDescriptor, credentials: Credentials) -> Result<Self> {
		Self::with_http_client(submit_descriptor, credentials, ReqwestHttpClient::new()?)
	}
}
impl<C> Clone for JobClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			dispatcher: self.dispatcher.clone(),
			submit_descriptor: self.submit_descriptor.clone(),
			query_descriptor: self.query_descriptor.clone(),
			poll_policy: self.poll_policy,
			poll_metrics: Arc::clone(&self.poll_metrics),
			credentials: self.credentials.clone(),
		}
	}
}
impl<C> Debug for JobClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JobClient")
			.field("submit_descriptor", &self.submit_descriptor)
			.field("query_descriptor", &self.query_descriptor)
			.field("poll_policy", &self.poll_policy)
			.field("credentials", &self.credentials)
			.finish()
	}
}
