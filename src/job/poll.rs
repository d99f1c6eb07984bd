//! Bounded status polling.
//!
//! Each [`PollSession`] owns its attempt counter, deadline, and state, so any number of sessions
//! can be driven concurrently over one shared dispatcher without observing each other. A session
//! ends in exactly one terminal [`PollState`] and issues no query after reaching it. The session
//! deadline also bounds the sleep between attempts and any status query still in flight.

// crates.io
use serde::Deserializer;
use serde_json::Value;
use tokio::time::{self, Instant};
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	descriptor::RequestDescriptor,
	dispatch::RequestDispatcher,
	error::ConfigError,
	http::ApiHttpClient,
	job::{JobId, JobQuery, JobStatus, PollMetrics, PollPolicy, PollState},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Status-query members the poller reads from a success envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryFields {
	/// Raw status code; `"5"` and `"4"` are terminal.
	#[serde(default, deserialize_with = "deserialize_code")]
	pub job_status_code: Option<String>,
	/// Human-readable status.
	#[serde(default)]
	pub job_status_msg: Option<String>,
	/// Provider failure code for failed jobs.
	#[serde(default)]
	pub job_error_code: Option<String>,
	/// Provider failure message for failed jobs.
	#[serde(default)]
	pub job_error_msg: Option<String>,
	/// Result images (URLs or base64) once the job succeeded.
	#[serde(default, deserialize_with = "deserialize_list")]
	pub result_image: Vec<String>,
	/// Per-image result details.
	#[serde(default, deserialize_with = "deserialize_list")]
	pub result_details: Vec<String>,
	/// Prompts after provider-side rewriting.
	#[serde(default, deserialize_with = "deserialize_list")]
	pub revised_prompt: Vec<String>,
}

/// Snapshot of a job at the moment polling stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
	/// Job identifier.
	pub job_id: JobId,
	/// Derived status.
	pub status: JobStatus,
	/// Raw status code as reported.
	pub status_code: String,
	/// Result images (URLs or base64).
	pub result_images: Vec<String>,
	/// Per-image result details.
	pub result_details: Vec<String>,
	/// Prompts after provider-side rewriting.
	pub revised_prompts: Vec<String>,
	/// Failure message, for failed jobs.
	pub error_message: Option<String>,
	/// Request identifier of the query that observed this snapshot.
	pub request_id: Option<String>,
}
impl Job {
	fn from_fields(job_id: JobId, request_id: Option<String>, fields: QueryFields) -> Self {
		let status_code = fields.job_status_code.unwrap_or_default();
		let status = JobStatus::from_code(&status_code);
		let error_message = match status {
			JobStatus::Failed => Some(
				fields
					.job_error_msg
					.filter(|msg| !msg.is_empty())
					.or(fields.job_status_msg.filter(|msg| !msg.is_empty()))
					.unwrap_or_else(|| "job failed without a provider message".into()),
			),
			_ => None,
		};

		Self {
			job_id,
			status,
			status_code,
			result_images: fields.result_image,
			result_details: fields.result_details,
			revised_prompts: fields.revised_prompt,
			error_message,
			request_id,
		}
	}
}

/// Attempt counter, deadline, and state of one job's polling.
#[derive(Clone, Debug)]
pub struct PollSession {
	job_id: JobId,
	attempts: u32,
	state: PollState,
	policy: PollPolicy,
	deadline: Option<Instant>,
}
impl PollSession {
	/// Starts a session for `job_id`; the deadline is measured from now.
	pub fn new(job_id: JobId, policy: PollPolicy) -> Self {
		let deadline = policy.timeout.map(|timeout| Instant::now() + timeout);

		Self { job_id, attempts: 0, state: PollState::Submitted, policy, deadline }
	}

	/// Job being polled.
	pub fn job_id(&self) -> &JobId {
		&self.job_id
	}

	/// Number of status queries issued so far.
	pub fn attempts(&self) -> u32 {
		self.attempts
	}

	/// Current state.
	pub fn state(&self) -> PollState {
		self.state
	}

	/// Bounds this session runs under.
	pub fn policy(&self) -> &PollPolicy {
		&self.policy
	}

	/// Instant after which no further attempt is scheduled, if the policy has a timeout.
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	fn begin_attempt(&mut self) {
		self.attempts += 1;
		self.state = PollState::Polling;
	}

	fn can_retry(&self) -> bool {
		self.attempts < self.policy.max_attempts && !self.deadline_passed()
	}

	fn deadline_passed(&self) -> bool {
		self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
	}

	fn next_wake(&self) -> Instant {
		let wake = Instant::now() + self.policy.interval;

		self.deadline.map_or(wake, |deadline| wake.min(deadline))
	}

	fn time_out(&mut self) -> Error {
		self.finish(PollState::TimedOut);

		Error::PollTimedOut { job_id: self.job_id.to_string(), attempts: self.attempts }
	}

	fn finish(&mut self, state: PollState) {
		debug_assert!(state.is_terminal());

		if !self.state.is_terminal() {
			self.state = state;
		}
	}
}

/// Drives status queries for submitted jobs until they reach a terminal state.
#[derive(Debug)]
pub struct JobPoller<'a, C>
where
	C: ?Sized + ApiHttpClient,
{
	dispatcher: &'a RequestDispatcher<C>,
	descriptor: &'a RequestDescriptor,
	credentials: &'a Credentials,
	policy: PollPolicy,
	metrics: Option<&'a PollMetrics>,
}
impl<'a, C> JobPoller<'a, C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a poller for the query action described by `descriptor`.
	pub fn new(
		dispatcher: &'a RequestDispatcher<C>,
		descriptor: &'a RequestDescriptor,
		credentials: &'a Credentials,
		policy: PollPolicy,
	) -> Self {
		Self { dispatcher, descriptor, credentials, policy, metrics: None }
	}

	/// Records session outcomes into `metrics`.
	pub fn with_metrics(mut self, metrics: &'a PollMetrics) -> Self {
		self.metrics = Some(metrics);

		self
	}

	/// Opens a session for `job_id` under this poller's policy.
	pub fn session(&self, job_id: JobId) -> PollSession {
		PollSession::new(job_id, self.policy)
	}

	/// Polls `job_id` until it succeeds, fails, times out, or `cancel` fires.
	pub async fn poll(&self, job_id: JobId, cancel: &CancellationToken) -> Result<Job> {
		let mut session = self.session(job_id);

		self.drive(&mut session, cancel).await
	}

	/// Drives an existing session to its terminal state.
	///
	/// Returns the succeeded [`Job`], or [`Error::JobFailed`], [`Error::PollTimedOut`],
	/// [`Error::Cancelled`], or the dispatch error that stopped the session. Driving a session
	/// that already finished fails with [`ConfigError::SessionFinished`] without issuing a query.
	pub async fn drive(&self, session: &mut PollSession, cancel: &CancellationToken) -> Result<Job> {
		if session.state.is_terminal() {
			return Err(ConfigError::SessionFinished { job_id: session.job_id.to_string() }.into());
		}

		let span = OpSpan::new(OpKind::Poll, "drive");

		obs::record_op_outcome(OpKind::Poll, OpOutcome::Attempt);

		if let Some(metrics) = self.metrics {
			metrics.record_session();
		}

		let result = span.instrument(self.run(session, cancel)).await;

		obs::record_result(OpKind::Poll, &result);

		if let Some(metrics) = self.metrics {
			match result {
				Ok(_) => metrics.record_success(),
				Err(_) => metrics.record_failure(),
			}
		}

		result
	}

	async fn run(&self, session: &mut PollSession, cancel: &CancellationToken) -> Result<Job> {
		let job_id = session.job_id.clone();
		let query = JobQuery { job_id: &job_id };

		loop {
			if cancel.is_cancelled() {
				session.finish(PollState::Cancelled);

				return Err(Error::Cancelled);
			}

			session.begin_attempt();

			if let Some(metrics) = self.metrics {
				metrics.record_query();
			}

			let dispatched = tokio::select! {
				biased;
				_ = cancel.cancelled() => None,
				_ = deadline_elapsed(session.deadline) => Some(None),
				result = self.dispatcher.dispatch(self.credentials, self.descriptor, &query) => Some(Some(result)),
			};
			let dispatched = match dispatched {
				Some(Some(dispatched)) => dispatched,
				Some(None) => return Err(session.time_out()),
				None => {
					session.finish(PollState::Cancelled);

					return Err(Error::Cancelled);
				},
			};
			let decoded = dispatched.and_then(|envelope| {
				let request_id = envelope.request_id.clone();

				envelope.into_fields::<QueryFields>().map(|fields| (request_id, fields))
			});
			let (request_id, fields) = match decoded {
				Ok(decoded) => decoded,
				Err(e) => {
					session.finish(PollState::Errored);

					return Err(e);
				},
			};
			let job = Job::from_fields(job_id.clone(), request_id, fields);

			obs::trace_poll_attempt(&job_id, session.attempts, &job.status_code);
			obs::record_poll_attempt(job.status);

			match job.status {
				JobStatus::Succeeded => {
					session.finish(PollState::Succeeded);

					return Ok(job);
				},
				JobStatus::Failed => {
					session.finish(PollState::Failed);

					return Err(Error::JobFailed {
						job_id: job_id.to_string(),
						message: job.error_message.unwrap_or_default(),
					});
				},
				JobStatus::Running => {},
			}

			if !session.can_retry() {
				return Err(session.time_out());
			}

			let cancelled = tokio::select! {
				biased;
				_ = cancel.cancelled() => true,
				_ = time::sleep_until(session.next_wake()) => false,
			};

			if cancelled {
				session.finish(PollState::Cancelled);

				return Err(Error::Cancelled);
			}
			if session.deadline_passed() {
				return Err(session.time_out());
			}
		}
	}
}

async fn deadline_elapsed(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => time::sleep_until(deadline).await,
		None => std::future::pending().await,
	}
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		Some(Value::String(code)) => Some(code),
		Some(Value::Number(code)) => Some(code.to_string()),
		_ => None,
	})
}

fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum OneOrMany {
		One(String),
		Many(Vec<String>),
	}

	Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
		Some(OneOrMany::One(value)) if value.is_empty() => Vec::new(),
		Some(OneOrMany::One(value)) => vec![value],
		Some(OneOrMany::Many(values)) => values,
		None => Vec::new(),
	})
}
