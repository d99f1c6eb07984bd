//! Crate-level error types shared by signing, dispatch, and job orchestration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every session surfaces exactly one of these (or a success) to its immediate caller.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credentials were unusable before anything was signed.
	#[error(transparent)]
	SignatureInput(#[from] SignatureInputError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with something that is not a usable envelope.
	#[error(transparent)]
	Response(#[from] ResponseError),

	/// Provider returned a `Response.Error` envelope.
	#[error("Provider rejected the request with {code}: {message}.")]
	Api {
		/// Provider error code, e.g. `AuthFailure.SignatureFailure`.
		code: String,
		/// Provider error message.
		message: String,
		/// Request identifier echoed by the provider, when present.
		request_id: Option<String>,
	},
	/// Submit response carried neither an error nor a usable job identifier.
	#[error("Submit response did not include a job identifier.")]
	MissingJobId {
		/// Request identifier echoed by the provider, when present.
		request_id: Option<String>,
	},
	/// Submit response carried a `JobId` that failed validation.
	#[error("Submit response carried an unusable job identifier.")]
	InvalidJobId {
		/// Request identifier echoed by the provider, when present.
		request_id: Option<String>,
		/// Validation failure.
		#[source]
		source: crate::job::JobIdError,
	},
	/// Job reached the terminal failure status.
	#[error("Job {job_id} failed: {message}.")]
	JobFailed {
		/// Identifier of the failed job.
		job_id: String,
		/// Provider-supplied failure message.
		message: String,
	},
	/// Attempt or deadline bound was exceeded before a terminal status arrived.
	#[error("Job {job_id} did not finish after {attempts} status queries.")]
	PollTimedOut {
		/// Identifier of the job that was still running.
		job_id: String,
		/// Number of status queries issued.
		attempts: u32,
	},
	/// Caller abandoned the session.
	#[error("Operation was cancelled by the caller.")]
	Cancelled,
	/// Provider reported success without any images.
	#[error("Provider reported success but returned no images.")]
	EmptyResult,
}
impl Error {
	/// Returns `true` when retrying the whole operation may succeed.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(_) | Self::PollTimedOut { .. })
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::descriptor::DescriptorError),
	/// Poll policy failed validation.
	#[error(transparent)]
	PollPolicy(#[from] crate::job::PollPolicyError),
	/// Payload could not be serialized to JSON.
	#[error("Request payload could not be serialized.")]
	Payload(#[source] serde_json::Error),
	/// Header value contains bytes the transport refuses.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
	},
	/// Dispatch timeout must be positive.
	#[error("Dispatch timeout must be greater than zero.")]
	ZeroTimeout,
	/// Poll session already reached a terminal state.
	#[error("Poll session for job {job_id} has already finished.")]
	SessionFinished {
		/// Identifier of the finished job.
		job_id: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Missing or empty credential fields, caught before signing.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SignatureInputError {
	/// The secret identifier was empty or whitespace.
	#[error("Secret id cannot be empty.")]
	EmptySecretId,
	/// The secret key was empty or whitespace.
	#[error("Secret key cannot be empty.")]
	EmptySecretKey,
	/// The signing service name was empty.
	#[error("Service name cannot be empty.")]
	EmptyService,
	/// The timestamp cannot be represented as a UTC calendar date.
	#[error("Timestamp {seconds} is outside the representable date range.")]
	TimestampOutOfRange {
		/// Offending Unix timestamp in seconds.
		seconds: i64,
	},
}

/// Transport-level failures (network, IO, timeout). Never retried inside the dispatcher.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The request did not complete within the configured timeout.
	#[error("Request timed out before the provider answered.")]
	Timeout,
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// The provider answered, but not with a decodable envelope.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Body was not a valid response envelope.
	#[error("Provider returned malformed JSON.")]
	Decode {
		/// Structured parsing failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Non-success HTTP status without a decodable error envelope.
	#[error("Provider returned HTTP {status}: {body_preview}.")]
	UnexpectedStatus {
		/// HTTP status code of the response.
		status: u16,
		/// Leading bytes of the body for diagnostics.
		body_preview: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn retryable_classification_covers_transport_and_timeouts() {
		assert!(Error::from(TransportError::Timeout).is_retryable());
		assert!(Error::PollTimedOut { job_id: "1".into(), attempts: 3 }.is_retryable());
		assert!(!Error::Cancelled.is_retryable());
		assert!(
			!Error::Api { code: "InvalidParameter".into(), message: "bad".into(), request_id: None }
				.is_retryable()
		);
	}

	#[test]
	fn api_error_message_includes_code() {
		let err = Error::Api {
			code: "AuthFailure.SignatureFailure".into(),
			message: "The provided credentials could not be validated".into(),
			request_id: Some("req-1".into()),
		};

		assert_eq!(
			err.to_string(),
			"Provider rejected the request with AuthFailure.SignatureFailure: The provided credentials could not be validated."
		);
	}
}
