//! TC3-HMAC-SHA256 request signing plus a bounded submit-then-poll orchestrator for asynchronous
//! cloud image-generation jobs.
//!
//! Data flows strictly downward: [`auth::Credentials`] + [`descriptor::RequestDescriptor`] feed
//! [`sign::CanonicalRequestBuilder`] and [`sign::SignatureEngine`], whose output is dispatched by
//! [`dispatch::RequestDispatcher`]. [`job::JobSubmitter`] and [`job::JobPoller`] drive the job
//! protocol on top of the dispatcher, and [`job::ResultExtractor`] turns a terminal success into
//! caller-visible image references. [`client::JobClient`] ties the pieces together.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod descriptor;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod http;
pub mod job;
pub mod obs;
pub mod sign;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		auth::Credentials,
		client::JobClient,
		descriptor::{DescriptorPreset, RequestDescriptor},
		error::TransportError,
		http::{ApiHttpClient, HttpFuture, RawResponse, SignedRequest},
		job::PollPolicy,
	};

	/// Secret identifier shared by the test fixtures.
	pub const TEST_SECRET_ID: &str = "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE";
	/// Secret key shared by the test fixtures.
	pub const TEST_SECRET_KEY: &str = "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE";

	/// Builds the credential pair used across tests.
	pub fn test_credentials() -> Credentials {
		Credentials::new(TEST_SECRET_ID, TEST_SECRET_KEY)
	}

	/// One scripted reply served by [`ScriptedHttpClient`].
	#[derive(Debug)]
	pub enum ScriptedReply {
		/// Serve a JSON body with the given HTTP status.
		Body {
			/// HTTP status code.
			status: u16,
			/// Raw response body.
			body: String,
		},
		/// Fail the request at the transport layer.
		Timeout,
		/// Never answer.
		Stall,
	}
	impl ScriptedReply {
		/// A `200 OK` reply carrying `body`.
		pub fn ok(body: impl Into<String>) -> Self {
			Self::Body { status: 200, body: body.into() }
		}

		/// A query reply reporting `code` as the raw job status.
		pub fn status(code: &str) -> Self {
			Self::ok(format!(
				"{{\"Response\":{{\"JobStatusCode\":\"{code}\",\"JobStatusMsg\":\"status-{code}\",\"RequestId\":\"req-{code}\"}}}}"
			))
		}
	}

	/// Test double for [`ApiHttpClient`] that replays a fixed script of replies per action and
	/// records every request it receives.
	///
	/// Replies are keyed by the `X-TC-Action` header so submit and query traffic can be scripted
	/// independently. Once a script runs dry the last reply for that action is repeated.
	#[derive(Clone, Debug, Default)]
	pub struct ScriptedHttpClient {
		scripts: Arc<Mutex<HashMap<String, VecDeque<ScriptedReply>>>>,
		last: Arc<Mutex<HashMap<String, String>>>,
		requests: Arc<Mutex<Vec<SignedRequest>>>,
	}
	impl ScriptedHttpClient {
		/// Appends replies for `action`.
		pub fn script(self, action: &str, replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
			self.scripts.lock().entry(action.to_owned()).or_default().extend(replies);

			self
		}

		/// Appends one query reply per status code.
		pub fn statuses(self, action: &str, codes: &[&str]) -> Self {
			self.script(action, codes.iter().map(|code| ScriptedReply::status(code)))
		}

		/// Returns every request executed so far.
		pub fn requests(&self) -> Vec<SignedRequest> {
			self.requests.lock().clone()
		}

		/// Counts executed requests for `action`.
		pub fn calls(&self, action: &str) -> usize {
			self.requests
				.lock()
				.iter()
				.filter(|request| request.header("X-TC-Action") == Some(action))
				.count()
		}
	}
	impl ApiHttpClient for ScriptedHttpClient {
		fn execute(&self, request: SignedRequest) -> HttpFuture<'_> {
			let action = request.header("X-TC-Action").unwrap_or_default().to_owned();

			self.requests.lock().push(request);

			let reply = self.scripts.lock().get_mut(&action).and_then(VecDeque::pop_front);
			let reply = match reply {
				Some(ScriptedReply::Body { status, body }) => {
					self.last.lock().insert(action, body.clone());

					Ok(RawResponse { status, body: body.into_bytes() })
				},
				Some(ScriptedReply::Timeout) => Err(TransportError::Timeout),
				Some(ScriptedReply::Stall) =>
					return Box::pin(std::future::pending::<Result<RawResponse, TransportError>>()),
				None => match self.last.lock().get(&action) {
					Some(body) => Ok(RawResponse { status: 200, body: body.clone().into_bytes() }),
					None => Err(TransportError::network(std::io::Error::other(format!(
						"no scripted reply for action `{action}`"
					)))),
				},
			};

			Box::pin(async move { reply })
		}
	}

	/// Builds a Hunyuan job client over `http_client` using the test credentials.
	pub fn build_scripted_client(
		http_client: ScriptedHttpClient,
		policy: PollPolicy,
	) -> JobClient<ScriptedHttpClient> {
		let submit = RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
			.build()
			.expect("Hunyuan submit preset should build.");

		JobClient::<ScriptedHttpClient>::with_http_client(submit, test_credentials(), http_client)
			.expect("Hunyuan submit preset should pair with its query action.")
			.with_poll_policy(policy)
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> crate::http::ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		crate::http::ReqwestHttpClient::with_client(client)
	}
}

mod _prelude {
	#[cfg(any(test, feature = "test"))]
	pub use std::collections::HashMap;
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	#[cfg(any(test, feature = "test"))]
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
