//! Signed request dispatch: serialize, sign, send, classify.

// crates.io
use serde::Serialize;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	descriptor::RequestDescriptor,
	envelope::ResponseEnvelope,
	error::ConfigError,
	http::{ApiHttpClient, SignedRequest},
	obs,
	sign::{CONTENT_TYPE, CanonicalRequestBuilder, SignatureEngine, Timestamp},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Per-dispatcher transport options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchOptions {
	/// Timeout applied to every request.
	pub timeout: Duration,
}
impl DispatchOptions {
	/// Default request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(35);

	/// Creates options with a validated, non-zero timeout.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		if timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok(Self { timeout })
	}
}
impl Default for DispatchOptions {
	fn default() -> Self {
		Self { timeout: Self::DEFAULT_TIMEOUT }
	}
}

/// Sends signed POSTs and classifies their envelopes.
///
/// The dispatcher holds no per-request state; one instance (and its pooled HTTP client) can be
/// shared across any number of concurrent sessions. Failures are never retried here.
pub struct RequestDispatcher<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	options: DispatchOptions,
}
impl<C> RequestDispatcher<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a dispatcher over the provided transport.
	pub fn new(http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), options: DispatchOptions::default() }
	}

	/// Replaces the transport options.
	pub fn with_options(mut self, options: DispatchOptions) -> Self {
		self.options = options;

		self
	}

	/// Returns the active transport options.
	pub fn options(&self) -> DispatchOptions {
		self.options
	}

	/// Returns the shared transport.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Signs and sends `payload` using the current time.
	pub async fn dispatch<P>(
		&self,
		credentials: &Credentials,
		descriptor: &RequestDescriptor,
		payload: &P,
	) -> Result<ResponseEnvelope>
	where
		P: ?Sized + Serialize,
	{
		let request = self.prepare(credentials, descriptor, payload, Timestamp::now())?;

		self.send(&descriptor.action, request).await
	}

	/// Signs and sends `payload` stamped with `timestamp`.
	pub async fn dispatch_at<P>(
		&self,
		credentials: &Credentials,
		descriptor: &RequestDescriptor,
		payload: &P,
		timestamp: Timestamp,
	) -> Result<ResponseEnvelope>
	where
		P: ?Sized + Serialize,
	{
		let request = self.prepare(credentials, descriptor, payload, timestamp)?;

		self.send(&descriptor.action, request).await
	}

	/// Builds the signed request without sending it.
	///
	/// The payload is serialized exactly once; those bytes are both hashed and transmitted, and
	/// the one `timestamp` feeds both the string-to-sign and `X-TC-Timestamp`.
	pub fn prepare<P>(
		&self,
		credentials: &Credentials,
		descriptor: &RequestDescriptor,
		payload: &P,
		timestamp: Timestamp,
	) -> Result<SignedRequest>
	where
		P: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(payload).map_err(ConfigError::Payload)?;
		let canonical = CanonicalRequestBuilder::post(&descriptor.host, &body).build();
		let signature =
			SignatureEngine::sign(credentials, &descriptor.service, &canonical, timestamp)?;
		let headers = vec![
			("Authorization", signature.authorization),
			("Host", descriptor.host.clone()),
			("Content-Type", CONTENT_TYPE.to_owned()),
			("X-TC-Action", descriptor.action.clone()),
			("X-TC-Timestamp", timestamp.to_string()),
			("X-TC-Version", descriptor.version.clone()),
			("X-TC-Region", descriptor.region.clone()),
		];

		for (name, value) in &headers {
			validate_header_value(name, value)?;
		}

		Ok(SignedRequest { url: descriptor.url.clone(), headers, body, timeout: self.options.timeout })
	}

	async fn send(&self, action: &str, request: SignedRequest) -> Result<ResponseEnvelope> {
		let response = self.http_client.execute(request).await?;

		obs::trace_dispatch(action, response.status);

		ResponseEnvelope::decode(response.status, &response.body)
	}
}
#[cfg(feature = "reqwest")]
impl RequestDispatcher<ReqwestHttpClient> {
	/// Creates a dispatcher backed by the default pooled reqwest client.
	pub fn with_default_client() -> Result<Self> {
		Ok(Self::new(ReqwestHttpClient::new()?))
	}
}
impl<C> Clone for RequestDispatcher<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: Arc::clone(&self.http_client), options: self.options }
	}
}
impl<C> Debug for RequestDispatcher<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestDispatcher").field("options", &self.options).finish()
	}
}

fn validate_header_value(name: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.bytes().all(|b| b == b'\t' || (b' '..=b'~').contains(&b)) {
		Ok(())
	} else {
		Err(ConfigError::InvalidHeader { name })
	}
}
