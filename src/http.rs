//! Transport primitives for signed provider calls.
//!
//! [`ApiHttpClient`] is the crate's only dependency on an HTTP stack. The dispatcher hands it a
//! fully signed [`SignedRequest`] and expects a [`RawResponse`] back; implementations must not
//! retry, rewrite headers, or follow redirects, since any change to the signed bytes invalidates
//! the signature. Swap in a test double by implementing the trait (see `_preludet`).

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to send one signed POST.
///
/// Implementations must be `Send + Sync + 'static` so one pooled client can be shared by any
/// number of concurrent submit/poll sessions.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` exactly once, honoring its timeout.
	fn execute(&self, request: SignedRequest) -> HttpFuture<'_>;
}

/// Fully signed request ready for the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// Endpoint the body is posted to.
	pub url: Url,
	/// Headers in transmission order, covered (where required) by the signature.
	pub headers: Vec<(&'static str, String)>,
	/// Exact JSON bytes that were hashed into the canonical request.
	pub body: Vec<u8>,
	/// Per-request timeout.
	pub timeout: Duration,
}
impl SignedRequest {
	/// Looks up a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Status + body of a provider reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The wrapped client pools connections and is cheap to clone. Configure any custom client to
/// disable redirect following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds the default pooled client with redirects disabled.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: SignedRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let SignedRequest { url, headers, body, timeout } = request;
			let mut builder = client.post(url).timeout(timeout);

			for (name, value) in headers {
				builder = builder.header(name, value);
			}

			let response = builder.body(body).send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_lookup_is_case_insensitive() {
		let request = SignedRequest {
			url: Url::parse("https://hunyuan.tencentcloudapi.com/").expect("URL should parse."),
			headers: vec![("X-TC-Action", "SubmitHunyuanImageJob".into())],
			body: b"{}".to_vec(),
			timeout: Duration::from_secs(1),
		};

		assert_eq!(request.header("x-tc-action"), Some("SubmitHunyuanImageJob"));
		assert_eq!(request.header("X-TC-Region"), None);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn default_reqwest_client_builds() {
		assert!(ReqwestHttpClient::new().is_ok());
	}
}
