//! Canonical request construction.

// self
use crate::sign::sha256_hex;

/// Content type signed and transmitted with every request.
pub const CONTENT_TYPE: &str = "application/json";
/// Header list covered by the signature.
pub const SIGNED_HEADERS: &str = "content-type;host";

/// Normalized request text plus its SHA-256 digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalRequest {
	/// `{method}\n{uri}\n{query}\n{headers}\n{signedHeaders}\n{hashedPayload}`.
	pub text: String,
	/// Lowercase hex SHA-256 of [`text`](Self::text).
	pub hashed: String,
}

/// Builds the canonical request for a JSON POST.
///
/// Method, URI, and query default to `POST`, `/`, and the empty string; only the host and
/// payload vary between calls.
#[derive(Clone, Debug)]
pub struct CanonicalRequestBuilder<'a> {
	method: &'a str,
	uri: &'a str,
	query: &'a str,
	host: &'a str,
	payload: &'a [u8],
}
impl<'a> CanonicalRequestBuilder<'a> {
	/// Starts a `POST /` request for `host` carrying `payload`.
	pub fn post(host: &'a str, payload: &'a [u8]) -> Self {
		Self { method: "POST", uri: "/", query: "", host, payload }
	}

	/// Overrides the HTTP method.
	pub fn method(mut self, method: &'a str) -> Self {
		self.method = method;

		self
	}

	/// Overrides the canonical URI.
	pub fn uri(mut self, uri: &'a str) -> Self {
		self.uri = uri;

		self
	}

	/// Overrides the canonical query string.
	pub fn query(mut self, query: &'a str) -> Self {
		self.query = query;

		self
	}

	/// Canonical header block, including its trailing newline.
	pub fn canonical_headers(&self) -> String {
		format!("content-type:{CONTENT_TYPE}\nhost:{}\n", self.host)
	}

	/// Hex SHA-256 of the exact payload bytes.
	pub fn hashed_payload(&self) -> String {
		sha256_hex(self.payload)
	}

	/// Renders the canonical request and its digest.
	pub fn build(&self) -> CanonicalRequest {
		let text = format!(
			"{}\n{}\n{}\n{}\n{SIGNED_HEADERS}\n{}",
			self.method,
			self.uri,
			self.query,
			self.canonical_headers(),
			self.hashed_payload(),
		);
		let hashed = sha256_hex(&text);

		CanonicalRequest { text, hashed }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn canonical_request_matches_reference_layout() {
		let canonical =
			CanonicalRequestBuilder::post("hunyuan.tencentcloudapi.com", br#"{"Prompt":"a red fox"}"#)
				.build();

		assert_eq!(
			canonical.text,
			"POST\n/\n\ncontent-type:application/json\nhost:hunyuan.tencentcloudapi.com\n\ncontent-type;host\n87a2c5d03c424e58fdcfde2755084862d390292013e576125614cb38af64ae03"
		);
		assert_eq!(
			canonical.hashed,
			"dee9a02a66fa941be32458a799c12977dfd4874d4461595c9612bcb6590c56fc"
		);
	}

	#[test]
	fn empty_payload_uses_empty_string_digest() {
		let builder = CanonicalRequestBuilder::post("hunyuan.tencentcloudapi.com", b"");

		assert_eq!(
			builder.hashed_payload(),
			"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
		);
		assert!(builder.build().text.ends_with(
			"\ncontent-type;host\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
		));
	}

	#[test]
	fn overrides_are_reflected_in_the_text() {
		let canonical = CanonicalRequestBuilder::post("example.com", b"{}")
			.method("GET")
			.uri("/v1")
			.query("a=1")
			.build();

		assert!(canonical.text.starts_with("GET\n/v1\na=1\ncontent-type:application/json\n"));
	}
}
