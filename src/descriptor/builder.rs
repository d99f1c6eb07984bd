// self
use crate::{
	_prelude::*,
	descriptor::{DEFAULT_DOMAIN, RequestDescriptor},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum DescriptorError {
	/// A required field was empty.
	#[error("Descriptor field `{field}` cannot be empty.")]
	MissingField {
		/// Which field failed validation.
		field: &'static str,
	},
	/// A field contains whitespace, which would corrupt the signed headers.
	#[error("Descriptor field `{field}` contains whitespace.")]
	ContainsWhitespace {
		/// Which field failed validation.
		field: &'static str,
	},
	/// Endpoint URL could not be parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Action does not follow the `Submit*` convention, so no status query can be derived.
	#[error("Action `{action}` has no matching status query action.")]
	NoQueryAction {
		/// Action that could not be paired.
		action: String,
	},
}

/// Builder for [`RequestDescriptor`] values.
#[derive(Debug)]
pub struct RequestDescriptorBuilder {
	/// Service name for the descriptor being constructed.
	pub service: String,
	/// API action.
	pub action: Option<String>,
	/// API version.
	pub version: Option<String>,
	/// Region header value.
	pub region: Option<String>,
	/// Explicit host; defaults to `{service}.tencentcloudapi.com`.
	pub host: Option<String>,
	/// Explicit endpoint URL; defaults to `https://{host}/`.
	pub url: Option<String>,
	/// Accept plain-HTTP endpoints (local mock servers only).
	pub allow_insecure_http: bool,
}
impl RequestDescriptorBuilder {
	/// Creates a new builder seeded with the provided service.
	pub fn new(service: impl Into<String>) -> Self {
		Self {
			service: service.into(),
			action: None,
			version: None,
			region: None,
			host: None,
			url: None,
			allow_insecure_http: false,
		}
	}

	/// Sets the API action.
	pub fn action(mut self, action: impl Into<String>) -> Self {
		self.action = Some(action.into());

		self
	}

	/// Sets the API version.
	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.version = Some(version.into());

		self
	}

	/// Sets the region.
	pub fn region(mut self, region: impl Into<String>) -> Self {
		self.region = Some(region.into());

		self
	}

	/// Overrides the signed host.
	pub fn host(mut self, host: impl Into<String>) -> Self {
		self.host = Some(host.into());

		self
	}

	/// Overrides the endpoint URL the request is posted to.
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());

		self
	}

	/// Accepts `http://` endpoints; intended for local mock servers.
	pub fn allow_insecure_http(mut self) -> Self {
		self.allow_insecure_http = true;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<RequestDescriptor, DescriptorError> {
		let service = required("service", Some(self.service))?;
		let action = required("action", self.action)?;
		let version = required("version", self.version)?;
		let region = required("region", self.region)?;
		let host = match self.host {
			Some(host) => required("host", Some(host))?,
			None => format!("{service}.{DEFAULT_DOMAIN}"),
		};
		let raw_url = self.url.unwrap_or_else(|| format!("https://{host}/"));
		let url = Url::parse(&raw_url).map_err(|source| DescriptorError::InvalidUrl { source })?;

		validate_scheme(&url, self.allow_insecure_http)?;

		Ok(RequestDescriptor { service, action, version, region, host, url })
	}
}

fn required(field: &'static str, value: Option<String>) -> Result<String, DescriptorError> {
	let value = value.unwrap_or_default();

	if value.is_empty() {
		return Err(DescriptorError::MissingField { field });
	}
	if value.chars().any(char::is_whitespace) {
		return Err(DescriptorError::ContainsWhitespace { field });
	}

	Ok(value)
}

fn validate_scheme(url: &Url, allow_insecure_http: bool) -> Result<(), DescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if allow_insecure_http => Ok(()),
		_ => Err(DescriptorError::InsecureEndpoint { url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::descriptor::DescriptorPreset;

	#[test]
	fn host_and_url_default_from_service() {
		let descriptor = RequestDescriptor::preset(DescriptorPreset::AiartTextToImage)
			.build()
			.expect("TextToImage preset should build.");

		assert_eq!(descriptor.host, "aiart.tencentcloudapi.com");
		assert_eq!(descriptor.url.as_str(), "https://aiart.tencentcloudapi.com/");
		assert_eq!(descriptor.region, "ap-guangzhou");
		assert_eq!(descriptor.version, "2022-12-29");
	}

	#[test]
	fn build_rejects_missing_and_malformed_fields() {
		let err = RequestDescriptor::builder("hunyuan")
			.version("2023-09-01")
			.region("ap-guangzhou")
			.build()
			.expect_err("Descriptor without an action should be rejected.");

		assert_eq!(err, DescriptorError::MissingField { field: "action" });

		let err = RequestDescriptor::builder("")
			.action("SubmitHunyuanImageJob")
			.version("2023-09-01")
			.region("ap-guangzhou")
			.build()
			.expect_err("Descriptor without a service should be rejected.");

		assert_eq!(err, DescriptorError::MissingField { field: "service" });

		let err = RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
			.host("hunyuan .tencentcloudapi.com")
			.build()
			.expect_err("Hosts containing whitespace should be rejected.");

		assert_eq!(err, DescriptorError::ContainsWhitespace { field: "host" });
	}

	#[test]
	fn build_enforces_https_unless_opted_out() {
		let err = RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
			.url("http://127.0.0.1:8080/")
			.build()
			.expect_err("Plain HTTP endpoints should be rejected by default.");

		assert!(matches!(err, DescriptorError::InsecureEndpoint { .. }));

		let descriptor = RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
			.url("http://127.0.0.1:8080/")
			.allow_insecure_http()
			.build()
			.expect("Plain HTTP should be accepted once explicitly allowed.");

		assert_eq!(descriptor.host, "hunyuan.tencentcloudapi.com");
		assert_eq!(descriptor.url.as_str(), "http://127.0.0.1:8080/");

		let err = RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
			.url("not a url")
			.build()
			.expect_err("Unparseable URLs should be rejected.");

		assert!(matches!(err, DescriptorError::InvalidUrl { .. }));
	}
}
