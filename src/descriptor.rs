//! Endpoint + signing-scope descriptors consumed by the dispatcher.
//!
//! A [`RequestDescriptor`] fully determines which endpoint a call targets and which credential
//! scope it is signed for. Descriptors are validated once by [`RequestDescriptorBuilder`] and are
//! immutable afterwards; [`DescriptorPreset`] covers the image-generation actions this crate knows
//! how to orchestrate.

/// Builder API for assembling request descriptors.
pub mod builder;
/// Known service/action presets.
pub mod preset;

pub use builder::*;
pub use preset::*;

// self
use crate::_prelude::*;

/// Provider domain appended to the service name when no explicit host is supplied.
pub const DEFAULT_DOMAIN: &str = "tencentcloudapi.com";
/// Region used when the caller does not pick one.
pub const DEFAULT_REGION: &str = "ap-guangzhou";

/// Immutable endpoint + signing scope for one logical operation.
///
/// Deserialization runs through [`RequestDescriptorBuilder`], so configuration files get the same
/// validation and defaults as code. `http://` URLs additionally need `"allow_insecure_http": true`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorConfig")]
pub struct RequestDescriptor {
	/// Service name, used in the host and in the credential scope.
	pub service: String,
	/// API action sent as `X-TC-Action`.
	pub action: String,
	/// API version sent as `X-TC-Version`.
	pub version: String,
	/// Region sent as `X-TC-Region`.
	pub region: String,
	/// Host signed in the canonical headers and sent as `Host`.
	pub host: String,
	/// Endpoint the request is posted to.
	pub url: Url,
}
impl RequestDescriptor {
	/// Creates a new builder for the provided service.
	pub fn builder(service: impl Into<String>) -> RequestDescriptorBuilder {
		RequestDescriptorBuilder::new(service)
	}

	/// Creates a builder seeded from a known preset.
	pub fn preset(preset: DescriptorPreset) -> RequestDescriptorBuilder {
		RequestDescriptorBuilder::new(preset.service())
			.action(preset.action())
			.version(preset.version())
			.region(DEFAULT_REGION)
	}

	/// Returns a sibling descriptor sharing endpoint and scope but targeting `action`.
	pub fn with_action(&self, action: impl Into<String>) -> Self {
		Self { action: action.into(), ..self.clone() }
	}

	/// Derives the status-query descriptor for an asynchronous submit action.
	///
	/// Submit actions follow the `Submit*` naming convention and are paired with the matching
	/// `Query*` action on the same service and version.
	pub fn query_descriptor(&self) -> Result<Self, DescriptorError> {
		let query = self
			.action
			.strip_prefix("Submit")
			.filter(|rest| !rest.is_empty())
			.map(|rest| format!("Query{rest}"))
			.ok_or_else(|| DescriptorError::NoQueryAction { action: self.action.clone() })?;

		Ok(self.with_action(query))
	}
}

#[derive(Debug, Deserialize)]
struct DescriptorConfig {
	service: String,
	action: String,
	version: String,
	region: String,
	#[serde(default)]
	host: Option<String>,
	#[serde(default)]
	url: Option<String>,
	#[serde(default)]
	allow_insecure_http: bool,
}
impl TryFrom<DescriptorConfig> for RequestDescriptor {
	type Error = DescriptorError;

	fn try_from(config: DescriptorConfig) -> Result<Self, Self::Error> {
		let mut builder = RequestDescriptorBuilder::new(config.service)
			.action(config.action)
			.version(config.version)
			.region(config.region);

		if let Some(host) = config.host {
			builder = builder.host(host);
		}
		if let Some(url) = config.url {
			builder = builder.url(url);
		}
		if config.allow_insecure_http {
			builder = builder.allow_insecure_http();
		}

		builder.build()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_descriptor_pairs_submit_actions() {
		let submit = RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
			.build()
			.expect("Hunyuan submit preset should build.");
		let query = submit.query_descriptor().expect("Submit action should have a query pair.");

		assert_eq!(query.action, "QueryHunyuanImageJob");
		assert_eq!(query.service, submit.service);
		assert_eq!(query.url, submit.url);
		assert_eq!(
			query,
			RequestDescriptor::preset(DescriptorPreset::HunyuanQuery)
				.build()
				.expect("Hunyuan query preset should build.")
		);
	}

	#[test]
	fn query_descriptor_rejects_non_submit_actions() {
		let sync = RequestDescriptor::preset(DescriptorPreset::AiartTextToImage)
			.build()
			.expect("TextToImage preset should build.");

		assert!(matches!(
			sync.query_descriptor(),
			Err(DescriptorError::NoQueryAction { action }) if action == "TextToImage"
		));
	}

	#[test]
	fn descriptor_round_trips_through_serde() {
		let descriptor = RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
			.build()
			.expect("Hunyuan submit preset should build.");
		let json = serde_json::to_string(&descriptor).expect("Descriptor should serialize.");
		let decoded: RequestDescriptor =
			serde_json::from_str(&json).expect("Descriptor should deserialize.");

		assert_eq!(decoded, descriptor);
	}

	#[test]
	fn deserialization_applies_builder_validation() {
		let err = serde_json::from_str::<RequestDescriptor>(
			r#"{"service":"","action":"A B","version":"2023-09-01","region":"ap-guangzhou","host":"x","url":"https://x/"}"#,
		)
		.expect_err("Empty services should be rejected.");

		assert!(err.to_string().contains("service"));

		let err = serde_json::from_str::<RequestDescriptor>(
			r#"{"service":"hunyuan","action":"SubmitHunyuanImageJob","version":"2023-09-01","region":"ap-guangzhou","url":"http://evil.example/"}"#,
		)
		.expect_err("Insecure URLs should be rejected without an explicit opt-in.");

		assert!(err.to_string().contains("evil.example"));

		let descriptor: RequestDescriptor = serde_json::from_str(
			r#"{"service":"hunyuan","action":"SubmitHunyuanImageJob","version":"2023-09-01","region":"ap-guangzhou"}"#,
		)
		.expect("Minimal configuration should deserialize.");

		assert_eq!(descriptor.host, "hunyuan.tencentcloudapi.com");
		assert_eq!(descriptor.url.as_str(), "https://hunyuan.tencentcloudapi.com/");

		let descriptor: RequestDescriptor = serde_json::from_str(
			r#"{"service":"hunyuan","action":"SubmitHunyuanImageJob","version":"2023-09-01","region":"ap-guangzhou","url":"http://127.0.0.1:8080/","allow_insecure_http":true}"#,
		)
		.expect("Opted-in insecure URLs should deserialize.");

		assert_eq!(descriptor.url.scheme(), "http");
	}
}
