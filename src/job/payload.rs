//! Typed request payloads for the known image-generation actions.
//!
//! Any `Serialize` value can be dispatched; these types only pin down the field names the
//! provider expects so callers do not have to spell them by hand.

// self
use crate::{_prelude::*, job::JobId};

/// Payload of `SubmitHunyuanImageJob`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HunyuanImageJobRequest {
	/// Text describing the image.
	pub prompt: String,
	/// Content the image should avoid.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub negative_prompt: Option<String>,
	/// Provider style identifier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub style: Option<String>,
	/// Output resolution, e.g. `1024:1024`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub resolution: Option<String>,
	/// Number of images to generate.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub num: Option<u32>,
	/// Random seed; generations with the same seed and prompt are reproducible.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub seed: Option<u64>,
	/// `1` lets the provider rewrite the prompt before generation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub revise: Option<u8>,
	/// `1` adds the provider watermark.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub logo_add: Option<u8>,
}
impl HunyuanImageJobRequest {
	/// Creates a request for `prompt` with every optional field left to provider defaults.
	pub fn new(prompt: impl Into<String>) -> Self {
		Self { prompt: prompt.into(), ..Default::default() }
	}

	/// Sets the negative prompt.
	pub fn negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
		self.negative_prompt = Some(negative_prompt.into());

		self
	}

	/// Sets the style identifier.
	pub fn style(mut self, style: impl Into<String>) -> Self {
		self.style = Some(style.into());

		self
	}

	/// Sets the output resolution.
	pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
		self.resolution = Some(resolution.into());

		self
	}

	/// Sets the number of images.
	pub fn num(mut self, num: u32) -> Self {
		self.num = Some(num);

		self
	}

	/// Sets the random seed.
	pub fn seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);

		self
	}

	/// Enables or disables prompt rewriting.
	pub fn revise(mut self, revise: bool) -> Self {
		self.revise = Some(revise.into());

		self
	}

	/// Enables or disables the watermark.
	pub fn logo_add(mut self, logo_add: bool) -> Self {
		self.logo_add = Some(logo_add.into());

		self
	}
}

/// Result encoding requested from synchronous actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseImageType {
	/// Temporary download URL.
	Url,
	/// Inline base64 image.
	Base64,
}

/// `ResultConfig` member of [`TextToImageRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultConfig {
	/// Output resolution, e.g. `768:768`.
	pub resolution: String,
}

/// Payload of the synchronous `TextToImage` action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextToImageRequest {
	/// Text describing the image.
	pub prompt: String,
	/// Content the image should avoid.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub negative_prompt: Option<String>,
	/// Provider style identifiers.
	#[serde(skip_serializing_if = "Vec::is_empty", default)]
	pub styles: Vec<String>,
	/// Output configuration.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub result_config: Option<ResultConfig>,
	/// `1` adds the provider watermark.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub logo_add: Option<u8>,
	/// Result encoding.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rsp_img_type: Option<ResponseImageType>,
}
impl TextToImageRequest {
	/// Creates a request for `prompt`.
	pub fn new(prompt: impl Into<String>) -> Self {
		Self { prompt: prompt.into(), ..Default::default() }
	}

	/// Sets the negative prompt.
	pub fn negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
		self.negative_prompt = Some(negative_prompt.into());

		self
	}

	/// Appends a style identifier.
	pub fn style(mut self, style: impl Into<String>) -> Self {
		self.styles.push(style.into());

		self
	}

	/// Sets the output resolution.
	pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
		self.result_config = Some(ResultConfig { resolution: resolution.into() });

		self
	}

	/// Enables or disables the watermark.
	pub fn logo_add(mut self, logo_add: bool) -> Self {
		self.logo_add = Some(logo_add.into());

		self
	}

	/// Selects the result encoding.
	pub fn rsp_img_type(mut self, kind: ResponseImageType) -> Self {
		self.rsp_img_type = Some(kind);

		self
	}
}

/// Payload of a status query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct JobQuery<'a> {
	/// Job to query.
	#[serde(rename = "JobId")]
	pub job_id: &'a JobId,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn hunyuan_request_serializes_only_set_fields() {
		let request = HunyuanImageJobRequest::new("a red fox").style("201").revise(false).num(2);

		assert_eq!(
			serde_json::to_string(&request).expect("Request should serialize."),
			r#"{"Prompt":"a red fox","Style":"201","Num":2,"Revise":0}"#
		);
	}

	#[test]
	fn text_to_image_request_nests_result_config() {
		let request = TextToImageRequest::new("lake")
			.style("101")
			.resolution("768:768")
			.rsp_img_type(ResponseImageType::Base64);

		assert_eq!(
			serde_json::to_string(&request).expect("Request should serialize."),
			r#"{"Prompt":"lake","Styles":["101"],"ResultConfig":{"Resolution":"768:768"},"RspImgType":"base64"}"#
		);
	}

	#[test]
	fn job_query_uses_provider_field_name() {
		let job_id = JobId::new("1258-abc").expect("Valid job id should parse.");

		assert_eq!(
			serde_json::to_string(&JobQuery { job_id: &job_id }).expect("Query should serialize."),
			r#"{"JobId":"1258-abc"}"#
		);
	}
}
