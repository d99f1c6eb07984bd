// self
use crate::_prelude::*;

/// Service/action combinations with a known version and response shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorPreset {
	/// Synchronous AI Art text-to-image call answering with `ImgUrl` or `ResultImage`.
	AiartTextToImage,
	/// Asynchronous Hunyuan image job submission answering with `JobId`.
	HunyuanSubmit,
	/// Status query for a Hunyuan image job.
	HunyuanQuery,
}
impl DescriptorPreset {
	/// Signing service name.
	pub const fn service(self) -> &'static str {
		match self {
			Self::AiartTextToImage => "aiart",
			Self::HunyuanSubmit | Self::HunyuanQuery => "hunyuan",
		}
	}

	/// `X-TC-Action` value.
	pub const fn action(self) -> &'static str {
		match self {
			Self::AiartTextToImage => "TextToImage",
			Self::HunyuanSubmit => "SubmitHunyuanImageJob",
			Self::HunyuanQuery => "QueryHunyuanImageJob",
		}
	}

	/// `X-TC-Version` value.
	pub const fn version(self) -> &'static str {
		match self {
			Self::AiartTextToImage => "2022-12-29",
			Self::HunyuanSubmit | Self::HunyuanQuery => "2023-09-01",
		}
	}
}
impl Display for DescriptorPreset {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}:{}", self.service(), self.action())
	}
}
