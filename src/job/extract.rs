//! Mapping terminal responses to caller-visible images.

// crates.io
use base64::{DecodeError, Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	envelope::ResponseEnvelope,
	job::{Job, JobId, JobStatus},
};

/// Errors raised while decoding an inline image.
#[derive(Debug, ThisError)]
pub enum ImageDecodeError {
	/// The image is a URL and has to be downloaded instead.
	#[error("Image is a URL, not inline data.")]
	NotInline,
	/// The inline payload is not valid base64.
	#[error(transparent)]
	Base64(#[from] DecodeError),
}

/// One generated image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratedImage {
	/// Temporary download URL.
	Url(Url),
	/// Inline base64 payload (`RspImgType = base64`).
	Base64(String),
}
impl GeneratedImage {
	/// Classifies a raw provider value; anything that is not an `http(s)` URL is inline data.
	pub fn parse(raw: &str) -> Self {
		match Url::parse(raw) {
			Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
			_ => Self::Base64(raw.to_owned()),
		}
	}

	/// Returns the download URL, if this image is one.
	pub fn url(&self) -> Option<&Url> {
		match self {
			Self::Url(url) => Some(url),
			Self::Base64(_) => None,
		}
	}

	/// Decodes an inline image into raw bytes.
	pub fn decode(&self) -> Result<Vec<u8>, ImageDecodeError> {
		match self {
			Self::Url(_) => Err(ImageDecodeError::NotInline),
			Self::Base64(data) => Ok(STANDARD.decode(data.trim())?),
		}
	}
}

/// Images and metadata returned to the caller of a generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationResult {
	/// Job that produced the images, for asynchronous actions.
	pub job_id: Option<JobId>,
	/// Generated images in provider order; never empty.
	pub images: Vec<GeneratedImage>,
	/// Prompts after provider-side rewriting.
	pub revised_prompts: Vec<String>,
	/// Request identifier of the response the images were read from.
	pub request_id: Option<String>,
}
impl GenerationResult {
	/// First generated image.
	pub fn first(&self) -> Option<&GeneratedImage> {
		self.images.first()
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SyncFields {
	#[serde(default)]
	img_url: Option<String>,
	#[serde(default)]
	result_image: Option<ImageList>,
	#[serde(default)]
	revised_prompt: Option<ImageList>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageList {
	One(String),
	Many(Vec<String>),
}
impl ImageList {
	fn into_vec(self) -> Vec<String> {
		match self {
			Self::One(value) => vec![value],
			Self::Many(values) => values,
		}
	}
}

/// Converts terminal success responses into [`GenerationResult`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResultExtractor;
impl ResultExtractor {
	/// Extracts the images of a succeeded job.
	///
	/// Only `Succeeded` jobs carry results; a failed job yields [`Error::JobFailed`] and a
	/// success without images yields [`Error::EmptyResult`].
	pub fn from_job(job: Job) -> Result<GenerationResult> {
		if job.status == JobStatus::Failed {
			return Err(Error::JobFailed {
				job_id: job.job_id.to_string(),
				message: job.error_message.unwrap_or_default(),
			});
		}

		let images = parse_images(job.result_images);

		if images.is_empty() {
			return Err(Error::EmptyResult);
		}

		Ok(GenerationResult {
			job_id: Some(job.job_id),
			images,
			revised_prompts: job.revised_prompts,
			request_id: job.request_id,
		})
	}

	/// Extracts the images of a synchronous action's success envelope.
	///
	/// `ImgUrl` takes precedence over `ResultImage`, which may be a single value or a list.
	pub fn from_envelope(envelope: ResponseEnvelope) -> Result<GenerationResult> {
		let request_id = envelope.request_id.clone();
		let fields: SyncFields = envelope.into_fields()?;
		let raw = match (fields.img_url, fields.result_image) {
			(Some(url), _) if !url.is_empty() => vec![url],
			(_, Some(list)) => list.into_vec(),
			_ => Vec::new(),
		};
		let images = parse_images(raw);

		if images.is_empty() {
			return Err(Error::EmptyResult);
		}

		Ok(GenerationResult {
			job_id: None,
			images,
			revised_prompts: fields.revised_prompt.map(ImageList::into_vec).unwrap_or_default(),
			request_id,
		})
	}
}

fn parse_images(raw: Vec<String>) -> Vec<GeneratedImage> {
	raw.iter().filter(|value| !value.trim().is_empty()).map(|value| GeneratedImage::parse(value)).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn job(status_code: &str, images: &[&str]) -> Job {
		Job {
			job_id: JobId::new("job-1").expect("Test job id should be valid."),
			status: JobStatus::from_code(status_code),
			status_code: status_code.into(),
			result_images: images.iter().map(|image| (*image).to_owned()).collect(),
			result_details: Vec::new(),
			revised_prompts: vec!["a red fox, digital art".into()],
			error_message: None,
			request_id: Some("req-1".into()),
		}
	}

	#[test]
	fn succeeded_job_maps_to_urls() {
		let result = ResultExtractor::from_job(job("5", &["https://cdn.example.com/1.png", ""]))
			.expect("Succeeded job should extract.");

		assert_eq!(result.images.len(), 1);
		assert_eq!(
			result.first().and_then(GeneratedImage::url).map(Url::as_str),
			Some("https://cdn.example.com/1.png")
		);
		assert_eq!(result.job_id.as_deref(), Some("job-1"));
		assert_eq!(result.revised_prompts, vec!["a red fox, digital art".to_owned()]);
	}

	#[test]
	fn empty_success_is_an_error() {
		assert!(matches!(ResultExtractor::from_job(job("5", &[])), Err(Error::EmptyResult)));
	}

	#[test]
	fn inline_images_decode() {
		let image = GeneratedImage::parse("aGVsbG8=");

		assert_eq!(image.decode().expect("Valid base64 should decode."), b"hello");
		assert!(matches!(
			GeneratedImage::parse("https://cdn.example.com/1.png").decode(),
			Err(ImageDecodeError::NotInline)
		));
		assert!(matches!(GeneratedImage::parse("%%%").decode(), Err(ImageDecodeError::Base64(_))));
	}

	#[test]
	fn sync_envelopes_prefer_img_url() {
		let envelope = ResponseEnvelope::decode(
			200,
			br#"{"Response":{"ImgUrl":"https://cdn.example.com/a.png","ResultImage":"aGVsbG8=","RequestId":"req-1"}}"#,
		)
		.expect("Envelope should decode.");
		let result = ResultExtractor::from_envelope(envelope).expect("Sync result should extract.");

		assert_eq!(result.images.len(), 1);
		assert!(result.images[0].url().is_some());
		assert_eq!(result.request_id.as_deref(), Some("req-1"));

		let envelope = ResponseEnvelope::decode(
			200,
			br#"{"Response":{"ResultImage":["aGVsbG8=","https://cdn.example.com/b.png"],"RequestId":"req-2"}}"#,
		)
		.expect("Envelope should decode.");
		let result = ResultExtractor::from_envelope(envelope).expect("Sync result should extract.");

		assert_eq!(result.images.len(), 2);
		assert_eq!(result.images[0], GeneratedImage::Base64("aGVsbG8=".into()));
	}

	#[test]
	fn sync_envelope_without_images_is_empty() {
		let envelope = ResponseEnvelope::decode(200, br#"{"Response":{"RequestId":"req-1"}}"#)
			.expect("Envelope should decode.");

		assert!(matches!(ResultExtractor::from_envelope(envelope), Err(Error::EmptyResult)));
	}
}
