//! Response envelope decoding.
//!
//! Every provider reply has the shape `{ "Response": { ..., "RequestId": "...", "Error"?: {
//! "Code", "Message" } } }`. Decoding happens in two steps: the envelope is parsed and classified
//! first, so an `Error` member always wins over whatever other fields are present, and only then
//! are the action-specific fields deserialized into the caller's type.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::ResponseError};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Provider error member of a response envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
	/// Provider error code.
	#[serde(rename = "Code", default)]
	pub code: String,
	/// Provider error message.
	#[serde(rename = "Message", default)]
	pub message: String,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
	#[serde(rename = "Response")]
	response: RawBody,
}

#[derive(Debug, Deserialize)]
struct RawBody {
	#[serde(rename = "RequestId", default)]
	request_id: Option<String>,
	#[serde(rename = "Error", default)]
	error: Option<ApiErrorBody>,
	#[serde(flatten)]
	fields: Map<String, Value>,
}

/// Successful (error-free) response envelope awaiting action-specific decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseEnvelope {
	/// HTTP status code of the response.
	pub status: u16,
	/// Request identifier echoed by the provider.
	pub request_id: Option<String>,
	/// Remaining members of `Response`.
	pub fields: Map<String, Value>,
}
impl ResponseEnvelope {
	/// Classifies a raw HTTP reply.
	///
	/// `Response.Error` becomes [`Error::Api`] regardless of the HTTP status; non-2xx replies
	/// without a decodable error become [`ResponseError::UnexpectedStatus`].
	pub fn decode(status: u16, body: &[u8]) -> Result<Self> {
		let success = (200..300).contains(&status);
		let raw: RawEnvelope =
			match serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(body)) {
				Ok(raw) => raw,
				Err(_) if !success =>
					return Err(ResponseError::UnexpectedStatus {
						status,
						body_preview: preview(body),
					}
					.into()),
				Err(source) => return Err(ResponseError::Decode { source, status }.into()),
			};
		let RawBody { request_id, error, fields } = raw.response;

		if let Some(ApiErrorBody { code, message }) = error {
			return Err(Error::Api { code, message, request_id });
		}
		if !success {
			return Err(ResponseError::UnexpectedStatus { status, body_preview: preview(body) }.into());
		}

		Ok(Self { status, request_id, fields })
	}

	/// Deserializes the action-specific members into `T`.
	pub fn into_fields<T>(self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let status = self.status;

		serde_path_to_error::deserialize(Value::Object(self.fields))
			.map_err(|source| ResponseError::Decode { source, status }.into())
	}
}

fn preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	match text.char_indices().nth(BODY_PREVIEW_LIMIT) {
		Some((idx, _)) => format!("{}...", &text[..idx]),
		None => text.into_owned(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Submit {
		#[serde(rename = "JobId")]
		job_id: String,
	}

	#[test]
	fn error_member_always_wins() {
		let body = br#"{"Response":{"JobId":"1","Error":{"Code":"AuthFailure.SignatureFailure","Message":"bad signature"},"RequestId":"req-9"}}"#;
		let err = ResponseEnvelope::decode(200, body).expect_err("Error envelopes must not decode as success.");

		match err {
			Error::Api { code, message, request_id } => {
				assert_eq!(code, "AuthFailure.SignatureFailure");
				assert_eq!(message, "bad signature");
				assert_eq!(request_id.as_deref(), Some("req-9"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn fields_decode_after_classification() {
		let envelope = ResponseEnvelope::decode(200, br#"{"Response":{"JobId":"1234","RequestId":"req-1"}}"#)
			.expect("Valid envelope should decode.");

		assert_eq!(envelope.request_id.as_deref(), Some("req-1"));

		let submit: Submit = envelope.into_fields().expect("Fields should decode.");

		assert_eq!(submit.job_id, "1234");
	}

	#[test]
	fn malformed_fields_report_the_json_path() {
		let envelope = ResponseEnvelope::decode(200, br#"{"Response":{"JobId":12,"RequestId":"req-1"}}"#)
			.expect("Envelope itself is valid.");
		let err = envelope.into_fields::<Submit>().expect_err("Numeric JobId should not decode.");

		match err {
			Error::Response(ResponseError::Decode { source, status }) => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "JobId");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn non_envelope_bodies_are_classified_by_status() {
		let err = ResponseEnvelope::decode(502, b"<html>bad gateway</html>")
			.expect_err("Gateway errors should surface.");

		assert!(matches!(
			err,
			Error::Response(ResponseError::UnexpectedStatus { status: 502, ref body_preview })
				if body_preview == "<html>bad gateway</html>"
		));

		let err = ResponseEnvelope::decode(200, b"{}").expect_err("Missing Response should fail.");

		assert!(matches!(err, Error::Response(ResponseError::Decode { status: 200, .. })));
	}
}
