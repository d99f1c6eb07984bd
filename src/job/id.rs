//! Provider-issued job identifiers.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const JOB_ID_MAX_LEN: usize = 128;

/// Error returned when a job identifier fails validation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum JobIdError {
	/// The identifier was empty.
	#[error("Job identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Job identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Job identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier of a submitted job; only ever produced from a successful submit response.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);
impl JobId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, JobIdError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for JobId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for JobId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for JobId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<JobId> for String {
	fn from(value: JobId) -> Self {
		value.0
	}
}
impl TryFrom<String> for JobId {
	type Error = JobIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for JobId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Job({})", self.0)
	}
}
impl Display for JobId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_view(view: &str) -> Result<(), JobIdError> {
	if view.is_empty() {
		return Err(JobIdError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(JobIdError::ContainsWhitespace);
	}
	if view.chars().count() > JOB_ID_MAX_LEN {
		return Err(JobIdError::TooLong { max: JOB_ID_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn job_id_validation_rules() {
		assert_eq!(JobId::new(""), Err(JobIdError::Empty));
		assert_eq!(JobId::new("12 34"), Err(JobIdError::ContainsWhitespace));
		assert_eq!(JobId::new("x".repeat(129)), Err(JobIdError::TooLong { max: 128 }));
		assert!(JobId::new("é".repeat(128)).is_ok());

		let id = JobId::new("1258109872-1714037446-0b1e9d8f").expect("Valid job id should parse.");

		assert_eq!(format!("{id:?}"), "Job(1258109872-1714037446-0b1e9d8f)");
		assert_eq!(id.to_string(), "1258109872-1714037446-0b1e9d8f");
	}

	#[test]
	fn job_id_serde_validates() {
		let err = serde_json::from_str::<JobId>("\"\"").expect_err("Empty ids must not deserialize.");

		assert!(err.to_string().contains("empty"));
	}
}
