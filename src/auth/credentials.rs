//! Credential pair supplied per call by the embedding application.

// self
use crate::{_prelude::*, error::SignatureInputError};

/// Secret key seeding the signing key chain; formatting never reveals it.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Box<str>);
impl SecretKey {
	/// Raw key material, for key derivation only.
	pub fn expose(&self) -> &str {
		&self.0
	}

	fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl From<String> for SecretKey {
	fn from(value: String) -> Self {
		Self(value.into_boxed_str())
	}
}
impl Debug for SecretKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SecretKey(<redacted>)")
	}
}

/// Secret id + secret key used to sign one request or poll session.
///
/// Credentials are never persisted, serialized, or logged; `Debug` shows the identifier only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// Public secret identifier, embedded verbatim in the `Authorization` header.
	pub secret_id: String,
	/// Secret key seeding the signing key chain.
	pub secret_key: SecretKey,
}
impl Credentials {
	/// Creates a credential pair without validating it.
	pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
		Self { secret_id: secret_id.into(), secret_key: SecretKey::from(secret_key.into()) }
	}

	/// Rejects empty or whitespace-only fields before anything is signed or dispatched.
	pub fn validate(&self) -> Result<(), SignatureInputError> {
		if self.secret_id.trim().is_empty() {
			return Err(SignatureInputError::EmptySecretId);
		}
		if self.secret_key.is_blank() {
			return Err(SignatureInputError::EmptySecretKey);
		}

		Ok(())
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("secret_id", &self.secret_id)
			.field("secret_key", &self.secret_key)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn validate_rejects_blank_fields() {
		assert_eq!(Credentials::new("", "key").validate(), Err(SignatureInputError::EmptySecretId));
		assert_eq!(
			Credentials::new("id", "  \t").validate(),
			Err(SignatureInputError::EmptySecretKey)
		);
		assert!(Credentials::new("id", "key").validate().is_ok());
	}

	#[test]
	fn debug_never_prints_the_key() {
		let rendered = format!("{:?}", Credentials::new("AKIDexample", "very-secret-key"));

		assert!(rendered.contains("AKIDexample"));
		assert!(rendered.contains("SecretKey(<redacted>)"));
		assert!(!rendered.contains("very-secret-key"));
	}
}
