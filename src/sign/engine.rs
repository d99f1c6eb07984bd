//! Key-chain derivation and `Authorization` header rendering.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::SignatureInputError,
	sign::{CanonicalRequest, SIGNED_HEADERS, Timestamp},
};

/// Algorithm label opening the string-to-sign and the `Authorization` header.
pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
/// Fixed terminator of every credential scope.
pub const SCOPE_TERMINATOR: &str = "tc3_request";

type HmacSha256 = Hmac<Sha256>;

/// Intermediate HMAC outputs `SecretDate -> SecretService -> SecretSigning`.
///
/// Derived per call and dropped with the request; `Debug` never prints key material.
#[derive(Clone)]
pub struct SigningKeyChain {
	secret_date: [u8; 32],
	secret_service: [u8; 32],
	secret_signing: [u8; 32],
}
impl SigningKeyChain {
	/// Derives the chain for `date` (`YYYY-MM-DD`) and `service`.
	pub fn derive(secret_key: &str, date: &str, service: &str) -> Self {
		let secret_date = hmac_sha256(format!("TC3{secret_key}").as_bytes(), date.as_bytes());
		let secret_service = hmac_sha256(&secret_date, service.as_bytes());
		let secret_signing = hmac_sha256(&secret_service, SCOPE_TERMINATOR.as_bytes());

		Self { secret_date, secret_service, secret_signing }
	}

	/// Date-scoped key.
	pub fn secret_date(&self) -> &[u8; 32] {
		&self.secret_date
	}

	/// Date + service scoped key.
	pub fn secret_service(&self) -> &[u8; 32] {
		&self.secret_service
	}

	/// Final signing key.
	pub fn secret_signing(&self) -> &[u8; 32] {
		&self.secret_signing
	}

	/// Hex HMAC of `message` under the signing key.
	pub fn sign(&self, message: &str) -> String {
		hex::encode(hmac_sha256(&self.secret_signing, message.as_bytes()))
	}
}
impl Debug for SigningKeyChain {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SigningKeyChain(<redacted>)")
	}
}

/// Everything produced while signing one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
	/// `{date}/{service}/tc3_request`.
	pub credential_scope: String,
	/// Four-line string the signing key is applied to.
	pub string_to_sign: String,
	/// Lowercase hex signature.
	pub signature: String,
	/// Complete `Authorization` header value.
	pub authorization: String,
}

/// Stateless TC3-HMAC-SHA256 signer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignatureEngine;
impl SignatureEngine {
	/// Signs `canonical` for `service` at `timestamp`.
	///
	/// Identical inputs always yield a byte-identical [`Signature`]. Credentials are checked for
	/// emptiness only; anything else the provider dislikes surfaces later as an API error.
	pub fn sign(
		credentials: &Credentials,
		service: &str,
		canonical: &CanonicalRequest,
		timestamp: Timestamp,
	) -> Result<Signature, SignatureInputError> {
		credentials.validate()?;

		if service.trim().is_empty() {
			return Err(SignatureInputError::EmptyService);
		}

		let date = timestamp.utc_date()?;
		let credential_scope = format!("{date}/{service}/{SCOPE_TERMINATOR}");
		let string_to_sign =
			format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}", canonical.hashed);
		let keys = SigningKeyChain::derive(credentials.secret_key.expose(), &date, service);
		let signature = keys.sign(&string_to_sign);
		let authorization = format!(
			"{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
			credentials.secret_id,
		);

		Ok(Signature { credential_scope, string_to_sign, signature, authorization })
	}
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
	let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
		unreachable!("HMAC accepts keys of any length");
	};

	mac.update(message);

	mac.finalize().into_bytes().into()
}
