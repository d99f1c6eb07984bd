//! TC3-HMAC-SHA256 signing primitives.
//!
//! [`CanonicalRequestBuilder`] normalizes the request, [`SignatureEngine`] derives the
//! date-scoped key chain and renders the `Authorization` header. Both are pure and
//! allocation-only, so they can be reused outside the dispatcher (e.g. to pre-sign a request
//! handed to another HTTP stack). Nothing here is cached: the key chain is re-derived on every
//! call because the scope date rolls over at UTC midnight.

pub mod canonical;
pub mod engine;
pub mod timestamp;

pub use canonical::*;
pub use engine::*;
pub use timestamp::*;

// crates.io
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
	hex::encode(Sha256::digest(bytes.as_ref()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_payload_hashes_to_well_known_digest() {
		assert_eq!(
			sha256_hex(b""),
			"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
		);
	}
}
