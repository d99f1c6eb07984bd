//! Second-resolution signing timestamps.

// crates.io
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{_prelude::*, error::SignatureInputError};

const SCOPE_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Unix timestamp (seconds) shared by the string-to-sign and the `X-TC-Timestamp` header.
///
/// Both consumers render the value through [`Display`], so the signed bytes and the transmitted
/// header can never diverge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);
impl Timestamp {
	/// Converts Unix milliseconds with truncating integer division (`floor` for non-negative
	/// inputs); never rounds.
	pub const fn from_unix_millis(millis: i64) -> Self {
		Self(millis / 1_000)
	}

	/// Wraps an existing Unix timestamp in seconds.
	pub const fn from_unix_seconds(seconds: i64) -> Self {
		Self(seconds)
	}

	/// Captures the current wall-clock time.
	pub fn now() -> Self {
		let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

		Self::from_unix_millis(i64::try_from(millis).unwrap_or(i64::MAX))
	}

	/// Returns the Unix timestamp in seconds.
	pub const fn unix_seconds(self) -> i64 {
		self.0
	}

	/// Formats the UTC calendar date (`YYYY-MM-DD`) used in the credential scope.
	///
	/// The date is always derived in UTC, independent of the host time zone.
	pub fn utc_date(self) -> Result<String, SignatureInputError> {
		let out_of_range = || SignatureInputError::TimestampOutOfRange { seconds: self.0 };

		OffsetDateTime::from_unix_timestamp(self.0)
			.map_err(|_| out_of_range())?
			.format(SCOPE_DATE)
			.map_err(|_| out_of_range())
	}
}
impl Display for Timestamp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}
