//! Access token expiry stored as Unix seconds, plus the freshness check run before every call.

// self
use crate::_prelude::*;

/// Instant (Unix seconds) after which the stored access token should no longer be sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenExpiry(i64);
impl TokenExpiry {
	/// Wraps a Unix timestamp in seconds.
	pub const fn from_unix(seconds: i64) -> Self {
		Self(seconds)
	}

	/// Computes `now + lifetime`.
	pub fn after(now: OffsetDateTime, lifetime: Duration) -> Self {
		Self(now.unix_timestamp().saturating_add(lifetime.whole_seconds()))
	}

	/// Returns the Unix timestamp in seconds.
	pub const fn unix(self) -> i64 {
		self.0
	}

	/// Seconds remaining at `now`; negative once the instant has passed.
	pub fn time_left(self, now: OffsetDateTime) -> i64 {
		self.0.saturating_sub(now.unix_timestamp())
	}

	/// A token with `leeway` or fewer seconds left counts as expired.
	pub fn is_expired_at(self, now: OffsetDateTime, leeway: Duration) -> bool {
		self.time_left(now) <= leeway.whole_seconds()
	}
}
impl Display for TokenExpiry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}
impl FromStr for TokenExpiry {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		s.trim().parse().map(Self)
	}
}

/// Snapshot of the stored expiry, mirroring what the back office shows in its debug panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
	/// Expiry as Unix seconds.
	pub expiry: i64,
	/// Seconds remaining at the time of the snapshot.
	pub time_left: i64,
	/// Whether the token already counts as expired.
	pub is_expired: bool,
}
impl TokenInfo {
	/// Builds the snapshot for `expiry` at `now`.
	pub fn at(expiry: TokenExpiry, now: OffsetDateTime, leeway: Duration) -> Self {
		Self {
			expiry: expiry.unix(),
			time_left: expiry.time_left(now),
			is_expired: expiry.is_expired_at(now, leeway),
		}
	}
}

/// Freshness check run before each authenticated call.
///
/// A missing expiry counts as expired so the first call after a partial login refreshes.
pub fn is_token_expired(expiry: Option<TokenExpiry>, now: OffsetDateTime, leeway: Duration) -> bool {
	expiry.is_none_or(|expiry| expiry.is_expired_at(now, leeway))
}
