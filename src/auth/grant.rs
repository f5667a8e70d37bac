//! Token payloads returned by the login and refresh endpoints.

// self
use crate::{
	_prelude::*,
	auth::{TokenExpiry, TokenSecret},
};

/// Tokens minted by `auth/login` or `auth/refresh`.
///
/// The backend has shipped both camelCase and snake_case spellings, sometimes in the same body.
/// Both are accepted; a non-empty camelCase value wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawGrant")]
pub struct TokenGrant {
	/// Newly issued access token.
	#[serde(rename = "accessToken")]
	pub access_token: TokenSecret,
	/// Rotated refresh token, when the backend rotates on this call.
	#[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Access token lifetime in seconds.
	#[serde(rename = "expiresIn", skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<i64>,
}
impl TokenGrant {
	/// Creates a grant with only an access token.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self { access_token: TokenSecret::new(access_token), refresh_token: None, expires_in: None }
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Attaches a lifetime in seconds.
	pub fn with_expires_in(mut self, seconds: i64) -> Self {
		self.expires_in = Some(seconds);

		self
	}

	/// Lifetime to persist; absent or non-positive values fall back to `default`.
	pub fn lifetime(&self, default: Duration) -> Duration {
		match self.expires_in {
			Some(seconds) if seconds > 0 => Duration::seconds(seconds),
			_ => default,
		}
	}

	/// Expiry instant to persist alongside the access token.
	pub fn expiry(&self, now: OffsetDateTime, default: Duration) -> TokenExpiry {
		TokenExpiry::after(now, self.lifetime(default))
	}
}

#[derive(Deserialize)]
struct RawGrant {
	#[serde(default, rename = "accessToken")]
	access_token_camel: Option<TokenSecret>,
	#[serde(default)]
	access_token: Option<TokenSecret>,
	#[serde(default, rename = "refreshToken")]
	refresh_token_camel: Option<TokenSecret>,
	#[serde(default)]
	refresh_token: Option<TokenSecret>,
	#[serde(default, rename = "expiresIn")]
	expires_in_camel: Option<i64>,
	#[serde(default)]
	expires_in: Option<i64>,
}
impl TryFrom<RawGrant> for TokenGrant {
	type Error = &'static str;

	fn try_from(raw: RawGrant) -> Result<Self, Self::Error> {
		let access_token = prefer_secret(raw.access_token_camel, raw.access_token)
			.ok_or("missing field `accessToken`")?;
		let expires_in = match raw.expires_in_camel {
			Some(seconds) if seconds != 0 => Some(seconds),
			camel => raw.expires_in.or(camel),
		};

		Ok(Self {
			access_token,
			refresh_token: prefer_secret(raw.refresh_token_camel, raw.refresh_token),
			expires_in,
		})
	}
}

fn prefer_secret(camel: Option<TokenSecret>, snake: Option<TokenSecret>) -> Option<TokenSecret> {
	match camel {
		Some(token) if token.is_blank() => snake.or(Some(token)),
		camel => camel.or(snake),
	}
}
