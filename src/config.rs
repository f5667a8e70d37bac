//! Client settings: backend base URL, login route, and token timing knobs.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Validated settings shared by every call a session makes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL for every endpoint; always ends in `/`.
	pub base_url: Url,
	/// Route the navigator is sent to when the session ends.
	pub login_route: String,
	/// Remaining lifetime at or below which an access token counts as expired.
	pub expiry_leeway: Duration,
	/// Lifetime assumed when the token endpoint omits `expires_in`.
	pub default_expires_in: Duration,
	/// Period of the background token validation task.
	pub validation_interval: Duration,
	/// Refresh endpoint, relative to the base URL.
	pub refresh_path: String,
	/// Token introspection endpoint, relative to the base URL.
	pub token_info_path: String,
}
impl ClientConfig {
	/// Environment variable holding the backend base URL.
	pub const API_URL_ENV: &'static str = "VITE_API_URL";

	/// Returns a builder seeded with defaults for `base_url`.
	pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Builds a default configuration from [`Self::API_URL_ENV`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let base_url =
			env::var(Self::API_URL_ENV).map_err(|_| ConfigError::MissingEnv { name: Self::API_URL_ENV })?;

		Self::builder(base_url).build()
	}

	/// Resolves `path` (leading slashes ignored) against the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let relative = path.trim_start_matches('/');

		self.base_url
			.join(relative)
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.to_owned(), source })
	}

	/// Resolves `path` and appends `query` pairs in order.
	pub fn endpoint_with_query(&self, path: &str, query: &[(String, String)]) -> Result<Url, ConfigError> {
		let mut url = self.endpoint(path)?;

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		Ok(url)
	}
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	base_url: String,
	login_route: String,
	expiry_leeway: Duration,
	default_expires_in: Duration,
	validation_interval: Duration,
	refresh_path: String,
	token_info_path: String,
}
impl ClientConfigBuilder {
	fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			login_route: "/".into(),
			expiry_leeway: Duration::SECOND,
			default_expires_in: Duration::hours(1),
			validation_interval: Duration::minutes(5),
			refresh_path: "auth/refresh".into(),
			token_info_path: "auth/token-info".into(),
		}
	}

	/// Overrides the login route (defaults to `/`).
	pub fn login_route(mut self, route: impl Into<String>) -> Self {
		self.login_route = route.into();

		self
	}

	/// Overrides the expiry leeway (defaults to one second). Negative values clamp to zero.
	pub fn expiry_leeway(mut self, leeway: Duration) -> Self {
		self.expiry_leeway = if leeway.is_negative() { Duration::ZERO } else { leeway };

		self
	}

	/// Overrides the fallback token lifetime (defaults to one hour).
	pub fn default_expires_in(mut self, lifetime: Duration) -> Self {
		self.default_expires_in = lifetime;

		self
	}

	/// Overrides the validation period (defaults to five minutes).
	pub fn validation_interval(mut self, interval: Duration) -> Self {
		self.validation_interval = interval;

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the token introspection endpoint path.
	pub fn token_info_path(mut self, path: impl Into<String>) -> Self {
		self.token_info_path = path.into();

		self
	}

	/// Validates the settings.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let mut base_url = Url::parse(self.base_url.trim())
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { scheme: base_url.scheme().to_owned() });
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}
		if !self.default_expires_in.is_positive() {
			return Err(ConfigError::NonPositiveDuration { setting: "default_expires_in" });
		}
		if !self.validation_interval.is_positive() {
			return Err(ConfigError::NonPositiveDuration { setting: "validation_interval" });
		}

		Ok(ClientConfig {
			base_url,
			login_route: self.login_route,
			expiry_leeway: self.expiry_leeway,
			default_expires_in: self.default_expires_in,
			validation_interval: self.validation_interval,
			refresh_path: self.refresh_path,
			token_info_path: self.token_info_path,
		})
	}
}
