//! Direct access to the stored credentials.

// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenInfo, TokenSecret},
	http::HttpTransport,
	session::Session,
	store::CredentialKey,
};

impl<T> Session<T>
where
	T: ?Sized + HttpTransport,
{
	/// Persists a grant received outside the refresh path, usually from `auth/login`.
	pub async fn store_tokens(&self, grant: &TokenGrant) -> Result<()> {
		self.persist_grant(grant).await
	}

	/// Removes every stored credential without redirecting.
	pub async fn clear_tokens(&self) -> Result<()> {
		self.store.clear().await?;

		Ok(())
	}

	/// Returns the stored access token as-is, expired or not.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.get(CredentialKey::AccessToken).await?.map(TokenSecret::new))
	}

	/// Describes the stored expiry, or `None` when no parsable expiry is stored.
	pub async fn token_info(&self) -> Result<Option<TokenInfo>> {
		let credentials = self.store.load().await?;
		let now = OffsetDateTime::now_utc();

		Ok(credentials.expiry.map(|expiry| TokenInfo::at(expiry, now, self.config.expiry_leeway)))
	}

	/// Applies the pre-call freshness check to the stored expiry.
	pub async fn is_token_expired(&self) -> Result<bool> {
		let credentials = self.store.load().await?;

		Ok(crate::auth::is_token_expired(
			credentials.expiry,
			OffsetDateTime::now_utc(),
			self.config.expiry_leeway,
		))
	}

	pub(crate) async fn persist_grant(&self, grant: &TokenGrant) -> Result<()> {
		if grant.access_token.is_blank() {
			return Err(Error::MissingAccessToken);
		}

		let expiry = grant.expiry(OffsetDateTime::now_utc(), self.config.default_expires_in);

		self.store.save_grant(grant, expiry).await?;

		Ok(())
	}
}
