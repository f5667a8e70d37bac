//! Cookie-style credential storage: the store contract plus the built-in backends.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{TokenExpiry, TokenGrant, TokenSecret},
};

/// Boxed future returned by every [`CredentialStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key/value backend that keeps credentials outside process memory.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`.
	fn get(&self, key: CredentialKey) -> StoreFuture<'_, Option<String>>;

	/// Writes or replaces the value stored under `key`.
	fn set(&self, key: CredentialKey, value: String) -> StoreFuture<'_, ()>;

	/// Removes `key`; removing an absent key succeeds.
	fn remove(&self, key: CredentialKey) -> StoreFuture<'_, ()>;

	/// Removes every credential key.
	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			for key in CredentialKey::ALL {
				self.remove(key).await?;
			}

			Ok(())
		})
	}
}
impl dyn CredentialStore {
	/// Reads all credential keys into one snapshot.
	///
	/// An unparsable expiry is treated as absent, which the freshness check reads as expired.
	pub async fn load(&self) -> Result<Credentials, StoreError> {
		let access_token = self.get(CredentialKey::AccessToken).await?.map(TokenSecret::new);
		let refresh_token = self.get(CredentialKey::RefreshToken).await?.map(TokenSecret::new);
		let expiry = self
			.get(CredentialKey::TokenExpiry)
			.await?
			.and_then(|raw| raw.parse::<TokenExpiry>().ok());

		Ok(Credentials { access_token, refresh_token, expiry })
	}

	/// Persists a grant: access token and expiry always, refresh token only when rotated.
	pub async fn save_grant(&self, grant: &TokenGrant, expiry: TokenExpiry) -> Result<(), StoreError> {
		self.set(CredentialKey::AccessToken, grant.access_token.expose().to_owned()).await?;
		self.set(CredentialKey::TokenExpiry, expiry.to_string()).await?;

		if let Some(refresh) = &grant.refresh_token {
			self.set(CredentialKey::RefreshToken, refresh.expose().to_owned()).await?;
		}

		Ok(())
	}

	/// Stores `value` as JSON under [`CredentialKey::User`].
	pub async fn save_user<U>(&self, value: &U) -> Result<(), StoreError>
	where
		U: Sync + Serialize,
	{
		let encoded = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
			message: format!("Failed to encode user: {e}"),
		})?;

		self.set(CredentialKey::User, encoded).await
	}

	/// Decodes the JSON stored under [`CredentialKey::User`].
	pub async fn load_user<U>(&self) -> Result<Option<U>, StoreError>
	where
		U: DeserializeOwned,
	{
		match self.get(CredentialKey::User).await? {
			Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
				StoreError::Serialization { message: format!("Failed to decode user: {e}") }
			}),
			None => Ok(None),
		}
	}
}

/// Keys written by the client, named as the browser cookies they replace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKey {
	/// Bearer token attached to API calls.
	AccessToken,
	/// Token exchanged at the refresh endpoint.
	RefreshToken,
	/// Access token expiry as Unix seconds.
	TokenExpiry,
	/// JSON snapshot of the signed-in user.
	User,
}
impl CredentialKey {
	/// Every key, in the order they are cleared.
	pub const ALL: [Self; 4] = [Self::AccessToken, Self::RefreshToken, Self::TokenExpiry, Self::User];

	/// Returns the cookie name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "access_token",
			Self::RefreshToken => "refresh_token",
			Self::TokenExpiry => "token_expiry",
			Self::User => "user",
		}
	}
}
impl Display for CredentialKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token-related keys read together before an authenticated call.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
	/// Stored access token.
	pub access_token: Option<TokenSecret>,
	/// Stored refresh token.
	pub refresh_token: Option<TokenSecret>,
	/// Stored access token expiry.
	pub expiry: Option<TokenExpiry>,
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expiry", &self.expiry)
			.finish()
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Encoding or decoding failure for a stored value.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
