//! Sign-in, sign-out, and the cached signed-in user.

// self
use crate::{
	_prelude::*,
	api::{User, resource_handle},
	auth::TokenGrant,
	http::HttpTransport,
	obs,
	session::{ApiCall, ApiResponse},
};

/// Credentials posted to `auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest").field("email", &self.email).field("password", &"<redacted>").finish()
	}
}

/// Body returned by `auth/login`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
	/// Issued tokens.
	#[serde(flatten)]
	pub grant: TokenGrant,
	/// Backend session identifier.
	#[serde(default, rename = "sessionId", skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	/// Signed-in user.
	pub user: User,
}

resource_handle!(
	/// Authentication endpoints.
	AuthApi,
	auth
);
impl<T> AuthApi<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// Signs in, then stores the tokens and the user snapshot.
	pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
		let body = LoginRequest { email: email.to_owned(), password: password.to_owned() };
		let call = ApiCall::post("auth/login").unauthenticated().json(&body)?;
		let response: LoginResponse = self.session.request(call).await?.into_result()?;

		self.session.store_tokens(&response.grant).await?;
		self.session.store.save_user(&response.user).await?;

		Ok(response)
	}

	/// Tells the backend to end the session, then clears local credentials either way.
	pub async fn logout(&self) -> Result<()> {
		let call = ApiCall::post("auth/logout").json(&serde_json::json!({}))?;

		match self.session.request::<JsonValue>(call).await {
			Ok(ApiResponse { error: Some(e), .. }) => obs::cleanup_failed("logout", &e),
			Err(e) => obs::cleanup_failed("logout", &e),
			Ok(_) => {},
		}

		self.session.clear_tokens().await
	}

	/// Returns the user stored at sign-in.
	pub async fn current_user(&self) -> Result<Option<User>> {
		Ok(self.session.store.load_user().await?)
	}
}
