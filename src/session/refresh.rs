//! Token refresh through the session's gate.
//!
//! Both the expiry check that precedes each call and the 401 handler land in
//! [`Session::refresh_after`], so a proactive and a reactive refresh for the same expiry window
//! collapse into one call to the refresh endpoint. Only the gate leader talks to the backend,
//! and only the leader clears credentials and redirects when the refresh fails.

// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenSecret, is_token_expired},
	error::ApiError,
	http::{ApiRequest, HttpTransport, Method, RequestBody},
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::{GatePass, RefreshOutcome, Session, request},
	store::CredentialKey,
};

/// Bearer token plus the gate generation it was read under.
#[derive(Clone, Debug)]
pub(crate) struct Authorization {
	pub(crate) generation: u64,
	pub(crate) token: TokenSecret,
	/// Set when obtaining this token already went through a refresh.
	pub(crate) refreshed: bool,
}

impl<T> Session<T>
where
	T: ?Sized + HttpTransport,
{
	/// Returns a usable access token, refreshing first when the stored one has expired.
	pub async fn ensure_fresh_token(&self) -> Result<TokenSecret> {
		self.authorize().await.map(|auth| auth.token)
	}

	/// Refreshes unconditionally, still coalescing with any refresh already in flight.
	pub async fn force_refresh(&self) -> Result<TokenSecret> {
		self.refresh_after(self.gate.generation()).await
	}

	pub(crate) async fn authorize(&self) -> Result<Authorization> {
		let generation = self.gate.generation();
		let credentials = self.store.load().await?;
		let now = OffsetDateTime::now_utc();

		if !is_token_expired(credentials.expiry, now, self.config.expiry_leeway) {
			if let Some(token) = credentials.access_token.filter(|token| !token.is_blank()) {
				return Ok(Authorization { generation, token, refreshed: false });
			}
		}

		let token = self.refresh_after(generation).await?;

		Ok(Authorization { generation: self.gate.generation(), token, refreshed: true })
	}

	/// Waits behind or leads the refresh for the token read under `observed`.
	pub(crate) async fn refresh_after(&self, observed: u64) -> Result<TokenSecret> {
		let pass = self.gate.run(observed, || self.lead_refresh()).await;

		if matches!(pass, GatePass::Joined(_)) {
			self.refresh_metrics.record_joined();
			obs::refresh_joined(observed);
		}

		match pass.into_outcome() {
			RefreshOutcome::Refreshed(token) => Ok(token),
			RefreshOutcome::Failed { reason } => Err(Error::SessionExpired { reason }),
			RefreshOutcome::Unavailable => Err(Error::NotSignedIn),
		}
	}

	/// Clears every credential and sends the navigator to the login route.
	pub async fn end_session(&self, reason: &str) {
		if let Err(e) = self.store.clear().await {
			obs::cleanup_failed("clear_credentials", &e);
		}

		obs::session_expired(reason, &self.config.login_route);
		self.navigator.redirect(&self.config.login_route);
	}

	async fn lead_refresh(&self) -> RefreshOutcome {
		const KIND: CallKind = CallKind::Refresh;

		let refresh_token = match self.store.get(CredentialKey::RefreshToken).await {
			Ok(Some(raw)) if !raw.trim().is_empty() => TokenSecret::new(raw),
			Ok(_) => return RefreshOutcome::Unavailable,
			Err(e) => return RefreshOutcome::Failed { reason: e.to_string() },
		};
		let span = CallSpan::new(KIND, "refresh");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		match span.instrument(self.exchange_refresh_token(&refresh_token)).await {
			Ok(token) => {
				self.refresh_metrics.record_success();
				obs::record_call_outcome(KIND, CallOutcome::Success);

				RefreshOutcome::Refreshed(token)
			},
			Err(err) => {
				self.refresh_metrics.record_failure();
				obs::record_call_outcome(KIND, CallOutcome::Failure);

				let reason = err.to_string();

				self.end_session(&reason).await;

				RefreshOutcome::Failed { reason }
			},
		}
	}

	async fn exchange_refresh_token(&self, refresh_token: &TokenSecret) -> Result<TokenSecret> {
		let url = self.config.endpoint(&self.config.refresh_path)?;
		let request = ApiRequest::new(Method::Post, url)
			.with_header("Accept", request::JSON)
			.with_header("Content-Type", request::JSON)
			.with_header("Authorization", refresh_token.bearer())
			.with_body(RequestBody::Json(b"{}".to_vec()));
		let response = self.transport.execute(request).await?;

		if !response.is_success() {
			return Err(ApiError::from_status(response.status, &response.body).into());
		}

		let grant: TokenGrant = request::decode(&response)?;

		self.persist_grant(&grant).await?;

		Ok(grant.access_token)
	}
}
