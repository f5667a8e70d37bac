//! Periodic token validation.
//!
//! Each tick makes sure a usable access token is stored (refreshing through the gate when it is
//! not), then asks the backend whether that token is still recognised. Whichever check fails
//! ends the session once, and the background task stops with it.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::{
	task::JoinHandle,
	time::{self as tokio_time, Instant, MissedTickBehavior},
};
// self
use crate::{
	_prelude::*,
	http::{ApiRequest, HttpTransport, Method},
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::{Session, request},
	store::CredentialKey,
};

/// Handle to the background validation task; dropping it stops the task.
#[derive(Debug)]
pub struct TokenValidation {
	handle: JoinHandle<()>,
}
impl TokenValidation {
	/// Stops the task.
	pub fn stop(self) {}

	/// Returns `true` once the task has stopped.
	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}
}
impl Drop for TokenValidation {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

impl<T> Session<T>
where
	T: ?Sized + HttpTransport,
{
	/// Asks the introspection endpoint whether the stored access token is still valid.
	///
	/// Any failure, including a network error, reads as `false`.
	pub async fn check_refresh_token_expiration(&self) -> bool {
		const KIND: CallKind = CallKind::Validation;

		let span = CallSpan::new(KIND, "token_info");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let valid = matches!(span.instrument(self.introspect()).await, Ok(true));

		obs::record_call_outcome(KIND, if valid { CallOutcome::Success } else { CallOutcome::Failure });

		valid
	}

	/// Makes sure a usable access token is stored, refreshing it when expired, then confirms
	/// it with the introspection endpoint.
	///
	/// Returns `false` when the session did not survive. A failed refresh has already ended the
	/// session; any other failure ends it here.
	pub async fn check_token_info(&self) -> bool {
		match self.authorize().await {
			Ok(_) => {},
			Err(Error::SessionExpired { .. }) => return false,
			Err(e) => {
				self.end_session(&e.to_string()).await;

				return false;
			},
		}

		if self.check_refresh_token_expiration().await {
			return true;
		}

		self.end_session("introspection failed after the token check").await;

		false
	}

	/// Runs one validation tick and reports whether the session survived it.
	///
	/// An expired access token is refreshed before the introspection call, so only a session
	/// whose refresh also fails, or whose fresh token is rejected, is ended.
	pub async fn validate_once(&self) -> bool {
		self.check_token_info().await
	}

	/// Spawns validation on the configured interval; the first tick runs one interval from now.
	///
	/// Must be called inside a Tokio runtime.
	pub fn start_token_validation(&self) -> TokenValidation {
		self.start_token_validation_every(self.config.validation_interval)
	}

	/// Spawns validation every `interval`; non-positive values fall back to the configured one.
	///
	/// The task finishes on its own after the first tick that ends the session.
	pub fn start_token_validation_every(&self, interval: Duration) -> TokenValidation {
		let period = StdDuration::try_from(interval)
			.ok()
			.filter(|period| !period.is_zero())
			.or_else(|| StdDuration::try_from(self.config.validation_interval).ok())
			.filter(|period| !period.is_zero())
			.unwrap_or(StdDuration::from_secs(300));
		let session = self.clone();
		let handle = tokio::spawn(async move {
			let mut ticker = tokio_time::interval_at(Instant::now() + period, period);

			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				ticker.tick().await;

				if !session.validate_once().await {
					break;
				}
			}
		});

		TokenValidation { handle }
	}

	async fn introspect(&self) -> Result<bool> {
		let url = self.config.endpoint(&self.config.token_info_path)?;
		let token = self.store.get(CredentialKey::AccessToken).await?.unwrap_or_default();
		let request = ApiRequest::new(Method::Get, url)
			.with_header("Accept", request::JSON)
			.with_header("Content-Type", request::JSON)
			.with_header("Authorization", format!("Bearer {token}"));
		let response = self.transport.execute(request).await?;

		Ok(response.is_success())
	}
}
