//! Authenticated session: bearer injection, proactive and reactive token refresh, and the
//! validation timer.
//!
//! A [`Session`] owns the transport, the credential store, the [`Navigator`] that takes the
//! user back to the login route, and one [`RefreshGate`]. Every path that needs a new access
//! token (the expiry check before a call, a 401 on a call, and the validation timer) goes
//! through that gate, so one expiry event produces one refresh call no matter how many
//! requests observe it.

mod gate;
mod metrics;
mod refresh;
mod request;
mod tokens;
mod validation;

pub use gate::{GatePass, RefreshGate, RefreshOutcome};
pub use metrics::RefreshMetrics;
pub use request::{ApiCall, ApiResponse};
pub use validation::TokenValidation;

// self
use crate::{_prelude::*, config::ClientConfig, http::HttpTransport, store::CredentialStore};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Session specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestSession = Session<ReqwestHttpClient>;

/// Receives the instruction to show the login screen once credentials are gone.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Navigates to `route`.
	fn redirect(&self, route: &str);
}
impl<F> Navigator for F
where
	F: Send + Sync + Fn(&str),
{
	fn redirect(&self, route: &str) {
		self(route)
	}
}

/// Authenticated handle to the back office API.
///
/// Cloning is cheap and every clone shares the same gate, store, and metrics.
pub struct Session<T>
where
	T: ?Sized + HttpTransport,
{
	/// Validated client settings.
	pub config: Arc<ClientConfig>,
	/// Transport used for every backend call.
	pub transport: Arc<T>,
	/// Credential store holding tokens and the signed-in user.
	pub store: Arc<dyn CredentialStore>,
	/// Target of login redirects.
	pub navigator: Arc<dyn Navigator>,
	/// Counters for refresh attempts and coalesced waiters.
	pub refresh_metrics: Arc<RefreshMetrics>,
	gate: Arc<RefreshGate>,
}
impl<T> Session<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a session over a caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		navigator: Arc<dyn Navigator>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			config: Arc::new(config),
			transport: transport.into(),
			store,
			navigator,
			refresh_metrics: Default::default(),
			gate: Default::default(),
		}
	}

	/// Returns `true` while a token refresh request is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.gate.is_refreshing()
	}

	/// Number of completed refresh attempts, successful or not.
	pub fn refresh_generation(&self) -> u64 {
		self.gate.generation()
	}
}
#[cfg(feature = "reqwest")]
impl Session<ReqwestHttpClient> {
	/// Creates a session backed by a default reqwest client.
	pub fn new(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		Self::with_transport(config, store, navigator, ReqwestHttpClient::default())
	}
}
impl<T> Clone for Session<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			transport: self.transport.clone(),
			store: self.store.clone(),
			navigator: self.navigator.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			gate: self.gate.clone(),
		}
	}
}
impl<T> Debug for Session<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("base_url", &self.config.base_url.as_str())
			.field("refreshing", &self.gate.is_refreshing())
			.field("generation", &self.gate.generation())
			.finish()
	}
}
