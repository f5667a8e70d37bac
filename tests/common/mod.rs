#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use httpmock::MockServer;
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
// self
use lettings_client::{
	auth::TokenExpiry,
	config::ClientConfig,
	http::ReqwestHttpClient,
	session::{Navigator, Session},
	store::{CredentialKey, CredentialStore, MemoryStore, StoreFuture},
};

pub const LOGIN_ROUTE: &str = "/login";

/// Records every redirect instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
	routes: Mutex<Vec<String>>,
}
impl RecordingNavigator {
	pub fn routes(&self) -> Vec<String> {
		self.routes.lock().clone()
	}

	pub fn count(&self) -> usize {
		self.routes.lock().len()
	}
}
impl Navigator for RecordingNavigator {
	fn redirect(&self, route: &str) {
		self.routes.lock().push(route.to_owned());
	}
}

/// Memory store that counts full clears.
#[derive(Debug, Default)]
pub struct CountingStore {
	pub inner: MemoryStore,
	clears: AtomicUsize,
}
impl CountingStore {
	pub fn clears(&self) -> usize {
		self.clears.load(Ordering::SeqCst)
	}
}
impl CredentialStore for CountingStore {
	fn get(&self, key: CredentialKey) -> StoreFuture<'_, Option<String>> {
		self.inner.get(key)
	}

	fn set(&self, key: CredentialKey, value: String) -> StoreFuture<'_, ()> {
		self.inner.set(key, value)
	}

	fn remove(&self, key: CredentialKey) -> StoreFuture<'_, ()> {
		self.inner.remove(key)
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		self.clears.fetch_add(1, Ordering::SeqCst);

		self.inner.clear()
	}
}

pub struct Harness {
	pub session: Session<ReqwestHttpClient>,
	pub store: Arc<CountingStore>,
	pub navigator: Arc<RecordingNavigator>,
}
impl Harness {
	pub async fn seed(&self, access: &str, refresh: Option<&str>, expires_in: Duration) {
		let store = &self.store.inner;
		let expiry = TokenExpiry::after(OffsetDateTime::now_utc(), expires_in);

		store
			.set(CredentialKey::AccessToken, access.to_owned())
			.await
			.expect("Seeding the access token should succeed.");
		store
			.set(CredentialKey::TokenExpiry, expiry.to_string())
			.await
			.expect("Seeding the expiry should succeed.");

		if let Some(refresh) = refresh {
			store
				.set(CredentialKey::RefreshToken, refresh.to_owned())
				.await
				.expect("Seeding the refresh token should succeed.");
		}
	}

	pub async fn stored(&self, key: CredentialKey) -> Option<String> {
		self.store.inner.get(key).await.expect("Reading the store should succeed.")
	}
}

pub fn harness(server: &MockServer) -> Harness {
	harness_for(&server.base_url())
}

pub fn harness_for(base_url: &str) -> Harness {
	let config = ClientConfig::builder(base_url)
		.login_route(LOGIN_ROUTE)
		.build()
		.expect("Test configuration should build.");
	let store = Arc::new(CountingStore::default());
	let navigator = Arc::new(RecordingNavigator::default());
	let session = Session::new(config, store.clone(), navigator.clone());

	Harness { session, store, navigator }
}

pub const REFRESH_OK: &str = r#"{"accessToken":"access-fresh","refreshToken":"refresh-next","expiresIn":900}"#;
