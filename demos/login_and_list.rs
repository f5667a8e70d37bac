//! Signs in against a mock back office, lists vendors, and lets an expired access token
//! refresh transparently before the dashboard call.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use lettings_client::{
	auth::TokenExpiry,
	config::ClientConfig,
	session::Session,
	store::{CredentialKey, CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).header("content-type", "application/json").body(
				r#"{"accessToken":"demo-access","refreshToken":"demo-refresh","expiresIn":900,
				"user":{"id":"u-1","email":"demo@agency.test","first_name":"Demo","last_name":"User"}}"#,
			);
		})
		.await;
	let vendors_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/vendor/getVendors").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"vendors":[{"id":"v-1","name":"Acme Lettings"}],"totalPages":1}"#);
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh").header("authorization", "Bearer demo-refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"accessToken":"demo-access-2","expiresIn":900}"#);
		})
		.await;
	let stats_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/dashboard/stats").header("authorization", "Bearer demo-access-2");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"totalProperties":12,"occupancyRate":91.5}"#);
		})
		.await;
	let config = ClientConfig::builder(server.base_url()).build()?;
	let store = Arc::new(MemoryStore::default());
	let session = Session::new(
		config,
		store.clone(),
		Arc::new(|route: &str| println!("Redirecting to {route}.")),
	);
	let signed_in = session.auth().login("demo@agency.test", "demo-password").await?;

	println!("Signed in as {}.", signed_in.user.full_name());

	let page = session.vendors().list(1, "").await?;

	for vendor in &page.items {
		println!("Vendor {} ({}).", vendor.name, vendor.id);
	}

	// Age the stored expiry so the next call refreshes first.
	store
		.set(
			CredentialKey::TokenExpiry,
			TokenExpiry::after(OffsetDateTime::now_utc(), Duration::minutes(-1)).to_string(),
		)
		.await?;

	let stats = session.dashboard().stats().await?;

	println!("{} properties, {}% occupied.", stats.total_properties, stats.occupancy_rate);

	login_mock.assert_calls_async(1).await;
	vendors_mock.assert_calls_async(1).await;
	refresh_mock.assert_calls_async(1).await;
	stats_mock.assert_calls_async(1).await;

	Ok(())
}
