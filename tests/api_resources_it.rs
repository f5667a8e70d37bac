#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use time::Duration;
// self
use common::{Harness, harness};
use lettings_client::{
	api::{ActivityKind, PropertyFilter, Role, User},
	error::{Error, ErrorKind},
	store::CredentialKey,
};

const LOGIN_OK: &str = r#"{
	"accessToken": "access-login",
	"refreshToken": "refresh-login",
	"expiresIn": 3600,
	"sessionId": "s-42",
	"user": {
		"id": "u-1",
		"email": "alex@agency.test",
		"first_name": "Alex",
		"last_name": "Morgan",
		"role": "Admin",
		"Town": "Leeds"
	}
}"#;

async fn seeded(server: &MockServer) -> Harness {
	let harness = harness(server);

	harness.seed("access-live", Some("refresh-1"), Duration::hours(1)).await;

	harness
}

#[tokio::test]
async fn login_stores_tokens_and_user() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.header("content-type", "application/json")
				.header_missing("authorization")
				.json_body(serde_json::json!({ "email": "alex@agency.test", "password": "hunter2" }));
			then.status(200).header("content-type", "application/json").body(LOGIN_OK);
		})
		.await;
	let response = harness
		.session
		.auth()
		.login("alex@agency.test", "hunter2")
		.await
		.expect("Login should succeed.");

	login.assert_calls_async(1).await;

	assert_eq!(response.session_id.as_deref(), Some("s-42"));
	assert_eq!(harness.stored(CredentialKey::AccessToken).await.as_deref(), Some("access-login"));
	assert_eq!(harness.stored(CredentialKey::RefreshToken).await.as_deref(), Some("refresh-login"));
	assert!(harness.stored(CredentialKey::TokenExpiry).await.is_some());

	let user: User = harness
		.session
		.auth()
		.current_user()
		.await
		.expect("Reading the user should succeed.")
		.expect("User should be stored after login.");

	assert_eq!(user.full_name(), "Alex Morgan");
	assert_eq!(user.role, Role::Admin);
	assert_eq!(user.town.as_deref(), Some("Leeds"));
	assert!(!harness.session.is_token_expired().await.expect("Expiry check should succeed."));
}

#[tokio::test]
async fn rejected_login_surfaces_the_server_message() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"message\":\"Invalid email or password\"}");
		})
		.await;

	let err = harness
		.session
		.auth()
		.login("alex@agency.test", "wrong")
		.await
		.expect_err("Login should fail.");

	match err {
		Error::Api(api) => {
			assert_eq!(api.kind, ErrorKind::BadRequest);
			assert_eq!(api.message, "Invalid email or password");
		},
		other => panic!("Expected an API error, got {other:?}."),
	}

	assert!(harness.store.inner.is_empty());
}

#[tokio::test]
async fn logout_clears_credentials_even_when_the_backend_fails() {
	let server = MockServer::start_async().await;
	let harness = seeded(&server).await;
	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout").header("authorization", "Bearer access-live");
			then.status(500).body("");
		})
		.await;

	harness.session.auth().logout().await.expect("Logout should still clear local state.");

	logout.assert_calls_async(1).await;

	assert!(harness.store.inner.is_empty());
	assert_eq!(harness.navigator.count(), 0);
}

#[tokio::test]
async fn vendor_list_sends_paging_and_search() {
	let server = MockServer::start_async().await;
	let harness = seeded(&server).await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/vendor/getVendors")
				.query_param("page", "1")
				.query_param("limit", "10")
				.query_param("search", "acme")
				.header("authorization", "Bearer access-live");
			then.status(200).header("content-type", "application/json").body(
				r#"{"vendors":[{"id":"v-1","name":"Acme Lettings","email":"ops@acme.test"}],"totalPages":3}"#,
			);
		})
		.await;
	// Page zero is clamped to the first page.
	let page = harness.session.vendors().list(0, "acme").await.expect("Vendor list should load.");

	list.assert_calls_async(1).await;

	assert_eq!(page.total_pages, 3);
	assert_eq!(page.items.len(), 1);
	assert_eq!(page.items[0].name, "Acme Lettings");
}

#[tokio::test]
async fn property_filters_skip_blank_values() {
	let server = MockServer::start_async().await;
	let harness = seeded(&server).await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/properties")
				.query_param("page", "2")
				.query_param("limit", "10")
				.query_param("status", "published")
				.query_param_missing("category")
				.query_param_missing("postCode");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"items":[{"id":"p-9","propertyName":"Flat 2","status":"published"}],"totalPages":2}"#);
		})
		.await;
	let filter = PropertyFilter::page(2).status("published").category("  ");
	let page = harness.session.properties().list(&filter).await.expect("Property list should load.");

	list.assert_calls_async(1).await;

	assert_eq!(page.items[0].property_name, "Flat 2");
}

#[tokio::test]
async fn dashboard_activities_default_to_ten_and_tolerate_odd_bodies() {
	let server = MockServer::start_async().await;
	let harness = seeded(&server).await;
	let listed = server
		.mock_async(|when, then| {
			when.method(GET).path("/dashboard/activities").query_param("limit", "10");
			then.status(200).header("content-type", "application/json").body(
				r#"[{"id":"a-1","type":"payment","action":"received","description":"Rent paid","timestamp":"2025-06-01T09:00:00Z"}]"#,
			);
		})
		.await;
	let activities =
		harness.session.dashboard().activities(None).await.expect("Activities should load.");

	listed.assert_calls_async(1).await;

	assert_eq!(activities.len(), 1);
	assert_eq!(activities[0].kind, ActivityKind::Payment);

	let odd = server
		.mock_async(|when, then| {
			when.method(GET).path("/dashboard/activities").query_param("limit", "3");
			then.status(200).header("content-type", "application/json").body("{\"status\":\"ok\"}");
		})
		.await;
	let activities =
		harness.session.dashboard().activities(Some(3)).await.expect("Activities should load.");

	odd.assert_calls_async(1).await;

	assert!(activities.is_empty());
}

#[tokio::test]
async fn empty_dashboard_stats_read_as_zero() {
	let server = MockServer::start_async().await;
	let harness = seeded(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/dashboard/stats");
			then.status(200).body("");
		})
		.await;

	let stats = harness.session.dashboard().stats().await.expect("Stats should load.");

	assert_eq!(stats.total_properties, 0);
	assert!(stats.recent_activities.is_empty());
}

#[tokio::test]
async fn missing_rent_record_reads_as_none() {
	let server = MockServer::start_async().await;
	let harness = seeded(&server).await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET).path("/property-management/rent").query_param("propertyId", "p-9");
			then.status(200).header("content-type", "application/json").body("{\"rents\":null}");
		})
		.await;
	let rent = harness.session.rents().for_property("p-9").await.expect("Lookup should succeed.");

	lookup.assert_calls_async(1).await;

	assert!(rent.is_none());
}

#[tokio::test]
async fn resource_failures_collapse_into_api_errors() {
	let server = MockServer::start_async().await;
	let harness = seeded(&server).await;

	server
		.mock_async(|when, then| {
			when.method(DELETE).path("/vendor/delete/v-404");
			then.status(404).body("");
		})
		.await;

	let err = harness.session.vendors().delete("v-404").await.expect_err("Delete should fail.");

	assert!(matches!(err, Error::Api(ref api) if api.kind == ErrorKind::NotFound), "Unexpected error: {err:?}.");
}
