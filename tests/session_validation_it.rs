#![cfg(feature = "reqwest")]

mod common;

// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
use time::Duration;
// self
use common::{LOGIN_ROUTE, REFRESH_OK, harness};
use lettings_client::store::CredentialKey;

#[tokio::test]
async fn introspection_accepts_live_token() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-live", Some("refresh-1"), Duration::hours(1)).await;

	let introspection = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info").header("authorization", "Bearer access-live");
			then.status(200).body("{\"valid\":true}");
		})
		.await;

	assert!(harness.session.check_refresh_token_expiration().await);

	introspection.assert_calls_async(1).await;
}

#[tokio::test]
async fn introspection_rejection_alone_keeps_credentials() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-live", Some("refresh-1"), Duration::hours(1)).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info");
			then.status(401).body("{}");
		})
		.await;

	assert!(!harness.session.check_refresh_token_expiration().await);
	assert_eq!(harness.store.clears(), 0);
	assert_eq!(harness.stored(CredentialKey::AccessToken).await.as_deref(), Some("access-live"));
}

#[tokio::test]
async fn rejected_introspection_logs_out() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-live", Some("refresh-1"), Duration::hours(1)).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info");
			then.status(401).body("{}");
		})
		.await;

	assert!(!harness.session.validate_once().await);
	assert_eq!(harness.store.clears(), 1);
	assert_eq!(harness.navigator.routes(), vec![LOGIN_ROUTE.to_owned()]);
	assert_eq!(harness.stored(CredentialKey::AccessToken).await, None);
}

#[tokio::test]
async fn valid_session_with_expired_access_token_refreshes() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-1"), Duration::seconds(-1)).await;

	let stale = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info").header("authorization", "Bearer access-stale");
			then.status(401).body("{}");
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info").header("authorization", "Bearer access-fresh");
			then.status(200).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh").header("authorization", "Bearer refresh-1");
			then.status(200).header("content-type", "application/json").body(REFRESH_OK);
		})
		.await;

	assert!(harness.session.validate_once().await);

	refresh.assert_calls_async(1).await;
	stale.assert_calls_async(0).await;
	fresh.assert_calls_async(1).await;

	assert_eq!(harness.store.clears(), 0);
	assert_eq!(harness.navigator.count(), 0);
	assert_eq!(harness.stored(CredentialKey::AccessToken).await.as_deref(), Some("access-fresh"));
}

#[tokio::test]
async fn failed_refresh_during_validation_logs_out_once() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-1"), Duration::seconds(-1)).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info");
			then.status(200).body("{}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(400).body("{\"error\":\"invalid refresh token\"}");
		})
		.await;

	assert!(!harness.session.check_token_info().await);
	assert_eq!(harness.store.clears(), 1);
	assert_eq!(harness.navigator.count(), 1);
}

#[tokio::test]
async fn token_check_confirms_the_refreshed_token() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-1"), Duration::seconds(-1)).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).header("content-type", "application/json").body(REFRESH_OK);
		})
		.await;

	let introspection = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info").header("authorization", "Bearer access-fresh");
			then.status(401).body("{}");
		})
		.await;

	assert!(!harness.session.check_token_info().await);

	introspection.assert_calls_async(1).await;

	assert_eq!(harness.store.clears(), 1);
	assert_eq!(harness.navigator.routes(), vec![LOGIN_ROUTE.to_owned()]);
}

#[tokio::test]
async fn background_validation_stops_after_ending_the_session() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-live", Some("refresh-1"), Duration::hours(1)).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info");
			then.status(401).body("{}");
		})
		.await;

	let validation = harness.session.start_token_validation_every(Duration::milliseconds(40));

	tokio::time::sleep(StdDuration::from_millis(300)).await;

	assert_eq!(harness.navigator.routes(), vec![LOGIN_ROUTE.to_owned()]);
	assert_eq!(harness.store.clears(), 1);
	assert!(validation.is_finished());
}

#[tokio::test]
async fn stopped_validation_never_ticks() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-live", Some("refresh-1"), Duration::hours(1)).await;

	let introspection = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/token-info");
			then.status(200).body("{}");
		})
		.await;
	let validation = harness.session.start_token_validation_every(Duration::milliseconds(40));

	validation.stop();
	tokio::time::sleep(StdDuration::from_millis(150)).await;

	introspection.assert_calls_async(0).await;

	assert_eq!(harness.navigator.count(), 0);
}
