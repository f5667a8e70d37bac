#![cfg(feature = "reqwest")]

mod common;

// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
use serde_json::Value as JsonValue;
use time::Duration;
// self
use common::{LOGIN_ROUTE, REFRESH_OK, harness};
use lettings_client::{error::{Error, ErrorKind}, store::CredentialKey};

#[tokio::test]
async fn concurrent_expired_requests_share_one_refresh() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-1"), Duration::seconds(-60)).await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/refresh")
				.header("authorization", "Bearer refresh-1")
				.body("{}");
			then.status(200)
				.header("content-type", "application/json")
				.delay(StdDuration::from_millis(150))
				.body(REFRESH_OK);
		})
		.await;
	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me").header("authorization", "Bearer access-fresh");
			then.status(200).header("content-type", "application/json").body("{\"id\":\"u-1\"}");
		})
		.await;
	let mut handles = Vec::new();

	for _ in 0..8 {
		let session = harness.session.clone();

		handles.push(tokio::spawn(async move { session.get::<JsonValue>("user/me").await }));
	}
	for handle in handles {
		let response = handle
			.await
			.expect("Request task should not panic.")
			.expect("Request should succeed after the shared refresh.");

		assert!(response.is_success());
	}

	refresh.assert_calls_async(1).await;
	me.assert_calls_async(8).await;

	assert_eq!(harness.session.refresh_metrics.attempts(), 1);
	assert!(!harness.session.is_refreshing());
	assert_eq!(harness.stored(CredentialKey::AccessToken).await.as_deref(), Some("access-fresh"));
	assert_eq!(harness.stored(CredentialKey::RefreshToken).await.as_deref(), Some("refresh-next"));
}

#[tokio::test]
async fn failed_refresh_rejects_every_waiter_and_logs_out_once() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-revoked"), Duration::seconds(-60)).await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(401)
				.header("content-type", "application/json")
				.delay(StdDuration::from_millis(150))
				.body("{\"message\":\"Refresh token revoked\"}");
		})
		.await;
	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me");
			then.status(200).body("{}");
		})
		.await;
	let mut handles = Vec::new();

	for _ in 0..5 {
		let session = harness.session.clone();

		handles.push(tokio::spawn(async move { session.get::<JsonValue>("user/me").await }));
	}
	for handle in handles {
		let err = handle
			.await
			.expect("Request task should not panic.")
			.expect_err("Every queued request should be rejected.");

		assert!(matches!(err, Error::SessionExpired { .. }), "Unexpected error: {err:?}.");
	}

	refresh.assert_calls_async(1).await;
	me.assert_calls_async(0).await;

	assert_eq!(harness.store.clears(), 1);
	assert_eq!(harness.navigator.routes(), vec![LOGIN_ROUTE.to_owned()]);
	assert!(harness.store.inner.is_empty());
	assert!(!harness.session.is_refreshing());
}

#[tokio::test]
async fn unauthorized_response_refreshes_and_replays_once() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-old", Some("refresh-1"), Duration::hours(1)).await;

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me").header("authorization", "Bearer access-old");
			then.status(401).body("{\"message\":\"jwt expired\"}");
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me").header("authorization", "Bearer access-fresh");
			then.status(200).header("content-type", "application/json").body("{\"id\":\"u-1\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh").header("authorization", "Bearer refresh-1");
			then.status(200).header("content-type", "application/json").body(REFRESH_OK);
		})
		.await;
	let response = harness
		.session
		.get::<JsonValue>("user/me")
		.await
		.expect("Replayed request should succeed.");

	assert_eq!(response.data.and_then(|data| data.get("id").cloned()), Some(JsonValue::from("u-1")));

	rejected.assert_calls_async(1).await;
	accepted.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn second_unauthorized_is_reported_without_another_refresh() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-old", Some("refresh-1"), Duration::hours(1)).await;

	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me");
			then.status(401).body("{\"message\":\"Account disabled\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).header("content-type", "application/json").body(REFRESH_OK);
		})
		.await;
	let response = harness
		.session
		.get::<JsonValue>("user/me")
		.await
		.expect("A second 401 should be reported in the response pair.");
	let error = response.error.expect("Response should carry the 401.");

	assert_eq!(error.kind, ErrorKind::Unauthorized);
	assert_eq!(error.message, "Account disabled");

	me.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn fresh_token_sends_one_request_and_never_refreshes() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-live", Some("refresh-1"), Duration::hours(1)).await;

	let me = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/user/me")
				.header("authorization", "Bearer access-live")
				.header("accept", "application/json");
			then.status(200).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).body(REFRESH_OK);
		})
		.await;

	harness.session.get::<JsonValue>("user/me").await.expect("Request should succeed.");

	me.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(harness.session.refresh_generation(), 0);
}

#[tokio::test]
async fn each_expiry_event_triggers_its_own_refresh() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-1"), Duration::seconds(-5)).await;

	// A one second lifetime is already inside the expiry leeway.
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"access-short\",\"expires_in\":1}");
		})
		.await;
	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me").header("authorization", "Bearer access-short");
			then.status(200).body("{}");
		})
		.await;

	harness.session.get::<JsonValue>("user/me").await.expect("First request should succeed.");

	assert!(!harness.session.is_refreshing());

	harness.session.get::<JsonValue>("user/me").await.expect("Second request should succeed.");

	refresh.assert_calls_async(2).await;
	me.assert_calls_async(2).await;

	assert_eq!(harness.session.refresh_metrics.attempts(), 2);
	assert_eq!(harness.stored(CredentialKey::RefreshToken).await.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn missing_refresh_token_fails_without_logging_out() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", None, Duration::seconds(-60)).await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).body(REFRESH_OK);
		})
		.await;
	let err = harness
		.session
		.get::<JsonValue>("user/me")
		.await
		.expect_err("Request should fail without a refresh token.");

	assert!(matches!(err, Error::NotSignedIn));

	refresh.assert_calls_async(0).await;

	assert_eq!(harness.store.clears(), 0);
	assert_eq!(harness.navigator.count(), 0);
	assert_eq!(harness.stored(CredentialKey::AccessToken).await.as_deref(), Some("access-stale"));
}

#[tokio::test]
async fn refresh_response_without_access_token_ends_the_session() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-1"), Duration::seconds(-60)).await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).header("content-type", "application/json").body("{\"accessToken\":\"\"}");
		})
		.await;
	let err = harness
		.session
		.get::<JsonValue>("user/me")
		.await
		.expect_err("A blank access token should fail the refresh.");

	assert!(matches!(err, Error::SessionExpired { .. }));

	refresh.assert_calls_async(1).await;

	assert_eq!(harness.store.clears(), 1);
	assert_eq!(harness.navigator.count(), 1);
	assert_eq!(harness.session.refresh_metrics.failures(), 1);
}

#[tokio::test]
async fn refresh_response_with_both_key_spellings_is_accepted() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-1"), Duration::seconds(-60)).await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).header("content-type", "application/json").body(
				r#"{"accessToken":"access-fresh","access_token":"access-fresh","expiresIn":900,"expires_in":900}"#,
			);
		})
		.await;
	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me").header("authorization", "Bearer access-fresh");
			then.status(200).body("{}");
		})
		.await;

	harness.session.get::<JsonValue>("user/me").await.expect("Request should succeed.");

	refresh.assert_calls_async(1).await;
	me.assert_calls_async(1).await;

	assert_eq!(harness.store.clears(), 0);
	assert_eq!(harness.navigator.count(), 0);
	assert_eq!(harness.stored(CredentialKey::AccessToken).await.as_deref(), Some("access-fresh"));
}

#[tokio::test]
async fn unauthorized_after_a_proactive_refresh_is_reported() {
	let server = MockServer::start_async().await;
	let harness = harness(&server);

	harness.seed("access-stale", Some("refresh-1"), Duration::seconds(-60)).await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).header("content-type", "application/json").body(REFRESH_OK);
		})
		.await;
	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me").header("authorization", "Bearer access-fresh");
			then.status(401).body("{\"message\":\"Account disabled\"}");
		})
		.await;
	let response = harness
		.session
		.get::<JsonValue>("user/me")
		.await
		.expect("The 401 should be reported in the response pair.");
	let error = response.error.expect("Response should carry the 401.");

	assert_eq!(error.kind, ErrorKind::Unauthorized);
	assert_eq!(error.message, "Account disabled");

	refresh.assert_calls_async(1).await;
	me.assert_calls_async(1).await;
}
