mod common;

// crates.io
use httpmock::prelude::*;
// self
use sts_fetch::{auth::TokenSecret, error::Error, fetch, obs::Phase};

#[tokio::test]
async fn fetch_sends_the_bearer_token_and_returns_the_body() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/").header("authorization", "Bearer TKN123");
			then.status(200).body("hello TKN123");
		})
		.await;
	let channel = common::stub_channel("resource", &server, "/", "server.test");
	let response = fetch::fetch_resource(&channel, &TokenSecret::new("TKN123")).await?;

	mock.assert_async().await;

	assert_eq!(response.status, 200);
	assert_eq!(response.text(), "hello TKN123");

	Ok(())
}

#[tokio::test]
async fn fetch_surfaces_non_success_statuses() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/");
			then.status(403).body("forbidden");
		})
		.await;
	let channel = common::stub_channel("resource", &server, "/", "server.test");
	let err = fetch::fetch_resource(&channel, &TokenSecret::new("TKN123"))
		.await
		.expect_err("A 403 must fail the fetch.");

	mock.assert_async().await;

	match &err {
		Error::ResourceRejected { status, body } => {
			assert_eq!(*status, 403);
			assert_eq!(body, "forbidden");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert_eq!(err.phase(), Some(Phase::ResourceFetch));
}

#[tokio::test]
async fn fetch_refuses_an_empty_token_before_sending() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/");
			then.status(200);
		})
		.await;
	let channel = common::stub_channel("resource", &server, "/", "server.test");
	let err = fetch::fetch_resource(&channel, &TokenSecret::new(""))
		.await
		.expect_err("An empty token must not be sent.");

	assert!(matches!(err, Error::MalformedResponse(_)));

	mock.assert_calls_async(0).await;
}
