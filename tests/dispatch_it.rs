// crates.io
use httpmock::prelude::*;
// self
use tc3_jobs::{
	_preludet::*,
	descriptor::{DescriptorPreset, RequestDescriptor},
	dispatch::{DispatchOptions, RequestDispatcher},
	error::{ResponseError, TransportError},
	http::ReqwestHttpClient,
	sign::Timestamp,
};

const REFERENCE_AUTHORIZATION: &str = "TC3-HMAC-SHA256 Credential=AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE/2019-02-25/hunyuan/tc3_request, SignedHeaders=content-type;host, Signature=a5ef75d002ffc71dc3afcff2263007ef9fe266802d01fb0d3fb99e80044d1313";

fn build_descriptor(server: &MockServer) -> RequestDescriptor {
	RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
		.host("hunyuan.tencentcloudapi.com")
		.url(server.url("/"))
		.allow_insecure_http()
		.build()
		.expect("Mock descriptor should build successfully.")
}

fn build_dispatcher(timeout: Duration) -> RequestDispatcher<ReqwestHttpClient> {
	RequestDispatcher::new(test_reqwest_http_client()).with_options(
		DispatchOptions::with_timeout(timeout).expect("Test dispatch timeout should be valid."),
	)
}

#[tokio::test]
async fn dispatch_sends_signed_headers_and_exact_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/")
				.header("authorization", REFERENCE_AUTHORIZATION)
				.header("content-type", "application/json")
				.header("x-tc-action", "SubmitHunyuanImageJob")
				.header("x-tc-timestamp", "1551113065")
				.header("x-tc-version", "2023-09-01")
				.header("x-tc-region", "ap-guangzhou")
				.body(r#"{"Prompt":"a red fox"}"#);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"Response":{"JobId":"1258-fox","RequestId":"req-it-1"}}"#);
		})
		.await;
	let envelope = build_dispatcher(DispatchOptions::DEFAULT_TIMEOUT)
		.dispatch_at(
			&test_credentials(),
			&build_descriptor(&server),
			&serde_json::json!({ "Prompt": "a red fox" }),
			Timestamp::from_unix_millis(1_551_113_065_432),
		)
		.await
		.expect("Signed dispatch should succeed.");

	mock.assert_async().await;

	assert_eq!(envelope.status, 200);
	assert_eq!(envelope.request_id.as_deref(), Some("req-it-1"));
	assert_eq!(envelope.fields.get("JobId").and_then(|v| v.as_str()), Some("1258-fox"));
}

#[tokio::test]
async fn dispatch_classifies_error_envelopes_and_gateway_failures() {
	let server = MockServer::start_async().await;
	let api_error = server
		.mock_async(|when, then| {
			when.method(POST).path("/").body_includes("\"denied\"");
			then.status(200).header("content-type", "application/json").body(
				r#"{"Response":{"Error":{"Code":"AuthFailure.SignatureExpire","Message":"expired"},"RequestId":"req-it-2"}}"#,
			);
		})
		.await;
	let gateway = server
		.mock_async(|when, then| {
			when.method(POST).path("/").body_includes("\"gateway\"");
			then.status(502).body("<html>bad gateway</html>");
		})
		.await;
	let dispatcher = build_dispatcher(DispatchOptions::DEFAULT_TIMEOUT);
	let descriptor = build_descriptor(&server);
	let credentials = test_credentials();
	let err = dispatcher
		.dispatch(&credentials, &descriptor, &serde_json::json!({ "Prompt": "denied" }))
		.await
		.expect_err("Error envelopes should fail.");

	assert!(matches!(
		err,
		Error::Api { ref code, ref request_id, .. }
			if code == "AuthFailure.SignatureExpire" && request_id.as_deref() == Some("req-it-2")
	));

	let err = dispatcher
		.dispatch(&credentials, &descriptor, &serde_json::json!({ "Prompt": "gateway" }))
		.await
		.expect_err("Gateway failures should fail.");

	assert!(matches!(err, Error::Response(ResponseError::UnexpectedStatus { status: 502, .. })));

	api_error.assert_calls_async(1).await;
	gateway.assert_calls_async(1).await;
}

#[tokio::test]
async fn dispatch_times_out_without_retrying() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/");
			then.status(200)
				.delay(Duration::from_millis(500))
				.body(r#"{"Response":{"JobId":"late","RequestId":"req-late"}}"#);
		})
		.await;
	let err = build_dispatcher(Duration::from_millis(50))
		.dispatch(&test_credentials(), &build_descriptor(&server), &serde_json::json!({}))
		.await
		.expect_err("Slow providers should time out.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout)));
	assert!(err.is_retryable());

	mock.assert_calls_async(1).await;
}
