//! Demonstrates a submit-then-poll Hunyuan image generation with the default reqwest transport
//! against a local mock of the provider API.
//!
//! Set `TC3_SECRET_ID` and `TC3_SECRET_KEY` to sign with real credentials; the mock accepts any.

// std
use std::{env, time::Duration};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use tc3_jobs::{
	CancellationToken,
	auth::Credentials,
	client::JobClient,
	descriptor::{DescriptorPreset, RequestDescriptor},
	http::ReqwestHttpClient,
	job::{HunyuanImageJobRequest, PollPolicy},
	reqwest::{Client, redirect::Policy},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let submit_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/").header("x-tc-action", "SubmitHunyuanImageJob");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"Response":{"JobId":"1258109872-demo","RequestId":"demo-submit"}}"#);
		})
		.await;
	let query_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/").header("x-tc-action", "QueryHunyuanImageJob");
			then.status(200).header("content-type", "application/json").body(
				r#"{"Response":{"JobStatusCode":"5","JobStatusMsg":"done","ResultImage":["https://cdn.example.com/demo.png"],"RequestId":"demo-query"}}"#,
			);
		})
		.await;
	let credentials = Credentials::new(
		env::var("TC3_SECRET_ID").unwrap_or_else(|_| "AKIDdemo".into()),
		env::var("TC3_SECRET_KEY").unwrap_or_else(|_| "demo-secret".into()),
	);
	let descriptor = RequestDescriptor::preset(DescriptorPreset::HunyuanSubmit)
		.host(server.address().to_string())
		.url(server.url("/"))
		.allow_insecure_http()
		.build()?;
	let http_client =
		ReqwestHttpClient::with_client(Client::builder().redirect(Policy::none()).build()?);
	let client =
		<JobClient<ReqwestHttpClient>>::with_http_client(descriptor, credentials, http_client)?
			.with_poll_policy(
				PollPolicy::builder()
					.interval(Duration::from_millis(200))
					.timeout(Duration::from_secs(10))
					.build()?,
			);
	let payload = HunyuanImageJobRequest::new("a red fox in fresh snow").resolution("1024:1024");
	let result = client.generate(&payload, &CancellationToken::new()).await?;

	for image in &result.images {
		println!("Generated image: {image:?}.");
	}

	submit_mock.assert_async().await;
	query_mock.assert_async().await;

	Ok(())
}
