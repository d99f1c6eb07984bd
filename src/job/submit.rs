//! Job submission.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	descriptor::RequestDescriptor,
	dispatch::RequestDispatcher,
	http::ApiHttpClient,
	job::JobId,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

#[derive(Debug, Deserialize)]
struct SubmitFields {
	#[serde(rename = "JobId", default)]
	job_id: Option<String>,
}

/// Submits generation payloads and extracts the provider-issued [`JobId`].
#[derive(Debug)]
pub struct JobSubmitter<'a, C>
where
	C: ?Sized + ApiHttpClient,
{
	dispatcher: &'a RequestDispatcher<C>,
	descriptor: &'a RequestDescriptor,
	credentials: &'a Credentials,
}
impl<'a, C> JobSubmitter<'a, C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a submitter for the submit action described by `descriptor`.
	pub fn new(
		dispatcher: &'a RequestDispatcher<C>,
		descriptor: &'a RequestDescriptor,
		credentials: &'a Credentials,
	) -> Self {
		Self { dispatcher, descriptor, credentials }
	}

	/// Submits `payload` and returns the new job's identifier.
	///
	/// A `Response.Error` envelope yields [`Error::Api`]; a success envelope with an absent or
	/// empty `JobId` yields [`Error::MissingJobId`], and one whose `JobId` fails validation yields
	/// [`Error::InvalidJobId`]. In every case no identifier escapes, so polling cannot start.
	pub async fn submit<P>(&self, payload: &P) -> Result<JobId>
	where
		P: ?Sized + Serialize,
	{
		let span = OpSpan::new(OpKind::Submit, "submit");

		obs::record_op_outcome(OpKind::Submit, OpOutcome::Attempt);

		let result = span
			.instrument(async {
				let envelope =
					self.dispatcher.dispatch(self.credentials, self.descriptor, payload).await?;
				let request_id = envelope.request_id.clone();
				let fields: SubmitFields = envelope.into_fields()?;

				match fields.job_id {
					Some(raw) if !raw.is_empty() => JobId::new(raw)
						.map_err(|source| Error::InvalidJobId { request_id, source }),
					_ => Err(Error::MissingJobId { request_id }),
				}
			})
			.await;

		obs::record_result(OpKind::Submit, &result);

		result
	}
}
