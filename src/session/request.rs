//! Request pipeline: header merging, bearer injection, one 401 replay, and response mapping.

// self
use crate::{
	_prelude::*,
	error::{ApiError, ErrorKind, ValidationError},
	http::{ApiRequest, HttpTransport, Method, MultipartPayload, RawResponse, RequestBody},
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::{Session, refresh::Authorization},
};

pub(crate) const JSON: &str = "application/json";

/// Caller-side description of one backend call.
#[derive(Clone, Debug)]
pub struct ApiCall {
	method: Method,
	path: String,
	query: Vec<(String, String)>,
	headers: Vec<(String, String)>,
	body: RequestBody,
	authenticated: bool,
}
impl ApiCall {
	/// Creates an authenticated, body-less call to `path` (relative to the base URL).
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: Vec::new(),
			body: RequestBody::Empty,
			authenticated: true,
		}
	}

	/// `GET path`.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// `POST path`.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// `PUT path`.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// `PATCH path`.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// `DELETE path`.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Appends a query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((name.into(), value.to_string()));

		self
	}

	/// Appends a query parameter when `value` is present and not blank.
	pub fn query_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
		match value.map(|value| value.to_string()) {
			Some(value) if !value.trim().is_empty() => self.query(name, value),
			_ => self,
		}
	}

	/// Adds a header that overrides the JSON defaults.
	///
	/// `Authorization` is owned by the session on authenticated calls and is always replaced
	/// with the current bearer token.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Encodes `body` as the JSON payload.
	pub fn json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		self.body = RequestBody::Json(serde_json::to_vec(body).map_err(Error::Encode)?);

		Ok(self)
	}

	/// Sends `payload` as `multipart/form-data`.
	pub fn multipart(mut self, payload: MultipartPayload) -> Self {
		self.body = RequestBody::Multipart(payload);

		self
	}

	/// Skips bearer injection and the refresh path (login, registration).
	pub fn unauthenticated(mut self) -> Self {
		self.authenticated = false;

		self
	}

	/// Verb of the call.
	pub fn method(&self) -> Method {
		self.method
	}

	/// Path relative to the base URL.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Query parameters in the order they were added.
	pub fn query_pairs(&self) -> &[(String, String)] {
		&self.query
	}

	fn resolve(&self, url: &Url, auth: Option<&Authorization>) -> ApiRequest {
		let mut request = ApiRequest::new(self.method, url.clone()).with_header("Accept", JSON);

		if !matches!(self.body, RequestBody::Multipart(_)) {
			request.set_header("Content-Type", JSON);
		}
		for (name, value) in &self.headers {
			request.set_header(name.as_str(), value.as_str());
		}
		if let Some(auth) = auth {
			request.set_header("Authorization", auth.token.bearer());
		}

		request.with_body(self.body.clone())
	}
}

/// Either the decoded payload or the mapped failure of one call.
///
/// Failures other than HTTP 422 never surface as `Err`; they land in `error` so screens can show
/// the message directly.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<R> {
	/// Decoded payload on success.
	pub data: Option<R>,
	/// Mapped failure otherwise.
	pub error: Option<ApiError>,
}
impl<R> ApiResponse<R> {
	/// Successful response.
	pub fn success(data: R) -> Self {
		Self { data: Some(data), error: None }
	}

	/// Failed response.
	pub fn failure(error: ApiError) -> Self {
		Self { data: None, error: Some(error) }
	}

	/// Returns `true` when no error was recorded.
	pub fn is_success(&self) -> bool {
		self.error.is_none()
	}

	/// Collapses the pair into a [`Result`]; an empty pair counts as an unknown failure.
	pub fn into_result(self) -> Result<R> {
		match (self.data, self.error) {
			(_, Some(error)) => Err(error.into()),
			(Some(data), None) => Ok(data),
			(None, None) => Err(ApiError::new(ErrorKind::Unknown, None).into()),
		}
	}

	/// Maps the payload, keeping any error untouched.
	pub fn map<U>(self, f: impl FnOnce(R) -> U) -> ApiResponse<U> {
		ApiResponse { data: self.data.map(f), error: self.error }
	}
}

impl<T> Session<T>
where
	T: ?Sized + HttpTransport,
{
	/// Sends `call`, refreshing and replaying once if an authenticated call gets a 401.
	///
	/// Returns `Err` for local failures (configuration, encoding, decoding, credential storage),
	/// for HTTP 422, and when the session cannot be renewed. Every other failure is reported in
	/// the [`ApiResponse`] error half.
	pub async fn request<R>(&self, call: ApiCall) -> Result<ApiResponse<R>>
	where
		R: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, call.method.as_str());

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.dispatch(call)).await;
		let outcome = match &result {
			Ok(response) if response.is_success() => CallOutcome::Success,
			_ => CallOutcome::Failure,
		};

		obs::record_call_outcome(KIND, outcome);

		result
	}

	/// `GET path`.
	pub async fn get<R>(&self, path: &str) -> Result<ApiResponse<R>>
	where
		R: DeserializeOwned,
	{
		self.request(ApiCall::get(path)).await
	}

	/// `POST path` with a JSON body.
	pub async fn post<R, B>(&self, path: &str, body: &B) -> Result<ApiResponse<R>>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(ApiCall::post(path).json(body)?).await
	}

	/// `PUT path` with a JSON body.
	pub async fn put<R, B>(&self, path: &str, body: &B) -> Result<ApiResponse<R>>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(ApiCall::put(path).json(body)?).await
	}

	/// `PATCH path` with a JSON body.
	pub async fn patch<R, B>(&self, path: &str, body: &B) -> Result<ApiResponse<R>>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(ApiCall::patch(path).json(body)?).await
	}

	/// `DELETE path`.
	pub async fn delete<R>(&self, path: &str) -> Result<ApiResponse<R>>
	where
		R: DeserializeOwned,
	{
		self.request(ApiCall::delete(path)).await
	}

	/// `POST path` as `multipart/form-data`.
	pub async fn post_multipart<R>(&self, path: &str, payload: MultipartPayload) -> Result<ApiResponse<R>>
	where
		R: DeserializeOwned,
	{
		self.request(ApiCall::post(path).multipart(payload)).await
	}

	async fn dispatch<R>(&self, call: ApiCall) -> Result<ApiResponse<R>>
	where
		R: DeserializeOwned,
	{
		let url = self.config.endpoint_with_query(&call.path, &call.query)?;
		let mut auth = if call.authenticated { Some(self.authorize().await?) } else { None };

		loop {
			let request = call.resolve(&url, auth.as_ref());
			let response = match self.transport.execute(request).await {
				Ok(response) => response,
				Err(e) => return Ok(ApiResponse::failure(ApiError::from_transport(&e))),
			};

			// One refresh per call: a 401 on a token this call already refreshed is reported.
			if response.status == 401 {
				if let Some(current) = auth.as_ref().filter(|current| !current.refreshed) {
					let token = self.refresh_after(current.generation).await?;

					auth = Some(Authorization { generation: self.gate.generation(), token, refreshed: true });

					continue;
				}
			}

			return map_response(response);
		}
	}
}

fn map_response<R>(response: RawResponse) -> Result<ApiResponse<R>>
where
	R: DeserializeOwned,
{
	if response.is_success() {
		return decode(&response).map(ApiResponse::success);
	}
	if response.status == 422 {
		return Err(ValidationError::from_body(response.status, &response.body).into());
	}

	Ok(ApiResponse::failure(ApiError::from_status(response.status, &response.body)))
}

/// Decodes a JSON body, reading an empty body as `null`.
pub(crate) fn decode<R>(response: &RawResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	let body: &[u8] =
		if response.body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &response.body };
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { source, status: response.status })
}
