//! Transport primitives for backend calls.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. The session hands it a
//! fully resolved [`ApiRequest`] (absolute URL, merged headers, encoded body) and gets back a
//! [`RawResponse`] for every status code; only failures that produced no response at all come
//! back as [`TransportError`]. Replays after a token refresh clone the request and swap its
//! `Authorization` header, so implementations must not keep per-request state.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Executes resolved requests against the backend.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the response for any status code.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the back office.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
}
impl Method {
	/// Upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to the transport.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// Verb.
	pub method: Method,
	/// Absolute URL including query string.
	pub url: Url,
	/// Header pairs in application order; later entries win.
	pub headers: Vec<(String, String)>,
	/// Encoded body.
	pub body: RequestBody,
}
impl ApiRequest {
	/// Creates a body-less request.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: RequestBody::Empty }
	}

	/// Sets or replaces a header (case-insensitive match on the name).
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set_header(name, value);

		self
	}

	/// Sets or replaces a header in place.
	pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();

		self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
		self.headers.push((name, value.into()));
	}

	/// Looks up a header value (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.rev()
			.find(|(existing, _)| existing.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Replaces the body.
	pub fn with_body(mut self, body: RequestBody) -> Self {
		self.body = body;

		self
	}
}

/// Request payload variants.
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// Pre-encoded JSON bytes.
	Json(Vec<u8>),
	/// Form fields plus file parts; the transport supplies the multipart boundary.
	Multipart(MultipartPayload),
}

/// Form fields and attachments for document and image uploads.
#[derive(Clone, Debug, Default)]
pub struct MultipartPayload {
	/// Plain text fields.
	pub fields: Vec<(String, String)>,
	/// File parts.
	pub files: Vec<FilePart>,
}
impl MultipartPayload {
	/// Field name the backend reads attachments from.
	pub const DEFAULT_FILE_FIELD: &'static str = "files";

	/// Adds a text field.
	pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.fields.push((name.into(), value.into()));

		self
	}

	/// Adds a file under [`Self::DEFAULT_FILE_FIELD`].
	pub fn file(mut self, file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		self.files.push(FilePart {
			field: Self::DEFAULT_FILE_FIELD.into(),
			file_name: file_name.into(),
			content_type: None,
			bytes: bytes.into(),
		});

		self
	}

	/// Adds a fully described file part.
	pub fn part(mut self, part: FilePart) -> Self {
		self.files.push(part);

		self
	}
}

/// One uploaded file.
#[derive(Clone)]
pub struct FilePart {
	/// Form field name.
	pub field: String,
	/// File name reported to the backend.
	pub file_name: String,
	/// MIME type, when known.
	pub content_type: Option<String>,
	/// File contents.
	pub bytes: Vec<u8>,
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("field", &self.field)
			.field("file_name", &self.file_name)
			.field("content_type", &self.content_type)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// Status and body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder, TransportError> {
		let method = match request.method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		};
		let mut builder = self.0.request(method, request.url);

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		builder = match request.body {
			RequestBody::Empty => builder,
			RequestBody::Json(bytes) => builder.body(bytes),
			RequestBody::Multipart(payload) => builder.multipart(multipart_form(payload)?),
		};

		Ok(builder)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let response = self.build(request)?.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn multipart_form(payload: MultipartPayload) -> Result<reqwest::multipart::Form, TransportError> {
	use reqwest::multipart::{Form, Part};

	let mut form = Form::new();

	for (name, value) in payload.fields {
		form = form.text(name, value);
	}
	for file in payload.files {
		let mut part = Part::bytes(file.bytes).file_name(file.file_name);

		if let Some(content_type) = file.content_type {
			part = part.mime_str(&content_type)?;
		}

		form = form.part(file.field, part);
	}

	Ok(form)
}
