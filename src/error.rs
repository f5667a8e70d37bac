//! Client-level error types plus the closed message taxonomy surfaced to callers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) on a call that has no response pair to carry it.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend rejected the payload with field-level detail (HTTP 422).
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Backend call failed with a mapped status or network message.
	#[error(transparent)]
	Api(#[from] ApiError),

	/// Request body could not be encoded as JSON.
	#[error("Request body could not be encoded as JSON.")]
	Encode(#[source] serde_json::Error),
	/// Response body could not be decoded into the expected shape.
	#[error("Response body could not be decoded.")]
	Decode {
		/// Structured parsing failure including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
	/// Token endpoint answered without an access token.
	#[error("No access token was received.")]
	MissingAccessToken,
	/// No refresh token is stored, so an expired access token cannot be renewed.
	#[error("Authentication failed: no refresh token is stored.")]
	NotSignedIn,
	/// Refresh failed; credentials were cleared and the caller must log in again.
	#[error("Session expired: {reason}.")]
	SessionExpired {
		/// Human-readable cause recorded by the refresh gate.
		reason: String,
	},
}

/// Configuration and validation failures raised while wiring the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http or https.
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Endpoint path cannot be joined onto the base URL.
	#[error("Endpoint path `{path}` is invalid.")]
	InvalidEndpoint {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Required environment variable is absent or not unicode.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// A duration setting is zero or negative.
	#[error("The {setting} setting must be positive.")]
	NonPositiveDuration {
		/// Setting label.
		setting: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The backend could not be reached (connection refused, DNS, TLS handshake).
	#[error("Backend could not be reached.")]
	Connect {
		/// Transport-specific connect error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete before the transport's timeout.
	#[error("Request to the backend timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// The request could not be assembled (bad header, bad multipart part).
	#[error("Request could not be built.")]
	Build {
		/// Transport-specific builder error.
		#[source]
		source: BoxError,
	},
	/// Any other network failure reported by the HTTP client.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific connect error.
	pub fn connect(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Connect { source: Box::new(src) }
	}

	/// Returns `true` when the backend itself was unreachable.
	pub fn is_unreachable(&self) -> bool {
		matches!(self, Self::Connect { .. } | Self::Network { .. })
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_builder() {
			Self::Build { source: Box::new(e) }
		} else if e.is_connect() {
			Self::connect(e)
		} else if e.is_timeout() {
			Self::Timeout { source: Box::new(e) }
		} else {
			Self::network(e)
		}
	}
}

/// Closed set of failure categories shown to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
	/// HTTP 400.
	BadRequest,
	/// HTTP 401 that survived the refresh-and-replay path.
	Unauthorized,
	/// HTTP 403.
	Forbidden,
	/// HTTP 404.
	NotFound,
	/// HTTP 503, connection refused, or no network.
	ServerUnavailable,
	/// Any other status code.
	Unexpected,
	/// Failure that never produced a status code and was not a network outage.
	Unknown,
}
impl ErrorKind {
	/// Message shown when the backend supplies none of its own.
	pub const fn default_message(self) -> &'static str {
		match self {
			Self::BadRequest => "Bad Request",
			Self::Unauthorized => "Unauthorized",
			Self::Forbidden => "Forbidden",
			Self::NotFound => "Not Found",
			Self::ServerUnavailable => "Server is currently unavailable. Please try again later.",
			Self::Unexpected => "An error occurred",
			Self::Unknown => "An unknown error occurred.",
		}
	}

	/// Whether a backend-supplied `error`/`message` string may replace the default text.
	const fn accepts_server_message(self) -> bool {
		matches!(self, Self::BadRequest | Self::Unauthorized | Self::Unexpected)
	}
}

/// User-facing failure carried in the `error` half of an [`ApiResponse`](crate::session::ApiResponse).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("{message}")]
pub struct ApiError {
	/// Category of the failure.
	pub kind: ErrorKind,
	/// HTTP status code, when a response was received.
	pub status: Option<u16>,
	/// Display text, either the category default or the backend's own message.
	pub message: String,
}
impl ApiError {
	/// Builds an error with the category's default message.
	pub fn new(kind: ErrorKind, status: Option<u16>) -> Self {
		Self { kind, status, message: kind.default_message().into() }
	}

	/// Classifies a non-success response by status code.
	///
	/// Statuses below 400 (informational or redirects that were not followed) are reported as
	/// `Unexpected response status: <code>`.
	pub fn from_status(status: u16, body: &[u8]) -> Self {
		if status < 400 {
			return Self {
				kind: ErrorKind::Unexpected,
				status: Some(status),
				message: format!("Unexpected response status: {status}"),
			};
		}

		let kind = match status {
			400 => ErrorKind::BadRequest,
			401 => ErrorKind::Unauthorized,
			403 => ErrorKind::Forbidden,
			404 => ErrorKind::NotFound,
			503 => ErrorKind::ServerUnavailable,
			_ => ErrorKind::Unexpected,
		};
		let mut error = Self::new(kind, Some(status));

		if kind.accepts_server_message() {
			if let Some(message) = server_message(body) {
				error.message = message;
			}
		}

		error
	}

	/// Classifies a transport failure that produced no response.
	pub fn from_transport(err: &TransportError) -> Self {
		if err.is_unreachable() {
			Self::new(ErrorKind::ServerUnavailable, None)
		} else {
			Self::new(ErrorKind::Unknown, None)
		}
	}
}

/// Field-level rejection returned by the backend with HTTP 422.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("Validation failed: {message}.")]
pub struct ValidationError {
	/// HTTP status code (always 422 when produced by the session).
	pub status: u16,
	/// Summary text taken from the payload's `error`/`message`, if any.
	pub message: String,
	/// Full decoded payload so callers can render per-field messages.
	pub payload: JsonValue,
}
impl ValidationError {
	/// Decodes a 422 body, keeping non-JSON bodies as a string payload.
	pub fn from_body(status: u16, body: &[u8]) -> Self {
		let payload = serde_json::from_slice(body).unwrap_or_else(|_| {
			JsonValue::String(String::from_utf8_lossy(body).into_owned())
		});
		let message = message_field(&payload).unwrap_or_else(|| "Unprocessable Entity".into());

		Self { status, message, payload }
	}

	/// Returns the per-field messages when the payload carries an `errors` object or array.
	pub fn field_errors(&self) -> Option<&JsonValue> {
		self.payload.get("errors")
	}
}

fn server_message(body: &[u8]) -> Option<String> {
	let payload = serde_json::from_slice::<JsonValue>(body).ok()?;

	message_field(&payload)
}

fn message_field(payload: &JsonValue) -> Option<String> {
	["error", "message"]
		.iter()
		.filter_map(|key| payload.get(key))
		.find_map(|value| match value {
			JsonValue::String(text) if !text.is_empty() => Some(text.clone()),
			JsonValue::Array(items) => {
				let joined = items.iter().filter_map(JsonValue::as_str).collect::<Vec<_>>().join(", ");

				(!joined.is_empty()).then_some(joined)
			},
			_ => None,
		})
}
