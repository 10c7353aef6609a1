//! Crate-level error types shared across the session core, stores, and history fetches.

// self
use crate::{_prelude::*, auth::ReportId};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Identity provider rejected or failed an authentication call.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Action needs an authenticated session.
	#[error("You must sign in before performing this action.")]
	LoginRequired,
	/// Action needs a privileged (admin) session.
	#[error("The {action} action requires an administrator.")]
	Forbidden {
		/// Label of the rejected action.
		action: &'static str,
	},
	/// Report payload failed validation.
	#[error("Report is invalid: {reason}.")]
	InvalidReport {
		/// Validation failure summary.
		reason: String,
	},
	/// Referenced report does not exist in the expected collection.
	#[error("Report `{id}` was not found.")]
	ReportNotFound {
		/// Identifier that was looked up.
		id: ReportId,
	},
}

/// Failures surfaced by sign-in, sign-up, and sign-out.
///
/// Callers show these to the user as a dismissible message; none of them is fatal to the
/// session pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum AuthError {
	/// Email/password pair was rejected.
	#[error("Email or password is incorrect.")]
	InvalidCredentials,
	/// An account already exists for the email.
	#[error("An account already exists for this email.")]
	EmailInUse,
	/// Password does not meet the provider's minimum strength.
	#[error("Password must be at least {min} characters.")]
	WeakPassword {
		/// Minimum accepted length.
		min: usize,
	},
	/// Email address is not well formed.
	#[error("Email address is malformed.")]
	InvalidEmail,
	/// A required form field was left empty.
	#[error("The {field} field cannot be empty.")]
	MissingField {
		/// Name of the empty field.
		field: &'static str,
	},
	/// Provider could not be reached.
	#[error("Identity provider is unreachable: {message}.")]
	Unreachable {
		/// Transport-level summary.
		message: String,
	},
	/// Provider reported an unexpected failure.
	#[error("Identity provider failed: {message}.")]
	Provider {
		/// Provider-supplied summary.
		message: String,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint configuration is invalid.
	#[error(transparent)]
	Endpoints(#[from] crate::history::EndpointsError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Upstream answered with a non-success status.
	#[error("Open-data endpoint returned an unexpected status: {status}.")]
	Endpoint {
		/// HTTP status code.
		status: u16,
		/// Endpoint that failed.
		url: String,
	},
	/// Upstream responded with JSON that does not match the expected shape.
	#[error("Open-data endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the open-data endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
