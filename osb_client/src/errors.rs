//! Error types for failed broker API calls.
//!
//! A broker that answers with a non-success status is represented by
//! [`BrokerHttpError`]. The free functions in this module classify a generic
//! error value against the well-known conditions of the Open Service Broker
//! API: resource gone, conflict, async-required and app-required bindings.

use std::borrow::Cow;
use std::error::Error as StdError;

use crate::types::BrokerErrorBody;

/// Machine-readable `error` value a broker returns when a plan needs
/// asynchronous operation support.
pub const ASYNC_ERROR_MESSAGE: &str = "AsyncRequired";
/// Human-readable `description` paired with [`ASYNC_ERROR_MESSAGE`].
pub const ASYNC_ERROR_DESCRIPTION: &str =
    "This service plan requires client support for asynchronous service operations.";

/// Machine-readable `error` value a broker returns when it only generates
/// credentials for bindings to an application.
pub const APP_GUID_REQUIRED_ERROR_MESSAGE: &str = "RequiresApp";
/// Human-readable `description` paired with [`APP_GUID_REQUIRED_ERROR_MESSAGE`].
pub const APP_GUID_REQUIRED_ERROR_DESCRIPTION: &str =
    "This service supports generation of credentials through binding an application only.";

const STATUS_CONFLICT: u16 = 409;
const STATUS_GONE: u16 = 410;
const STATUS_UNPROCESSABLE_ENTITY: u16 = 422;

/// Rendered in place of an absent field.
const ABSENT: &str = "<none>";

/// Boxed failure from decoding a broker error body.
pub type BodyParseError = Box<dyn StdError + Send + Sync + 'static>;

/// A broker responded to an API call with a non-success HTTP status.
///
/// The broker may include a machine-readable error code and a human-readable
/// description in its response body. When that body cannot be decoded, the
/// decoding failure is kept in [`body_parse_error`](Self::body_parse_error)
/// and both optional fields stay empty.
#[derive(thiserror::Error, Debug)]
#[error(
    "Status: {status_code}; ErrorMessage: {}; Description: {}; ResponseError: {}",
    display_field(.error_code),
    display_field(.description),
    display_parse_error(.body_parse_error)
)]
pub struct BrokerHttpError {
    status_code: u16,
    error_code: Option<String>,
    description: Option<String>,
    #[source]
    body_parse_error: Option<BodyParseError>,
}

/// Well-known broker error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerErrorKind {
    /// HTTP 410: the resource no longer exists.
    Gone,
    /// HTTP 409: the request conflicts with an existing resource.
    Conflict,
    /// HTTP 422 asking the client to retry with async support enabled.
    AsyncRequired,
    /// HTTP 422 asking for a binding with an application.
    AppGuidRequired,
    /// Any other broker error; inspect the raw fields instead.
    Other,
}

impl BrokerHttpError {
    /// Creates an error carrying only a status code.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            error_code: None,
            description: None,
            body_parse_error: None,
        }
    }

    /// Sets the machine-readable error code.
    ///
    /// Ignored when the body failed to parse, since no fields were decoded.
    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        if self.body_parse_error.is_none() {
            self.error_code = Some(error_code.into());
        }
        self
    }

    /// Sets the human-readable description.
    ///
    /// Ignored when the body failed to parse, since no fields were decoded.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        if self.body_parse_error.is_none() {
            self.description = Some(description.into());
        }
        self
    }

    /// Builds an error from a decoded broker error body.
    pub fn from_body(status_code: u16, body: BrokerErrorBody) -> Self {
        Self {
            status_code,
            error_code: body.error,
            description: body.description,
            body_parse_error: None,
        }
    }

    /// Builds an error for a response whose body could not be decoded.
    pub fn from_parse_error(status_code: u16, err: impl Into<BodyParseError>) -> Self {
        Self {
            status_code,
            error_code: None,
            description: None,
            body_parse_error: Some(err.into()),
        }
    }

    /// Builds an error from the raw status and body of a failed response.
    ///
    /// Never fails: a body that is not a JSON error object, including an
    /// empty one, is recorded as the body parse error.
    pub fn from_response(status_code: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<BrokerErrorBody>(body) {
            Ok(parsed) => {
                tracing::debug!(
                    status_code,
                    error = ?parsed.error,
                    description = ?parsed.description,
                    "Broker returned error response"
                );
                Self::from_body(status_code, parsed)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse broker error body (status {}): {} | body: {}",
                    status_code,
                    e,
                    truncate_body(body)
                );
                Self::from_parse_error(status_code, e)
            }
        }
    }

    /// The raw HTTP status code returned by the broker.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The broker's machine-readable error code, if it sent one.
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    /// The broker's human-readable description, if it sent one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The failure from decoding the response body, if decoding failed.
    pub fn body_parse_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.body_parse_error.as_deref()
    }

    /// Whether the response body could not be decoded.
    pub fn has_body_parse_error(&self) -> bool {
        self.body_parse_error.is_some()
    }

    /// Whether the broker answered 410 Gone.
    pub fn is_gone(&self) -> bool {
        self.status_code == STATUS_GONE
    }

    /// Whether the broker answered 409 Conflict.
    pub fn is_conflict(&self) -> bool {
        self.status_code == STATUS_CONFLICT
    }

    /// Whether this is the conventional 422 asking the client to retry with
    /// asynchronous operations allowed.
    pub fn is_async_required(&self) -> bool {
        self.matches_unprocessable(ASYNC_ERROR_MESSAGE, ASYNC_ERROR_DESCRIPTION)
    }

    /// Whether this is the conventional 422 rejecting a binding that has no
    /// application.
    pub fn is_app_guid_required(&self) -> bool {
        self.matches_unprocessable(
            APP_GUID_REQUIRED_ERROR_MESSAGE,
            APP_GUID_REQUIRED_ERROR_DESCRIPTION,
        )
    }

    /// Classifies this error into one of the well-known conditions.
    pub fn kind(&self) -> BrokerErrorKind {
        if self.is_gone() {
            BrokerErrorKind::Gone
        } else if self.is_conflict() {
            BrokerErrorKind::Conflict
        } else if self.is_async_required() {
            BrokerErrorKind::AsyncRequired
        } else if self.is_app_guid_required() {
            BrokerErrorKind::AppGuidRequired
        } else {
            BrokerErrorKind::Other
        }
    }

    // 422 is shared by many conditions, so both fields must match exactly.
    fn matches_unprocessable(&self, error_code: &str, description: &str) -> bool {
        self.status_code == STATUS_UNPROCESSABLE_ENTITY
            && self.body_parse_error.is_none()
            && self.error_code() == Some(error_code)
            && self.description() == Some(description)
    }
}

/// Returns the error as a [`BrokerHttpError`] if that is its concrete type.
pub fn as_broker_http_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a BrokerHttpError> {
    err.downcast_ref::<BrokerHttpError>()
}

/// Whether the error is a [`BrokerHttpError`].
pub fn is_broker_http_error(err: &(dyn StdError + 'static)) -> bool {
    as_broker_http_error(err).is_some()
}

/// Whether the error is a broker HTTP 410 Gone.
pub fn is_gone_error(err: &(dyn StdError + 'static)) -> bool {
    as_broker_http_error(err).is_some_and(BrokerHttpError::is_gone)
}

/// Whether the error is a broker HTTP 409 Conflict.
pub fn is_conflict_error(err: &(dyn StdError + 'static)) -> bool {
    as_broker_http_error(err).is_some_and(BrokerHttpError::is_conflict)
}

/// Whether the error is the broker's conventional signal that the plan
/// requires asynchronous operations.
pub fn is_async_required_error(err: &(dyn StdError + 'static)) -> bool {
    as_broker_http_error(err).is_some_and(BrokerHttpError::is_async_required)
}

/// Whether the error is the broker's conventional signal that it only
/// supports bindings to an application.
pub fn is_app_guid_required_error(err: &(dyn StdError + 'static)) -> bool {
    as_broker_http_error(err).is_some_and(BrokerHttpError::is_app_guid_required)
}

/// Classifies a generic error. Returns `None` when it is not a broker error.
pub fn classify(err: &(dyn StdError + 'static)) -> Option<BrokerErrorKind> {
    as_broker_http_error(err).map(BrokerHttpError::kind)
}

fn display_field(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(ABSENT)
}

fn display_parse_error(err: &Option<BodyParseError>) -> Cow<'static, str> {
    match err {
        Some(e) => Cow::Owned(e.to_string()),
        None => Cow::Borrowed(ABSENT),
    }
}

fn truncate_body(body: &[u8]) -> String {
    const MAX: usize = 2000;
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= MAX {
        text.into_owned()
    } else {
        format!("{}...[truncated]", text.chars().take(MAX).collect::<String>())
    }
}
