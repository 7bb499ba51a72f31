//! Error model for Open Service Broker API clients.
//!
//! [`BrokerHttpError`] carries what a broker returned with a non-success
//! status. The `is_*_error` functions classify any error value against the
//! conditions the broker API defines.

mod errors;
pub mod types;
pub use self::errors::{
    as_broker_http_error, classify, is_app_guid_required_error, is_async_required_error,
    is_broker_http_error, is_conflict_error, is_gone_error, BodyParseError, BrokerErrorKind,
    BrokerHttpError, APP_GUID_REQUIRED_ERROR_DESCRIPTION, APP_GUID_REQUIRED_ERROR_MESSAGE,
    ASYNC_ERROR_DESCRIPTION, ASYNC_ERROR_MESSAGE,
};
