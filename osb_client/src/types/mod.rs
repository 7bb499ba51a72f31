mod error_body;
pub use self::error_body::BrokerErrorBody;
