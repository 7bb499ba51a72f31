use serde::{Deserialize, Serialize};

/// JSON body a broker sends alongside a non-success status.
///
/// Both fields are optional; fields not listed here are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerErrorBody {
    /// Machine-readable error code, e.g. `AsyncRequired`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable description of the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::BrokerErrorBody;

    #[test]
    fn test_missing_fields_are_none() {
        let body: BrokerErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body, BrokerErrorBody::default());
    }

    #[test]
    fn test_null_fields_are_none() {
        let body: BrokerErrorBody =
            serde_json::from_str(r#"{"error":null,"description":null}"#).unwrap();
        assert_eq!(body.error, None);
        assert_eq!(body.description, None);
    }

    #[test]
    fn test_empty_string_is_present() {
        let body: BrokerErrorBody = serde_json::from_str(r#"{"error":""}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some(""));
        assert_eq!(body.description, None);
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        assert!(serde_json::from_str::<BrokerErrorBody>(r#"{"error":42}"#).is_err());
        assert!(serde_json::from_str::<BrokerErrorBody>(r#"["error"]"#).is_err());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let body = BrokerErrorBody {
            error: Some("RequiresApp".to_string()),
            description: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"RequiresApp"}"#
        );
    }
}
