use thiserror::Error;
use zond_codec::CodecError;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl ExplorerError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ExplorerError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ExplorerError::MissingField("hash".into());
        assert_eq!(err.to_string(), "Missing field: hash");
    }

    #[test]
    fn display_invalid_field() {
        let err = ExplorerError::invalid("blockNumber", "expected integer");
        assert_eq!(err.to_string(), "Invalid field blockNumber: expected integer");
    }

    #[test]
    fn codec_error_converts() {
        let err: ExplorerError = CodecError::InvalidHex("0xzz".into()).into();
        assert!(matches!(err, ExplorerError::Codec(_)));
        assert_eq!(err.to_string(), "Codec error: invalid hex: 0xzz");
    }

    #[test]
    fn json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ExplorerError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid JSON: "));
    }
}
