use crate::storage::StorageError;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer. `message` is the server's text or a status fallback.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("server returned no content")]
    EmptyBody,

    #[error("could not persist session: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Builds a status error from a failed response body. A body that is not
    /// JSON counts as empty.
    pub(crate) fn from_error_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize, Default)]
        struct ErrorBody {
            error: Option<serde_json::Value>,
            detail: Option<serde_json::Value>,
            message: Option<serde_json::Value>,
        }

        let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
        let message = [parsed.error, parsed.detail, parsed.message]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
                serde_json::Value::Null => None,
                serde_json::Value::String(_) => None,
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| format!("API request failed: {status}"));

        ApiError::Status { status, message }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_fields_in_priority_order() {
        let err = ApiError::from_error_body(400, r#"{"detail":"Email already registered"}"#);
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.status(), Some(400));

        let err = ApiError::from_error_body(500, r#"{"error":"boom","detail":"ignored"}"#);
        assert_eq!(err.to_string(), "boom");

        let err = ApiError::from_error_body(422, r#"{"message":"bad input"}"#);
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn structured_detail_is_stringified() {
        let err = ApiError::from_error_body(422, r#"{"detail":[{"msg":"field required"}]}"#);
        assert!(err.to_string().contains("field required"));
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = ApiError::from_error_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "API request failed: 502");
        let err = ApiError::from_error_body(404, "");
        assert_eq!(err.to_string(), "API request failed: 404");
    }

    #[test]
    fn unauthorized_statuses() {
        assert!(ApiError::from_error_body(401, "").is_unauthorized());
        assert!(!ApiError::from_error_body(500, "").is_unauthorized());
        assert!(!ApiError::EmptyBody.is_unauthorized());
    }
}
