use serde::Serialize;

/// All application errors, categorized by domain.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ── Fetch ──
    /// Network unreachable, non-2xx status or timeout. Carries the server's
    /// `message` field when the error body had one.
    #[error("{0}")]
    Transport(String),

    /// Well-formed envelope with `success: false`; the server message verbatim.
    #[error("{0}")]
    Application(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    // ── Configuration ──
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ── Output ──
    #[error("Failed to write file: {0}")]
    FileWrite(String),

    #[error("Terminal error: {0}")]
    Terminal(String),

    // ── General ──
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Text shown in the error panel. Fetch failures other than an
    /// application-level rejection get the "Failed to fetch data" prefix.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Application(msg) => msg.clone(),
            AppError::Transport(msg) | AppError::Decode(msg) => {
                format!("Failed to fetch data: {}", msg)
            }
            other => other.to_string(),
        }
    }
}

/// Serializable error response for a front end.
#[derive(Debug, Serialize, Clone)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let code = match err {
            AppError::Transport(_) => "TRANSPORT",
            AppError::Application(_) => "APPLICATION",
            AppError::Decode(_) => "DECODE",
            AppError::Config(_) => "CONFIG",
            AppError::FileWrite(_) => "FILE_WRITE",
            AppError::Terminal(_) => "TERMINAL",
            AppError::Internal(_) => "INTERNAL",
        };
        ErrorResponse {
            code: code.to_string(),
            message: err.user_message(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let response = ErrorResponse::from(self);
        response.serialize(serializer)
    }
}

// ── Conversions from external errors ──

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::FileWrite(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Terminal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_message_is_verbatim() {
        let err = AppError::Application("no data".to_string());
        assert_eq!(err.user_message(), "no data");
    }

    #[test]
    fn test_transport_message_is_composed() {
        let err = AppError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), "Failed to fetch data: connection refused");
    }

    #[test]
    fn test_error_response_code() {
        let err = AppError::Config("page_size must be at least 1".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "CONFIG");
        assert_eq!(
            json["message"],
            "Invalid configuration: page_size must be at least 1"
        );
    }
}
