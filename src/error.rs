use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found")]
    NotFound,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Resource id is missing")]
    MissingId,

    #[error("A request for this action is already in flight")]
    Busy,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Maps a non-success status and the server's `message` field (if any).
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound,
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Authentication failures are decided by status code, never by message text.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized(_) | ClientError::Forbidden(_)
        )
    }

    /// Whether a screen should raise a user-visible alert for this error.
    /// Auth failures are left to the redirect-to-login flow and cancellations are silent.
    pub fn should_alert(&self) -> bool {
        !self.is_auth() && !matches!(self, ClientError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_detection_uses_status_code() {
        let err = ClientError::from_status(StatusCode::UNAUTHORIZED, Some("token expired".into()));
        assert!(err.is_auth());
        assert!(!err.should_alert());

        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            Some("Unauthorized discount value".into()),
        );
        assert!(!err.is_auth());
        assert!(err.should_alert());
        assert_eq!(err.to_string(), "Unauthorized discount value");
    }

    #[test]
    fn missing_message_falls_back_to_reason() {
        let err = ClientError::from_status(StatusCode::CONFLICT, Some("  ".into()));
        assert_eq!(err.to_string(), "Conflict");
        assert_eq!(err.status(), Some(409));
    }
}
