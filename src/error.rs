use thiserror::Error;

/// Form fields a validation failure can point back at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Username,
    Password,
    Token,
    Body,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Url => "URL",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Token => "Token",
            Field::Body => "Body",
        }
    }
}

/// A request that was stopped before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub field: Field,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The HTTP primitive rejected the request. Non-2xx statuses are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Failed to read response body: {0}")]
    Body(String),
    #[error("Request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_request() || e.is_builder() {
            TransportError::InvalidRequest(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    #[error("body too large to highlight ({0} bytes)")]
    TooLarge(usize),
    #[error("unterminated {what} starting at byte {offset}")]
    Unterminated { what: &'static str, offset: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_displays_message() {
        let failure = ValidationFailure::new(Field::Token, "Bearer token is required");
        assert_eq!(failure.to_string(), "Bearer token is required");
        assert_eq!(failure.field.label(), "Token");
    }

    #[test]
    fn test_transport_error_messages() {
        assert_eq!(TransportError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            TransportError::Connect("dns error".to_string()).to_string(),
            "Connection failed: dns error"
        );
    }
}
