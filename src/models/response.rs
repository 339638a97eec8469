use std::time::Duration;

use crate::format::{Language, format_byte_size};

/// Everything the response panel shows for one finished cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    /// `0` when the transport failed before a status line arrived.
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub formatted_body: String,
    pub language: Language,
    pub size_bytes: usize,
    pub elapsed: Duration,
    pub is_error: bool,
}

impl ResponseSummary {
    /// Summary for a cycle whose dispatch was rejected by the transport.
    pub fn transport_error(message: impl Into<String>, elapsed: Duration) -> Self {
        let message = message.into();
        Self {
            status: 0,
            status_text: "Error".to_string(),
            headers: Vec::new(),
            formatted_body: message.clone(),
            body: message,
            language: Language::PlainText,
            size_bytes: 0,
            elapsed,
            is_error: true,
        }
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Format elapsed time for display (e.g., "123 ms")
    pub fn elapsed_display(&self) -> String {
        format!("{} ms", self.elapsed_millis())
    }

    /// Format body size for display (e.g., "1.20 KB", "3.40 MB")
    pub fn size_display(&self) -> String {
        format_byte_size(self.size_bytes)
    }

    pub fn status_display(&self) -> String {
        if self.is_error {
            "ERR".to_string()
        } else {
            format!("{} {}", self.status, self.status_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_summary() {
        let summary =
            ResponseSummary::transport_error("Connection failed: refused", Duration::from_millis(42));
        assert!(summary.is_error);
        assert_eq!(summary.status, 0);
        assert_eq!(summary.body, "Connection failed: refused");
        assert_eq!(summary.formatted_body, summary.body);
        assert_eq!(summary.size_display(), "0 B");
        assert_eq!(summary.elapsed_display(), "42 ms");
        assert_eq!(summary.status_display(), "ERR");
    }
}
