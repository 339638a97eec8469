//! Pre-dispatch checks on user input.
//!
//! Each validator is a pure function returning a [`ValidationResult`]; the
//! orchestrator turns the first invalid one into a [`ValidationFailure`]
//! pointing at the offending field.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Field, ValidationFailure};

static URL_FALLBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("URL fallback pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
    pub normalized: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
            normalized: None,
        }
    }

    pub fn normalized(value: impl Into<String>) -> Self {
        Self {
            normalized: Some(value.into()),
            ..Self::ok()
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
            normalized: None,
        }
    }

    /// Converts into a `Result`, attributing a failure to `field`.
    pub fn check(self, field: Field) -> Result<Option<String>, ValidationFailure> {
        if self.valid {
            Ok(self.normalized)
        } else {
            let message = self
                .message
                .unwrap_or_else(|| format!("{} is invalid", field.label()));
            Err(ValidationFailure::new(field, message))
        }
    }
}

pub fn validate_url(raw: &str) -> ValidationResult {
    let url = raw.trim();
    if url.is_empty() {
        return ValidationResult::invalid("Please enter a URL");
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return ValidationResult::invalid("URL must start with http:// or https://");
    }

    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.host_str().is_some_and(|host| !host.is_empty()) {
                ValidationResult::normalized(url)
            } else {
                ValidationResult::invalid(format!("URL has no host: {}", url))
            }
        }
        Err(url::ParseError::EmptyHost) => {
            ValidationResult::invalid(format!("URL has no host: {}", url))
        }
        Err(e) => {
            if has_host(url) && URL_FALLBACK.is_match(url) {
                ValidationResult::normalized(url)
            } else {
                ValidationResult::invalid(format!("Invalid URL ({}): {}", e, url))
            }
        }
    }
}

/// Whether the authority part, minus any `userinfo@` and `:port`, is non-empty.
fn has_host(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = match host.rsplit_once(':') {
        Some((name, port)) if !host.ends_with(']') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    };
    !host.is_empty()
}

/// Strips an optional, case-insensitive `Bearer` scheme word and whitespace.
pub fn strip_bearer_prefix(raw: &str) -> &str {
    let token = raw.trim();
    match token.get(..6) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {
            let rest = &token[6..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim()
            } else {
                token
            }
        }
        _ => token,
    }
}

pub fn validate_bearer_token(raw: &str) -> ValidationResult {
    let token = strip_bearer_prefix(raw);
    if token.is_empty() {
        ValidationResult::invalid("Bearer token is required")
    } else {
        ValidationResult::normalized(token)
    }
}

pub fn validate_basic_auth(username: &str, password: &str) -> ValidationResult {
    match (username.trim().is_empty(), password.trim().is_empty()) {
        (true, true) => ValidationResult::invalid("Username and password are required"),
        (true, false) => ValidationResult::invalid("Username is required"),
        (false, true) => ValidationResult::invalid("Password is required"),
        (false, false) => ValidationResult::ok(),
    }
}

/// Blank bodies are valid and mean "no body".
pub fn validate_json_body(raw: &str) -> ValidationResult {
    if raw.trim().is_empty() {
        return ValidationResult::ok();
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(_) => ValidationResult::ok(),
        Err(e) => ValidationResult::invalid(format!("Invalid JSON body: {}", e)),
    }
}

/// Shallow shape check only: bracketed text with balanced `<`/`>` counts.
/// This is not an XML parser.
pub fn validate_xml_body(raw: &str) -> ValidationResult {
    let body = raw.trim();
    if body.is_empty() {
        return ValidationResult::ok();
    }
    if !body.starts_with('<') || !body.ends_with('>') {
        return ValidationResult::invalid("XML body must start with '<' and end with '>'");
    }
    let opens = body.matches('<').count();
    let closes = body.matches('>').count();
    if opens != closes {
        return ValidationResult::invalid(format!(
            "XML body looks malformed: {} '<' vs {} '>'",
            opens, closes
        ));
    }
    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_rejects_other_schemes() {
        let result = validate_url("ftp://x.com");
        assert!(!result.valid);
        assert!(result.message.unwrap().contains("http://"));
    }

    #[test]
    fn test_url_accepts_https_path() {
        let result = validate_url("https://example.com/path");
        assert!(result.valid);
        assert_eq!(result.normalized.as_deref(), Some("https://example.com/path"));
    }

    #[test]
    fn test_url_empty_and_blank() {
        for raw in ["", "   "] {
            let result = validate_url(raw);
            assert!(!result.valid);
            assert_eq!(result.message.as_deref(), Some("Please enter a URL"));
        }
    }

    #[test]
    fn test_url_requires_host() {
        assert!(!validate_url("http://").valid);
        assert!(!validate_url("https:// spaced.com").valid);
        assert!(!validate_url("http://:80/").valid);
        assert!(!validate_url("https://user@/path").valid);
    }

    #[test]
    fn test_has_host_ignores_userinfo_and_port() {
        assert!(has_host("http://example.com:8080/a"));
        assert!(has_host("https://user:pw@example.com"));
        assert!(has_host("http://[::1]:3000/"));
        assert!(!has_host("http://:80/"));
        assert!(!has_host("https://user@/path"));
        assert!(!has_host("http://?q=1"));
    }

    #[test]
    fn test_url_trims_whitespace() {
        let result = validate_url("  http://localhost:8080/users?x=1 ");
        assert!(result.valid);
        assert_eq!(
            result.normalized.as_deref(),
            Some("http://localhost:8080/users?x=1")
        );
    }

    #[test]
    fn test_bearer_prefix_stripped() {
        let result = validate_bearer_token("Bearer   abc123");
        assert!(result.valid);
        assert_eq!(result.normalized.as_deref(), Some("abc123"));

        let result = validate_bearer_token("  bEaReR xyz ");
        assert_eq!(result.normalized.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_bearer_token_that_starts_with_bearer_word() {
        let result = validate_bearer_token("bearerish-token");
        assert_eq!(result.normalized.as_deref(), Some("bearerish-token"));
    }

    #[test]
    fn test_bearer_empty_after_prefix() {
        for raw in ["", "   ", "Bearer ", "Bearer"] {
            let result = validate_bearer_token(raw);
            assert!(!result.valid, "{:?} should be rejected", raw);
            assert_eq!(result.message.as_deref(), Some("Bearer token is required"));
        }
    }

    #[test]
    fn test_basic_auth_names_missing_field() {
        assert!(validate_basic_auth("user", "pass").valid);
        assert_eq!(
            validate_basic_auth(" ", "pass").message.as_deref(),
            Some("Username is required")
        );
        assert_eq!(
            validate_basic_auth("user", "").message.as_deref(),
            Some("Password is required")
        );
        assert!(!validate_basic_auth("", "").valid);
    }

    #[test]
    fn test_json_body() {
        assert!(!validate_json_body("{not json").valid);
        assert!(validate_json_body("").valid);
        assert!(validate_json_body("  \n").valid);
        assert!(validate_json_body(r#"{"a":1}"#).valid);
        assert!(validate_json_body("[1, 2, 3]").valid);
    }

    #[test]
    fn test_xml_body_shape() {
        assert!(validate_xml_body("").valid);
        assert!(validate_xml_body("<a><b>1</b></a>").valid);
        assert!(!validate_xml_body("a>").valid);
        assert!(!validate_xml_body("<a><b</a>").valid);
    }

    #[test]
    fn test_check_attributes_field() {
        let err = validate_bearer_token("").check(Field::Token).unwrap_err();
        assert_eq!(err.field, Field::Token);

        let ok = validate_json_body("{}").check(Field::Body).unwrap();
        assert_eq!(ok, None);
    }
}
