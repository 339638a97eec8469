//! One send cycle: validate, assemble, dispatch, summarise.
//!
//! The UI drives the [`Phase`] transitions: [`prepare`] runs while
//! `Validating`, [`send`] while `Sending`, and the returned summary is shown
//! while `Displaying`. Every path ends back in `Idle`.

use std::time::Instant;

use crate::error::{Field, ValidationFailure};
use crate::format::{detect_language, format_response};
use crate::http::{Dispatch, OutboundRequest, RawResponse, assemble};
use crate::models::{AuthType, BodyKind, RequestSpec, ResponseSummary};
use crate::validate::{
    validate_basic_auth, validate_bearer_token, validate_json_body, validate_url,
    validate_xml_body,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Sending,
    Displaying,
}

impl Phase {
    /// Send is refused unless the previous cycle has fully resolved.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// Runs the checks in order and stops at the first failure.
pub fn validate(spec: &RequestSpec) -> Result<(), ValidationFailure> {
    validate_url(&spec.url).check(Field::Url)?;

    match &spec.auth {
        AuthType::None => {}
        AuthType::Bearer { token } => {
            validate_bearer_token(token).check(Field::Token)?;
        }
        AuthType::Basic { username, password } => {
            let field = if username.trim().is_empty() {
                Field::Username
            } else {
                Field::Password
            };
            validate_basic_auth(username, password).check(field)?;
        }
    }

    match spec.body_kind {
        BodyKind::Json => {
            validate_json_body(&spec.body).check(Field::Body)?;
        }
        BodyKind::Xml => {
            validate_xml_body(&spec.body).check(Field::Body)?;
        }
        BodyKind::None | BodyKind::PlainText => {}
    }

    Ok(())
}

/// Validates the snapshot and builds the outbound request. Nothing is sent.
pub fn prepare(spec: &RequestSpec) -> Result<OutboundRequest, ValidationFailure> {
    if let Err(failure) = validate(spec) {
        tracing::info!(field = ?failure.field, message = %failure.message, "Validation failed");
        return Err(failure);
    }
    Ok(assemble(spec))
}

/// Dispatches and waits for the transport to resolve.
///
/// Transport failures come back as an error-flavoured summary rather than an
/// `Err`; the elapsed time is measured either way.
pub async fn send<D: Dispatch>(dispatcher: &D, request: OutboundRequest) -> ResponseSummary {
    tracing::info!(
        method = request.method.as_str(),
        url = %request.url,
        headers = ?request.headers.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
        has_body = request.body.is_some(),
        "Sending request"
    );

    let start = Instant::now();
    let result = dispatcher.dispatch(&request).await;
    let elapsed = start.elapsed();

    match result {
        Ok(raw) => {
            let summary = summarize(raw, elapsed);
            tracing::info!(
                status = summary.status,
                size = summary.size_bytes,
                elapsed_ms = summary.elapsed_millis() as u64,
                "Response received"
            );
            summary
        }
        Err(e) => {
            tracing::warn!(error = %e, elapsed_ms = elapsed.as_millis() as u64, "Request failed");
            ResponseSummary::transport_error(e.to_string(), elapsed)
        }
    }
}

fn summarize(raw: RawResponse, elapsed: std::time::Duration) -> ResponseSummary {
    let size_bytes = raw.size_bytes();
    ResponseSummary {
        status: raw.status,
        formatted_body: format_response(&raw.body),
        language: detect_language(&raw.body),
        status_text: raw.status_text,
        headers: raw.headers,
        body: raw.body,
        size_bytes,
        elapsed,
        is_error: false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::TransportError;
    use crate::format::Language;
    use crate::models::{HttpMethod, KeyValue};

    /// In-memory dispatcher that records every request it is handed.
    struct FakeDispatch {
        reply: Result<RawResponse, TransportError>,
        seen: Mutex<Vec<OutboundRequest>>,
    }

    impl FakeDispatch {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(RawResponse {
                    status,
                    status_text: "OK".to_string(),
                    headers: vec![("content-type".to_string(), "application/json".to_string())],
                    body: body.to_string(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: TransportError) -> Self {
            Self {
                reply: Err(error),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<OutboundRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    /// A whole cycle without the UI observing the phases in between.
    async fn run<D: Dispatch>(
        dispatcher: &D,
        spec: RequestSpec,
    ) -> Result<ResponseSummary, ValidationFailure> {
        let request = prepare(&spec)?;
        Ok(send(dispatcher, request).await)
    }

    impl Dispatch for FakeDispatch {
        async fn dispatch(
            &self,
            request: &OutboundRequest,
        ) -> Result<RawResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    #[test]
    fn test_phase_busy() {
        assert!(!Phase::Idle.is_busy());
        assert!(Phase::Validating.is_busy());
        assert!(Phase::Sending.is_busy());
        assert!(Phase::Displaying.is_busy());
    }

    #[test]
    fn test_validation_order_url_first() {
        let spec = RequestSpec::new(HttpMethod::Get, "")
            .with_auth(AuthType::Bearer {
                token: String::new(),
            })
            .with_body(BodyKind::Json, "{bad");
        assert_eq!(validate(&spec).unwrap_err().field, Field::Url);
    }

    #[test]
    fn test_validation_auth_before_body() {
        let spec = RequestSpec::new(HttpMethod::Post, "https://example.com")
            .with_auth(AuthType::Basic {
                username: "me".to_string(),
                password: String::new(),
            })
            .with_body(BodyKind::Json, "{bad");
        let failure = validate(&spec).unwrap_err();
        assert_eq!(failure.field, Field::Password);
        assert_eq!(failure.message, "Password is required");
    }

    #[test]
    fn test_validation_body_checked_for_selected_kind_only() {
        let spec = RequestSpec::new(HttpMethod::Post, "https://example.com")
            .with_body(BodyKind::PlainText, "{bad");
        assert!(validate(&spec).is_ok());

        let spec = spec.with_body(BodyKind::Xml, "<a><b</a>");
        assert_eq!(validate(&spec).unwrap_err().field, Field::Body);
    }

    #[tokio::test]
    async fn test_run_get_with_query() {
        let dispatcher = FakeDispatch::replying(200, r#"{"id":5}"#);
        let spec = RequestSpec::new(HttpMethod::Get, "https://api.example.com/items")
            .with_param(KeyValue::new("id", "5"));

        let summary = run(&dispatcher, spec).await.unwrap();

        let seen = dispatcher.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://api.example.com/items?id=5");
        assert!(seen[0].headers.is_empty());
        assert_eq!(seen[0].body, None);

        assert!(!summary.is_error);
        assert_eq!(summary.status, 200);
        assert_eq!(summary.formatted_body, "{\n  \"id\": 5\n}");
        assert_eq!(summary.language, Language::Json);
        assert_eq!(summary.size_bytes, 8);
        assert_eq!(summary.size_display(), "8 B");
    }

    #[tokio::test]
    async fn test_run_empty_bearer_token_never_dispatches() {
        let dispatcher = FakeDispatch::replying(200, "");
        let spec = RequestSpec::new(HttpMethod::Get, "https://api.example.com/items").with_auth(
            AuthType::Bearer {
                token: "  ".to_string(),
            },
        );

        let failure = run(&dispatcher, spec).await.unwrap_err();

        assert_eq!(failure.field, Field::Token);
        assert_eq!(failure.message, "Bearer token is required");
        assert!(dispatcher.seen().is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_an_error() {
        let dispatcher = FakeDispatch::replying(404, "<html><body>nope</body></html>");
        let spec = RequestSpec::new(HttpMethod::Delete, "http://localhost:3000/items/9");

        let summary = run(&dispatcher, spec).await.unwrap();

        assert!(!summary.is_error);
        assert_eq!(summary.status, 404);
        assert_eq!(summary.language, Language::Html);
        assert_eq!(summary.formatted_body, summary.body);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_error_summary() {
        let dispatcher = FakeDispatch::failing(TransportError::Connect("dns error".to_string()));
        let spec = RequestSpec::new(HttpMethod::Post, "https://nowhere.invalid")
            .with_body(BodyKind::Json, r#"{"a":1}"#);

        let summary = run(&dispatcher, spec).await.unwrap();

        assert_eq!(dispatcher.seen().len(), 1);
        assert!(summary.is_error);
        assert_eq!(summary.body, "Connection failed: dns error");
        assert_eq!(summary.size_display(), "0 B");
        assert_eq!(summary.language, Language::PlainText);
    }

    #[tokio::test]
    async fn test_send_posts_assembled_body() {
        let dispatcher = FakeDispatch::replying(201, "created");
        let spec = RequestSpec::new(HttpMethod::Post, "https://api.example.com/items")
            .with_auth(AuthType::Basic {
                username: "user".to_string(),
                password: "pass".to_string(),
            })
            .with_body(BodyKind::Json, r#"{"name":"x"}"#);

        let request = prepare(&spec).unwrap();
        let summary = send(&dispatcher, request).await;

        let seen = dispatcher.seen();
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"name":"x"}"#));
        assert_eq!(
            seen[0].headers,
            vec![
                ("Authorization".to_string(), "Basic dXNlcjpwYXNz".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ]
        );
        assert_eq!(summary.language, Language::PlainText);
        assert_eq!(summary.formatted_body, "created");
    }
}
