use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::models::{AuthType, BodyKind, HttpMethod, KeyValue, RequestSpec};
use crate::validate::strip_bearer_prefix;

/// A request ready to hand to a [`Dispatch`](super::Dispatch) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Collects enabled rows into key/value pairs.
///
/// Disabled rows and rows whose key trims to nothing are skipped. A repeated
/// key replaces the earlier value but keeps the earlier position.
pub fn collect_enabled(rows: &[KeyValue]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for row in rows.iter().filter(|row| row.enabled) {
        let key = row.key.trim();
        if key.is_empty() {
            continue;
        }
        insert_pair(&mut pairs, key, row.value.trim(), |a, b| a == b);
    }
    pairs
}

fn insert_pair(
    pairs: &mut Vec<(String, String)>,
    key: &str,
    value: &str,
    same_key: impl Fn(&str, &str) -> bool,
) {
    match pairs.iter_mut().find(|(k, _)| same_key(k, key)) {
        Some(existing) => existing.1 = value.to_string(),
        None => pairs.push((key.to_string(), value.to_string())),
    }
}

pub fn build_auth_header(auth: &AuthType) -> Option<String> {
    match auth {
        AuthType::None => None,
        AuthType::Basic { username, password } => {
            let (username, password) = (username.trim(), password.trim());
            if username.is_empty() || password.is_empty() {
                return None;
            }
            let encoded = STANDARD.encode(format!("{}:{}", username, password));
            Some(format!("Basic {}", encoded))
        }
        AuthType::Bearer { token } => {
            let token = strip_bearer_prefix(token);
            if token.is_empty() {
                None
            } else {
                Some(format!("Bearer {}", token))
            }
        }
    }
}

pub fn build_content_type_header(kind: BodyKind) -> Option<String> {
    kind.content_type().map(str::to_string)
}

/// Percent-encodes pairs as `k=v&k=v`.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Joins `query` onto `base` ahead of any `#fragment`.
pub fn append_query(base: &str, query: &str) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    let (base, fragment) = match base.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (base, None),
    };
    let mut url = if base.ends_with('?') || base.ends_with('&') {
        format!("{}{}", base, query)
    } else if base.contains('?') {
        format!("{}&{}", base, query)
    } else {
        format!("{}?{}", base, query)
    };
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

/// Turns a snapshot of the form into the request that actually goes out.
///
/// `Authorization` and `Content-Type` are seeded first; enabled custom headers
/// are laid on top and win on a case-insensitive name match.
pub fn assemble(spec: &RequestSpec) -> OutboundRequest {
    let mut headers = Vec::new();
    if let Some(auth) = build_auth_header(&spec.auth) {
        headers.push(("Authorization".to_string(), auth));
    }
    if let Some(content_type) = build_content_type_header(spec.body_kind) {
        headers.push(("Content-Type".to_string(), content_type));
    }
    for (key, value) in collect_enabled(&spec.headers) {
        insert_pair(&mut headers, &key, &value, |a, b| a.eq_ignore_ascii_case(b));
    }

    let query = encode_query(&collect_enabled(&spec.params));
    let url = append_query(spec.url.trim(), &query);

    let body = match spec.body_kind {
        BodyKind::None => None,
        _ => Some(spec.body.clone()),
    };

    OutboundRequest {
        method: spec.method,
        url,
        headers,
        body,
    }
}
