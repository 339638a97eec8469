/// Display language of a response body, used to pick a highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Json,
    Xml,
    Html,
    #[default]
    PlainText,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Json => "json",
            Language::Xml => "xml",
            Language::Html => "html",
            Language::PlainText => "plaintext",
        }
    }
}

/// Pretty-prints JSON with two-space indentation; anything else comes back as is.
pub fn format_response(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| text.to_string())
}

pub fn detect_language(text: &str) -> Language {
    if serde_json::from_str::<serde_json::Value>(text).is_ok() {
        return Language::Json;
    }

    let trimmed = text.trim();
    if starts_with_ignore_case(trimmed, "<!doctype") || starts_with_ignore_case(trimmed, "<html") {
        Language::Html
    } else if trimmed.starts_with('<') && trimmed.ends_with('>') {
        Language::Xml
    } else {
        Language::PlainText
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

pub fn format_byte_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
