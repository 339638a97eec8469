use serde::{Deserialize, Serialize};

/// One row of the params or headers list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub enabled: bool,
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: true,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }
}

impl Default for KeyValue {
    fn default() -> Self {
        Self {
            enabled: true,
            key: String::new(),
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    pub fn next(self) -> Self {
        match self {
            HttpMethod::Get => HttpMethod::Post,
            HttpMethod::Post => HttpMethod::Put,
            HttpMethod::Put => HttpMethod::Patch,
            HttpMethod::Patch => HttpMethod::Delete,
            HttpMethod::Delete => HttpMethod::Head,
            HttpMethod::Head => HttpMethod::Options,
            HttpMethod::Options => HttpMethod::Get,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            HttpMethod::Get => HttpMethod::Options,
            HttpMethod::Post => HttpMethod::Get,
            HttpMethod::Put => HttpMethod::Post,
            HttpMethod::Patch => HttpMethod::Put,
            HttpMethod::Delete => HttpMethod::Patch,
            HttpMethod::Head => HttpMethod::Delete,
            HttpMethod::Options => HttpMethod::Head,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthType {
    #[default]
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl AuthType {
    pub fn variant_name(&self) -> &'static str {
        match self {
            AuthType::None => "None",
            AuthType::Basic { .. } => "Basic",
            AuthType::Bearer { .. } => "Bearer",
        }
    }

    pub fn cycle_next(&self) -> AuthType {
        match self {
            AuthType::None => AuthType::Basic {
                username: String::new(),
                password: String::new(),
            },
            AuthType::Basic { .. } => AuthType::Bearer {
                token: String::new(),
            },
            AuthType::Bearer { .. } => AuthType::None,
        }
    }

    pub fn cycle_prev(&self) -> AuthType {
        match self {
            AuthType::None => AuthType::Bearer {
                token: String::new(),
            },
            AuthType::Basic { .. } => AuthType::None,
            AuthType::Bearer { .. } => AuthType::Basic {
                username: String::new(),
                password: String::new(),
            },
        }
    }

    pub fn field_count(&self) -> usize {
        match self {
            AuthType::None => 0,
            AuthType::Basic { .. } => 2,
            AuthType::Bearer { .. } => 1,
        }
    }
}

/// What kind of body goes out with the request, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    #[default]
    None,
    Json,
    PlainText,
    Xml,
}

impl BodyKind {
    pub const ALL: [BodyKind; 4] = [
        BodyKind::None,
        BodyKind::Json,
        BodyKind::PlainText,
        BodyKind::Xml,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::None => "None",
            BodyKind::Json => "JSON",
            BodyKind::PlainText => "Text",
            BodyKind::Xml => "XML",
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            BodyKind::None => None,
            BodyKind::Json => Some("application/json"),
            BodyKind::PlainText => Some("text/plain"),
            BodyKind::Xml => Some("application/xml"),
        }
    }

    pub fn next(self) -> Self {
        match self {
            BodyKind::None => BodyKind::Json,
            BodyKind::Json => BodyKind::PlainText,
            BodyKind::PlainText => BodyKind::Xml,
            BodyKind::Xml => BodyKind::None,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            BodyKind::None => BodyKind::Xml,
            BodyKind::Json => BodyKind::None,
            BodyKind::PlainText => BodyKind::Json,
            BodyKind::Xml => BodyKind::PlainText,
        }
    }

    /// Position in [`BodyKind::ALL`], used to index per-kind editors.
    pub fn index(&self) -> usize {
        match self {
            BodyKind::None => 0,
            BodyKind::Json => 1,
            BodyKind::PlainText => 2,
            BodyKind::Xml => 3,
        }
    }
}

/// Snapshot of the form taken when the user hits send.
///
/// Built once per cycle and passed by value through validation, assembly and
/// dispatch; nothing re-reads the editor while a request is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<KeyValue>,
    pub headers: Vec<KeyValue>,
    pub auth: AuthType,
    pub body_kind: BodyKind,
    /// Text of the editor belonging to `body_kind`. Ignored for `BodyKind::None`.
    pub body: String,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, row: KeyValue) -> Self {
        self.params.push(row);
        self
    }

    pub fn with_header(mut self, row: KeyValue) -> Self {
        self.headers.push(row);
        self
    }

    pub fn with_auth(mut self, auth: AuthType) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_body(mut self, kind: BodyKind, body: impl Into<String>) -> Self {
        self.body_kind = kind;
        self.body = body.into();
        self
    }
}
