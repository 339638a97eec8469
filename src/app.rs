use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;
use tui_textarea::TextArea;

use crate::config::DefaultsConfig;
use crate::cycle::{self, Phase};
use crate::error::{Field, ValidationFailure};
use crate::highlight;
use crate::http::OutboundRequest;
use crate::models::{AuthType, BodyKind, HttpMethod, KeyValue, RequestSpec, ResponseSummary};
use crate::utils::{multi_line_textarea, scroll_by, single_line_textarea, textarea_value};

/// The currently focused panel in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    RequestEditor,
    Response,
}

impl Panel {
    /// Move to the other panel
    pub fn next(self) -> Self {
        match self {
            Panel::RequestEditor => Panel::Response,
            Panel::Response => Panel::RequestEditor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    #[default]
    Params,
    Headers,
    Auth,
    Body,
}

impl EditorTab {
    pub const ALL: [EditorTab; 4] = [
        EditorTab::Params,
        EditorTab::Headers,
        EditorTab::Auth,
        EditorTab::Body,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            EditorTab::Params => "Params",
            EditorTab::Headers => "Headers",
            EditorTab::Auth => "Auth",
            EditorTab::Body => "Body",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            EditorTab::Params => 0,
            EditorTab::Headers => 1,
            EditorTab::Auth => 2,
            EditorTab::Body => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which list a key/value row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowList {
    Params,
    Headers,
}

/// The field currently open in an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Url,
    RowKey(RowList, usize),
    RowValue(RowList, usize),
    Username,
    Password,
    Token,
    Body,
}

impl From<Field> for EditTarget {
    fn from(field: Field) -> Self {
        match field {
            Field::Url => EditTarget::Url,
            Field::Username => EditTarget::Username,
            Field::Password => EditTarget::Password,
            Field::Token => EditTarget::Token,
            Field::Body => EditTarget::Body,
        }
    }
}

/// Main application state
pub struct App {
    pub focused_panel: Panel,
    pub tab: EditorTab,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Whether to show help overlay
    pub show_help: bool,

    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<KeyValue>,
    pub selected_param: usize,
    pub headers: Vec<KeyValue>,
    pub selected_header: usize,
    pub auth: AuthType,
    pub selected_auth_field: usize,
    pub body_kind: BodyKind,
    /// One editor per body kind, indexed by [`BodyKind::index`].
    pub bodies: [TextArea<'static>; 4],

    pub editing: Option<EditTarget>,
    /// Shared single-line editor for whichever field is being edited.
    pub input: TextArea<'static>,

    pub phase: Phase,
    pub response: Option<ResponseSummary>,
    pub response_lines: Vec<Line<'static>>,
    pub response_scroll: usize,
    pub show_response_headers: bool,
    /// Blocking notice for a failed validation; focus goes back on dismiss.
    pub notification: Option<ValidationFailure>,
}

impl App {
    pub fn new(defaults: &DefaultsConfig) -> Self {
        Self {
            focused_panel: Panel::default(),
            tab: EditorTab::default(),
            should_quit: false,
            show_help: false,
            method: defaults.method,
            url: defaults.url.clone(),
            params: Vec::new(),
            selected_param: 0,
            headers: Vec::new(),
            selected_header: 0,
            auth: AuthType::None,
            selected_auth_field: 0,
            body_kind: BodyKind::None,
            bodies: [
                multi_line_textarea(""),
                multi_line_textarea("{ \"key\": \"value\" }"),
                multi_line_textarea("Plain text body"),
                multi_line_textarea("<root></root>"),
            ],
            editing: None,
            input: single_line_textarea(""),
            phase: Phase::Idle,
            response: None,
            response_lines: Vec::new(),
            response_scroll: 0,
            show_response_headers: false,
            notification: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn focus_next(&mut self) {
        self.focused_panel = self.focused_panel.next();
    }

    pub fn body_text(&self) -> String {
        self.bodies[self.body_kind.index()].lines().join("\n")
    }

    /// Freezes the current form into a request description.
    pub fn snapshot(&self) -> RequestSpec {
        RequestSpec {
            method: self.method,
            url: self.url.clone(),
            params: self.params.clone(),
            headers: self.headers.clone(),
            auth: self.auth.clone(),
            body_kind: self.body_kind,
            body: self.body_text(),
        }
    }

    // ---- send cycle ----

    /// Starts a cycle. Returns the request to dispatch, or `None` when a cycle
    /// is already running or validation stopped it.
    pub fn begin_send(&mut self) -> Option<OutboundRequest> {
        if self.phase.is_busy() {
            tracing::debug!("Send ignored, a request is already in flight");
            return None;
        }

        self.phase = Phase::Validating;
        match cycle::prepare(&self.snapshot()) {
            Ok(request) => {
                self.phase = Phase::Sending;
                Some(request)
            }
            Err(failure) => {
                self.focus_field(failure.field);
                self.notification = Some(failure);
                self.phase = Phase::Idle;
                None
            }
        }
    }

    /// Shows a resolved cycle and re-enables sending.
    pub fn finish_send(&mut self, summary: ResponseSummary) {
        self.phase = Phase::Displaying;
        self.response_lines = match highlight::highlight(&summary.formatted_body, summary.language)
        {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(error = %e, "Highlighting failed, showing plain text");
                highlight::plain(&summary.formatted_body)
            }
        };
        self.response = Some(summary);
        self.response_scroll = 0;
        self.phase = Phase::Idle;
    }

    fn focus_field(&mut self, field: Field) {
        self.focused_panel = Panel::RequestEditor;
        match field {
            Field::Url => {}
            Field::Username | Field::Token => {
                self.tab = EditorTab::Auth;
                self.selected_auth_field = 0;
            }
            Field::Password => {
                self.tab = EditorTab::Auth;
                self.selected_auth_field = 1;
            }
            Field::Body => self.tab = EditorTab::Body,
        }
    }

    pub fn dismiss_notification(&mut self) {
        if let Some(failure) = self.notification.take() {
            self.begin_edit(failure.field.into());
        }
    }

    // ---- editing ----

    fn rows(&self, list: RowList) -> &Vec<KeyValue> {
        match list {
            RowList::Params => &self.params,
            RowList::Headers => &self.headers,
        }
    }

    fn rows_mut(&mut self, list: RowList) -> &mut Vec<KeyValue> {
        match list {
            RowList::Params => &mut self.params,
            RowList::Headers => &mut self.headers,
        }
    }

    pub fn selected_row(&self, list: RowList) -> usize {
        match list {
            RowList::Params => self.selected_param,
            RowList::Headers => self.selected_header,
        }
    }

    fn selected_row_mut(&mut self, list: RowList) -> &mut usize {
        match list {
            RowList::Params => &mut self.selected_param,
            RowList::Headers => &mut self.selected_header,
        }
    }

    fn current_value(&self, target: EditTarget) -> Option<String> {
        let value = match target {
            EditTarget::Url => self.url.clone(),
            EditTarget::RowKey(list, i) => self.rows(list).get(i)?.key.clone(),
            EditTarget::RowValue(list, i) => self.rows(list).get(i)?.value.clone(),
            EditTarget::Username => match &self.auth {
                AuthType::Basic { username, .. } => username.clone(),
                _ => return None,
            },
            EditTarget::Password => match &self.auth {
                AuthType::Basic { password, .. } => password.clone(),
                _ => return None,
            },
            EditTarget::Token => match &self.auth {
                AuthType::Bearer { token } => token.clone(),
                _ => return None,
            },
            EditTarget::Body => return None,
        };
        Some(value)
    }

    pub fn begin_edit(&mut self, target: EditTarget) {
        if target == EditTarget::Body {
            if self.body_kind != BodyKind::None {
                self.editing = Some(target);
            }
            return;
        }
        if let Some(value) = self.current_value(target) {
            self.input = single_line_textarea(&value);
            self.editing = Some(target);
        }
    }

    /// Writes the open editor back into the form and closes it.
    pub fn commit_edit(&mut self) {
        let Some(target) = self.editing.take() else {
            return;
        };
        let value = textarea_value(&self.input).to_string();
        match target {
            EditTarget::Url => self.url = value,
            EditTarget::RowKey(list, i) => {
                if let Some(row) = self.rows_mut(list).get_mut(i) {
                    row.key = value;
                }
            }
            EditTarget::RowValue(list, i) => {
                if let Some(row) = self.rows_mut(list).get_mut(i) {
                    row.value = value;
                }
            }
            EditTarget::Username => {
                if let AuthType::Basic { username, .. } = &mut self.auth {
                    *username = value;
                }
            }
            EditTarget::Password => {
                if let AuthType::Basic { password, .. } = &mut self.auth {
                    *password = value;
                }
            }
            EditTarget::Token => {
                if let AuthType::Bearer { token } = &mut self.auth {
                    *token = value;
                }
            }
            EditTarget::Body => {}
        }
    }

    /// New rows go to the top of the list.
    pub fn add_row(&mut self, list: RowList) {
        self.rows_mut(list).insert(0, KeyValue::default());
        *self.selected_row_mut(list) = 0;
        self.begin_edit(EditTarget::RowKey(list, 0));
    }

    pub fn delete_selected_row(&mut self, list: RowList) {
        let selected = self.selected_row(list);
        let rows = self.rows_mut(list);
        if selected < rows.len() {
            rows.remove(selected);
        }
        let len = rows.len();
        *self.selected_row_mut(list) = selected.min(len.saturating_sub(1));
    }

    pub fn toggle_selected_row(&mut self, list: RowList) {
        let selected = self.selected_row(list);
        if let Some(row) = self.rows_mut(list).get_mut(selected) {
            row.enabled = !row.enabled;
        }
    }

    pub fn select_row(&mut self, list: RowList, delta: isize) {
        let len = self.rows(list).len();
        scroll_by(self.selected_row_mut(list), delta, len);
    }

    fn auth_field_target(&self) -> Option<EditTarget> {
        match (&self.auth, self.selected_auth_field) {
            (AuthType::Basic { .. }, 0) => Some(EditTarget::Username),
            (AuthType::Basic { .. }, _) => Some(EditTarget::Password),
            (AuthType::Bearer { .. }, _) => Some(EditTarget::Token),
            (AuthType::None, _) => None,
        }
    }

    fn cycle_auth(&mut self, forward: bool) {
        self.auth = if forward {
            self.auth.cycle_next()
        } else {
            self.auth.cycle_prev()
        };
        self.selected_auth_field = 0;
    }

    pub fn scroll_response(&mut self, delta: isize) {
        let max = if self.show_response_headers {
            self.response.as_ref().map_or(0, |r| r.headers.len())
        } else {
            self.response_lines.len()
        };
        scroll_by(&mut self.response_scroll, delta, max);
    }

    // ---- keys ----

    /// Handles one key press. Returns a request when the key started a send.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<OutboundRequest> {
        if self.notification.is_some() {
            self.dismiss_notification();
            return None;
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return None;
        }

        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.commit_edit();
            return self.begin_send();
        }

        if let Some(target) = self.editing {
            self.handle_edit_key(target, key);
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Tab | KeyCode::BackTab => self.focus_next(),
            KeyCode::Char('s') | KeyCode::F(5) => return self.begin_send(),
            _ => match self.focused_panel {
                Panel::RequestEditor => self.handle_editor_key(key),
                Panel::Response => self.handle_response_key(key),
            },
        }
        None
    }

    fn handle_edit_key(&mut self, target: EditTarget, key: KeyEvent) {
        if target == EditTarget::Body {
            if key.code == KeyCode::Esc {
                self.editing = None;
            } else {
                self.bodies[self.body_kind.index()].input(key);
            }
            return;
        }

        match (key.code, target) {
            (KeyCode::Tab, EditTarget::RowKey(list, i)) => {
                self.commit_edit();
                self.begin_edit(EditTarget::RowValue(list, i));
            }
            (KeyCode::BackTab, EditTarget::RowValue(list, i)) => {
                self.commit_edit();
                self.begin_edit(EditTarget::RowKey(list, i));
            }
            (KeyCode::Enter | KeyCode::Esc, _) => self.commit_edit(),
            (KeyCode::Tab | KeyCode::BackTab, _) => {}
            _ => {
                self.input.input(key);
            }
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('m') => self.method = self.method.next(),
            KeyCode::Char('M') => self.method = self.method.prev(),
            KeyCode::Char('u') => self.begin_edit(EditTarget::Url),
            KeyCode::Char(']') => self.tab = self.tab.next(),
            KeyCode::Char('[') => self.tab = self.tab.prev(),
            KeyCode::Char(c @ '1'..='4') => {
                self.tab = EditorTab::ALL[c as usize - '1' as usize];
            }
            _ => match self.tab {
                EditorTab::Params => self.handle_rows_key(RowList::Params, key),
                EditorTab::Headers => self.handle_rows_key(RowList::Headers, key),
                EditorTab::Auth => self.handle_auth_key(key),
                EditorTab::Body => self.handle_body_key(key),
            },
        }
    }

    fn handle_rows_key(&mut self, list: RowList, key: KeyEvent) {
        let selected = self.selected_row(list);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select_row(list, 1),
            KeyCode::Char('k') | KeyCode::Up => self.select_row(list, -1),
            KeyCode::Char('a') => self.add_row(list),
            KeyCode::Char('d') => self.delete_selected_row(list),
            KeyCode::Char(' ') => self.toggle_selected_row(list),
            KeyCode::Char('e') | KeyCode::Enter => self.begin_edit(EditTarget::RowKey(list, selected)),
            KeyCode::Char('v') => self.begin_edit(EditTarget::RowValue(list, selected)),
            _ => {}
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => self.cycle_auth(true),
            KeyCode::Char('h') | KeyCode::Left => self.cycle_auth(false),
            KeyCode::Char('j') | KeyCode::Down => {
                let count = self.auth.field_count();
                scroll_by(&mut self.selected_auth_field, 1, count);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let count = self.auth.field_count();
                scroll_by(&mut self.selected_auth_field, -1, count);
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(target) = self.auth_field_target() {
                    self.begin_edit(target);
                }
            }
            _ => {}
        }
    }

    fn handle_body_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => self.body_kind = self.body_kind.next(),
            KeyCode::Char('h') | KeyCode::Left => self.body_kind = self.body_kind.prev(),
            KeyCode::Char('e') | KeyCode::Enter => self.begin_edit(EditTarget::Body),
            _ => {}
        }
    }

    fn handle_response_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll_response(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_response(-1),
            KeyCode::PageDown => self.scroll_response(20),
            KeyCode::PageUp => self.scroll_response(-20),
            KeyCode::Char('g') | KeyCode::Home => self.response_scroll = 0,
            KeyCode::Char('H') => {
                self.show_response_headers = !self.show_response_headers;
                self.response_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::format::Language;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn app_with_url(url: &str) -> App {
        App::new(&DefaultsConfig {
            method: HttpMethod::Get,
            url: url.to_string(),
        })
    }

    #[test]
    fn test_add_row_goes_on_top_and_edits_key() {
        let mut app = app_with_url("https://api.example.com/items");
        app.handle_key(press(KeyCode::Char('a')));
        type_text(&mut app, "id");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "5");
        app.handle_key(press(KeyCode::Enter));

        app.handle_key(press(KeyCode::Char('a')));
        type_text(&mut app, "page");
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.editing, None);
        assert_eq!(app.params[0].key, "page");
        assert_eq!(app.params[1], KeyValue::new("id", "5"));
        assert_eq!(app.selected_param, 0);
    }

    #[test]
    fn test_toggle_and_delete_rows() {
        let mut app = app_with_url("");
        app.params = vec![KeyValue::new("a", "1"), KeyValue::new("b", "2")];
        app.handle_key(press(KeyCode::Char(' ')));
        assert!(!app.params[0].enabled);

        app.handle_key(press(KeyCode::Char('j')));
        app.handle_key(press(KeyCode::Char('d')));
        assert_eq!(app.params.len(), 1);
        assert_eq!(app.selected_param, 0);
    }

    #[test]
    fn test_snapshot_reads_selected_body_editor() {
        let mut app = app_with_url("https://example.com");
        app.tab = EditorTab::Body;
        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.body_kind, BodyKind::Json);
        app.handle_key(press(KeyCode::Enter));
        type_text(&mut app, "{}");
        app.handle_key(press(KeyCode::Esc));

        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.body_kind, BodyKind::PlainText);
        assert_eq!(app.snapshot().body, "");

        app.handle_key(press(KeyCode::Left));
        let spec = app.snapshot();
        assert_eq!(spec.body_kind, BodyKind::Json);
        assert_eq!(spec.body, "{}");
    }

    #[test]
    fn test_send_assembles_request_and_disables_send() {
        let mut app = app_with_url("https://api.example.com/items");
        app.params.push(KeyValue::new("id", "5"));

        let request = app.handle_key(press(KeyCode::Char('s'))).unwrap();
        assert_eq!(request.url, "https://api.example.com/items?id=5");
        assert_eq!(app.phase, Phase::Sending);

        assert!(app.handle_key(press(KeyCode::Char('s'))).is_none());
        assert_eq!(app.phase, Phase::Sending);
    }

    #[test]
    fn test_failed_validation_notifies_and_returns_focus() {
        let mut app = app_with_url("https://api.example.com/items");
        app.auth = AuthType::Bearer {
            token: String::new(),
        };
        app.focused_panel = Panel::Response;

        assert!(app.handle_key(press(KeyCode::Char('s'))).is_none());
        assert_eq!(app.phase, Phase::Idle);
        assert_eq!(app.focused_panel, Panel::RequestEditor);
        assert_eq!(app.tab, EditorTab::Auth);
        let failure = app.notification.clone().unwrap();
        assert_eq!(failure.message, "Bearer token is required");

        app.handle_key(press(KeyCode::Enter));
        assert!(app.notification.is_none());
        assert_eq!(app.editing, Some(EditTarget::Token));

        type_text(&mut app, "abc");
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(
            app.auth,
            AuthType::Bearer {
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_ctrl_s_commits_open_edit_before_sending() {
        let mut app = app_with_url("");
        app.handle_key(press(KeyCode::Char('u')));
        type_text(&mut app, "http://localhost:8080");
        let request = app
            .handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(request.url, "http://localhost:8080");
        assert_eq!(app.url, "http://localhost:8080");
    }

    #[test]
    fn test_finish_send_returns_to_idle() {
        let mut app = app_with_url("https://example.com");
        app.begin_send().unwrap();
        app.finish_send(ResponseSummary {
            status: 200,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body: r#"{"a":1}"#.to_string(),
            formatted_body: "{\n  \"a\": 1\n}".to_string(),
            language: Language::Json,
            size_bytes: 7,
            elapsed: Duration::from_millis(12),
            is_error: false,
        });
        assert_eq!(app.phase, Phase::Idle);
        assert_eq!(app.response_lines.len(), 3);
        assert!(app.begin_send().is_some());
    }

    #[test]
    fn test_highlight_failure_falls_back_to_plain_text() {
        let mut app = app_with_url("https://example.com");
        app.finish_send(ResponseSummary {
            status: 200,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body: "<a>ok</a><b".to_string(),
            formatted_body: "<a>ok</a><b".to_string(),
            language: Language::Xml,
            size_bytes: 11,
            elapsed: Duration::from_millis(3),
            is_error: false,
        });
        assert_eq!(app.response_lines, vec![Line::from("<a>ok</a><b")]);
        assert_eq!(app.response.unwrap().body, "<a>ok</a><b");
    }
}
