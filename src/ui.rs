use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::app::{App, EditTarget, EditorTab, Panel, RowList};
use crate::models::{AuthType, BodyKind, HttpMethod};

pub mod theme {
    use ratatui::style::Color;

    pub const BG: Color = Color::Rgb(26, 26, 46);
    pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 40, 60);
    pub const BORDER: Color = Color::Rgb(58, 58, 74);
    pub const BORDER_FOCUSED: Color = Color::Rgb(115, 210, 22);
    pub const TEXT: Color = Color::Rgb(224, 224, 224);
    pub const TEXT_DIM: Color = Color::Rgb(128, 128, 140);
    pub const ACCENT: Color = Color::Rgb(115, 210, 22);
    pub const ERROR: Color = Color::Rgb(252, 78, 78);
    pub const METHOD_GET: Color = Color::Rgb(115, 210, 22);
    pub const METHOD_POST: Color = Color::Rgb(252, 186, 3);
    pub const METHOD_PUT: Color = Color::Rgb(88, 166, 255);
    pub const METHOD_PATCH: Color = Color::Rgb(163, 113, 247);
    pub const METHOD_DELETE: Color = Color::Rgb(252, 78, 78);
    pub const STATUS_OK: Color = Color::Rgb(115, 210, 22);
    pub const STATUS_REDIRECT: Color = Color::Rgb(88, 166, 255);
    pub const STATUS_CLIENT_ERROR: Color = Color::Rgb(252, 186, 3);
    pub const STATUS_SERVER_ERROR: Color = Color::Rgb(252, 78, 78);
    pub const SYNTAX_KEY: Color = Color::Rgb(88, 166, 255);
    pub const SYNTAX_STRING: Color = Color::Rgb(152, 195, 121);
    pub const SYNTAX_NUMBER: Color = Color::Rgb(209, 154, 102);
    pub const SYNTAX_LITERAL: Color = Color::Rgb(198, 120, 221);
    pub const SYNTAX_TAG: Color = Color::Rgb(224, 108, 117);
    pub const SYNTAX_ATTR: Color = Color::Rgb(229, 192, 123);
    pub const SYNTAX_PUNCT: Color = Color::Rgb(171, 178, 191);
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Vertical layout: main content + status bar
    let outer_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // Main layout: request editor | response
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50), // Request editor
            Constraint::Percentage(50), // Response
        ])
        .split(outer_layout[0]);

    render_request_editor(frame, app, main_layout[0]);
    render_response(frame, app, main_layout[1]);
    render_status_bar(frame, app, outer_layout[1]);

    if let Some(failure) = &app.notification {
        render_notification(frame, area, failure.field.label(), &failure.message);
    }

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn panel_block(title: &str, is_focused: bool) -> Block<'static> {
    let border_color = if is_focused {
        theme::BORDER_FOCUSED
    } else {
        theme::BORDER
    };

    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme::BG))
}

fn method_color(method: HttpMethod) -> ratatui::style::Color {
    match method {
        HttpMethod::Get => theme::METHOD_GET,
        HttpMethod::Post => theme::METHOD_POST,
        HttpMethod::Put => theme::METHOD_PUT,
        HttpMethod::Patch => theme::METHOD_PATCH,
        HttpMethod::Delete => theme::METHOD_DELETE,
        _ => theme::TEXT_DIM,
    }
}

fn status_color(status: u16) -> ratatui::style::Color {
    match status {
        200..=299 => theme::STATUS_OK,
        300..=399 => theme::STATUS_REDIRECT,
        400..=499 => theme::STATUS_CLIENT_ERROR,
        _ => theme::STATUS_SERVER_ERROR,
    }
}

/// Draws either the live editor (when `target` is open) or the stored value.
fn render_field(frame: &mut Frame, app: &App, target: EditTarget, value: &str, area: Rect) {
    if app.editing == Some(target) {
        frame.render_widget(&app.input, area);
    } else {
        let text = Paragraph::new(Span::styled(
            value.to_string(),
            Style::default().fg(theme::TEXT),
        ));
        frame.render_widget(text, area);
    }
}

/// Render the request editor panel
fn render_request_editor(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block("Request", app.focused_panel == Panel::RequestEditor);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Method + URL
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Tab content
        ])
        .split(inner);

    let method_width = app.method.as_str().len() as u16 + 3;
    let url_bar = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(method_width), Constraint::Min(0)])
        .split(layout[0]);

    let method = Paragraph::new(Span::styled(
        format!(" {} ", app.method.as_str()),
        Style::default()
            .fg(theme::BG)
            .bg(method_color(app.method))
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(method, url_bar[0]);

    if app.url.is_empty() && app.editing != Some(EditTarget::Url) {
        let hint = Paragraph::new(Span::styled(
            "press u to enter a URL",
            Style::default().fg(theme::TEXT_DIM),
        ));
        frame.render_widget(hint, url_bar[1]);
    } else {
        render_field(frame, app, EditTarget::Url, &app.url, url_bar[1]);
    }

    let titles: Vec<Line> = EditorTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(theme::TEXT_DIM))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, layout[2]);

    match app.tab {
        EditorTab::Params => render_rows(frame, app, RowList::Params, layout[3]),
        EditorTab::Headers => render_rows(frame, app, RowList::Headers, layout[3]),
        EditorTab::Auth => render_auth(frame, app, layout[3]),
        EditorTab::Body => render_body(frame, app, layout[3]),
    }
}

fn render_rows(frame: &mut Frame, app: &App, list: RowList, area: Rect) {
    let rows = match list {
        RowList::Params => &app.params,
        RowList::Headers => &app.headers,
    };
    let area = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(1),
        ..area
    };

    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No rows. Press a to add one.",
            Style::default().fg(theme::TEXT_DIM),
        ));
        frame.render_widget(empty, area);
        return;
    }

    let selected = app.selected_row(list);
    let visible = area.height as usize;
    let offset = (selected + 1).saturating_sub(visible);

    for (line, (i, row)) in rows.iter().enumerate().skip(offset).take(visible).enumerate() {
        let row_area = Rect {
            y: area.y + line as u16,
            height: 1,
            ..area
        };
        let is_selected = i == selected;
        let bg = if is_selected {
            theme::BG_HIGHLIGHT
        } else {
            theme::BG
        };
        frame.render_widget(Block::default().style(Style::default().bg(bg)), row_area);

        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(5),
                Constraint::Percentage(40),
                Constraint::Min(0),
            ])
            .split(row_area);

        let checkbox = if row.enabled { "[x] " } else { "[ ] " };
        let prefix_color = if is_selected {
            theme::ACCENT
        } else {
            theme::TEXT_DIM
        };
        frame.render_widget(
            Paragraph::new(Span::styled(checkbox, Style::default().fg(prefix_color))),
            cells[0],
        );
        render_field(frame, app, EditTarget::RowKey(list, i), &row.key, cells[1]);
        render_field(frame, app, EditTarget::RowValue(list, i), &row.value, cells[2]);
    }
}

fn render_auth(frame: &mut Frame, app: &App, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Kind selector
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // First field
            Constraint::Length(1), // Second field
            Constraint::Min(0),
        ])
        .split(area);

    let kinds = [
        AuthType::None,
        AuthType::None.cycle_next(),
        AuthType::None.cycle_prev(),
    ];
    frame.render_widget(
        selector_line("Type", kinds.iter().map(|k| k.variant_name()), app.auth.variant_name()),
        layout[1],
    );

    let fields: Vec<(&str, EditTarget, &str)> = match &app.auth {
        AuthType::None => {
            let hint = Paragraph::new(Span::styled(
                "No authentication. Use h / l to pick a type.",
                Style::default().fg(theme::TEXT_DIM),
            ));
            frame.render_widget(hint, layout[3]);
            Vec::new()
        }
        AuthType::Basic { username, password } => vec![
            ("Username", EditTarget::Username, username.as_str()),
            ("Password", EditTarget::Password, password.as_str()),
        ],
        AuthType::Bearer { token } => vec![("Token", EditTarget::Token, token.as_str())],
    };

    for (i, (label, target, value)) in fields.into_iter().enumerate() {
        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(12), Constraint::Min(0)])
            .split(layout[3 + i]);
        let label_color = if i == app.selected_auth_field {
            theme::ACCENT
        } else {
            theme::TEXT_DIM
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{:<11}", label),
                Style::default().fg(label_color),
            )),
            row[0],
        );
        let shown = if target == EditTarget::Password && app.editing != Some(target) {
            "•".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        render_field(frame, app, target, &shown, row[1]);
    }
}

fn selector_line<'a>(
    label: &'a str,
    options: impl Iterator<Item = &'a str>,
    current: &str,
) -> Paragraph<'a> {
    let mut spans = vec![Span::styled(
        format!("{:<11}", label),
        Style::default().fg(theme::TEXT_DIM),
    )];
    for option in options {
        let style = if option == current {
            Style::default()
                .fg(theme::BG)
                .bg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        spans.push(Span::styled(format!(" {} ", option), style));
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans))
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Kind selector
            Constraint::Min(0),    // Editor
        ])
        .split(area);

    frame.render_widget(
        selector_line(
            "Type",
            BodyKind::ALL.iter().map(|k| k.label()),
            app.body_kind.label(),
        ),
        layout[1],
    );

    if app.body_kind == BodyKind::None {
        let hint = Paragraph::new(Span::styled(
            "This request has no body.",
            Style::default().fg(theme::TEXT_DIM),
        ));
        frame.render_widget(hint, layout[2]);
        return;
    }

    let is_editing = app.editing == Some(EditTarget::Body);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_editing {
            theme::ACCENT
        } else {
            theme::BORDER
        }))
        .title(if is_editing {
            " Editing (Esc to stop) "
        } else {
            " Enter to edit "
        });
    let inner = block.inner(layout[2]);
    frame.render_widget(block, layout[2]);
    frame.render_widget(&app.bodies[app.body_kind.index()], inner);
}

/// Render the response panel
fn render_response(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block("Response", app.focused_panel == Panel::Response);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.phase.is_busy() {
        let sending = Paragraph::new(Text::from(vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "Sending...",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::ITALIC),
            )),
        ]))
        .centered();
        frame.render_widget(sending, inner);
        return;
    }

    let Some(response) = &app.response else {
        let placeholder = Paragraph::new(Text::from(vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "Not sent",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press s to send request",
                Style::default().fg(theme::TEXT_DIM),
            )),
        ]))
        .centered();
        frame.render_widget(placeholder, inner);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Body / headers
        ])
        .split(inner);

    let status_style = if response.is_error {
        Style::default().fg(theme::BG).bg(theme::ERROR)
    } else {
        Style::default()
            .fg(theme::BG)
            .bg(status_color(response.status))
    };
    let view = if app.show_response_headers {
        "headers"
    } else {
        response.language.as_str()
    };
    let status = Line::from(vec![
        Span::styled(
            format!(" {} ", response.status_display()),
            status_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", response.size_display()),
            Style::default().fg(theme::TEXT),
        ),
        Span::styled(
            format!("  {}", response.elapsed_display()),
            Style::default().fg(theme::TEXT),
        ),
        Span::styled(format!("  [{}]", view), Style::default().fg(theme::TEXT_DIM)),
    ]);
    frame.render_widget(Paragraph::new(status), layout[0]);

    let content: Vec<Line> = if app.show_response_headers {
        response
            .headers
            .iter()
            .map(|(k, v)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", k), Style::default().fg(theme::SYNTAX_KEY)),
                    Span::styled(v.clone(), Style::default().fg(theme::TEXT)),
                ])
            })
            .collect()
    } else if response.is_error {
        vec![Line::from(Span::styled(
            response.formatted_body.clone(),
            Style::default().fg(theme::ERROR),
        ))]
    } else {
        app.response_lines.clone()
    };

    let body = Paragraph::new(Text::from(content))
        .style(Style::default().fg(theme::TEXT))
        .wrap(Wrap { trim: false })
        .scroll((app.response_scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(body, layout[2]);
}

/// Render the status bar with keybinds
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme::BG).bg(theme::TEXT_DIM));
    let label = |l: &'static str| Span::styled(l, Style::default().fg(theme::TEXT_DIM));

    let mut spans = if app.editing.is_some() {
        vec![
            key(" Enter/Esc "),
            label(" Done "),
            key(" Tab "),
            label(" Key/Value "),
            key(" C-s "),
            label(" Send "),
        ]
    } else {
        vec![
            key(" q "),
            label(" Quit "),
            key(" ? "),
            label(" Help "),
            key(" Tab "),
            label(" Switch Panel "),
        ]
    };

    if app.phase.is_busy() {
        spans.push(Span::styled(
            " Sending... ",
            Style::default().fg(theme::BG).bg(theme::ACCENT),
        ));
    } else if app.editing.is_none() {
        spans.push(key(" s "));
        spans.push(label(" Send "));
    }

    let status_bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG));

    frame.render_widget(status_bar, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn render_notification(frame: &mut Frame, area: Rect, field: &str, message: &str) {
    let popup = centered(area, 60, 7);
    frame.render_widget(Clear, popup);

    let text = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme::TEXT),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Press any key to edit {}", field),
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];

    let notice = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Cannot send ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ERROR))
                .style(Style::default().bg(theme::BG_HIGHLIGHT)),
        )
        .centered();

    frame.render_widget(notice, popup);
}

/// Render the help overlay with keybinds
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 56, 22);

    frame.render_widget(Clear, help_area);

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<18}", keys), Style::default().fg(theme::ACCENT)),
            Span::styled(what, Style::default().fg(theme::TEXT)),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        entry("Tab", "Switch panel"),
        entry("s / F5 / Ctrl+s", "Send request"),
        entry("m / M", "Next / previous method"),
        entry("u", "Edit URL"),
        entry("1-4, [ / ]", "Pick editor tab"),
        entry("a / d", "Add / delete row"),
        entry("Space", "Enable / disable row"),
        entry("e or Enter / v", "Edit key / value"),
        entry("h / l", "Change auth or body type"),
        entry("j / k", "Move selection or scroll"),
        entry("H", "Response headers / body"),
        entry("Enter / Esc", "Finish editing"),
        entry("?", "Toggle this help"),
        entry("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::BG_HIGHLIGHT)),
        )
        .centered();

    frame.render_widget(help, help_area);
}
