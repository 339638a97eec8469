use tui_textarea::{CursorMove, TextArea};

pub fn scroll_by(pos: &mut usize, delta: isize, max: usize) {
    if delta < 0 {
        *pos = pos.saturating_sub((-delta) as usize);
    } else if max > 0 {
        *pos = (*pos + delta as usize).min(max.saturating_sub(1));
    }
}

/// A one-line editor primed with `initial`, cursor at the end.
pub fn single_line_textarea(initial: &str) -> TextArea<'static> {
    let mut textarea = TextArea::new(vec![initial.to_string()]);
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    textarea.move_cursor(CursorMove::End);
    textarea
}

pub fn textarea_value<'a>(textarea: &'a TextArea<'a>) -> &'a str {
    textarea.lines().first().map(|s| s.as_str()).unwrap_or("")
}

pub fn multi_line_textarea(placeholder: &str) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    textarea.set_placeholder_text(placeholder.to_string());
    textarea
}
