//! Best-effort syntax colouring for the response body.
//!
//! Highlighting never changes the text itself. Callers fall back to
//! [`plain`] whenever [`highlight`] returns an error.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::error::HighlightError;
use crate::format::Language;
use crate::ui::theme;

pub const MAX_HIGHLIGHT_BYTES: usize = 256 * 1024;

pub fn highlight(text: &str, language: Language) -> Result<Vec<Line<'static>>, HighlightError> {
    if text.len() > MAX_HIGHLIGHT_BYTES {
        return Err(HighlightError::TooLarge(text.len()));
    }
    match language {
        Language::Json => highlight_json(text),
        Language::Xml | Language::Html => highlight_markup(text),
        Language::PlainText => Ok(plain(text)),
    }
}

pub fn plain(text: &str) -> Vec<Line<'static>> {
    text.lines().map(|line| Line::from(line.to_string())).collect()
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
}

impl LineBuilder {
    fn push(&mut self, text: &str, style: Style) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.push_span(first, style);
        }
        for part in parts {
            self.break_line();
            self.push_span(part, style);
        }
    }

    fn push_span(&mut self, text: &str, style: Style) {
        let text = text.strip_suffix('\r').unwrap_or(text);
        if !text.is_empty() {
            self.spans.push(Span::styled(text.to_string(), style));
        }
    }

    fn break_line(&mut self) {
        self.lines.push(Line::from(std::mem::take(&mut self.spans)));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.break_line();
        self.lines
    }
}

/// First index at or after `from` whose byte fails `keep`.
fn scan(text: &str, from: usize, keep: impl Fn(u8) -> bool) -> usize {
    text.as_bytes()[from..]
        .iter()
        .position(|&b| !keep(b))
        .map_or(text.len(), |p| from + p)
}

fn style(color: ratatui::style::Color) -> Style {
    Style::default().fg(color)
}

fn highlight_json(text: &str) -> Result<Vec<Line<'static>>, HighlightError> {
    let bytes = text.as_bytes();
    let mut out = LineBuilder::default();
    let mut i = 0;

    while i < bytes.len() {
        let end = match bytes[i] {
            b'"' => {
                let end = json_string_end(bytes, i).ok_or(HighlightError::Unterminated {
                    what: "string",
                    offset: i,
                })?;
                let is_key = bytes[end..]
                    .iter()
                    .find(|b| !b.is_ascii_whitespace())
                    .is_some_and(|&b| b == b':');
                let color = if is_key {
                    theme::SYNTAX_KEY
                } else {
                    theme::SYNTAX_STRING
                };
                out.push(&text[i..end], style(color));
                end
            }
            b'-' | b'0'..=b'9' => {
                let end = scan(text, i, |b| {
                    b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E')
                });
                out.push(&text[i..end], style(theme::SYNTAX_NUMBER));
                end
            }
            b't' | b'f' | b'n' => {
                let end = scan(text, i, |b| b.is_ascii_alphabetic());
                out.push(&text[i..end], style(theme::SYNTAX_LITERAL));
                end
            }
            _ => {
                let end = scan(text, i, |b| {
                    !matches!(b, b'"' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n')
                });
                out.push(&text[i..end], style(theme::SYNTAX_PUNCT));
                end
            }
        };
        i = end;
    }

    Ok(out.finish())
}

/// Index just past the closing quote of the string opening at `start`.
fn json_string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn highlight_markup(text: &str) -> Result<Vec<Line<'static>>, HighlightError> {
    let mut out = LineBuilder::default();
    let mut i = 0;

    while i < text.len() {
        let Some(lt) = text[i..].find('<').map(|p| i + p) else {
            out.push(&text[i..], Style::default());
            break;
        };
        out.push(&text[i..lt], Style::default());

        if text[lt..].starts_with("<!--") {
            let end = text[lt..]
                .find("-->")
                .map(|p| lt + p + 3)
                .ok_or(HighlightError::Unterminated {
                    what: "comment",
                    offset: lt,
                })?;
            out.push(&text[lt..end], style(theme::TEXT_DIM));
            i = end;
            continue;
        }

        let end = tag_end(text, lt).ok_or(HighlightError::Unterminated {
            what: "tag",
            offset: lt,
        })?;
        push_tag(&mut out, &text[lt..end]);
        i = end;
    }

    Ok(out.finish())
}

/// Index just past the `>` closing the tag at `start`, skipping quoted values.
fn tag_end(text: &str, start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, b) in text.bytes().enumerate().skip(start + 1) {
        match (quote, b) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i + 1),
            (None, _) => {}
        }
    }
    None
}

fn push_tag(out: &mut LineBuilder, tag: &str) {
    let bracket = style(theme::SYNTAX_PUNCT);
    let open = scan(tag, 1, |b| matches!(b, b'/' | b'?' | b'!'));
    out.push(&tag[..open], bracket);

    let inner = &tag[open..tag.len() - 1];
    let name_end = inner
        .find(|c: char| c.is_whitespace() || c == '/' || c == '?')
        .unwrap_or(inner.len());
    out.push(&inner[..name_end], style(theme::SYNTAX_TAG));
    push_attributes(out, &inner[name_end..]);
    out.push(">", bracket);
}

fn push_attributes(out: &mut LineBuilder, attrs: &str) {
    let bytes = attrs.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let end = match bytes[i] {
            q @ (b'"' | b'\'') => {
                let end = attrs[i + 1..]
                    .find(q as char)
                    .map_or(attrs.len(), |p| i + 1 + p + 1);
                out.push(&attrs[i..end], style(theme::SYNTAX_STRING));
                end
            }
            b'=' | b'/' | b'?' => {
                out.push(&attrs[i..i + 1], style(theme::SYNTAX_PUNCT));
                i + 1
            }
            b if b.is_ascii_whitespace() => {
                let end = scan(attrs, i, |b| b.is_ascii_whitespace());
                out.push(&attrs[i..end], Style::default());
                end
            }
            _ => {
                let end = scan(attrs, i, |b| {
                    !(b.is_ascii_whitespace() || matches!(b, b'=' | b'"' | b'\'' | b'/' | b'?'))
                });
                out.push(&attrs[i..end], style(theme::SYNTAX_ATTR));
                end
            }
        };
        i = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn spans_with(lines: &[Line], color: ratatui::style::Color) -> Vec<String> {
        lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .filter(|s| s.style.fg == Some(color))
            .map(|s| s.content.to_string())
            .collect()
    }

    #[test]
    fn test_json_keeps_text_and_marks_keys() {
        let text = "{\n  \"id\": 5,\n  \"name\": \"x\",\n  \"ok\": true\n}";
        let lines = highlight(text, Language::Json).unwrap();
        let rendered: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(rendered.join("\n"), text);

        assert_eq!(
            spans_with(&lines, theme::SYNTAX_KEY),
            vec!["\"id\"", "\"name\"", "\"ok\""]
        );
        assert_eq!(spans_with(&lines, theme::SYNTAX_STRING), vec!["\"x\""]);
        assert_eq!(spans_with(&lines, theme::SYNTAX_NUMBER), vec!["5"]);
        assert_eq!(spans_with(&lines, theme::SYNTAX_LITERAL), vec!["true"]);
    }

    #[test]
    fn test_json_escaped_quotes_stay_in_string() {
        let lines = highlight(r#"["a\"b", "ü"]"#, Language::Json).unwrap();
        assert_eq!(
            spans_with(&lines, theme::SYNTAX_STRING),
            vec![r#""a\"b""#, "\"ü\""]
        );
    }

    #[test]
    fn test_json_unterminated_string() {
        let err = highlight("[\"abc", Language::Json).unwrap_err();
        assert_eq!(
            err,
            HighlightError::Unterminated {
                what: "string",
                offset: 1
            }
        );
    }

    #[test]
    fn test_markup_tags_and_attributes() {
        let text = "<note id=\"1\">\n  <to>Tove</to>\n</note>";
        let lines = highlight(text, Language::Xml).unwrap();
        assert_eq!(lines.len(), 3);
        let rendered: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(rendered.join("\n"), text);
        assert_eq!(
            spans_with(&lines, theme::SYNTAX_TAG),
            vec!["note", "to", "to", "note"]
        );
        assert_eq!(spans_with(&lines, theme::SYNTAX_ATTR), vec!["id"]);
        assert_eq!(spans_with(&lines, theme::SYNTAX_STRING), vec!["\"1\""]);
    }

    #[test]
    fn test_markup_quoted_gt_does_not_close_tag() {
        let lines = highlight("<a title=\"x > y\">z</a>", Language::Html).unwrap();
        assert_eq!(spans_with(&lines, theme::SYNTAX_STRING), vec!["\"x > y\""]);
    }

    #[test]
    fn test_markup_unterminated_tag() {
        let err = highlight("<a>ok</a><b", Language::Xml).unwrap_err();
        assert_eq!(
            err,
            HighlightError::Unterminated {
                what: "tag",
                offset: 9
            }
        );
    }

    #[test]
    fn test_too_large() {
        let big = "x".repeat(MAX_HIGHLIGHT_BYTES + 1);
        assert_eq!(
            highlight(&big, Language::PlainText).unwrap_err(),
            HighlightError::TooLarge(MAX_HIGHLIGHT_BYTES + 1)
        );
    }

    #[test]
    fn test_plain_splits_lines() {
        let lines = plain("one\ntwo\r\nthree");
        let rendered: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(rendered, vec!["one", "two", "three"]);
    }
}
