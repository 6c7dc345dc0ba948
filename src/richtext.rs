//! Utilities for working with styled text fragments.
//!
//! Paragraphs are described with a tiny HTML-like markup: `<b>` and `<i>` toggle bold and italic
//! text, `<br />` forces a line break and the usual `&amp;`-style entities escape reserved
//! characters.  [`parse_markup`] turns such a string into [`Inline`] items that the paragraph
//! wrapper in [`crate::paragraph`] lays out.

use std::fmt;

use crate::canvas::FontStyle;

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span should be rendered in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// The font face this span is drawn with.
    ///
    /// Italic text is drawn upright; only the regular and bold Helvetica faces are embedded.
    pub fn font(&self) -> FontStyle {
        if self.bold {
            FontStyle::Bold
        } else {
            FontStyle::Regular
        }
    }
}

/// One item of parsed paragraph markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(Span),
    LineBreak,
}

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the original input string where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the parsing error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    italic: bool,
}

impl StyleState {
    fn to_span(self, text: impl Into<String>) -> Span {
        Span {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
}

impl Marker {
    fn closing_token(self) -> &'static str {
        match self {
            Marker::Bold => "</b>",
            Marker::Italic => "</i>",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Marker::Bold => "<b> tag",
            Marker::Italic => "<i> tag",
        }
    }
}

const LINE_BREAKS: &[&str] = &["<br />", "<br/>", "<br>"];

const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
];

/// Parses paragraph markup into inline items.
///
/// The supported constructs are:
///
/// - `<b>bold</b>` and `<i>italic</i>`, which may nest
/// - `<br />` (also `<br/>` and `<br>`) for a forced line break
/// - the entities `&amp;`, `&lt;`, `&gt;`, `&quot;` and `&#39;`
pub fn parse_markup(input: &str) -> Result<Vec<Inline>, ParseError> {
    let (items, idx) = parse_inner(input, 0, StyleState::default(), None)?;
    debug_assert_eq!(idx, input.len());
    Ok(items)
}

fn parse_inner(
    input: &str,
    mut index: usize,
    state: StyleState,
    closing_marker: Option<Marker>,
) -> Result<(Vec<Inline>, usize), ParseError> {
    let mut items = Vec::new();
    let mut buffer = String::new();

    while index < input.len() {
        let rest = &input[index..];

        if let Some(marker) = closing_marker {
            if rest.starts_with(marker.closing_token()) {
                flush_buffer(&mut buffer, &mut items, state);
                index += marker.closing_token().len();
                return Ok((items, index));
            }
        }

        if let Some(token) = LINE_BREAKS.iter().find(|token| rest.starts_with(**token)) {
            flush_buffer(&mut buffer, &mut items, state);
            items.push(Inline::LineBreak);
            index += token.len();
            continue;
        }

        let opening = if rest.starts_with("<b>") {
            Some(Marker::Bold)
        } else if rest.starts_with("<i>") {
            Some(Marker::Italic)
        } else {
            None
        };

        if let Some(marker) = opening {
            flush_buffer(&mut buffer, &mut items, state);
            index += 3;
            let mut nested_state = state;
            match marker {
                Marker::Bold => nested_state.bold = true,
                Marker::Italic => nested_state.italic = true,
            }
            let (nested, new_index) = parse_inner(input, index, nested_state, Some(marker))?;
            items.extend(nested);
            index = new_index;
            continue;
        }

        if rest.starts_with("</") {
            return Err(ParseError::new(index, "unexpected closing tag"));
        }

        if rest.starts_with('<') {
            return Err(ParseError::new(
                index,
                "unsupported tag; expected <b>, <i> or <br />",
            ));
        }

        if rest.starts_with('&') {
            let (ch, len) = ENTITIES
                .iter()
                .find(|(entity, _)| rest.starts_with(entity))
                .map(|(entity, ch)| (*ch, entity.len()))
                .ok_or_else(|| ParseError::new(index, "unknown character entity"))?;
            buffer.push(ch);
            index += len;
            continue;
        }

        let ch = match rest.chars().next() {
            Some(ch) => ch,
            None => break,
        };
        buffer.push(ch);
        index += ch.len_utf8();
    }

    if let Some(marker) = closing_marker {
        Err(ParseError::new(
            index,
            format!("unterminated {}", marker.description()),
        ))
    } else {
        flush_buffer(&mut buffer, &mut items, state);
        Ok((items, index))
    }
}

fn flush_buffer(buffer: &mut String, items: &mut Vec<Inline>, state: StyleState) {
    if buffer.is_empty() {
        return;
    }
    items.push(Inline::Text(state.to_span(std::mem::take(buffer))));
}

/// Escapes characters that carry meaning in paragraph markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Flattens inline items back into plain text, with line breaks as `\n`.
pub fn plain_text(items: &[Inline]) -> String {
    items
        .iter()
        .map(|item| match item {
            Inline::Text(span) => span.text(),
            Inline::LineBreak => "\n",
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(item: &Inline) -> &Span {
        match item {
            Inline::Text(span) => span,
            Inline::LineBreak => panic!("expected text, found line break"),
        }
    }

    #[test]
    fn parse_plain_text() {
        let items = parse_markup("Hello world").expect("parse succeeds");
        assert_eq!(items.len(), 1);
        assert_eq!(text(&items[0]).text(), "Hello world");
        assert!(!text(&items[0]).is_bold());
    }

    #[test]
    fn parse_labeled_paragraph() {
        let items = parse_markup("<b>Full name:</b> Bruce Wayne").expect("parse succeeds");
        assert_eq!(items.len(), 2);
        assert!(text(&items[0]).is_bold());
        assert_eq!(text(&items[0]).text(), "Full name:");
        assert_eq!(text(&items[0]).font(), FontStyle::Bold);
        assert_eq!(text(&items[1]).text(), " Bruce Wayne");
        assert_eq!(text(&items[1]).font(), FontStyle::Regular);
    }

    #[test]
    fn parse_nested_styles() {
        let items = parse_markup("This is <b>very <i>cool</i></b>!").expect("parse succeeds");
        assert_eq!(items.len(), 4);
        assert!(text(&items[1]).is_bold());
        assert!(text(&items[2]).is_bold());
        assert!(text(&items[2]).is_italic());
        assert_eq!(text(&items[3]).text(), "!");
    }

    #[test]
    fn parse_line_breaks_and_entities() {
        let items = parse_markup("Gotham &amp; Metropolis<br />Earth-2<br/>").expect("parse");
        assert_eq!(items.len(), 4);
        assert_eq!(text(&items[0]).text(), "Gotham & Metropolis");
        assert_eq!(items[1], Inline::LineBreak);
        assert_eq!(items[3], Inline::LineBreak);
        assert_eq!(plain_text(&items), "Gotham & Metropolis\nEarth-2\n");
    }

    #[test]
    fn escaped_text_round_trips() {
        let raw = "Kent <Clark> & Lane";
        let items = parse_markup(&escape_markup(raw)).expect("parse succeeds");
        assert_eq!(plain_text(&items), raw);
    }

    #[test]
    fn error_on_unterminated_bold() {
        let err = parse_markup("<b>oops").unwrap_err();
        assert!(err.message().contains("unterminated <b>"));
    }

    #[test]
    fn error_on_unknown_tag() {
        let err = parse_markup("<u>x</u>").unwrap_err();
        assert_eq!(err.index(), 0);
        assert!(err.message().contains("unsupported tag"));
    }

    #[test]
    fn error_on_stray_closing_tag() {
        let err = parse_markup("text</b>").unwrap_err();
        assert_eq!(err.index(), 4);
    }
}
