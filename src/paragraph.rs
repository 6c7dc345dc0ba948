//! Greedy word wrapping of styled text into a fixed-width box.
//!
//! [`wrap`] is what gives a paragraph its height: the PDF backend wraps the parsed markup, draws
//! the resulting lines and reports `lines * leading` back to the layout engine.

use crate::canvas::FontStyle;
use crate::fonts;
use crate::richtext::Inline;

/// Font size and line spacing of body paragraphs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: f64,
    pub leading: f64,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            leading: 12.0,
        }
    }
}

/// A run of text in one font, positioned relative to the start of its line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSegment {
    pub text: String,
    pub font: FontStyle,
    pub x_offset: f64,
}

/// One wrapped line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrappedLine {
    pub segments: Vec<LineSegment>,
    pub width: f64,
}

impl WrappedLine {
    fn push_word(&mut self, word: &[(String, FontStyle)], style: &ParagraphStyle) {
        let mut first = true;
        for (text, font) in word {
            let leading_space = first && !self.segments.is_empty();
            let space = if leading_space {
                fonts::text_width(" ", *font, style.font_size)
            } else {
                0.0
            };

            match self.segments.last_mut() {
                Some(last) if last.font == *font => {
                    if leading_space {
                        last.text.push(' ');
                    }
                    last.text.push_str(text);
                }
                _ => self.segments.push(LineSegment {
                    text: text.clone(),
                    font: *font,
                    x_offset: self.width + space,
                }),
            }

            self.width += space + fonts::text_width(text, *font, style.font_size);
            first = false;
        }
    }
}

/// The result of wrapping a paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrappedParagraph {
    pub lines: Vec<WrappedLine>,
    pub leading: f64,
    /// Whether lines were dropped because they did not fit `max_height`.
    pub truncated: bool,
}

impl WrappedParagraph {
    /// Height occupied by the kept lines.
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.leading
    }
}

enum Token {
    Word(Vec<(String, FontStyle)>),
    Break,
}

fn tokenize(items: &[Inline]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<(String, FontStyle)> = Vec::new();

    for item in items {
        match item {
            Inline::Text(span) => {
                let font = span.font();
                for ch in span.text().chars() {
                    if ch.is_whitespace() {
                        if !word.is_empty() {
                            tokens.push(Token::Word(std::mem::take(&mut word)));
                        }
                        continue;
                    }
                    match word.last_mut() {
                        Some((text, last_font)) if *last_font == font => text.push(ch),
                        _ => word.push((ch.to_string(), font)),
                    }
                }
            }
            Inline::LineBreak => {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                tokens.push(Token::Break);
            }
        }
    }

    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

/// Wraps `items` into lines no wider than `max_width`.
///
/// Words are never split; a word wider than the box gets a line of its own.  Lines that would
/// extend below `max_height` are dropped.
pub fn wrap(
    items: &[Inline],
    max_width: f64,
    max_height: f64,
    style: &ParagraphStyle,
) -> WrappedParagraph {
    let mut lines = Vec::new();
    let mut line = WrappedLine::default();

    for token in tokenize(items) {
        match token {
            Token::Word(word) => {
                if !line.segments.is_empty() {
                    let (_, font) = &word[0];
                    let space = fonts::text_width(" ", *font, style.font_size);
                    let word_width: f64 = word
                        .iter()
                        .map(|(text, font)| fonts::text_width(text, *font, style.font_size))
                        .sum();
                    if line.width + space + word_width > max_width {
                        lines.push(std::mem::take(&mut line));
                    }
                }
                line.push_word(&word, style);
            }
            Token::Break => lines.push(std::mem::take(&mut line)),
        }
    }

    if !line.segments.is_empty() {
        lines.push(line);
    }

    let fitting = if style.leading > 0.0 {
        (max_height / style.leading).floor().max(0.0) as usize
    } else {
        lines.len()
    };
    let truncated = lines.len() > fitting;
    lines.truncate(fitting);

    WrappedParagraph {
        lines,
        leading: style.leading,
        truncated,
    }
}
