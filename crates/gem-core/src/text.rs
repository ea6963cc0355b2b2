//! Typed rich-text spans produced from GemMD.

use std::fmt;

/// One run of styled text.
///
/// Headings always occupy a whole line; the emphasis variants are inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSpan {
    Plain(String),
    Italic(String),
    Bold(String),
    BoldItalic(String),
    /// A heading line, `level` is 1 to 3.
    Heading { level: u8, text: String },
}

impl TextSpan {
    /// Returns the text carried by this span, without markup.
    pub fn text(&self) -> &str {
        match self {
            TextSpan::Plain(text)
            | TextSpan::Italic(text)
            | TextSpan::Bold(text)
            | TextSpan::BoldItalic(text)
            | TextSpan::Heading { text, .. } => text,
        }
    }
}

impl fmt::Display for TextSpan {
    /// Writes the span back as GemMD.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSpan::Plain(text) => write!(f, "{text}"),
            TextSpan::Italic(text) => write!(f, "*{text}*"),
            TextSpan::Bold(text) => write!(f, "**{text}**"),
            TextSpan::BoldItalic(text) => write!(f, "***{text}***"),
            TextSpan::Heading { level, text } => {
                write!(f, "{} {text}", "#".repeat(usize::from(*level)))
            }
        }
    }
}
