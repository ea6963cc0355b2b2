//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the compiled source.
///
/// A diagnostic has one primary label marking where the problem is, and may
/// carry secondary labels for related locations such as the first use of a
/// duplicated id:
///
/// ```text
/// error[E302]: duplicate id `header`
///    |
///  3 |     <rect id="header"/>
///    |               ------ first used here
///  4 |     <circle id="header"/>
///    |                 ^^^^^^ duplicate id
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_and_secondary_labels() {
        let primary = Label::primary(Span::new(10..20), "duplicate id");
        let secondary = Label::secondary(Span::new(2..8), "first used here");

        assert!(primary.is_primary());
        assert_eq!(primary.span(), Span::new(10..20));
        assert_eq!(primary.message(), "duplicate id");
        assert!(secondary.is_secondary());
        assert_eq!(secondary.span().start(), 2);
    }
}
