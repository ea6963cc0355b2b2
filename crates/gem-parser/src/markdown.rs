//! GemMD: a small Markdown dialect for rich text.
//!
//! Supported markup is limited to heading lines (`#` to `###`) and inline
//! emphasis (`*italic*`, `**bold**`, `***bold italic***`). Anything that
//! does not form valid markup is kept as literal text, so parsing never
//! fails.

use winnow::{
    Parser as _,
    ascii::space1,
    combinator::{alt, repeat, terminated},
    error::ModalResult,
    token::{rest, take_till, take_while},
};

use gem_core::text::TextSpan;

#[derive(Debug, Clone, Copy)]
enum Piece<'a> {
    /// A run of `*` with its length
    Stars(usize),
    Text(&'a str),
}

/// Collects spans, merging adjacent plain text.
#[derive(Debug, Default)]
struct SpanBuilder {
    spans: Vec<TextSpan>,
}

impl SpanBuilder {
    fn push_plain(&mut self, text: &str) {
        if let Some(TextSpan::Plain(last)) = self.spans.last_mut() {
            last.push_str(text);
        } else {
            self.spans.push(TextSpan::Plain(text.to_string()));
        }
    }

    fn push(&mut self, span: TextSpan) {
        match span {
            TextSpan::Plain(text) => self.push_plain(&text),
            span => self.spans.push(span),
        }
    }
}

/// `#`, `##` or `###`, whitespace, then non-empty text.
fn heading_line(input: &mut &str) -> ModalResult<TextSpan> {
    (terminated(take_while(1..=3, '#'), space1), rest)
        .verify_map(|(hashes, text): (&str, &str)| {
            let text = text.trim();
            let level = u8::try_from(hashes.len()).ok()?;
            (!text.is_empty()).then(|| TextSpan::Heading {
                level,
                text: text.to_string(),
            })
        })
        .parse_next(input)
}

fn line_pieces<'a>(input: &mut &'a str) -> ModalResult<Vec<Piece<'a>>> {
    repeat(
        0..,
        alt((
            take_while(1.., '*').map(|stars: &str| Piece::Stars(stars.len())),
            take_till(1.., '*').map(Piece::Text),
        )),
    )
    .parse_next(input)
}

fn emphasis(level: usize, content: &str) -> TextSpan {
    let content = content.to_string();
    match level {
        1 => TextSpan::Italic(content),
        2 => TextSpan::Bold(content),
        _ => TextSpan::BoldItalic(content),
    }
}

fn inline(line: &str, builder: &mut SpanBuilder) {
    let pieces = line_pieces.parse(line).unwrap_or_else(|_| vec![Piece::Text(line)]);

    let mut i = 0;
    while i < pieces.len() {
        match (pieces[i], pieces.get(i + 1), pieces.get(i + 2)) {
            (Piece::Stars(open @ 1..=3), Some(Piece::Text(content)), Some(Piece::Stars(close)))
                if *close == open =>
            {
                builder.push(emphasis(open, content));
                i += 3;
            }
            (Piece::Stars(count), _, _) => {
                builder.push_plain(&"*".repeat(count));
                i += 1;
            }
            (Piece::Text(text), _, _) => {
                builder.push_plain(text);
                i += 1;
            }
        }
    }
}

/// Parse GemMD source into typed spans.
///
/// Consecutive non-heading lines are joined with `"\n"` inside plain text.
pub fn parse_markdown(source: &str) -> Vec<TextSpan> {
    let mut builder = SpanBuilder::default();
    let mut after_text_line = false;

    for line in source.lines() {
        if let Ok(heading) = heading_line.parse(line) {
            builder.push(heading);
            after_text_line = false;
            continue;
        }

        if after_text_line {
            builder.push_plain("\n");
        }
        inline(line, &mut builder);
        after_text_line = true;
    }

    builder.spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> TextSpan {
        TextSpan::Plain(text.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_markdown("hello world"), vec![plain("hello world")]);
        assert!(parse_markdown("").is_empty());
    }

    #[test]
    fn test_headings() {
        let spans = parse_markdown("# One\n## Two  \n### Three");
        assert_eq!(
            spans,
            vec![
                TextSpan::Heading { level: 1, text: "One".into() },
                TextSpan::Heading { level: 2, text: "Two".into() },
                TextSpan::Heading { level: 3, text: "Three".into() },
            ]
        );
    }

    #[test]
    fn test_heading_edge_cases_are_plain() {
        assert_eq!(parse_markdown("#### Four"), vec![plain("#### Four")]);
        assert_eq!(parse_markdown("#tight"), vec![plain("#tight")]);
        assert_eq!(parse_markdown("#   "), vec![plain("#   ")]);
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(
            parse_markdown("a *b* **c** ***d*** e"),
            vec![
                plain("a "),
                TextSpan::Italic("b".into()),
                plain(" "),
                TextSpan::Bold("c".into()),
                plain(" "),
                TextSpan::BoldItalic("d".into()),
                plain(" e"),
            ]
        );
    }

    #[test]
    fn test_unmatched_markers_are_literal() {
        assert_eq!(parse_markdown("*unclosed"), vec![plain("*unclosed")]);
        assert_eq!(parse_markdown("**a*"), vec![plain("**a*")]);
        assert_eq!(parse_markdown("****x****"), vec![plain("****x****")]);
        assert_eq!(parse_markdown("**"), vec![plain("**")]);
    }

    #[test]
    fn test_non_greedy_emphasis() {
        assert_eq!(
            parse_markdown("*a* b*"),
            vec![TextSpan::Italic("a".into()), plain(" b*")]
        );
    }

    #[test]
    fn test_lines_joined_with_newline() {
        assert_eq!(
            parse_markdown("first\nsecond\n# Head\nthird"),
            vec![
                plain("first\nsecond"),
                TextSpan::Heading { level: 1, text: "Head".into() },
                plain("third"),
            ]
        );
    }

    #[test]
    fn test_emphasis_does_not_span_lines() {
        assert_eq!(parse_markdown("*a\nb*"), vec![plain("*a\nb*")]);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Property Test Functions
    // ===================

    fn check_never_panics(source: &str) {
        let _ = parse_markdown(source);
    }

    fn check_markup_free_text_is_preserved(text: &str) -> Result<(), TestCaseError> {
        let spans = parse_markdown(text);
        if text.is_empty() {
            prop_assert!(spans.is_empty());
        } else {
            prop_assert_eq!(spans, vec![TextSpan::Plain(text.to_string())]);
        }
        Ok(())
    }

    fn check_emphasis_round_trip(words: &[(usize, String)]) -> Result<(), TestCaseError> {
        let source: String = words
            .iter()
            .map(|(level, word)| {
                let stars = "*".repeat(*level);
                format!("{stars}{word}{stars} ")
            })
            .collect();

        let printed: String = parse_markdown(&source)
            .iter()
            .map(ToString::to_string)
            .collect();
        prop_assert_eq!(printed, source);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn never_panics(source in ".*") {
            check_never_panics(&source);
        }

        #[test]
        fn markup_free_text_is_preserved(text in "[a-zA-Z0-9 ,.!?]*") {
            check_markup_free_text_is_preserved(&text)?;
        }

        #[test]
        fn emphasis_round_trip(words in prop::collection::vec((0usize..=3, "[a-z]{1,6}"), 0..6)) {
            check_emphasis_round_trip(&words)?;
        }
    }
}
