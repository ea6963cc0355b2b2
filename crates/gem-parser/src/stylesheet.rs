//! GemSheet stylesheets.
//!
//! A stylesheet is an ordered list of [`StyleRule`]s. Each rule has a single
//! [`Selector`]; a selector group such as `rect, .big { ... }` is expanded
//! into one rule per selector while parsing, so the rest of the compiler
//! never sees groups.
//!
//! The grammar is permissive: any property name and any value are accepted
//! here and only interpreted during attribute resolution. A value runs up
//! to the closing `;` and may hold any character except braces; comments
//! inside it are dropped and whitespace runs collapse to one space.

mod parser;

use std::{fmt, sync::Arc};

use gem_core::identifier::Id;

use crate::{
    document::ElementNode,
    span::{Span, line_col},
};

pub use parser::parse_stylesheet;

/// Selector strength. Later variants win over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Specificity {
    Element,
    Class,
    Id,
}

impl Specificity {
    /// All specificities from weakest to strongest.
    pub const ASCENDING: [Specificity; 3] =
        [Specificity::Element, Specificity::Class, Specificity::Id];
}

/// A GemSheet selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `name`
    Element(Id),
    /// `.name`
    Class(Id),
    /// `#name`
    Id(Id),
}

impl Selector {
    pub fn specificity(&self) -> Specificity {
        match self {
            Selector::Element(_) => Specificity::Element,
            Selector::Class(_) => Specificity::Class,
            Selector::Id(_) => Specificity::Id,
        }
    }

    /// Returns true if this selector applies to `node`.
    pub fn matches(&self, node: &ElementNode) -> bool {
        match self {
            Selector::Element(name) => *name == node.tag().as_str(),
            Selector::Class(class) => node.has_class(*class),
            Selector::Id(id) => node.id.as_ref().is_some_and(|node_id| node_id.value() == *id),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Element(name) => write!(f, "{name}"),
            Selector::Class(name) => write!(f, ".{name}"),
            Selector::Id(name) => write!(f, "#{name}"),
        }
    }
}

/// `property: value;`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    /// Value words joined by single spaces
    pub value: String,
    /// Location in the stylesheet source
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: Selector,
    pub declarations: Vec<Declaration>,
    /// The included file the rule came from
    pub origin: Option<Arc<Origin>>,
}

impl StyleRule {
    /// Returns the last declaration of `property` in this rule.
    pub fn declaration(&self, property: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .rev()
            .find(|declaration| declaration.property == property)
    }
}

/// An included stylesheet file, kept so declaration spans can be reported
/// as `path:line:col`.
#[derive(Debug, PartialEq, Eq)]
pub struct Origin {
    path: String,
    source: String,
}

impl Origin {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Formats the start of `span` as `path:line:col`.
    pub fn locate(&self, span: Span) -> String {
        let (line, col) = line_col(&self.source, span.start());
        format!("{}:{line}:{col}", self.path)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// An ordered sequence of style rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    rules: Vec<StyleRule>,
}

impl Stylesheet {
    pub fn new(rules: Vec<StyleRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Appends all rules of `other`, keeping their order.
    pub fn extend(&mut self, other: Stylesheet) {
        self.rules.extend(other.rules);
    }

    /// Marks every rule as coming from `origin`.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        let origin = Arc::new(origin);
        for rule in &mut self.rules {
            rule.origin = Some(Arc::clone(&origin));
        }
        self
    }
}

impl fmt::Display for Stylesheet {
    /// Writes canonical GemSheet, one block per rule.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{} {{", rule.selector)?;
            for declaration in &rule.declarations {
                writeln!(f, "    {}: {};", declaration.property, declaration.value)?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        document::Tag,
        span::{Span, Spanned},
    };

    fn node(tag: Tag, classes: &[&str], id: Option<&str>) -> ElementNode {
        let span = Span::default();
        let mut node = ElementNode::new(Spanned::new(tag, span), span);
        node.classes = classes.iter().map(|c| Id::new(c)).collect();
        node.id = id.map(|id| Spanned::new(Id::new(id), span));
        node
    }

    #[test]
    fn test_specificity_order() {
        assert!(Specificity::Id > Specificity::Class);
        assert!(Specificity::Class > Specificity::Element);
        assert_eq!(Selector::Class(Id::new("a")).specificity(), Specificity::Class);
    }

    #[test]
    fn test_selector_matches() {
        let rect = node(Tag::Rect, &["big", "red"], Some("box"));

        assert!(Selector::Element(Id::new("rect")).matches(&rect));
        assert!(!Selector::Element(Id::new("circle")).matches(&rect));
        assert!(Selector::Class(Id::new("red")).matches(&rect));
        assert!(!Selector::Class(Id::new("small")).matches(&rect));
        assert!(Selector::Id(Id::new("box")).matches(&rect));
        assert!(!Selector::Id(Id::new("box")).matches(&node(Tag::Rect, &[], None)));
    }

    #[test]
    fn test_last_declaration_wins() {
        let sheet = parse_stylesheet("rect { width: 1; width: 2; }").unwrap();
        assert_eq!(sheet.rules()[0].declaration("width").unwrap().value, "2");
        assert!(sheet.rules()[0].declaration("height").is_none());
    }

    #[test]
    fn test_display_canonical() {
        let sheet = parse_stylesheet("rect,.big{width:10;color:  1 ;}#a{x: 3 4;}").unwrap();
        assert_eq!(
            sheet.to_string(),
            "rect {\n    width: 10;\n    color: 1;\n}\n\n.big {\n    width: 10;\n    color: 1;\n}\n\n#a {\n    x: 3 4;\n}\n"
        );
    }

    #[test]
    fn test_extend_and_origin() {
        let extra = ".a {\n  x: 1;\n}";
        let mut sheet = parse_stylesheet("rect { width: 1; }").unwrap();
        sheet.extend(
            parse_stylesheet(extra)
                .unwrap()
                .with_origin(Origin::new("extra.gms", extra)),
        );

        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.rules()[0].origin, None);

        let origin = sheet.rules()[1].origin.as_deref().expect("included rule has an origin");
        assert_eq!(origin.path(), "extra.gms");
        let declaration = sheet.rules()[1].declaration("x").unwrap();
        assert_eq!(origin.locate(declaration.span), "extra.gms:2:3");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,8}"
    }

    fn selector_strategy() -> impl Strategy<Value = String> {
        (prop_oneof![Just(""), Just("."), Just("#")], name_strategy())
            .prop_map(|(prefix, name)| format!("{prefix}{name}"))
    }

    fn value_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec("[0-9a-z#.%+,:!'-]{1,6}", 1..3).prop_map(|words| words.join(" "))
    }

    fn rule_strategy() -> impl Strategy<Value = (String, Vec<(String, String)>)> {
        (
            selector_strategy(),
            prop::collection::vec((name_strategy(), value_strategy()), 0..4),
        )
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_display_round_trip(
        rules: &[(String, Vec<(String, String)>)],
    ) -> Result<(), TestCaseError> {
        let source: String = rules
            .iter()
            .map(|(selector, declarations)| {
                let body: String = declarations
                    .iter()
                    .map(|(property, value)| format!("{property}:{value};"))
                    .collect();
                format!("{selector}{{{body}}}\n")
            })
            .collect();

        let first = parse_stylesheet(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(first.len(), rules.len());

        let printed = first.to_string();
        let second =
            parse_stylesheet(&printed).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(second.len(), first.len());
        for (a, b) in first.rules().iter().zip(second.rules()) {
            prop_assert_eq!(a.selector, b.selector);
            let a_pairs: Vec<_> = a.declarations.iter().map(|d| (&d.property, &d.value)).collect();
            let b_pairs: Vec<_> = b.declarations.iter().map(|d| (&d.property, &d.value)).collect();
            prop_assert_eq!(a_pairs, b_pairs);
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn display_round_trip(rules in prop::collection::vec(rule_strategy(), 0..6)) {
            check_display_round_trip(&rules)?;
        }
    }
}
