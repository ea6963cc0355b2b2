//! Token definitions for the GemXML lexer.

use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// A lexical token of GemXML.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    /// `<`
    LeftAngle,
    /// `</`
    LeftAngleSlash,
    /// `>`
    RightAngle,
    /// `/>`
    SelfClose,
    /// `=`
    Equals,
    /// Tag or attribute name
    Identifier(&'src str),
    /// Quoted attribute value with entities decoded
    StringLiteral(String),
    /// Raw character data between tags
    Text(&'src str),
    /// Body of a `<!-- ... -->` comment
    Comment(&'src str),
    /// Whitespace inside a tag
    Whitespace,
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftAngle => write!(f, "`<`"),
            Token::LeftAngleSlash => write!(f, "`</`"),
            Token::RightAngle => write!(f, "`>`"),
            Token::SelfClose => write!(f, "`/>`"),
            Token::Equals => write!(f, "`=`"),
            Token::Identifier(name) => write!(f, "`{name}`"),
            Token::StringLiteral(value) => write!(f, "{value:?}"),
            Token::Text(_) => write!(f, "text"),
            Token::Comment(_) => write!(f, "comment"),
            Token::Whitespace => write!(f, "whitespace"),
        }
    }
}
