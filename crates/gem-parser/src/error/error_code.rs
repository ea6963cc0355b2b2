//! Error codes for the Gem diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - GemXML and GemSheet parser errors
//! - `E2xx` - Include errors
//! - `E3xx` - Validation errors
//! - `E4xx` - Resolution errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// An attribute value was opened with a quote but never closed.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that is not valid in this context.
    E002,

    /// Unterminated comment.
    ///
    /// A `<!--` or `/*` comment was never closed.
    E003,

    // =========================================================================
    // GemXML Parser Errors (E10x)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token it did not expect at this position.
    E100,

    /// Unclosed tag.
    ///
    /// The input ended before the closing tag of an element.
    E101,

    /// Mismatched closing tag.
    ///
    /// A closing tag does not match the innermost open element.
    E102,

    /// Unknown tag.
    ///
    /// Only `window`, `text`, `div`, `line`, `rect`, `circle` and `include`
    /// are part of GemXML.
    E103,

    /// Duplicate attribute.
    ///
    /// The same attribute was written twice on one element.
    E104,

    /// Nesting too deep.
    ///
    /// Elements are nested deeper than the parser accepts.
    E105,

    // =========================================================================
    // GemSheet Parser Errors (E11x)
    // =========================================================================
    /// Invalid selector.
    E110,

    /// Invalid declaration.
    ///
    /// A declaration must be `property: value;`.
    E111,

    /// Unclosed rule block.
    E112,

    // =========================================================================
    // Include Errors (E2xx)
    // =========================================================================
    /// Unsupported include kind.
    ///
    /// The `as` attribute of an include is not `style` or `md`.
    E200,

    /// Missing include kind.
    ///
    /// An include has no `as` attribute.
    E201,

    /// Invalid include path.
    ///
    /// The include path is empty or is not plain text.
    E202,

    /// Loader failure.
    ///
    /// The injected loader could not provide the included file.
    E203,

    // =========================================================================
    // Validation Errors (E3xx)
    // =========================================================================
    /// Missing window.
    E300,

    /// Multiple windows.
    E301,

    /// Duplicate id.
    E302,

    /// Misplaced element.
    ///
    /// The window must be the only top-level element.
    E303,

    /// Invalid content.
    ///
    /// Shapes take no content and `text` takes no child elements.
    E304,

    // =========================================================================
    // Resolution Errors (E4xx)
    // =========================================================================
    /// Missing required attribute.
    E400,

    /// Invalid attribute value.
    E401,

    /// Unknown shade token.
    ///
    /// Paint properties take one of the shade tokens `0`, `1`, `2` or `3`.
    E402,
}

/// The compile phase an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Parse,
    Include,
    Validation,
    Resolution,
}

/// Kind of a compile error, independent of the exact error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    UnsupportedInclude,
    LoaderFailure,
    MissingWindow,
    MultipleWindows,
    DuplicateId,
    MisplacedElement,
    InvalidContent,
    MissingRequiredAttribute,
    InvalidAttributeValue,
    UnknownShadeToken,
}

impl ErrorKind {
    /// Returns the phase that reports this kind of error.
    pub fn phase(self) -> Phase {
        match self {
            ErrorKind::Syntax => Phase::Parse,
            ErrorKind::UnsupportedInclude | ErrorKind::LoaderFailure => Phase::Include,
            ErrorKind::MissingWindow
            | ErrorKind::MultipleWindows
            | ErrorKind::DuplicateId
            | ErrorKind::MisplacedElement
            | ErrorKind::InvalidContent => Phase::Validation,
            ErrorKind::MissingRequiredAttribute
            | ErrorKind::InvalidAttributeValue
            | ErrorKind::UnknownShadeToken => Phase::Resolution,
        }
    }
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E110 => "E110",
            ErrorCode::E111 => "E111",
            ErrorCode::E112 => "E112",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
            ErrorCode::E400 => "E400",
            ErrorCode::E401 => "E401",
            ErrorCode::E402 => "E402",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "unterminated comment",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unclosed tag",
            ErrorCode::E102 => "mismatched closing tag",
            ErrorCode::E103 => "unknown tag",
            ErrorCode::E104 => "duplicate attribute",
            ErrorCode::E105 => "nesting too deep",
            ErrorCode::E110 => "invalid selector",
            ErrorCode::E111 => "invalid declaration",
            ErrorCode::E112 => "unclosed rule block",
            ErrorCode::E200 => "unsupported include kind",
            ErrorCode::E201 => "missing include kind",
            ErrorCode::E202 => "invalid include path",
            ErrorCode::E203 => "loader failure",
            ErrorCode::E300 => "missing window",
            ErrorCode::E301 => "multiple windows",
            ErrorCode::E302 => "duplicate id",
            ErrorCode::E303 => "misplaced element",
            ErrorCode::E304 => "invalid content",
            ErrorCode::E400 => "missing required attribute",
            ErrorCode::E401 => "invalid attribute value",
            ErrorCode::E402 => "unknown shade token",
        }
    }

    /// Returns the error kind this code reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E001
            | ErrorCode::E002
            | ErrorCode::E003
            | ErrorCode::E100
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103
            | ErrorCode::E104
            | ErrorCode::E105
            | ErrorCode::E110
            | ErrorCode::E111
            | ErrorCode::E112 => ErrorKind::Syntax,
            ErrorCode::E200 | ErrorCode::E201 => ErrorKind::UnsupportedInclude,
            ErrorCode::E202 | ErrorCode::E203 => ErrorKind::LoaderFailure,
            ErrorCode::E300 => ErrorKind::MissingWindow,
            ErrorCode::E301 => ErrorKind::MultipleWindows,
            ErrorCode::E302 => ErrorKind::DuplicateId,
            ErrorCode::E303 => ErrorKind::MisplacedElement,
            ErrorCode::E304 => ErrorKind::InvalidContent,
            ErrorCode::E400 => ErrorKind::MissingRequiredAttribute,
            ErrorCode::E401 => ErrorKind::InvalidAttributeValue,
            ErrorCode::E402 => ErrorKind::UnknownShadeToken,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E110.to_string(), "E110");
        assert_eq!(ErrorCode::E203.to_string(), "E203");
        assert_eq!(ErrorCode::E402.to_string(), "E402");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated string literal");
        assert_eq!(ErrorCode::E302.description(), "duplicate id");
        assert_eq!(ErrorCode::E402.description(), "unknown shade token");
    }

    #[test]
    fn test_error_code_kind_and_phase() {
        assert_eq!(ErrorCode::E112.kind(), ErrorKind::Syntax);
        assert_eq!(ErrorCode::E105.kind(), ErrorKind::Syntax);
        assert_eq!(ErrorCode::E201.kind(), ErrorKind::UnsupportedInclude);
        assert_eq!(ErrorCode::E203.kind().phase(), Phase::Include);
        assert_eq!(ErrorCode::E301.kind(), ErrorKind::MultipleWindows);
        assert_eq!(ErrorCode::E400.kind().phase(), Phase::Resolution);
        assert_eq!(ErrorCode::E003.kind().phase(), Phase::Parse);
    }
}
