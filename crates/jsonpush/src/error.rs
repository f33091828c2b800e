use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::position::Position;

/// Error returned by the push and drive operations of
/// [`JsonParser`](crate::JsonParser).
///
/// Grammar violations are reported as [`ParseError::Malformed`]. Failures
/// produced by the sink, either synchronously through
/// [`Flow::Break`](crate::Flow::Break) or by a suspended future resolving to
/// an error, are surfaced unchanged as [`ParseError::Sink`].
#[derive(Error, Debug, PartialEq)]
pub enum ParseError<E> {
    #[error(transparent)]
    /// The input is not a well-formed JSON document.
    Malformed(#[from] MalformedJson),
    #[error("sink error: {0}")]
    /// The sink rejected an event.
    Sink(E),
}

impl<E> ParseError<E> {
    /// Returns the diagnostic when this is a grammar violation.
    #[must_use]
    pub fn as_malformed(&self) -> Option<&MalformedJson> {
        match self {
            ParseError::Malformed(err) => Some(err),
            ParseError::Sink(_) => None,
        }
    }

    /// Returns the sink's error when the sink caused the failure.
    #[must_use]
    pub fn as_sink(&self) -> Option<&E> {
        match self {
            ParseError::Malformed(_) => None,
            ParseError::Sink(err) => Some(err),
        }
    }
}

/// A malformed document, located at the offending character.
///
/// `line` and `column` are 1-based and count `char`s. For errors raised at
/// end of input they point just past the last character consumed.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct MalformedJson {
    /// Label of the stream being parsed, if one was set on the parser.
    pub source_label: Option<String>,
    /// 1-based line of the offending character.
    pub line: usize,
    /// 1-based column of the offending character.
    pub column: usize,
    /// What went wrong.
    pub reason: SyntaxError,
}

impl MalformedJson {
    pub(crate) fn new(source_label: Option<&str>, at: Position, reason: SyntaxError) -> Self {
        Self {
            source_label: source_label.map(String::from),
            line: at.line,
            column: at.column,
            reason,
        }
    }

    /// The position of the offending character.
    #[must_use]
    pub fn position(&self) -> Position {
        Position { line: self.line, column: self.column }
    }
}

impl fmt::Display for MalformedJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at ", self.reason)?;
        if let Some(label) = &self.source_label {
            write!(f, "{label}:")?;
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The grammar rule a malformed document broke.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unexpected character {found:?}, expected {expected}")]
    /// A character that no transition of the current state accepts.
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// What the current state would have accepted.
        expected: &'static str,
    },
    #[error("unexpected character {found:?} in literal `{literal}`, expected {expected:?}")]
    /// A `true`, `false` or `null` literal that is misspelled.
    LiteralMismatch {
        /// The literal being matched.
        literal: &'static str,
        /// The next character of the literal.
        expected: char,
        /// The character found instead.
        found: char,
    },
    #[error("unescaped control character {0:?} in string")]
    /// A raw control character (below U+0020) inside a string.
    ControlCharacter(char),
    #[error("invalid escape sequence '\\{0}'")]
    /// A backslash followed by a character outside `" \ / b f n r t u`.
    InvalidEscape(char),
    #[error("invalid unicode escape sequence at character {0:?}")]
    /// A non-hexadecimal digit inside a `\uXXXX` escape.
    InvalidUnicodeEscapeChar(char),
    #[error("unpaired surrogate \\u{0:04X} in unicode escape")]
    /// A surrogate code unit that does not form a valid pair.
    UnpairedSurrogate(u16),
    #[error("leading zeros are not allowed in numbers")]
    /// A digit following a leading `0`.
    LeadingZero,
    #[error("trailing comma before {0:?}")]
    /// A comma directly followed by a closing bracket.
    TrailingComma(char),
    #[error("unexpected character {0:?} after the end of the document")]
    /// Non-whitespace after the top-level value.
    TrailingCharacters(char),
    #[error("unexpected end of input, expected {0}")]
    /// Input ended before the document was complete.
    UnexpectedEndOfInput(&'static str),
    #[error("input pushed after the end of input")]
    /// Input pushed after end of input was signalled.
    InputAfterEnd,
    #[error("parser failed earlier and must be reset before reuse")]
    /// The parser already failed on this document.
    Poisoned,
}
