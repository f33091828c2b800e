/// Configuration options for the push parser.
///
/// # Examples
///
/// ```rust
/// use jsonpush::{JsonParser, ParserOptions, StringValueMode};
///
/// let options = ParserOptions {
///     allow_bare_values: true,
///     string_value_mode: StringValueMode::Buffered,
/// };
/// let mut parser = JsonParser::with_options((), options);
/// parser.push("42").unwrap();
/// parser.end().unwrap();
/// assert!(parser.is_complete());
/// ```
///
/// # Default
///
/// Strict RFC 8259 documents (object or array at the top level), with
/// nested strings streamed in pieces.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether a scalar (string, number, literal) is accepted as the whole
    /// document.
    ///
    /// By default the document must start with `{` or `[`. A top-level number
    /// or literal has no terminating character, so it is only reported once
    /// end of input is signalled.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_bare_values: bool,

    /// How strings inside objects and arrays are handed to the sink.
    ///
    /// # Default
    ///
    /// [`StringValueMode::Streamed`]
    pub string_value_mode: StringValueMode,
}

/// Controls how a nested string that spans chunks is reported.
///
/// A top-level string document is always reported whole through
/// [`JsonSink::found_string`](crate::JsonSink::found_string).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringValueMode {
    /// Report what has been scanned of an unterminated string whenever a chunk
    /// ends: `begin_string` with the first non-empty piece, `continue_string`
    /// with later pieces, and `end_string` with the final (possibly empty)
    /// piece. A string that closes in the chunk it started in produces a
    /// single `end_string`.
    #[default]
    Streamed,
    /// Accumulate the string until its closing quote and report it with a
    /// single `end_string`, however it was chunked. Memory grows with the
    /// longest string.
    Buffered,
}
