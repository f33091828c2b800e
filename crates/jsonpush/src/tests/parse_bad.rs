use alloc::string::ToString;

use rstest::rstest;

use crate::{JsonParser, MalformedJson, ParseError, ParserOptions, SyntaxError};

/// Pushes `src` one character at a time and signals end of input, returning
/// the first grammar violation.
fn first_error(src: &str) -> MalformedJson {
    let mut parser = JsonParser::new(());
    let mut result = Ok(());
    for i in 0..src.chars().count() {
        if let Err(err) = parser.push_range(src, i, Some(1)).map(|_| ()) {
            result = Err(err);
            break;
        }
    }
    let err = match result {
        Ok(()) => parser.end().map(|_| ()).unwrap_err(),
        Err(err) => err,
    };
    match err {
        ParseError::Malformed(malformed) => malformed,
        ParseError::Sink(never) => match never {},
    }
}

fn assert_err_contains(err: &MalformedJson, expected_sub: &str, line: usize, col: usize) {
    let s = err.to_string();
    assert!(s.contains(expected_sub), "expected substring {expected_sub:?} in {s:?}");
    assert_eq!((err.line, err.column), (line, col), "{s}");
}

#[rstest]
#[case::open_object("{", SyntaxError::UnexpectedEndOfInput("'\"' or '}'"), 1, 2)]
#[case::empty_document("", SyntaxError::UnexpectedEndOfInput("a JSON document"), 1, 1)]
#[case::trailing_comma_array("[1,]", SyntaxError::TrailingComma(']'), 1, 4)]
#[case::trailing_comma_object(r#"{"a":1,}"#, SyntaxError::TrailingComma('}'), 1, 8)]
#[case::missing_colon(
    r#"{"a" 1}"#,
    SyntaxError::UnexpectedCharacter { found: '1', expected: "':' after the member name" },
    1,
    6
)]
#[case::missing_comma(
    "[1 2]",
    SyntaxError::UnexpectedCharacter { found: '2', expected: "',' or ']' after an array element" },
    1,
    4
)]
#[case::unquoted_key(
    "{a:1}",
    SyntaxError::UnexpectedCharacter {
        found: 'a',
        expected: "'\"' to start an object member or '}' to end the object",
    },
    1,
    2
)]
#[case::misspelled_literal("[trux]", SyntaxError::LiteralMismatch { literal: "true", expected: 'e', found: 'x' }, 1, 5)]
#[case::truncated_literal("[tru", SyntaxError::UnexpectedEndOfInput("the rest of `true`"), 1, 5)]
#[case::control_character("[\"a\u{1}\"]", SyntaxError::ControlCharacter('\u{1}'), 1, 4)]
#[case::raw_newline_in_string("[\"a\nb\"]", SyntaxError::ControlCharacter('\n'), 1, 4)]
#[case::invalid_escape(r#"["\x"]"#, SyntaxError::InvalidEscape('x'), 1, 4)]
#[case::invalid_unicode_escape(r#"["\u12G4"]"#, SyntaxError::InvalidUnicodeEscapeChar('G'), 1, 7)]
#[case::lone_low_surrogate(r#"["\uDC00"]"#, SyntaxError::UnpairedSurrogate(0xDC00), 1, 8)]
#[case::unpaired_high_surrogate(r#"["\uD800x"]"#, SyntaxError::UnpairedSurrogate(0xD800), 1, 9)]
#[case::high_surrogate_then_bmp_escape(r#"["\uD800\u0041"]"#, SyntaxError::UnpairedSurrogate(0xD800), 1, 14)]
#[case::leading_zero("[01]", SyntaxError::LeadingZero, 1, 3)]
#[case::negative_leading_zero("[-01]", SyntaxError::LeadingZero, 1, 4)]
#[case::bare_minus("[-]", SyntaxError::UnexpectedCharacter { found: ']', expected: "a digit after '-'" }, 1, 3)]
#[case::empty_fraction("[1.]", SyntaxError::UnexpectedCharacter { found: ']', expected: "a digit after the decimal point" }, 1, 4)]
#[case::empty_exponent("[1e]", SyntaxError::UnexpectedCharacter { found: ']', expected: "a sign or digit in the exponent" }, 1, 4)]
#[case::signed_empty_exponent("[1e+]", SyntaxError::UnexpectedCharacter { found: ']', expected: "a digit in the exponent" }, 1, 5)]
#[case::trailing_characters("[1] x", SyntaxError::TrailingCharacters('x'), 1, 5)]
#[case::second_document("{}{}", SyntaxError::TrailingCharacters('{'), 1, 3)]
#[case::bare_scalar(
    r#""a""#,
    SyntaxError::UnexpectedCharacter { found: '"', expected: "'[' or '{' to start the document" },
    1,
    1
)]
#[case::unterminated_member(r#"{"a":1"#, SyntaxError::UnexpectedEndOfInput("',' or '}'"), 1, 7)]
#[case::unterminated_string("[\"abc", SyntaxError::UnexpectedEndOfInput("the closing '\"' of a string"), 1, 6)]
#[case::multiline("[\n  1,\n  ]", SyntaxError::TrailingComma(']'), 3, 3)]
fn rejects_malformed_documents(
    #[case] src: &str,
    #[case] reason: SyntaxError,
    #[case] line: usize,
    #[case] column: usize,
) {
    let err = first_error(src);
    assert_eq!(err.reason, reason);
    assert_err_contains(&err, &reason.to_string(), line, column);

    // Whole-chunk parsing fails the same way.
    let mut parser = JsonParser::with_options((), ParserOptions::default());
    let whole = match parser.push(src) {
        Err(err) => err,
        Ok(_) => parser.end().unwrap_err(),
    };
    assert_eq!(whole, ParseError::Malformed(err));
}

#[test]
fn error_messages() {
    assert_err_contains(&first_error("[1,]"), "trailing comma before ']' at 1:4", 1, 4);
    assert_err_contains(
        &first_error("[nul"),
        "unexpected end of input, expected the rest of `null`",
        1,
        5,
    );
    assert_err_contains(
        &first_error(r#"["\uDC00"]"#),
        "unpaired surrogate \\uDC00 in unicode escape",
        1,
        8,
    );
}
