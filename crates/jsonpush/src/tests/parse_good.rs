use alloc::{string::ToString, vec};

use rstest::rstest;

use super::utils::{parse_value, split_by};
use crate::{JsonParser, Map, ParserOptions, Value, ValueBuilder};

fn bare() -> ParserOptions {
    ParserOptions { allow_bare_values: true, ..ParserOptions::default() }
}

fn finish_seq(chunks: &[&str]) -> Value {
    let mut parser = JsonParser::with_options(ValueBuilder::new(), bare());
    for &chunk in chunks {
        parser.push(chunk).unwrap();
    }
    parser.end().unwrap();
    parser.into_sink().into_value().expect("expected one root value")
}

fn num(text: &str) -> Value {
    Value::Number(text.into())
}

#[test]
fn test_empty_object() {
    assert_eq!(finish_seq(&["{}"]), Value::Object(Map::new()));
}

#[test]
fn test_single_property() {
    let map = Map::from([("a".to_string(), num("1"))]);
    assert_eq!(finish_seq(&["{\"a\":1}"]), Value::Object(map));
}

#[test]
fn test_nested_objects() {
    let inner = Map::from([("b".to_string(), num("2"))]);
    let outer = Map::from([("a".to_string(), Value::Object(inner))]);
    assert_eq!(finish_seq(&["{\"a\":{\"b\":2}}"]), Value::Object(outer));
}

#[test]
fn test_arrays() {
    assert_eq!(finish_seq(&["[]"]), Value::Array(vec![]));
    assert_eq!(finish_seq(&["[1]"]), Value::Array(vec![num("1")]));
    assert_eq!(
        finish_seq(&["[1,[2,3]]"]),
        Value::Array(vec![num("1"), Value::Array(vec![num("2"), num("3")])])
    );
}

#[test]
fn test_literals() {
    assert_eq!(finish_seq(&["null"]), Value::Null);
    assert_eq!(finish_seq(&["true"]), Value::Boolean(true));
    assert_eq!(finish_seq(&["false"]), Value::Boolean(false));
}

#[test]
fn test_numbers_keep_their_text() {
    assert_eq!(
        finish_seq(&["[-1,-0.1,-0,1.0,1e0,1e-1,1E+1,1.1e0]"]),
        Value::Array(vec![
            num("-1"),
            num("-0.1"),
            num("-0"),
            num("1.0"),
            num("1e0"),
            num("1e-1"),
            num("1E+1"),
            num("1.1e0"),
        ])
    );
}

#[test]
fn test_preserves_proto_property() {
    let map = Map::from([("__proto__".to_string(), num("1"))]);
    assert_eq!(finish_seq(&["{\"__proto__\":1}"]), Value::Object(map));
}

#[test]
fn test_partial_string_multiple_feeds() {
    assert_eq!(finish_seq(&["\"abc", "def", "ghi\""]), Value::String("abcdefghi".into()));
}

#[test]
fn test_continue_within_array_value() {
    assert_eq!(
        finish_seq(&["[\"1\"", ",\"2", "3\"", ",4]"]),
        Value::Array(vec![Value::String("1".into()), Value::String("23".into()), num("4")])
    );
}

#[test]
fn test_integer_split_across_feeds() {
    assert_eq!(finish_seq(&["-", "12 "]), num("-12"));
    assert_eq!(finish_seq(&["[-", "1", "2]"]), Value::Array(vec![num("-12")]));
}

#[test]
fn test_strings_and_escapes() {
    assert_eq!(
        finish_seq(&["[\"\\\"\",\"'\"]"]),
        Value::Array(vec![Value::String("\"".into()), Value::String("'".into())])
    );
    assert_eq!(
        finish_seq(&["\"\\b\\f\\n\\r\\t\\u01FF\\\\\\\"\""]),
        Value::String("\x08\x0C\n\r\t\u{01FF}\\\"".into())
    );
}

#[test]
fn test_whitespace_inside() {
    assert_eq!(finish_seq(&["{\t\n  \r}\n"]), Value::Object(Map::new()));
}

#[test]
fn test_incremental_complete_after_three_feeds() {
    let v = finish_seq(&["{\"a\": 1 ", ", \"b\": [2", ",3]} "]);
    assert_eq!(v.get("a"), Some(&num("1")));
    assert_eq!(v.get("b"), Some(&Value::Array(vec![num("2"), num("3")])));
}

/// Converts to `serde_json` so documents can be checked against it.
fn to_serde(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(text) => serde_json::from_str(text).unwrap(),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_serde).collect()),
        Value::Object(map) => {
            serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), to_serde(v))).collect())
        }
    }
}

#[rstest]
#[case::empty_array("[]")]
#[case::empty_object_with_whitespace(" { \n } ")]
#[case::deep_nesting("[[[[[[[[[[{}]]]]]]]]]]")]
#[case::mixed(r#"{"a": [1, 2.5, -3e2, true, false, null], "b": {"c": "d"}}"#)]
#[case::duplicate_keys(r#"{"k": 1, "k": [2]}"#)]
#[case::unicode(r#"["héllo", "é中", "😀", "\uD83D\uDE00"]"#)]
#[case::escaped_solidus(r#"["\/", "a\\b"]"#)]
#[case::big_numbers("[123456789012345678901234567890, 1.5e308, -0.0]")]
#[case::empty_strings(r#"{"": ""}"#)]
#[case::bare_string(r#""just a string""#)]
#[case::bare_number("-12.5E-3")]
#[case::bare_literal("null")]
fn agrees_with_serde_json(#[case] src: &str) {
    let expected: serde_json::Value = serde_json::from_str(src).unwrap();
    let whole = parse_value(src, bare()).unwrap().unwrap();
    assert_eq!(to_serde(&whole), expected);

    for splits in [vec![1], vec![2, 3], vec![5, 1, 7]] {
        let chunks = split_by(src, &splits);
        let mut parser = JsonParser::with_options(ValueBuilder::new(), bare());
        for chunk in &chunks {
            parser.push(chunk).unwrap();
        }
        parser.end().unwrap();
        assert_eq!(parser.sink().value(), Some(&whole), "chunks {chunks:?}");
    }
}
