//! A sink that assembles the document into a [`Value`] tree.

use alloc::{borrow::Cow, string::String, vec::Vec};
use core::{convert::Infallible, mem};

use crate::{
    sink::{Flow, JsonSink},
    value::{Array, Map, Value},
};

#[derive(Debug)]
enum Frame {
    Array(Array),
    /// An object and the member name waiting for its value.
    Object(Map, Option<String>),
}

/// Builds a [`Value`] from parser events.
///
/// Streamed string pieces are joined; numbers keep their literal text; when
/// an object repeats a member name, the last value wins.
///
/// # Examples
///
/// ```
/// use jsonpush::{JsonParser, Value, ValueBuilder};
///
/// let mut parser = JsonParser::new(ValueBuilder::new());
/// parser.push(r#"{"a": [1, "xyz"], "a": false}"#).unwrap();
/// parser.end().unwrap();
/// let value = parser.into_sink().into_value().unwrap();
/// assert_eq!(value.get("a"), Some(&Value::Boolean(false)));
/// ```
#[derive(Debug, Default)]
pub struct ValueBuilder {
    frames: Vec<Frame>,
    partial: String,
    root: Option<Value>,
}

impl ValueBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished document, once its last event has arrived.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.root.as_ref()
    }

    /// Consumes the builder, returning the finished document.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        self.root
    }

    /// Takes the finished document, leaving the builder ready for another.
    pub fn take_value(&mut self) -> Option<Value> {
        self.frames.clear();
        self.partial.clear();
        self.root.take()
    }

    fn open(&mut self, frame: Frame) -> Flow<Infallible> {
        self.frames.push(frame);
        Flow::Continue
    }

    fn close(&mut self) -> Flow<Infallible> {
        match self.frames.pop() {
            Some(Frame::Array(array)) => self.place(Value::Array(array)),
            Some(Frame::Object(map, _)) => self.place(Value::Object(map)),
            None => Flow::Continue,
        }
    }

    /// Stores a finished value in the innermost open container, or as the
    /// root when none is open.
    fn place(&mut self, value: Value) -> Flow<Infallible> {
        match self.frames.last_mut() {
            Some(Frame::Array(array)) => array.push(value),
            Some(Frame::Object(map, key)) => {
                if let Some(key) = key.take() {
                    map.insert(key, value);
                }
            }
            None => self.root = Some(value),
        }
        Flow::Continue
    }
}

impl JsonSink for ValueBuilder {
    type Error = Infallible;

    fn begin_object(&mut self) -> Flow<Self::Error> {
        self.open(Frame::Object(Map::new(), None))
    }

    fn end_object(&mut self) -> Flow<Self::Error> {
        self.close()
    }

    fn begin_array(&mut self) -> Flow<Self::Error> {
        self.open(Frame::Array(Array::new()))
    }

    fn end_array(&mut self) -> Flow<Self::Error> {
        self.close()
    }

    fn found_boolean(&mut self, value: bool) -> Flow<Self::Error> {
        self.place(Value::Boolean(value))
    }

    fn found_null(&mut self) -> Flow<Self::Error> {
        self.place(Value::Null)
    }

    fn found_string(&mut self, value: Cow<'_, str>) -> Flow<Self::Error> {
        self.place(Value::String(value.into_owned()))
    }

    fn begin_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        self.partial.clear();
        self.partial.push_str(&piece);
        Flow::Continue
    }

    fn continue_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        self.partial.push_str(&piece);
        Flow::Continue
    }

    fn end_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        let text = if self.partial.is_empty() {
            piece.into_owned()
        } else {
            let mut text = mem::take(&mut self.partial);
            text.push_str(&piece);
            text
        };

        // A string directly inside an object with no name pending is a name.
        if let Some(Frame::Object(_, key @ None)) = self.frames.last_mut() {
            *key = Some(text);
            return Flow::Continue;
        }
        self.place(Value::String(text))
    }

    fn found_integer(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        self.place(Value::Number(text.into_owned()))
    }

    fn found_fraction(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        self.place(Value::Number(text.into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::ValueBuilder;
    use crate::{JsonParser, Map, ParserOptions, StringValueMode, Value};

    fn build(chunks: &[&str], options: ParserOptions) -> Value {
        let mut parser = JsonParser::with_options(ValueBuilder::new(), options);
        for chunk in chunks {
            parser.push(chunk).unwrap();
        }
        parser.end().unwrap();
        parser.into_sink().into_value().unwrap()
    }

    #[test]
    fn nested_document() {
        let value = build(&[r#"{"a": {"b": [true, null, -1.5e2]}, "c": "d"}"#], ParserOptions::default());
        let expected = Value::Object(Map::from([
            (
                "a".to_string(),
                Value::Object(Map::from([(
                    "b".to_string(),
                    Value::Array(vec![Value::Boolean(true), Value::Null, Value::Number("-1.5e2".into())]),
                )])),
            ),
            ("c".to_string(), Value::String("d".into())),
        ]));
        assert_eq!(value, expected);
    }

    #[test]
    fn streamed_pieces_are_joined() {
        let value = build(&[r#"{"ke"#, r#"y": "va"#, "l", r#"ue"}"#], ParserOptions::default());
        assert_eq!(value.get("key").and_then(Value::as_str), Some("value"));
    }

    #[test]
    fn buffered_mode_builds_the_same_tree() {
        let options = ParserOptions { string_value_mode: StringValueMode::Buffered, ..ParserOptions::default() };
        let value = build(&[r#"["a"#, r#"b", "c"]"#], options);
        assert_eq!(value.to_string(), r#"["ab","c"]"#);
    }

    #[test]
    fn last_duplicate_key_wins() {
        let value = build(&[r#"{"k": 1, "k": 2}"#], ParserOptions::default());
        assert_eq!(value.get("k").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn bare_scalar_root() {
        let options = ParserOptions { allow_bare_values: true, ..ParserOptions::default() };
        assert_eq!(build(&["\"hi\""], options), Value::String("hi".into()));
        assert_eq!(build(&["1", "7"], options), Value::Number("17".into()));
        assert_eq!(build(&[" nu", "ll "], options), Value::Null);
    }

    #[test]
    fn take_value_readies_the_builder_for_another_document() {
        let mut parser = JsonParser::new(ValueBuilder::new());
        parser.push("[1, [2").unwrap();
        parser.push("]]").unwrap();
        parser.end().unwrap();
        let first = parser.sink_mut().take_value();
        assert_eq!(first.map(|v| v.to_string()).as_deref(), Some("[1,[2]]"));
        assert_eq!(parser.sink().value(), None);

        parser.reset();
        parser.push(r#"{"b": "c"}"#).unwrap();
        parser.end().unwrap();
        let second = parser.sink_mut().take_value().unwrap();
        assert_eq!(second.get("b").and_then(Value::as_str), Some("c"));
    }
}
