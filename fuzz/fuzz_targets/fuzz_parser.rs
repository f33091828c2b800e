#![no_main]
use arbitrary::Arbitrary;
use futures::{executor::block_on, future};
use jsonpush::{
    Flow, JsonParser, JsonSink, ParseError, ParserOptions, StringValueMode, Value, ValueBuilder,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    buffered: bool,
    suspend: bool,
    split_seed: u64,
    text: String,
}

/// Builds a value, suspending on every event when asked to.
struct Suspending {
    builder: ValueBuilder,
    suspend: bool,
}

impl Suspending {
    fn flow(&self, flow: Flow<std::convert::Infallible>) -> Flow<std::convert::Infallible> {
        match flow {
            Flow::Continue if self.suspend => Flow::suspend(future::ready(Ok(()))),
            other => other,
        }
    }
}

impl JsonSink for Suspending {
    type Error = std::convert::Infallible;

    fn begin_object(&mut self) -> Flow<Self::Error> {
        let flow = self.builder.begin_object();
        self.flow(flow)
    }

    fn end_object(&mut self) -> Flow<Self::Error> {
        let flow = self.builder.end_object();
        self.flow(flow)
    }

    fn begin_array(&mut self) -> Flow<Self::Error> {
        let flow = self.builder.begin_array();
        self.flow(flow)
    }

    fn end_array(&mut self) -> Flow<Self::Error> {
        let flow = self.builder.end_array();
        self.flow(flow)
    }

    fn found_boolean(&mut self, value: bool) -> Flow<Self::Error> {
        let flow = self.builder.found_boolean(value);
        self.flow(flow)
    }

    fn found_null(&mut self) -> Flow<Self::Error> {
        let flow = self.builder.found_null();
        self.flow(flow)
    }

    fn found_string(&mut self, value: std::borrow::Cow<'_, str>) -> Flow<Self::Error> {
        let flow = self.builder.found_string(value);
        self.flow(flow)
    }

    fn begin_string(&mut self, piece: std::borrow::Cow<'_, str>) -> Flow<Self::Error> {
        let flow = self.builder.begin_string(piece);
        self.flow(flow)
    }

    fn continue_string(&mut self, piece: std::borrow::Cow<'_, str>) -> Flow<Self::Error> {
        let flow = self.builder.continue_string(piece);
        self.flow(flow)
    }

    fn end_string(&mut self, piece: std::borrow::Cow<'_, str>) -> Flow<Self::Error> {
        let flow = self.builder.end_string(piece);
        self.flow(flow)
    }

    fn found_integer(&mut self, text: std::borrow::Cow<'_, str>) -> Flow<Self::Error> {
        let flow = self.builder.found_integer(text);
        self.flow(flow)
    }

    fn found_fraction(&mut self, text: std::borrow::Cow<'_, str>) -> Flow<Self::Error> {
        let flow = self.builder.found_fraction(text);
        self.flow(flow)
    }
}

fn to_serde(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(text) => serde_json::from_str(text).expect("number text is valid JSON"),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_serde).collect()),
        Value::Object(map) => {
            serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), to_serde(v))).collect())
        }
    }
}

fn run(input: &Input) -> Result<Option<Value>, ParseError<std::convert::Infallible>> {
    let options = ParserOptions {
        allow_bare_values: true,
        string_value_mode: if input.buffered {
            StringValueMode::Buffered
        } else {
            StringValueMode::Streamed
        },
    };
    let sink = Suspending { builder: ValueBuilder::new(), suspend: input.suspend };
    let mut parser = JsonParser::with_options(sink, options);
    block_on(async {
        for chunk in split_into_safe_chunks(&input.text, input.split_seed) {
            parser.feed(chunk).await?;
        }
        parser.finish().await
    })?;
    Ok(parser.into_sink().builder.into_value())
}

fuzz_target!(|input: Input| {
    let ours = run(&input);
    // Nesting beyond serde_json's recursion limit is only rejected by serde_json.
    if let Ok(expected) = serde_json::from_str::<serde_json::Value>(&input.text) {
        let value = ours.expect("serde_json accepted a document we rejected");
        let value = value.expect("a finished document has a value");
        assert_eq!(to_serde(&value), expected);
    }
});

/// Split a UTF-8 `&str` into boundary-safe chunks of at least one byte, sized
/// from `split_seed`.
fn split_into_safe_chunks(text: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut seed = split_seed;

    while start < text.len() {
        let remaining = text.len() - start;
        let mut size = (seed as usize % remaining) + 1;
        while !text.is_char_boundary(start + size) {
            size += 1;
        }
        chunks.push(&text[start..start + size]);
        start += size;
        seed = seed.rotate_left(7) ^ 0x9E37_79B9_7F4A_7C15;
    }

    chunks
}
