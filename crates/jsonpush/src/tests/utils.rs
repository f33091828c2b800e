use alloc::{borrow::Cow, string::String, vec::Vec};
use core::{
    convert::Infallible,
    task::{Context, Poll},
};

use futures::{FutureExt, channel::oneshot, task::noop_waker_ref};

use crate::{
    EventLog, Flow, JsonEvent, JsonParser, JsonSink, ParseError, ParserOptions, Value, ValueBuilder,
};

/// Splits `src` into chunks whose sizes, in characters, are derived from
/// `splits`. Chunks never cut a `char` in half.
pub fn split_by(src: &str, splits: &[usize]) -> Vec<String> {
    let chars: Vec<char> = src.chars().collect();
    let mut chunks = Vec::new();
    let mut idx = 0;
    for s in splits {
        let remaining = chars.len() - idx;
        if remaining == 0 {
            break;
        }
        let size = 1 + (s % remaining);
        chunks.push(chars[idx..idx + size].iter().collect());
        idx += size;
    }
    if idx < chars.len() {
        chunks.push(chars[idx..].iter().collect());
    }
    chunks
}

/// Runs `chunks` through a fresh parser and returns what the sink recorded.
pub fn parse_events<I, T>(chunks: I, options: ParserOptions, log: EventLog) -> Result<Vec<JsonEvent>, ParseError<Infallible>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut parser = JsonParser::with_options(log, options);
    for chunk in chunks {
        parser.push(chunk.as_ref())?;
    }
    parser.end()?;
    Ok(parser.into_sink().into_events())
}

/// Parses `src` in one chunk into a [`Value`].
pub fn parse_value(src: &str, options: ParserOptions) -> Result<Option<Value>, ParseError<Infallible>> {
    let mut parser = JsonParser::with_options(ValueBuilder::new(), options);
    parser.push(src)?;
    parser.end()?;
    Ok(parser.into_sink().into_value())
}

/// Records events and suspends on every `every`th one until the test opens
/// the gate.
#[derive(Debug, Default)]
pub struct Gated {
    pub log: EventLog,
    every: usize,
    seen: usize,
    gates: Vec<oneshot::Sender<()>>,
}

impl Gated {
    pub fn every(every: usize) -> Self {
        Self { every, ..Self::default() }
    }

    /// Number of gates still closed.
    pub fn closed(&self) -> usize {
        self.gates.len()
    }

    pub fn open_all(&mut self) {
        for gate in self.gates.drain(..) {
            let _ = gate.send(());
        }
    }

    fn after(&mut self, record: impl FnOnce(&mut EventLog) -> Flow<Infallible>) -> Flow<&'static str> {
        let _ = record(&mut self.log);
        self.seen += 1;
        if self.every == 0 || self.seen % self.every != 0 {
            return Flow::Continue;
        }
        let (tx, rx) = oneshot::channel();
        self.gates.push(tx);
        Flow::suspend(rx.map(|opened| opened.map_err(|_| "gate dropped")))
    }
}

impl JsonSink for Gated {
    type Error = &'static str;

    fn begin_object(&mut self) -> Flow<Self::Error> {
        self.after(EventLog::begin_object)
    }

    fn end_object(&mut self) -> Flow<Self::Error> {
        self.after(EventLog::end_object)
    }

    fn begin_array(&mut self) -> Flow<Self::Error> {
        self.after(EventLog::begin_array)
    }

    fn end_array(&mut self) -> Flow<Self::Error> {
        self.after(EventLog::end_array)
    }

    fn found_boolean(&mut self, value: bool) -> Flow<Self::Error> {
        self.after(|log| log.found_boolean(value))
    }

    fn found_null(&mut self) -> Flow<Self::Error> {
        self.after(EventLog::found_null)
    }

    fn found_string(&mut self, value: Cow<'_, str>) -> Flow<Self::Error> {
        self.after(|log| log.found_string(value))
    }

    fn begin_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        self.after(|log| log.begin_string(piece))
    }

    fn continue_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        self.after(|log| log.continue_string(piece))
    }

    fn end_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        self.after(|log| log.end_string(piece))
    }

    fn found_integer(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        self.after(|log| log.found_integer(text))
    }

    fn found_fraction(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        self.after(|log| log.found_fraction(text))
    }
}

/// Drives `parser` to completion, opening every gate it parks on.
pub fn drive_open(parser: &mut JsonParser<Gated>) -> Result<usize, ParseError<&'static str>> {
    let mut cx = Context::from_waker(noop_waker_ref());
    let mut opened = 0;
    loop {
        match parser.poll_drive(&mut cx) {
            Poll::Ready(result) => return result.map(|()| opened),
            Poll::Pending => {
                opened += parser.sink().closed();
                parser.sink_mut().open_all();
            }
        }
    }
}
