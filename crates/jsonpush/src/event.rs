//! Owned parse events and a sink that records them.
//!
//! [`EventLog`] is the simplest useful [`JsonSink`]: it keeps every event it
//! receives as a [`JsonEvent`]. It is handy for tests, for debugging a
//! document's event stream, and for replaying events into another sink.
//!
//! # Examples
//!
//! ```
//! use jsonpush::{EventLog, JsonEvent, JsonParser};
//!
//! let mut parser = JsonParser::new(EventLog::coalescing());
//! parser.push(r#"["hel"#).unwrap();
//! parser.push(r#"lo", -1]"#).unwrap();
//! parser.end().unwrap();
//! assert_eq!(
//!     parser.into_sink().into_events(),
//!     vec![
//!         JsonEvent::BeginArray,
//!         JsonEvent::EndString("hello".into()),
//!         JsonEvent::Integer("-1".into()),
//!         JsonEvent::EndArray,
//!     ]
//! );
//! ```
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::{convert::Infallible, fmt};

use crate::sink::{Flow, JsonSink};

/// One call made on a [`JsonSink`], with owned text.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonEvent {
    /// [`JsonSink::begin_object`]
    BeginObject,
    /// [`JsonSink::end_object`]
    EndObject,
    /// [`JsonSink::begin_array`]
    BeginArray,
    /// [`JsonSink::end_array`]
    EndArray,
    /// [`JsonSink::found_boolean`]
    Boolean(bool),
    /// [`JsonSink::found_null`]
    Null,
    /// [`JsonSink::found_string`]
    String(String),
    /// [`JsonSink::begin_string`]
    BeginString(String),
    /// [`JsonSink::continue_string`]
    ContinueString(String),
    /// [`JsonSink::end_string`]
    EndString(String),
    /// [`JsonSink::found_integer`]
    Integer(String),
    /// [`JsonSink::found_fraction`]
    Fraction(String),
}

impl JsonEvent {
    /// Delivers this event to `sink`.
    pub fn replay<S: JsonSink + ?Sized>(&self, sink: &mut S) -> Flow<S::Error> {
        match self {
            JsonEvent::BeginObject => sink.begin_object(),
            JsonEvent::EndObject => sink.end_object(),
            JsonEvent::BeginArray => sink.begin_array(),
            JsonEvent::EndArray => sink.end_array(),
            JsonEvent::Boolean(value) => sink.found_boolean(*value),
            JsonEvent::Null => sink.found_null(),
            JsonEvent::String(value) => sink.found_string(Cow::Borrowed(value)),
            JsonEvent::BeginString(piece) => sink.begin_string(Cow::Borrowed(piece)),
            JsonEvent::ContinueString(piece) => sink.continue_string(Cow::Borrowed(piece)),
            JsonEvent::EndString(piece) => sink.end_string(Cow::Borrowed(piece)),
            JsonEvent::Integer(text) => sink.found_integer(Cow::Borrowed(text)),
            JsonEvent::Fraction(text) => sink.found_fraction(Cow::Borrowed(text)),
        }
    }
}

impl fmt::Display for JsonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonEvent::BeginObject => f.write_str("begin_object"),
            JsonEvent::EndObject => f.write_str("end_object"),
            JsonEvent::BeginArray => f.write_str("begin_array"),
            JsonEvent::EndArray => f.write_str("end_array"),
            JsonEvent::Boolean(value) => write!(f, "found_boolean({value})"),
            JsonEvent::Null => f.write_str("found_null"),
            JsonEvent::String(value) => write!(f, "found_string({value:?})"),
            JsonEvent::BeginString(piece) => write!(f, "begin_string({piece:?})"),
            JsonEvent::ContinueString(piece) => write!(f, "continue_string({piece:?})"),
            JsonEvent::EndString(piece) => write!(f, "end_string({piece:?})"),
            JsonEvent::Integer(text) => write!(f, "found_integer({text})"),
            JsonEvent::Fraction(text) => write!(f, "found_fraction({text})"),
        }
    }
}

/// A sink that records every event.
///
/// With [`EventLog::coalescing`], streamed string pieces are joined and
/// recorded as a single [`JsonEvent::EndString`], so the log no longer depends
/// on where the input was split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<JsonEvent>,
    coalesce: bool,
    partial: Option<String>,
}

impl EventLog {
    /// A log that records string pieces as they arrive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that joins string pieces into one `EndString` event.
    #[must_use]
    pub fn coalescing() -> Self {
        Self { coalesce: true, ..Self::default() }
    }

    /// The events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[JsonEvent] {
        &self.events
    }

    /// Consumes the log, returning the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<JsonEvent> {
        self.events
    }

    /// Forgets all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
        self.partial = None;
    }

    fn record(&mut self, event: JsonEvent) -> Flow<Infallible> {
        self.events.push(event);
        Flow::Continue
    }

    fn piece(&mut self, piece: Cow<'_, str>, make: fn(String) -> JsonEvent) -> Flow<Infallible> {
        if self.coalesce {
            self.partial.get_or_insert_with(String::new).push_str(&piece);
            Flow::Continue
        } else {
            self.record(make(piece.into_owned()))
        }
    }
}

impl JsonSink for EventLog {
    type Error = Infallible;

    fn begin_object(&mut self) -> Flow<Self::Error> {
        self.record(JsonEvent::BeginObject)
    }

    fn end_object(&mut self) -> Flow<Self::Error> {
        self.record(JsonEvent::EndObject)
    }

    fn begin_array(&mut self) -> Flow<Self::Error> {
        self.record(JsonEvent::BeginArray)
    }

    fn end_array(&mut self) -> Flow<Self::Error> {
        self.record(JsonEvent::EndArray)
    }

    fn found_boolean(&mut self, value: bool) -> Flow<Self::Error> {
        self.record(JsonEvent::Boolean(value))
    }

    fn found_null(&mut self) -> Flow<Self::Error> {
        self.record(JsonEvent::Null)
    }

    fn found_string(&mut self, value: Cow<'_, str>) -> Flow<Self::Error> {
        self.record(JsonEvent::String(value.into_owned()))
    }

    fn begin_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        self.piece(piece, JsonEvent::BeginString)
    }

    fn continue_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        self.piece(piece, JsonEvent::ContinueString)
    }

    fn end_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        let value = match self.partial.take() {
            Some(mut partial) => {
                partial.push_str(&piece);
                partial
            }
            None => piece.into_owned(),
        };
        self.record(JsonEvent::EndString(value))
    }

    fn found_integer(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        self.record(JsonEvent::Integer(text.into_owned()))
    }

    fn found_fraction(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        self.record(JsonEvent::Fraction(text.into_owned()))
    }
}
