//! A push-driven, suspendable, incremental JSON parser.
//!
//! Text is pushed in chunks of any size, split anywhere, and every structural
//! element and scalar is reported to a [`JsonSink`] as soon as it is
//! recognized. Any sink call may return [`Flow::Suspend`] with a future; the
//! parser then stops scanning, keeps the unconsumed input, and resumes exactly
//! where it left off once the future completes.
//!
//! ```rust
//! use jsonpush::{JsonParser, Value, ValueBuilder};
//!
//! let mut parser = JsonParser::new(ValueBuilder::new());
//! for chunk in [r#"{"tool": "sea"#, r#"rch", "args": {"q": "ru"#, r#"st"}}"#] {
//!     parser.push(chunk).unwrap();
//! }
//! parser.end().unwrap();
//! let value = parser.into_sink().into_value().unwrap();
//! assert_eq!(value.get("tool").and_then(Value::as_str), Some("search"));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod builder;
mod error;
mod escape_buffer;
mod event;
mod options;
mod parser;
mod position;
mod sink;
mod value;

#[cfg(test)]
mod tests;

pub use builder::ValueBuilder;
pub use error::{MalformedJson, ParseError, SyntaxError};
pub use event::{EventLog, JsonEvent};
pub use options::{ParserOptions, StringValueMode};
pub use parser::{JsonParser, Progress};
pub use position::Position;
pub use sink::{Flow, JsonSink, Pending};
pub use value::{Array, Map, Value};
