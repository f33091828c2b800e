//! Push-driven JSON parser with sink-controlled suspension.
//!
//! Overview
//! - The caller pushes chunks of text; the parser scans them one `char` at a
//!   time through a closed 38-state machine (see [`State`]) and reports events
//!   to a [`JsonSink`] as soon as they are recognized.
//! - Every sink call returns a [`Flow`]. `Continue` keeps scanning. `Suspend`
//!   parks the returned future: the unconsumed remainder of the chunk is copied
//!   into an owned FIFO, and nothing else is scanned until the future has been
//!   polled to completion through [`JsonParser::poll_drive`] (or the `drive`,
//!   `feed` and `finish` futures built on it).
//! - Input pushed while a future is parked is appended to the same FIFO, so
//!   chunks are always scanned in push order and never while a sink call is
//!   outstanding. Draining is iterative: a document with many suspensions does
//!   not grow the stack.
//!
//! Borrowing
//! - Strings without escapes and numbers that lie within one chunk are handed
//!   to the sink as `Cow::Borrowed` slices of that chunk.
//! - The first escape, or a chunk boundary, moves the token into a scratch
//!   buffer and the rest of that token is reported owned.
//! - Only the remainder of a chunk that was interrupted by a suspension, and
//!   chunks pushed while suspended, are copied.
//!
//! # Examples
//!
//! ```rust
//! use jsonpush::{EventLog, JsonEvent, JsonParser};
//!
//! let mut parser = JsonParser::new(EventLog::default());
//! parser.push(r#"{"key": [null, tr"#).unwrap();
//! parser.push(r#"ue, 3.14]}"#).unwrap();
//! parser.end().unwrap();
//! assert_eq!(
//!     parser.sink().events(),
//!     &[
//!         JsonEvent::BeginObject,
//!         JsonEvent::EndString("key".into()),
//!         JsonEvent::BeginArray,
//!         JsonEvent::Null,
//!         JsonEvent::Boolean(true),
//!         JsonEvent::Fraction("3.14".into()),
//!         JsonEvent::EndArray,
//!         JsonEvent::EndObject,
//!     ]
//! );
//! ```

mod scan;
mod state;


use alloc::{
    collections::VecDeque,
    string::{String, ToString},
    vec::Vec,
};
use core::{
    future::{Future, poll_fn},
    task::{Context, Poll},
};

pub(crate) use state::State;
use tracing::debug;

use crate::{
    error::{MalformedJson, ParseError, SyntaxError},
    escape_buffer::UnicodeEscapeBuffer,
    options::ParserOptions,
    position::Position,
    sink::{JsonSink, Pending},
};

/// Whether everything handed to the parser so far has been scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// All pushed input has been scanned.
    Complete,
    /// A sink call suspended the parser; the rest of the input is queued
    /// until the parser is driven again.
    Suspended,
}

/// Owned input waiting behind a parked sink future.
#[derive(Debug)]
enum Queued {
    /// Text still to scan, starting at byte offset `start`.
    Text { text: String, start: usize },
    /// End of input was signalled.
    End,
}

/// Incremental push parser for one JSON document at a time.
///
/// See the [module documentation](self) for the borrowing and suspension
/// model.
pub struct JsonParser<S: JsonSink> {
    sink: S,
    options: ParserOptions,

    state: State,
    /// Where control returns once the value being parsed completes. Open
    /// containers keep their entry until their closing bracket.
    stack: Vec<State>,

    /// Token text copied out of earlier chunks or decoded from escapes.
    /// `None` while the token can still be borrowed from the current chunk.
    scratch: Option<String>,
    /// Byte offset in the current chunk where the uncopied part of the
    /// current token starts.
    token_start: usize,
    /// A streamed nested string has already reported its first piece.
    string_begun: bool,
    escape: UnicodeEscapeBuffer,

    position: Position,
    source_label: Option<String>,

    outstanding: Option<Pending<S::Error>>,
    queue: VecDeque<Queued>,
    ended: bool,
    poisoned: bool,
}

impl<S: JsonSink> JsonParser<S> {
    /// Creates a parser reporting to `sink` with default options.
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, ParserOptions::default())
    }

    /// Creates a parser reporting to `sink`.
    pub fn with_options(sink: S, options: ParserOptions) -> Self {
        Self {
            sink,
            options,
            state: State::BeforeDocument,
            stack: Vec::new(),
            scratch: None,
            token_start: 0,
            string_begun: false,
            escape: UnicodeEscapeBuffer::new(),
            position: Position::START,
            source_label: None,
            outstanding: None,
            queue: VecDeque::new(),
            ended: false,
            poisoned: false,
        }
    }

    /// Sets the file or stream name used in diagnostics.
    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    /// Replaces the file or stream name used in diagnostics.
    pub fn set_source_label(&mut self, label: Option<String>) {
        self.source_label = label;
    }

    /// The file or stream name used in diagnostics.
    #[must_use]
    pub fn source_label(&self) -> Option<&str> {
        self.source_label.as_deref()
    }

    /// 1-based line of the next character to be scanned.
    #[must_use]
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// 1-based column of the next character to be scanned.
    #[must_use]
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Position of the next character to be scanned.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The options this parser was created with.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Number of objects and arrays currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() - usize::from(self.state.in_scalar())
    }

    /// Whether a sink future is parked.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Whether a complete document has been scanned and nothing is pending.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == State::AfterDocument
            && !self.poisoned
            && self.outstanding.is_none()
            && self.queue.is_empty()
    }

    /// The sink receiving events.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink receiving events.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the parser, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Pushes the next chunk of the document.
    ///
    /// Scans synchronously until the chunk is exhausted or a sink call
    /// suspends. In the latter case, and whenever an earlier suspension is
    /// still unresolved, the unscanned text is queued and
    /// [`Progress::Suspended`] is returned; drive the parser to continue.
    ///
    /// # Errors
    ///
    /// A malformed document, or a sink that returned [`Flow::Break`](crate::Flow::Break).
    /// Either leaves the parser unusable until [`reset`](Self::reset).
    pub fn push(&mut self, chars: &str) -> Result<Progress, ParseError<S::Error>> {
        self.push_range(chars, 0, None)
    }

    /// Pushes `count` characters of `chars` starting at character `offset`.
    ///
    /// `count` defaults to the rest of `chars`; both are clamped to its
    /// length.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn push_range(
        &mut self,
        chars: &str,
        offset: usize,
        count: Option<usize>,
    ) -> Result<Progress, ParseError<S::Error>> {
        self.check_open()?;
        let text = char_window(chars, offset, count);

        if self.outstanding.is_some() || !self.queue.is_empty() {
            if !text.is_empty() {
                debug!(len = text.len(), queued = self.queue.len(), "queueing chunk behind suspension");
                self.queue.push_back(Queued::Text { text: text.to_string(), start: 0 });
            }
            return Ok(Progress::Suspended);
        }

        match self.scan(text, 0) {
            Ok(None) => Ok(Progress::Complete),
            Ok(Some(resume)) => {
                if resume < text.len() {
                    self.queue.push_back(Queued::Text { text: text[resume..].to_string(), start: 0 });
                }
                Ok(Progress::Suspended)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Signals that no more input follows.
    ///
    /// Reports a trailing top-level number or literal when
    /// [`allow_bare_values`](ParserOptions::allow_bare_values) is set. Queued
    /// behind any pending suspension like a chunk.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::UnexpectedEndOfInput`] if the document is incomplete,
    /// or a sink failure.
    pub fn end(&mut self) -> Result<Progress, ParseError<S::Error>> {
        self.check_open()?;
        self.ended = true;

        if self.outstanding.is_some() || !self.queue.is_empty() {
            self.queue.push_back(Queued::End);
            return Ok(Progress::Suspended);
        }

        match self.scan_end() {
            Ok(false) => Ok(Progress::Complete),
            Ok(true) => Ok(Progress::Suspended),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Polls the parked sink future, then scans queued input until it is
    /// exhausted or another sink call suspends.
    ///
    /// Resolves with `Ok(())` once everything pushed so far has been scanned.
    ///
    /// # Errors
    ///
    /// A malformed document in queued input, or a sink failure (synchronous or
    /// from the parked future).
    pub fn poll_drive(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), ParseError<S::Error>>> {
        if self.poisoned {
            return Poll::Ready(Err(self.malformed(SyntaxError::Poisoned)));
        }

        loop {
            if let Some(pending) = self.outstanding.as_mut() {
                let Poll::Ready(result) = pending.as_mut().poll(cx) else {
                    return Poll::Pending;
                };
                self.outstanding = None;
                if let Err(err) = result {
                    return Poll::Ready(Err(self.fail(ParseError::Sink(err))));
                }
                debug!(
                    line = self.position.line,
                    column = self.position.column,
                    queued = self.queue.len(),
                    "sink resumed parsing"
                );
            }

            match self.pump() {
                Ok(Progress::Complete) => return Poll::Ready(Ok(())),
                Ok(Progress::Suspended) => {}
                Err(err) => return Poll::Ready(Err(self.fail(err))),
            }
        }
    }

    /// Future form of [`poll_drive`](Self::poll_drive).
    pub fn drive(&mut self) -> impl Future<Output = Result<(), ParseError<S::Error>>> + '_ {
        poll_fn(move |cx| self.poll_drive(cx))
    }

    /// Pushes a chunk and waits until it, and everything queued before it, has
    /// been scanned.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push) and [`poll_drive`](Self::poll_drive).
    pub async fn feed(&mut self, chars: &str) -> Result<(), ParseError<S::Error>> {
        self.push(chars)?;
        self.drive().await
    }

    /// Signals end of input and waits until the whole document is scanned.
    ///
    /// # Errors
    ///
    /// See [`end`](Self::end) and [`poll_drive`](Self::poll_drive).
    pub async fn finish(&mut self) -> Result<(), ParseError<S::Error>> {
        self.end()?;
        self.drive().await
    }

    /// Discards all parse state, including queued input and a parked sink
    /// future, so the parser can start a new document. The source label and
    /// options are kept.
    pub fn reset(&mut self) {
        debug!(state = ?self.state, "resetting parser");
        self.state = State::BeforeDocument;
        self.stack.clear();
        self.scratch = None;
        self.token_start = 0;
        self.string_begun = false;
        self.escape.reset();
        self.position = Position::START;
        self.outstanding = None;
        self.queue.clear();
        self.ended = false;
        self.poisoned = false;
    }

    /// Scans queued input in FIFO order until it runs out or a sink call
    /// suspends.
    fn pump(&mut self) -> Result<Progress, ParseError<S::Error>> {
        while self.outstanding.is_none() {
            let Some(next) = self.queue.pop_front() else {
                return Ok(Progress::Complete);
            };
            match next {
                Queued::Text { text, start } => {
                    if let Some(resume) = self.scan(&text, start)? {
                        if resume < text.len() {
                            self.queue.push_front(Queued::Text { text, start: resume });
                        }
                    }
                }
                Queued::End => {
                    self.scan_end()?;
                }
            }
        }
        Ok(Progress::Suspended)
    }

    fn check_open(&self) -> Result<(), ParseError<S::Error>> {
        if self.poisoned {
            Err(self.malformed(SyntaxError::Poisoned))
        } else if self.ended {
            Err(self.malformed(SyntaxError::InputAfterEnd))
        } else {
            Ok(())
        }
    }

    /// Marks the document as failed; nothing queued will be scanned.
    fn fail(&mut self, err: ParseError<S::Error>) -> ParseError<S::Error> {
        match &err {
            ParseError::Malformed(malformed) => debug!(%malformed, "malformed document"),
            ParseError::Sink(_) => debug!(
                line = self.position.line,
                column = self.position.column,
                "sink failed"
            ),
        }
        self.poisoned = true;
        self.outstanding = None;
        self.queue.clear();
        err
    }

    fn malformed(&self, reason: SyntaxError) -> ParseError<S::Error> {
        ParseError::Malformed(MalformedJson::new(self.source_label.as_deref(), self.position, reason))
    }
}

impl<S: JsonSink + core::fmt::Debug> core::fmt::Debug for JsonParser<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JsonParser")
            .field("sink", &self.sink)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("depth", &self.depth())
            .field("position", &self.position)
            .field("source_label", &self.source_label)
            .field("suspended", &self.outstanding.is_some())
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

/// The `count` characters of `chars` starting at character `offset`, both
/// clamped to the end of `chars`.
fn char_window(chars: &str, offset: usize, count: Option<usize>) -> &str {
    let start = chars.char_indices().nth(offset).map_or(chars.len(), |(i, _)| i);
    let rest = &chars[start..];
    match count {
        None => rest,
        Some(count) => {
            let end = rest.char_indices().nth(count).map_or(rest.len(), |(i, _)| i);
            &rest[..end]
        }
    }
}
