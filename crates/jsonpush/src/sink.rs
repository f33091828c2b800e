//! The event sink contract.
//!
//! A [`JsonSink`] receives structural and value events in document order.
//! Each call returns a [`Flow`] which tells the parser whether to keep
//! scanning, to stop with an error, or to suspend until a future settles.
//! Suspension lets a sink perform asynchronous work (writing to storage,
//! forwarding to a channel with backpressure) before any further input is
//! looked at.

use alloc::borrow::Cow;
use core::{convert::Infallible, fmt, future::Future};

use futures::future::{FutureExt, LocalBoxFuture};

/// A parked sink result. The parser polls it before scanning any further.
pub type Pending<E> = LocalBoxFuture<'static, Result<(), E>>;

/// What the parser should do after delivering an event.
#[must_use]
pub enum Flow<E> {
    /// Keep scanning.
    Continue,
    /// Stop scanning until the future resolves. `Ok(())` resumes the parser on
    /// the remaining input; an error fails the current push.
    Suspend(Pending<E>),
    /// Stop scanning and fail with the given error.
    Break(E),
}

impl<E> Flow<E> {
    /// Suspends the parser until `future` resolves.
    pub fn suspend<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), E>> + 'static,
    {
        Flow::Suspend(future.boxed_local())
    }

    /// Returns `true` for [`Flow::Continue`].
    #[must_use]
    pub fn is_continue(&self) -> bool {
        matches!(self, Flow::Continue)
    }
}

impl<E> From<Result<(), E>> for Flow<E> {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Flow::Continue,
            Err(err) => Flow::Break(err),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Flow<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Continue => f.write_str("Continue"),
            Flow::Suspend(_) => f.write_str("Suspend(..)"),
            Flow::Break(err) => f.debug_tuple("Break").field(err).finish(),
        }
    }
}

/// Receiver of parse events.
///
/// Every method defaults to [`Flow::Continue`], so a sink only implements the
/// events it cares about. Text arguments borrow from the pushed chunk whenever
/// the token was contiguous and unescaped, and are owned otherwise.
///
/// Strings inside objects and arrays (member names included) arrive through
/// the `begin_string` / `continue_string` / `end_string` triplet, see
/// [`StringValueMode`](crate::StringValueMode). A string that is the whole
/// document arrives through [`found_string`](JsonSink::found_string).
pub trait JsonSink {
    /// Error produced by the sink.
    type Error;

    /// `{` was consumed.
    fn begin_object(&mut self) -> Flow<Self::Error> {
        Flow::Continue
    }

    /// `}` was consumed.
    fn end_object(&mut self) -> Flow<Self::Error> {
        Flow::Continue
    }

    /// `[` was consumed.
    fn begin_array(&mut self) -> Flow<Self::Error> {
        Flow::Continue
    }

    /// `]` was consumed.
    fn end_array(&mut self) -> Flow<Self::Error> {
        Flow::Continue
    }

    /// A `true` or `false` literal.
    fn found_boolean(&mut self, value: bool) -> Flow<Self::Error> {
        let _ = value;
        Flow::Continue
    }

    /// A `null` literal.
    fn found_null(&mut self) -> Flow<Self::Error> {
        Flow::Continue
    }

    /// A string that makes up the entire document.
    fn found_string(&mut self, value: Cow<'_, str>) -> Flow<Self::Error> {
        let _ = value;
        Flow::Continue
    }

    /// First piece of a nested string that continues in a later chunk.
    fn begin_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        let _ = piece;
        Flow::Continue
    }

    /// A middle piece of a nested string.
    fn continue_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        let _ = piece;
        Flow::Continue
    }

    /// Final piece of a nested string; the whole string if no earlier piece
    /// was reported.
    fn end_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        let _ = piece;
        Flow::Continue
    }

    /// A number without fraction or exponent, as written in the document.
    fn found_integer(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        let _ = text;
        Flow::Continue
    }

    /// A number with a fraction and/or exponent, as written in the document.
    fn found_fraction(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        let _ = text;
        Flow::Continue
    }
}

/// Discards every event; the parser then acts as a pure validator.
impl JsonSink for () {
    type Error = Infallible;
}

impl<S: JsonSink + ?Sized> JsonSink for &mut S {
    type Error = S::Error;

    fn begin_object(&mut self) -> Flow<Self::Error> {
        (**self).begin_object()
    }

    fn end_object(&mut self) -> Flow<Self::Error> {
        (**self).end_object()
    }

    fn begin_array(&mut self) -> Flow<Self::Error> {
        (**self).begin_array()
    }

    fn end_array(&mut self) -> Flow<Self::Error> {
        (**self).end_array()
    }

    fn found_boolean(&mut self, value: bool) -> Flow<Self::Error> {
        (**self).found_boolean(value)
    }

    fn found_null(&mut self) -> Flow<Self::Error> {
        (**self).found_null()
    }

    fn found_string(&mut self, value: Cow<'_, str>) -> Flow<Self::Error> {
        (**self).found_string(value)
    }

    fn begin_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        (**self).begin_string(piece)
    }

    fn continue_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        (**self).continue_string(piece)
    }

    fn end_string(&mut self, piece: Cow<'_, str>) -> Flow<Self::Error> {
        (**self).end_string(piece)
    }

    fn found_integer(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        (**self).found_integer(text)
    }

    fn found_fraction(&mut self, text: Cow<'_, str>) -> Flow<Self::Error> {
        (**self).found_fraction(text)
    }
}
