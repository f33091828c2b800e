//! Incremental decoding of `\uXXXX` escapes.
//!
//! The [`UnicodeEscapeBuffer`] type accumulates exactly four ASCII hexadecimal
//! digits (`0-9`, `A-F`, `a-f`) into one UTF-16 code unit as they arrive,
//! one character per call, so an escape may be split across any number of
//! chunks. A high surrogate is parked until the next escape supplies its low
//! half; the pair then decodes to a single [`char`].
//!
//! # Errors
//!
//! - Feeding a non-hexadecimal character returns
//!   [`SyntaxError::InvalidUnicodeEscapeChar`].
//! - A low surrogate without a parked high surrogate, or a high surrogate
//!   followed by anything but a low surrogate, returns
//!   [`SyntaxError::UnpairedSurrogate`].

use crate::error::SyntaxError;

/// Outcome of feeding one hex digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// Fewer than four digits so far.
    Incomplete,
    /// A high surrogate was parked; its low half must follow.
    HighSurrogate,
    /// A complete scalar value.
    Char(char),
}

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    unit: u16,
    digits: u8,
    high: Option<u16>,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new escape after `\u` was seen.
    pub fn begin(&mut self) {
        self.unit = 0;
        self.digits = 0;
    }

    /// Forgets everything, including a parked high surrogate.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The parked high surrogate, if the previous escape left one.
    pub fn pending_high_surrogate(&self) -> Option<u16> {
        self.high
    }

    /// Feeds a single character of the escape.
    pub fn feed(&mut self, c: char) -> Result<Decoded, SyntaxError> {
        let d = c
            .to_digit(16)
            .ok_or(SyntaxError::InvalidUnicodeEscapeChar(c))?;

        // Four digits fit in 16 bits; `begin` clears the accumulator before
        // the next escape.
        self.unit = (self.unit << 4) | d as u16;
        self.digits += 1;
        if self.digits < 4 {
            return Ok(Decoded::Incomplete);
        }

        let unit = self.unit;
        self.begin();

        match (self.high.take(), unit) {
            (None, 0xD800..=0xDBFF) => {
                self.high = Some(unit);
                Ok(Decoded::HighSurrogate)
            }
            (None, 0xDC00..=0xDFFF) => Err(SyntaxError::UnpairedSurrogate(unit)),
            (None, _) => Ok(Decoded::Char(scalar(u32::from(unit)))),
            (Some(high), 0xDC00..=0xDFFF) => {
                let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                Ok(Decoded::Char(scalar(code)))
            }
            (Some(high), _) => Err(SyntaxError::UnpairedSurrogate(high)),
        }
    }
}

/// Surrogates are excluded above, so every remaining code is a scalar value
/// and the replacement character is unreachable.
fn scalar(code: u32) -> char {
    debug_assert!(char::from_u32(code).is_some(), "surrogate {code:#X} reached scalar");
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}
