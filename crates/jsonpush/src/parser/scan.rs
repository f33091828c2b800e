//! The character-at-a-time transition function.

use alloc::{borrow::Cow, string::String};

use tracing::{debug, trace};

use super::{JsonParser, State};
use crate::{
    error::{ParseError, SyntaxError},
    escape_buffer::Decoded,
    options::StringValueMode,
    sink::{Flow, JsonSink, Pending},
};

/// Outcome of feeding one character to the state machine.
pub(super) struct Step<E> {
    /// Whether the character was consumed. A retained character is
    /// re-dispatched in the new state.
    consumed: bool,
    /// A sink call asked to suspend.
    pending: Option<Pending<E>>,
}

type Stepped<E> = Result<Step<E>, ParseError<E>>;

impl<E> Step<E> {
    fn consume() -> Stepped<E> {
        Ok(Step { consumed: true, pending: None })
    }

    fn retain() -> Stepped<E> {
        Ok(Step { consumed: false, pending: None })
    }

    fn consume_then(flow: Flow<E>) -> Stepped<E> {
        Ok(Step { consumed: true, pending: signal(flow)? })
    }

    fn retain_then(flow: Flow<E>) -> Stepped<E> {
        Ok(Step { consumed: false, pending: signal(flow)? })
    }
}

fn signal<E>(flow: Flow<E>) -> Result<Option<Pending<E>>, ParseError<E>> {
    match flow {
        Flow::Continue => Ok(None),
        Flow::Suspend(pending) => Ok(Some(pending)),
        Flow::Break(err) => Err(ParseError::Sink(err)),
    }
}

#[inline]
fn is_json_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

impl<S: JsonSink> JsonParser<S> {
    /// Scans `text[start..]`.
    ///
    /// Returns the byte offset to resume from when a sink call suspended, in
    /// which case the pending future has been parked.
    pub(super) fn scan(&mut self, text: &str, start: usize) -> Result<Option<usize>, ParseError<S::Error>> {
        trace!(start, len = text.len(), state = ?self.state, "scanning chunk");
        self.token_start = start;
        let mut offset = start;

        while let Some(c) = text[offset..].chars().next() {
            let step = self.step(c, text, offset)?;
            if step.consumed {
                self.position.advance(c);
                offset += c.len_utf8();
            }
            if let Some(pending) = step.pending {
                self.park(pending);
                return Ok(Some(offset));
            }
        }

        match self.end_of_chunk(text)? {
            Some(pending) => {
                self.park(pending);
                Ok(Some(text.len()))
            }
            None => Ok(None),
        }
    }

    /// Handles end of input. Returns `true` when the final sink call
    /// suspended.
    pub(super) fn scan_end(&mut self) -> Result<bool, ParseError<S::Error>> {
        // A scalar at the top level has only its own return entry.
        let top_level = self.stack.len() == 1;
        let flow = match self.state {
            State::AfterDocument => return Ok(false),
            state if state.number_complete() && top_level => {
                let text = Cow::Owned(self.scratch.take().unwrap_or_default());
                self.state = self.pop_return();
                if matches!(state, State::WithinInt | State::AfterInt) {
                    self.sink.found_integer(text)
                } else {
                    self.sink.found_fraction(text)
                }
            }
            State::True | State::False if top_level => {
                let value = self.state == State::True;
                self.state = self.pop_return();
                self.sink.found_boolean(value)
            }
            State::Null if top_level => {
                self.state = self.pop_return();
                self.sink.found_null()
            }
            state => {
                let complete_token =
                    state.number_complete() || matches!(state, State::True | State::False | State::Null);
                let expected = match self.stack.last() {
                    Some(ret) if complete_token => ret.expectation(),
                    _ => state.expectation(),
                };
                return Err(self.malformed(SyntaxError::UnexpectedEndOfInput(expected)));
            }
        };

        match signal(flow)? {
            Some(pending) => {
                self.park(pending);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn park(&mut self, pending: Pending<S::Error>) {
        debug!(
            line = self.position.line,
            column = self.position.column,
            state = ?self.state,
            "sink suspended parsing"
        );
        self.outstanding = Some(pending);
    }

    #[allow(clippy::too_many_lines)]
    fn step(&mut self, c: char, text: &str, offset: usize) -> Stepped<S::Error> {
        if is_json_whitespace(c) && self.state.skips_whitespace() {
            return Step::consume();
        }

        match self.state {
            State::BeforeDocument => match c {
                '{' | '[' => self.begin_value(c, offset, State::AfterDocument, true),
                _ if self.options.allow_bare_values => {
                    self.state = State::BareValue;
                    Step::retain()
                }
                _ => Err(self.unexpected(c, "'[' or '{' to start the document")),
            },
            State::BareValue => self.begin_value(c, offset, State::AfterDocument, true),

            // -------------------------- LITERALS -----------------------------
            State::F => self.literal(c, "false", 'a', State::Fa),
            State::Fa => self.literal(c, "false", 'l', State::Fal),
            State::Fal => self.literal(c, "false", 's', State::Fals),
            State::Fals => self.literal(c, "false", 'e', State::False),
            State::T => self.literal(c, "true", 'r', State::Tr),
            State::Tr => self.literal(c, "true", 'u', State::Tru),
            State::Tru => self.literal(c, "true", 'e', State::True),
            State::N => self.literal(c, "null", 'u', State::Nu),
            State::Nu => self.literal(c, "null", 'l', State::Nul),
            State::Nul => self.literal(c, "null", 'l', State::Null),
            State::False | State::True => {
                let value = self.state == State::True;
                self.state = self.pop_return();
                Step::retain_then(self.sink.found_boolean(value))
            }
            State::Null => {
                self.state = self.pop_return();
                Step::retain_then(self.sink.found_null())
            }

            // -------------------------- OBJECTS ------------------------------
            State::BeforeInitialKey => match c {
                '"' => self.begin_key(offset),
                '}' => self.close_object(),
                _ => Err(self.unexpected(c, "'\"' to start an object member or '}' to end the object")),
            },
            State::BeforeKey => match c {
                '"' => self.begin_key(offset),
                '}' => Err(self.malformed(SyntaxError::TrailingComma(c))),
                _ => Err(self.unexpected(c, "'\"' to start an object member")),
            },
            State::BeforeNameSeparator => match c {
                ':' => self.goto(State::BeforeValue),
                _ => Err(self.unexpected(c, "':' after the member name")),
            },
            State::BeforeValue => self.begin_value(c, offset, State::BeforeMemberSeparator, false),
            State::BeforeMemberSeparator => match c {
                ',' => self.goto(State::BeforeKey),
                '}' => self.close_object(),
                _ => Err(self.unexpected(c, "',' or '}' after an object member")),
            },

            // -------------------------- ARRAYS -------------------------------
            State::BeforeInitialElement => match c {
                ']' => self.close_array(),
                _ => self.begin_value(c, offset, State::BeforeElementSeparator, false),
            },
            State::BeforeElement => match c {
                ']' => Err(self.malformed(SyntaxError::TrailingComma(c))),
                _ => self.begin_value(c, offset, State::BeforeElementSeparator, false),
            },
            State::BeforeElementSeparator => match c {
                ',' => self.goto(State::BeforeElement),
                ']' => self.close_array(),
                _ => Err(self.unexpected(c, "',' or ']' after an array element")),
            },

            // -------------------------- STRINGS ------------------------------
            State::String | State::InsideString => self.string_char(c, text, offset),
            State::StringEscape | State::InsideStringEscape => self.escape_char(c, offset),
            State::StringUnicode | State::InsideStringUnicode => self.unicode_char(c, offset),

            // -------------------------- NUMBERS ------------------------------
            State::BeforeInt => match c {
                '0' => self.goto(State::AfterInt),
                '1'..='9' => self.goto(State::WithinInt),
                _ => Err(self.unexpected(c, "a digit after '-'")),
            },
            State::WithinInt => match c {
                '0'..='9' => Step::consume(),
                '.' => self.goto(State::BeforeFraction),
                'e' | 'E' => self.goto(State::BeforeExponentSign),
                _ => self.end_number(text, offset, false),
            },
            State::AfterInt => match c {
                '0'..='9' => Err(self.malformed(SyntaxError::LeadingZero)),
                '.' => self.goto(State::BeforeFraction),
                'e' | 'E' => self.goto(State::BeforeExponentSign),
                _ => self.end_number(text, offset, false),
            },
            State::BeforeFraction => match c {
                '0'..='9' => self.goto(State::WithinFraction),
                _ => Err(self.unexpected(c, "a digit after the decimal point")),
            },
            State::WithinFraction => match c {
                '0'..='9' => Step::consume(),
                'e' | 'E' => self.goto(State::BeforeExponentSign),
                _ => self.end_number(text, offset, true),
            },
            State::BeforeExponentSign => match c {
                '+' | '-' => self.goto(State::BeforeExponent),
                '0'..='9' => self.goto(State::WithinExponent),
                _ => Err(self.unexpected(c, "a sign or digit in the exponent")),
            },
            State::BeforeExponent => match c {
                '0'..='9' => self.goto(State::WithinExponent),
                _ => Err(self.unexpected(c, "a digit in the exponent")),
            },
            State::WithinExponent => match c {
                '0'..='9' => Step::consume(),
                _ => self.end_number(text, offset, true),
            },

            State::AfterDocument => Err(self.malformed(SyntaxError::TrailingCharacters(c))),
        }
    }

    fn goto(&mut self, state: State) -> Stepped<S::Error> {
        self.state = state;
        Step::consume()
    }

    /// Where control goes once the current value is complete.
    fn pop_return(&mut self) -> State {
        self.stack.pop().unwrap_or(State::AfterDocument)
    }

    /// Dispatches the first character of a value. `ret` is the state to
    /// return to once the value is complete; `bare` marks a string that is
    /// the whole document.
    fn begin_value(&mut self, c: char, offset: usize, ret: State, bare: bool) -> Stepped<S::Error> {
        let next = match c {
            '{' => {
                self.stack.push(ret);
                self.state = State::BeforeInitialKey;
                return Step::consume_then(self.sink.begin_object());
            }
            '[' => {
                self.stack.push(ret);
                self.state = State::BeforeInitialElement;
                return Step::consume_then(self.sink.begin_array());
            }
            '"' => {
                self.begin_token(offset + 1);
                if bare { State::String } else { State::InsideString }
            }
            '-' => {
                self.begin_token(offset);
                State::BeforeInt
            }
            '0' => {
                self.begin_token(offset);
                State::AfterInt
            }
            '1'..='9' => {
                self.begin_token(offset);
                State::WithinInt
            }
            'f' => State::F,
            't' => State::T,
            'n' => State::N,
            _ => return Err(self.unexpected(c, "a value")),
        };
        self.stack.push(ret);
        self.goto(next)
    }

    fn begin_key(&mut self, offset: usize) -> Stepped<S::Error> {
        self.stack.push(State::BeforeNameSeparator);
        self.begin_token(offset + 1);
        self.goto(State::InsideString)
    }

    fn begin_token(&mut self, start: usize) {
        debug_assert!(self.scratch.is_none(), "scratch outlived its token");
        self.token_start = start;
        self.scratch = None;
        self.string_begun = false;
    }

    fn close_object(&mut self) -> Stepped<S::Error> {
        self.state = self.pop_return();
        Step::consume_then(self.sink.end_object())
    }

    fn close_array(&mut self) -> Stepped<S::Error> {
        self.state = self.pop_return();
        Step::consume_then(self.sink.end_array())
    }

    fn literal(&mut self, c: char, literal: &'static str, expected: char, next: State) -> Stepped<S::Error> {
        if c == expected {
            self.goto(next)
        } else {
            Err(self.malformed(SyntaxError::LiteralMismatch { literal, expected, found: c }))
        }
    }

    fn string_char(&mut self, c: char, text: &str, offset: usize) -> Stepped<S::Error> {
        let bare = self.state == State::String;
        if let Some(high) = self.escape.pending_high_surrogate() {
            if c != '\\' {
                return Err(self.malformed(SyntaxError::UnpairedSurrogate(high)));
            }
        }

        match c {
            '"' => {
                let value = self.take_token(text, offset);
                self.state = self.pop_return();
                let flow = if bare {
                    self.sink.found_string(value)
                } else {
                    self.sink.end_string(value)
                };
                Step::consume_then(flow)
            }
            '\\' => {
                self.stash(text, offset);
                self.goto(if bare { State::StringEscape } else { State::InsideStringEscape })
            }
            c if c < ' ' => Err(self.malformed(SyntaxError::ControlCharacter(c))),
            _ => Step::consume(),
        }
    }

    fn escape_char(&mut self, c: char, offset: usize) -> Stepped<S::Error> {
        let bare = self.state == State::StringEscape;
        if let Some(high) = self.escape.pending_high_surrogate() {
            if c != 'u' {
                return Err(self.malformed(SyntaxError::UnpairedSurrogate(high)));
            }
        }

        let decoded = match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                self.escape.begin();
                return self.goto(if bare { State::StringUnicode } else { State::InsideStringUnicode });
            }
            _ => return Err(self.malformed(SyntaxError::InvalidEscape(c))),
        };
        self.scratch.get_or_insert_with(String::new).push(decoded);
        self.token_start = offset + c.len_utf8();
        self.goto(if bare { State::String } else { State::InsideString })
    }

    fn unicode_char(&mut self, c: char, offset: usize) -> Stepped<S::Error> {
        let bare = self.state == State::StringUnicode;
        match self.escape.feed(c).map_err(|reason| self.malformed(reason))? {
            Decoded::Incomplete => return Step::consume(),
            Decoded::HighSurrogate => {}
            Decoded::Char(ch) => self.scratch.get_or_insert_with(String::new).push(ch),
        }
        self.token_start = offset + c.len_utf8();
        self.goto(if bare { State::String } else { State::InsideString })
    }

    fn end_number(&mut self, text: &str, offset: usize, fraction: bool) -> Stepped<S::Error> {
        let value = self.take_token(text, offset);
        self.state = self.pop_return();
        let flow = if fraction {
            self.sink.found_fraction(value)
        } else {
            self.sink.found_integer(value)
        };
        Step::retain_then(flow)
    }

    /// The current token: a slice of `text` if nothing was copied yet,
    /// otherwise the scratch buffer with the uncopied tail appended.
    fn take_token<'t>(&mut self, text: &'t str, end: usize) -> Cow<'t, str> {
        let tail = &text[self.token_start..end];
        match self.scratch.take() {
            None => Cow::Borrowed(tail),
            Some(mut owned) => {
                owned.push_str(tail);
                Cow::Owned(owned)
            }
        }
    }

    /// Copies the uncopied part of the current token into the scratch buffer.
    fn stash(&mut self, text: &str, end: usize) {
        let tail = &text[self.token_start..end];
        if !tail.is_empty() {
            self.scratch.get_or_insert_with(String::new).push_str(tail);
        }
        self.token_start = end;
    }

    /// Saves or reports the part of an unfinished token that lies in the
    /// chunk that just ran out.
    fn end_of_chunk(&mut self, text: &str) -> Result<Option<Pending<S::Error>>, ParseError<S::Error>> {
        let end = text.len();
        let streamed = self.options.string_value_mode == StringValueMode::Streamed;
        match self.state {
            State::InsideString if streamed => {
                let piece = self.take_token(text, end);
                self.report_piece(piece)
            }
            State::InsideStringEscape | State::InsideStringUnicode if streamed => match self.scratch.take() {
                Some(piece) => self.report_piece(Cow::Owned(piece)),
                None => Ok(None),
            },
            State::String | State::InsideString => {
                self.stash(text, end);
                Ok(None)
            }
            state if state.in_number() => {
                self.stash(text, end);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn report_piece(&mut self, piece: Cow<'_, str>) -> Result<Option<Pending<S::Error>>, ParseError<S::Error>> {
        if piece.is_empty() {
            return Ok(None);
        }
        let flow = if self.string_begun {
            self.sink.continue_string(piece)
        } else {
            self.string_begun = true;
            self.sink.begin_string(piece)
        };
        signal(flow)
    }

    fn unexpected(&self, found: char, expected: &'static str) -> ParseError<S::Error> {
        self.malformed(SyntaxError::UnexpectedCharacter { found, expected })
    }
}
