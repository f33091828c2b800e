/// Lexical and syntactic states of the push parser.
///
/// Literal states are named after the prefix already matched (`Fal` means
/// `fal` has been consumed); `False`, `True` and `Null` hold a complete word
/// waiting for the character that ends it. String states come in a bare
/// flavour (the string is the whole document) and an `Inside` flavour (member
/// name, member value or array element).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    BeforeDocument,
    BareValue,

    F,
    Fa,
    Fal,
    Fals,
    False,
    T,
    Tr,
    Tru,
    True,
    N,
    Nu,
    Nul,
    Null,

    BeforeInitialKey,
    BeforeKey,
    BeforeNameSeparator,
    BeforeValue,
    BeforeMemberSeparator,
    BeforeInitialElement,
    BeforeElement,
    BeforeElementSeparator,

    String,
    InsideString,
    StringEscape,
    InsideStringEscape,
    StringUnicode,
    InsideStringUnicode,

    BeforeInt,
    WithinInt,
    AfterInt,
    BeforeFraction,
    WithinFraction,
    BeforeExponentSign,
    BeforeExponent,
    WithinExponent,

    AfterDocument,
}

impl State {
    /// States in which a number token is being collected.
    pub fn in_number(self) -> bool {
        matches!(
            self,
            State::BeforeInt
                | State::WithinInt
                | State::AfterInt
                | State::BeforeFraction
                | State::WithinFraction
                | State::BeforeExponentSign
                | State::BeforeExponent
                | State::WithinExponent
        )
    }

    /// States that skip insignificant whitespace.
    pub fn skips_whitespace(self) -> bool {
        matches!(
            self,
            State::BeforeDocument
                | State::BareValue
                | State::BeforeInitialKey
                | State::BeforeKey
                | State::BeforeNameSeparator
                | State::BeforeValue
                | State::BeforeMemberSeparator
                | State::BeforeInitialElement
                | State::BeforeElement
                | State::BeforeElementSeparator
                | State::AfterDocument
        )
    }

    /// States inside a string, number or literal token.
    pub fn in_scalar(self) -> bool {
        !self.skips_whitespace()
    }

    /// Number states in which the text collected so far is a complete number.
    pub fn number_complete(self) -> bool {
        matches!(
            self,
            State::WithinInt | State::AfterInt | State::WithinFraction | State::WithinExponent
        )
    }

    /// What end of input interrupted, for diagnostics.
    pub fn expectation(self) -> &'static str {
        match self {
            State::BeforeDocument => "a JSON document",
            State::BareValue | State::BeforeValue | State::BeforeElement => "a value",
            State::F | State::Fa | State::Fal | State::Fals => "the rest of `false`",
            State::T | State::Tr | State::Tru => "the rest of `true`",
            State::N | State::Nu | State::Nul => "the rest of `null`",
            State::False | State::True | State::Null | State::AfterDocument => "nothing",
            State::BeforeInitialKey => "'\"' or '}'",
            State::BeforeKey => "'\"' to start an object member",
            State::BeforeNameSeparator => "':'",
            State::BeforeMemberSeparator => "',' or '}'",
            State::BeforeInitialElement => "a value or ']'",
            State::BeforeElementSeparator => "',' or ']'",
            State::String
            | State::InsideString
            | State::StringEscape
            | State::InsideStringEscape
            | State::StringUnicode
            | State::InsideStringUnicode => "the closing '\"' of a string",
            State::BeforeInt
            | State::WithinInt
            | State::AfterInt
            | State::BeforeFraction
            | State::WithinFraction
            | State::BeforeExponentSign
            | State::BeforeExponent
            | State::WithinExponent => "the rest of a number",
        }
    }
}
