use crate::location::Location;
use std::fmt;

/// The CSS Syntax Level 3 token tag set, plus nothing else —
/// payload data lives in [`TokenData`], not folded into the tag the way
/// `gosub_css3::tokenizer::TokenType` does (there, `TokenType::Ident(String)`
/// mixes tag and payload in one enum). Keeping them separate lets a
/// `Sequence` cursor compare tags cheaply without touching the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTag {
    Eof,
    Ident,
    Function,
    AtKeyword,
    HashId,
    HashUnrestricted,
    String,
    BadString,
    Url,
    BadUrl,
    Delim,
    Number,
    Integer,
    Percentage,
    Dimension,
    Whitespace,
    Comments,
    Cdo,
    Cdc,
    Colon,
    Semicolon,
    Comma,
    LeftParen,
    RightParen,
    LeftSquare,
    RightSquare,
    LeftCurly,
    RightCurly,
}

impl TokenTag {
    #[must_use]
    pub fn is_eof(self) -> bool {
        matches!(self, TokenTag::Eof)
    }
}

impl fmt::Display for TokenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A decoded numeric literal. Escapes, signs and exponents have already been
/// resolved by the tokenizer; only the final value (and whether it looked
/// like an integer) survives.
///
/// When an integer-shaped literal overflows, the tokenizer does not fail.
/// It emits a `Number` token with `looks_integer = true` and
/// `int_value = None`, rather than hard-failing or silently truncating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericValue {
    pub value: f64,
    /// True if the literal had no `.` fraction and no exponent.
    pub looks_integer: bool,
    /// `Some` only when `looks_integer` is true and the literal fit in an
    /// `i64` without loss.
    pub int_value: Option<i64>,
}

/// Per-tag payload. Most tags (`Colon`, `LeftCurly`, `Whitespace`, ...) carry
/// nothing and use `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenData {
    None,
    /// `ident`, `function`, `at_keyword`, `hash_id`, `hash_unrestricted`,
    /// `string`, `bad_string`, `url`, `bad_url`: the decoded text, with
    /// escapes already resolved and (for hash/url/string) quote or `#`
    /// markers stripped.
    Text(Box<str>),
    /// `delim`: the single codepoint.
    Delim(char),
    /// `number`, `integer`, `percentage`.
    Numeric(NumericValue),
    /// `dimension`: the numeric part plus the unit, and the unit's own
    /// location (needed because `length`/value parsers report errors at the
    /// unit, not at the start of the dimension).
    Dimension {
        numeric: NumericValue,
        unit: Box<str>,
        unit_location: Location,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tag: TokenTag,
    pub location: Location,
    pub data: TokenData,
}

impl Token {
    #[must_use]
    pub fn new(tag: TokenTag, location: Location, data: TokenData) -> Self {
        Self { tag, location, data }
    }

    #[must_use]
    pub fn simple(tag: TokenTag, location: Location) -> Self {
        Self::new(tag, location, TokenData::None)
    }

    #[must_use]
    pub fn eof(location: Location) -> Self {
        Self::simple(TokenTag::Eof, location)
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            TokenData::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn delim(&self) -> Option<char> {
        match &self.data {
            TokenData::Delim(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_delim(&self, c: char) -> bool {
        self.delim() == Some(c)
    }

    #[must_use]
    pub fn numeric(&self) -> Option<NumericValue> {
        match &self.data {
            TokenData::Numeric(n) => Some(*n),
            TokenData::Dimension { numeric, .. } => Some(*numeric),
            _ => None,
        }
    }

    #[must_use]
    pub fn unit(&self) -> Option<(&str, Location)> {
        match &self.data {
            TokenData::Dimension { unit, unit_location, .. } => Some((unit, *unit_location)),
            _ => None,
        }
    }

    /// Ascii case-insensitive ident match, as used throughout the value and
    /// selector parsers. Comparisons are ASCII case-insensitive except
    /// where noted.
    #[must_use]
    pub fn is_ident_ci(&self, name: &str) -> bool {
        self.tag == TokenTag::Ident && self.text().is_some_and(|t| t.eq_ignore_ascii_case(name))
    }
}
