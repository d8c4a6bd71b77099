//! CSS Syntax Level 3 tokenization.
//!
//! The core is the pure function [`tokenize_one`]: `(source, location) ->
//! (token, next_location)`. It never fails — the worst outcome is a
//! `bad_string` / `bad_url` token; the tokenizer itself never errors.
//! [`Lexer`] wraps it with the small lookahead buffer
//! every consumer of the tokenizer actually needs (the CSS parser peeks past
//! whitespace to decide between a qualified rule and an at-rule, the
//! selector parser peeks for combinators, etc.) the same way
//! `gosub_css3::tokenizer::Tokenizer` caches tokens behind `position` to
//! support `lookahead`/`reconsume`.

use crate::location::{Location, MAX_LOCATION};
use crate::token::{NumericValue, Token, TokenData, TokenTag};
use crate::unicode::UnicodeChar;

#[inline]
fn char_len(c: char) -> usize {
    c.len_utf8()
}

/// Reads the raw (unpreprocessed) char at a byte offset, for lookahead that
/// must see the literal source (e.g. detecting `/*`).
fn raw_char_at(s: &str, pos: usize) -> Option<char> {
    s.get(pos..)?.chars().next()
}

fn raw_slice_matches(s: &str, pos: usize, needle: &str) -> bool {
    s.get(pos..pos + needle.len()).is_some_and(|slice| slice == needle)
}

/// One "preprocessed" input code point: NUL becomes U+FFFD, `\r\n`/`\r`/`\f`
/// normalize to `\n`. Returns the
/// effective character and how many raw bytes it consumed.
fn next_preprocessed(s: &str, pos: usize) -> Option<(char, usize)> {
    let c = raw_char_at(s, pos)?;
    let len = char_len(c);
    match c {
        UnicodeChar::NULL => Some((UnicodeChar::REPLACEMENT_CHARACTER, len)),
        '\r' => {
            if raw_char_at(s, pos + len) == Some('\n') {
                Some(('\n', len + 1))
            } else {
                Some(('\n', len))
            }
        }
        '\u{000C}' => Some(('\n', len)),
        other => Some((other, len)),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-' || (c as u32) >= 0x80
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{e}'..='\u{1f}' | '\u{7f}')
}

/// Two code points starting at `pos` form a valid escape (`\` not followed by
/// a newline).
fn starts_valid_escape(s: &str, pos: usize) -> bool {
    match next_preprocessed(s, pos) {
        Some(('\\', len)) => !matches!(next_preprocessed(s, pos + len), Some(('\n', _)) | None),
        _ => false,
    }
}

/// Three code points starting at `pos` would start an ident sequence.
fn starts_ident_sequence(s: &str, pos: usize) -> bool {
    match next_preprocessed(s, pos) {
        Some(('-', len)) => {
            let p2 = pos + len;
            match next_preprocessed(s, p2) {
                Some(('-', _)) => true,
                Some((c, _)) if is_ident_start(c) => true,
                _ => starts_valid_escape(s, p2),
            }
        }
        Some((c, _)) if is_ident_start(c) => true,
        Some(('\\', _)) => starts_valid_escape(s, pos),
        _ => false,
    }
}

/// Three code points starting at `pos` would start a number.
fn starts_number(s: &str, pos: usize) -> bool {
    let (c, len) = match next_preprocessed(s, pos) {
        Some(v) => v,
        None => return false,
    };
    match c {
        '+' | '-' => match next_preprocessed(s, pos + len) {
            Some((d, _)) if d.is_ascii_digit() => true,
            Some(('.', dl)) => matches!(next_preprocessed(s, pos + len + dl), Some((d2, _)) if d2.is_ascii_digit()),
            _ => false,
        },
        '.' => matches!(next_preprocessed(s, pos + len), Some((d, _)) if d.is_ascii_digit()),
        d if d.is_ascii_digit() => true,
        _ => false,
    }
}

/// Consumes one escape sequence (`\` already known to start a valid escape)
/// and returns the resolved character plus the new position.
fn consume_escape(s: &str, pos: usize) -> (char, usize) {
    let (bs, bs_len) = next_preprocessed(s, pos).expect("caller checked starts_valid_escape");
    debug_assert_eq!(bs, '\\');
    let mut p = pos + bs_len;
    match next_preprocessed(s, p) {
        Some((c, len)) if c.is_ascii_hexdigit() => {
            let mut hex = String::new();
            hex.push(c);
            p += len;
            while hex.len() < 6 {
                match next_preprocessed(s, p) {
                    Some((h, hl)) if h.is_ascii_hexdigit() => {
                        hex.push(h);
                        p += hl;
                    }
                    _ => break,
                }
            }
            // consume one trailing whitespace code point, if present
            if let Some((w, wl)) = next_preprocessed(s, p) {
                if w.is_whitespace() {
                    p += wl;
                }
            }
            let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
            let resolved = if code == 0 || code > 0x10FFFF || (0xD800..=0xDFFF).contains(&code) {
                UnicodeChar::REPLACEMENT_CHARACTER
            } else {
                char::from_u32(code).unwrap_or(UnicodeChar::REPLACEMENT_CHARACTER)
            };
            (resolved, p)
        }
        Some((c, len)) => (c, p + len),
        None => (UnicodeChar::REPLACEMENT_CHARACTER, p),
    }
}

/// Consumes an ident sequence (escapes resolved), per CSS Syntax §4.3.11.
fn consume_ident_sequence(s: &str, pos: usize) -> (String, usize) {
    let mut out = String::new();
    let mut p = pos;
    loop {
        match next_preprocessed(s, p) {
            Some(('\\', _)) if starts_valid_escape(s, p) => {
                let (c, np) = consume_escape(s, p);
                out.push(c);
                p = np;
            }
            Some((c, len)) if is_ident_char(c) => {
                out.push(c);
                p += len;
            }
            _ => break,
        }
    }
    (out, p)
}

struct NumberParts {
    value: f64,
    looks_integer: bool,
    int_value: Option<i64>,
}

/// Consumes a number per CSS Syntax §4.3.13 (sign, digits, fraction,
/// exponent) and returns its decoded value.
fn consume_number(s: &str, pos: usize) -> (NumberParts, usize) {
    let mut p = pos;
    let mut repr = String::new();
    let mut has_dot_or_exp = false;

    if let Some((c @ ('+' | '-'), len)) = next_preprocessed(s, p) {
        repr.push(c);
        p += len;
    }
    while let Some((c, len)) = next_preprocessed(s, p) {
        if !c.is_ascii_digit() {
            break;
        }
        repr.push(c);
        p += len;
    }
    if let Some(('.', dot_len)) = next_preprocessed(s, p) {
        if matches!(next_preprocessed(s, p + dot_len), Some((d, _)) if d.is_ascii_digit()) {
            has_dot_or_exp = true;
            repr.push('.');
            p += dot_len;
            while let Some((c, len)) = next_preprocessed(s, p) {
                if !c.is_ascii_digit() {
                    break;
                }
                repr.push(c);
                p += len;
            }
        }
    }
    if let Some((e @ ('e' | 'E'), e_len)) = next_preprocessed(s, p) {
        let mut look = p + e_len;
        let mut sign = String::new();
        if let Some((sc @ ('+' | '-'), sl)) = next_preprocessed(s, look) {
            sign.push(sc);
            look += sl;
        }
        if matches!(next_preprocessed(s, look), Some((d, _)) if d.is_ascii_digit()) {
            has_dot_or_exp = true;
            repr.push(e);
            repr.push_str(&sign);
            p = look;
            while let Some((c, len)) = next_preprocessed(s, p) {
                if !c.is_ascii_digit() {
                    break;
                }
                repr.push(c);
                p += len;
            }
        }
    }

    let value: f64 = repr.parse().unwrap_or(0.0);
    let looks_integer = !has_dot_or_exp;
    let int_value = if looks_integer { repr.parse::<i64>().ok() } else { None };

    (
        NumberParts {
            value,
            looks_integer,
            int_value,
        },
        p,
    )
}

fn consume_whitespace(s: &str, pos: usize) -> usize {
    let mut p = pos;
    while let Some((c, len)) = next_preprocessed(s, p) {
        if c == ' ' || c == '\t' || c == '\n' {
            p += len;
        } else {
            break;
        }
    }
    p
}

fn consume_comment(s: &str, pos: usize) -> usize {
    // caller has verified the token starts with "/*"
    let mut p = pos + 2;
    loop {
        match next_preprocessed(s, p) {
            None => break,
            Some(('*', len)) if raw_char_at(s, p + len) == Some('/') => {
                p += len + 1;
                break;
            }
            Some((_, len)) => p += len,
        }
    }
    p
}

fn consume_string(s: &str, pos: usize, quote: char) -> (Token, usize) {
    let start = pos;
    let mut p = pos + char_len(quote);
    let mut out = String::new();
    loop {
        match next_preprocessed(s, p) {
            None => {
                return (
                    Token::new(TokenTag::String, Location::new(start as u32), TokenData::Text(out.into())),
                    p,
                );
            }
            Some((c, _)) if c == quote => {
                p += char_len(quote);
                return (
                    Token::new(TokenTag::String, Location::new(start as u32), TokenData::Text(out.into())),
                    p,
                );
            }
            Some(('\n', _)) => {
                // bad-string: do not consume the newline
                return (
                    Token::new(TokenTag::BadString, Location::new(start as u32), TokenData::Text(out.into())),
                    p,
                );
            }
            Some(('\\', len)) => {
                match next_preprocessed(s, p + len) {
                    Some(('\n', nl)) => {
                        // escaped newline: line continuation, contributes nothing
                        p += len + nl;
                    }
                    None => {
                        p += len;
                    }
                    _ => {
                        let (c, np) = consume_escape(s, p);
                        out.push(c);
                        p = np;
                    }
                }
            }
            Some((c, len)) => {
                out.push(c);
                p += len;
            }
        }
    }
}

/// Consumes URL-token content (after `url(`, whitespace already skipped),
/// per CSS Syntax §4.3.6.
fn consume_url(s: &str, pos: usize, start: usize) -> (Token, usize) {
    let mut p = pos;
    let mut out = String::new();
    loop {
        match next_preprocessed(s, p) {
            None => {
                return (
                    Token::new(TokenTag::Url, Location::new(start as u32), TokenData::Text(out.into())),
                    p,
                );
            }
            Some((')', len)) => {
                p += len;
                return (
                    Token::new(TokenTag::Url, Location::new(start as u32), TokenData::Text(out.into())),
                    p,
                );
            }
            Some((c, len)) if c.is_whitespace() => {
                let after_ws = consume_whitespace(s, p + len);
                match next_preprocessed(s, after_ws) {
                    Some((')', _)) => {
                        return (
                            Token::new(TokenTag::Url, Location::new(start as u32), TokenData::Text(out.into())),
                            after_ws + 1,
                        );
                    }
                    None => {
                        return (
                            Token::new(TokenTag::Url, Location::new(start as u32), TokenData::Text(out.into())),
                            after_ws,
                        );
                    }
                    _ => return consume_bad_url(s, after_ws, start),
                }
            }
            Some((c, _)) if matches!(c, '"' | '\'' | '(') || is_non_printable(c) => {
                return consume_bad_url(s, p, start);
            }
            Some(('\\', len)) => {
                if starts_valid_escape(s, p) {
                    let (c, np) = consume_escape(s, p);
                    out.push(c);
                    p = np;
                } else {
                    return consume_bad_url(s, p + len, start);
                }
            }
            Some((c, len)) => {
                out.push(c);
                p += len;
            }
        }
    }
}

fn consume_bad_url(s: &str, pos: usize, start: usize) -> (Token, usize) {
    let mut p = pos;
    loop {
        match next_preprocessed(s, p) {
            None => break,
            Some((')', len)) => {
                p += len;
                break;
            }
            Some(('\\', _)) if starts_valid_escape(s, p) => {
                let (_, np) = consume_escape(s, p);
                p = np;
            }
            Some((_, len)) => p += len,
        }
    }
    (Token::new(TokenTag::BadUrl, Location::new(start as u32), TokenData::None), p)
}

fn consume_ident_like(s: &str, pos: usize) -> (Token, usize) {
    let start = pos;
    let (name, mut p) = consume_ident_sequence(s, pos);

    if name.eq_ignore_ascii_case("url") && raw_char_at(s, p) == Some('(') {
        p += 1;
        let ws_end = consume_whitespace(s, p);
        match next_preprocessed(s, ws_end) {
            Some(('"' | '\'', _)) => {
                // stays a function token; the URL body is tokenized as a
                // string token afterwards. Whitespace between `(` and the
                // string is discarded, matching CSS Syntax §4.3.4.
                (
                    Token::new(TokenTag::Function, Location::new(start as u32), TokenData::Text(name.into())),
                    ws_end,
                )
            }
            _ => consume_url(s, ws_end, start),
        }
    } else if raw_char_at(s, p) == Some('(') {
        p += 1;
        (
            Token::new(TokenTag::Function, Location::new(start as u32), TokenData::Text(name.into())),
            p,
        )
    } else {
        (
            Token::new(TokenTag::Ident, Location::new(start as u32), TokenData::Text(name.into())),
            p,
        )
    }
}

fn numeric_token(parts: NumberParts, start: usize, s: &str, p: usize) -> (Token, usize) {
    let numeric = NumericValue {
        value: parts.value,
        looks_integer: parts.looks_integer,
        int_value: parts.int_value,
    };

    if let Some('%') = raw_char_at(s, p) {
        return (
            Token::new(TokenTag::Percentage, Location::new(start as u32), TokenData::Numeric(numeric)),
            p + 1,
        );
    }
    if starts_ident_sequence(s, p) {
        let (unit, np) = consume_ident_sequence(s, p);
        return (
            Token::new(
                TokenTag::Dimension,
                Location::new(start as u32),
                TokenData::Dimension {
                    numeric,
                    unit: unit.into(),
                    unit_location: Location::new(p as u32),
                },
            ),
            np,
        );
    }

    // Open question (c): an integer-shaped literal that overflows i64
    // degrades to a `Number` token rather than hard-failing.
    let tag = if parts.looks_integer && parts.int_value.is_some() {
        TokenTag::Integer
    } else {
        TokenTag::Number
    };
    (Token::new(tag, Location::new(start as u32), TokenData::Numeric(numeric)), p)
}

/// The pure tokenizer step: one token from `source` starting at `pos`
/// (a byte offset), and the offset to resume from.
#[must_use]
pub fn tokenize_one(source: &str, pos: Location) -> (Token, Location) {
    let s = source;
    let start = pos.offset() as usize;
    let p = start;

    if raw_slice_matches(s, p, "/*") {
        let np = consume_comment(s, p);
        return (
            Token::simple(TokenTag::Comments, Location::new(p as u32)),
            Location::new(np as u32),
        );
    }

    let (c, _len) = match next_preprocessed(s, p) {
        None => return (Token::eof(Location::new(p as u32)), Location::new(p as u32)),
        Some(v) => v,
    };

    if c.is_whitespace() {
        let np = consume_whitespace(s, p);
        return (Token::simple(TokenTag::Whitespace, Location::new(p as u32)), Location::new(np as u32));
    }

    match c {
        '"' | '\'' => {
            let (tok, np) = consume_string(s, p, c);
            (tok, Location::new(np as u32))
        }
        '#' => {
            let after = p + 1;
            if starts_ident_sequence(s, after) || is_ident_char_at(s, after) || starts_valid_escape(s, after) {
                let is_id = starts_ident_sequence(s, after);
                let (name, np) = consume_ident_sequence(s, after);
                let tag = if is_id { TokenTag::HashId } else { TokenTag::HashUnrestricted };
                (Token::new(tag, Location::new(p as u32), TokenData::Text(name.into())), Location::new(np as u32))
            } else {
                (Token::new(TokenTag::Delim, Location::new(p as u32), TokenData::Delim('#')), Location::new(after as u32))
            }
        }
        '(' => simple(TokenTag::LeftParen, p),
        ')' => simple(TokenTag::RightParen, p),
        '[' => simple(TokenTag::LeftSquare, p),
        ']' => simple(TokenTag::RightSquare, p),
        '{' => simple(TokenTag::LeftCurly, p),
        '}' => simple(TokenTag::RightCurly, p),
        ',' => simple(TokenTag::Comma, p),
        ':' => simple(TokenTag::Colon, p),
        ';' => simple(TokenTag::Semicolon, p),
        '+' | '.' => {
            if starts_number(s, p) {
                let (parts, np) = consume_number(s, p);
                numeric_token(parts, p, s, np)
            } else {
                (Token::new(TokenTag::Delim, Location::new(p as u32), TokenData::Delim(c)), Location::new((p + 1) as u32))
            }
        }
        '-' => {
            if starts_number(s, p) {
                let (parts, np) = consume_number(s, p);
                numeric_token(parts, p, s, np)
            } else if raw_slice_matches(s, p, "-->") {
                (Token::simple(TokenTag::Cdc, Location::new(p as u32)), Location::new((p + 3) as u32))
            } else if starts_ident_sequence(s, p) {
                let (tok, np) = consume_ident_like(s, p);
                (tok, Location::new(np as u32))
            } else {
                (Token::new(TokenTag::Delim, Location::new(p as u32), TokenData::Delim('-')), Location::new((p + 1) as u32))
            }
        }
        '<' => {
            if raw_slice_matches(s, p, "<!--") {
                (Token::simple(TokenTag::Cdo, Location::new(p as u32)), Location::new((p + 4) as u32))
            } else {
                (Token::new(TokenTag::Delim, Location::new(p as u32), TokenData::Delim('<')), Location::new((p + 1) as u32))
            }
        }
        '@' => {
            let after = p + 1;
            if starts_ident_sequence(s, after) {
                let (name, np) = consume_ident_sequence(s, after);
                (
                    Token::new(TokenTag::AtKeyword, Location::new(p as u32), TokenData::Text(name.into())),
                    Location::new(np as u32),
                )
            } else {
                (Token::new(TokenTag::Delim, Location::new(p as u32), TokenData::Delim('@')), Location::new(after as u32))
            }
        }
        '\\' => {
            if starts_valid_escape(s, p) {
                let (tok, np) = consume_ident_like(s, p);
                (tok, Location::new(np as u32))
            } else {
                (Token::new(TokenTag::Delim, Location::new(p as u32), TokenData::Delim('\\')), Location::new((p + 1) as u32))
            }
        }
        d if d.is_ascii_digit() => {
            let (parts, np) = consume_number(s, p);
            numeric_token(parts, p, s, np)
        }
        c if is_ident_start(c) => {
            let (tok, np) = consume_ident_like(s, p);
            (tok, Location::new(np as u32))
        }
        other => (Token::new(TokenTag::Delim, Location::new(p as u32), TokenData::Delim(other)), Location::new((p + _len) as u32)),
    }
}

fn is_ident_char_at(s: &str, pos: usize) -> bool {
    matches!(next_preprocessed(s, pos), Some((c, _)) if is_ident_char(c))
}

fn simple(tag: TokenTag, pos: usize) -> (Token, Location) {
    (Token::simple(tag, Location::new(pos as u32)), Location::new((pos + 1) as u32))
}

/// A buffered view over [`tokenize_one`] supporting the lookahead and
/// reconsume operations the parsers need, grounded on
/// `gosub_css3::tokenizer::Tokenizer`'s `tokens`/`position` cache.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    /// Offset to resume tokenizing from after each cached token; `resume_points[i]`
    /// is where `tokens[i+1]` begins.
    resume_points: Vec<Location>,
    /// Index into `tokens` of the next token to consume.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// # Errors
    /// Returns an error if `source` is larger than [`MAX_LOCATION`] bytes —
    /// the only hard tokenizer failure.
    pub fn new(source: &'a str) -> Result<Self, crate::error::SourceError> {
        if source.len() as u64 > u64::from(MAX_LOCATION) {
            return Err(crate::error::SourceError::TooLarge { len: source.len() });
        }
        Ok(Self {
            source,
            tokens: Vec::new(),
            resume_points: vec![Location::new(0)],
            position: 0,
        })
    }

    fn fill_to(&mut self, index: usize) {
        while self.tokens.len() <= index {
            let start = *self.resume_points.last().expect("resume_points seeded with one entry");
            let (tok, next) = tokenize_one(self.source, start);
            let tok_eof = tok.tag.is_eof();
            self.resume_points.push(next);
            self.tokens.push(tok);
            if tok_eof {
                // EOF repeats forever once reached; stop growing the buffer
                // past it by backfilling remaining slots with EOF clones.
                while self.tokens.len() <= index {
                    self.tokens.push(Token::eof(next));
                    self.resume_points.push(next);
                }
            }
        }
    }

    #[must_use]
    pub fn lookahead(&mut self, offset: usize) -> &Token {
        self.fill_to(self.position + offset);
        &self.tokens[self.position + offset]
    }

    /// Looks ahead past whitespace and comments, mirroring the
    /// skip-spaces flavour of lookahead the parsers need.
    #[must_use]
    pub fn lookahead_skip_spaces(&mut self, mut offset: usize) -> &Token {
        loop {
            let tag = self.lookahead(offset).tag;
            if matches!(tag, TokenTag::Whitespace | TokenTag::Comments) {
                offset += 1;
            } else {
                return &self.tokens[self.position + offset];
            }
        }
    }

    pub fn consume(&mut self) -> Token {
        self.fill_to(self.position);
        let tok = self.tokens[self.position].clone();
        self.position += 1;
        tok
    }

    pub fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    #[must_use]
    pub fn eof(&mut self) -> bool {
        self.lookahead(0).tag.is_eof()
    }

    #[must_use]
    pub fn current_location(&mut self) -> Location {
        self.lookahead(0).location
    }
}
