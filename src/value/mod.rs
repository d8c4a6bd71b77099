//! Value-level parsing: small transactional combinators over a
//! [`Sequence`], grounded on `gosub_css3::parser::value::parse_value` but
//! reshaped from "parse one node, whatever it turns out to be" into
//! typed, composable functions a property dispatcher can call in sequence
//! (`padding: <length> <length>?` reads as two calls to [`length`]).
//!
//! Every combinator here follows the same contract: on success it leaves
//! `seq` advanced past what it consumed (skipping any leading whitespace);
//! on failure it restores `seq` to exactly where it started, so callers
//! can freely try alternatives without hand-rolling rollback each time.

pub mod background;
pub mod color;

pub use color::Color;

use crate::ast::{ComponentAst, ComponentTag, Sequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Ex,
    Ch,
    Vh,
    Vw,
    VMin,
    VMax,
    Cm,
    Mm,
    Q,
    In,
    Pt,
    Pc,
}

impl LengthUnit {
    #[must_use]
    pub fn from_ident(s: &str) -> Option<Self> {
        Some(match_ascii_ci(
            s,
            &[
                ("px", LengthUnit::Px),
                ("em", LengthUnit::Em),
                ("rem", LengthUnit::Rem),
                ("ex", LengthUnit::Ex),
                ("ch", LengthUnit::Ch),
                ("vh", LengthUnit::Vh),
                ("vw", LengthUnit::Vw),
                ("vmin", LengthUnit::VMin),
                ("vmax", LengthUnit::VMax),
                ("cm", LengthUnit::Cm),
                ("mm", LengthUnit::Mm),
                ("q", LengthUnit::Q),
                ("in", LengthUnit::In),
                ("pt", LengthUnit::Pt),
                ("pc", LengthUnit::Pc),
            ],
        )?)
    }
}

fn match_ascii_ci<T: Copy>(s: &str, table: &[(&str, T)]) -> Option<T> {
    table.iter().find(|(name, _)| s.eq_ignore_ascii_case(name)).map(|(_, v)| *v)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthPercentage {
    Length(Length),
    Percentage(f64),
}

/// Succeeds iff the next non-space sibling is the ident `word`
/// (ASCII case-insensitive), consuming it.
pub fn keyword(ast: &ComponentAst, seq: &mut Sequence, word: &str) -> bool {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        if ast.tag(idx) == ComponentTag::Ident && ast.extra(idx).text().is_some_and(|t| t.eq_ignore_ascii_case(word)) {
            return true;
        }
    }
    *seq = save;
    false
}

/// Succeeds iff the next non-space sibling is one of `words`, consuming it
/// and returning which one matched (the table's own spelling, not the
/// source's).
pub fn one_of<'a>(ast: &ComponentAst, seq: &mut Sequence, words: &[&'a str]) -> Option<&'a str> {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        if ast.tag(idx) == ComponentTag::Ident {
            if let Some(text) = ast.extra(idx).text() {
                if let Some(&w) = words.iter().find(|w| text.eq_ignore_ascii_case(w)) {
                    return Some(w);
                }
            }
        }
    }
    *seq = save;
    None
}

pub fn comma(ast: &ComponentAst, seq: &mut Sequence) -> bool {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        if ast.tag(idx) == ComponentTag::Comma {
            return true;
        }
    }
    *seq = save;
    false
}

pub fn integer(ast: &ComponentAst, seq: &mut Sequence) -> Option<i64> {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        if ast.tag(idx) == ComponentTag::Integer {
            if let Some(v) = ast.extra(idx).numeric().and_then(|n| n.int_value) {
                return Some(v);
            }
        }
    }
    *seq = save;
    None
}

pub fn number(ast: &ComponentAst, seq: &mut Sequence) -> Option<f64> {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        if matches!(ast.tag(idx), ComponentTag::Number | ComponentTag::Integer) {
            if let Some(n) = ast.extra(idx).numeric() {
                return Some(n.value);
            }
        }
    }
    *seq = save;
    None
}

pub fn percentage(ast: &ComponentAst, seq: &mut Sequence) -> Option<f64> {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        if ast.tag(idx) == ComponentTag::Percentage {
            if let Some(n) = ast.extra(idx).numeric() {
                return Some(n.value);
            }
        }
    }
    *seq = save;
    None
}

pub fn length(ast: &ComponentAst, seq: &mut Sequence) -> Option<Length> {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        match ast.tag(idx) {
            ComponentTag::Dimension => {
                let n = ast.extra(idx).numeric()?;
                let (unit_text, _) = ast.extra(idx).unit()?;
                if let Some(unit) = LengthUnit::from_ident(unit_text) {
                    return Some(Length { value: n.value, unit });
                }
            }
            // `0` is a valid length with no unit, the one numeric literal
            // exempt from needing a dimension.
            ComponentTag::Integer | ComponentTag::Number => {
                let n = ast.extra(idx).numeric()?;
                if n.value == 0.0 {
                    return Some(Length { value: 0.0, unit: LengthUnit::Px });
                }
            }
            _ => {}
        }
    }
    *seq = save;
    None
}

pub fn length_percentage(ast: &ComponentAst, seq: &mut Sequence) -> Option<LengthPercentage> {
    if let Some(l) = length(ast, seq) {
        return Some(LengthPercentage::Length(l));
    }
    percentage(ast, seq).map(LengthPercentage::Percentage)
}

pub fn string(ast: &ComponentAst, seq: &mut Sequence) -> Option<Box<str>> {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        if ast.tag(idx) == ComponentTag::String {
            if let Some(s) = ast.extra(idx).text() {
                return Some(s.into());
            }
        }
    }
    *seq = save;
    None
}

/// A `url(...)` value. The tokenizer already folds `url(foo.png)` into a
/// single `Url` token; `url("foo.png")` (or the `src("foo.png")` alias)
/// instead tokenizes as a `Function` wrapping a string, which the CSS
/// parser turns into a `Function` component with one `String` child. The
/// function must be empty apart from that string.
pub fn url(ast: &ComponentAst, seq: &mut Sequence) -> Option<Box<str>> {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        match ast.tag(idx) {
            ComponentTag::Url => {
                if let Some(s) = ast.extra(idx).text() {
                    return Some(s.into());
                }
            }
            ComponentTag::Function if ast.extra(idx).text().is_some_and(|n| n.eq_ignore_ascii_case("url") || n.eq_ignore_ascii_case("src")) => {
                let mut inner = ast.children(idx);
                if let Some(value) = string(ast, &mut inner) {
                    inner.skip_spaces(ast);
                    if inner.empty() {
                        return Some(value);
                    }
                }
            }
            _ => {}
        }
    }
    *seq = save;
    None
}
