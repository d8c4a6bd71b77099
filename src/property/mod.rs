//! Property dispatch: one parse function per supported property, each
//! driving the [`crate::value`] combinators over a declaration's value
//! sequence and producing a typed declared value.
//!
//! `gosub_css3` has no equivalent layer — its `Css3::parse_value` returns
//! one untyped `Node` regardless of which property it belongs to, leaving
//! shorthand expansion and validation to a sibling crate
//! (`gosub_styling::property_definitions`, a name-to-syntax-tree table
//! matched generically rather than one parse function per property). This
//! module takes the same "one entry per property name" shape but resolves
//! each entry to a dedicated parse function instead of a shared syntax
//! matcher, each responsible for its own grammar and its own "did I
//! consume everything" check.
//!
//! Every parse function shares the same contract: it owns the whole
//! declaration-value [`Sequence`], tries to read a CSS-wide keyword first,
//! and otherwise must consume the sequence exactly — trailing tokens make
//! the declaration invalid, matching `spec.md` §4.6 step 3.

use crate::ast::{ComponentAst, Sequence};
use crate::value::background::{self, BackgroundLayer};
use crate::value::color::{self, Color};
use crate::value::{self, Length, LengthPercentage};

/// The outer sum every property's declared value is wrapped in. Kept
/// separate from each property's own value type per the union-of-variants
/// design note: a property's grammar never needs to know about
/// `initial`/`inherit`/`unset`, so those live here instead of being baked
/// into every value enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Declared<T> {
    Initial,
    Inherit,
    Unset,
    Value(T),
}

fn css_wide_keyword<T>(ast: &ComponentAst, seq: &mut Sequence) -> Option<Declared<T>> {
    if value::keyword(ast, seq, "initial") {
        return Some(Declared::Initial);
    }
    if value::keyword(ast, seq, "inherit") {
        return Some(Declared::Inherit);
    }
    if value::keyword(ast, seq, "unset") {
        return Some(Declared::Unset);
    }
    None
}

/// Runs `parse` over the whole declaration value range, accepting a
/// CSS-wide keyword first; either way requires the sequence be fully
/// consumed (after trailing whitespace/comments) or the declaration is
/// invalid.
fn dispatch<T>(ast: &ComponentAst, mut seq: Sequence, parse: impl FnOnce(&ComponentAst, &mut Sequence) -> Option<T>) -> Option<Declared<T>> {
    if let Some(wide) = css_wide_keyword(ast, &mut seq) {
        seq.skip_spaces(ast);
        return seq.empty().then_some(wide);
    }
    let value = parse(ast, &mut seq)?;
    seq.skip_spaces(ast);
    seq.empty().then_some(Declared::Value(value))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trbl<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

/// Reads 1-4 values of `one` and expands them to `(top, right, bottom,
/// left)` per the standard CSS shorthand rule: one value sets all sides,
/// two sets (vertical, horizontal), three sets (top, horizontal, bottom),
/// four are explicit in TRBL order.
fn parse_trbl<T: Copy>(ast: &ComponentAst, seq: &mut Sequence, one: impl Fn(&ComponentAst, &mut Sequence) -> Option<T>) -> Option<Trbl<T>> {
    let a = one(ast, seq)?;
    let Some(b) = one(ast, seq) else {
        return Some(Trbl { top: a, right: a, bottom: a, left: a });
    };
    let Some(c) = one(ast, seq) else {
        return Some(Trbl { top: a, right: b, bottom: a, left: b });
    };
    let Some(d) = one(ast, seq) else {
        return Some(Trbl { top: a, right: b, bottom: c, left: b });
    };
    Some(Trbl { top: a, right: b, bottom: c, left: d })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthPercentageAuto {
    LengthPercentage(LengthPercentage),
    Auto,
}

fn length_percentage_auto(ast: &ComponentAst, seq: &mut Sequence) -> Option<LengthPercentageAuto> {
    if value::keyword(ast, seq, "auto") {
        return Some(LengthPercentageAuto::Auto);
    }
    value::length_percentage(ast, seq).map(LengthPercentageAuto::LengthPercentage)
}

pub fn parse_padding(ast: &ComponentAst, seq: Sequence) -> Option<Declared<Trbl<LengthPercentage>>> {
    dispatch(ast, seq, |ast, seq| parse_trbl(ast, seq, value::length_percentage))
}

pub fn parse_margin(ast: &ComponentAst, seq: Sequence) -> Option<Declared<Trbl<LengthPercentageAuto>>> {
    dispatch(ast, seq, |ast, seq| parse_trbl(ast, seq, length_percentage_auto))
}

pub fn parse_width(ast: &ComponentAst, seq: Sequence) -> Option<Declared<LengthPercentageAuto>> {
    dispatch(ast, seq, length_percentage_auto)
}

pub fn parse_height(ast: &ComponentAst, seq: Sequence) -> Option<Declared<LengthPercentageAuto>> {
    dispatch(ast, seq, length_percentage_auto)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderWidth {
    Thin,
    Medium,
    Thick,
    Length(Length),
}

fn border_width_one(ast: &ComponentAst, seq: &mut Sequence) -> Option<BorderWidth> {
    if let Some(w) = value::one_of(ast, seq, &["thin", "medium", "thick"]) {
        return Some(match w {
            "thin" => BorderWidth::Thin,
            "thick" => BorderWidth::Thick,
            _ => BorderWidth::Medium,
        });
    }
    value::length(ast, seq).map(BorderWidth::Length)
}

pub fn parse_border_width(ast: &ComponentAst, seq: Sequence) -> Option<Declared<Trbl<BorderWidth>>> {
    dispatch(ast, seq, |ast, seq| parse_trbl(ast, seq, border_width_one))
}

pub fn parse_border_color(ast: &ComponentAst, seq: Sequence) -> Option<Declared<Trbl<Color>>> {
    dispatch(ast, seq, |ast, seq| parse_trbl(ast, seq, color::parse_color))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    None,
    Hidden,
    Dotted,
    Dashed,
    Solid,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

fn border_style_one(ast: &ComponentAst, seq: &mut Sequence) -> Option<BorderStyle> {
    value::one_of(ast, seq, &["none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset"]).map(|w| match w {
        "none" => BorderStyle::None,
        "hidden" => BorderStyle::Hidden,
        "dotted" => BorderStyle::Dotted,
        "dashed" => BorderStyle::Dashed,
        "solid" => BorderStyle::Solid,
        "double" => BorderStyle::Double,
        "groove" => BorderStyle::Groove,
        "ridge" => BorderStyle::Ridge,
        "inset" => BorderStyle::Inset,
        _ => BorderStyle::Outset,
    })
}

pub fn parse_border_style(ast: &ComponentAst, seq: Sequence) -> Option<Declared<Trbl<BorderStyle>>> {
    dispatch(ast, seq, |ast, seq| parse_trbl(ast, seq, border_style_one))
}

pub fn parse_color_property(ast: &ComponentAst, seq: Sequence) -> Option<Declared<Color>> {
    dispatch(ast, seq, color::parse_color)
}

/// Hard ceiling on how many comma-separated `background` layers one
/// declaration may contribute, so a pathological `background: url(a), url(b), ...`
/// can't force unbounded work.
const MAX_BACKGROUND_LAYERS: usize = 64;

pub fn parse_background(ast: &ComponentAst, seq: Sequence) -> Option<Declared<Vec<BackgroundLayer>>> {
    dispatch(ast, seq, |ast, seq| {
        let layers = background::parse_layer_list(ast, seq, MAX_BACKGROUND_LAYERS);
        (!layers.is_empty()).then_some(layers)
    })
}

pub fn parse_background_image(ast: &ComponentAst, seq: Sequence) -> Option<Declared<background::Image>> {
    dispatch(ast, seq, background::parse_image)
}

pub fn parse_background_position(ast: &ComponentAst, seq: Sequence) -> Option<Declared<background::BackgroundPosition>> {
    dispatch(ast, seq, background::parse_position)
}

pub fn parse_background_repeat(ast: &ComponentAst, seq: Sequence) -> Option<Declared<background::RepeatStyle>> {
    dispatch(ast, seq, background::parse_repeat_style)
}

pub fn parse_background_attachment(ast: &ComponentAst, seq: Sequence) -> Option<Declared<background::Attachment>> {
    dispatch(ast, seq, background::parse_attachment)
}

pub fn parse_background_size(ast: &ComponentAst, seq: Sequence) -> Option<Declared<background::Size>> {
    dispatch(ast, seq, background::parse_size)
}

/// A dispatch table entry: a property name paired with the function that
/// knows how to parse its value. The CLI and tests look properties up by
/// name rather than hard-coding a match on every call site.
pub enum PropertyValue {
    Padding(Declared<Trbl<LengthPercentage>>),
    Margin(Declared<Trbl<LengthPercentageAuto>>),
    Width(Declared<LengthPercentageAuto>),
    Height(Declared<LengthPercentageAuto>),
    BorderWidth(Declared<Trbl<BorderWidth>>),
    BorderColor(Declared<Trbl<Color>>),
    BorderStyle(Declared<Trbl<BorderStyle>>),
    Color(Declared<Color>),
    Background(Declared<Vec<BackgroundLayer>>),
    BackgroundImage(Declared<background::Image>),
    BackgroundPosition(Declared<background::BackgroundPosition>),
    BackgroundRepeat(Declared<background::RepeatStyle>),
    BackgroundAttachment(Declared<background::Attachment>),
    BackgroundSize(Declared<background::Size>),
}

/// Looks up `name` (ASCII case-insensitive) in the supported-property
/// table and parses `seq` as that property's value. Returns `None` both
/// for an unsupported property name and for a recognized property whose
/// value doesn't parse — callers that need to tell those apart should
/// check the name against a property table of their own first.
pub fn parse_property(ast: &ComponentAst, name: &str, seq: Sequence) -> Option<PropertyValue> {
    let parse = match_ascii_ci(name)?;
    parse(ast, seq)
}

fn match_ascii_ci(name: &str) -> Option<fn(&ComponentAst, Sequence) -> Option<PropertyValue>> {
    const TABLE: &[(&str, fn(&ComponentAst, Sequence) -> Option<PropertyValue>)] = &[
        ("padding", |a, s| parse_padding(a, s).map(PropertyValue::Padding)),
        ("margin", |a, s| parse_margin(a, s).map(PropertyValue::Margin)),
        ("width", |a, s| parse_width(a, s).map(PropertyValue::Width)),
        ("height", |a, s| parse_height(a, s).map(PropertyValue::Height)),
        ("border-width", |a, s| parse_border_width(a, s).map(PropertyValue::BorderWidth)),
        ("border-color", |a, s| parse_border_color(a, s).map(PropertyValue::BorderColor)),
        ("border-style", |a, s| parse_border_style(a, s).map(PropertyValue::BorderStyle)),
        ("color", |a, s| parse_color_property(a, s).map(PropertyValue::Color)),
        ("background", |a, s| parse_background(a, s).map(PropertyValue::Background)),
        ("background-image", |a, s| parse_background_image(a, s).map(PropertyValue::BackgroundImage)),
        ("background-position", |a, s| parse_background_position(a, s).map(PropertyValue::BackgroundPosition)),
        ("background-repeat", |a, s| parse_background_repeat(a, s).map(PropertyValue::BackgroundRepeat)),
        ("background-attachment", |a, s| parse_background_attachment(a, s).map(PropertyValue::BackgroundAttachment)),
        ("background-size", |a, s| parse_background_size(a, s).map(PropertyValue::BackgroundSize)),
    ];
    TABLE.iter().find(|(n, _)| name.eq_ignore_ascii_case(n)).map(|(_, f)| *f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComponentAst, ComponentTag, Extra};
    use crate::location::Location;

    fn dimension(ast: &mut ComponentAst, value: f64, unit: &str) {
        use crate::token::NumericValue;
        ast.add_basic(
            ComponentTag::Dimension,
            Location::new(0),
            Extra::Dimension { numeric: NumericValue { value, looks_integer: false, int_value: None }, unit: unit.into(), unit_location: Location::new(0) },
        );
    }

    fn ident(ast: &mut ComponentAst, text: &str) {
        ast.add_basic(ComponentTag::Ident, Location::new(0), Extra::Text(text.into()));
    }

    fn whitespace(ast: &mut ComponentAst) {
        ast.add_basic(ComponentTag::Whitespace, Location::new(0), Extra::None);
    }

    #[test]
    fn single_value_padding_expands_to_all_sides() {
        let mut ast = ComponentAst::new();
        dimension(&mut ast, 4.0, "px");
        let seq = Sequence::new(0, ast.len());
        let Declared::Value(trbl) = parse_padding(&ast, seq).unwrap() else {
            panic!("expected a value");
        };
        assert_eq!(trbl.top, trbl.right);
        assert_eq!(trbl.right, trbl.bottom);
        assert_eq!(trbl.bottom, trbl.left);
    }

    #[test]
    fn two_value_padding_splits_vertical_and_horizontal() {
        let mut ast = ComponentAst::new();
        dimension(&mut ast, 4.0, "px");
        whitespace(&mut ast);
        dimension(&mut ast, 8.0, "px");
        let seq = Sequence::new(0, ast.len());
        let Declared::Value(trbl) = parse_padding(&ast, seq).unwrap() else {
            panic!("expected a value");
        };
        assert_eq!(trbl.top, trbl.bottom);
        assert_eq!(trbl.left, trbl.right);
        assert_ne!(trbl.top, trbl.left);
    }

    #[test]
    fn inherit_keyword_short_circuits_the_grammar() {
        let mut ast = ComponentAst::new();
        ident(&mut ast, "inherit");
        let seq = Sequence::new(0, ast.len());
        assert_eq!(parse_width(&ast, seq), Some(Declared::Inherit));
    }

    #[test]
    fn trailing_garbage_invalidates_the_declaration() {
        let mut ast = ComponentAst::new();
        dimension(&mut ast, 4.0, "px");
        whitespace(&mut ast);
        ident(&mut ast, "bogus");
        let seq = Sequence::new(0, ast.len());
        assert!(parse_width(&ast, seq).is_none());
    }
}
