//! The `background` shorthand's composite sub-grammars: `<bg-image>`,
//! `<repeat-style>`, `<attachment>`, `<box>` (for both clip and origin),
//! `<bg-size>`, and the two-pass `<position>` algorithm (CSS Backgrounds
//! and Borders §3.9) that has to try the longer 3/4-value edge-offset form
//! before falling back to the 1/2-value form, since both can start with
//! the same keyword.
//!
//! `gosub_css3` has no background parser to ground this on directly; the
//! combinator style follows `super::{keyword, one_of, length_percentage}`
//! and the transactional-restore contract the rest of this module uses.

use super::{length_percentage, one_of, url, LengthPercentage};
use crate::ast::{ComponentAst, ComponentTag, Sequence};

#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    None,
    Url(Box<str>),
}

pub fn parse_image(ast: &ComponentAst, seq: &mut Sequence) -> Option<Image> {
    if super::keyword(ast, seq, "none") {
        return Some(Image::None);
    }
    url(ast, seq).map(Image::Url)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Repeat,
    Space,
    Round,
    NoRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatStyle {
    pub x: Repeat,
    pub y: Repeat,
}

pub fn parse_repeat_style(ast: &ComponentAst, seq: &mut Sequence) -> Option<RepeatStyle> {
    let save = *seq;
    if one_of(ast, seq, &["repeat-x"]).is_some() {
        return Some(RepeatStyle { x: Repeat::Repeat, y: Repeat::NoRepeat });
    }
    if one_of(ast, seq, &["repeat-y"]).is_some() {
        return Some(RepeatStyle { x: Repeat::NoRepeat, y: Repeat::Repeat });
    }
    let Some(first) = parse_one_repeat(ast, seq) else {
        *seq = save;
        return None;
    };
    let second = parse_one_repeat(ast, seq).unwrap_or(first);
    Some(RepeatStyle { x: first, y: second })
}

fn parse_one_repeat(ast: &ComponentAst, seq: &mut Sequence) -> Option<Repeat> {
    one_of(ast, seq, &["repeat", "space", "round", "no-repeat"]).map(|w| match w {
        "repeat" => Repeat::Repeat,
        "space" => Repeat::Space,
        "round" => Repeat::Round,
        _ => Repeat::NoRepeat,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Scroll,
    Fixed,
    Local,
}

pub fn parse_attachment(ast: &ComponentAst, seq: &mut Sequence) -> Option<Attachment> {
    one_of(ast, seq, &["scroll", "fixed", "local"]).map(|w| match w {
        "scroll" => Attachment::Scroll,
        "fixed" => Attachment::Fixed,
        _ => Attachment::Local,
    })
}

/// Shared by `background-clip` and `background-origin`; `background-clip`
/// additionally accepts `text`, which callers test for separately since it
/// has no meaning for `background-origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxEdge {
    BorderBox,
    PaddingBox,
    ContentBox,
}

pub fn parse_box_edge(ast: &ComponentAst, seq: &mut Sequence) -> Option<BoxEdge> {
    one_of(ast, seq, &["border-box", "padding-box", "content-box"]).map(|w| match w {
        "border-box" => BoxEdge::BorderBox,
        "padding-box" => BoxEdge::PaddingBox,
        _ => BoxEdge::ContentBox,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum SizeAxis {
    Auto,
    LengthPercentage(LengthPercentage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Size {
    Cover,
    Contain,
    Explicit { width: SizeAxis, height: SizeAxis },
}

pub fn parse_size(ast: &ComponentAst, seq: &mut Sequence) -> Option<Size> {
    let save = *seq;
    if let Some(w) = one_of(ast, seq, &["cover", "contain"]) {
        return Some(if w == "cover" { Size::Cover } else { Size::Contain });
    }
    let Some(width) = parse_size_axis(ast, seq) else {
        *seq = save;
        return None;
    };
    let height = parse_size_axis(ast, seq).unwrap_or(SizeAxis::Auto);
    Some(Size::Explicit { width, height })
}

fn parse_size_axis(ast: &ComponentAst, seq: &mut Sequence) -> Option<SizeAxis> {
    if super::keyword(ast, seq, "auto") {
        return Some(SizeAxis::Auto);
    }
    length_percentage(ast, seq).map(SizeAxis::LengthPercentage)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

impl Edge {
    fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Horizontal,
            Edge::Top | Edge::Bottom => Axis::Vertical,
            Edge::Center => Axis::Ambiguous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionAxis {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    Offset(LengthPercentage),
    /// The 3/4-value form: an offset measured from the named edge, e.g.
    /// `background-position: right 10px bottom 5px`.
    EdgeOffset(EdgeName, LengthPercentage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeName {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundPosition {
    pub x: PositionAxis,
    pub y: PositionAxis,
}

pub fn parse_position(ast: &ComponentAst, seq: &mut Sequence) -> Option<BackgroundPosition> {
    let save = *seq;
    if let Some(p) = try_edge_offset_position(ast, seq) {
        return Some(p);
    }
    *seq = save;
    try_simple_position(ast, seq)
}

struct EdgeTerm {
    edge: Edge,
    offset: Option<LengthPercentage>,
}

fn parse_edge_term(ast: &ComponentAst, seq: &mut Sequence) -> Option<EdgeTerm> {
    let word = one_of(ast, seq, &["left", "right", "top", "bottom", "center"])?;
    let edge = match word {
        "left" => Edge::Left,
        "right" => Edge::Right,
        "top" => Edge::Top,
        "bottom" => Edge::Bottom,
        _ => Edge::Center,
    };
    let offset = if edge == Edge::Center { None } else { length_percentage(ast, seq) };
    Some(EdgeTerm { edge, offset })
}

/// The 3/4-value form requires each term to name an edge keyword, and at
/// least one of them to carry its own offset — a bare length-percentage
/// paired with a keyword only ever appears in this form, never in the
/// plain 1/2-value form.
fn try_edge_offset_position(ast: &ComponentAst, seq: &mut Sequence) -> Option<BackgroundPosition> {
    let first = parse_edge_term(ast, seq)?;
    let second = parse_edge_term(ast, seq)?;
    if first.offset.is_none() && second.offset.is_none() {
        return None;
    }
    assign_axes(first.edge, first.offset, second.edge, second.offset)
}

fn assign_axes(e1: Edge, o1: Option<LengthPercentage>, e2: Edge, o2: Option<LengthPercentage>) -> Option<BackgroundPosition> {
    let mut x = None;
    let mut y = None;
    for (edge, offset) in [(e1, o1), (e2, o2)] {
        let slot = match edge.axis() {
            Axis::Horizontal => &mut x,
            Axis::Vertical => &mut y,
            Axis::Ambiguous => {
                if x.is_none() {
                    &mut x
                } else {
                    &mut y
                }
            }
        };
        if slot.is_some() {
            return None; // both terms claimed the same axis
        }
        *slot = Some(edge_to_axis(edge, offset));
    }
    Some(BackgroundPosition { x: x?, y: y? })
}

fn edge_to_axis(edge: Edge, offset: Option<LengthPercentage>) -> PositionAxis {
    match (edge, offset) {
        (Edge::Left, None) => PositionAxis::Left,
        (Edge::Right, None) => PositionAxis::Right,
        (Edge::Top, None) => PositionAxis::Top,
        (Edge::Bottom, None) => PositionAxis::Bottom,
        (Edge::Center, _) => PositionAxis::Center,
        (Edge::Left, Some(lp)) => PositionAxis::EdgeOffset(EdgeName::Left, lp),
        (Edge::Right, Some(lp)) => PositionAxis::EdgeOffset(EdgeName::Right, lp),
        (Edge::Top, Some(lp)) => PositionAxis::EdgeOffset(EdgeName::Top, lp),
        (Edge::Bottom, Some(lp)) => PositionAxis::EdgeOffset(EdgeName::Bottom, lp),
    }
}

enum SimpleTerm {
    Edge(Edge),
    Offset(LengthPercentage),
}

fn parse_simple_term(ast: &ComponentAst, seq: &mut Sequence) -> Option<SimpleTerm> {
    if let Some(word) = one_of(ast, seq, &["left", "right", "top", "bottom", "center"]) {
        return Some(SimpleTerm::Edge(match word {
            "left" => Edge::Left,
            "right" => Edge::Right,
            "top" => Edge::Top,
            "bottom" => Edge::Bottom,
            _ => Edge::Center,
        }));
    }
    length_percentage(ast, seq).map(SimpleTerm::Offset)
}

fn try_simple_position(ast: &ComponentAst, seq: &mut Sequence) -> Option<BackgroundPosition> {
    let save = *seq;
    let Some(first) = parse_simple_term(ast, seq) else {
        *seq = save;
        return None;
    };
    let second = parse_simple_term(ast, seq);

    let (first_axis, first_edge, first_offset) = simple_term_parts(first);
    let mut x = None;
    let mut y = None;
    place_simple(first_axis, first_edge, first_offset, &mut x, &mut y);

    if let Some(second) = second {
        let (second_axis, second_edge, second_offset) = simple_term_parts(second);
        if !place_simple(second_axis, second_edge, second_offset, &mut x, &mut y) {
            *seq = save;
            return None;
        }
    } else if y.is_none() {
        y = Some(PositionAxis::Center);
    }

    Some(BackgroundPosition { x: x.unwrap_or(PositionAxis::Center), y: y.unwrap_or(PositionAxis::Center) })
}

fn simple_term_parts(term: SimpleTerm) -> (Axis, Option<Edge>, Option<LengthPercentage>) {
    match term {
        SimpleTerm::Edge(e) => (e.axis(), Some(e), None),
        SimpleTerm::Offset(lp) => (Axis::Ambiguous, None, Some(lp)),
    }
}

fn place_simple(axis: Axis, edge: Option<Edge>, offset: Option<LengthPercentage>, x: &mut Option<PositionAxis>, y: &mut Option<PositionAxis>) -> bool {
    let value = match (edge, offset) {
        (Some(e), _) => edge_to_axis(e, None),
        (None, Some(lp)) => PositionAxis::Offset(lp),
        (None, None) => return false,
    };
    let slot = match axis {
        Axis::Horizontal => x,
        Axis::Vertical => y,
        Axis::Ambiguous => {
            if x.is_none() {
                x
            } else {
                y
            }
        }
    };
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}

/// One `background-image`/`-position`/`-size`/`-repeat`/`-attachment`/
/// `-origin`/`-clip` layer; the shorthand property splits its value on
/// top-level commas and parses each slice with [`parse_layer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundLayer {
    pub image: Option<Image>,
    pub position: Option<BackgroundPosition>,
    pub size: Option<Size>,
    pub repeat: Option<RepeatStyle>,
    pub attachment: Option<Attachment>,
    pub origin: Option<BoxEdge>,
    pub clip: Option<BoxEdge>,
    pub color: Option<super::Color>,
}

/// Parses one comma-separated layer of the `background` shorthand. Order
/// among the components is free (per the shorthand's grammar) except that
/// `<bg-size>`, when present, must immediately follow `<position>`
/// separated by `/`.
pub fn parse_layer(ast: &ComponentAst, seq: &mut Sequence) -> Option<BackgroundLayer> {
    let mut layer = BackgroundLayer::default();
    let mut progress = true;
    while progress {
        progress = false;
        if layer.image.is_none() {
            if let Some(img) = parse_image(ast, seq) {
                layer.image = Some(img);
                progress = true;
                continue;
            }
        }
        if layer.position.is_none() {
            if let Some(pos) = parse_position(ast, seq) {
                layer.position = Some(pos);
                progress = true;
                let save = *seq;
                if slash(ast, seq) {
                    if let Some(size) = parse_size(ast, seq) {
                        layer.size = Some(size);
                    } else {
                        *seq = save;
                    }
                }
                continue;
            }
        }
        if layer.repeat.is_none() {
            if let Some(r) = parse_repeat_style(ast, seq) {
                layer.repeat = Some(r);
                progress = true;
                continue;
            }
        }
        if layer.attachment.is_none() {
            if let Some(a) = parse_attachment(ast, seq) {
                layer.attachment = Some(a);
                progress = true;
                continue;
            }
        }
        if layer.origin.is_none() {
            if let Some(b) = parse_box_edge(ast, seq) {
                layer.origin = Some(b);
                if layer.clip.is_none() {
                    layer.clip = Some(b);
                }
                progress = true;
                continue;
            }
        }
        if layer.color.is_none() {
            if let Some(c) = super::color::parse_color(ast, seq) {
                layer.color = Some(c);
                progress = true;
            }
        }
    }
    let had_any = layer.image.is_some()
        || layer.position.is_some()
        || layer.size.is_some()
        || layer.repeat.is_some()
        || layer.attachment.is_some()
        || layer.origin.is_some()
        || layer.color.is_some();
    had_any.then_some(layer)
}

fn slash(ast: &ComponentAst, seq: &mut Sequence) -> bool {
    let save = *seq;
    seq.skip_spaces(ast);
    if let Some(idx) = seq.next(ast) {
        if ast.tag(idx) == ComponentTag::Delim && ast.extra(idx).delim() == Some('/') {
            return true;
        }
    }
    *seq = save;
    false
}

/// Parses the full comma-separated `background` layer list, bounded so a
/// pathological input with thousands of commas cannot force unbounded
/// work — matches the layer-count ceiling `gosub_css3` doesn't enforce
/// anywhere, added here because a shorthand property is exactly where an
/// attacker-controlled stylesheet would try it.
pub fn parse_layer_list(ast: &ComponentAst, seq: &mut Sequence, max_layers: usize) -> Vec<BackgroundLayer> {
    let mut layers = Vec::new();
    loop {
        seq.skip_spaces(ast);
        if seq.empty() || layers.len() >= max_layers {
            break;
        }
        let Some(layer) = parse_layer(ast, seq) else { break };
        layers.push(layer);
        if !super::comma(ast, seq) {
            break;
        }
    }
    layers
}
