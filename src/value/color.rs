//! `<color>` values: hex notation and the two keywords that don't name an
//! actual color (`currentcolor`, `transparent`). Named colors and the
//! `rgb()`/`hsl()` functions `gosub_css3::colors` supports are out of
//! scope here — see `DESIGN.md` for why `colors-transform` was dropped.

use crate::ast::{ComponentAst, ComponentTag, Sequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Rgba { r: u8, g: u8, b: u8, a: u8 },
    CurrentColor,
    Transparent,
}

/// Parses a `<color>`: a hash token's digits as 3/4/6/8-digit hex, or one
/// of the two non-hex color keywords.
///
/// Resolves open question (a): a hash token whose digit count doesn't
/// match any of the four valid hex forms does not become a color at all —
/// parsing falls through and returns `None`, leaving `seq` untouched so a
/// caller can still try the token as something else (or report it as an
/// unrecognized value).
pub fn parse_color(ast: &ComponentAst, seq: &mut Sequence) -> Option<Color> {
    let save = *seq;
    seq.skip_spaces(ast);
    let Some(idx) = seq.next(ast) else {
        *seq = save;
        return None;
    };

    let resolved = match ast.tag(idx) {
        ComponentTag::HashId | ComponentTag::HashUnrestricted => ast.extra(idx).text().and_then(|digits| parse_hex_digits(digits)),
        ComponentTag::Ident => ast.extra(idx).text().and_then(|name| {
            if name.eq_ignore_ascii_case("currentcolor") {
                Some(Color::CurrentColor)
            } else if name.eq_ignore_ascii_case("transparent") {
                Some(Color::Transparent)
            } else {
                None
            }
        }),
        _ => None,
    };

    match resolved {
        Some(c) => Some(c),
        None => {
            *seq = save;
            None
        }
    }
}

fn hex_pair(s: &str, i: usize) -> Option<u8> {
    u8::from_str_radix(s.get(i..i + 2)?, 16).ok()
}

fn hex_nibble(s: &str, i: usize) -> Option<u8> {
    let d = u8::from_str_radix(s.get(i..i + 1)?, 16).ok()?;
    Some(d * 16 + d)
}

fn parse_hex_digits(s: &str) -> Option<Color> {
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match s.len() {
        3 => Some(Color::Rgba { r: hex_nibble(s, 0)?, g: hex_nibble(s, 1)?, b: hex_nibble(s, 2)?, a: 255 }),
        4 => Some(Color::Rgba { r: hex_nibble(s, 0)?, g: hex_nibble(s, 1)?, b: hex_nibble(s, 2)?, a: hex_nibble(s, 3)? }),
        6 => Some(Color::Rgba { r: hex_pair(s, 0)?, g: hex_pair(s, 2)?, b: hex_pair(s, 4)?, a: 255 }),
        8 => Some(Color::Rgba { r: hex_pair(s, 0)?, g: hex_pair(s, 2)?, b: hex_pair(s, 4)?, a: hex_pair(s, 6)? }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComponentAst, Extra};
    use crate::location::Location;

    fn seq_with_hash(text: &str, id_form: bool) -> (ComponentAst, Sequence) {
        let mut ast = ComponentAst::new();
        let tag = if id_form { ComponentTag::HashId } else { ComponentTag::HashUnrestricted };
        ast.add_basic(tag, Location::new(0), Extra::Text(text.into()));
        let seq = Sequence::new(0, ast.len());
        (ast, seq)
    }

    #[test]
    fn six_digit_hex_resolves() {
        let (ast, mut seq) = seq_with_hash("ff0099", true);
        let color = parse_color(&ast, &mut seq).unwrap();
        assert_eq!(color, Color::Rgba { r: 0xff, g: 0x00, b: 0x99, a: 255 });
        assert!(seq.empty());
    }

    #[test]
    fn three_digit_hex_expands_nibbles() {
        let (ast, mut seq) = seq_with_hash("0f0", true);
        let color = parse_color(&ast, &mut seq).unwrap();
        assert_eq!(color, Color::Rgba { r: 0x00, g: 0xff, b: 0x00, a: 255 });
    }

    #[test]
    fn wrong_digit_count_falls_through_without_consuming() {
        let (ast, mut seq) = seq_with_hash("12345", true);
        let before = seq;
        assert!(parse_color(&ast, &mut seq).is_none());
        assert_eq!(seq, before);
    }

    #[test]
    fn current_color_keyword() {
        let mut ast = ComponentAst::new();
        ast.add_basic(ComponentTag::Ident, Location::new(0), Extra::Text("currentColor".into()));
        let mut seq = Sequence::new(0, ast.len());
        assert_eq!(parse_color(&ast, &mut seq), Some(Color::CurrentColor));
    }
}
