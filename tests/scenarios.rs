//! End-to-end scenarios exercising the public API together: tokenizer,
//! stylesheet parser, value/selector combinators, and the zml parser.

use cssfront::ast::ComponentTag;
use cssfront::parser::{parse_stylesheet, ParserConfig};
use cssfront::selector::{parse_selector_list, Combinator, Environment, NamespacePrefix, SimpleSelector};
use cssfront::token::NumericValue;
use cssfront::value::background::{parse_position, parse_repeat_style};
use cssfront::value::color::{parse_color, Color};
use cssfront::zml::{parse_zml_document, ZmlConfig};
use cssfront::ComponentAst;
use cssfront::{Extra, Sequence};

#[test]
fn qualified_rule_block_holds_one_declaration() {
    let out = parse_stylesheet("* { display: block; }", ParserConfig::default()).unwrap();
    assert!(out.ast.check_invariants());

    let mut top = out.ast.children(out.root);
    let rule = top.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(rule), ComponentTag::QualifiedRule);
    assert!(top.next(&out.ast).is_none());

    let mut prelude = out.ast.children(rule);
    let star = prelude.next_keep_spaces(&out.ast).unwrap();
    assert_eq!(out.ast.tag(star), ComponentTag::Delim);
    assert_eq!(out.ast.extra(star).delim(), Some('*'));
    let ws = prelude.next_keep_spaces(&out.ast).unwrap();
    assert_eq!(out.ast.tag(ws), ComponentTag::Whitespace);
    let block = prelude.next_keep_spaces(&out.ast).unwrap();
    assert_eq!(out.ast.tag(block), ComponentTag::SimpleBlockCurly);
    assert!(prelude.next_keep_spaces(&out.ast).is_none());

    let mut block_children = out.ast.children(block);
    let decl = block_children.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(decl), ComponentTag::Declaration);
    assert!(block_children.next(&out.ast).is_none());

    let mut decl_children = out.ast.children(decl);
    let name = decl_children.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(name), ComponentTag::Ident);
    assert_eq!(out.ast.extra(name).text(), Some("display"));
    let colon = decl_children.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(colon), ComponentTag::Colon);
    let value = decl_children.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(value), ComponentTag::Ident);
    assert_eq!(out.ast.extra(value).text(), Some("block"));
    assert!(decl_children.next(&out.ast).is_none());

    // Re-running `color` on the declaration's value must reject it (wrong
    // grammar) without moving the cursor.
    let mut value_seq = Sequence::new(value, colon_end(&out.ast, decl));
    let before = value_seq;
    assert!(parse_color(&out.ast, &mut value_seq).is_none());
    assert_eq!(value_seq, before);
}

fn colon_end(ast: &ComponentAst, decl: u32) -> u32 {
    ast.next_sibling(decl)
}

#[test]
fn hex_color_forms() {
    assert_eq!(color_of("#abc"), Color::Rgba { r: 0xaa, g: 0xbb, b: 0xcc, a: 0xff });
    assert_eq!(color_of("#abcd"), Color::Rgba { r: 0xaa, g: 0xbb, b: 0xcc, a: 0xdd });
    assert_eq!(color_of("#123456"), Color::Rgba { r: 0x12, g: 0x34, b: 0x56, a: 0xff });
    assert_eq!(color_of("#12345678"), Color::Rgba { r: 0x12, g: 0x34, b: 0x56, a: 0x78 });
}

fn color_of(source: &str) -> Color {
    let out = parse_stylesheet(&format!("a{{x:{source}}}"), ParserConfig::default()).unwrap();
    let decl = find_first(&out.ast, out.root, ComponentTag::Declaration).unwrap();
    let mut value = out.ast.children(decl);
    value.next(&out.ast); // ident
    value.next(&out.ast); // colon
    parse_color(&out.ast, &mut value).unwrap()
}

/// Depth-first search for the first component with the given tag, used by
/// tests that only care about one declaration buried inside a stylesheet.
fn find_first(ast: &ComponentAst, root: u32, tag: ComponentTag) -> Option<u32> {
    if ast.tag(root) == tag {
        return Some(root);
    }
    if !ast.tag(root).is_structural() {
        return None;
    }
    let mut seq = ast.children(root);
    while let Some(child) = seq.next_keep_spaces(ast) {
        if let Some(found) = find_first(ast, child, tag) {
            return Some(found);
        }
    }
    None
}

#[test]
fn background_repeat_stops_at_invalid_keyword() {
    let mut ast = ComponentAst::new();
    ast.add_basic(ComponentTag::Ident, cssfront::Location::new(0), Extra::Text("repeat-x".into()));
    ast.add_basic(ComponentTag::Whitespace, cssfront::Location::new(8), Extra::None);
    let invalid = ast.add_basic(ComponentTag::Ident, cssfront::Location::new(9), Extra::Text("invalid".into()));
    let mut seq = Sequence::new(0, ast.len());

    let style = parse_repeat_style(&ast, &mut seq).unwrap();
    assert!(matches!(style.x, cssfront::value::background::Repeat::Repeat));
    assert!(matches!(style.y, cssfront::value::background::Repeat::NoRepeat));

    seq.skip_spaces(&ast);
    assert_eq!(seq.start, invalid);
}

#[test]
fn background_position_edge_offset_and_single_keyword_forms() {
    let mut ast = ComponentAst::new();
    ast.add_basic(ComponentTag::Ident, cssfront::Location::new(0), Extra::Text("left".into()));
    ast.add_basic(ComponentTag::Whitespace, cssfront::Location::new(4), Extra::None);
    ast.add_basic(ComponentTag::Dimension, cssfront::Location::new(5), Extra::Dimension {
        numeric: NumericValue { value: 20.0, looks_integer: true, int_value: Some(20) },
        unit: "px".into(),
        unit_location: cssfront::Location::new(7),
    });
    ast.add_basic(ComponentTag::Whitespace, cssfront::Location::new(9), Extra::None);
    ast.add_basic(ComponentTag::Ident, cssfront::Location::new(10), Extra::Text("bottom".into()));
    ast.add_basic(ComponentTag::Whitespace, cssfront::Location::new(16), Extra::None);
    ast.add_basic(ComponentTag::Percentage, cssfront::Location::new(17), Extra::Numeric(NumericValue { value: 50.0, looks_integer: true, int_value: Some(50) }));
    let mut seq = Sequence::new(0, ast.len());

    let pos = parse_position(&ast, &mut seq).unwrap();
    assert!(matches!(pos.x, cssfront::value::background::PositionAxis::EdgeOffset(cssfront::value::background::EdgeName::Left, _)));
    assert!(matches!(pos.y, cssfront::value::background::PositionAxis::EdgeOffset(cssfront::value::background::EdgeName::Bottom, _)));

    let mut ast2 = ComponentAst::new();
    ast2.add_basic(ComponentTag::Ident, cssfront::Location::new(0), Extra::Text("left".into()));
    let mut seq2 = Sequence::new(0, ast2.len());
    let pos2 = parse_position(&ast2, &mut seq2).unwrap();
    assert!(matches!(pos2.x, cssfront::value::background::PositionAxis::Left));
    assert!(matches!(pos2.y, cssfront::value::background::PositionAxis::Center));
}

#[test]
fn three_compound_selectors_with_descendant_and_child_combinators() {
    let mut ast = ComponentAst::new();
    ast.add_basic(ComponentTag::Ident, cssfront::Location::new(0), Extra::Text("h1".into()));
    ast.add_basic(ComponentTag::Whitespace, cssfront::Location::new(2), Extra::None);
    ast.add_basic(ComponentTag::Ident, cssfront::Location::new(3), Extra::Text("h2".into()));
    ast.add_basic(ComponentTag::Whitespace, cssfront::Location::new(5), Extra::None);
    ast.add_basic(ComponentTag::Delim, cssfront::Location::new(6), Extra::Delim('>'));
    ast.add_basic(ComponentTag::Whitespace, cssfront::Location::new(7), Extra::None);
    ast.add_basic(ComponentTag::Ident, cssfront::Location::new(8), Extra::Text("h3".into()));
    let seq = Sequence::new(0, ast.len());
    let mut env = Environment::new();

    let list = parse_selector_list(&ast, seq, &mut env);
    assert_eq!(list.selectors.len(), 1);
    let complex = &list.selectors[0];
    assert_eq!(complex.compounds.len(), 3);
    assert_eq!(complex.combinators, vec![Combinator::Descendant, Combinator::Child]);
    for compound in &complex.compounds {
        assert!(matches!(compound.simples[0], SimpleSelector::Type { namespace: NamespacePrefix::Implicit, .. }));
    }
    assert_eq!(complex.specificity(), cssfront::selector::Specificity(0, 0, 3));
}

#[test]
fn zml_wildcard_with_nested_text_and_inline_style_element() {
    let source = r#"* { p1 {} "Hello" p2 (decl: value !important;) { p3[a=b] #id {} } }"#;
    let out = parse_zml_document(source, ZmlConfig::default()).unwrap();
    assert_eq!(out.ast.tag(out.root), ComponentTag::ZmlDocument);

    let mut doc = out.ast.children(out.root);
    let element = doc.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(element), ComponentTag::ZmlElement);
    assert!(doc.next(&out.ast).is_none());

    let children = find_first(&out.ast, element, ComponentTag::ZmlChildren).unwrap();
    let mut kids = out.ast.children(children);
    let p1 = kids.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(p1), ComponentTag::ZmlElement);
    let text = kids.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(text), ComponentTag::ZmlTextElement);
    let p2 = kids.next(&out.ast).unwrap();
    assert_eq!(out.ast.tag(p2), ComponentTag::ZmlElement);
    assert!(kids.next(&out.ast).is_none());

    assert!(find_first(&out.ast, p2, ComponentTag::ZmlStyles).is_some());
    assert!(find_first(&out.ast, p2, ComponentTag::ZmlAttribute).is_some());
}

#[test]
fn zml_inline_style_before_features_is_rejected() {
    // Scenario 6's element `p2 (decl: value !important;) { ... }`, with the
    // inline-style block swapped to precede its type feature instead of
    // following it.
    let source = r#"* { (decl: value !important;) p2 { p3[a=b] #id {} } }"#;
    let err = parse_zml_document(source, ZmlConfig::default()).unwrap_err();
    match err {
        cssfront::ParseFailure::Zml(e) => assert_eq!(e.cause, cssfront::ZmlCause::InlineStyleBlockBeforeFeatures),
        other => panic!("expected a zml failure, got {other:?}"),
    }
}
