//! The zml document parser: a second top-level grammar sharing the CSS
//! tokenizer and [`ComponentAst`] but assembling them under a different
//! set of rules — elements with inline "features" (type/id/class/
//! attribute), an optional inline-style block, and nested children.
//!
//! `gosub_css3` has nothing resembling zml; this module is grounded
//! instead on the shape of `parser/mod.rs` in this crate (a struct wrapping
//! a [`Lexer`] and a [`ComponentAst`], one method per grammar production)
//! and reuses `parser::Parser::new_borrowed` for inline-style blocks so
//! declaration parsing is not duplicated.
//!
//! Unlike the CSS layer, this parser does not recover: the first
//! structural problem aborts the whole parse with a `(cause, location)`
//! diagnostic, matching `spec.md` §4.7/§7.

use crate::ast::{ComponentAst, ComponentTag, Extra};
use crate::error::{ParseFailure, ZmlCause, ZmlError};
use crate::location::Location;
use crate::parser::{Parser as CssParser, ParserConfig};
use crate::token::TokenTag;
use crate::tokenizer::Lexer;

/// Depth bounds for the zml grammar, analogous to
/// [`crate::parser::ParserConfig`]'s `max_block_depth` for the CSS layer.
#[derive(Debug, Clone)]
pub struct ZmlConfig {
    pub max_element_depth: u32,
    /// Bound on block/function nesting inside one inline-style block's own
    /// declaration values; independent of, and reset for, each block.
    pub max_inline_style_depth: u32,
}

impl Default for ZmlConfig {
    fn default() -> Self {
        Self { max_element_depth: 1000, max_inline_style_depth: 32 }
    }
}

pub struct ZmlOutput {
    pub ast: ComponentAst,
    pub root: u32,
}

struct ZmlParser<'a> {
    lexer: Lexer<'a>,
    ast: ComponentAst,
    config: ZmlConfig,
    element_depth: u32,
    /// Whether the feature just parsed (if any) was followed by a
    /// whitespace/comment token, which the next iteration of
    /// [`Self::parse_features`] consumes and checks against.
    last_feature_had_trailing_space: bool,
}

impl<'a> ZmlParser<'a> {
    fn new(lexer: Lexer<'a>, config: ZmlConfig) -> Self {
        Self { lexer, ast: ComponentAst::new(), config, element_depth: 0, last_feature_had_trailing_space: false }
    }

    fn fail(&mut self, cause: ZmlCause) -> ZmlError {
        ZmlError::new(cause, self.lexer_location())
    }

    fn fail_at(&self, cause: ZmlCause, location: Location) -> ZmlError {
        ZmlError::new(cause, location)
    }

    fn lexer_location(&mut self) -> Location {
        self.lexer.current_location()
    }

    fn skip_spaces_and_comments(&mut self) {
        while matches!(self.lexer.lookahead(0).tag, TokenTag::Whitespace | TokenTag::Comments) {
            self.lexer.consume();
        }
    }

    /// Whether the lexer, with no intervening whitespace skip, sits on a
    /// token that could start a feature.
    fn at_feature_start(&mut self) -> bool {
        let t = self.lexer.lookahead(0);
        matches!(t.tag, TokenTag::Ident | TokenTag::HashId | TokenTag::HashUnrestricted | TokenTag::LeftSquare) || t.is_delim('.') || t.is_delim('*')
    }

    fn parse_root(&mut self) -> Result<u32, ZmlError> {
        let loc = self.lexer_location();
        let open = self.ast.begin_complex(ComponentTag::ZmlDocument, loc);
        self.skip_spaces_and_comments();
        self.parse_element()?;
        self.skip_spaces_and_comments();
        if !self.lexer.eof() {
            return Err(self.fail(ZmlCause::InvalidToken));
        }
        Ok(self.ast.finish_complex(open))
    }

    fn parse_element(&mut self) -> Result<u32, ZmlError> {
        if self.element_depth >= self.config.max_element_depth {
            return Err(self.fail(ZmlCause::ElementDepthLimitReached));
        }
        self.element_depth += 1;
        let result = if self.lexer.lookahead(0).tag == TokenTag::String {
            self.parse_text_element()
        } else {
            self.parse_normal_element()
        };
        self.element_depth -= 1;
        result
    }

    fn parse_text_element(&mut self) -> Result<u32, ZmlError> {
        let tok = self.lexer.consume();
        debug_assert_eq!(tok.tag, TokenTag::String);
        let text = tok.text().unwrap_or_default().to_owned();
        Ok(self.ast.add_basic(ComponentTag::ZmlTextElement, tok.location, Extra::Text(text.into())))
    }

    fn parse_normal_element(&mut self) -> Result<u32, ZmlError> {
        let loc = self.lexer_location();
        let open = self.ast.begin_complex(ComponentTag::ZmlElement, loc);

        let had_features = self.parse_features()?;
        if !had_features {
            if self.lexer.lookahead(0).tag == TokenTag::LeftParen {
                return Err(self.fail(ZmlCause::InlineStyleBlockBeforeFeatures));
            }
            return Err(self.fail(ZmlCause::ElementWithNoFeatures));
        }

        if self.lexer.lookahead(0).tag == TokenTag::LeftParen {
            self.parse_inline_style()?;
            self.skip_spaces_and_comments();
        }
        if self.lexer.lookahead(0).tag == TokenTag::LeftParen {
            return Err(self.fail(ZmlCause::MultipleInlineStyleBlocks));
        }

        match self.lexer.lookahead(0).tag {
            TokenTag::LeftCurly => {
                self.parse_children()?;
            }
            TokenTag::Eof => return Err(self.fail(ZmlCause::UnexpectedEof)),
            _ => return Err(self.fail(ZmlCause::InvalidToken)),
        }

        Ok(self.ast.finish_complex(open))
    }

    /// Parses `features := '*' | (type | id | class | attribute)+`,
    /// returning whether at least one feature was produced.
    fn parse_features(&mut self) -> Result<bool, ZmlError> {
        let loc = self.lexer_location();
        let open = self.ast.begin_complex(ComponentTag::ZmlFeatures, loc);

        let mut saw_any = false;
        let mut saw_wildcard = false;
        let mut saw_type = false;

        loop {
            if !self.at_feature_start() {
                break;
            }
            // An attribute selector's own `[` is self-delimiting and may
            // directly follow another feature with no separator; every
            // other feature-to-feature transition needs one, since `.`/`#`
            // prefixes read ambiguously glued to a preceding bare type name.
            let is_attribute = self.lexer.lookahead(0).tag == TokenTag::LeftSquare;
            if saw_any && !is_attribute && !self.last_feature_had_trailing_space {
                return Err(self.fail(ZmlCause::MissingSpaceBetweenFeatures));
            }

            let is_wildcard = self.lexer.lookahead(0).is_delim('*');
            if is_wildcard {
                if saw_any {
                    return Err(self.fail(ZmlCause::EmptyWithOtherFeatures));
                }
                self.lexer.consume();
                saw_wildcard = true;
                saw_any = true;
            } else {
                self.parse_one_feature(&mut saw_type)?;
                if saw_wildcard {
                    return Err(self.fail(ZmlCause::EmptyWithOtherFeatures));
                }
                saw_any = true;
            }

            self.last_feature_had_trailing_space = self.next_is_space();
            self.skip_spaces_and_comments();
        }

        self.ast.finish_complex(open);
        Ok(saw_any)
    }

    fn next_is_space(&mut self) -> bool {
        matches!(self.lexer.lookahead(0).tag, TokenTag::Whitespace | TokenTag::Comments)
    }

    fn parse_one_feature(&mut self, saw_type: &mut bool) -> Result<(), ZmlError> {
        let tok_tag = self.lexer.lookahead(0).tag;
        match tok_tag {
            TokenTag::Ident => {
                if *saw_type {
                    return Err(self.fail(ZmlCause::MultipleTypes));
                }
                *saw_type = true;
                let tok = self.lexer.consume();
                let name = tok.text().unwrap_or_default().to_owned();
                self.ast.add_basic(ComponentTag::ZmlType, tok.location, Extra::Text(name.into()));
            }
            TokenTag::HashId => {
                let tok = self.lexer.consume();
                let name = tok.text().unwrap_or_default().to_owned();
                self.ast.add_basic(ComponentTag::ZmlId, tok.location, Extra::Text(name.into()));
            }
            TokenTag::HashUnrestricted => {
                return Err(self.fail(ZmlCause::InvalidId));
            }
            TokenTag::LeftSquare => {
                self.parse_attribute()?;
            }
            _ if self.lexer.lookahead(0).is_delim('.') => {
                let dot_loc = self.lexer.consume().location;
                if self.lexer.lookahead(0).tag != TokenTag::Ident {
                    return Err(self.fail_at(ZmlCause::InvalidFeature, dot_loc));
                }
                let tok = self.lexer.consume();
                let name = tok.text().unwrap_or_default().to_owned();
                self.ast.add_basic(ComponentTag::ZmlClass, dot_loc, Extra::Text(name.into()));
            }
            _ => return Err(self.fail(ZmlCause::InvalidFeature)),
        }
        Ok(())
    }

    fn parse_attribute(&mut self) -> Result<(), ZmlError> {
        let loc = self.lexer_location();
        self.lexer.consume(); // '['
        let open = self.ast.begin_complex(ComponentTag::ZmlAttribute, loc);

        self.skip_spaces_and_comments();
        if self.lexer.lookahead(0).tag != TokenTag::Ident {
            return Err(self.fail(ZmlCause::ExpectedIdentifier));
        }
        let name_tok = self.lexer.consume();
        self.ast.add_token(name_tok);

        self.skip_spaces_and_comments();
        if self.lexer.lookahead(0).is_delim('=') {
            self.lexer.consume();
            self.skip_spaces_and_comments();
            match self.lexer.lookahead(0).tag {
                TokenTag::Ident | TokenTag::String => {
                    let value_tok = self.lexer.consume();
                    self.ast.add_token(value_tok);
                }
                _ => return Err(self.fail(ZmlCause::ExpectedIdentifier)),
            }
            self.skip_spaces_and_comments();
        }

        if self.lexer.lookahead(0).tag != TokenTag::RightSquare {
            return Err(self.fail(ZmlCause::InvalidFeature));
        }
        self.lexer.consume();
        self.ast.finish_complex(open);
        Ok(())
    }

    fn parse_inline_style(&mut self) -> Result<(), ZmlError> {
        let loc = self.lexer_location();
        self.lexer.consume(); // '('
        let open = self.ast.begin_complex(ComponentTag::ZmlStyles, loc);

        self.skip_spaces_and_comments();
        if self.lexer.lookahead(0).tag == TokenTag::RightParen {
            return Err(self.fail_at(ZmlCause::EmptyInlineStyleBlock, loc));
        }

        let css_config = ParserConfig { max_block_depth: self.config.max_inline_style_depth, ..ParserConfig::default() };
        let mut inner = CssParser::new_borrowed(&mut self.lexer, &mut self.ast, css_config);
        inner.consume_declarations_until(TokenTag::RightParen);
        if inner.depth_exceeded() {
            return Err(self.fail(ZmlCause::BlockDepthLimitReached));
        }

        if self.lexer.lookahead(0).tag != TokenTag::RightParen {
            return Err(self.fail(ZmlCause::UnexpectedEof));
        }
        self.lexer.consume();

        self.ast.finish_complex(open);
        Ok(())
    }

    fn parse_children(&mut self) -> Result<(), ZmlError> {
        let loc = self.lexer_location();
        self.lexer.consume(); // '{'
        let open = self.ast.begin_complex(ComponentTag::ZmlChildren, loc);

        loop {
            self.skip_spaces_and_comments();
            match self.lexer.lookahead(0).tag {
                TokenTag::RightCurly => {
                    self.lexer.consume();
                    break;
                }
                TokenTag::Eof => return Err(self.fail(ZmlCause::UnexpectedEof)),
                _ => {
                    self.parse_element()?;
                }
            }
        }
        self.ast.finish_complex(open);
        Ok(())
    }
}

pub fn parse_zml_document(source: &str, config: ZmlConfig) -> Result<ZmlOutput, ParseFailure> {
    let lexer = Lexer::new(source)?;
    let mut parser = ZmlParser::new(lexer, config);
    let root = parser.parse_root()?;
    Ok(ZmlOutput { ast: parser.ast, root })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ComponentTag;

    #[test]
    fn wildcard_element_with_text_and_nested_element() {
        let source = r#"* { p1 {} "Hello" p2 (decl: value !important;) { p3[a=b] #id {} } }"#;
        let out = parse_zml_document(source, ZmlConfig::default()).unwrap();
        assert_eq!(out.ast.tag(out.root), ComponentTag::ZmlDocument);
    }

    #[test]
    fn inline_style_before_features_is_rejected() {
        let source = r#"(decl: value) {}"#;
        let err = parse_zml_document(source, ZmlConfig::default()).unwrap_err();
        match err {
            ParseFailure::Zml(e) => assert_eq!(e.cause, ZmlCause::InlineStyleBlockBeforeFeatures),
            other => panic!("expected a zml failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_type_and_no_features_is_rejected() {
        let err = parse_zml_document("{}", ZmlConfig::default()).unwrap_err();
        match err {
            ParseFailure::Zml(e) => assert_eq!(e.cause, ZmlCause::ElementWithNoFeatures),
            other => panic!("expected a zml failure, got {other:?}"),
        }
    }

    #[test]
    fn invalid_id_rejects_digit_only_hash() {
        let err = parse_zml_document("p1 #123 {}", ZmlConfig::default()).unwrap_err();
        match err {
            ParseFailure::Zml(e) => assert_eq!(e.cause, ZmlCause::InvalidId),
            other => panic!("expected a zml failure, got {other:?}"),
        }
    }

    #[test]
    fn inline_style_nesting_past_its_own_depth_bound_is_rejected() {
        let source = r#"p1 (x: a(a(a(1)))) {}"#;
        let config = ZmlConfig { max_inline_style_depth: 2, ..ZmlConfig::default() };
        let err = parse_zml_document(source, config).unwrap_err();
        match err {
            ParseFailure::Zml(e) => assert_eq!(e.cause, ZmlCause::BlockDepthLimitReached),
            other => panic!("expected a zml failure, got {other:?}"),
        }
    }
}
