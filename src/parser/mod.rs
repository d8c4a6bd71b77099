//! The CSS parser: consumes tokens and builds the
//! component AST for the three entry points `parse_stylesheet`,
//! `parse_list_of_component_values`, and `parse_list_of_declarations`.
//!
//! Grounded on `gosub_css3::parser` (`parser/stylesheet.rs`,
//! `parser/rule.rs`, `parser/block.rs`, `parser/declaration.rs`), adapted
//! from a `Node`-returning recursive-descent parser to one that appends
//! into a [`ComponentAst`] using the begin/finish-complex protocol instead
//! of building owned `Vec<Node>` children.

mod config;

pub use config::{EntryPoint, ParserConfig};

use crate::ast::{ComponentAst, ComponentTag, Extra};
use crate::location::Location;
use crate::token::{Token, TokenTag};
use crate::tokenizer::Lexer;

/// Output of any CSS parser entry point: the arena plus the index of its
/// root component.
pub struct ParseOutput {
    pub ast: ComponentAst,
    pub root: u32,
}

/// Borrows its lexer and arena rather than owning them, so the zml parser
/// can drive an inline-style block's declaration list through exactly the
/// same machinery while sharing its own [`Lexer`]/[`ComponentAst`] pair —
/// see [`Parser::new_borrowed`].
pub(crate) struct Parser<'p, 'a> {
    lexer: &'p mut Lexer<'a>,
    ast: &'p mut ComponentAst,
    depth: u32,
    config: ParserConfig,
    /// Index of the most recently finished declaration component in the
    /// list currently being parsed, threading the linked chain that
    /// `Extra::Declaration::prev` exposes to callers.
    last_declaration: Option<u32>,
    pending_important: bool,
    /// Set once block/function nesting has exceeded `max_block_depth`.
    /// The CSS layer itself only logs and flattens past that point (it
    /// always recovers locally and produces a tree), but a borrowed
    /// parser's caller — the zml parser, for an inline-style block — can
    /// check this afterward to turn the overrun into a hard failure of
    /// its own, non-recovering grammar.
    depth_exceeded: bool,
}

impl<'p, 'a> Parser<'p, 'a> {
    fn owned(lexer: &'p mut Lexer<'a>, ast: &'p mut ComponentAst, config: ParserConfig) -> Self {
        Self::new_borrowed(lexer, ast, config)
    }

    /// Entry point for callers that only need a declaration list parsed
    /// into an arena and lexer they already own, such as the zml parser
    /// handling an inline-style block inline with its own token stream.
    pub(crate) fn new_borrowed(lexer: &'p mut Lexer<'a>, ast: &'p mut ComponentAst, config: ParserConfig) -> Self {
        Self {
            lexer,
            ast,
            depth: 0,
            config,
            last_declaration: None,
            pending_important: false,
            depth_exceeded: false,
        }
    }

    /// Parses a declaration list up to (and consuming) `terminator`, or
    /// EOF. Exposed so the zml parser's inline-style blocks can reuse this
    /// exact machinery instead of reimplementing it.
    pub(crate) fn consume_declarations_until(&mut self, terminator: TokenTag) {
        self.consume_declaration_list_body(terminator);
    }

    /// Whether nesting ever exceeded `max_block_depth` during this parse.
    pub(crate) fn depth_exceeded(&self) -> bool {
        self.depth_exceeded
    }

    /// Logs a malformed-declaration condition as a warning or an error
    /// depending on `recover_from_declaration_errors` — the CSS layer
    /// always recovers locally either way; the flag only changes how loud
    /// the diagnostic is.
    fn note_declaration_problem(&self, msg: &str, loc: Location) {
        if self.config.recover_from_declaration_errors {
            log::warn!("{msg} at {loc}");
        } else {
            log::error!("{msg} at {loc}");
        }
    }

    fn enter_nesting(&mut self) -> bool {
        if self.depth >= self.config.max_block_depth {
            log::warn!(
                "block/function nesting exceeded max depth {} at {}",
                self.config.max_block_depth,
                self.lexer.current_location()
            );
            self.depth_exceeded = true;
            false
        } else {
            self.depth += 1;
            true
        }
    }

    fn exit_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ---- entry points ----

    fn parse_stylesheet(&mut self) -> u32 {
        let open = self.ast.begin_complex(ComponentTag::Stylesheet, self.lexer.current_location());
        loop {
            let t = self.lexer.lookahead(0).clone();
            match t.tag {
                TokenTag::Eof => break,
                TokenTag::Whitespace | TokenTag::Comments | TokenTag::Cdo | TokenTag::Cdc => {
                    // CDO/CDC are whitespace-equivalent at the top level.
                    self.lexer.consume();
                }
                TokenTag::AtKeyword => {
                    self.parse_at_rule();
                }
                _ => {
                    self.parse_qualified_rule();
                }
            }
        }
        self.ast.finish_complex(open)
    }

    fn parse_list_of_component_values(&mut self) -> u32 {
        let open = self.ast.begin_complex(ComponentTag::ComponentList, self.lexer.current_location());
        while !self.lexer.eof() {
            self.consume_component_value();
        }
        self.ast.finish_complex(open)
    }

    fn parse_list_of_declarations(&mut self) -> u32 {
        let open = self.ast.begin_complex(ComponentTag::ComponentList, self.lexer.current_location());
        self.consume_declaration_list_body(TokenTag::Eof);
        self.ast.finish_complex(open)
    }

    // ---- shared body: used for both the top-level declaration-list entry
    // point and the inside of a `{}` style block ----

    fn consume_declaration_list_body(&mut self, terminator: TokenTag) {
        loop {
            let tag = self.lexer.lookahead(0).tag;
            if tag == terminator || tag == TokenTag::Eof {
                break;
            }
            match tag {
                TokenTag::Whitespace | TokenTag::Comments | TokenTag::Semicolon => {
                    self.lexer.consume();
                }
                TokenTag::AtKeyword => {
                    self.parse_at_rule();
                }
                _ => {
                    self.parse_declaration();
                }
            }
        }
    }

    // ---- rules ----

    fn parse_at_rule(&mut self) {
        let start = self.lexer.current_location();
        let open = self.ast.begin_complex(ComponentTag::AtRule, start);
        let kw = self.lexer.consume(); // AtKeyword
        debug_assert_eq!(kw.tag, TokenTag::AtKeyword);
        self.ast.add_token(kw);

        loop {
            match self.lexer.lookahead(0).tag {
                TokenTag::Semicolon => {
                    self.ast.add_token(self.lexer.consume());
                    break;
                }
                TokenTag::LeftCurly => {
                    self.consume_simple_block(ComponentTag::SimpleBlockCurly, TokenTag::LeftCurly, TokenTag::RightCurly);
                    break;
                }
                TokenTag::Eof => break,
                _ => self.consume_component_value(),
            }
        }
        self.ast.finish_complex(open);
    }

    fn parse_qualified_rule(&mut self) {
        let start = self.lexer.current_location();
        let open = self.ast.begin_complex(ComponentTag::QualifiedRule, start);
        loop {
            match self.lexer.lookahead(0).tag {
                TokenTag::LeftCurly => {
                    self.consume_style_block();
                    break;
                }
                TokenTag::Eof => {
                    // Parse error: qualified rule never saw its block. It is
                    // still emitted (possibly empty prelude) and dropped by
                    // the caller walking the stylesheet.
                    log::warn!("qualified rule reached EOF before its block at {start}");
                    break;
                }
                _ => self.consume_component_value(),
            }
        }
        self.ast.finish_complex(open);
    }

    /// A qualified rule's `{}` block is always a style rule's declaration
    /// list in this grammar — there is no nested-rule or conditional-group
    /// syntax a generic block would need to stay agnostic about — so unlike
    /// [`Self::consume_simple_block`] its contents are parsed directly as
    /// declarations rather than left as a flat run of component values.
    fn consume_style_block(&mut self) {
        let open_tok = self.lexer.consume();
        debug_assert_eq!(open_tok.tag, TokenTag::LeftCurly);
        let open = self.ast.begin_complex(ComponentTag::SimpleBlockCurly, open_tok.location);

        if !self.enter_nesting() {
            self.consume_flat_until(TokenTag::RightCurly);
            self.ast.finish_complex(open);
            return;
        }

        let saved_last_declaration = self.last_declaration.take();
        self.consume_declaration_list_body(TokenTag::RightCurly);
        self.last_declaration = saved_last_declaration;

        if self.lexer.lookahead(0).tag == TokenTag::RightCurly {
            self.lexer.consume();
        } else {
            log::warn!("simple block never closed before EOF");
        }
        self.exit_nesting();
        self.ast.finish_complex(open);
    }

    fn parse_declaration(&mut self) {
        let start = self.lexer.current_location();
        let open = self.ast.begin_complex(ComponentTag::Declaration, start);

        let ok = self.parse_declaration_body();
        if !ok {
            // Drop the malformed declaration by truncating back to `open`,
            // then consume tokens until `;`/`}`/EOF so the caller resumes
            // cleanly.
            let mark = open.index();
            self.ast.truncate(mark);
            self.recover_to_declaration_boundary();
            return;
        }
        let idx = self.ast.finish_complex(open);
        self.ast.set_declaration_extra(idx, self.last_declaration, self.pending_important);
        self.last_declaration = Some(idx);
    }

    /// Returns `false` on a malformed declaration (missing ident, missing
    /// colon, or empty value).
    fn parse_declaration_body(&mut self) -> bool {
        self.skip_spaces_and_comments();
        let name_tok = self.lexer.lookahead(0).clone();
        if name_tok.tag != TokenTag::Ident {
            self.note_declaration_problem("expected an ident to start a declaration", name_tok.location);
            return false;
        }
        let custom_property = name_tok.text().is_some_and(|s| s.starts_with("--"));
        self.ast.add_token(self.lexer.consume());

        self.skip_spaces_and_comments();
        if self.lexer.lookahead(0).tag != TokenTag::Colon {
            let loc = self.lexer.current_location();
            self.note_declaration_problem("expected ':' in declaration", loc);
            return false;
        }
        self.ast.add_token(self.lexer.consume());
        if !custom_property {
            self.skip_spaces_and_comments();
        }

        let value_start = self.ast.len();
        loop {
            match self.lexer.lookahead(0).tag {
                TokenTag::Semicolon | TokenTag::RightCurly | TokenTag::Eof => break,
                _ => self.consume_component_value(),
            }
        }

        // Trim trailing whitespace/comments from the value, and detect a
        // trailing `!important`.
        let mut important = false;
        let mut value_end = self.ast.len();
        self.strip_trailing_trivia(value_start, &mut value_end);
        if let Some(bang_at) = self.find_trailing_important(value_start, value_end) {
            important = true;
            value_end = bang_at;
            self.strip_trailing_trivia(value_start, &mut value_end);
        }

        if value_end == value_start {
            let loc = self.lexer.current_location();
            self.note_declaration_problem("empty declaration value", loc);
            return false;
        }
        self.ast.truncate(value_end);

        if self.lexer.lookahead(0).tag == TokenTag::Semicolon {
            self.lexer.consume();
        }

        self.pending_important = important;
        true
    }

    fn strip_trailing_trivia(&self, start: u32, end: &mut u32) {
        while *end > start {
            let last = *end - 1;
            if matches!(self.ast.tag(last), ComponentTag::Whitespace | ComponentTag::Comments) {
                *end = last;
            } else {
                break;
            }
        }
    }

    /// Looks for a trailing `! important` (delim `!` then ident
    /// `important`, whitespace-separated) inside `[start, end)`, returning
    /// the index where it begins if found.
    fn find_trailing_important(&self, start: u32, end: u32) -> Option<u32> {
        let mut e = end;
        self.strip_trailing_trivia(start, &mut e);
        if e == start {
            return None;
        }
        let ident_idx = e - 1;
        if self.ast.tag(ident_idx) != ComponentTag::Ident {
            return None;
        }
        if !self.ast.extra(ident_idx).text().is_some_and(|t| t.eq_ignore_ascii_case("important")) {
            return None;
        }
        let mut before = ident_idx;
        self.strip_trailing_trivia(start, &mut before);
        if before == start {
            return None;
        }
        let bang_idx = before - 1;
        if self.ast.tag(bang_idx) == ComponentTag::Delim && self.ast.extra(bang_idx).delim() == Some('!') {
            Some(bang_idx)
        } else {
            None
        }
    }

    fn recover_to_declaration_boundary(&mut self) {
        loop {
            match self.lexer.lookahead(0).tag {
                TokenTag::Semicolon => {
                    self.lexer.consume();
                    break;
                }
                TokenTag::RightCurly | TokenTag::Eof => break,
                _ => {
                    self.lexer.consume();
                }
            }
        }
    }

    fn skip_spaces_and_comments(&mut self) {
        while matches!(self.lexer.lookahead(0).tag, TokenTag::Whitespace | TokenTag::Comments) {
            self.lexer.consume();
        }
    }

    // ---- component values / simple blocks / functions ----

    fn consume_component_value(&mut self) {
        let t = self.lexer.lookahead(0).clone();
        match t.tag {
            TokenTag::LeftCurly => self.consume_simple_block(ComponentTag::SimpleBlockCurly, TokenTag::LeftCurly, TokenTag::RightCurly),
            TokenTag::LeftSquare => self.consume_simple_block(ComponentTag::SimpleBlockSquare, TokenTag::LeftSquare, TokenTag::RightSquare),
            TokenTag::LeftParen => self.consume_simple_block(ComponentTag::SimpleBlockParen, TokenTag::LeftParen, TokenTag::RightParen),
            TokenTag::Function => self.consume_function(),
            TokenTag::RightCurly | TokenTag::RightSquare | TokenTag::RightParen => {
                // A closer with no matching opener: dropped with a parse
                // error marker.
                log::warn!("dropping mismatched closer {:?} at {}", t.tag, t.location);
                self.lexer.consume();
            }
            _ => {
                self.ast.add_token(self.lexer.consume());
            }
        }
    }

    fn consume_function(&mut self) {
        let fn_tok = self.lexer.consume();
        debug_assert_eq!(fn_tok.tag, TokenTag::Function);
        let loc = fn_tok.location;
        let extra: Extra = fn_tok.data.into();
        let open = self.ast.begin_complex(ComponentTag::Function, loc);

        if !self.enter_nesting() {
            self.consume_flat_until(TokenTag::RightParen);
            self.ast.finish_complex_with_extra(open, extra);
            return;
        }
        loop {
            match self.lexer.lookahead(0).tag {
                TokenTag::RightParen => {
                    self.lexer.consume();
                    break;
                }
                TokenTag::Eof => break,
                _ => self.consume_component_value(),
            }
        }
        self.exit_nesting();
        self.ast.finish_complex_with_extra(open, extra);
    }

    fn consume_simple_block(&mut self, tag: ComponentTag, open_tag: TokenTag, close_tag: TokenTag) {
        let open_tok = self.lexer.consume();
        debug_assert_eq!(open_tok.tag, open_tag);
        let open = self.ast.begin_complex(tag, open_tok.location);

        if !self.enter_nesting() {
            self.consume_flat_until(close_tag);
            self.ast.finish_complex(open);
            return;
        }
        loop {
            let t = self.lexer.lookahead(0).tag;
            if t == close_tag {
                self.lexer.consume();
                break;
            }
            if t == TokenTag::Eof {
                log::warn!("simple block never closed before EOF");
                break;
            }
            self.consume_component_value();
        }
        self.exit_nesting();
        self.ast.finish_complex(open);
    }

    /// Depth-limit fallback: rather than recursing further once nesting
    /// exceeds its configured bound, drain tokens up to the matching
    /// closer as a flat run of leaves, tracking only same-kind open/close
    /// counts.
    fn consume_flat_until(&mut self, close_tag: TokenTag) {
        let open_tag = matching_open(close_tag);
        let mut depth = 1u32;
        loop {
            let t = self.lexer.lookahead(0).tag;
            if t == TokenTag::Eof {
                break;
            }
            if t == open_tag {
                depth += 1;
            } else if t == close_tag {
                depth -= 1;
                if depth == 0 {
                    self.lexer.consume();
                    break;
                }
            }
            self.ast.add_token(self.lexer.consume());
        }
    }
}

fn matching_open(close: TokenTag) -> TokenTag {
    match close {
        TokenTag::RightParen => TokenTag::LeftParen,
        TokenTag::RightSquare => TokenTag::LeftSquare,
        TokenTag::RightCurly => TokenTag::LeftCurly,
        other => other,
    }
}

pub fn parse_stylesheet(source: &str, config: ParserConfig) -> Result<ParseOutput, crate::error::SourceError> {
    let mut lexer = Lexer::new(source)?;
    let mut ast = ComponentAst::new();
    let root = Parser::owned(&mut lexer, &mut ast, config).parse_stylesheet();
    Ok(ParseOutput { ast, root })
}

pub fn parse_list_of_component_values(source: &str, config: ParserConfig) -> Result<ParseOutput, crate::error::SourceError> {
    let mut lexer = Lexer::new(source)?;
    let mut ast = ComponentAst::new();
    let root = Parser::owned(&mut lexer, &mut ast, config).parse_list_of_component_values();
    Ok(ParseOutput { ast, root })
}

pub fn parse_list_of_declarations(source: &str, config: ParserConfig) -> Result<ParseOutput, crate::error::SourceError> {
    let mut lexer = Lexer::new(source)?;
    let mut ast = ComponentAst::new();
    let root = Parser::owned(&mut lexer, &mut ast, config).parse_list_of_declarations();
    Ok(ParseOutput { ast, root })
}
