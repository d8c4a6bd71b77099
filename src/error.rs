//! Crate-wide error types.
//!
//! Three tiers:
//! - silent recovery (bad-string/bad-url/mismatched-closer/block-depth
//!   overrun) never surfaces as a Rust error at all — it is folded into
//!   the AST as a designated token/component and a `log::warn!`, per
//!   `spec.md` §7's "the CSS block/declaration layer recovers locally and
//!   always produces a tree."
//! - structured failure ([`Option`] for "no match" in the value/selector
//!   layers, [`ZmlError`] for the zml parser, which does not recover) is
//!   local to one call.
//! - allocator/overflow conditions ([`SourceError`], [`InternError`])
//!   propagate to the caller of `parse`, which discards any partial
//!   output.
//!
//! `gosub_css3` represents its analogous conditions as a hand-rolled
//! `CssError { message: String, location: Option<Location> }`
//! (`gosub_shared::errors`) with a manual `Display`. This crate expresses
//! the same shape with `thiserror`, the derive macro already present in the
//! teacher's `Cargo.toml` and used for structured errors elsewhere in the
//! retrieved pack (see `examples/Luvion1-Fax`).

use crate::location::Location;
use thiserror::Error;

/// The only hard tokenizer failure: the input doesn't fit the `Location`
/// integer type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("input of {len} bytes exceeds the maximum addressable source size")]
    TooLarge { len: usize },
}

/// Raised when an [`crate::intern::Interner`] is asked to intern a new name
/// past its configured capacity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("intern table '{class}' is full (max {max} entries)")]
pub struct InternError {
    pub class: &'static str,
    pub max: usize,
}

/// One cause per zml structural diagnostic. The `Display` impl produces a
/// kebab-case identifier for each, so the CLI can print them verbatim.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ZmlCause {
    #[error("block-depth-limit-reached")]
    BlockDepthLimitReached,
    #[error("element-depth-limit-reached")]
    ElementDepthLimitReached,
    #[error("element-with-no-features")]
    ElementWithNoFeatures,
    #[error("empty-with-other-features")]
    EmptyWithOtherFeatures,
    #[error("empty-declaration-value")]
    EmptyDeclarationValue,
    #[error("empty-inline-style-block")]
    EmptyInlineStyleBlock,
    #[error("expected-colon")]
    ExpectedColon,
    #[error("expected-identifier")]
    ExpectedIdentifier,
    #[error("inline-style-block-before-features")]
    InlineStyleBlockBeforeFeatures,
    #[error("invalid-feature")]
    InvalidFeature,
    #[error("invalid-id")]
    InvalidId,
    #[error("invalid-token")]
    InvalidToken,
    #[error("missing-space-between-features")]
    MissingSpaceBetweenFeatures,
    #[error("multiple-types")]
    MultipleTypes,
    #[error("multiple-inline-style-blocks")]
    MultipleInlineStyleBlocks,
    #[error("unexpected-eof")]
    UnexpectedEof,
}

/// The zml parser's single `(cause, location)` failure record. Unlike the
/// CSS layer, the zml grammar is not forgiving: the first structural error
/// aborts the parse with a precise diagnostic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{cause} at {location}")]
pub struct ZmlError {
    pub cause: ZmlCause,
    pub location: Location,
}

impl ZmlError {
    #[must_use]
    pub fn new(cause: ZmlCause, location: Location) -> Self {
        Self { cause, location }
    }
}

/// Errors that can escape a `parse` entry point — allocator/overflow-class
/// failures that discard any partially built structure, plus the zml
/// parser's own non-recovering `(cause, location)` failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Intern(#[from] InternError),
    #[error(transparent)]
    Zml(#[from] ZmlError),
}
