use crate::location::Location;

/// Which of the three CSS parser entry points is being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Stylesheet,
    ListOfComponentValues,
    ListOfDeclarations,
}

/// Parser configuration, grounded on `gosub_css3::parser_config::
/// ParserConfig` (context + starting location + optional source name +
/// error tolerance), extended with configurable nesting-depth bounds.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub entry: EntryPoint,
    pub location: Location,
    pub source: Option<String>,
    /// When a declaration fails to parse, skip it and continue (matching
    /// `gosub_css3::ParserConfig::ignore_errors`) rather than treating it
    /// as fatal. The CSS parser layer always recovers locally and produces
    /// a tree regardless of this flag — it only controls whether a bad
    /// declaration is logged as a warning (`true`, the default) versus an
    /// error.
    pub recover_from_declaration_errors: bool,
    /// Maximum nesting of blocks and functions (default 32).
    pub max_block_depth: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            entry: EntryPoint::Stylesheet,
            location: Location::new(0),
            source: None,
            recover_from_declaration_errors: true,
            max_block_depth: 32,
        }
    }
}

impl ParserConfig {
    #[must_use]
    pub fn for_entry(entry: EntryPoint) -> Self {
        Self { entry, ..Self::default() }
    }
}
