//! Pluggable collection file formats.

use std::{collections::BTreeMap, fmt, path::Path};

use pushbox_core::LevelError;
use pushbox_level::Level;

/// Options applied when serialising a collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Packs each board onto a single run-length coded line.
    pub compact: bool,
}

/// Result of parsing a collection file.
#[derive(Debug, Default)]
pub struct ParsedCollection {
    /// Lines that belong to no level, in file order.
    pub notes: Vec<String>,
    /// Levels in file order. Names may repeat.
    pub levels: Vec<Level>,
    /// Recoverable problems encountered while parsing.
    pub diagnostics: Vec<String>,
}

/// Errors raised by a collection format.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A board row the level rejected.
    #[error("level `{name}` line {line}: {source}")]
    Level {
        /// Name of the level being read.
        name: String,
        /// One-based line number in the file.
        line: usize,
        /// Underlying level error.
        #[source]
        source: LevelError,
    },
    /// Writing into the output buffer failed.
    #[error(transparent)]
    Fmt(#[from] fmt::Error),
}

/// A textual collection format.
pub trait CollectionFormat: fmt::Debug {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Reports whether the file looks like this format.
    fn sniff(&self, path: &Path, contents: &str) -> bool;

    /// Parses a whole collection.
    fn parse(&self, contents: &str) -> Result<ParsedCollection, FormatError>;

    /// Serialises levels keyed by name.
    fn write(
        &self,
        levels: &BTreeMap<String, Level>,
        options: ExportOptions,
    ) -> Result<String, FormatError>;
}
