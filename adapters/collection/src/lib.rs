#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reading and writing level collection files.
//!
//! Formats are chosen by sniffing the file name and contents, falling back to
//! the plain-text [`SokFormat`].

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use pushbox_level::Level;
use tracing::{info, warn};

mod format;
mod rle;
mod sok;

pub use format::{CollectionFormat, ExportOptions, FormatError, ParsedCollection};
pub use rle::{compress, expand, RleError};
pub use sok::SokFormat;

/// Errors raised while importing or exporting a collection.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// The collection file could not be opened.
    #[error("failed to open collection {}", .path.display())]
    Open {
        /// Path of the collection file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The collection file could not be created.
    #[error("failed to create collection {}", .path.display())]
    Create {
        /// Path of the collection file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The collection file could not be read.
    #[error("failed to read collection {}", .path.display())]
    Read {
        /// Path of the collection file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The collection file could not be written.
    #[error("failed to write collection {}", .path.display())]
    Write {
        /// Path of the collection file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The contents are not a valid collection.
    #[error("failed to parse {} as {format}", .path.display())]
    Parse {
        /// Path of the collection file.
        path: PathBuf,
        /// Name of the format used.
        format: &'static str,
        /// Underlying format error.
        source: FormatError,
    },
    /// The levels could not be serialised.
    #[error("failed to serialise collection as {format}")]
    Serialize {
        /// Name of the format used.
        format: &'static str,
        /// Underlying format error.
        source: FormatError,
    },
}

/// Levels loaded from a collection file.
#[derive(Debug, Default)]
pub struct Imported {
    /// Human readable summary of the import, one finding per line.
    pub report: String,
    /// Lines that belong to no level.
    pub notes: Vec<String>,
    /// Levels keyed by their unique name.
    pub levels: BTreeMap<String, Level>,
}

/// Formats understood out of the box, in detection order.
#[must_use]
pub fn default_formats() -> Vec<Box<dyn CollectionFormat>> {
    vec![Box::new(SokFormat)]
}

/// Picks the first format that recognises the file, or [`SokFormat`].
#[must_use]
pub fn detect_format<'a>(
    formats: &'a [Box<dyn CollectionFormat>],
    path: &Path,
    contents: &str,
) -> &'a dyn CollectionFormat {
    formats
        .iter()
        .find(|format| format.sniff(path, contents))
        .map(|format| &**format)
        .unwrap_or(&SokFormat)
}

/// Loads a collection using the default formats.
pub fn import(path: impl AsRef<Path>) -> Result<Imported, CollectionError> {
    import_with(path, &default_formats())
}

/// Loads a collection, choosing among `formats`.
///
/// Levels sharing a name are kept under `Name (2)`, `Name (3)` and so on.
pub fn import_with(
    path: impl AsRef<Path>,
    formats: &[Box<dyn CollectionFormat>],
) -> Result<Imported, CollectionError> {
    let path = path.as_ref();
    let contents = read_collection(path)?;
    let format = detect_format(formats, path, &contents);
    let parsed = format
        .parse(&contents)
        .map_err(|source| CollectionError::Parse {
            path: path.to_path_buf(),
            format: format.name(),
            source,
        })?;

    let mut findings = parsed.diagnostics;
    let mut levels = BTreeMap::new();
    for mut level in parsed.levels {
        let name = unique_name(&levels, level.name());
        if name != level.name() {
            warn!(original = level.name(), renamed = %name, "duplicate level name");
            findings.push(format!("renamed duplicate level `{}` to `{name}`", level.name()));
            level.set_name(name.clone());
        }
        let _ = levels.insert(name, level);
    }
    if !parsed.notes.is_empty() {
        warn!(lines = parsed.notes.len(), "collection text outside any level kept as notes");
        findings.push(format!(
            "{} line(s) outside any level kept as collection notes",
            parsed.notes.len()
        ));
    }

    info!(
        path = %path.display(),
        format = format.name(),
        levels = levels.len(),
        notes = parsed.notes.len(),
        "collection imported"
    );

    let mut report = format!(
        "loaded {} level(s) from {} as {}",
        levels.len(),
        path.display(),
        format.name()
    );
    for finding in findings {
        report.push('\n');
        report.push_str(&finding);
    }

    Ok(Imported {
        report,
        notes: parsed.notes,
        levels,
    })
}

/// Writes a collection using the default formats.
pub fn export(
    path: impl AsRef<Path>,
    levels: &BTreeMap<String, Level>,
    options: ExportOptions,
) -> Result<(), CollectionError> {
    export_with(path, levels, options, &default_formats())
}

/// Writes a collection in the format matching the destination path.
pub fn export_with(
    path: impl AsRef<Path>,
    levels: &BTreeMap<String, Level>,
    options: ExportOptions,
    formats: &[Box<dyn CollectionFormat>],
) -> Result<(), CollectionError> {
    let path = path.as_ref();
    let format = detect_format(formats, path, "");
    let text = format
        .write(levels, options)
        .map_err(|source| CollectionError::Serialize {
            format: format.name(),
            source,
        })?;

    let mut file = File::create(path).map_err(|source| CollectionError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| CollectionError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        path = %path.display(),
        format = format.name(),
        levels = levels.len(),
        compact = options.compact,
        "collection exported"
    );
    Ok(())
}

fn read_collection(path: &Path) -> Result<String, CollectionError> {
    let mut file = File::open(path).map_err(|source| CollectionError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut contents = String::new();
    let _ = file
        .read_to_string(&mut contents)
        .map_err(|source| CollectionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(contents)
}

fn unique_name(levels: &BTreeMap<String, Level>, name: &str) -> String {
    if !levels.contains_key(name) {
        return name.to_owned();
    }
    (2usize..)
        .map(|suffix| format!("{name} ({suffix})"))
        .find(|candidate| !levels.contains_key(candidate))
        .unwrap_or_else(|| name.to_owned())
}
