//! Plain-text `.sok` collections.
//!
//! A file is a sequence of blocks separated by blank lines. A block holds a
//! level when it contains board rows: lines made of tile symbols, optionally
//! run-length coded. The first board row must hold a tile other than floor;
//! later rows may be floor only. Lines before the board are headers, the last
//! of which names the level. `key: value` lines right after the board are
//! metadata and anything below them is kept as notes. Blocks without a board
//! are collection notes.
//!
//! A text line starting with `;` is literal: the `;` is dropped and the rest
//! is never read as a board row or metadata. The writer relies on this to
//! keep names, headers and notes that would otherwise be misread.

use std::{collections::BTreeMap, ffi::OsStr, fmt::Write as _, path::Path};

use pushbox_core::Tile;
use pushbox_level::{Level, RowLayout};

use crate::{
    format::{CollectionFormat, ExportOptions, FormatError, ParsedCollection},
    rle,
};

/// Prefix of a text line that must be read verbatim.
const LITERAL: char = ';';

/// Line number paired with its text.
type Line<'a> = (usize, &'a str);

/// The `.sok` text format.
#[derive(Clone, Copy, Debug, Default)]
pub struct SokFormat;

impl CollectionFormat for SokFormat {
    fn name(&self) -> &'static str {
        "sok"
    }

    fn sniff(&self, path: &Path, contents: &str) -> bool {
        let by_extension = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sok") || ext.eq_ignore_ascii_case("txt"));
        by_extension || contents.lines().any(|line| opening_row(line).is_some())
    }

    fn parse(&self, contents: &str) -> Result<ParsedCollection, FormatError> {
        let mut parsed = ParsedCollection::default();
        for block in blocks(contents) {
            let ordinal = parsed.levels.len() + 1;
            match parse_block(&block, ordinal, &mut parsed.diagnostics)? {
                Some(level) => parsed.levels.push(level),
                None => parsed
                    .notes
                    .extend(block.iter().map(|(_, line)| unescape(line).to_owned())),
            }
        }
        Ok(parsed)
    }

    fn write(
        &self,
        levels: &BTreeMap<String, Level>,
        options: ExportOptions,
    ) -> Result<String, FormatError> {
        let mut out = String::new();
        for (name, level) in levels {
            for header in level.headers() {
                write_text(&mut out, header, needs_literal(header))?;
            }
            write_text(&mut out, name, needs_literal(name))?;
            write_board(&mut out, level, options.compact)?;
            level.write_metadata(&mut out)?;
            for note in level.notes() {
                let literal = needs_literal(note) || metadata_entry(note).is_some();
                write_text(&mut out, note, literal)?;
            }
            out.push('\n');
        }
        Ok(out)
    }
}

/// Decodes a line that may continue a board.
fn board_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim_end();
    let symbols_only = line
        .chars()
        .all(|symbol| Tile::from_symbol(symbol).is_some() || rle::is_run_symbol(symbol));
    if line.is_empty() || !symbols_only {
        return None;
    }
    rle::expand(line).ok()
}

/// Decodes a line that may open a board: it must hold a tile other than floor.
fn opening_row(line: &str) -> Option<Vec<String>> {
    let has_content = line
        .chars()
        .any(|symbol| Tile::from_symbol(symbol).is_some_and(|tile| tile != Tile::Floor));
    if has_content {
        board_row(line)
    } else {
        None
    }
}

fn needs_literal(text: &str) -> bool {
    text.trim().is_empty() || text.starts_with(LITERAL) || board_row(text).is_some()
}

fn unescape(text: &str) -> &str {
    text.strip_prefix(LITERAL).unwrap_or(text)
}

fn write_text(out: &mut String, text: &str, literal: bool) -> Result<(), FormatError> {
    if literal {
        out.push(LITERAL);
    }
    writeln!(out, "{text}")?;
    Ok(())
}

fn write_board(out: &mut String, level: &Level, compact: bool) -> Result<(), FormatError> {
    let mut board = String::new();
    level.write_tiles(&mut board, RowLayout::Lines)?;
    let opens = board.lines().next().is_some_and(|row| opening_row(row).is_some());

    if compact || !opens {
        let mut packed = String::new();
        level.write_tiles(&mut packed, RowLayout::Compact)?;
        if !packed.is_empty() {
            writeln!(out, "{}", rle::compress(packed.trim_end_matches('\n')))?;
        }
    } else {
        for row in board.lines() {
            writeln!(out, "{}", row.replace(' ', "-"))?;
        }
    }
    Ok(())
}

fn blocks(contents: &str) -> Vec<Vec<Line<'_>>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((index + 1, line));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(
    block: &[Line<'_>],
    ordinal: usize,
    diagnostics: &mut Vec<String>,
) -> Result<Option<Level>, FormatError> {
    let Some(board_start) = block
        .iter()
        .position(|(_, text)| opening_row(text).is_some())
    else {
        return Ok(None);
    };
    let (preamble, rest) = block.split_at(board_start);
    let board: Vec<(usize, Vec<String>)> = rest
        .iter()
        .enumerate()
        .map_while(|(index, (line, text))| {
            let rows = if index == 0 {
                opening_row(text)
            } else {
                board_row(text)
            };
            rows.map(|rows| (*line, rows))
        })
        .collect();
    let trailer = &rest[board.len()..];

    let mut level = Level::new();
    let name = match preamble.split_last() {
        Some(((_, name), headers)) => {
            for (_, header) in headers {
                level.add_header(unescape(header));
            }
            unescape(name).to_owned()
        }
        None => format!("Level {ordinal}"),
    };

    let mut y = 0u32;
    for (line, rows) in board {
        for row in rows {
            level
                .insert_tile_line(y, &row)
                .map_err(|source| FormatError::Level {
                    name: name.clone(),
                    line,
                    source,
                })?;
            y += 1;
        }
    }

    let mut in_notes = false;
    for (line, text) in trailer {
        if !in_notes {
            if let Some((key, value)) = metadata_entry(text) {
                match level.add_metadata(key, value) {
                    Ok(()) => continue,
                    Err(error) => {
                        diagnostics.push(format!("level `{name}` line {line}: {error}, kept as note"));
                    }
                }
            }
            in_notes = true;
        }
        level.add_note(unescape(text));
    }

    level.set_name(name);
    Ok(Some(level))
}

fn metadata_entry(line: &str) -> Option<(&str, &str)> {
    if line.starts_with(LITERAL) || line.starts_with(char::is_whitespace) {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim_end();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}
