//! Run-length coding of board rows.
//!
//! A decimal count repeats the symbol that follows it, `-` stands for floor
//! and `|` separates rows packed onto one line.

/// Upper bound on a single run-length count.
const MAX_RUN: usize = 1 << 12;

/// Errors raised while expanding run-length coded rows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RleError {
    /// A count that is not followed by a symbol.
    #[error("count at position {position} is not followed by a tile")]
    DanglingCount {
        /// Character index where the count started.
        position: usize,
    },
    /// A count too large to expand.
    #[error("count at position {position} is too large")]
    CountOverflow {
        /// Character index where the count started.
        position: usize,
    },
}

/// Reports whether the symbol only appears in run-length coded rows.
pub(crate) fn is_run_symbol(symbol: char) -> bool {
    symbol.is_ascii_digit() || symbol == '-' || symbol == '|'
}

/// Expands a run-length coded line into plain board rows.
///
/// Empty rows are skipped, so a trailing `|` is harmless.
pub fn expand(line: &str) -> Result<Vec<String>, RleError> {
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut count: Option<(usize, usize)> = None;

    for (position, symbol) in line.chars().enumerate() {
        if let Some(digit) = symbol.to_digit(10) {
            let (start, value) = count.unwrap_or((position, 0));
            let value = value
                .checked_mul(10)
                .and_then(|value| value.checked_add(digit as usize))
                .filter(|value| *value <= MAX_RUN)
                .ok_or(RleError::CountOverflow { position: start })?;
            count = Some((start, value));
            continue;
        }

        if symbol == '|' {
            if let Some((position, _)) = count {
                return Err(RleError::DanglingCount { position });
            }
            if !row.is_empty() {
                rows.push(std::mem::take(&mut row));
            }
            continue;
        }

        let repeat = count.take().map_or(1, |(_, value)| value);
        let symbol = if symbol == '-' { ' ' } else { symbol };
        row.extend(std::iter::repeat(symbol).take(repeat));
    }

    if let Some((position, _)) = count {
        return Err(RleError::DanglingCount { position });
    }
    if !row.is_empty() {
        rows.push(row);
    }
    Ok(rows)
}

/// Compresses a board whose rows are separated by `|`.
///
/// Runs of two or more equal symbols are prefixed with their length and floor
/// is written as `-`.
pub fn compress(board: &str) -> String {
    let mut out = String::with_capacity(board.len());
    let mut symbols = board.chars().peekable();

    while let Some(symbol) = symbols.next() {
        if symbol == '|' {
            out.push('|');
            continue;
        }

        let mut run = 1usize;
        while symbols.next_if_eq(&symbol).is_some() {
            run += 1;
        }

        if run > 1 {
            out.push_str(&run.to_string());
        }
        out.push(if symbol == ' ' { '-' } else { symbol });
    }
    out
}
