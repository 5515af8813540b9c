//! Module: table
//! Responsibility: render a finished result as a psql-style bordered table.
//! Does not own: value rendering; cells arrive already rendered by the engine.

#[cfg(test)]
mod tests;

use phidb_core::sink::{ResultSink, SinkError};
use std::io::Write;

/// Blank columns added to each header before sizing a column.
const HEADER_PADDING: usize = 2;

///
/// Align
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Align {
    Left,
    Decimal,
}

impl Align {
    // A column is numeric when every non-null cell is a plain decimal number.
    fn of_column(rows: &[Vec<String>], column: usize) -> Self {
        let mut cells = rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|cell| cell.as_str() != NULL)
            .peekable();

        if cells.peek().is_some() && cells.all(|cell| is_number(cell)) {
            Self::Decimal
        } else {
            Self::Left
        }
    }

    fn pad(self, cell: &str, width: usize) -> String {
        match self {
            Self::Left => format!("{cell:<width$}"),
            Self::Decimal => format!("{cell:>width$}"),
        }
    }
}

/// Rendered form of a missing value.
const NULL: &str = "NULL";

// `-?digits(.digits)?(e-?digits)?`, the shapes the engine renders numbers in.
// `inf` and `NaN` stay text.
fn is_number(cell: &str) -> bool {
    fn digits(text: &str) -> bool {
        !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
    }

    let unsigned = cell.strip_prefix('-').unwrap_or(cell);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, fraction)) => digits(whole) && digits(fraction),
        None => digits(mantissa),
    };
    let exponent_ok = exponent.is_none_or(|exponent| {
        digits(exponent.strip_prefix(['-', '+']).unwrap_or(exponent))
    });

    mantissa_ok && exponent_ok
}

// Characters from the decimal point (or exponent) to the end of the cell.
fn fraction_len(cell: &str) -> usize {
    cell.find('.')
        .or_else(|| cell.find(['e', 'E']))
        .map_or(0, |point| cell.len() - point)
}

// Pad numeric cells on the right so their decimal points line up once the
// column is right-aligned.
fn align_decimals(rows: &[Vec<String>], column: usize) -> Vec<String> {
    let cells: Vec<&str> = rows
        .iter()
        .map(|row| row.get(column).map_or("", String::as_str))
        .collect();
    let widest = cells
        .iter()
        .filter(|cell| is_number(cell))
        .map(|cell| fraction_len(cell))
        .max()
        .unwrap_or(0);

    cells
        .into_iter()
        .map(|cell| {
            let fraction = if is_number(cell) { fraction_len(cell) } else { 0 };
            format!("{cell}{}", " ".repeat(widest - fraction))
        })
        .collect()
}

///
/// PsqlTableSink
///
/// Writes each result as one `+---+` bordered table followed by a newline.
///

#[derive(Debug)]
pub struct PsqlTableSink<W: Write> {
    out: W,
}

impl<W: Write> PsqlTableSink<W> {
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for PsqlTableSink<W> {
    fn write_result(&mut self, header: &[String], rows: &[Vec<String>]) -> Result<(), SinkError> {
        self.out.write_all(render_table(header, rows).as_bytes())?;
        self.out.flush()?;

        Ok(())
    }
}

/// Lay out `header` and `rows` as a psql table.
///
/// Text columns are left-aligned. Numeric columns are right-aligned with
/// their decimal points lined up; `NULL` cells do not decide a column.
#[must_use]
pub fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let aligns: Vec<Align> = (0..header.len())
        .map(|column| Align::of_column(rows, column))
        .collect();

    // Cells laid out column by column, then read back row by row.
    let columns: Vec<Vec<String>> = aligns
        .iter()
        .enumerate()
        .map(|(column, align)| match align {
            Align::Decimal => align_decimals(rows, column),
            Align::Left => rows
                .iter()
                .map(|row| row.get(column).cloned().unwrap_or_default())
                .collect(),
        })
        .collect();
    let widths: Vec<usize> = header
        .iter()
        .zip(&columns)
        .map(|(name, cells)| {
            cells
                .iter()
                .map(|cell| cell.chars().count())
                .fold(name.chars().count() + HEADER_PADDING, usize::max)
        })
        .collect();

    let rule = |left: char, joint: char, right: char| {
        let segments: Vec<String> = widths.iter().map(|width| "-".repeat(width + 2)).collect();
        format!("{left}{}{right}\n", segments.join(&joint.to_string()))
    };
    let line = |cell_at: &dyn Fn(usize) -> String| {
        let padded: Vec<String> = widths
            .iter()
            .zip(&aligns)
            .enumerate()
            .map(|(column, (&width, align))| format!(" {} ", align.pad(&cell_at(column), width)))
            .collect();
        format!("|{}|\n", padded.join("|"))
    };

    let mut table = rule('+', '+', '+');
    table.push_str(&line(&|column| header[column].clone()));
    table.push_str(&rule('|', '+', '|'));
    for row in 0..rows.len() {
        table.push_str(&line(&|column| columns[column][row].clone()));
    }
    table.push_str(&rule('+', '+', '+'));

    table
}
