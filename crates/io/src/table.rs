// CSV/TSV tile tables

use std::io::Read;
use std::path::Path;

use crate::Table;

/// Load a table, sniffing the delimiter from the first lines.
pub fn import(path: &Path) -> Result<Table, String> {
    let content = read_table_text(path)?;
    let delimiter = sniff_delimiter(&content);
    from_str(&content, delimiter)
}

pub fn import_with_delimiter(path: &Path, delimiter: u8) -> Result<Table, String> {
    let content = read_table_text(path)?;
    from_str(&content, delimiter)
}

/// Columns in a tile row: id, center, open list and six edges.
pub const TILE_COLUMNS: usize = 9;

const DELIMITERS: [u8; 4] = [b'\t', b';', b',', b'|'];

/// Guess the field delimiter from the first non-blank lines.
///
/// The candidate that splits the most lines into a full tile row wins; ties
/// go to the one that splits the most lines at all, then to the earlier
/// candidate in tab, `;`, `,`, `|` order. Title or note lines above the
/// header do not matter. Comma when nothing splits.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(20)
        .collect();

    let mut best = b',';
    let mut best_score = (0usize, 0usize);
    for delim in DELIMITERS {
        let widths: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();
        let full = widths.iter().filter(|&&w| w >= TILE_COLUMNS).count();
        let split = widths.iter().filter(|&&w| w > 1).count();
        if (full, split) > best_score {
            best_score = (full, split);
            best = delim;
        }
    }
    best
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

/// Read a table file as text. Bytes that are not valid UTF-8 are decoded
/// as Windows-1252, the usual encoding of sheets saved from Excel on Windows.
pub fn read_table_text(path: &Path) -> Result<String, String> {
    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .map_err(|e| format!("cannot open tile table {}: {}", path.display(), e))?
        .read_to_end(&mut bytes)
        .map_err(|e| format!("cannot read tile table {}: {}", path.display(), e))?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => encoding_rs::WINDOWS_1252.decode(e.as_bytes()).0.into_owned(),
    })
}

/// Parse delimited text into rows. Every record is kept, header included;
/// the engine decides which rows hold tiles.
pub fn from_str(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("row {}: {}", row_idx + 1, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Write a table as comma-separated text, creating parent directories.
pub fn export_csv(table: &Table, path: &Path) -> Result<(), String> {
    crate::report::ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| e.to_string())?;
    write_rows(&mut writer, table)?;
    writer.flush().map_err(|e| e.to_string())
}

/// Write a table as comma-separated text to any writer (stdout for `fetch`).
pub fn write_csv<W: std::io::Write>(table: &Table, out: W) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    write_rows(&mut writer, table)?;
    writer.flush().map_err(|e| e.to_string())
}

fn write_rows<W: std::io::Write>(writer: &mut csv::Writer<W>, table: &Table) -> Result<(), String> {
    for row in table {
        // csv rejects zero-field records
        if row.is_empty() {
            writer.write_record([""]).map_err(|e| e.to_string())?;
        } else {
            writer.write_record(row).map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}
