//! CSV to grid parser with encoding auto-detection.
//!
//! Produces a [`Grid`] of raw string tokens. Shape is not checked here;
//! rows of different lengths parse fine and are rejected by
//! [`crate::validation`].
//!
//! Quoting is strict: a `"` inside an unquoted field, or a quoted field
//! that is never closed or is followed by stray text, is an error.

use std::path::Path;

use crate::error::{CsvError, CsvResult, InputError};
use crate::models::Grid;

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if bytes.is_ascii() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "iso-8859-15" | "latin-9" | "latin9" => "iso-8859-15".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Latin-1 labels decode as windows-1252, which agrees with ISO-8859-1 on
/// every printable byte (the WHATWG mapping). Unknown encodings fall back
/// to lossy UTF-8. A leading BOM is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        "iso-8859-15" | "latin-9" | "latin9" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Parse uploaded bytes into a grid.
///
/// Valid UTF-8 is taken as is; encoding detection only runs for bytes
/// that are not.
pub fn parse_grid(bytes: &[u8]) -> CsvResult<Grid> {
    let content = match std::str::from_utf8(bytes) {
        Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
        Err(_) => decode_content(bytes, &detect_encoding(bytes)),
    };
    parse_grid_str(&content)
}

/// Parse a CSV file from disk.
pub fn parse_grid_file<P: AsRef<Path>>(path: P) -> Result<Grid, InputError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_grid(&bytes)?)
}

/// Parse comma-separated text into a grid.
///
/// # Example
/// ```
/// use csvmatrix::parser::parse_grid_str;
///
/// let grid = parse_grid_str("1,2\n3,4\n").unwrap();
/// assert_eq!(grid.len(), 2);
/// assert_eq!(grid.rows()[1], vec!["3", "4"]);
/// ```
pub fn parse_grid_str(content: &str) -> CsvResult<Grid> {
    check_quoting(content)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Grid::new(rows))
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// Just saw a `"` inside a quoted field: either an escape or the close.
    QuoteInQuoted,
}

/// Reject the malformed quoting that the `csv` crate would silently accept.
fn check_quoting(content: &str) -> CsvResult<()> {
    let normalized = content.replace("\r\n", "\n");

    let mut state = QuoteState::FieldStart;
    let mut line = 1;
    let mut column = 0;
    let mut quote_start_line = 1;

    for ch in normalized.chars() {
        column += 1;

        state = match state {
            QuoteState::FieldStart | QuoteState::Unquoted => match ch {
                ',' | '\n' => QuoteState::FieldStart,
                '"' if matches!(state, QuoteState::FieldStart) => {
                    quote_start_line = line;
                    QuoteState::Quoted
                }
                '"' => {
                    return Err(CsvError::new(line, "bare \" in non-quoted field")
                        .with_column(column));
                }
                _ => QuoteState::Unquoted,
            },
            QuoteState::Quoted if ch == '"' => QuoteState::QuoteInQuoted,
            QuoteState::Quoted => QuoteState::Quoted,
            QuoteState::QuoteInQuoted => match ch {
                '"' => QuoteState::Quoted,
                ',' | '\n' => QuoteState::FieldStart,
                _ => {
                    return Err(CsvError::new(line, "extraneous or missing \" in quoted field")
                        .with_column(column));
                }
            },
        };

        if ch == '\n' {
            line += 1;
            column = 0;
        }
    }

    if let QuoteState::Quoted = state {
        return Err(CsvError::new(quote_start_line, "extraneous or missing \" in quoted field"));
    }

    Ok(())
}
