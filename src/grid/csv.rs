//! CSV-file-backed grid with encoding and delimiter auto-detection.
//!
//! Loads a delimited text file into memory and serves it through the
//! [`TabularGrid`] interface. Header rows are physical rows like any other;
//! which row holds the column names is the record type's concern.

use std::path::Path;

use crate::error::{GridError, GridResult};
use crate::grid::memory::MemoryGrid;
use crate::grid::TabularGrid;

/// Delimiters considered during auto-detection.
const DELIMITER_CANDIDATES: [char; 4] = [';', ',', '\t', '|'];

/// A grid loaded from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvGrid {
    inner: MemoryGrid,
    encoding: String,
    delimiter: char,
}

impl CsvGrid {
    /// Load a CSV file, auto-detecting encoding and delimiter.
    pub fn open<P: AsRef<Path>>(path: P) -> GridResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Parse raw CSV bytes, auto-detecting encoding and delimiter.
    pub fn from_bytes(bytes: &[u8]) -> GridResult<Self> {
        let encoding = detect_encoding(bytes);
        let content = decode_content(bytes, &encoding)?;
        let delimiter = detect_delimiter(&content);
        Self::parse(&content, delimiter, encoding)
    }

    /// Parse CSV text with an explicit delimiter.
    pub fn from_str(content: &str, delimiter: char) -> GridResult<Self> {
        Self::parse(content, delimiter, "utf-8".to_string())
    }

    fn parse(content: &str, delimiter: char, encoding: String) -> GridResult<Self> {
        let rows: Vec<Vec<String>> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split(delimiter)
                    .map(|cell| cell.trim().trim_matches('"').to_string())
                    .collect()
            })
            .collect();

        if rows.is_empty() {
            return Err(GridError::EmptyGrid);
        }

        Ok(Self {
            inner: MemoryGrid::new(rows),
            encoding,
            delimiter,
        })
    }

    /// Encoding the source bytes were decoded with.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Delimiter the source was split on.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

impl TabularGrid for CsvGrid {
    fn row_values(&self, row: usize) -> GridResult<Vec<String>> {
        self.inner.row_values(row)
    }

    fn col_values(&self, col: usize) -> GridResult<Vec<String>> {
        self.inner.col_values(col)
    }

    fn row_count(&self) -> GridResult<usize> {
        self.inner.row_count()
    }
}

/// Detect the encoding of raw bytes using chardet, normalizing charset names.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the detected encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> GridResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8_lossy(bytes).to_string()),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        // Unknown charset: fall back to lossy UTF-8.
        _ => Ok(String::from_utf8_lossy(bytes).to_string()),
    }
}

/// Detect the delimiter by counting candidate occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best = ';';
    let mut best_count = 0;
    for candidate in DELIMITER_CANDIDATES {
        let count = first_line.matches(candidate).count();
        if count > best_count {
            best_count = count;
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_simple() {
        let grid = CsvGrid::from_str("Name;Age\nDevendra;29\nAsha;31", ';').unwrap();
        assert_eq!(grid.row_count().unwrap(), 3);
        assert_eq!(grid.row_values(1).unwrap(), vec!["Name", "Age"]);
        assert_eq!(grid.col_values(2).unwrap(), vec!["Age", "29", "31"]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let grid = CsvGrid::from_str("a;b\n1;2\n\n3;4\n", ';').unwrap();
        assert_eq!(grid.row_count().unwrap(), 3);
    }

    #[test]
    fn test_quoted_cells() {
        let grid = CsvGrid::from_str("name;value\n\"Alice\";\"Hello World\"", ';').unwrap();
        assert_eq!(grid.row_values(2).unwrap(), vec!["Alice", "Hello World"]);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(
            CsvGrid::from_str("", ';'),
            Err(GridError::EmptyGrid)
        ));
    }

    #[test]
    fn test_auto_detection() {
        let grid = CsvGrid::from_bytes(b"name,age\nAlice,30\nBob,25").unwrap();
        assert_eq!(grid.delimiter(), ',');
        assert_eq!(grid.encoding(), "utf-8");
        assert_eq!(grid.row_count().unwrap(), 3);
    }

    #[test]
    fn test_detect_delimiter_candidates() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1.
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert!(decoded.starts_with("Soci"));
        assert!(decoded.contains('é'));
    }

    #[test]
    fn test_open_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(&path, "Name;Age\nDevendra;29").unwrap();

        let grid = CsvGrid::open(&path).unwrap();
        assert_eq!(grid.row_values(2).unwrap(), vec!["Devendra", "29"]);
    }
}
