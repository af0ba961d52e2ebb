//! CSV loader for wide toll-booth count exports
//!
//! The encoding is always given by the caller. Public exports are Latin-1;
//! re-saved files are often UTF-8. Nothing is sniffed.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use aforo_domain::model::RawTable;
use aforo_types::{Error, Result, SourceEncoding};
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Load a wide CSV file into memory
pub fn load_table<P: AsRef<Path>>(path: P, encoding: SourceEncoding) -> Result<RawTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    let bytes = fs::read(path)?;
    let text = decode(&bytes, encoding).ok_or_else(|| Error::EncodingMismatch {
        encoding: encoding.to_string(),
        path: path.display().to_string(),
    })?;

    let table = parse_table(&text)?;
    debug!(
        path = %path.display(),
        %encoding,
        columns = table.headers().len(),
        rows = table.row_count(),
        "loaded source table"
    );
    Ok(table)
}

/// Decode raw bytes; `None` when the bytes are not valid for `encoding`
pub fn decode(bytes: &[u8], encoding: SourceEncoding) -> Option<Cow<'_, str>> {
    match encoding {
        SourceEncoding::Utf8 => {
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            UTF_8.decode_without_bom_handling_and_without_replacement(body)
        }
        // Every byte maps to a character, so this cannot fail
        SourceEncoding::Latin1 => Some(WINDOWS_1252.decode_without_bom_handling(bytes).0),
    }
}

/// Parse decoded CSV text. The first row is the header.
pub fn parse_table(text: &str) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_latin1_header() {
        // "AÑO" with Ñ as the single Latin-1 byte 0xD1
        let file = write_temp(b"NOMBRE,A\xD1O,MES,AUTOS\nToll-5,2024,MARZO,1500\n");
        let table = load_table(file.path(), SourceEncoding::Latin1).unwrap();
        assert_eq!(table.headers()[1], "AÑO");
        assert_eq!(table.get(0, "AUTOS"), Some("1500"));
    }

    #[test]
    fn test_latin1_bytes_as_utf8_is_mismatch() {
        let file = write_temp(b"NOMBRE,A\xD1O\nx,2024\n");
        let err = load_table(file.path(), SourceEncoding::Utf8).unwrap_err();
        assert!(matches!(err, Error::EncodingMismatch { ref encoding, .. } if encoding == "utf8"));
    }

    #[test]
    fn test_utf8_with_bom() {
        let file = write_temp("\u{FEFF}NOMBRE,AÑO\nx,2024\n".as_bytes());
        let table = load_table(file.path(), SourceEncoding::Utf8).unwrap();
        assert_eq!(table.headers(), &["NOMBRE".to_string(), "AÑO".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_table("/nonexistent/aforos.csv", SourceEncoding::Utf8).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_flexible_rows_and_trim() {
        let table = parse_table("A, B ,C\n1, 2\n3,4,5\n").unwrap();
        assert_eq!(table.headers(), &["A".to_string(), "B".to_string(), "C".to_string()]);
        assert_eq!(table.rows()[0], vec!["1".to_string(), "2".to_string()]);
        assert_eq!(table.get(1, "C"), Some("5"));
    }

    #[test]
    fn test_quoted_thousands() {
        let table = parse_table("NOMBRE,AUTOS\n\"Caseta, Norte\",\"1,500\"\n").unwrap();
        assert_eq!(table.get(0, "NOMBRE"), Some("Caseta, Norte"));
        assert_eq!(table.get(0, "AUTOS"), Some("1,500"));
    }
}
