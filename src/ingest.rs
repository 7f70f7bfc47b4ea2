// Uploaded bytes -> raw table.
//
// Exports arrive either as UTF-8 or as legacy single-byte text, so decoding
// tries UTF-8 first and falls back to Latin-1 (Windows-1252). Either the
// whole file parses or the caller gets an error; there are no partial tables.
use crate::error::IngestError;
use crate::types::{RawRecord, RawTable, SourceEncoding};
use csv::ReaderBuilder;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn decode(bytes: &[u8]) -> Result<(Cow<'_, str>, SourceEncoding), IngestError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok((Cow::Borrowed(text), SourceEncoding::Utf8));
    }
    warn!("input is not valid UTF-8, retrying as Latin-1");
    encoding_rs::WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| (text, SourceEncoding::Latin1))
        .ok_or(IngestError::Decode)
}

/// Parse delimited bytes into a [`RawTable`].
///
/// Header names are trimmed. Short rows are accepted and their missing
/// trailing cells are simply absent; rows whose cells are all blank are
/// dropped.
pub fn parse_bytes(bytes: &[u8], delimiter: u8) -> Result<RawTable, IngestError> {
    let (text, encoding) = decode(bytes)?;

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::NoHeader);
    }

    let mut records = Vec::new();
    let mut blank_rows = 0usize;
    for result in rdr.records() {
        let row = result?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.as_str(), value))
            .collect();
        if record.is_blank() {
            blank_rows += 1;
            continue;
        }
        records.push(record);
    }

    if blank_rows > 0 {
        debug!(blank_rows, "skipped blank rows");
    }
    info!(
        rows = records.len(),
        columns = headers.len(),
        %encoding,
        "parsed delimited input"
    );
    Ok(RawTable {
        headers,
        records,
        encoding,
    })
}

pub fn load_path(path: &Path, delimiter: u8) -> Result<RawTable, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&bytes, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_headers_and_keeps_row_order() {
        let csv = b"Disp, Cont Procsd ,Level\nAnn,50,L1\nBob,30,L2\n";
        let table = parse_bytes(csv, b',').unwrap();
        assert_eq!(table.headers, vec!["Disp", "Cont Procsd", "Level"]);
        assert_eq!(table.encoding, SourceEncoding::Utf8);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].value("Cont Procsd"), Some("50"));
        assert_eq!(table.records[1].value("Disp"), Some("Bob"));
    }

    #[test]
    fn falls_back_to_latin1() {
        // "José" with é as a single Latin-1 byte.
        let csv = b"Disp,Level\nJos\xe9,L2\n";
        let table = parse_bytes(csv, b',').unwrap();
        assert_eq!(table.encoding, SourceEncoding::Latin1);
        assert_eq!(table.records[0].value("Disp"), Some("José"));
    }

    #[test]
    fn strips_utf8_bom() {
        let csv = b"\xEF\xBB\xBFDisp\nAnn\n";
        let table = parse_bytes(csv, b',').unwrap();
        assert_eq!(table.headers, vec!["Disp"]);
    }

    #[test]
    fn strips_utf8_bom_before_latin1_fallback() {
        let csv = b"\xEF\xBB\xBFDisp,Cont Procsd\nRen\xe9e,5\n";
        let table = parse_bytes(csv, b',').unwrap();
        assert_eq!(table.encoding, SourceEncoding::Latin1);
        assert_eq!(table.headers, vec!["Disp", "Cont Procsd"]);
        assert_eq!(table.records[0].value("Disp"), Some("Renée"));
    }

    #[test]
    fn short_rows_and_blank_rows() {
        let csv = b"Disp,Level,Net Cont\nAnn\n,,\nBob,L1,7\n";
        let table = parse_bytes(csv, b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get("Level"), None);
        assert_eq!(table.records[1].value("Net Cont"), Some("7"));
    }

    #[test]
    fn semicolon_delimiter() {
        let table = parse_bytes(b"Disp;Level\nAnn;L3\n", b';').unwrap();
        assert_eq!(table.records[0].value("Level"), Some("L3"));
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(parse_bytes(b"", b','), Err(IngestError::NoHeader)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_path(Path::new("/nonexistent/prod.csv"), b',').unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
