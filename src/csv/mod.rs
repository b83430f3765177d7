use std::{
    io::{Read, Write},
    path::Path,
};

use csv::{ReaderBuilder, Trim, Writer};
use tracing::debug;

use crate::{
    domain::{
        schema::{self, SourceLayout},
        statement::{DateFormats, StatementRecord},
    },
    error::{Error, Result},
};

const DELIMITER: u8 = b';';

/// Parse [`StatementRecord`]s from a semicolon separated bank export.
///
/// The header is validated before any row is looked at and the first row
/// that fails aborts the whole read. Stray quotes inside quoted fields are
/// kept as text and cells that are not UTF-8 are read as Windows-1252.
pub fn read(
    mut reader: impl Read,
    source: &Path,
    formats: &DateFormats,
) -> Result<Vec<StatementRecord>> {
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .map_err(|err| Error::io(source, err))?;
    let raw = relax_quotes(&raw);

    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(raw.as_slice());

    let headers = reader
        .byte_headers()
        .map_err(|err| Error::csv(source, err))?
        .clone();
    let layout = SourceLayout::resolve(&headers)?;
    debug!(?layout, "resolved statement columns");

    reader
        .byte_records()
        .enumerate()
        .map(|(idx, row)| -> Result<StatementRecord> {
            let row = row.map_err(|err| Error::csv(source, err))?;
            let line = row.position().map_or(0, |pos| pos.line());
            Ok(layout.record(&row, idx + 1, line, formats)?)
        })
        .collect()
}

// Bank exports quote every field but do not escape quotes inside them.
// Inside a quoted field a quote only closes it when followed by the
// delimiter, a line break or the end of input; any other lone quote is
// doubled so the csv reader keeps it as text. A leading UTF-8 BOM is dropped.
fn relax_quotes(raw: &[u8]) -> Vec<u8> {
    let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);
    let mut out = Vec::with_capacity(raw.len());
    let mut field_start = true;
    let mut quoted = false;
    let mut idx = 0;

    while idx < raw.len() {
        let byte = raw[idx];
        let next = raw.get(idx + 1).copied();

        if quoted {
            if byte == b'"' {
                match next {
                    Some(b'"') => {
                        out.extend_from_slice(b"\"\"");
                        idx += 1;
                    }
                    None | Some(DELIMITER | b'\n' | b'\r') => {
                        out.push(b'"');
                        quoted = false;
                    }
                    Some(_) => out.extend_from_slice(b"\"\""),
                }
            } else {
                out.push(byte);
            }
        } else {
            out.push(byte);
            if field_start && byte == b'"' {
                quoted = true;
            }
            field_start = matches!(byte, DELIMITER | b'\n' | b'\r');
        }
        idx += 1;
    }

    out
}

pub fn write(
    records: &[StatementRecord],
    formats: &DateFormats,
    writer: impl Write,
) -> csv::Result<()> {
    let mut writer = Writer::from_writer(writer);

    writer.write_record(schema::target_header())?;
    for record in records {
        writer.write_record(schema::render(record, formats))?;
    }

    writer.flush()?;
    Ok(())
}
