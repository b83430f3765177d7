use std::borrow::Cow;

use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;

use super::{
    error::{Error, Result},
    statement::{DateFormats, StatementRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    BookedDate,
    Amount,
    Payee,
    Description,
    Reference,
    CheckNumber,
}

impl Field {
    fn render(self, record: &StatementRecord, formats: &DateFormats) -> String {
        match self {
            Field::BookedDate => formats.format(record.booked_date),
            Field::Amount => record.amount.clone(),
            Field::Payee => record.payee.clone(),
            Field::Description => record.description.clone(),
            Field::Reference => record.reference.clone(),
            Field::CheckNumber => record.check_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub target: &'static str,
    pub source: Option<&'static str>,
    pub field: Field,
}

/// Bank export columns → statement fields → accounting import columns, in
/// output order.
pub const COLUMNS: [Column; 6] = [
    Column {
        target: "*Date",
        source: Some("Booked date"),
        field: Field::BookedDate,
    },
    Column {
        target: "*Amount",
        source: Some("Amount in GBP"),
        field: Field::Amount,
    },
    Column {
        target: "Payee",
        source: None,
        field: Field::Payee,
    },
    Column {
        target: "Description",
        source: Some("Text"),
        field: Field::Description,
    },
    Column {
        target: "Reference",
        source: Some("Bank's archive reference"),
        field: Field::Reference,
    },
    Column {
        target: "Cheque Number",
        source: None,
        field: Field::CheckNumber,
    },
];

pub fn target_header() -> impl Iterator<Item = &'static str> {
    COLUMNS.iter().map(|column| column.target)
}

pub fn render(record: &StatementRecord, formats: &DateFormats) -> Vec<String> {
    COLUMNS
        .iter()
        .map(|column| column.field.render(record, formats))
        .collect()
}

// Exports that are not UTF-8 come out of Windows in the ANSI code page.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

#[derive(Debug)]
pub struct SourceLayout {
    positions: Vec<(Field, usize)>,
}

impl SourceLayout {
    pub fn resolve(headers: &ByteRecord) -> Result<Self> {
        let mut positions = Vec::new();
        let mut missing = Vec::new();

        for column in &COLUMNS {
            let Some(name) = column.source else {
                continue;
            };

            match headers
                .iter()
                .position(|header| {
                    decode(header)
                        .trim_start_matches('\u{feff}')
                        .trim()
                        == name
                })
            {
                Some(idx) => positions.push((column.field, idx)),
                None => missing.push(name.to_owned()),
            }
        }

        if !missing.is_empty() {
            return Err(Error::SchemaMismatch { missing });
        }

        Ok(Self { positions })
    }

    fn cell<'r>(&self, fields: &'r ByteRecord, field: Field) -> Cow<'r, str> {
        self.positions
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .and_then(|(_, idx)| fields.get(*idx))
            .map(decode)
            .unwrap_or_default()
    }

    /// `row` is the 1-based data row, `line` the physical line it started on.
    pub fn record(
        &self,
        fields: &ByteRecord,
        row: usize,
        line: u64,
        formats: &DateFormats,
    ) -> Result<StatementRecord> {
        let raw_date = self.cell(fields, Field::BookedDate);
        let booked_date = formats
            .parse(&raw_date)
            .ok_or_else(|| Error::MalformedDate {
                value: raw_date.to_string(),
                row,
                line,
            })?;

        Ok(StatementRecord {
            booked_date,
            amount: self.cell(fields, Field::Amount).into_owned(),
            payee: self.cell(fields, Field::Payee).into_owned(),
            description: self.cell(fields, Field::Description).into_owned(),
            reference: self.cell(fields, Field::Reference).into_owned(),
            check_number: self.cell(fields, Field::CheckNumber).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn danske_header() -> ByteRecord {
        ByteRecord::from(vec![
            "Booked date",
            "Interest date",
            "Text",
            "Number",
            "Amount in GBP",
            "Booked balance in GBP",
            "Status",
            "Bank's archive reference",
        ])
    }

    fn coffee_row() -> ByteRecord {
        ByteRecord::from(vec![
            "01/02/2016",
            "01/02/2016",
            "Coffee Shop",
            "000123",
            "-4.50",
            "120.00",
            "Booked",
            "REF001",
        ])
    }

    #[test]
    fn header_matches_accounting_import() {
        let header: Vec<_> = target_header().collect();
        assert_eq!(
            header.join(","),
            "*Date,*Amount,Payee,Description,Reference,Cheque Number"
        );
    }

    #[test]
    fn maps_danske_row() {
        let formats = DateFormats::default();
        let layout = SourceLayout::resolve(&danske_header()).unwrap();
        let record = layout.record(&coffee_row(), 1, 2, &formats).unwrap();

        assert_eq!(
            record,
            StatementRecord {
                booked_date: NaiveDate::from_ymd_opt(2016, 2, 1).unwrap(),
                amount: "-4.50".to_owned(),
                payee: String::new(),
                description: "Coffee Shop".to_owned(),
                reference: "REF001".to_owned(),
                check_number: String::new(),
            }
        );
        assert_eq!(
            render(&record, &formats),
            vec!["01/02/2016", "-4.50", "", "Coffee Shop", "REF001", ""]
        );
    }

    #[test]
    fn column_order_in_source_is_irrelevant() {
        let header = ByteRecord::from(vec![
            "Bank's archive reference",
            "Text",
            "Amount in GBP",
            "Booked date",
        ]);
        let row = ByteRecord::from(vec!["REF9", "Rent", "-900.00", "15/03/2016"]);

        let layout = SourceLayout::resolve(&header).unwrap();
        let record = layout.record(&row, 1, 2, &DateFormats::default()).unwrap();

        assert_eq!(record.reference, "REF9");
        assert_eq!(record.description, "Rent");
        assert_eq!(record.amount, "-900.00");
        assert_eq!(
            record.booked_date,
            NaiveDate::from_ymd_opt(2016, 3, 15).unwrap()
        );
    }

    #[test]
    fn reports_every_missing_column() {
        let header = ByteRecord::from(vec!["Booked date", "Amount in GBP"]);

        match SourceLayout::resolve(&header) {
            Err(Error::SchemaMismatch { missing }) => {
                assert_eq!(missing, vec!["Text", "Bank's archive reference"])
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_date_carries_value_and_position() {
        let layout = SourceLayout::resolve(&danske_header()).unwrap();
        let row = ByteRecord::from(vec![
            "31/02/2016",
            "01/02/2016",
            "Coffee Shop",
            "000123",
            "-4.50",
            "120.00",
            "Booked",
            "REF001",
        ]);

        match layout.record(&row, 3, 4, &DateFormats::default()) {
            Err(Error::MalformedDate { value, row, line }) => {
                assert_eq!(value, "31/02/2016");
                assert_eq!(row, 3);
                assert_eq!(line, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn short_row_without_date_is_malformed() {
        let layout = SourceLayout::resolve(&danske_header()).unwrap();
        let row = ByteRecord::new();

        assert!(matches!(
            layout.record(&row, 1, 2, &DateFormats::default()),
            Err(Error::MalformedDate { value, .. }) if value.is_empty()
        ));
    }

    #[test]
    fn windows_1252_text_is_decoded() {
        let layout = SourceLayout::resolve(&danske_header()).unwrap();
        let cells: [&[u8]; 8] = [
            b"01/02/2016",
            b"",
            b"Caf\xE9",
            b"",
            b"-4.50",
            b"",
            b"Booked",
            b"R1",
        ];
        let row = ByteRecord::from(cells.to_vec());

        let record = layout.record(&row, 1, 2, &DateFormats::default()).unwrap();

        assert_eq!(record.description, "Café");
        assert_eq!(record.amount, "-4.50");
    }

    #[test]
    fn non_utf8_date_is_malformed() {
        let layout = SourceLayout::resolve(&danske_header()).unwrap();
        let cells: [&[u8]; 8] = [
            b"01/02/2016\xFF",
            b"",
            b"Coffee",
            b"",
            b"-4.50",
            b"",
            b"Booked",
            b"R1",
        ];
        let row = ByteRecord::from(cells.to_vec());

        assert!(matches!(
            layout.record(&row, 1, 2, &DateFormats::default()),
            Err(Error::MalformedDate { value, .. }) if value == "01/02/2016\u{ff}"
        ));
    }
}
