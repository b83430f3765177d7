use std::fmt::Write;

use chrono::NaiveDate;

use super::error::{Error, Result};

pub const DEFAULT_INPUT_DATE_FORMAT: &str = "%d/%m/%Y";
pub const DEFAULT_OUTPUT_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRecord {
    pub booked_date: NaiveDate,
    pub amount: String,
    pub payee: String,
    pub description: String,
    pub reference: String,
    pub check_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormats {
    input: String,
    output: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT_DATE_FORMAT.to_owned(),
            output: DEFAULT_OUTPUT_DATE_FORMAT.to_owned(),
        }
    }
}

impl DateFormats {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Result<Self> {
        let formats = Self {
            input: input.into(),
            output: output.into(),
        };

        for format in [&formats.input, &formats.output] {
            if !round_trips(format) {
                return Err(Error::InvalidDateFormat {
                    format: format.clone(),
                });
            }
        }

        Ok(formats)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), &self.input).ok()
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.output).to_string()
    }
}

// Needs a day, a month and a year and no time-of-day fields.
fn round_trips(format: &str) -> bool {
    let probe = NaiveDate::default();
    let mut rendered = String::new();
    if write!(rendered, "{}", probe.format(format)).is_err() {
        return false;
    }

    NaiveDate::parse_from_str(&rendered, format).is_ok_and(|date| date == probe)
}
