use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("statement header is missing required column(s): {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
    #[error("malformed booked date {value:?} in row {row} (line {line})")]
    MalformedDate {
        value: String,
        row: usize,
        line: u64,
    },
    #[error("{format:?} is not a usable date format")]
    InvalidDateFormat { format: String },
}

pub type Result<T> = std::result::Result<T, Error>;
