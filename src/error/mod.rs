use std::path::PathBuf;

use thiserror::Error;

use crate::domain::error::Error as DomainError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),
    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not read statement rows from {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error(transparent)]
    Conversion(#[from] DomainError),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) | Error::Conversion(DomainError::InvalidDateFormat { .. }) => 2,
            Error::Io { .. } | Error::Csv { .. } => 3,
            Error::Conversion(DomainError::SchemaMismatch { .. }) => 4,
            Error::Conversion(DomainError::MalformedDate { .. }) => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
