use std::{
    fs::File,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    domain::statement::DateFormats,
    error::{Error, Result},
    output,
};

#[derive(Debug)]
pub struct Conversion {
    pub output_path: PathBuf,
    pub content: String,
    pub bytes_written: usize,
    pub records: usize,
}

/// Nothing is written unless every row converts.
pub fn convert_file(input: &Path, formats: &DateFormats) -> Result<Conversion> {
    debug!(
        input_format = formats.input(),
        output_format = formats.output(),
        "converting {}",
        input.display()
    );
    let file = File::open(input).map_err(|err| Error::io(input, err))?;
    let records = crate::csv::read(file, input, formats)?;

    let mut buffer = Vec::new();
    crate::csv::write(&records, formats, &mut buffer).map_err(|err| Error::csv(input, err))?;
    let content = String::from_utf8_lossy(&buffer).into_owned();

    let output_path = output::derive_path(input);
    let bytes_written = output::write_atomic(&output_path, &buffer)?;
    info!(
        input = %input.display(),
        output = %output_path.display(),
        records = records.len(),
        bytes_written,
        "converted statement"
    );

    Ok(Conversion {
        output_path,
        content,
        bytes_written,
        records: records.len(),
    })
}
