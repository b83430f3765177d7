use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

const EXTENSION: &str = ".csv";
const SUFFIX: &str = "_output.csv";

// Only the last `.csv` of the file name is replaced.
pub fn derive_path(input: &Path) -> PathBuf {
    let name = input.file_name().and_then(|name| name.to_str());

    match name.and_then(|name| name.rfind(EXTENSION).map(|idx| (name, idx))) {
        Some((name, idx)) => input.with_file_name(format!(
            "{}{SUFFIX}{}",
            &name[..idx],
            &name[idx + EXTENSION.len()..]
        )),
        None => {
            let mut path = input.as_os_str().to_owned();
            path.push(SUFFIX);
            path.into()
        }
    }
}

pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|err| Error::io(dir, err))?;
    file.write_all(contents)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|err| Error::io(path, err))?;
    file.persist(path)
        .map_err(|err| Error::io(path, err.error))?;

    Ok(contents.len())
}
