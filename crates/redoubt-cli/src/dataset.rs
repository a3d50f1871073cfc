//! Dataset file I/O.
//!
//! The on-disk format is a single line of whitespace-separated base-10
//! integers. The writer emits each value followed by a single space, all
//! on one line, matching what the reader splits on.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use redoubt::{Sequence, Value};

/// Errors from reading or writing a dataset file.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Underlying OS I/O error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token in the input file is not a base-10 integer.
    #[error("invalid integer {token:?} (token {position}) in {path}")]
    Parse {
        path: PathBuf,
        token: String,
        position: usize,
    },
}

/// Reads a sequence of integers from `path`.
pub fn read_values(path: &Path) -> Result<Sequence, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    text.split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            token.parse::<Value>().map_err(|_| DatasetError::Parse {
                path: path.to_path_buf(),
                token: token.to_owned(),
                position,
            })
        })
        .collect()
}

/// Writes `values` to `path`, each followed by a trailing space.
pub fn write_values(path: &Path, values: &[Value]) -> Result<(), DatasetError> {
    let mut line = String::with_capacity(values.len() * 4);
    for value in values {
        // Infallible for String targets.
        let _ = write!(line, "{value} ");
    }

    fs::write(path, line).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
