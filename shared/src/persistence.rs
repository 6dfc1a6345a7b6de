use std::{fs, io, path::Path};

use thiserror::Error;

use sectornet_serde::{decode_exact, encode, Serde, SerdeErr};

/// Errors reading or writing a save file
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Save file I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Save file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: SerdeErr,
    },
}

/// Writes `value` to `path` with the wire codec, creating parent directories
pub fn save<T: Serde>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let io_error = |source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, encode(value)).map_err(io_error)
}

/// Reads a value written by [`save`]
pub fn load<T: Serde>(path: &Path) -> Result<T, PersistenceError> {
    let bytes = fs::read(path).map_err(|source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode_exact(&bytes).map_err(|source| PersistenceError::Corrupt {
        path: path.display().to_string(),
        source,
    })
}
