#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Binary persistence adapter for PathX.
//!
//! Three fixed on-disk formats live here: road-graph levels (`.bin`),
//! snake layouts, and the player record file. The byte layouts are frozen
//! for compatibility. Integers are big-endian and strings carry a
//! big-endian `u16` byte-length prefix. Decoding is all-or-nothing: a
//! malformed file yields an error, never a partially-populated value. Saves
//! go through a sibling temporary file and an atomic rename, so a failed
//! write never corrupts the previous file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pathx_level::{Level, LevelIntegrityError};
use pathx_system_records::PlayerRecords;
use pathx_world::{SnakeLayout, SnakeLayoutError};
use thiserror::Error;

mod bytes;
mod level;
mod records;
mod snake;

pub use level::{decode_level, encode_level};
pub use records::{decode_records, encode_records};
pub use snake::{decode_snake, encode_snake};

/// Byte-level decoding and encoding failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The input ended before a field could be read in full.
    #[error("input truncated at byte {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Byte offset the failed read started at.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes that remained in the input.
        available: usize,
    },
    /// A boolean byte held something other than 0 or 1.
    #[error("invalid boolean byte {value:#04x} at offset {offset}")]
    InvalidBool {
        /// Byte offset of the offending value.
        offset: usize,
        /// The byte that was read.
        value: u8,
    },
    /// A string field held bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset of the string payload.
        offset: usize,
    },
    /// A count or dimension field was negative.
    #[error("{what} is negative ({value})")]
    NegativeCount {
        /// The field that failed.
        what: &'static str,
        /// The value that was read.
        value: i32,
    },
    /// A stored time field was negative.
    #[error("stored time is negative ({value} ms)")]
    InvalidTime {
        /// The millisecond value that was read.
        value: i64,
    },
    /// A value does not fit the fixed-width field that stores it.
    #[error("{what} does not fit its field")]
    ValueTooLarge {
        /// The field that failed.
        what: &'static str,
    },
    /// Input remained after the final field was read.
    #[error("{remaining} unexpected trailing bytes")]
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },
    /// An index field pointed outside the arena it indexes.
    #[error("{what} index {index} is outside the arena of {len}")]
    IndexOutOfRange {
        /// The field that failed.
        what: &'static str,
        /// The index that was read.
        index: i32,
        /// Size of the arena being indexed.
        len: usize,
    },
    /// An algorithm name did not match any known variant.
    #[error(transparent)]
    UnknownAlgorithm(#[from] pathx_core::UnknownAlgorithm),
    /// The decoded level failed cross-reference validation.
    #[error(transparent)]
    Integrity(#[from] LevelIntegrityError),
    /// The decoded snake layout was unusable.
    #[error(transparent)]
    Snake(#[from] SnakeLayoutError),
}

/// Failures surfaced by the file-level load and save operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file could not be read or written.
    #[error("i/o failure on {path}: {source}")]
    Io {
        /// Path of the file involved.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The file was read but its contents did not decode.
    #[error("malformed data in {path}: {source}")]
    Malformed {
        /// Path of the file involved.
        path: PathBuf,
        /// The underlying codec error.
        source: CodecError,
    },
    /// The value could not be encoded for saving.
    #[error("could not encode data for {path}: {source}")]
    Unencodable {
        /// Path of the destination file.
        path: PathBuf,
        /// The underlying codec error.
        source: CodecError,
    },
}

/// Loads a level from the provided path.
pub fn load_level(path: &Path) -> Result<Level, StorageError> {
    let bytes = read_file(path)?;
    decode_level(&bytes).map_err(|source| StorageError::Malformed {
        path: path.to_owned(),
        source,
    })
}

/// Saves a level to the provided path, replacing any existing file
/// atomically.
pub fn save_level(path: &Path, level: &Level) -> Result<(), StorageError> {
    let bytes = encode_level(level).map_err(|source| StorageError::Unencodable {
        path: path.to_owned(),
        source,
    })?;
    write_file_atomically(path, &bytes)
}

/// Loads a snake layout from the provided path.
pub fn load_snake(path: &Path) -> Result<SnakeLayout, StorageError> {
    let bytes = read_file(path)?;
    decode_snake(&bytes).map_err(|source| StorageError::Malformed {
        path: path.to_owned(),
        source,
    })
}

/// Saves a snake layout to the provided path, replacing any existing file
/// atomically.
pub fn save_snake(path: &Path, layout: &SnakeLayout) -> Result<(), StorageError> {
    let bytes = encode_snake(layout).map_err(|source| StorageError::Unencodable {
        path: path.to_owned(),
        source,
    })?;
    write_file_atomically(path, &bytes)
}

/// Loads the player records from the provided path.
///
/// A missing file is not an error: play history simply has not started yet,
/// so an empty record set comes back. A file that exists but does not
/// decode is reported; silently discarding it would erase history on the
/// next save.
pub fn load_records(path: &Path) -> Result<PlayerRecords, StorageError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(PlayerRecords::new());
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_owned(),
                source,
            });
        }
    };
    decode_records(&bytes).map_err(|source| StorageError::Malformed {
        path: path.to_owned(),
        source,
    })
}

/// Saves the player records to the provided path, replacing any existing
/// file atomically.
pub fn save_records(path: &Path, records: &PlayerRecords) -> Result<(), StorageError> {
    let bytes = encode_records(records).map_err(|source| StorageError::Unencodable {
        path: path.to_owned(),
        source,
    })?;
    write_file_atomically(path, &bytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>, StorageError> {
    fs::read(path).map_err(|source| StorageError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Writes via a sibling temporary file and renames over the target so a
/// failure mid-write leaves the previous file untouched.
fn write_file_atomically(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut temp_name = path.file_name().map_or_else(
        || std::ffi::OsString::from(".pathx"),
        std::ffi::OsStr::to_os_string,
    );
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = fs::write(&temp_path, bytes).and_then(|()| fs::rename(&temp_path, path));
    match result {
        Ok(()) => Ok(()),
        Err(source) => {
            // Leave no stray temporary behind; the original file is intact.
            let _ = fs::remove_file(&temp_path);
            Err(StorageError::Io {
                path: path.to_owned(),
                source,
            })
        }
    }
}
