//! Reader for osm2pgsql flat nodes files.
//!
//! A flat nodes file is a dense array of 8-byte slots with no header. Slot
//! `n` holds the location of node `n` as two little-endian `i32` values,
//! longitude then latitude, in units of 1e-7 degrees. Slots that were never
//! written carry [`Coordinate::UNSET`].

use std::{
    fmt,
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    sync::{Mutex, PoisonError},
};

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use nodeloc_core::{Coordinate, LocationStore, LookupFailure, NodeId, classify_slot};
use nodeloc_fs::{AccessMode, open_std_file};
use thiserror::Error;

/// Size of one node slot in bytes.
pub const SLOT_SIZE: u64 = 8;

/// Error raised when opening a flat nodes file.
#[derive(Debug, Error)]
pub enum FlatNodesError {
    /// The file could not be opened in the requested mode.
    #[error("failed to open flat nodes file {path:?} ({mode:?}): {source}")]
    Open {
        /// Location of the flat nodes file.
        path: Utf8PathBuf,
        /// Requested access mode.
        mode: AccessMode,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// File metadata could not be read.
    #[error("failed to inspect flat nodes file {path:?}: {source}")]
    Metadata {
        /// Location of the flat nodes file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The path does not name a regular file.
    #[error("flat nodes path {path:?} is not a file")]
    NotAFile {
        /// Location of the flat nodes file.
        path: Utf8PathBuf,
    },
    /// The file length is not a whole number of slots.
    #[error("flat nodes file {path:?} is {len} bytes long, not a multiple of {}", SLOT_SIZE)]
    TruncatedSlot {
        /// Location of the flat nodes file.
        path: Utf8PathBuf,
        /// Observed length in bytes.
        len: u64,
    },
}

/// Read-only view of a flat nodes file.
///
/// Lookups seek and read a single slot under an internal lock, so the store
/// can be shared between threads.
pub struct FlatNodesStore {
    file: Mutex<File>,
    slots: u64,
    path: Utf8PathBuf,
}

impl fmt::Debug for FlatNodesStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatNodesStore")
            .field("path", &self.path)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

impl FlatNodesStore {
    /// Open a flat nodes file with read and write access.
    ///
    /// osm2pgsql opens its node cache for writing, so files shared with it are
    /// opened the same way even though lookups only read.
    pub fn open(path: &Utf8Path) -> Result<Self, FlatNodesError> {
        Self::open_with(path, AccessMode::ReadWrite)
    }

    /// Open a flat nodes file in `mode`.
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "slot count is exact once the length is checked"
    )]
    pub fn open_with(path: &Utf8Path, mode: AccessMode) -> Result<Self, FlatNodesError> {
        let file = open_std_file(path, mode).map_err(|source| FlatNodesError::Open {
            path: path.to_path_buf(),
            mode,
            source,
        })?;
        let metadata = file.metadata().map_err(|source| FlatNodesError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(FlatNodesError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let len = metadata.len();
        if len % SLOT_SIZE != 0 {
            return Err(FlatNodesError::TruncatedSlot {
                path: path.to_path_buf(),
                len,
            });
        }

        let slots = len / SLOT_SIZE;
        debug!("Opened flat nodes file {path} with {slots} slots ({mode:?})");
        Ok(Self {
            file: Mutex::new(file),
            slots,
            path: path.to_path_buf(),
        })
    }

    /// Number of slots in the file.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.slots
    }

    /// Whether the file holds no slots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots == 0
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_slot(&self, slot: u64) -> io::Result<Coordinate> {
        let mut bytes = [0_u8; 8];
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.seek(SeekFrom::Start(slot * SLOT_SIZE))?;
        file.read_exact(&mut bytes)?;
        Ok(decode_slot(bytes))
    }
}

impl LocationStore for FlatNodesStore {
    fn lookup(&self, id: NodeId) -> Result<Coordinate, LookupFailure> {
        let Some(slot) = id.slot().filter(|slot| *slot < self.slots) else {
            return Err(LookupFailure::NotFound { id });
        };
        match self.read_slot(slot) {
            Ok(coordinate) => classify_slot(id, coordinate),
            // The file shrank after it was opened.
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Err(LookupFailure::NotFound { id })
            }
            Err(err) => Err(LookupFailure::Unreadable {
                id,
                kind: err.kind(),
            }),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[expect(clippy::little_endian_bytes, reason = "flat nodes slots are little-endian")]
pub(crate) const fn encode_slot(coordinate: Coordinate) -> [u8; 8] {
    let [x0, x1, x2, x3] = coordinate.x().to_le_bytes();
    let [y0, y1, y2, y3] = coordinate.y().to_le_bytes();
    [x0, x1, x2, x3, y0, y1, y2, y3]
}

#[expect(clippy::little_endian_bytes, reason = "flat nodes slots are little-endian")]
pub(crate) const fn decode_slot(bytes: [u8; 8]) -> Coordinate {
    let [x0, x1, x2, x3, y0, y1, y2, y3] = bytes;
    Coordinate::from_fixed(
        i32::from_le_bytes([x0, x1, x2, x3]),
        i32::from_le_bytes([y0, y1, y2, y3]),
    )
}
