//! Chunk snapshot persistence: one byte per voxel, no header.
//!
//! Files are named `chunk_{x}_{y}_{z}.chunk` from the integer world
//! coordinates of the chunk's min corner and hold exactly [`CHUNK_VOLUME`]
//! bytes in storage order. A file of any other size is treated as missing.
//!
//! The single-byte cell means only block ids 0-255 survive a round trip;
//! higher ids are truncated on save. The format is kept byte-compatible with
//! existing world data rather than widened.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::chunk::{CHUNK_SIZE, CHUNK_VOLUME, ChunkData};
use crate::registry::BlockId;

/// Errors raised while writing a snapshot. Reads are lenient and report
/// problems as "no snapshot" instead.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] io::Error),
}

/// Filesystem store for chunk snapshots, one directory per world.
pub struct ChunkStore {
    root: PathBuf,
}

impl ChunkStore {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the snapshot path for a chunk at the given min corner.
    pub fn chunk_path(&self, origin: [i32; 3]) -> PathBuf {
        self.root
            .join(format!("chunk_{}_{}_{}.chunk", origin[0], origin[1], origin[2]))
    }

    /// Writes a chunk snapshot, creating the world directory if needed.
    pub fn save(&self, origin: [i32; 3], data: &ChunkData) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.root)?;
        let bytes: Vec<u8> = data.as_slice().iter().map(|id| id.0 as u8).collect();
        fs::write(self.chunk_path(origin), bytes)?;
        tracing::trace!(x = origin[0], y = origin[1], z = origin[2], "saved chunk snapshot");
        Ok(())
    }

    /// Reads a chunk snapshot. Returns `None` when the file does not exist
    /// or has the wrong size (logged and regenerated by the caller).
    pub fn load(&self, origin: [i32; 3]) -> Option<ChunkData> {
        let path = self.chunk_path(origin);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read chunk snapshot");
                return None;
            }
        };

        if bytes.len() != CHUNK_VOLUME {
            tracing::warn!(
                path = %path.display(),
                len = bytes.len(),
                expected = CHUNK_VOLUME,
                "chunk snapshot has wrong size, ignoring"
            );
            return None;
        }

        let mut data = ChunkData::new();
        for (index, &byte) in bytes.iter().enumerate() {
            let z = index % CHUNK_SIZE;
            let y = (index / CHUNK_SIZE) % CHUNK_SIZE;
            let x = index / (CHUNK_SIZE * CHUNK_SIZE);
            data.set(x, y, z, BlockId(byte as u16));
        }
        Some(data)
    }

    /// Returns `true` if a snapshot of the right size exists for `origin`.
    pub fn contains(&self, origin: [i32; 3]) -> bool {
        fs::metadata(self.chunk_path(origin))
            .map(|meta| meta.len() as usize == CHUNK_VOLUME)
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
