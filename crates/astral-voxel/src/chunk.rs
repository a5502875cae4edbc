//! Dense voxel storage for 16×16×16 chunk volumes.
//!
//! One [`BlockId`] per cell, laid out x-major (z varies fastest), matching
//! the byte order of the snapshot format.

use crate::registry::{AIR, BlockId};

/// Side length of a chunk in voxels.
pub const CHUNK_SIZE: usize = 16;

/// Total number of voxels in a chunk (16³).
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// Flat voxel grid for one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkData {
    voxels: Box<[BlockId; CHUNK_VOLUME]>,
}

impl ChunkData {
    /// Creates a chunk filled with air.
    pub fn new() -> Self {
        Self {
            voxels: Box::new([AIR; CHUNK_VOLUME]),
        }
    }

    /// Returns the voxel at `(x, y, z)`. Each coordinate must be in `0..16`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.voxels[Self::linear_index(x, y, z)]
    }

    /// Sets the voxel at `(x, y, z)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        self.voxels[Self::linear_index(x, y, z)] = block;
    }

    /// Resets every voxel to the given block.
    pub fn fill(&mut self, block: BlockId) {
        self.voxels.fill(block);
    }

    /// Returns `true` if every voxel is air.
    pub fn is_all_air(&self) -> bool {
        self.voxels.iter().all(|&v| v == AIR)
    }

    /// The voxels in storage order (x outer, then y, then z).
    pub fn as_slice(&self) -> &[BlockId] {
        &self.voxels[..]
    }

    /// Converts `(x, y, z)` to the linear storage index (z varies fastest).
    #[inline]
    pub fn linear_index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < CHUNK_SIZE && y < CHUNK_SIZE && z < CHUNK_SIZE);
        (x * CHUNK_SIZE + y) * CHUNK_SIZE + z
    }
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_air() {
        let chunk = ChunkData::new();
        assert!(chunk.is_all_air());
        assert_eq!(chunk.get(0, 0, 0), AIR);
        assert_eq!(chunk.get(15, 15, 15), AIR);
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut chunk = ChunkData::new();
        chunk.set(3, 7, 11, BlockId(5));
        assert_eq!(chunk.get(3, 7, 11), BlockId(5));
        assert_eq!(chunk.get(11, 7, 3), AIR);
    }

    #[test]
    fn test_storage_order_is_x_major() {
        assert_eq!(ChunkData::linear_index(0, 0, 0), 0);
        assert_eq!(ChunkData::linear_index(0, 0, 1), 1);
        assert_eq!(ChunkData::linear_index(0, 1, 0), CHUNK_SIZE);
        assert_eq!(ChunkData::linear_index(1, 0, 0), CHUNK_SIZE * CHUNK_SIZE);
        assert_eq!(
            ChunkData::linear_index(15, 15, 15),
            CHUNK_VOLUME - 1
        );
    }

    #[test]
    fn test_fill() {
        let mut chunk = ChunkData::new();
        chunk.fill(BlockId(1));
        assert!(!chunk.is_all_air());
        assert!(chunk.as_slice().iter().all(|&v| v == BlockId(1)));
    }
}
