//! Chunk lifecycle states and the atomic cell that guards phase transitions.
//!
//! Every forward step of the pipeline claims the chunk with a single
//! compare-and-swap from the expected predecessor state. A failed swap means
//! another thread already owns the phase (or the chunk was reset) and the
//! caller must walk away without touching chunk data. That CAS is the only
//! exclusivity guard in the pipeline.

use std::sync::atomic::{AtomicU8, Ordering};

/// The seven lifecycle states a chunk moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ChunkState {
    /// No usable data; the starting state, also re-entered on reset.
    Uninitialized = 0,
    /// A worker is producing voxel data.
    DataGenerating = 1,
    /// Voxel data exists; no mesh yet.
    DataReady = 2,
    /// A worker is building CPU mesh data.
    MeshBuilding = 3,
    /// CPU mesh data exists; no GPU buffers yet.
    MeshReady = 4,
    /// The context thread is creating GPU buffers.
    GpuInitializing = 5,
    /// Renderable; the terminal state.
    FullyInitialized = 6,
}

impl ChunkState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Uninitialized,
            1 => Self::DataGenerating,
            2 => Self::DataReady,
            3 => Self::MeshBuilding,
            4 => Self::MeshReady,
            5 => Self::GpuInitializing,
            _ => Self::FullyInitialized,
        }
    }
}

/// Lock-free cell holding a [`ChunkState`].
#[derive(Debug)]
pub struct AtomicChunkState(AtomicU8);

impl AtomicChunkState {
    pub fn new(state: ChunkState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> ChunkState {
        ChunkState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Unconditionally stores a state. Used for completion, rollback, and
    /// reset; phase entry must go through [`transition`](Self::transition).
    pub fn store(&self, state: ChunkState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Attempts the `from` → `to` transition. Returns `false` (without
    /// changing anything) when the current state is not `from`.
    pub fn transition(&self, from: ChunkState, to: ChunkState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for AtomicChunkState {
    fn default() -> Self {
        Self::new(ChunkState::Uninitialized)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_initial_state() {
        let state = AtomicChunkState::default();
        assert_eq!(state.load(), ChunkState::Uninitialized);
    }

    #[test]
    fn test_transition_from_expected_state() {
        let state = AtomicChunkState::default();
        assert!(state.transition(ChunkState::Uninitialized, ChunkState::DataGenerating));
        assert_eq!(state.load(), ChunkState::DataGenerating);
    }

    #[test]
    fn test_transition_from_wrong_state_is_noop() {
        let state = AtomicChunkState::default();
        assert!(!state.transition(ChunkState::DataReady, ChunkState::MeshBuilding));
        assert_eq!(state.load(), ChunkState::Uninitialized);
    }

    #[test]
    fn test_only_one_thread_wins_transition() {
        let state = Arc::new(AtomicChunkState::default());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let state = Arc::clone(&state);
            handles.push(std::thread::spawn(move || {
                state.transition(ChunkState::Uninitialized, ChunkState::DataGenerating)
            }));
        }
        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(state.load(), ChunkState::DataGenerating);
    }

    #[test]
    fn test_store_resets_unconditionally() {
        let state = AtomicChunkState::new(ChunkState::FullyInitialized);
        state.store(ChunkState::Uninitialized);
        assert_eq!(state.load(), ChunkState::Uninitialized);
    }
}
