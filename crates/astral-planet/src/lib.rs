//! Chunk pipeline driver and per-planet streaming.
//!
//! [`Chunk`] carries one cubic voxel region through its lifecycle, with each
//! stage claimed by an atomic state transition so pool workers never collide.
//! [`Planet`] owns the sparse chunk grid around one planetary body and
//! decides, per frame, which chunks to create, advance, and evict.

pub mod chunk;
pub mod planet;
pub mod tasks;

pub use chunk::Chunk;
pub use planet::{ChunkDraw, PipelineContext, Planet};
pub use tasks::{CounterSnapshot, MainThreadQueue, MainThreadTask, PipelineCounters};
