//! Deterministic terrain generation for chunk voxel data.
//!
//! Two modes share one entry point: without a planet shell a chunk gets flat
//! heightmap terrain; with one it gets a spherical planet surface with
//! biome-dependent materials. Generation is a pure function of
//! `(seed, chunk origin, shell)` with no I/O and no shared mutable state, so the
//! same chunk generates identically on any worker thread.

pub mod biome;
pub mod flat;
pub mod materials;
pub mod spherical;

use astral_voxel::{BlockRegistry, ChunkData};
use glam::{IVec3, Vec3};

pub use biome::Biome;
pub use flat::FlatGenerator;
pub use materials::MaterialTable;
pub use spherical::SphericalGenerator;

/// Center and radius of the planet a chunk belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetShell {
    pub center: Vec3,
    pub radius: f32,
}

/// Either terrain mode behind one interface. Building one of these sets up
/// the noise fields once; planets construct it at creation time and share it
/// across worker threads.
pub enum TerrainGenerator {
    Flat(FlatGenerator),
    Spherical(SphericalGenerator),
}

impl TerrainGenerator {
    pub fn new(registry: &BlockRegistry, seed: u32, shell: Option<PlanetShell>) -> Self {
        match shell {
            Some(shell) => Self::Spherical(SphericalGenerator::new(registry, seed, shell)),
            None => Self::Flat(FlatGenerator::new(seed)),
        }
    }

    /// Fills `out` with terrain for the chunk whose min corner sits at
    /// `origin` (integer world coordinates).
    pub fn generate(
        &self,
        registry: &BlockRegistry,
        materials: &MaterialTable,
        origin: IVec3,
        out: &mut ChunkData,
    ) {
        match self {
            Self::Flat(flat) => flat.generate(materials, origin, out),
            Self::Spherical(spherical) => spherical.generate(registry, materials, origin, out),
        }
    }
}

/// One-shot convenience over [`TerrainGenerator`].
pub fn generate_chunk(
    registry: &BlockRegistry,
    materials: &MaterialTable,
    seed: u32,
    origin: IVec3,
    shell: Option<PlanetShell>,
    out: &mut ChunkData,
) {
    TerrainGenerator::new(registry, seed, shell).generate(registry, materials, origin, out);
}

/// Mixes a salt into the world seed so each noise field gets a decorrelated
/// generator.
pub(crate) fn derive_seed(world_seed: u32, salt: u32) -> u32 {
    world_seed
        .wrapping_add(salt)
        .wrapping_mul(0x9E37_79B9)
        .rotate_left(13)
        .wrapping_add(salt)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
