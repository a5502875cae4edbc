//! Spherical planet terrain with biome-dependent materials.
//!
//! Several decorrelated simplex fields shape the surface: a fine elevation
//! field (±2 blocks), a major elevation field (±15 blocks, also the mountain
//! mask), climate fields for temperature and moisture, a 3-D feature field
//! for small-scale variety, an ore field, and a lake field. All sampling is
//! a pure function of the world position and seed.

use astral_voxel::{AIR, BlockId, BlockRegistry, CHUNK_SIZE, ChunkData, ContextKey};
use glam::{IVec3, Vec3};
use noise::{NoiseFn, Simplex};

use crate::biome::Biome;
use crate::derive_seed;
use crate::materials::MaterialTable;
use crate::PlanetShell;

const ELEVATION_SCALE: f64 = 0.02;
const ELEVATION_MAJOR_SCALE: f64 = 0.01;
const TEMPERATURE_SCALE: f64 = 0.03;
const MOISTURE_SCALE: f64 = 0.04;
const FEATURE_SCALE: f64 = 0.08;
const ORE_SCALE: f64 = 0.1;
const LAKE_SCALE: f64 = 0.01;

/// Fine surface variation in blocks.
const ELEVATION_AMPLITUDE: f32 = 2.0;
/// Mountain/valley variation in blocks.
const ELEVATION_MAJOR_AMPLITUDE: f32 = 15.0;
/// Gold ore spawns where the ore field exceeds this, below 8 blocks depth.
const ORE_THRESHOLD: f32 = 0.75;
/// Water fills everything inside this fraction of the planet radius.
const WATER_LEVEL_FRACTION: f32 = 0.7;

pub struct SphericalGenerator {
    shell: PlanetShell,
    elevation: Simplex,
    elevation_major: Simplex,
    temperature: Simplex,
    moisture: Simplex,
    feature: Simplex,
    ore: Simplex,
    lake: Simplex,
    /// Per-biome (biome, planet) context keys, indexed by `Biome as usize`.
    context_keys: [ContextKey; Biome::ALL.len()],
}

impl SphericalGenerator {
    pub fn new(registry: &BlockRegistry, seed: u32, shell: PlanetShell) -> Self {
        let planet = registry.planet_id("earth");
        let mut context_keys = [ContextKey::default(); Biome::ALL.len()];
        for biome in Biome::ALL {
            context_keys[biome as usize] = ContextKey::new(registry.biome_id(biome.name()), planet);
        }

        Self {
            shell,
            elevation: Simplex::new(derive_seed(seed, 0x10)),
            elevation_major: Simplex::new(derive_seed(seed, 0x20)),
            temperature: Simplex::new(derive_seed(seed, 0x30)),
            moisture: Simplex::new(derive_seed(seed, 0x40)),
            feature: Simplex::new(derive_seed(seed, 0x50)),
            ore: Simplex::new(derive_seed(seed, 0x60)),
            lake: Simplex::new(derive_seed(seed, 0x70)),
            context_keys,
        }
    }

    /// Fills `out` for the chunk at `origin` (integer min corner).
    pub fn generate(
        &self,
        registry: &BlockRegistry,
        materials: &MaterialTable,
        origin: IVec3,
        out: &mut ChunkData,
    ) {
        let base = origin.as_vec3();
        for x in 0..CHUNK_SIZE {
            for y in 0..CHUNK_SIZE {
                for z in 0..CHUNK_SIZE {
                    // Sample at the voxel center.
                    let world = base + Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5);
                    out.set(x, y, z, self.sample_voxel(registry, materials, world));
                }
            }
        }
    }

    fn sample_voxel(
        &self,
        registry: &BlockRegistry,
        materials: &MaterialTable,
        world: Vec3,
    ) -> BlockId {
        let dist = world.distance(self.shell.center);
        let (wx, wy, wz) = (world.x as f64, world.y as f64, world.z as f64);

        let elevation = self.elevation.get([wx * ELEVATION_SCALE, wz * ELEVATION_SCALE]) as f32;
        let mut effective_radius = self.shell.radius + elevation * ELEVATION_AMPLITUDE;
        if dist > effective_radius {
            return AIR;
        }

        let major = self
            .elevation_major
            .get([wx * ELEVATION_MAJOR_SCALE, wz * ELEVATION_MAJOR_SCALE]) as f32;
        let feature = self
            .feature
            .get([wx * FEATURE_SCALE, wy * FEATURE_SCALE, wz * FEATURE_SCALE])
            as f32;

        // Mountains and valleys move the surface again; a voxel inside the
        // fine-elevation surface can still end up above the real one.
        effective_radius += major * ELEVATION_MAJOR_AMPLITUDE;
        if dist > effective_radius {
            return AIR;
        }

        let temperature_noise = self
            .temperature
            .get([wx * TEMPERATURE_SCALE, wz * TEMPERATURE_SCALE]) as f32;
        let moisture_noise = self.moisture.get([wx * MOISTURE_SCALE, wz * MOISTURE_SCALE]) as f32;

        // Higher elevation reads colder; the feature field adds local
        // moisture variety.
        let temperature = temperature_noise * 0.7 - major * 0.3;
        let moisture = moisture_noise * 0.8 + feature * 0.2;
        let biome = Biome::classify(temperature, moisture, major);

        let depth = effective_radius - dist;
        let mut block = if depth < 1.5 {
            self.surface_block(registry, materials, biome, feature, depth)
        } else if depth < 5.0 {
            Self::subsurface_block(materials, biome, feature)
        } else {
            self.deep_block(materials, biome, feature, depth, wx, wy, wz)
        };

        // Water pass: swampland pools, lakes in low-lying valleys, and the
        // global water level near the core.
        let lake = self.lake.get([wx * LAKE_SCALE, wz * LAKE_SCALE]) as f32;
        let lake_basin = lake < -0.4 && major < -0.2;
        if biome == Biome::Swamp {
            if feature > 0.1 && depth < 2.0 {
                block = materials.water;
            }
        } else if lake_basin && depth < 3.0 {
            block = materials.water;
        } else if dist <= self.shell.radius * WATER_LEVEL_FRACTION {
            block = materials.water;
        }

        block
    }

    fn surface_block(
        &self,
        registry: &BlockRegistry,
        materials: &MaterialTable,
        biome: Biome,
        feature: f32,
        depth: f32,
    ) -> BlockId {
        // Context-aware default; the stock cold-biome override turns this
        // into snow before the biome arms below refine it further.
        let contextual = registry.select_block(materials.grass, self.context_keys[biome as usize]);

        let mut block = match biome {
            Biome::Arctic => materials.ice,
            Biome::Desert => materials.sand,
            Biome::Volcanic => {
                if feature > 0.3 {
                    materials.lava
                } else {
                    materials.obsidian
                }
            }
            Biome::Swamp => {
                if feature > 0.2 {
                    materials.mud
                } else {
                    materials.grass
                }
            }
            Biome::Mountain => materials.granite,
            Biome::Forest => {
                if feature > 0.4 {
                    materials.moss_stone
                } else {
                    materials.grass
                }
            }
            Biome::Tropical => materials.moss_stone,
            Biome::Tundra | Biome::Cold => materials.snow,
            Biome::Temperate | Biome::Hot => contextual,
        };

        // Scatter cacti on the very top of desert dunes.
        if biome == Biome::Desert && feature > 0.7 && depth < 0.5 {
            block = materials.cactus;
        }
        block
    }

    fn subsurface_block(materials: &MaterialTable, biome: Biome, feature: f32) -> BlockId {
        match biome {
            Biome::Arctic | Biome::Tundra => materials.gravel,
            Biome::Desert => materials.sandstone,
            Biome::Volcanic => materials.basalt,
            Biome::Swamp => materials.clay,
            Biome::Mountain => {
                if feature > 0.3 {
                    materials.granite
                } else {
                    materials.stone
                }
            }
            _ => materials.dirt,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn deep_block(
        &self,
        materials: &MaterialTable,
        biome: Biome,
        feature: f32,
        depth: f32,
        wx: f64,
        wy: f64,
        wz: f64,
    ) -> BlockId {
        let mut block = match biome {
            Biome::Volcanic => {
                if feature > 0.5 {
                    materials.basalt
                } else {
                    materials.obsidian
                }
            }
            Biome::Mountain => materials.granite,
            _ => materials.stone,
        };

        if depth > 8.0 {
            let ore = self.ore.get([wx * ORE_SCALE, wy * ORE_SCALE, wz * ORE_SCALE]) as f32;
            if ore > ORE_THRESHOLD {
                block = materials.gold_ore;
            }
        }
        block
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
