//! Flat heightmap terrain for chunks without a planet shell.

use astral_voxel::{AIR, CHUNK_SIZE, ChunkData};
use glam::IVec3;
use noise::{NoiseFn, Simplex};

use crate::derive_seed;
use crate::materials::MaterialTable;

const HEIGHT_SCALE: f64 = 0.01;

/// Simple heightmap generator: stone column capped with one layer of grass.
pub struct FlatGenerator {
    height: Simplex,
}

impl FlatGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            height: Simplex::new(derive_seed(seed, 0x01)),
        }
    }

    /// Fills `out` for the chunk at `origin`. The surface height per column
    /// is `SIZE/2 + noise · SIZE/4`, clamped to `[1, SIZE-1]`; stone below
    /// the surface, grass as the top layer, air above.
    pub fn generate(&self, materials: &MaterialTable, origin: IVec3, out: &mut ChunkData) {
        let size = CHUNK_SIZE as i32;
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let world_x = (origin.x + x as i32) as f64;
                let world_z = (origin.z + z as i32) as f64;
                let noise = self
                    .height
                    .get([world_x * HEIGHT_SCALE, world_z * HEIGHT_SCALE]);
                let height = (size as f64 / 2.0 + noise * size as f64 / 4.0) as i32;
                let height = height.clamp(1, size - 1);

                for y in 0..CHUNK_SIZE {
                    let block = if (y as i32) < height - 1 {
                        materials.stone
                    } else if y as i32 == height - 1 {
                        materials.grass
                    } else {
                        AIR
                    };
                    out.set(x, y, z, block);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use astral_voxel::BlockRegistry;

    fn generate(seed: u32, origin: IVec3) -> (ChunkData, MaterialTable) {
        let registry = BlockRegistry::with_defaults();
        let materials = MaterialTable::resolve(&registry);
        let mut data = ChunkData::new();
        FlatGenerator::new(seed).generate(&materials, origin, &mut data);
        (data, materials)
    }

    #[test]
    fn test_columns_are_stone_grass_air() {
        let (data, materials) = generate(42, IVec3::ZERO);

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                // Find the grass layer; everything below is stone, above air.
                let mut grass_y = None;
                for y in 0..CHUNK_SIZE {
                    if data.get(x, y, z) == materials.grass {
                        assert!(grass_y.is_none(), "two grass layers in one column");
                        grass_y = Some(y);
                    }
                }
                let grass_y = grass_y.expect("column has no grass layer");
                for y in 0..CHUNK_SIZE {
                    let block = data.get(x, y, z);
                    if y < grass_y {
                        assert_eq!(block, materials.stone);
                    } else if y > grass_y {
                        assert_eq!(block, AIR);
                    }
                }
                // Height is clamped to [1, SIZE-1], so the grass layer index
                // stays in [0, SIZE-2].
                assert!(grass_y <= CHUNK_SIZE - 2);
            }
        }
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let origin = IVec3::new(32, 0, -16);
        let (a, _) = generate(42, origin);
        let (b, _) = generate(42, origin);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let origin = IVec3::ZERO;
        let (a, _) = generate(1, origin);
        let (b, _) = generate(2, origin);
        assert_ne!(a, b);
    }
}
