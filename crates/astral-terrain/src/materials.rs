//! Pre-resolved block ids for the generator's hot loop.
//!
//! Name lookups happen once here; per-voxel decisions then work in numeric
//! ids only. A name missing from the registry resolves to air with a
//! warning rather than failing generation.

use astral_voxel::{AIR, BlockId, BlockRegistry};

/// Every block id the terrain generator can place.
#[derive(Clone, Copy, Debug)]
pub struct MaterialTable {
    pub stone: BlockId,
    pub grass: BlockId,
    pub dirt: BlockId,
    pub sand: BlockId,
    pub water: BlockId,
    pub snow: BlockId,
    pub gravel: BlockId,
    pub gold_ore: BlockId,
    pub clay: BlockId,
    pub mud: BlockId,
    pub obsidian: BlockId,
    pub lava: BlockId,
    pub ice: BlockId,
    pub sandstone: BlockId,
    pub cactus: BlockId,
    pub moss_stone: BlockId,
    pub granite: BlockId,
    pub basalt: BlockId,
}

impl MaterialTable {
    /// Resolves the standard material set against a registry.
    pub fn resolve(registry: &BlockRegistry) -> Self {
        let lookup = |name: &str| -> BlockId {
            registry.block_id(name).unwrap_or_else(|| {
                tracing::warn!(block = name, "terrain material missing from registry, using air");
                AIR
            })
        };

        Self {
            stone: lookup("astral:stone"),
            grass: lookup("astral:grass"),
            dirt: lookup("astral:dirt"),
            sand: lookup("astral:sand"),
            water: lookup("astral:water"),
            snow: lookup("astral:snow"),
            gravel: lookup("astral:gravel"),
            gold_ore: lookup("astral:gold_ore"),
            clay: lookup("astral:clay"),
            mud: lookup("astral:mud"),
            obsidian: lookup("astral:obsidian"),
            lava: lookup("astral:lava"),
            ice: lookup("astral:ice"),
            sandstone: lookup("astral:sandstone"),
            cactus: lookup("astral:cactus"),
            moss_stone: lookup("astral:moss_stone"),
            granite: lookup("astral:granite"),
            basalt: lookup("astral:basalt"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
