//! Block registry: maps compact [`BlockId`] values to rich [`BlockDefinition`]
//! metadata plus a dense [`BlockRenderData`] table for hot-path queries.
//!
//! Air is always ID 0 so that zero-initialized chunk memory represents empty
//! space. Biome and planet contexts get small `u8` ids; context-dependent
//! block substitutions are resolved through [`BlockRegistry::select_block`].

use rustc_hash::FxHashMap;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored inside every voxel cell (2 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u16);

/// The empty block. Chunk memory zero-fills to this.
pub const AIR: BlockId = BlockId(0);

/// Upper bound on numeric block ids (exclusive).
pub const MAX_BLOCK_TYPES: u16 = 4096;

/// The reserved biome context id.
pub const DEFAULT_BIOME: u8 = 0;

/// The reserved planet context id.
pub const DEFAULT_PLANET: u8 = 0;

/// Full descriptor for a block type. Immutable after registration.
#[derive(Clone, Debug)]
pub struct BlockDefinition {
    /// Namespaced string id, e.g. `"astral:stone"`.
    pub id: String,
    /// Dense numeric id in `0..MAX_BLOCK_TYPES`.
    pub numeric_id: u16,
    /// Human-readable name, e.g. `"Stone"`.
    pub display_name: String,
    /// Whether entities collide with this block.
    pub solid: bool,
    /// Whether light and visibility pass through.
    pub transparent: bool,
    /// Light emission level (0 = none, 15 = max).
    pub light_emission: u8,
    pub hardness: f32,
    pub blast_resistance: f32,
    pub flammable: bool,
    /// Texture applied to every face unless overridden per face.
    pub default_texture: String,
    /// Optional per-face textures keyed by face name ("top", "bottom", ...).
    pub per_face_textures: FxHashMap<String, String>,
    /// Context-variant tables keyed by context name, available to renderers.
    pub variants: FxHashMap<String, FxHashMap<String, String>>,
}

impl Default for BlockDefinition {
    fn default() -> Self {
        Self {
            id: String::new(),
            numeric_id: 0,
            display_name: String::new(),
            solid: true,
            transparent: false,
            light_emission: 0,
            hardness: 1.0,
            blast_resistance: 1.0,
            flammable: false,
            default_texture: "stone".to_string(),
            per_face_textures: FxHashMap::default(),
            variants: FxHashMap::default(),
        }
    }
}

impl BlockDefinition {
    /// Creates a definition with default physical properties.
    pub fn new(id: &str, numeric_id: u16, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            numeric_id,
            display_name: display_name.to_string(),
            ..Self::default()
        }
    }
}

/// Four-byte per-block cache consulted by the mesh builder for every
/// voxel face. Kept dense (one slot per possible id) so lookups never miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRenderData {
    /// Slot in the texture atlas.
    pub texture_atlas_index: u16,
    /// Neighbor-flag mask deciding which faces are emitted; see
    /// [`BlockRegistry::should_render_face`].
    pub cull_mask: u8,
    /// 0-15 light emission.
    pub light_level: u8,
    /// Property bit flags.
    pub flags: u8,
}

impl BlockRenderData {
    pub const FLAG_SOLID: u8 = 0x01;
    pub const FLAG_TRANSPARENT: u8 = 0x02;
    pub const FLAG_LIGHT_SOURCE: u8 = 0x04;

    /// Render data for air and for any id nothing was registered under.
    pub const AIR: Self = Self {
        texture_atlas_index: 0,
        cull_mask: Self::FLAG_TRANSPARENT | Self::FLAG_LIGHT_SOURCE,
        light_level: 0,
        flags: Self::FLAG_TRANSPARENT,
    };

    pub fn is_solid(&self) -> bool {
        self.flags & Self::FLAG_SOLID != 0
    }

    pub fn is_transparent(&self) -> bool {
        self.flags & Self::FLAG_TRANSPARENT != 0
    }

    pub fn is_light_source(&self) -> bool {
        self.flags & Self::FLAG_LIGHT_SOURCE != 0
    }

    fn from_definition(def: &BlockDefinition, texture_atlas_index: u16) -> Self {
        let mut flags = 0u8;
        if def.solid {
            flags |= Self::FLAG_SOLID;
        }
        // Anything you can see through gets the transparent bit, including
        // non-solid blocks that forgot to declare it.
        if def.transparent || !def.solid {
            flags |= Self::FLAG_TRANSPARENT;
        }
        if def.light_emission > 0 {
            flags |= Self::FLAG_LIGHT_SOURCE;
        }

        // Solid blocks emit faces against any neighbor that is not itself a
        // solid blocker; non-solid blocks emit only against see-through
        // neighbors. Combined with the flag bits above this culls every
        // solid-solid interface while keeping surfaces against air, fluids,
        // and transparent solids.
        let cull_mask = if def.solid {
            !Self::FLAG_SOLID
        } else {
            Self::FLAG_TRANSPARENT | Self::FLAG_LIGHT_SOURCE
        };

        Self {
            texture_atlas_index,
            cull_mask,
            light_level: def.light_emission,
            flags,
        }
    }
}

impl Default for BlockRenderData {
    fn default() -> Self {
        Self::AIR
    }
}

/// Environmental context used for biome-dependent block selection.
#[derive(Clone, Debug)]
pub struct BiomeContext {
    pub name: String,
    /// -1.0 (cold) to 1.0 (hot).
    pub temperature: f32,
    /// -1.0 (dry) to 1.0 (wet).
    pub moisture: f32,
    pub atmospheric_pressure: f32,
    pub preferred_materials: String,
}

impl Default for BiomeContext {
    fn default() -> Self {
        Self {
            name: String::new(),
            temperature: 0.0,
            moisture: 0.0,
            atmospheric_pressure: 1.0,
            preferred_materials: "default".to_string(),
        }
    }
}

impl BiomeContext {
    pub fn new(name: &str, temperature: f32, moisture: f32) -> Self {
        Self {
            name: name.to_string(),
            temperature,
            moisture,
            ..Self::default()
        }
    }
}

/// Planet-wide context used for planetary block overrides.
#[derive(Clone, Debug)]
pub struct PlanetContext {
    pub name: String,
    pub gravity_modifier: f32,
    pub atmosphere_type: String,
    pub geological_composition: String,
    pub material_overrides: FxHashMap<String, String>,
}

impl Default for PlanetContext {
    fn default() -> Self {
        Self {
            name: String::new(),
            gravity_modifier: 1.0,
            atmosphere_type: "earth".to_string(),
            geological_composition: "standard".to_string(),
            material_overrides: FxHashMap::default(),
        }
    }
}

impl PlanetContext {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Packed (biome, planet) pair keying the override table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ContextKey {
    pub biome: u8,
    pub planet: u8,
}

impl ContextKey {
    pub fn new(biome: u8, planet: u8) -> Self {
        Self { biome, planet }
    }

    /// Packs both ids into a single `u16` (biome in the high byte).
    pub fn packed(self) -> u16 {
        (self.biome as u16) << 8 | self.planet as u16
    }
}

/// Errors that can occur during registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("block id {0} exceeds maximum ({MAX_BLOCK_TYPES})")]
    IdOutOfRange(u16),
    #[error("block id {id} already in use by {name}")]
    IdInUse { id: u16, name: String },
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    #[error("context id space exhausted (max 255)")]
    ContextsExhausted,
    #[error("unknown block: {0}")]
    UnknownBlock(String),
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Central block/biome/planet registry.
///
/// Constructed explicitly and injected (typically as `Arc<BlockRegistry>`)
/// into everything that needs it. All mutating methods take `&mut self`;
/// once shared, the registry is immutable.
pub struct BlockRegistry {
    /// Dense definitions indexed by numeric id; `None` for unused slots.
    definitions: Vec<Option<BlockDefinition>>,
    /// Dense render cache, one slot per possible id.
    render_data: Box<[BlockRenderData]>,
    name_to_id: FxHashMap<String, BlockId>,
    biomes: Vec<BiomeContext>,
    planets: Vec<PlanetContext>,
    biome_name_to_id: FxHashMap<String, u8>,
    planet_name_to_id: FxHashMap<String, u8>,
    /// (base block, context) → replacement block.
    overrides: FxHashMap<(BlockId, ContextKey), BlockId>,
    /// Texture name → atlas slot, assigned sequentially on first use.
    texture_slots: FxHashMap<String, u16>,
}

impl BlockRegistry {
    /// Creates an empty registry with the default biome and planet contexts
    /// reserved at id 0.
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
            render_data: vec![BlockRenderData::AIR; MAX_BLOCK_TYPES as usize].into_boxed_slice(),
            name_to_id: FxHashMap::default(),
            biomes: vec![BiomeContext::default()],
            planets: vec![PlanetContext::default()],
            biome_name_to_id: FxHashMap::default(),
            planet_name_to_id: FxHashMap::default(),
            overrides: FxHashMap::default(),
            texture_slots: FxHashMap::default(),
        }
    }

    /// Creates a registry populated with the built-in block catalog,
    /// biome/planet contexts, and stock overrides.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for def in default_block_definitions() {
            if let Err(err) = registry.register_block(def) {
                tracing::error!(%err, "built-in block failed to register");
            }
        }
        for biome in default_biome_contexts() {
            if let Err(err) = registry.register_biome(biome) {
                tracing::error!(%err, "built-in biome failed to register");
            }
        }
        for planet in default_planet_contexts() {
            if let Err(err) = registry.register_planet(planet) {
                tracing::error!(%err, "built-in planet failed to register");
            }
        }

        // Stock variant: grass appears as snow in the cold biome.
        if let Err(err) =
            registry.register_override_by_name("astral:grass", "cold", "", "astral:snow")
        {
            tracing::error!(%err, "built-in override failed to register");
        }

        registry
    }

    /// Registers a block under its declared `numeric_id` and populates its
    /// render-data slot.
    pub fn register_block(&mut self, def: BlockDefinition) -> Result<BlockId, RegistryError> {
        if def.numeric_id >= MAX_BLOCK_TYPES {
            return Err(RegistryError::IdOutOfRange(def.numeric_id));
        }
        let slot = def.numeric_id as usize;
        if let Some(Some(existing)) = self.definitions.get(slot) {
            return Err(RegistryError::IdInUse {
                id: def.numeric_id,
                name: existing.id.clone(),
            });
        }
        if self.name_to_id.contains_key(&def.id) {
            return Err(RegistryError::DuplicateName(def.id));
        }

        if slot >= self.definitions.len() {
            self.definitions.resize_with(slot + 1, || None);
        }

        let id = BlockId(def.numeric_id);
        let texture = self.texture_slot(&def.default_texture);
        self.render_data[slot] = BlockRenderData::from_definition(&def, texture);
        self.name_to_id.insert(def.id.clone(), id);
        tracing::debug!(name = %def.id, id = def.numeric_id, "registered block");
        self.definitions[slot] = Some(def);
        Ok(id)
    }

    /// Registers a biome context and returns its assigned id (starting at 1;
    /// 0 is the reserved default context).
    pub fn register_biome(&mut self, biome: BiomeContext) -> Result<u8, RegistryError> {
        if self.biomes.len() >= u8::MAX as usize {
            return Err(RegistryError::ContextsExhausted);
        }
        let id = self.biomes.len() as u8;
        if !biome.name.is_empty() {
            self.biome_name_to_id.insert(biome.name.clone(), id);
        }
        tracing::debug!(name = %biome.name, id, "registered biome");
        self.biomes.push(biome);
        Ok(id)
    }

    /// Registers a planet context and returns its assigned id (starting at 1;
    /// 0 is the reserved default context).
    pub fn register_planet(&mut self, planet: PlanetContext) -> Result<u8, RegistryError> {
        if self.planets.len() >= u8::MAX as usize {
            return Err(RegistryError::ContextsExhausted);
        }
        let id = self.planets.len() as u8;
        if !planet.name.is_empty() {
            self.planet_name_to_id.insert(planet.name.clone(), id);
        }
        tracing::debug!(name = %planet.name, id, "registered planet");
        self.planets.push(planet);
        Ok(id)
    }

    /// Registers a context-dependent substitution: `base` becomes
    /// `replacement` when sampled under `key`.
    pub fn register_override(&mut self, base: BlockId, key: ContextKey, replacement: BlockId) {
        self.overrides.insert((base, key), replacement);
    }

    /// Name-based variant of [`register_override`](Self::register_override).
    /// Empty biome/planet names refer to the default contexts.
    pub fn register_override_by_name(
        &mut self,
        base: &str,
        biome: &str,
        planet: &str,
        replacement: &str,
    ) -> Result<(), RegistryError> {
        let base_id = self
            .block_id(base)
            .ok_or_else(|| RegistryError::UnknownBlock(base.to_string()))?;
        let replacement_id = self
            .block_id(replacement)
            .ok_or_else(|| RegistryError::UnknownBlock(replacement.to_string()))?;
        let key = ContextKey::new(self.biome_id(biome), self.planet_id(planet));
        self.register_override(base_id, key, replacement_id);
        Ok(())
    }

    /// Resolves a base block under a (biome, planet) context. Falls back to
    /// the base block when no override is registered; out-of-range ids
    /// resolve to air.
    pub fn select_block(&self, base: BlockId, key: ContextKey) -> BlockId {
        if base.0 >= MAX_BLOCK_TYPES {
            return AIR;
        }
        self.overrides.get(&(base, key)).copied().unwrap_or(base)
    }

    /// Name-based variant of [`select_block`](Self::select_block). Unknown
    /// block names resolve to air; unknown context names to the defaults.
    pub fn select_block_by_name(&self, base: &str, biome: &str, planet: &str) -> BlockId {
        let Some(base_id) = self.block_id(base) else {
            return AIR;
        };
        let key = ContextKey::new(self.biome_id(biome), self.planet_id(planet));
        self.select_block(base_id, key)
    }

    /// Returns the render cache entry for a block. Unregistered and
    /// out-of-range ids return the air entry.
    pub fn render_data(&self, id: BlockId) -> &BlockRenderData {
        self.render_data
            .get(id.0 as usize)
            .unwrap_or(&BlockRenderData::AIR)
    }

    /// Decides whether the face of `current` against `neighbor` must be
    /// emitted. Identical blocks always merge, so the interior of a water
    /// or glass volume stays faceless. For differing blocks the current
    /// block's cull mask is intersected with the neighbor's property flags.
    #[inline]
    pub fn should_render_face(&self, current: BlockId, neighbor: BlockId) -> bool {
        if current == neighbor {
            return false;
        }
        self.render_data(current).cull_mask & self.render_data(neighbor).flags != 0
    }

    pub fn is_solid(&self, id: BlockId) -> bool {
        self.render_data(id).is_solid()
    }

    pub fn is_transparent(&self, id: BlockId) -> bool {
        self.render_data(id).is_transparent()
    }

    pub fn light_level(&self, id: BlockId) -> u8 {
        self.render_data(id).light_level
    }

    /// Returns the definition registered under `id`, if any.
    pub fn block_definition(&self, id: BlockId) -> Option<&BlockDefinition> {
        self.definitions.get(id.0 as usize)?.as_ref()
    }

    /// Returns the numeric id for a namespaced block name.
    pub fn block_id(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the namespaced name for a numeric id.
    pub fn block_name(&self, id: BlockId) -> Option<&str> {
        self.block_definition(id).map(|def| def.id.as_str())
    }

    /// Returns the biome id for a name, defaulting to [`DEFAULT_BIOME`].
    pub fn biome_id(&self, name: &str) -> u8 {
        self.biome_name_to_id.get(name).copied().unwrap_or(DEFAULT_BIOME)
    }

    /// Returns the planet id for a name, defaulting to [`DEFAULT_PLANET`].
    pub fn planet_id(&self, name: &str) -> u8 {
        self.planet_name_to_id.get(name).copied().unwrap_or(DEFAULT_PLANET)
    }

    pub fn biome(&self, id: u8) -> Option<&BiomeContext> {
        self.biomes.get(id as usize)
    }

    pub fn planet(&self, id: u8) -> Option<&PlanetContext> {
        self.planets.get(id as usize)
    }

    /// Number of registered blocks.
    pub fn block_count(&self) -> usize {
        self.definitions.iter().flatten().count()
    }

    /// Returns the atlas slot for a texture name, assigning the next free
    /// slot on first use. Assignment order is registration order, so a given
    /// catalog always produces the same atlas layout.
    fn texture_slot(&mut self, texture: &str) -> u16 {
        if let Some(&slot) = self.texture_slots.get(texture) {
            return slot;
        }
        let slot = self.texture_slots.len() as u16;
        self.texture_slots.insert(texture.to_string(), slot);
        slot
    }

    /// Logs a one-line summary of registry contents.
    pub fn log_summary(&self) {
        tracing::info!(
            blocks = self.block_count(),
            biomes = self.biomes.len(),
            planets = self.planets.len(),
            textures = self.texture_slots.len(),
            "block registry ready"
        );
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Built-in catalog
// ---------------------------------------------------------------------------

/// The 21 built-in blocks with fixed numeric ids 0-20.
pub fn default_block_definitions() -> Vec<BlockDefinition> {
    let mut blocks = Vec::with_capacity(21);

    let mut air = BlockDefinition::new("astral:air", 0, "Air");
    air.solid = false;
    air.transparent = true;
    air.default_texture = "air".to_string();
    blocks.push(air);

    let mut stone = BlockDefinition::new("astral:stone", 1, "Stone");
    stone.hardness = 3.5;
    stone.blast_resistance = 30.0;
    stone.default_texture = "stone".to_string();
    blocks.push(stone);

    let mut grass = BlockDefinition::new("astral:grass", 2, "Grass");
    grass.hardness = 1.0;
    grass.default_texture = "grass".to_string();
    blocks.push(grass);

    let mut dirt = BlockDefinition::new("astral:dirt", 3, "Dirt");
    dirt.hardness = 1.2;
    dirt.default_texture = "dirt".to_string();
    blocks.push(dirt);

    let mut sand = BlockDefinition::new("astral:sand", 4, "Sand");
    sand.hardness = 1.0;
    sand.default_texture = "sand".to_string();
    blocks.push(sand);

    let mut water = BlockDefinition::new("astral:water", 5, "Water");
    water.solid = false;
    water.transparent = true;
    water.default_texture = "water".to_string();
    blocks.push(water);

    let mut snow = BlockDefinition::new("astral:snow", 6, "Snow");
    snow.hardness = 0.5;
    snow.default_texture = "snow".to_string();
    blocks.push(snow);

    let mut wood = BlockDefinition::new("astral:wood_log", 7, "Wood Log");
    wood.hardness = 2.0;
    wood.flammable = true;
    wood.default_texture = "wood_log".to_string();
    blocks.push(wood);

    let mut leaves = BlockDefinition::new("astral:leaves", 8, "Leaves");
    leaves.solid = false;
    leaves.transparent = true;
    leaves.hardness = 0.3;
    leaves.flammable = true;
    leaves.default_texture = "leaves".to_string();
    blocks.push(leaves);

    let mut gravel = BlockDefinition::new("astral:gravel", 9, "Gravel");
    gravel.hardness = 1.8;
    gravel.default_texture = "gravel".to_string();
    blocks.push(gravel);

    let mut gold_ore = BlockDefinition::new("astral:gold_ore", 10, "Gold Ore");
    gold_ore.hardness = 4.0;
    gold_ore.blast_resistance = 35.0;
    gold_ore.default_texture = "gold_ore".to_string();
    blocks.push(gold_ore);

    let mut clay = BlockDefinition::new("astral:clay", 11, "Clay");
    clay.hardness = 1.2;
    clay.default_texture = "clay".to_string();
    blocks.push(clay);

    let mut mud = BlockDefinition::new("astral:mud", 12, "Mud");
    mud.hardness = 0.8;
    mud.default_texture = "mud".to_string();
    blocks.push(mud);

    let mut obsidian = BlockDefinition::new("astral:obsidian", 13, "Obsidian");
    obsidian.hardness = 5.0;
    obsidian.blast_resistance = 50.0;
    obsidian.default_texture = "obsidian".to_string();
    blocks.push(obsidian);

    let mut lava = BlockDefinition::new("astral:lava", 14, "Lava");
    lava.solid = false;
    lava.transparent = true;
    lava.light_emission = 12;
    lava.hardness = 0.0;
    lava.default_texture = "lava".to_string();
    blocks.push(lava);

    let mut ice = BlockDefinition::new("astral:ice", 15, "Ice");
    ice.hardness = 1.5;
    ice.transparent = true;
    ice.default_texture = "ice".to_string();
    blocks.push(ice);

    let mut sandstone = BlockDefinition::new("astral:sandstone", 16, "Sandstone");
    sandstone.hardness = 2.5;
    sandstone.blast_resistance = 20.0;
    sandstone.default_texture = "sandstone".to_string();
    blocks.push(sandstone);

    let mut cactus = BlockDefinition::new("astral:cactus", 17, "Cactus");
    cactus.hardness = 1.0;
    cactus.default_texture = "cactus".to_string();
    blocks.push(cactus);

    let mut moss_stone = BlockDefinition::new("astral:moss_stone", 18, "Moss Stone");
    moss_stone.hardness = 2.2;
    moss_stone.default_texture = "moss_stone".to_string();
    blocks.push(moss_stone);

    let mut granite = BlockDefinition::new("astral:granite", 19, "Granite");
    granite.hardness = 3.5;
    granite.blast_resistance = 30.0;
    granite.default_texture = "granite".to_string();
    blocks.push(granite);

    let mut basalt = BlockDefinition::new("astral:basalt", 20, "Basalt");
    basalt.hardness = 3.0;
    basalt.blast_resistance = 25.0;
    basalt.default_texture = "basalt".to_string();
    blocks.push(basalt);

    blocks
}

/// The built-in biome contexts, registered after the reserved default.
pub fn default_biome_contexts() -> Vec<BiomeContext> {
    vec![
        BiomeContext::new("temperate", 0.2, 0.5),
        BiomeContext::new("cold", -0.7, 0.3),
        BiomeContext::new("hot", 0.8, -0.3),
        BiomeContext::new("water", 0.0, 1.0),
        BiomeContext::new("arctic", -0.9, 0.1),
        BiomeContext::new("desert", 0.9, -0.8),
        BiomeContext::new("tropical", 0.7, 0.8),
        BiomeContext::new("mountain", -0.3, 0.2),
        BiomeContext::new("forest", 0.3, 0.7),
        BiomeContext::new("swamp", 0.4, 0.9),
        BiomeContext::new("volcanic", 1.0, -0.5),
        BiomeContext::new("tundra", -0.6, 0.4),
    ]
}

/// The built-in planet contexts, registered after the reserved default.
pub fn default_planet_contexts() -> Vec<PlanetContext> {
    let earth = PlanetContext::new("earth");
    let mut mars = PlanetContext::new("mars");
    mars.atmosphere_type = "thin".to_string();
    mars.geological_composition = "iron_rich".to_string();
    vec![earth, mars]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stone_def() -> BlockDefinition {
        let mut def = BlockDefinition::new("test:stone", 1, "Stone");
        def.default_texture = "stone".to_string();
        def
    }

    fn glass_def() -> BlockDefinition {
        let mut def = BlockDefinition::new("test:glass", 2, "Glass");
        def.transparent = true;
        def.default_texture = "glass".to_string();
        def
    }

    fn water_def() -> BlockDefinition {
        let mut def = BlockDefinition::new("test:water", 3, "Water");
        def.solid = false;
        def.transparent = true;
        def.default_texture = "water".to_string();
        def
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BlockRegistry::new();
        let id = registry.register_block(stone_def()).unwrap();
        assert_eq!(id, BlockId(1));
        assert_eq!(registry.block_id("test:stone"), Some(id));
        assert_eq!(registry.block_name(id), Some("test:stone"));
        assert!(registry.is_solid(id));
        assert!(!registry.is_transparent(id));
    }

    #[test]
    fn test_duplicate_numeric_id_rejected() {
        let mut registry = BlockRegistry::new();
        registry.register_block(stone_def()).unwrap();
        let mut clash = glass_def();
        clash.numeric_id = 1;
        assert!(matches!(
            registry.register_block(clash),
            Err(RegistryError::IdInUse { id: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = BlockRegistry::new();
        registry.register_block(stone_def()).unwrap();
        let mut clash = stone_def();
        clash.numeric_id = 9;
        assert!(matches!(
            registry.register_block(clash),
            Err(RegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_id_out_of_range_rejected() {
        let mut registry = BlockRegistry::new();
        let mut def = stone_def();
        def.numeric_id = MAX_BLOCK_TYPES;
        assert!(matches!(
            registry.register_block(def),
            Err(RegistryError::IdOutOfRange(_))
        ));
    }

    #[test]
    fn test_unregistered_id_reads_as_air() {
        let registry = BlockRegistry::new();
        assert!(!registry.is_solid(BlockId(100)));
        assert!(registry.is_transparent(BlockId(100)));
        assert_eq!(registry.light_level(BlockId(100)), 0);
        // Ids past the table end behave the same.
        assert!(!registry.is_solid(BlockId(u16::MAX)));
    }

    #[test]
    fn test_face_culling_truth_table() {
        let mut registry = BlockRegistry::new();
        let stone = registry.register_block(stone_def()).unwrap();
        let glass = registry.register_block(glass_def()).unwrap();
        let water = registry.register_block(water_def()).unwrap();

        // Solid against solid is never drawn.
        assert!(!registry.should_render_face(stone, stone));
        // Solid against air, fluids, and transparent solids is drawn.
        assert!(registry.should_render_face(stone, AIR));
        assert!(registry.should_render_face(stone, water));
        assert!(registry.should_render_face(stone, glass));
        // Non-solid blocks hide behind solid neighbors only.
        assert!(!registry.should_render_face(water, stone));
        assert!(registry.should_render_face(water, AIR));
    }

    #[test]
    fn test_identical_blocks_merge_faces() {
        let mut registry = BlockRegistry::new();
        let glass = registry.register_block(glass_def()).unwrap();
        let water = registry.register_block(water_def()).unwrap();

        // A volume of one block type has no interior faces, fluids and
        // transparent solids included.
        assert!(!registry.should_render_face(water, water));
        assert!(!registry.should_render_face(glass, glass));
        // The volume's surface against air still renders.
        assert!(registry.should_render_face(water, AIR));
        assert!(registry.should_render_face(glass, AIR));
    }

    #[test]
    fn test_light_source_flag() {
        let mut registry = BlockRegistry::new();
        let mut lamp = BlockDefinition::new("test:lamp", 4, "Lamp");
        lamp.light_emission = 12;
        let id = registry.register_block(lamp).unwrap();
        assert!(registry.render_data(id).is_light_source());
        assert_eq!(registry.light_level(id), 12);
    }

    #[test]
    fn test_select_block_falls_back_to_base() {
        let mut registry = BlockRegistry::new();
        let stone = registry.register_block(stone_def()).unwrap();
        let key = ContextKey::new(3, 7);
        assert_eq!(registry.select_block(stone, key), stone);
    }

    #[test]
    fn test_select_block_out_of_range_is_air() {
        let registry = BlockRegistry::new();
        assert_eq!(
            registry.select_block(BlockId(MAX_BLOCK_TYPES), ContextKey::default()),
            AIR
        );
    }

    #[test]
    fn test_override_applies_only_in_context() {
        let mut registry = BlockRegistry::new();
        let stone = registry.register_block(stone_def()).unwrap();
        let glass = registry.register_block(glass_def()).unwrap();
        let biome = registry
            .register_biome(BiomeContext::new("frozen", -0.9, 0.2))
            .unwrap();

        registry.register_override(stone, ContextKey::new(biome, DEFAULT_PLANET), glass);

        assert_eq!(
            registry.select_block(stone, ContextKey::new(biome, DEFAULT_PLANET)),
            glass
        );
        assert_eq!(registry.select_block(stone, ContextKey::default()), stone);
        // Same biome on a different planet is a different context.
        assert_eq!(registry.select_block(stone, ContextKey::new(biome, 1)), stone);
    }

    #[test]
    fn test_overrides_distinct_past_planet_id_fifteen() {
        // Planet ids above 15 must not alias other contexts.
        let mut registry = BlockRegistry::new();
        let stone = registry.register_block(stone_def()).unwrap();
        let glass = registry.register_block(glass_def()).unwrap();

        registry.register_override(stone, ContextKey::new(1, 16), glass);
        assert_eq!(registry.select_block(stone, ContextKey::new(1, 16)), glass);
        assert_eq!(registry.select_block(stone, ContextKey::new(2, 0)), stone);
    }

    #[test]
    fn test_select_by_name_unknown_block_is_air() {
        let registry = BlockRegistry::with_defaults();
        assert_eq!(registry.select_block_by_name("astral:missing", "", ""), AIR);
    }

    #[test]
    fn test_default_catalog() {
        let registry = BlockRegistry::with_defaults();
        assert_eq!(registry.block_count(), 21);
        assert_eq!(registry.block_id("astral:air"), Some(AIR));
        assert_eq!(registry.block_id("astral:stone"), Some(BlockId(1)));
        assert_eq!(registry.block_id("astral:basalt"), Some(BlockId(20)));
        assert!(!registry.is_solid(registry.block_id("astral:water").unwrap()));
        assert_eq!(
            registry.light_level(registry.block_id("astral:lava").unwrap()),
            12
        );
        // Ice is both solid and see-through.
        let ice = registry.block_id("astral:ice").unwrap();
        assert!(registry.is_solid(ice));
        assert!(registry.is_transparent(ice));
    }

    #[test]
    fn test_default_contexts() {
        let registry = BlockRegistry::with_defaults();
        assert_eq!(registry.biome_id("temperate"), 1);
        assert_eq!(registry.biome_id("cold"), 2);
        assert_eq!(registry.biome_id("tundra"), 12);
        assert_eq!(registry.planet_id("earth"), 1);
        assert_eq!(registry.planet_id("mars"), 2);
        // Unknown names resolve to the default contexts.
        assert_eq!(registry.biome_id("nope"), DEFAULT_BIOME);
        assert_eq!(registry.planet_id("nope"), DEFAULT_PLANET);
    }

    #[test]
    fn test_grass_becomes_snow_in_cold_biome() {
        let registry = BlockRegistry::with_defaults();
        let grass = registry.block_id("astral:grass").unwrap();
        let snow = registry.block_id("astral:snow").unwrap();
        let cold = registry.biome_id("cold");

        assert_eq!(
            registry.select_block(grass, ContextKey::new(cold, DEFAULT_PLANET)),
            snow
        );
        assert_eq!(registry.select_block(grass, ContextKey::default()), grass);
        assert_eq!(registry.select_block_by_name("astral:grass", "cold", ""), snow);
    }

    #[test]
    fn test_texture_slots_are_deterministic() {
        let a = BlockRegistry::with_defaults();
        let b = BlockRegistry::with_defaults();
        for id in 0..21u16 {
            assert_eq!(
                a.render_data(BlockId(id)).texture_atlas_index,
                b.render_data(BlockId(id)).texture_atlas_index
            );
        }
        // Same texture name shares a slot.
        let mut c = BlockRegistry::new();
        let s1 = c.register_block(stone_def()).unwrap();
        let mut also_stone = BlockDefinition::new("test:cobble", 5, "Cobble");
        also_stone.default_texture = "stone".to_string();
        let s2 = c.register_block(also_stone).unwrap();
        assert_eq!(
            c.render_data(s1).texture_atlas_index,
            c.render_data(s2).texture_atlas_index
        );
    }

    #[test]
    fn test_context_key_packing() {
        let key = ContextKey::new(2, 1);
        assert_eq!(key.packed(), 0x0201);
    }
}
