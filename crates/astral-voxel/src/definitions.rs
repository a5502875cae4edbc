//! Loading block definitions from JSON files.
//!
//! Each `.json` file in the definitions directory holds a `blocks` array.
//! Loading is lenient: a malformed file or a rejected entry is logged and
//! skipped, never fatal; the built-in catalog is always available.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::registry::{BlockDefinition, BlockRegistry};

/// On-disk block entry. Unknown fields are ignored for forward
/// compatibility; absent optional fields take the catalog defaults.
#[derive(Debug, Deserialize)]
struct BlockEntry {
    id: String,
    numeric_id: u16,
    display_name: String,
    #[serde(default = "default_texture")]
    texture: String,
    #[serde(default = "default_true")]
    solid: bool,
    #[serde(default)]
    transparent: bool,
    #[serde(default = "default_one")]
    hardness: f32,
    #[serde(default = "default_one")]
    blast_resistance: f32,
    #[serde(default)]
    flammable: bool,
    #[serde(default)]
    light_emission: u8,
}

fn default_texture() -> String {
    "stone".to_string()
}

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

impl From<BlockEntry> for BlockDefinition {
    fn from(entry: BlockEntry) -> Self {
        let mut def = BlockDefinition::new(&entry.id, entry.numeric_id, &entry.display_name);
        def.default_texture = entry.texture;
        def.solid = entry.solid;
        def.transparent = entry.transparent;
        def.hardness = entry.hardness;
        def.blast_resistance = entry.blast_resistance;
        def.flammable = entry.flammable;
        def.light_emission = entry.light_emission;
        def
    }
}

/// Loads every `.json` file under `dir` into `registry`, returning the
/// number of blocks registered. A missing directory is not an error.
pub fn load_definitions_dir(registry: &mut BlockRegistry, dir: &Path) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            tracing::info!(dir = %dir.display(), "no block definitions directory, using built-ins only");
            return 0;
        }
    };

    let mut registered = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        registered += load_definition_file(registry, &path);
    }
    registered
}

fn load_definition_file(registry: &mut BlockRegistry, path: &Path) -> usize {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to read block definition file");
            return 0;
        }
    };

    let root: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(root) => root,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "malformed block definition file, skipping");
            return 0;
        }
    };
    let blocks = match root.get("blocks") {
        Some(serde_json::Value::Array(blocks)) => blocks,
        Some(_) => {
            tracing::warn!(path = %path.display(), "\"blocks\" is not an array, skipping file");
            return 0;
        }
        None => return 0,
    };

    // Entries are deserialized one at a time so a single bad entry cannot
    // take down the well-formed ones beside it.
    let mut registered = 0;
    for (index, value) in blocks.iter().enumerate() {
        let entry = match BlockEntry::deserialize(value) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(path = %path.display(), index, %err, "malformed block entry, skipping");
                continue;
            }
        };
        let name = entry.id.clone();
        match registry.register_block(entry.into()) {
            Ok(_) => registered += 1,
            Err(err) => {
                tracing::warn!(path = %path.display(), block = %name, %err, "skipping block definition");
            }
        }
    }
    tracing::debug!(path = %path.display(), registered, "loaded block definition file");
    registered
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
