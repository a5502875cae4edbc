//! Biome classification from climate noise values.

/// The biomes the spherical generator can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Arctic,
    Tundra,
    Cold,
    Temperate,
    Forest,
    Swamp,
    Desert,
    Tropical,
    Volcanic,
    Hot,
    Mountain,
}

impl Biome {
    /// Picks a biome from combined temperature/moisture values, with a
    /// mountain override wherever the major elevation field peaks.
    pub fn classify(temperature: f32, moisture: f32, elevation_major: f32) -> Self {
        if elevation_major > 0.4 {
            return Self::Mountain;
        }

        if temperature < -0.6 {
            if moisture < -0.3 { Self::Arctic } else { Self::Tundra }
        } else if temperature < -0.2 {
            if moisture < 0.0 { Self::Cold } else { Self::Forest }
        } else if temperature < 0.3 {
            if moisture < -0.4 {
                Self::Temperate
            } else if moisture > 0.6 {
                Self::Swamp
            } else {
                Self::Forest
            }
        } else if temperature < 0.7 {
            if moisture < -0.5 { Self::Desert } else { Self::Tropical }
        } else if moisture < -0.3 {
            Self::Volcanic
        } else {
            Self::Hot
        }
    }

    /// The registry context name for this biome.
    pub fn name(self) -> &'static str {
        match self {
            Self::Arctic => "arctic",
            Self::Tundra => "tundra",
            Self::Cold => "cold",
            Self::Temperate => "temperate",
            Self::Forest => "forest",
            Self::Swamp => "swamp",
            Self::Desert => "desert",
            Self::Tropical => "tropical",
            Self::Volcanic => "volcanic",
            Self::Hot => "hot",
            Self::Mountain => "mountain",
        }
    }

    pub const ALL: [Self; 11] = [
        Self::Arctic,
        Self::Tundra,
        Self::Cold,
        Self::Temperate,
        Self::Forest,
        Self::Swamp,
        Self::Desert,
        Self::Tropical,
        Self::Volcanic,
        Self::Hot,
        Self::Mountain,
    ];
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(Biome::classify(-0.9, -0.5, 0.0), Biome::Arctic);
        assert_eq!(Biome::classify(-0.9, 0.5, 0.0), Biome::Tundra);
        assert_eq!(Biome::classify(-0.4, -0.1, 0.0), Biome::Cold);
        assert_eq!(Biome::classify(-0.4, 0.3, 0.0), Biome::Forest);
        assert_eq!(Biome::classify(0.0, -0.5, 0.0), Biome::Temperate);
        assert_eq!(Biome::classify(0.0, 0.8, 0.0), Biome::Swamp);
        assert_eq!(Biome::classify(0.0, 0.2, 0.0), Biome::Forest);
        assert_eq!(Biome::classify(0.5, -0.7, 0.0), Biome::Desert);
        assert_eq!(Biome::classify(0.5, 0.5, 0.0), Biome::Tropical);
        assert_eq!(Biome::classify(0.9, -0.5, 0.0), Biome::Volcanic);
        assert_eq!(Biome::classify(0.9, 0.5, 0.0), Biome::Hot);
    }

    #[test]
    fn test_mountain_overrides_climate() {
        assert_eq!(Biome::classify(0.9, 0.5, 0.5), Biome::Mountain);
        assert_eq!(Biome::classify(-0.9, -0.5, 0.41), Biome::Mountain);
    }

    #[test]
    fn test_names_match_registry_contexts() {
        use astral_voxel::BlockRegistry;
        let registry = BlockRegistry::with_defaults();
        for biome in Biome::ALL {
            assert_ne!(
                registry.biome_id(biome.name()),
                0,
                "biome {:?} missing from default contexts",
                biome
            );
        }
    }
}
