//! # Biome Module
//!
//! Biome parameters for terrain shaping: surface height curve, ore lode
//! layers and tree placement. Defaults describe a temperate plains biome;
//! a configuration file can replace any part of them.

use serde::Deserialize;

/// Shape of the terrain and everything embedded in it for one biome.
///
/// The surface height at a column is
/// `floor(terrain_height * noise) + solid_ground_height`, so
/// `solid_ground_height` is the minimum surface level and `terrain_height`
/// the noise amplitude above it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BiomeSettings {
    /// Display name of the biome.
    pub name: String,
    /// Minimum surface height in voxels.
    pub solid_ground_height: i32,
    /// Height amplitude added on top of `solid_ground_height`.
    pub terrain_height: i32,
    /// Frequency of the surface height noise.
    pub terrain_scale: f64,
    /// Ore and cavity layers carved into stone, applied in list order.
    pub lodes: Vec<Lode>,
    /// Tree placement and shape parameters.
    pub trees: TreeSettings,
}

impl Default for BiomeSettings {
    fn default() -> Self {
        BiomeSettings {
            name: "plains".to_string(),
            solid_ground_height: 42,
            terrain_height: 42,
            terrain_scale: 0.25,
            lodes: default_lodes(),
            trees: TreeSettings::default(),
        }
    }
}

/// One vein layer replacing stone cells inside a height band.
///
/// Lodes are evaluated in list order and a later lode overwrites an earlier
/// one, so ordering is part of the world definition. A lode whose block is
/// `"air"` carves cavities.
#[derive(Debug, Clone, Deserialize)]
pub struct Lode {
    /// Display name of the lode, used in validation errors.
    pub name: String,
    /// Name of the block this lode places, resolved against the catalog.
    pub block: String,
    /// Exclusive lower bound of the height band.
    pub min_height: i32,
    /// Exclusive upper bound of the height band.
    pub max_height: i32,
    /// Frequency of the placement noise in voxel units.
    pub scale: f64,
    /// Noise threshold above which the lode places its block.
    pub threshold: f64,
    /// Noise offset separating this lode's field from the others.
    pub noise_offset: f64,
}

fn default_lodes() -> Vec<Lode> {
    vec![
        Lode {
            name: "dirt pockets".to_string(),
            block: "dirt".to_string(),
            min_height: 1,
            max_height: 120,
            scale: 0.1,
            threshold: 0.5,
            noise_offset: 0.0,
        },
        Lode {
            name: "sand pockets".to_string(),
            block: "sand".to_string(),
            min_height: 30,
            max_height: 60,
            scale: 0.2,
            threshold: 0.6,
            noise_offset: 500.0,
        },
        Lode {
            name: "coal seams".to_string(),
            block: "coal_ore".to_string(),
            min_height: 5,
            max_height: 80,
            scale: 0.15,
            threshold: 0.55,
            noise_offset: 1200.0,
        },
        Lode {
            name: "iron veins".to_string(),
            block: "iron_ore".to_string(),
            min_height: 5,
            max_height: 40,
            scale: 0.17,
            threshold: 0.6,
            noise_offset: 2400.0,
        },
        // Last on purpose: caves cut through whatever the ores placed.
        Lode {
            name: "caves".to_string(),
            block: "air".to_string(),
            min_height: 8,
            max_height: 56,
            scale: 0.1,
            threshold: 0.55,
            noise_offset: 34500.0,
        },
    ]
}

/// Where trees may grow and how tall they get.
///
/// Placement is two noise gates evaluated at the surface cell of a column:
/// a coarse zone gate selecting forested regions, then a fine placement
/// gate selecting individual trees inside them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Frequency of the forest zone gate.
    pub zone_scale: f64,
    /// Threshold of the forest zone gate.
    pub zone_threshold: f64,
    /// Frequency of the per-tree placement gate.
    pub placement_scale: f64,
    /// Threshold of the per-tree placement gate.
    pub placement_threshold: f64,
    /// Minimum trunk height in voxels.
    pub min_height: i32,
    /// Maximum trunk height in voxels.
    pub max_height: i32,
}

impl Default for TreeSettings {
    fn default() -> Self {
        TreeSettings {
            zone_scale: 1.3,
            zone_threshold: 0.6,
            placement_scale: 15.0,
            placement_threshold: 0.8,
            min_height: 5,
            max_height: 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lodes_resolve_against_builtin_catalog() {
        use crate::engine_state::voxels::block::BlockCatalog;

        let catalog = BlockCatalog::builtin();
        for lode in BiomeSettings::default().lodes {
            assert!(catalog.id_of(&lode.block).is_some(), "lode '{}' block '{}'", lode.name, lode.block);
        }
    }

    #[test]
    fn test_caves_come_after_ores() {
        let lodes = BiomeSettings::default().lodes;
        let cave_index = lodes.iter().position(|lode| lode.block == "air").unwrap();
        assert_eq!(cave_index, lodes.len() - 1);
    }

    #[test]
    fn test_biome_overrides_parse_with_defaults_filled_in() {
        let biome: BiomeSettings = serde_json::from_str(r#"{ "terrain_height": 20 }"#).unwrap();
        assert_eq!(biome.terrain_height, 20);
        assert_eq!(biome.solid_ground_height, 42);
        assert!(!biome.lodes.is_empty());
    }
}
