//! # Settings Module
//!
//! World configuration: grid dimensions, the generation seed, biome and
//! block definitions, and how many worker threads the pipeline gets.
//! Settings load from a JSON file where every field is optional; missing
//! fields take the defaults below, so an empty object is a valid config.
//!
//! Validation runs once at startup and is fatal: a config that asks for
//! an impossible world (zero-width chunks, a solid air block, a lode
//! targeting a block that does not exist) is rejected with a
//! [`SettingsError`] instead of degrading later in the pipeline.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::engine_state::voxels::biome::BiomeSettings;
use crate::engine_state::voxels::block::{self, BlockCatalog, BlockKind};

/// Everything the engine needs to build a world.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Seed for all noise sampling. Worlds with equal seeds are identical.
    pub seed: u32,
    /// Active window half-width, in chunks around the observer.
    pub view_radius: i32,
    /// Chunk width in voxels (x and z).
    pub chunk_width: usize,
    /// Chunk height in voxels.
    pub chunk_height: usize,
    /// World edge length, in chunks. The outermost ring is not playable.
    pub world_size_in_chunks: usize,
    /// Tiles per row in the square texture atlas.
    pub atlas_tiles: u32,
    /// Worker threads for the pipeline; 0 runs tasks cooperatively.
    pub worker_threads: usize,
    /// Terrain shape, lodes, and tree parameters.
    pub biome: BiomeSettings,
    /// Replacement block catalog; `None` keeps the built-in set.
    pub blocks: Option<Vec<BlockKind>>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            seed: 0,
            view_radius: 5,
            chunk_width: 16,
            chunk_height: 128,
            world_size_in_chunks: 100,
            atlas_tiles: 4,
            worker_threads: 0,
            biome: BiomeSettings::default(),
            blocks: None,
        }
    }
}

impl WorldSettings {
    /// World edge length in voxels.
    pub fn world_size_in_voxels(&self) -> i32 {
        (self.world_size_in_chunks * self.chunk_width) as i32
    }

    /// Loads and validates settings from a JSON file.
    ///
    /// # Arguments
    /// * `path` - Path to the settings file
    ///
    /// # Returns
    /// The settings, or the first error hit while reading, parsing, or
    /// validating them.
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        let settings: WorldSettings = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Builds the block catalog these settings describe.
    pub fn build_catalog(&self) -> BlockCatalog {
        match &self.blocks {
            Some(kinds) => BlockCatalog::from_kinds(kinds.clone()),
            None => BlockCatalog::builtin(),
        }
    }

    /// Checks that the settings describe a world the engine can build.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(SettingsError::Validation(
                "chunk dimensions must be nonzero".to_string(),
            ));
        }
        if self.atlas_tiles == 0 {
            return Err(SettingsError::Validation(
                "the texture atlas needs at least one tile per row".to_string(),
            ));
        }
        if self.world_size_in_chunks < 3 {
            return Err(SettingsError::Validation(
                "world size must be at least 3 chunks so something playable remains inside the border ring"
                    .to_string(),
            ));
        }
        if self.view_radius < 1 {
            return Err(SettingsError::Validation(
                "view radius must be at least 1 chunk".to_string(),
            ));
        }

        let catalog = self.build_catalog();
        if catalog.is_empty() {
            return Err(SettingsError::Validation(
                "the block catalog cannot be empty".to_string(),
            ));
        }
        if catalog.kind_of(block::AIR).is_solid {
            return Err(SettingsError::Validation(
                "block id 0 is the out-of-world fallback and must not be solid".to_string(),
            ));
        }

        for lode in &self.biome.lodes {
            if catalog.id_of(&lode.block).is_none() {
                return Err(SettingsError::Validation(format!(
                    "lode '{}' targets unknown block '{}'",
                    lode.name, lode.block
                )));
            }
            if lode.min_height > lode.max_height {
                return Err(SettingsError::Validation(format!(
                    "lode '{}' has min_height above max_height",
                    lode.name
                )));
            }
        }

        let trees = &self.biome.trees;
        if trees.min_height < 1 {
            return Err(SettingsError::Validation(
                "trees need a minimum height of at least 1".to_string(),
            ));
        }
        if trees.max_height < trees.min_height {
            return Err(SettingsError::Validation(
                "tree max_height cannot be below min_height".to_string(),
            ));
        }

        Ok(())
    }
}

/// Why settings failed to load.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io(std::io::Error),
    /// The file was not valid JSON for [`WorldSettings`].
    Parse(serde_json::Error),
    /// The settings parsed but describe an impossible world.
    Validation(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "failed to read settings: {}", err),
            SettingsError::Parse(err) => write!(f, "failed to parse settings: {}", err),
            SettingsError::Validation(reason) => write!(f, "invalid settings: {}", reason),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            SettingsError::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(WorldSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: WorldSettings = serde_json::from_str(r#"{ "seed": 7, "view_radius": 2 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.view_radius, 2);
        assert_eq!(settings.chunk_width, 16);
        assert_eq!(settings.world_size_in_chunks, 100);
    }

    #[test]
    fn test_tiny_worlds_are_rejected() {
        let settings = WorldSettings {
            world_size_in_chunks: 2,
            ..WorldSettings::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::Validation(_))));
    }

    #[test]
    fn test_solid_air_is_rejected() {
        let settings = WorldSettings {
            blocks: Some(vec![BlockKind::new("air", true, true, [0; 6])]),
            ..WorldSettings::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::Validation(_))));
    }

    #[test]
    fn test_unknown_lode_target_is_rejected() {
        let mut settings = WorldSettings::default();
        settings.biome.lodes[0].block = "unobtainium".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("unobtainium"));
    }

    #[test]
    fn test_inverted_lode_band_is_rejected() {
        let mut settings = WorldSettings::default();
        settings.biome.lodes[0].min_height = 90;
        settings.biome.lodes[0].max_height = 10;
        assert!(matches!(settings.validate(), Err(SettingsError::Validation(_))));
    }

    #[test]
    fn test_load_from_file_applies_overrides() {
        let path = std::env::temp_dir().join(format!("world-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{ "seed": 99, "chunk_width": 8, "worker_threads": 2 }"#).unwrap();

        let settings = WorldSettings::load_from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(settings.seed, 99);
        assert_eq!(settings.chunk_width, 8);
        assert_eq!(settings.worker_threads, 2);
        assert_eq!(settings.chunk_height, 128);
    }

    #[test]
    fn test_missing_file_surfaces_as_io_error() {
        let path = std::env::temp_dir().join("world-settings-that-do-not-exist.json");
        assert!(matches!(
            WorldSettings::load_from_file(&path),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_json_surfaces_as_parse_error() {
        let path = std::env::temp_dir().join(format!("world-settings-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let result = WorldSettings::load_from_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }
}
