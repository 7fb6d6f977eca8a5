//! # Block Module
//!
//! Block definitions for the voxel world. A block is identified by a compact
//! numeric id; everything else about it (solidity, whether neighbors must
//! still render their touching faces, which atlas tiles its faces use) lives
//! in a catalog record looked up by that id.
//!
//! The catalog ships with a built-in block set whose ids the terrain
//! generator relies on, and can be replaced wholesale from configuration.

use log::warn;
use serde::Deserialize;

pub mod block_side;

use block_side::BlockSide;

/// The underlying integer type used to represent blocks in chunk storage.
/// One byte per voxel keeps a fully loaded chunk column small.
pub type BlockId = u8;

/// Built-in id of the air block. Out-of-world queries resolve to this.
pub const AIR: BlockId = 0;
/// Built-in id of the bedrock block forming the world floor.
pub const BEDROCK: BlockId = 1;
/// Built-in id of the stone block filling terrain below the dirt band.
pub const STONE: BlockId = 2;
/// Built-in id of the grass block capping the terrain surface.
pub const GRASS: BlockId = 3;
/// Built-in id of the sand block.
pub const SAND: BlockId = 4;
/// Built-in id of the dirt block forming the band under the surface.
pub const DIRT: BlockId = 5;
/// Built-in id of the wood block used for tree trunks.
pub const WOOD: BlockId = 6;
/// Built-in id of the leaf block used for tree canopies.
pub const LEAVES: BlockId = 7;
/// Built-in id of the coal ore block.
pub const COAL_ORE: BlockId = 8;
/// Built-in id of the iron ore block.
pub const IRON_ORE: BlockId = 9;

/// Compile-time map from built-in block names to their ids.
///
/// Configuration refers to blocks by name (lode targets, demo edits); this
/// map resolves the built-in set without consulting a catalog instance.
static BUILTIN_BLOCK_IDS: phf::Map<&'static str, BlockId> = phf::phf_map! {
    "air" => AIR,
    "bedrock" => BEDROCK,
    "stone" => STONE,
    "grass" => GRASS,
    "sand" => SAND,
    "dirt" => DIRT,
    "wood" => WOOD,
    "leaves" => LEAVES,
    "coal_ore" => COAL_ORE,
    "iron_ore" => IRON_ORE,
};

/// Looks up a built-in block id by name.
///
/// # Arguments
/// * `name` - The built-in block name, e.g. `"stone"`
///
/// # Returns
/// The block id, or `None` if the name is not part of the built-in set.
pub fn id_by_name(name: &str) -> Option<BlockId> {
    BUILTIN_BLOCK_IDS.get(name).copied()
}

/// A catalog record describing one block kind.
///
/// The per-face texture indices address tiles in a square texture atlas, in
/// [`BlockSide`] order (back, front, top, bottom, left, right). `leaves` is
/// the canonical see-through block: it is solid for collision purposes but
/// neighbors touching it still render their faces.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockKind {
    /// Human-readable block name, used by configuration to reference ids.
    pub name: String,
    /// Whether the block occupies its cell for collision and face culling.
    pub is_solid: bool,
    /// Whether faces of adjacent blocks facing this one must still render.
    #[serde(default)]
    pub render_neighbor_faces: bool,
    /// Atlas tile per face, in back/front/top/bottom/left/right order.
    pub face_textures: [u32; 6],
}

impl BlockKind {
    /// Creates a block record.
    ///
    /// # Arguments
    /// * `name` - Human-readable block name
    /// * `is_solid` - Whether the block is solid
    /// * `render_neighbor_faces` - Whether neighbors keep their touching faces
    /// * `face_textures` - Atlas tile per face in [`BlockSide`] order
    pub fn new(name: &str, is_solid: bool, render_neighbor_faces: bool, face_textures: [u32; 6]) -> Self {
        BlockKind {
            name: name.to_string(),
            is_solid,
            render_neighbor_faces,
            face_textures,
        }
    }

    /// Returns the atlas tile index for the given face of this block.
    pub fn texture_for(&self, side: BlockSide) -> u32 {
        self.face_textures[side as usize]
    }
}

/// The set of block kinds known to a world, indexed by [`BlockId`].
///
/// Lookups never fail: an id past the end of the catalog degrades to the
/// air record with a warning, so a corrupted or stale id can never take the
/// pipeline down.
#[derive(Debug, Clone)]
pub struct BlockCatalog {
    kinds: Vec<BlockKind>,
}

impl BlockCatalog {
    /// Builds the built-in block catalog.
    ///
    /// Ids match the module-level constants; the terrain generator and the
    /// default biome configuration both assume this layout. Atlas tiles
    /// refer to a 4x4 atlas: 0 stone, 1 bedrock, 2 grass side, 3 grass top,
    /// 4 dirt, 5 sand, 6 bark, 7 wood rings, 8 leaves, 9 coal, 10 iron.
    pub fn builtin() -> Self {
        BlockCatalog {
            kinds: vec![
                BlockKind::new("air", false, true, [0; 6]),
                BlockKind::new("bedrock", true, false, [1; 6]),
                BlockKind::new("stone", true, false, [0; 6]),
                BlockKind::new("grass", true, false, [2, 2, 3, 4, 2, 2]),
                BlockKind::new("sand", true, false, [5; 6]),
                BlockKind::new("dirt", true, false, [4; 6]),
                BlockKind::new("wood", true, false, [6, 6, 7, 7, 6, 6]),
                BlockKind::new("leaves", true, true, [8; 6]),
                BlockKind::new("coal_ore", true, false, [9; 6]),
                BlockKind::new("iron_ore", true, false, [10; 6]),
            ],
        }
    }

    /// Builds a catalog from explicit records, id = position in the list.
    ///
    /// # Arguments
    /// * `kinds` - The block records, ordered by id starting at 0
    pub fn from_kinds(kinds: Vec<BlockKind>) -> Self {
        BlockCatalog { kinds }
    }

    /// Looks up the record for a block id.
    ///
    /// An out-of-range id logs a warning and resolves to the air record
    /// (id 0), so rendering and queries degrade instead of failing.
    pub fn kind_of(&self, id: BlockId) -> &BlockKind {
        match self.kinds.get(id as usize) {
            Some(kind) => kind,
            None => {
                warn!("block id {} outside catalog of {} kinds, treating as air", id, self.kinds.len());
                &self.kinds[0]
            }
        }
    }

    /// Returns whether the block with the given id is solid.
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.kind_of(id).is_solid
    }

    /// Returns whether the block occludes faces of its neighbors.
    ///
    /// Air does not occlude, and neither do see-through solids such as
    /// leaves. Only blocks that occlude allow the mesher to skip the
    /// touching face of the neighbor.
    pub fn occludes(&self, id: BlockId) -> bool {
        let kind = self.kind_of(id);
        kind.is_solid && !kind.render_neighbor_faces
    }

    /// Resolves a block name to its id in this catalog.
    ///
    /// # Arguments
    /// * `name` - The block name to look up
    ///
    /// # Returns
    /// The id of the first record with that name, or `None`.
    pub fn id_of(&self, name: &str) -> Option<BlockId> {
        self.kinds
            .iter()
            .position(|kind| kind.name == name)
            .map(|index| index as BlockId)
    }

    /// Number of block kinds in the catalog.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the catalog holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
