//! # Meshing Module
//!
//! Turns chunk voxel data into triangle meshes. The mesher walks every
//! cell of a populated chunk and emits one quad per solid-voxel face that
//! is not hidden by its neighbor, so only surfaces touching open space
//! cost any geometry. Neighbor lookups go through a [`Neighborhood`]
//! snapshot captured at the start of the build, which also covers the
//! one-voxel border into adjacent chunks.
//!
//! Rebuilds are whole-chunk: an edited chunk is meshed again from
//! scratch rather than patched.

pub mod mesh;
pub mod neighborhood;

pub use mesh::MeshData;
pub use neighborhood::Neighborhood;

use crate::engine_state::meshing::mesh::atlas_uvs;
use crate::engine_state::voxels::block::block_side::{BlockSide, VOXEL_CORNERS};
use crate::engine_state::voxels::chunk::ChunkCoord;
use crate::engine_state::voxels::world::World;

/// A finished chunk mesh on its way to the display consumer.
///
/// `active` records the chunk's activation at the moment the mesh was
/// built; a chunk that left the active window mid-build still delivers
/// its mesh, flagged inactive, and the consumer decides whether to keep
/// it warm or drop it.
#[derive(Clone, Debug)]
pub struct MeshSubmission {
    /// Which chunk the mesh belongs to.
    pub coord: ChunkCoord,
    /// Activation state at build time.
    pub active: bool,
    /// The mesh, positions in chunk-local space.
    pub mesh: MeshData,
}

/// Builds the mesh for one chunk.
///
/// # Arguments
/// * `world` - The world the chunk lives in
/// * `coord` - Which chunk to mesh
///
/// # Returns
/// The mesh, or `None` when the chunk does not exist yet or has not been
/// populated. A populated all-air chunk yields an empty mesh, which is a
/// valid submission.
pub fn build_chunk_mesh(world: &World, coord: ChunkCoord) -> Option<MeshData> {
    let chunk = world.chunks.get(&coord)?;
    if !chunk.is_populated() {
        return None;
    }

    let snapshot = Neighborhood::capture(world, chunk);
    let atlas_tiles = world.settings.atlas_tiles;
    let mut mesh = MeshData::new();

    for y in 0..chunk.height() {
        for z in 0..chunk.width() {
            for x in 0..chunk.width() {
                let id = chunk.voxel_at(x, y, z);
                if !world.catalog.is_solid(id) {
                    continue;
                }
                let kind = world.catalog.kind_of(id);

                for side in BlockSide::all() {
                    let offset = side.neighbor_offset();
                    if snapshot.occludes(
                        x as i32 + offset.x,
                        y as i32 + offset.y,
                        z as i32 + offset.z,
                    ) {
                        continue;
                    }

                    let mut corners = [[0.0f32; 3]; 4];
                    for (slot, corner_index) in side.corner_indices().iter().enumerate() {
                        let corner = VOXEL_CORNERS[*corner_index];
                        corners[slot] = [
                            corner[0] + x as f32,
                            corner[1] + y as f32,
                            corner[2] + z as f32,
                        ];
                    }
                    let uvs = atlas_uvs(kind.texture_for(side), atlas_tiles);
                    mesh.push_face(&corners, &uvs);
                }
            }
        }
    }

    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::meshing::mesh::VertexUv;
    use crate::engine_state::settings::WorldSettings;
    use crate::engine_state::voxels::block::{self, BlockCatalog};
    use crate::engine_state::voxels::chunk::Chunk;

    fn empty_world() -> (WorldSettings, World) {
        let settings = WorldSettings {
            chunk_width: 8,
            chunk_height: 16,
            world_size_in_chunks: 12,
            ..WorldSettings::default()
        };
        let world = World::new(&settings, BlockCatalog::builtin());
        (settings, world)
    }

    fn air_chunk_at(coord: ChunkCoord, settings: &WorldSettings) -> Chunk {
        Chunk::solid_fill(coord, settings.chunk_width, settings.chunk_height, block::AIR)
    }

    #[test]
    fn test_isolated_voxel_shows_all_six_faces() {
        let (settings, mut world) = empty_world();
        let coord = ChunkCoord::new(5, 5);
        let mut chunk = air_chunk_at(coord, &settings);
        chunk.set_voxel(3, 8, 3, block::STONE);
        world.chunks.insert(coord, chunk);

        let mesh = build_chunk_mesh(&world, coord).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_touching_faces_are_culled() {
        let (settings, mut world) = empty_world();
        let coord = ChunkCoord::new(5, 5);
        let mut chunk = air_chunk_at(coord, &settings);
        chunk.set_voxel(3, 8, 3, block::STONE);
        chunk.set_voxel(4, 8, 3, block::STONE);
        world.chunks.insert(coord, chunk);

        // Two cubes share one face pair: 12 faces minus the 2 hidden ones.
        let mesh = build_chunk_mesh(&world, coord).unwrap();
        assert_eq!(mesh.vertex_count(), 10 * 4);
        assert_eq!(mesh.triangle_count(), 10 * 2);
    }

    #[test]
    fn test_leaves_do_not_hide_neighbor_faces() {
        let (settings, mut world) = empty_world();
        let coord = ChunkCoord::new(5, 5);
        let mut chunk = air_chunk_at(coord, &settings);
        chunk.set_voxel(3, 8, 3, block::STONE);
        chunk.set_voxel(4, 8, 3, block::LEAVES);
        world.chunks.insert(coord, chunk);

        // The stone keeps all 6 faces because leaves render neighbor
        // faces; the leaves lose only the face against the stone.
        let mesh = build_chunk_mesh(&world, coord).unwrap();
        assert_eq!(mesh.triangle_count(), 11 * 2);
    }

    #[test]
    fn test_face_textures_map_into_the_atlas() {
        let (settings, mut world) = empty_world();
        let coord = ChunkCoord::new(5, 5);
        let mut chunk = air_chunk_at(coord, &settings);
        chunk.set_voxel(3, 8, 3, block::GRASS);
        world.chunks.insert(coord, chunk);

        let mesh = build_chunk_mesh(&world, coord).unwrap();
        let top = atlas_uvs(3, settings.atlas_tiles);
        let bottom = atlas_uvs(4, settings.atlas_tiles);
        assert!(mesh.uvs.contains(&VertexUv { u: top[0][0], v: top[0][1] }));
        assert!(mesh.uvs.contains(&VertexUv { u: bottom[0][0], v: bottom[0][1] }));
    }

    #[test]
    fn test_missing_or_unpopulated_chunks_yield_nothing() {
        let (settings, mut world) = empty_world();
        let coord = ChunkCoord::new(5, 5);
        assert!(build_chunk_mesh(&world, coord).is_none());

        world
            .chunks
            .insert(coord, Chunk::new(coord, settings.chunk_width, settings.chunk_height));
        assert!(build_chunk_mesh(&world, coord).is_none());
    }

    #[test]
    fn test_populated_air_chunk_yields_an_empty_mesh() {
        let (settings, mut world) = empty_world();
        let coord = ChunkCoord::new(5, 5);
        world.chunks.insert(coord, air_chunk_at(coord, &settings));

        let mesh = build_chunk_mesh(&world, coord).unwrap();
        assert!(mesh.is_empty());
    }
}
