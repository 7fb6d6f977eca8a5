//! # Mesh Data Module
//!
//! CPU-side mesh buffers produced by the chunk mesher. Vertex attributes
//! are plain-old-data structs so consumers can hand the buffers straight
//! to whatever upload path they use; [`MeshData`] exposes byte views for
//! exactly that.
//!
//! Every quad contributes four fresh vertices and six indices. Vertices
//! are never shared between faces, which keeps normals flat per face
//! without storing them.

use bytemuck::{Pod, Zeroable};
use log::warn;

/// A vertex position in chunk-local space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPosition {
    /// X coordinate relative to the chunk origin
    pub x: f32,
    /// Y coordinate relative to the chunk origin
    pub y: f32,
    /// Z coordinate relative to the chunk origin
    pub z: f32,
}

/// A vertex texture coordinate into the block atlas.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexUv {
    /// U coordinate (normalized 0.0-1.0)
    pub u: f32,
    /// V coordinate (normalized 0.0-1.0)
    pub v: f32,
}

/// Triangle mesh for one chunk, positions in chunk-local space.
///
/// The consumer translates by the chunk origin when placing the mesh in
/// the world; keeping positions local makes the buffers independent of
/// where the chunk sits.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// One entry per vertex.
    pub positions: Vec<VertexPosition>,
    /// Vertex indices, three per triangle.
    pub triangles: Vec<u32>,
    /// One entry per vertex, parallel to `positions`.
    pub uvs: Vec<VertexUv>,
}

impl MeshData {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        MeshData::default()
    }

    /// Appends one quad: four fresh vertices and two triangles.
    ///
    /// Corners and uvs arrive in (lower-left, upper-left, lower-right,
    /// upper-right) order; the triangles `(0, 1, 2)` and `(2, 1, 3)` wind
    /// the face outward.
    ///
    /// # Arguments
    /// * `corners` - The four corner positions of the quad
    /// * `uvs` - The four atlas coordinates, parallel to `corners`
    pub fn push_face(&mut self, corners: &[[f32; 3]; 4], uvs: &[[f32; 2]; 4]) {
        let base = self.positions.len() as u32;
        for corner in corners {
            self.positions.push(VertexPosition {
                x: corner[0],
                y: corner[1],
                z: corner[2],
            });
        }
        for uv in uvs {
            self.uvs.push(VertexUv { u: uv[0], v: uv[1] });
        }
        self.triangles
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Whether the mesh holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position buffer as raw bytes, ready for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Index buffer as raw bytes, ready for upload.
    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Texture coordinate buffer as raw bytes, ready for upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }
}

/// Atlas coordinates for one tile, in quad corner order.
///
/// The atlas is a square grid of `atlas_tiles x atlas_tiles` tiles with
/// tile 0 at the top-left, numbered row-major. Returned corners are
/// (lower-left, upper-left, lower-right, upper-right) to line up with
/// [`MeshData::push_face`].
///
/// # Arguments
/// * `texture_index` - Tile number in the atlas
/// * `atlas_tiles` - Tiles per atlas row
pub fn atlas_uvs(texture_index: u32, atlas_tiles: u32) -> [[f32; 2]; 4] {
    if atlas_tiles == 0 {
        warn!("Texture atlas has zero tiles per row; mapping everything to the origin");
        return [[0.0, 0.0]; 4];
    }
    let tile_count = atlas_tiles * atlas_tiles;
    let texture_index = if texture_index >= tile_count {
        warn!(
            "Texture index {} is outside the {}-tile atlas; using tile 0",
            texture_index, tile_count
        );
        0
    } else {
        texture_index
    };

    let tile_size = 1.0 / atlas_tiles as f32;
    let row = texture_index / atlas_tiles;
    let col = texture_index - row * atlas_tiles;
    let u = col as f32 * tile_size;
    let v = 1.0 - row as f32 * tile_size - tile_size;

    [
        [u, v],
        [u, v + tile_size],
        [u + tile_size, v],
        [u + tile_size, v + tile_size],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_push_face_appends_fresh_vertices() {
        let mut mesh = MeshData::new();
        let corners = [
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let uvs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

        mesh.push_face(&corners, &uvs);
        mesh.push_face(&corners, &uvs);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(&mesh.triangles[..6], &[0, 1, 2, 2, 1, 3]);
        assert_eq!(&mesh.triangles[6..], &[4, 5, 6, 6, 5, 7]);
    }

    #[test]
    fn test_byte_views_cover_the_buffers() {
        let mut mesh = MeshData::new();
        mesh.push_face(
            &[[0.0; 3], [0.0; 3], [0.0; 3], [0.0; 3]],
            &[[0.0; 2], [0.0; 2], [0.0; 2], [0.0; 2]],
        );

        assert_eq!(mesh.position_bytes().len(), 4 * 3 * 4);
        assert_eq!(mesh.uv_bytes().len(), 4 * 2 * 4);
        assert_eq!(mesh.triangle_bytes().len(), 6 * 4);
    }

    #[test]
    fn test_atlas_tile_zero_sits_top_left() {
        let uvs = atlas_uvs(0, 4);
        assert_relative_eq!(uvs[0][0], 0.0);
        assert_relative_eq!(uvs[0][1], 0.75);
        assert_relative_eq!(uvs[3][0], 0.25);
        assert_relative_eq!(uvs[3][1], 1.0);
    }

    #[test]
    fn test_atlas_last_tile_sits_bottom_right() {
        let uvs = atlas_uvs(15, 4);
        assert_relative_eq!(uvs[0][0], 0.75);
        assert_relative_eq!(uvs[0][1], 0.0);
        assert_relative_eq!(uvs[3][0], 1.0);
        assert_relative_eq!(uvs[3][1], 0.25);
    }

    #[test]
    fn test_out_of_range_texture_falls_back_to_tile_zero() {
        assert_eq!(atlas_uvs(99, 4), atlas_uvs(0, 4));
    }
}
