//! # Block Side Module
//!
//! The six faces of a voxel cube, plus the shared geometry tables the mesher
//! uses to turn a face into a quad: unit-cube corner positions, the corner
//! order per face, and the neighbor offset a face looks toward.

use cgmath::Vector3;
use num_derive::FromPrimitive;

/// Positions of the eight corners of a unit voxel cube.
///
/// Corner indices are referenced by [`FACE_CORNERS`]; the bottom face of the
/// cube holds corners 0, 1, 4, 5 and the top face corners 2, 3, 6, 7.
pub const VOXEL_CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Corner order per face, indexed by `BlockSide as usize`.
///
/// Each face lists four corner indices into [`VOXEL_CORNERS`] in
/// (lower-left, upper-left, lower-right, upper-right) order as seen from
/// outside the cube. Two triangles (0,1,2) and (2,1,3) over that order wind
/// counterclockwise, which is what gives each quad its outward flat normal.
pub const FACE_CORNERS: [[usize; 4]; 6] = [
    [0, 3, 1, 2], // back
    [5, 6, 4, 7], // front
    [3, 7, 2, 6], // top
    [1, 5, 0, 4], // bottom
    [4, 7, 0, 3], // left
    [1, 2, 5, 6], // right
];

/// Neighbor cell offset per face, indexed by `BlockSide as usize`.
const FACE_CHECKS: [[i32; 3]; 6] = [
    [0, 0, -1], // back
    [0, 0, 1],  // front
    [0, 1, 0],  // top
    [0, -1, 0], // bottom
    [-1, 0, 0], // left
    [1, 0, 0],  // right
];

/// Represents the six faces of a voxel block.
///
/// The discriminants index the geometry tables above and the per-face
/// texture arrays in the block catalog, so the order is load-bearing:
/// [BACK, FRONT, TOP, BOTTOM, LEFT, RIGHT].
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The back face (facing negative Z)
    BACK = 0,

    /// The front face (facing positive Z)
    FRONT = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns all six block faces in table order.
    ///
    /// # Returns
    /// An array containing all `BlockSide` variants.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::BACK,
            BlockSide::FRONT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Converts a face table index back into a `BlockSide`.
    ///
    /// # Arguments
    /// * `index` - A face index in `0..6`
    ///
    /// # Returns
    /// The matching side, or `None` for an out-of-range index.
    pub fn from_index(index: usize) -> Option<BlockSide> {
        num::FromPrimitive::from_usize(index)
    }

    /// Returns the offset of the cell this face looks toward.
    ///
    /// The mesher samples the occlusion snapshot at `cell + offset` to
    /// decide whether this face is visible.
    pub fn neighbor_offset(&self) -> Vector3<i32> {
        Vector3::from(FACE_CHECKS[*self as usize])
    }

    /// Returns the four corner indices of this face, in
    /// (lower-left, upper-left, lower-right, upper-right) order.
    pub fn corner_indices(&self) -> [usize; 4] {
        FACE_CORNERS[*self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_round_trips() {
        for (index, side) in BlockSide::all().into_iter().enumerate() {
            assert_eq!(BlockSide::from_index(index), Some(side));
            assert_eq!(side as usize, index);
        }
        assert_eq!(BlockSide::from_index(6), None);
    }

    #[test]
    fn test_neighbor_offsets_are_unit_axis_steps() {
        for side in BlockSide::all() {
            let offset = side.neighbor_offset();
            assert_eq!(offset.x.abs() + offset.y.abs() + offset.z.abs(), 1);
        }
    }

    #[test]
    fn test_opposing_faces_look_in_opposite_directions() {
        let pairs = [
            (BlockSide::BACK, BlockSide::FRONT),
            (BlockSide::TOP, BlockSide::BOTTOM),
            (BlockSide::LEFT, BlockSide::RIGHT),
        ];
        for (a, b) in pairs {
            assert_eq!(a.neighbor_offset(), -b.neighbor_offset());
        }
    }

    #[test]
    fn test_face_corners_lie_on_the_face_plane() {
        // Every corner of a face must sit on the plane the face looks toward.
        for side in BlockSide::all() {
            let offset = side.neighbor_offset();
            for corner in side.corner_indices() {
                let position = VOXEL_CORNERS[corner];
                if offset.x != 0 {
                    assert_eq!(position[0], (offset.x.max(0)) as f32);
                }
                if offset.y != 0 {
                    assert_eq!(position[1], (offset.y.max(0)) as f32);
                }
                if offset.z != 0 {
                    assert_eq!(position[2], (offset.z.max(0)) as f32);
                }
            }
        }
    }
}
