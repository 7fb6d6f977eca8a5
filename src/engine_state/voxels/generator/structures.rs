//! Deterministic structure stamping. Structures are emitted as deferred
//! voxel edits so that a tree anchored near a chunk border can spill into
//! chunks that do not exist yet.

use cgmath::Point3;
use log::trace;

use crate::engine_state::voxels::biome::TreeSettings;
use crate::engine_state::voxels::block;
use crate::engine_state::voxels::noise_field::NoiseField;
use crate::engine_state::voxels::world::VoxelEdit;

/// Appends the blocks of one tree anchored at a surface cell.
///
/// Trunk height is noise-derived from the anchor column (offset 250,
/// scale 3) and clamped to the configured minimum, so the same anchor
/// always grows the same tree. The trunk rises from the cell above the
/// anchor; the canopy is two 5x5 leaf layers starting one cell above the
/// trunk top, capped by a 3x3 layer.
///
/// # Arguments
/// * `anchor` - The surface cell the tree grows from (stays grass itself)
/// * `noise` - The world noise field
/// * `trees` - Tree shape parameters
/// * `edits` - Sink receiving the trunk and canopy blocks in stamp order
pub fn stamp_tree(anchor: Point3<i32>, noise: &NoiseField, trees: &TreeSettings, edits: &mut Vec<VoxelEdit>) {
    let mut height = (trees.max_height as f64
        * noise.sample2d(anchor.x as f64, anchor.z as f64, 250.0, 3.0))
    .floor() as i32;
    if height < trees.min_height {
        height = trees.min_height;
    }

    for step in 1..height {
        edits.push(VoxelEdit {
            position: Point3::new(anchor.x, anchor.y + step, anchor.z),
            block: block::WOOD,
        });
    }

    for layer in 0..2 {
        for dx in -2..=2 {
            for dz in -2..=2 {
                edits.push(VoxelEdit {
                    position: Point3::new(anchor.x + dx, anchor.y + height + layer, anchor.z + dz),
                    block: block::LEAVES,
                });
            }
        }
    }
    for dx in -1..=1 {
        for dz in -1..=1 {
            edits.push(VoxelEdit {
                position: Point3::new(anchor.x + dx, anchor.y + height + 2, anchor.z + dz),
                block: block::LEAVES,
            });
        }
    }

    trace!("stamped tree at {:?}, trunk height {}", anchor, height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::noise_field::WorldSeed;

    fn stamp(anchor: Point3<i32>) -> Vec<VoxelEdit> {
        let noise = NoiseField::new(WorldSeed(0), 16);
        let trees = TreeSettings::default();
        let mut edits = Vec::new();
        stamp_tree(anchor, &noise, &trees, &mut edits);
        edits
    }

    #[test]
    fn test_tree_is_deterministic() {
        let anchor = Point3::new(40, 45, 40);
        let first = stamp(anchor);
        let second = stamp(anchor);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.block, b.block);
        }
    }

    #[test]
    fn test_canopy_sits_above_the_trunk() {
        let anchor = Point3::new(40, 45, 40);
        let edits = stamp(anchor);

        let trunk_top = edits
            .iter()
            .filter(|edit| edit.block == block::WOOD)
            .map(|edit| edit.position.y)
            .max()
            .unwrap();
        let lowest_leaf = edits
            .iter()
            .filter(|edit| edit.block == block::LEAVES)
            .map(|edit| edit.position.y)
            .min()
            .unwrap();

        assert_eq!(lowest_leaf, trunk_top + 1);
        // 5x5 + 5x5 + 3x3 leaf layers
        assert_eq!(edits.iter().filter(|edit| edit.block == block::LEAVES).count(), 59);
    }

    #[test]
    fn test_trunk_respects_the_minimum_height() {
        let trees = TreeSettings::default();
        for x in 0..64 {
            let edits = stamp(Point3::new(x, 45, 99));
            let trunk = edits.iter().filter(|edit| edit.block == block::WOOD).count() as i32;
            assert!(trunk >= trees.min_height - 1, "trunk {} at x {}", trunk, x);
            assert!(trunk <= trees.max_height);
        }
    }

    #[test]
    fn test_anchor_cell_is_never_written() {
        let anchor = Point3::new(12, 45, 12);
        let edits = stamp(anchor);
        assert!(edits.iter().all(|edit| edit.position != anchor));
    }
}
