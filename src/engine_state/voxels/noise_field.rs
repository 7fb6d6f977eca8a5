//! # Noise Field Module
//!
//! Seeded coherent-noise sampling for terrain generation. All noise used by
//! the generator flows through one [`NoiseField`] so that a single explicit
//! seed determines the entire world; there is no ambient noise state.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};

/// The seed that fixes a world's terrain, lodes and structures.
///
/// Two worlds built from equal seeds and equal settings produce identical
/// voxel data for every coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldSeed(pub u32);

/// A seeded Perlin sampler with the coordinate conventions the terrain
/// passes depend on.
///
/// 2D samples are normalized by the chunk width so that terrain features
/// span a consistent number of chunks regardless of the configured chunk
/// size. 3D samples are not normalized; lode scales are expressed directly
/// in voxel units.
pub struct NoiseField {
    perlin: Perlin,
    chunk_width: f64,
}

impl NoiseField {
    /// Creates a noise field for the given seed and chunk width.
    ///
    /// # Arguments
    /// * `seed` - The world seed
    /// * `chunk_width` - The chunk width in voxels, used to normalize 2D samples
    pub fn new(seed: WorldSeed, chunk_width: usize) -> Self {
        NoiseField {
            perlin: Perlin::new(seed.0),
            chunk_width: chunk_width as f64,
        }
    }

    /// Samples 2D noise at a ground-plane position.
    ///
    /// Inputs are nudged by 0.1 before scaling; integer inputs would
    /// otherwise land exactly on the Perlin lattice, where every sample
    /// degenerates to the same value.
    ///
    /// # Arguments
    /// * `x` - Global x coordinate
    /// * `z` - Global z coordinate
    /// * `offset` - Additive offset distinguishing independent noise layers
    /// * `scale` - Feature frequency, applied after chunk-width normalization
    ///
    /// # Returns
    /// A sample in `[0, 1]`.
    pub fn sample2d(&self, x: f64, z: f64, offset: f64, scale: f64) -> f64 {
        let sample = self.perlin.get([
            (x + 0.1) / self.chunk_width * scale + offset,
            (z + 0.1) / self.chunk_width * scale + offset,
        ]);
        (sample + 1.0) * 0.5
    }

    /// Thresholded pseudo-3D noise at a voxel position.
    ///
    /// Averages the six pairwise 2D lookups over the axis permutations
    /// (xy, yz, xz, yx, zy, zx) of the offset and scaled coordinates. Lode
    /// placement depends on exactly this formula; changing it reshuffles
    /// every ore vein in existing worlds.
    ///
    /// # Arguments
    /// * `position` - Global voxel position
    /// * `offset` - Additive offset distinguishing independent noise layers
    /// * `scale` - Feature frequency in voxel units
    /// * `threshold` - Sample values above this read as `true`
    ///
    /// # Returns
    /// `true` when the averaged sample exceeds the threshold.
    pub fn sample3d(&self, position: Point3<i32>, offset: f64, scale: f64, threshold: f64) -> bool {
        let x = (position.x as f64 + offset + 0.1) * scale;
        let y = (position.y as f64 + offset + 0.1) * scale;
        let z = (position.z as f64 + offset + 0.1) * scale;

        let ab = self.unit_sample(x, y);
        let bc = self.unit_sample(y, z);
        let ac = self.unit_sample(x, z);
        let ba = self.unit_sample(y, x);
        let cb = self.unit_sample(z, y);
        let ca = self.unit_sample(z, x);

        (ab + bc + ac + ba + cb + ca) / 6.0 > threshold
    }

    /// A single raw 2D lookup remapped from [-1, 1] to [0, 1].
    fn unit_sample(&self, u: f64, v: f64) -> f64 {
        (self.perlin.get([u, v]) + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample2d_stays_in_unit_range() {
        let field = NoiseField::new(WorldSeed(0), 16);
        for x in -40..40 {
            for z in -40..40 {
                let sample = field.sample2d(x as f64, z as f64, 0.0, 0.25);
                assert!((0.0..=1.0).contains(&sample), "sample {} at ({}, {})", sample, x, z);
            }
        }
    }

    #[test]
    fn test_sample2d_is_deterministic() {
        let field = NoiseField::new(WorldSeed(77), 16);
        let again = NoiseField::new(WorldSeed(77), 16);
        for x in 0..24 {
            let a = field.sample2d(x as f64, 3.0, 0.0, 0.25);
            let b = again.sample2d(x as f64, 3.0, 0.0, 0.25);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_seed_changes_the_field() {
        let a = NoiseField::new(WorldSeed(0), 16);
        let b = NoiseField::new(WorldSeed(1), 16);
        let mut any_different = false;
        for x in 0..32 {
            for z in 0..32 {
                if a.sample2d(x as f64, z as f64, 0.0, 0.25)
                    != b.sample2d(x as f64, z as f64, 0.0, 0.25)
                {
                    any_different = true;
                }
            }
        }
        assert!(any_different);
    }

    #[test]
    fn test_offset_separates_noise_layers() {
        let field = NoiseField::new(WorldSeed(0), 16);
        let mut any_different = false;
        for x in 0..32 {
            if field.sample2d(x as f64, 9.0, 0.0, 1.3) != field.sample2d(x as f64, 9.0, 500.0, 1.3) {
                any_different = true;
            }
        }
        assert!(any_different);
    }

    #[test]
    fn test_sample3d_is_deterministic() {
        let field = NoiseField::new(WorldSeed(5), 16);
        let position = Point3::new(17, 23, -4);
        let first = field.sample3d(position, 34500.0, 0.1, 0.55);
        for _ in 0..8 {
            assert_eq!(field.sample3d(position, 34500.0, 0.1, 0.55), first);
        }
    }

    #[test]
    fn test_sample3d_threshold_is_monotonic() {
        // A cell that passes a high threshold must pass every lower one.
        let field = NoiseField::new(WorldSeed(5), 16);
        for x in 0..16 {
            for y in 0..16 {
                let position = Point3::new(x, y, 7);
                if field.sample3d(position, 0.0, 0.1, 0.6) {
                    assert!(field.sample3d(position, 0.0, 0.1, 0.4));
                }
            }
        }
    }
}
