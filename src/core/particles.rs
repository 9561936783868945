//! Point cloud generation
//!
//! Points are scattered uniformly through a cube centred on the origin and
//! never move on the host afterwards; all animation happens in the shader.

use bytemuck::{Pod, Zeroable};
use rand::Rng;

use super::config::ParticleConfig;

/// Number of points to generate for a viewport of the given CSS width.
/// Narrow viewports get the sparse count.
pub fn point_count(viewport_width: f64, config: &ParticleConfig) -> usize {
    if viewport_width >= config.breakpoint {
        config.dense_count
    } else {
        config.sparse_count
    }
}

/// Host copy of the point cloud: positions and a parallel array of sizes
#[derive(Clone, Debug)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
    pub sizes: Vec<f32>,
}

impl PointCloud {
    /// Generate the cloud for a viewport width.
    /// Every axis lies in `[-extent, extent)`, every size in `[min_size, max_size)`.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        viewport_width: f64,
        config: &ParticleConfig,
    ) -> Self {
        let count = point_count(viewport_width, config);
        let extent = config.extent;

        let positions = (0..count)
            .map(|_| {
                [
                    rng.gen_range(-extent..extent),
                    rng.gen_range(-extent..extent),
                    rng.gen_range(-extent..extent),
                ]
            })
            .collect();

        let sizes = (0..count)
            .map(|_| rng.gen_range(config.min_size..config.max_size))
            .collect();

        Self { positions, sizes }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleave positions and sizes for a single vertex buffer upload
    pub fn to_gpu(&self) -> Vec<GpuPoint> {
        self.positions
            .iter()
            .zip(&self.sizes)
            .map(|(&position, &size)| GpuPoint { position, size })
            .collect()
    }
}

/// GPU-compatible point (16 bytes): `a_position` at offset 0, `a_size` at 12
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuPoint {
    pub position: [f32; 3],
    pub size: f32,
}

impl GpuPoint {
    pub const STRIDE: i32 = std::mem::size_of::<GpuPoint>() as i32;
    pub const POSITION_OFFSET: i32 = 0;
    pub const SIZE_OFFSET: i32 = 12;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_point_count_breakpoint() {
        let config = ParticleConfig::default();
        assert_eq!(point_count(767.0, &config), 800);
        assert_eq!(point_count(767.99, &config), 800);
        assert_eq!(point_count(768.0, &config), 1500);
        assert_eq!(point_count(1920.0, &config), 1500);
        assert_eq!(point_count(0.0, &config), 800);
    }

    #[test]
    fn test_generated_points_stay_in_bounds() {
        let config = ParticleConfig::default();
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let cloud = PointCloud::generate(&mut rng, 1280.0, &config);
            assert_eq!(cloud.len(), 1500);
            assert_eq!(cloud.sizes.len(), cloud.positions.len());

            for p in &cloud.positions {
                for &axis in p {
                    assert!((-50.0..50.0).contains(&axis), "coordinate {} out of range", axis);
                }
            }
            for &size in &cloud.sizes {
                assert!((1.0..4.0).contains(&size), "size {} out of range", size);
            }
        }
    }

    #[test]
    fn test_narrow_viewport_generates_sparse_cloud() {
        let mut rng = StdRng::seed_from_u64(7);
        let cloud = PointCloud::generate(&mut rng, 375.0, &ParticleConfig::default());
        assert_eq!(cloud.len(), 800);
    }

    #[test]
    fn test_points_fill_the_cube() {
        // Uniform over the cube: every octant should see a fair share
        let mut rng = StdRng::seed_from_u64(42);
        let cloud = PointCloud::generate(&mut rng, 1280.0, &ParticleConfig::default());
        let mut octants = [0usize; 8];
        for p in &cloud.positions {
            let idx = (p[0] >= 0.0) as usize | ((p[1] >= 0.0) as usize) << 1 | ((p[2] >= 0.0) as usize) << 2;
            octants[idx] += 1;
        }
        for (i, &n) in octants.iter().enumerate() {
            assert!(n > 100, "octant {} only has {} points", i, n);
        }
    }

    #[test]
    fn test_gpu_layout() {
        assert_eq!(std::mem::size_of::<GpuPoint>(), 16);
        assert_eq!(GpuPoint::STRIDE, 16);

        let cloud = PointCloud {
            positions: vec![[1.0, 2.0, 3.0], [-4.0, -5.0, -6.0]],
            sizes: vec![1.5, 3.5],
        };
        let gpu = cloud.to_gpu();
        assert_eq!(gpu[1], GpuPoint { position: [-4.0, -5.0, -6.0], size: 3.5 });

        let floats: &[f32] = bytemuck::cast_slice(&gpu);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 1.5, -4.0, -5.0, -6.0, 3.5]);
    }
}
