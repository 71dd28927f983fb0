//! Build configuration and its rasterization/ray-tracing presets.

use crate::error::ClusterLodError;

/// Tunables for one [`crate::build`] call.
///
/// All fields are independently settable; start from [`Config::rasterization`]
/// or [`Config::raytracing`] and override individual fields rather than
/// constructing this from scratch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    // Clusterization: maps to the meshlet-builder parameters.
    pub max_vertices: usize,
    pub min_triangles: usize,
    pub max_triangles: usize,

    // Partitioning.
    pub partition_spatial: bool,
    pub partition_sort: bool,
    pub partition_size: usize,

    // Clusterization mode.
    pub cluster_spatial: bool,
    pub cluster_fill_weight: f32,
    pub cluster_split_factor: f32,

    // Simplification targets.
    pub simplify_ratio: f32,
    pub simplify_threshold: f32,
    pub simplify_error_merge_previous: f32,
    pub simplify_error_merge_additive: f32,
    pub simplify_error_factor_sloppy: f32,
    pub simplify_error_edge_limit: f32,
    pub simplify_permissive: bool,
    pub simplify_fallback_permissive: bool,
    pub simplify_fallback_sloppy: bool,
    pub simplify_regularize: bool,

    // Bounds/cluster post-processing.
    pub optimize_bounds: bool,
    pub optimize_clusters: bool,
}

impl Config {
    /// Defaults tuned for rasterization, matching the reference `clodDefaultConfig`.
    pub fn rasterization(max_triangles: usize) -> Config {
        Config {
            max_vertices: max_triangles,
            min_triangles: max_triangles / 3,
            max_triangles,

            partition_spatial: true,
            partition_sort: false,
            partition_size: 16,

            cluster_spatial: false,
            cluster_fill_weight: 0.5,
            cluster_split_factor: 2.0,

            simplify_ratio: 0.5,
            simplify_threshold: 0.85,
            simplify_error_merge_previous: 1.0,
            simplify_error_merge_additive: 0.0,
            simplify_error_factor_sloppy: 2.0,
            simplify_error_edge_limit: 0.0,
            simplify_permissive: true,
            simplify_fallback_permissive: false,
            simplify_fallback_sloppy: true,
            simplify_regularize: false,

            optimize_bounds: false,
            optimize_clusters: true,
        }
    }

    /// Defaults tuned for ray tracing, matching the reference `clodDefaultConfigRT`:
    /// smaller clusters (finer BVH granularity) and spatial clusterization for
    /// more uniform-radius bounds.
    pub fn raytracing(max_triangles: usize) -> Config {
        let mut config = Config::rasterization(max_triangles);
        config.min_triangles = max_triangles / 4;
        config.max_vertices = 256.min(max_triangles * 2);
        config.cluster_spatial = true;
        config.cluster_fill_weight = 0.5;
        config
    }

    /// Checks the constraints documented alongside each field; called at the
    /// top of [`crate::build`] so that bad configuration fails fast with a
    /// typed error instead of panicking deep inside the clusterizer.
    pub fn validate(&self) -> Result<(), ClusterLodError> {
        if !(4..=256).contains(&self.max_triangles) {
            return Err(ClusterLodError::MaxTrianglesOutOfRange(self.max_triangles));
        }
        if self.min_triangles > self.max_triangles {
            return Err(ClusterLodError::MinTrianglesExceedsMax {
                min: self.min_triangles,
                max: self.max_triangles,
            });
        }
        if self.max_vertices > 256 {
            return Err(ClusterLodError::MaxVerticesOutOfRange(self.max_vertices));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterization_preset_validates() {
        assert_eq!(Config::rasterization(128).validate(), Ok(()));
    }

    #[test]
    fn raytracing_preset_validates() {
        assert_eq!(Config::raytracing(128).validate(), Ok(()));
    }

    #[test]
    fn raytracing_preset_caps_max_vertices_at_256() {
        let config = Config::raytracing(256);
        assert_eq!(config.max_vertices, 256);
    }

    #[test]
    fn rejects_max_triangles_out_of_range() {
        let config = Config::rasterization(4);
        let mut too_small = config;
        too_small.max_triangles = 3;
        assert_eq!(
            too_small.validate(),
            Err(ClusterLodError::MaxTrianglesOutOfRange(3))
        );
    }

    #[test]
    fn rejects_min_exceeding_max() {
        let mut config = Config::rasterization(64);
        config.min_triangles = 128;
        assert_eq!(
            config.validate(),
            Err(ClusterLodError::MinTrianglesExceedsMax { min: 128, max: 64 })
        );
    }
}
