//! Precondition-violation errors for the cluster LOD builder.

use thiserror::Error;

/// Errors returned by [`crate::build`] when the caller-supplied [`crate::Config`]
/// or [`crate::Mesh`] violates a documented precondition.
///
/// These are never returned for "expected" runtime outcomes (a stuck
/// simplification, an empty mesh) — those are represented in-band as
/// terminal groups, not as errors.
#[derive(Debug, Error, PartialEq)]
pub enum ClusterLodError {
    #[error("max_triangles must be in 4..=256, got {0}")]
    MaxTrianglesOutOfRange(usize),

    #[error("min_triangles ({min}) must be <= max_triangles ({max})")]
    MinTrianglesExceedsMax { min: usize, max: usize },

    #[error("max_vertices must be <= 256, got {0}")]
    MaxVerticesOutOfRange(usize),

    #[error("vertex_attributes_stride ({stride}) must be a multiple of 4 bytes")]
    AttributeStrideMisaligned { stride: usize },

    #[error("attribute_count ({count}) exceeds what vertex_attributes_stride ({stride}) bytes can hold")]
    AttributeCountExceedsStride { count: usize, stride: usize },

    #[error("attribute_protect_mask (0b{mask:b}) references attributes beyond attribute_count ({count})")]
    ProtectMaskOutOfRange { mask: u32, count: usize },

    #[error("indices.len() ({0}) is not a multiple of 3")]
    IndexCountNotTriangulated(usize),

    #[error("index {index} references vertex {vertex}, but mesh.vertex_count is {vertex_count}")]
    IndexOutOfBounds {
        index: usize,
        vertex: u32,
        vertex_count: usize,
    },
}
