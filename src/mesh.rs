//! Borrowed-slice mesh input, stride-addressed the way the underlying
//! mesh-optimizer FFI surface expects.

use crate::error::ClusterLodError;

/// A bit in [`Mesh::attribute_protect_mask`] that designates attribute `k`.
pub fn attribute_bit(k: usize) -> u32 {
    1u32 << k
}

/// A single triangle mesh, borrowed for the duration of one [`crate::build`] call.
///
/// Positions and attributes are stride-addressed byte buffers rather than
/// typed slices: this mirrors the mesh-optimizer FFI surface this crate wraps
/// (`meshopt_computeClusterBounds` et al. all take a pointer + byte stride),
/// and lets callers pass an interleaved vertex buffer without repacking it.
#[derive(Clone, Copy)]
pub struct Mesh<'a> {
    pub indices: &'a [u32],
    pub vertex_count: usize,

    /// Byte buffer holding `vertex_count` position entries of 3 `f32`s each.
    pub vertex_positions: &'a [u8],
    /// Byte stride between consecutive position entries; must be >= 12.
    pub vertex_positions_stride: usize,

    /// Byte buffer holding `vertex_count` attribute entries of `attribute_count` `f32`s each.
    pub vertex_attributes: Option<&'a [u8]>,
    /// Byte stride between consecutive attribute entries.
    pub vertex_attributes_stride: usize,
    pub attribute_count: usize,
    /// Per-attribute weight used by the attribute-aware simplifier.
    pub attribute_weights: &'a [f32],
    /// Attributes whose bit is set lock UV-seam vertices against permissive collapse.
    pub attribute_protect_mask: u32,

    /// Caller-supplied per-vertex simplifier lock flags, merged into the builder's own locks.
    pub vertex_lock: Option<&'a [u8]>,
}

impl<'a> Mesh<'a> {
    pub(crate) fn validate(&self) -> Result<(), ClusterLodError> {
        if self.indices.len() % 3 != 0 {
            return Err(ClusterLodError::IndexCountNotTriangulated(self.indices.len()));
        }
        for (i, &v) in self.indices.iter().enumerate() {
            if v as usize >= self.vertex_count {
                return Err(ClusterLodError::IndexOutOfBounds {
                    index: i,
                    vertex: v,
                    vertex_count: self.vertex_count,
                });
            }
        }
        if self.vertex_attributes.is_some() {
            if self.vertex_attributes_stride % 4 != 0 {
                return Err(ClusterLodError::AttributeStrideMisaligned {
                    stride: self.vertex_attributes_stride,
                });
            }
            if self.attribute_count * 4 > self.vertex_attributes_stride {
                return Err(ClusterLodError::AttributeCountExceedsStride {
                    count: self.attribute_count,
                    stride: self.vertex_attributes_stride,
                });
            }
        }
        if self.attribute_protect_mask != 0
            && self.attribute_count < 32
            && self.attribute_protect_mask >= (1u32 << self.attribute_count)
        {
            return Err(ClusterLodError::ProtectMaskOutOfRange {
                mask: self.attribute_protect_mask,
                count: self.attribute_count,
            });
        }
        Ok(())
    }

    pub(crate) fn position(&self, vertex: u32) -> [f32; 3] {
        let offset = vertex as usize * self.vertex_positions_stride;
        read_f32x3(&self.vertex_positions[offset..])
    }

    pub(crate) fn attribute(&self, vertex: u32, attribute: usize) -> f32 {
        let attrs = self.vertex_attributes.expect("attribute access requires vertex_attributes");
        let offset = vertex as usize * self.vertex_attributes_stride + attribute * 4;
        read_f32(&attrs[offset..])
    }
}

fn read_f32(bytes: &[u8]) -> f32 {
    f32::from_ne_bytes(bytes[..4].try_into().unwrap())
}

fn read_f32x3(bytes: &[u8]) -> [f32; 3] {
    [read_f32(bytes), read_f32(&bytes[4..]), read_f32(&bytes[8..])]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of(floats: &[f32]) -> Vec<u8> {
        floats.iter().flat_map(|f| f.to_ne_bytes()).collect()
    }

    #[test]
    fn rejects_non_triangulated_index_count() {
        let positions = bytes_of(&[0.0, 0.0, 0.0]);
        let indices = [0u32, 0];
        let mesh = Mesh {
            indices: &indices,
            vertex_count: 1,
            vertex_positions: &positions,
            vertex_positions_stride: 12,
            vertex_attributes: None,
            vertex_attributes_stride: 0,
            attribute_count: 0,
            attribute_weights: &[],
            attribute_protect_mask: 0,
            vertex_lock: None,
        };
        assert_eq!(mesh.validate(), Err(ClusterLodError::IndexCountNotTriangulated(2)));
    }

    #[test]
    fn rejects_out_of_bounds_index() {
        let positions = bytes_of(&[0.0, 0.0, 0.0]);
        let indices = [0u32, 1, 0];
        let mesh = Mesh {
            indices: &indices,
            vertex_count: 1,
            vertex_positions: &positions,
            vertex_positions_stride: 12,
            vertex_attributes: None,
            vertex_attributes_stride: 0,
            attribute_count: 0,
            attribute_weights: &[],
            attribute_protect_mask: 0,
            vertex_lock: None,
        };
        assert_eq!(
            mesh.validate(),
            Err(ClusterLodError::IndexOutOfBounds {
                index: 1,
                vertex: 1,
                vertex_count: 1
            })
        );
    }

    #[test]
    fn rejects_misaligned_attribute_stride() {
        let positions = bytes_of(&[0.0, 0.0, 0.0]);
        let attributes = vec![0u8; 6];
        let indices = [0u32, 0, 0];
        let mesh = Mesh {
            indices: &indices,
            vertex_count: 1,
            vertex_positions: &positions,
            vertex_positions_stride: 12,
            vertex_attributes: Some(&attributes),
            vertex_attributes_stride: 6,
            attribute_count: 1,
            attribute_weights: &[1.0],
            attribute_protect_mask: 0,
            vertex_lock: None,
        };
        assert_eq!(
            mesh.validate(),
            Err(ClusterLodError::AttributeStrideMisaligned { stride: 6 })
        );
    }

    #[test]
    fn position_reads_interleaved_bytes() {
        let positions = bytes_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let indices = [0u32, 1, 0];
        let mesh = Mesh {
            indices: &indices,
            vertex_count: 2,
            vertex_positions: &positions,
            vertex_positions_stride: 12,
            vertex_attributes: None,
            vertex_attributes_stride: 0,
            attribute_count: 0,
            attribute_weights: &[],
            attribute_protect_mask: 0,
            vertex_lock: None,
        };
        assert_eq!(mesh.position(0), [1.0, 2.0, 3.0]);
        assert_eq!(mesh.position(1), [4.0, 5.0, 6.0]);
    }
}
