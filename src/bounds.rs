//! Per-cluster and group-merged sphere bounds.

use crate::mesh::Mesh;

/// A bounding sphere plus a monotone simplification error, in mesh-coordinate
/// units. `error == f32::INFINITY` marks a terminal group.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: [f32; 3],
    pub radius: f32,
    pub error: f32,
}

impl Bounds {
    pub(crate) fn terminal(mut self) -> Bounds {
        self.error = f32::INFINITY;
        self
    }
}

/// Computes a sphere enclosing the vertices referenced by `indices`, with the
/// given (caller-supplied) error.
pub(crate) fn compute_cluster_bounds(mesh: &Mesh<'_>, indices: &[u32], error: f32) -> Bounds {
    let adapter = meshopt::VertexDataAdapter::new(mesh.vertex_positions, mesh.vertex_positions_stride, 0)
        .expect("vertex_positions_stride must be at least 12 bytes");
    let bounds = meshopt::compute_cluster_bounds(indices, &adapter);
    Bounds {
        center: bounds.center,
        radius: bounds.radius,
        error,
    }
}

/// Computes a conservative enclosing sphere over a set of child bounds, and
/// takes the *maximum* of their errors (never the average or sum) so the
/// merged bounds never under-report a child's error.
pub(crate) fn merge(children: &[Bounds]) -> Bounds {
    assert!(!children.is_empty());

    let merged = unsafe {
        meshopt::ffi::meshopt_computeSphereBounds(
            children.as_ptr() as *const f32,
            children.len(),
            std::mem::size_of::<Bounds>(),
            &children[0].radius as *const f32,
            std::mem::size_of::<Bounds>(),
        )
    };

    let error = children.iter().fold(0.0f32, |acc, b| acc.max(b.error));

    Bounds {
        center: merged.center,
        radius: merged.radius,
        error,
    }
}
