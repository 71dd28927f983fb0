//! Attribute-aware edge-collapse simplification, with permissive and sloppy
//! fallbacks for groups that would otherwise stall.

use meshopt::ffi;
use meshopt::SimplifyOptions;

use crate::config::Config;
use crate::mesh::Mesh;

/// Reduces `indices` (one group's merged index buffer) toward `target_count`
/// triangles*3 indices, returning the simplified index buffer and an
/// absolute-units error estimate.
///
/// Never fails outright: if every fallback still leaves the output above
/// `target_count`, the caller (the orchestrator) treats the result as stuck.
pub(crate) fn simplify(config: &Config, mesh: &Mesh<'_>, indices: &[u32], locks: &[u8], target_count: usize) -> (Vec<u32>, f32) {
    if target_count >= indices.len() {
        return (indices.to_vec(), 0.0);
    }

    let mut error = 0.0f32;
    let options = (SimplifyOptions::Sparse | SimplifyOptions::ErrorAbsolute)
        | if config.simplify_permissive {
            SimplifyOptions::Permissive
        } else {
            SimplifyOptions::empty()
        }
        | if config.simplify_regularize {
            SimplifyOptions::Regularize
        } else {
            SimplifyOptions::empty()
        };

    let mut lod = simplify_with_attributes(mesh, indices, locks, target_count, options, &mut error);

    if lod.len() > target_count && config.simplify_fallback_permissive && !config.simplify_permissive {
        lod = simplify_with_attributes(
            mesh,
            indices,
            locks,
            target_count,
            options | SimplifyOptions::Permissive,
            &mut error,
        );
    }

    if lod.len() > target_count && config.simplify_fallback_sloppy {
        lod = simplify_sloppy_fallback(mesh, indices, locks, target_count, &mut error);
        error *= config.simplify_error_factor_sloppy;
    }

    if config.simplify_error_edge_limit > 0.0 {
        error = error.min(max_edge_length(mesh, indices) * config.simplify_error_edge_limit);
    }

    (lod, error)
}

fn simplify_with_attributes(
    mesh: &Mesh<'_>,
    indices: &[u32],
    locks: &[u8],
    target_count: usize,
    options: SimplifyOptions,
    error: &mut f32,
) -> Vec<u32> {
    let positions = mesh.vertex_positions.as_ptr() as *const f32;
    let (attributes, attributes_stride) = match mesh.vertex_attributes {
        Some(bytes) => (bytes.as_ptr() as *const f32, mesh.vertex_attributes_stride),
        None => (std::ptr::null(), 0),
    };

    let mut lod = vec![0u32; indices.len()];
    let count = unsafe {
        ffi::meshopt_simplifyWithAttributes(
            lod.as_mut_ptr(),
            indices.as_ptr(),
            indices.len(),
            positions,
            mesh.vertex_count,
            mesh.vertex_positions_stride,
            attributes,
            attributes_stride,
            mesh.attribute_weights.as_ptr(),
            mesh.attribute_count,
            locks.as_ptr(),
            target_count,
            f32::MAX,
            options.bits(),
            error,
        )
    };
    lod.truncate(count);
    lod
}

#[repr(C)]
#[derive(Clone, Copy)]
struct SloppyVertex {
    x: f32,
    y: f32,
    z: f32,
    id: u32,
}

/// Sloppy simplification doesn't support sparse index buffers, so we first
/// de-index the group's working set into a compact vertex stream, simplify
/// that, then translate the local indices it returns back to original ids.
fn simplify_sloppy_fallback(mesh: &Mesh<'_>, indices: &[u32], locks: &[u8], target_count: usize, error: &mut f32) -> Vec<u32> {
    let subset: Vec<SloppyVertex> = indices
        .iter()
        .map(|&v| {
            let p = mesh.position(v);
            SloppyVertex {
                x: p[0],
                y: p[1],
                z: p[2],
                id: v,
            }
        })
        .collect();
    let subset_locks: Vec<u8> = indices.iter().map(|&v| locks[v as usize]).collect();

    let mut lod: Vec<u32> = (0..indices.len() as u32).collect();
    let count = unsafe {
        ffi::meshopt_simplifySloppy(
            lod.as_mut_ptr(),
            lod.as_ptr(),
            lod.len(),
            &subset[0].x as *const f32,
            subset.len(),
            std::mem::size_of::<SloppyVertex>(),
            subset_locks.as_ptr(),
            target_count,
            f32::MAX,
            error,
        )
    };
    lod.truncate(count);

    *error *= unsafe {
        ffi::meshopt_simplifyScale(
            &subset[0].x as *const f32,
            subset.len(),
            std::mem::size_of::<SloppyVertex>(),
        )
    };

    lod.into_iter().map(|local| subset[local as usize].id).collect()
}

/// Per-triangle `max(min_edge_sq, max_edge_sq / 4)`, then square-rooted, taken
/// over the whole input buffer — a stopgap so thin/long triangles don't force
/// the error floor down to the length of their shortest edge.
fn max_edge_length(mesh: &Mesh<'_>, indices: &[u32]) -> f32 {
    let mut max_edge_sq = 0.0f32;
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [mesh.position(tri[0]), mesh.position(tri[1]), mesh.position(tri[2])];
        let eab = dist_sq(a, b);
        let eac = dist_sq(a, c);
        let ebc = dist_sq(b, c);
        let emax = eab.max(eac).max(ebc);
        let emin = eab.min(eac).min(ebc);
        max_edge_sq = max_edge_sq.max(emin.max(emax / 4.0));
    }
    max_edge_sq.sqrt()
}

fn dist_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}
