//! Cluster data and clusterization: split an index buffer into fixed-size
//! triangle clusters for virtual geometry.

use meshopt::ffi;

use crate::bounds::Bounds;
use crate::config::Config;
use crate::mesh::Mesh;

/// One DAG leaf (or derived node before group-assignment): a small patch of
/// triangles addressing the original mesh's vertex buffer.
#[derive(Clone, Debug)]
pub(crate) struct Cluster {
    pub vertices: usize,
    pub indices: Vec<u32>,
    /// The id of the (more refined) group this cluster was produced from, or
    /// `None` for original-geometry leaves.
    pub refined: Option<usize>,
    pub bounds: Bounds,
}

/// Splits `indices` into clusters of at most `config.max_triangles` triangles
/// and `config.max_vertices` unique vertices, using either spatially-aware or
/// connectivity-aware meshlet construction.
///
/// Never fails: a degenerate or empty `indices` produces zero clusters.
pub(crate) fn clusterize(config: &Config, mesh: &Mesh<'_>, indices: &[u32]) -> Vec<Cluster> {
    if indices.is_empty() {
        return Vec::new();
    }

    let max_meshlets =
        unsafe { ffi::meshopt_buildMeshletsBound(indices.len(), config.max_vertices, config.min_triangles) };

    let mut meshlets: Vec<ffi::meshopt_Meshlet> = vec![unsafe { std::mem::zeroed() }; max_meshlets];
    let mut meshlet_vertices: Vec<u32> = vec![0; indices.len()];
    let mut meshlet_triangles: Vec<u8> = vec![0; indices.len()];

    let positions = mesh.vertex_positions.as_ptr() as *const f32;

    let count = unsafe {
        if config.cluster_spatial {
            ffi::meshopt_buildMeshletsSpatial(
                meshlets.as_mut_ptr(),
                meshlet_vertices.as_mut_ptr(),
                meshlet_triangles.as_mut_ptr(),
                indices.as_ptr(),
                indices.len(),
                positions,
                mesh.vertex_count,
                mesh.vertex_positions_stride,
                config.max_vertices,
                config.min_triangles,
                config.max_triangles,
                config.cluster_fill_weight,
            )
        } else {
            ffi::meshopt_buildMeshletsFlex(
                meshlets.as_mut_ptr(),
                meshlet_vertices.as_mut_ptr(),
                meshlet_triangles.as_mut_ptr(),
                indices.as_ptr(),
                indices.len(),
                positions,
                mesh.vertex_count,
                mesh.vertex_positions_stride,
                config.max_vertices,
                config.min_triangles,
                config.max_triangles,
                0.0,
                config.cluster_split_factor,
            )
        }
    };

    meshlets.truncate(count);

    let mut clusters = Vec::with_capacity(count);
    for meshlet in &meshlets {
        let v_off = meshlet.vertex_offset as usize;
        let v_count = meshlet.vertex_count as usize;
        let t_off = meshlet.triangle_offset as usize;
        let t_count = meshlet.triangle_count as usize;

        if config.optimize_clusters {
            unsafe {
                ffi::meshopt_optimizeMeshlet(
                    meshlet_vertices[v_off..].as_mut_ptr(),
                    meshlet_triangles[t_off..].as_mut_ptr(),
                    t_count,
                    v_count,
                );
            }
        }

        // note: we discard meshlet-local indices; they can be recovered by the
        // caller using `local_indices`.
        let mut global_indices = Vec::with_capacity(t_count * 3);
        for &local in &meshlet_triangles[t_off..t_off + t_count * 3] {
            global_indices.push(meshlet_vertices[v_off + local as usize]);
        }

        clusters.push(Cluster {
            vertices: v_count,
            indices: global_indices,
            refined: None,
            bounds: Bounds {
                center: [0.0; 3],
                radius: 0.0,
                error: 0.0,
            },
        });
    }

    clusters
}
