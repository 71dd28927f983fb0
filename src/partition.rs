//! Groups pending clusters into small clusters-of-clusters by shared-position
//! connectivity, for independent simplification.

use meshopt::ffi;

use crate::cluster::Cluster;
use crate::config::Config;
use crate::mesh::Mesh;

/// Groups `pending` cluster ids into partitions of roughly `config.partition_size`
/// clusters each, based on shared (remapped) vertex connectivity.
///
/// Every id in `pending` appears in exactly one returned partition.
pub(crate) fn partition(
    config: &Config,
    mesh: &Mesh<'_>,
    clusters: &[Cluster],
    pending: &[usize],
    remap: &[u32],
) -> Vec<Vec<usize>> {
    if pending.len() <= config.partition_size {
        return vec![pending.to_vec()];
    }

    let mut cluster_indices = Vec::new();
    let mut cluster_counts: Vec<u32> = Vec::with_capacity(pending.len());

    for &id in pending {
        let indices = &clusters[id].indices;
        cluster_counts.push(indices.len() as u32);
        cluster_indices.extend(indices.iter().map(|&v| remap[v as usize]));
    }

    let mut cluster_part: Vec<u32> = vec![0; pending.len()];
    let positions_ptr = if config.partition_spatial {
        mesh.vertex_positions.as_ptr() as *const f32
    } else {
        std::ptr::null()
    };

    let partition_count = unsafe {
        ffi::meshopt_partitionClusters(
            cluster_part.as_mut_ptr(),
            cluster_indices.as_ptr(),
            cluster_indices.len(),
            cluster_counts.as_ptr(),
            cluster_counts.len(),
            positions_ptr,
            remap.len(),
            mesh.vertex_positions_stride,
            config.partition_size,
        )
    };

    let mut partitions: Vec<Vec<usize>> = (0..partition_count)
        .map(|_| Vec::with_capacity(config.partition_size + config.partition_size / 3))
        .collect();

    let partition_remap = if config.partition_sort {
        // Use any representative point per partition; the last cluster assigned
        // to it is as good as any other, matching the reference implementation.
        let mut partition_point = vec![0.0f32; partition_count * 3];
        for (i, &id) in pending.iter().enumerate() {
            let center = clusters[id].bounds.center;
            let base = cluster_part[i] as usize * 3;
            partition_point[base..base + 3].copy_from_slice(&center);
        }

        let mut remap = vec![0u32; partition_count];
        unsafe {
            ffi::meshopt_spatialSortRemap(
                remap.as_mut_ptr(),
                partition_point.as_ptr(),
                partition_count,
                std::mem::size_of::<f32>() * 3,
            );
        }
        Some(remap)
    } else {
        None
    };

    for (i, &id) in pending.iter().enumerate() {
        let part = cluster_part[i] as usize;
        let target = partition_remap.as_ref().map_or(part, |r| r[part] as usize);
        partitions[target].push(id);
    }

    partitions
}
