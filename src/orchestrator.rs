//! The outer clusterize -> partition -> lock -> simplify -> re-clusterize
//! loop that builds the cluster DAG and drives the caller's output callback.

use meshopt::ffi;

use crate::bounds::{compute_cluster_bounds, merge, Bounds};
use crate::cluster::{clusterize, Cluster};
use crate::config::Config;
use crate::error::ClusterLodError;
use crate::lock::{lock_boundaries, PROTECT};
use crate::mesh::Mesh;
use crate::partition::partition;
use crate::simplify::simplify;

/// Identifies one emitted [`GroupView`] within a single [`build`] call.
///
/// Assigned by the caller's output callback; this crate only ever stores and
/// forwards the value it is handed back, it never constructs one itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub usize);

/// The group descriptor passed to the output callback.
#[derive(Clone, Copy, Debug)]
pub struct GroupView {
    pub depth: u32,
    pub simplified: Bounds,
}

/// One cluster belonging to the group passed to the output callback.
#[derive(Clone, Debug)]
pub struct ClusterOutput {
    pub refined: Option<GroupId>,
    pub bounds: Bounds,
    pub indices: Vec<u32>,
    pub vertex_count: usize,
}

/// Builds the cluster DAG for `mesh`, calling `output` once per emitted group
/// in formation order (ascending depth, partition order within a depth).
///
/// `output` receives the group descriptor and the clusters belonging to it,
/// and returns a [`GroupId`] that this function records as `refined` on every
/// cluster later produced by re-clusterizing that group's simplified
/// geometry. Returns the total number of clusters produced.
pub fn build<F>(config: &Config, mesh: &Mesh<'_>, mut output: F) -> Result<usize, ClusterLodError>
where
    F: FnMut(GroupView, &[ClusterOutput]) -> GroupId,
{
    config.validate()?;
    mesh.validate()?;

    log::debug!(
        "build: {} indices, {} vertices, config={:?}",
        mesh.indices.len(),
        mesh.vertex_count,
        config
    );

    let mut locks = vec![0u8; mesh.vertex_count];
    let remap = generate_position_remap(mesh);

    if mesh.attribute_protect_mask != 0 {
        if let Some(_attrs) = mesh.vertex_attributes {
            let max_attributes = mesh.vertex_attributes_stride / 4;
            for i in 0..mesh.vertex_count {
                let r = remap[i] as usize;
                if r == i {
                    continue;
                }
                for j in 0..max_attributes {
                    if mesh.attribute_protect_mask & (1 << j) != 0
                        && mesh.attribute(i as u32, j) != mesh.attribute(r as u32, j)
                    {
                        locks[i] |= PROTECT;
                    }
                }
            }
        }
    }

    let mut clusters = clusterize(config, mesh, mesh.indices);
    for cluster in &mut clusters {
        cluster.bounds = compute_cluster_bounds(mesh, &cluster.indices, 0.0);
    }

    let mut pending: Vec<usize> = (0..clusters.len()).collect();
    let mut depth = 0u32;

    while pending.len() > 1 {
        let groups = partition(config, mesh, &clusters, &pending, &remap);
        pending.clear();

        lock_boundaries(&mut locks, &groups, &clusters, &remap, mesh.vertex_lock);

        log::trace!("depth {depth}: {} groups", groups.len());

        for group in &groups {
            let mut merged = Vec::with_capacity(group.len() * config.max_triangles * 3);
            for &id in group {
                merged.extend_from_slice(&clusters[id].indices);
            }

            let target = (merged.len() / 3) as f32 * config.simplify_ratio;
            let target = target as usize * 3;

            let child_bounds: Vec<Bounds> = group.iter().map(|&id| clusters[id].bounds).collect();
            let mut bounds = merge(&child_bounds);

            let (simplified, error) = simplify(config, mesh, &merged, &locks, target);

            if simplified.len() as f32 > merged.len() as f32 * config.simplify_threshold {
                log::trace!(
                    "depth {depth}: partition of {} clusters stuck ({} -> {} indices)",
                    group.len(),
                    merged.len(),
                    simplified.len()
                );
                bounds = bounds.terminal();
                let group_clusters = cluster_outputs(config, mesh, &clusters, group);
                output(GroupView { depth, simplified: bounds }, &group_clusters);
                continue;
            }

            bounds.error = (bounds.error * config.simplify_error_merge_previous).max(error)
                + error * config.simplify_error_merge_additive;

            let group_clusters = cluster_outputs(config, mesh, &clusters, group);
            let refined = output(GroupView { depth, simplified: bounds }, &group_clusters);

            for &id in group {
                clusters[id].indices = Vec::new();
            }

            let split = clusterize(config, mesh, &simplified);
            for mut cluster in split {
                cluster.refined = Some(refined.0);
                cluster.bounds = bounds;
                clusters.push(cluster);
                pending.push(clusters.len() - 1);
            }
        }

        depth += 1;
    }

    if let Some(&id) = pending.first() {
        let bounds = clusters[id].bounds.terminal();
        let group_clusters = cluster_outputs(config, mesh, &clusters, &pending);
        output(GroupView { depth, simplified: bounds }, &group_clusters);
    }

    log::debug!("build: {} clusters, depth {depth}", clusters.len());

    Ok(clusters.len())
}

fn cluster_outputs(config: &Config, mesh: &Mesh<'_>, clusters: &[Cluster], group: &[usize]) -> Vec<ClusterOutput> {
    group
        .iter()
        .map(|&id| {
            let cluster = &clusters[id];
            let bounds = if config.optimize_bounds && cluster.refined.is_some() {
                compute_cluster_bounds(mesh, &cluster.indices, cluster.bounds.error)
            } else {
                cluster.bounds
            };
            ClusterOutput {
                refined: cluster.refined.map(GroupId),
                bounds,
                indices: cluster.indices.clone(),
                vertex_count: cluster.vertices,
            }
        })
        .collect()
}

fn generate_position_remap(mesh: &Mesh<'_>) -> Vec<u32> {
    let mut remap = vec![0u32; mesh.vertex_count];
    unsafe {
        ffi::meshopt_generatePositionRemap(
            remap.as_mut_ptr(),
            mesh.vertex_positions.as_ptr() as *const f32,
            mesh.vertex_count,
            mesh.vertex_positions_stride,
        );
    }
    remap
}
