//! Hierarchical cluster-DAG level-of-detail builder for triangle meshes.
//!
//! Given a single indexed mesh, [`build`] produces a DAG of triangle
//! clusters organized into groups, following the approach used by Nanite:
//! clusterize, partition neighboring clusters, lock shared boundaries,
//! simplify each partition, then re-clusterize the simplified geometry into
//! the next DAG level. A render-time traversal (not provided here) selects a
//! crack-free cut of clusters whose projected screen-space error is below a
//! threshold; [`projected_error`] is the formula for that last step.

mod bounds;
mod cluster;
mod config;
mod error;
mod lock;
mod local_indices;
mod mesh;
mod orchestrator;
mod partition;
mod projection;
mod simplify;

pub use bounds::Bounds;
pub use config::Config;
pub use error::ClusterLodError;
pub use local_indices::local_indices;
pub use mesh::{attribute_bit, Mesh};
pub use orchestrator::{build, ClusterOutput, GroupId, GroupView};
pub use projection::projected_error;
