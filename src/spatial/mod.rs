pub mod clustering;
pub mod culling;

pub use clustering::{cluster, cluster_radius, Cluster, Clustering, Located, MarkerRef};
pub use culling::Culling;
