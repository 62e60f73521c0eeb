/// Bindings to the cluster-api v1alpha1 CRDs
///
/// The lifecycle manager owns Cluster and Machine objects; the GCE provider
/// only reads them to render bootstrap metadata.

pub mod cluster;
pub mod machine;

pub use cluster::{APIEndpoint, Cluster, ClusterNetworkingConfig, ClusterSpec, ClusterStatus, NetworkRanges, ProviderSpec};
pub use machine::{Machine, MachineRole, MachineSpec, MachineStatus, MachineVersionInfo};
