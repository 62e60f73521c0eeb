//! GCE cluster provider API types
//!
//! This library defines the types the GCE provider reads and writes:
//! - GCEClusterProviderSpec: PKI material and kubeadm configuration embedded in a Cluster
//! - GCEClusterProviderStatus: provider status extension point
//! - kubeadm: ClusterConfiguration bindings used inside the provider spec
//! - cluster_api: Cluster and Machine bindings from the lifecycle manager

pub mod v1alpha1;
pub mod kubeadm;
pub mod cluster_api;

pub use v1alpha1::{
    GCEClusterProviderSpec, GCEClusterProviderSpecList, GCEClusterProviderStatus,
    GCEClusterProviderStatusList, KeyPair,
};
pub use cluster_api::{Cluster, Machine, MachineRole, MachineVersionInfo};
