/// API version v1alpha1 for GCE provider config types

pub mod cluster_provider_spec;
pub mod cluster_provider_status;

pub use cluster_provider_spec::{GCEClusterProviderSpec, GCEClusterProviderSpecList, KeyPair};
pub use cluster_provider_status::{GCEClusterProviderStatus, GCEClusterProviderStatusList};

/// API group for GCE provider config resources
pub const API_GROUP: &str = "gceproviderconfig.k8s.io";
/// API version for GCE provider config resources
pub const API_VERSION: &str = "v1alpha1";
