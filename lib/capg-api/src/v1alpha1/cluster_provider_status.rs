use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::{List, ListableResource, Metadata, NamespaceResourceScope, Resource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// GCEClusterProviderStatus is the provider status stored in a Cluster's
/// `status.providerStatus`. It carries no fields yet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GCEClusterProviderStatus {
    /// Standard object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,
}

/// List of GCEClusterProviderStatus objects
pub type GCEClusterProviderStatusList = List<GCEClusterProviderStatus>;

impl Resource for GCEClusterProviderStatus {
    const API_VERSION: &'static str = "gceproviderconfig.k8s.io/v1alpha1";
    const GROUP: &'static str = super::API_GROUP;
    const KIND: &'static str = "GCEClusterProviderStatus";
    const VERSION: &'static str = super::API_VERSION;
    const URL_PATH_SEGMENT: &'static str = "gceclusterproviderstatuses";
    type Scope = NamespaceResourceScope;
}

impl ListableResource for GCEClusterProviderStatus {
    const LIST_KIND: &'static str = "GCEClusterProviderStatusList";
}

impl Metadata for GCEClusterProviderStatus {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
