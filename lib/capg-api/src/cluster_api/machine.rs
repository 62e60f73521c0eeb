use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::cluster::ProviderSpec;

/// Machine from cluster-api - A single node of a cluster
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cluster.k8s.io",
    version = "v1alpha1",
    kind = "Machine",
    plural = "machines",
    namespaced,
    derive = "Default",
    status = "MachineStatus",
)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    /// Provider specific configuration
    #[serde(default)]
    pub provider_spec: ProviderSpec,

    /// Versions of the Kubernetes components on this machine
    #[serde(default)]
    pub versions: MachineVersionInfo,

    /// Provider assigned identifier, set once the instance exists
    #[serde(default, rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// Kubernetes component versions of a machine
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineVersionInfo {
    /// Kubelet version, e.g. "1.13.0" or "v1.13.0"
    #[serde(default)]
    pub kubelet: String,

    /// Control plane version; only set on control plane machines
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub control_plane: String,
}

/// Status of a Machine
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineStatus {
    /// Provider specific status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Role a machine plays in the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub enum MachineRole {
    Master,
    Node,
}

impl Machine {
    /// Whether this machine runs the control plane
    pub fn is_control_plane(&self) -> bool {
        !self.spec.versions.control_plane.is_empty()
    }

    /// Role derived from the machine's versions
    pub fn role(&self) -> MachineRole {
        if self.is_control_plane() {
            MachineRole::Master
        } else {
            MachineRole::Node
        }
    }
}
