use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cluster from cluster-api - The cluster-wide configuration shared by all
/// machines, including the provider specific spec
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cluster.k8s.io",
    version = "v1alpha1",
    kind = "Cluster",
    plural = "clusters",
    namespaced,
    derive = "Default",
    status = "ClusterStatus",
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Cluster network configuration
    #[serde(default)]
    pub cluster_network: ClusterNetworkingConfig,

    /// Provider specific configuration
    #[serde(default)]
    pub provider_spec: ProviderSpec,
}

/// Network configuration of a cluster
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkingConfig {
    /// Network ranges services get VIPs from
    #[serde(default)]
    pub services: NetworkRanges,

    /// Network ranges pod IPs are allocated from
    #[serde(default)]
    pub pods: NetworkRanges,

    /// Domain name for services
    #[serde(default)]
    pub service_domain: String,
}

/// A list of CIDR blocks
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRanges {
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
}

impl NetworkRanges {
    /// The first CIDR block, or an empty string when none is configured
    pub fn subnet(&self) -> &str {
        self.cidr_blocks.first().map(String::as_str).unwrap_or_default()
    }
}

/// Provider specific configuration, stored as an opaque object that the
/// provider decodes with its own scheme
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProviderSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Status of a Cluster
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// Endpoints the API server can be reached at, once published
    #[serde(default)]
    pub api_endpoints: Vec<APIEndpoint>,

    /// Provider specific status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// An endpoint of the API server
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct APIEndpoint {
    /// Hostname or IP address
    pub host: String,
    pub port: i32,
}

impl APIEndpoint {
    /// The endpoint as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Cluster {
    /// The first published API endpoint, if any
    pub fn api_endpoint(&self) -> Option<&APIEndpoint> {
        self.status.as_ref()?.api_endpoints.first()
    }
}
