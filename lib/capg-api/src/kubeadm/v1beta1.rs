use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ClusterConfiguration holds the cluster-wide settings used during
/// `kubeadm init`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfiguration {
    /// Etcd configuration, local or external
    #[serde(default)]
    pub etcd: Etcd,

    /// Networking topology of the cluster
    #[serde(default)]
    pub networking: Networking,

    /// Target version of the control plane
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kubernetes_version: String,

    /// Stable IP address or DNS name for the control plane, with optional port
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub control_plane_endpoint: String,

    /// Extra settings for the API server
    #[serde(default, rename = "apiServer")]
    pub api_server: ApiServer,

    /// Extra settings for the controller manager
    #[serde(default)]
    pub controller_manager: ControlPlaneComponent,

    /// Extra settings for the scheduler
    #[serde(default)]
    pub scheduler: ControlPlaneComponent,

    /// DNS add-on installed in the cluster
    #[serde(default)]
    pub dns: Dns,

    /// Where certificates are stored (e.g. /etc/kubernetes/pki)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certificates_dir: String,

    /// Container registry to pull control plane images from
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_repository: String,

    /// Use the hyperkube image instead of per-component images
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub use_hyper_kube_image: bool,

    /// Feature gates enabled by the user
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub feature_gates: BTreeMap<String, bool>,

    /// Cluster name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_name: String,
}

/// Etcd configuration. At most one of `local` and `external` is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Etcd {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalEtcd>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalEtcd>,
}

/// Etcd instance run by kubeadm as a static pod
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalEtcd {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_repository: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_tag: String,

    /// Directory etcd places its data in
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data_dir: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_args: BTreeMap<String, String>,

    #[serde(default, rename = "serverCertSANs", skip_serializing_if = "Vec::is_empty")]
    pub server_cert_sans: Vec<String>,

    #[serde(default, rename = "peerCertSANs", skip_serializing_if = "Vec::is_empty")]
    pub peer_cert_sans: Vec<String>,
}

/// Etcd cluster managed outside kubeadm
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalEtcd {
    pub endpoints: Vec<String>,
    pub ca_file: String,
    pub cert_file: String,
    pub key_file: String,
}

/// Networking topology of the cluster
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_subnet: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pod_subnet: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_domain: String,
}

/// API server settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiServer {
    /// Extra flags passed to the API server
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_args: BTreeMap<String, String>,

    /// Extra Subject Alternative Names for the API server serving certificate
    #[serde(default, rename = "certSANs", skip_serializing_if = "Vec::is_empty")]
    pub cert_sans: Vec<String>,

    /// Timeout waiting for the API server to appear, e.g. "4m0s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_for_control_plane: Option<String>,
}

/// Settings shared by the control plane components
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneComponent {
    /// Extra flags passed to the component
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_args: BTreeMap<String, String>,
}

/// DNS add-on type
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum DnsAddOnType {
    #[default]
    CoreDNS,
    #[serde(rename = "kube-dns")]
    KubeDNS,
}

/// DNS add-on settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dns {
    #[serde(default, rename = "type")]
    pub dns_type: DnsAddOnType,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_repository: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_tag: String,
}
