use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::{ByteString, List, ListableResource, Metadata, NamespaceResourceScope, Resource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::kubeadm::ClusterConfiguration;

/// GCEClusterProviderSpec is the provider configuration stored in a
/// Cluster's `spec.providerSpec.value`.
///
/// The key pairs are generated once when the cluster is created. The admin
/// kubeconfig and discovery hashes are derived from them, so the pairs must
/// only change as part of a CA rotation.
///
/// `apiVersion` and `kind` are not fields of this struct; the scheme writes
/// them into the object envelope on encode and checks them on decode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GCEClusterProviderSpec {
    /// Standard object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// GCP project the cluster runs in
    #[serde(default)]
    pub project: String,

    /// Key pair for the cluster CA
    #[serde(default)]
    pub ca_key_pair: KeyPair,

    /// Key pair for the etcd CA
    #[serde(default, rename = "etcdCAKeyPair")]
    pub etcd_ca_key_pair: KeyPair,

    /// Key pair for the front proxy CA
    #[serde(default, rename = "frontProxyCAKeyPair")]
    pub front_proxy_ca_key_pair: KeyPair,

    /// Service account signing key pair
    #[serde(default)]
    pub sa_key_pair: KeyPair,

    /// Admin kubeconfig generated from the certificates in this spec.
    /// Kept in the spec rather than the status since it depends on the CA
    /// certificates on disk.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_kubeconfig: String,

    /// Public key pins of the CA, used by masters and nodes to trust the
    /// control plane during bootstrap. Unchanged until the CA is rotated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discovery_hashes: Vec<String>,

    /// Cluster-wide configuration used during `kubeadm init`
    #[serde(default)]
    pub cluster_configuration: ClusterConfiguration,
}

/// Certificate and private key supplied to kubeadm.
/// Both are PEM documents, base64 encoded on the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeyPair {
    #[serde(default)]
    #[schemars(with = "String")]
    pub cert: ByteString,
    #[serde(default)]
    #[schemars(with = "String")]
    pub key: ByteString,
}

impl KeyPair {
    pub fn new(cert: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            cert: ByteString(cert.into()),
            key: ByteString(key.into()),
        }
    }

    /// Whether both the certificate and the key are present
    pub fn has_cert_and_key(&self) -> bool {
        !self.cert.0.is_empty() && !self.key.0.is_empty()
    }
}

/// List of GCEClusterProviderSpec objects
pub type GCEClusterProviderSpecList = List<GCEClusterProviderSpec>;

impl Resource for GCEClusterProviderSpec {
    const API_VERSION: &'static str = "gceproviderconfig.k8s.io/v1alpha1";
    const GROUP: &'static str = super::API_GROUP;
    const KIND: &'static str = "GCEClusterProviderSpec";
    const VERSION: &'static str = super::API_VERSION;
    const URL_PATH_SEGMENT: &'static str = "gceclusterproviderspecs";
    type Scope = NamespaceResourceScope;
}

impl ListableResource for GCEClusterProviderSpec {
    const LIST_KIND: &'static str = "GCEClusterProviderSpecList";
}

impl Metadata for GCEClusterProviderSpec {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_pair_base64_on_the_wire() {
        let pair = KeyPair::new("cert", "key");
        let value = serde_json::to_value(&pair).unwrap();
        assert_eq!(value, json!({"cert": "Y2VydA==", "key": "a2V5"}));
    }

    #[test]
    fn test_key_pair_has_cert_and_key() {
        assert!(KeyPair::new("cert", "key").has_cert_and_key());
        assert!(!KeyPair::new("cert", "").has_cert_and_key());
        assert!(!KeyPair::default().has_cert_and_key());
    }

    #[test]
    fn test_spec_field_names() {
        let spec = GCEClusterProviderSpec {
            project: "my-project".to_string(),
            etcd_ca_key_pair: KeyPair::new("e", "k"),
            front_proxy_ca_key_pair: KeyPair::new("f", "k"),
            discovery_hashes: vec!["sha256:abc".to_string()],
            ..Default::default()
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["project"], "my-project");
        assert!(value.get("caKeyPair").is_some());
        assert!(value.get("etcdCAKeyPair").is_some());
        assert!(value.get("frontProxyCAKeyPair").is_some());
        assert!(value.get("saKeyPair").is_some());
        assert_eq!(value["discoveryHashes"], json!(["sha256:abc"]));
        assert!(value.get("adminKubeconfig").is_none());
    }

    #[test]
    fn test_spec_deserialize_minimal() {
        let spec: GCEClusterProviderSpec =
            serde_json::from_value(json!({"project": "p"})).unwrap();
        assert_eq!(spec.project, "p");
        assert!(!spec.ca_key_pair.has_cert_and_key());
        assert!(spec.discovery_hashes.is_empty());
    }

    #[test]
    fn test_spec_deserialize_without_project() {
        let spec: GCEClusterProviderSpec =
            serde_json::from_value(json!({"saKeyPair": {"cert": "Y2VydA=="}})).unwrap();
        assert_eq!(spec.project, "");
        assert_eq!(spec.sa_key_pair.cert.0, b"cert");
    }

    #[test]
    fn test_key_pair_schema_uses_strings() {
        let schema = serde_json::to_value(schemars::schema_for!(KeyPair)).unwrap();
        assert_eq!(schema["properties"]["cert"]["type"], "string");
        assert_eq!(schema["properties"]["key"]["type"], "string");
    }

    #[test]
    fn test_spec_resource_identity() {
        assert_eq!(
            GCEClusterProviderSpec::API_VERSION,
            format!("{}/{}", super::super::API_GROUP, super::super::API_VERSION)
        );
        assert_eq!(GCEClusterProviderSpec::LIST_KIND, "GCEClusterProviderSpecList");
    }
}
