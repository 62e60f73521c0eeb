//! Startup-script metadata for GCE instances
//!
//! Masters and nodes get a block of shell variables describing the cluster,
//! followed by the operator supplied startup script.

use crate::machinesetup::Metadata;
use crate::pubkeypin;
use crate::scheme::Scheme;
use crate::{CoreError, Result};
use capg_api::{Cluster, GCEClusterProviderSpec, Machine, MachineRole};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Instance metadata key holding the startup script
pub const STARTUP_SCRIPT_KEY: &str = "startup-script";

const MASTER_TEMPLATE: &str = "master-environment-vars";
const NODE_TEMPLATE: &str = "node-environment-vars";

const MASTER_ENVIRONMENT_VARS: &str = r#"
#!/bin/bash
KUBELET_VERSION={{ kubelet_version }}
VERSION=v${KUBELET_VERSION}
PORT=443
NAMESPACE={{ machine_namespace }}
MACHINE=$NAMESPACE
MACHINE+="/"
MACHINE+={{ machine_name }}
CONTROL_PLANE_VERSION={{ control_plane_version }}
CLUSTER_DNS_DOMAIN={{ cluster_dns_domain }}
POD_CIDR={{ pod_cidr }}
SERVICE_CIDR={{ service_cidr }}
CLUSTER_NAME={{ cluster_name }}
LOADBALANCER_IP={{ loadbalancer_ip }}
CACERTHASH={{ ca_cert_hash }}
TOKEN={{ token }}
"#;

const NODE_ENVIRONMENT_VARS: &str = r#"
#!/bin/bash
KUBELET_VERSION={{ kubelet_version }}
TOKEN={{ token }}
MASTER={{ master_endpoint }}
NAMESPACE={{ machine_namespace }}
MACHINE=$NAMESPACE
MACHINE+="/"
MACHINE+={{ machine_name }}
CLUSTER_DNS_DOMAIN={{ cluster_dns_domain }}
POD_CIDR={{ pod_cidr }}
SERVICE_CIDR={{ service_cidr }}
"#;

/// Values substituted into the templates, assembled per render
#[derive(Clone, Debug, Default, Serialize)]
struct TemplateParameters {
    token: String,
    project: String,
    machine_name: String,
    machine_namespace: String,
    cluster_name: String,
    cluster_dns_domain: String,
    pod_cidr: String,
    service_cidr: String,
    master_endpoint: String,
    loadbalancer_ip: String,
    ca_cert_hash: String,
    kubelet_version: String,
    control_plane_version: String,
}

impl TemplateParameters {
    /// Parameters shared by master and node scripts
    fn new(token: &str, cluster: &Cluster, machine: &Machine, project: &str) -> Self {
        let network = &cluster.spec.cluster_network;
        Self {
            token: token.to_string(),
            project: project.to_string(),
            machine_name: machine.metadata.name.clone().unwrap_or_default(),
            machine_namespace: machine.metadata.namespace.clone().unwrap_or_default(),
            cluster_name: cluster.metadata.name.clone().unwrap_or_default(),
            cluster_dns_domain: network.service_domain.clone(),
            pod_cidr: network.pods.subnet().to_string(),
            service_cidr: network.services.subnet().to_string(),
            kubelet_version: strip_version(&machine.spec.versions.kubelet).to_string(),
            ..Default::default()
        }
    }
}

/// Renders startup-script metadata for masters and nodes
pub struct MetadataRenderer {
    env: Environment<'static>,
    scheme: Scheme,
}

impl MetadataRenderer {
    /// Create a renderer decoding provider specs with `scheme`
    pub fn new(scheme: Scheme) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.add_template(MASTER_TEMPLATE, MASTER_ENVIRONMENT_VARS)?;
        env.add_template(NODE_TEMPLATE, NODE_ENVIRONMENT_VARS)?;

        Ok(Self { env, scheme })
    }

    /// Metadata for a worker node
    pub fn node_metadata(
        &self,
        token: &str,
        cluster: &Cluster,
        machine: &Machine,
        project: &str,
        metadata: &Metadata,
    ) -> Result<BTreeMap<String, String>> {
        let endpoint = cluster
            .api_endpoint()
            .ok_or_else(|| missing_endpoint(cluster))?;

        let params = TemplateParameters {
            master_endpoint: endpoint.address(),
            ..TemplateParameters::new(token, cluster, machine, project)
        };

        self.render(NODE_TEMPLATE, &params, metadata)
    }

    /// Metadata for a control plane machine
    pub fn master_metadata(
        &self,
        token: &str,
        cluster: &Cluster,
        machine: &Machine,
        project: &str,
        metadata: &Metadata,
    ) -> Result<BTreeMap<String, String>> {
        let endpoint = cluster
            .api_endpoint()
            .ok_or_else(|| missing_endpoint(cluster))?;

        let provider_spec = self.cluster_provider_spec(cluster)?;
        let ca_cert_hash = pubkeypin::ca_cert_hash(&provider_spec.ca_key_pair.cert.0)?;

        let params = TemplateParameters {
            loadbalancer_ip: endpoint.host.clone(),
            ca_cert_hash,
            control_plane_version: strip_version(&machine.spec.versions.control_plane).to_string(),
            ..TemplateParameters::new(token, cluster, machine, project)
        };

        self.render(MASTER_TEMPLATE, &params, metadata)
    }

    /// Metadata for a machine with the given role
    pub fn metadata_for_role(
        &self,
        role: MachineRole,
        token: &str,
        cluster: &Cluster,
        machine: &Machine,
        project: &str,
        metadata: &Metadata,
    ) -> Result<BTreeMap<String, String>> {
        match role {
            MachineRole::Master => self.master_metadata(token, cluster, machine, project, metadata),
            MachineRole::Node => self.node_metadata(token, cluster, machine, project, metadata),
        }
    }

    /// Decode the GCE provider spec embedded in a cluster
    pub fn cluster_provider_spec(&self, cluster: &Cluster) -> Result<GCEClusterProviderSpec> {
        self.scheme
            .decode(cluster.spec.provider_spec.value.as_ref())
    }

    fn render(
        &self,
        template: &str,
        params: &TemplateParameters,
        metadata: &Metadata,
    ) -> Result<BTreeMap<String, String>> {
        let mut script = self.env.get_template(template)?.render(params)?;
        script.push_str(&metadata.startup_script);
        debug!(
            "Rendered {} for machine {}/{}",
            template, params.machine_namespace, params.machine_name
        );

        let mut rendered = BTreeMap::new();
        rendered.insert(STARTUP_SCRIPT_KEY.to_string(), script);
        Ok(rendered)
    }
}

fn missing_endpoint(cluster: &Cluster) -> CoreError {
    let name = cluster.metadata.name.as_deref().unwrap_or_default();
    match cluster.metadata.namespace.as_deref() {
        Some(namespace) => CoreError::MissingEndpoint(format!("{}/{}", namespace, name)),
        None => CoreError::MissingEndpoint(name.to_string()),
    }
}

/// Strip a one character prefix such as the "v" of "v1.13.0"
fn strip_version(version: &str) -> &str {
    let mut chars = version.chars();
    match (chars.next(), chars.next()) {
        (Some(prefix), Some(next)) if !prefix.is_ascii_digit() && next.is_ascii_digit() => {
            &version[prefix.len_utf8()..]
        }
        _ => version,
    }
}
