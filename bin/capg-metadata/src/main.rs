use anyhow::{Context, Result};
use capg_api::{Cluster, GCEClusterProviderSpec, Machine, MachineRole};
use capg_core::{
    gce_provider_config_scheme, pubkeypin, MachineParams, MachineSetupConfigs, MetadataRenderer,
};
use kube::{Api, Client};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    debug!("Loaded configuration: {:?}", config);
    info!(
        "Rendering startup-script metadata for machine {}/{} in cluster {}",
        config.namespace, config.machine, config.cluster
    );

    let setup_yaml = std::fs::read_to_string(&config.machine_setup_config).with_context(|| {
        format!(
            "Failed to read machine setup configs from {}",
            config.machine_setup_config.display()
        )
    })?;
    let setup_configs = MachineSetupConfigs::from_yaml(&setup_yaml)?;

    let client = Client::try_default().await?;
    let clusters: Api<Cluster> = Api::namespaced(client.clone(), &config.namespace);
    let machines: Api<Machine> = Api::namespaced(client, &config.namespace);

    let cluster = clusters
        .get(&config.cluster)
        .await
        .with_context(|| format!("Failed to get cluster {}/{}", config.namespace, config.cluster))?;
    let machine = machines
        .get(&config.machine)
        .await
        .with_context(|| format!("Failed to get machine {}/{}", config.namespace, config.machine))?;

    let role = machine.role();
    let params = MachineParams {
        os: config.machine_os.clone(),
        roles: vec![role],
        versions: machine.spec.versions.clone(),
    };
    let setup_metadata = setup_configs.metadata(&params)?;
    debug!("Selected machine setup config for {:?} on {}", role, params.os);

    let renderer = MetadataRenderer::new(gce_provider_config_scheme())?;
    let metadata = renderer.metadata_for_role(
        role,
        &config.token,
        &cluster,
        &machine,
        &config.project,
        setup_metadata,
    )?;

    if role == MachineRole::Master {
        let provider_spec = renderer.cluster_provider_spec(&cluster)?;
        for warning in ca_warnings(&provider_spec) {
            warn!("Cluster {}/{}: {}", config.namespace, config.cluster, warning);
        }
    }

    println!("{}", serde_json::to_string_pretty(&metadata)?);
    info!("Rendered {:?} metadata for machine {}", role, config.machine);

    Ok(())
}

/// Problems with the cluster CA that do not block rendering
fn ca_warnings(spec: &GCEClusterProviderSpec) -> Vec<String> {
    let mut warnings = Vec::new();
    if !spec.ca_key_pair.has_cert_and_key() {
        warnings.push("CA key pair is missing its certificate or key".to_string());
    }
    if let Err(e) = pubkeypin::verify_discovery_hashes(spec) {
        warnings.push(format!("discovery hashes do not match the CA: {}", e));
    }
    warnings
}
