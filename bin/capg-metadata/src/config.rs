//! Configuration read from the environment

use anyhow::{anyhow, Result};
use std::fmt;
use std::path::PathBuf;

const DEFAULT_NAMESPACE: &str = "default";
const DEFAULT_MACHINE_OS: &str = "ubuntu-1604-lts";

pub struct Config {
    /// Namespace of the Cluster and Machine (CAPG_NAMESPACE)
    pub namespace: String,
    /// Cluster name (CAPG_CLUSTER)
    pub cluster: String,
    /// Machine name (CAPG_MACHINE)
    pub machine: String,
    /// Bootstrap token for kubeadm (CAPG_TOKEN)
    pub token: String,
    /// GCP project (CAPG_PROJECT)
    pub project: String,
    /// Path to the machine setup configs YAML (CAPG_MACHINE_SETUP_CONFIG)
    pub machine_setup_config: PathBuf,
    /// OS used to select the machine setup config (CAPG_MACHINE_OS)
    pub machine_os: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("{} must be set", key))
        };

        Ok(Self {
            namespace: optional("CAPG_NAMESPACE", DEFAULT_NAMESPACE),
            cluster: required("CAPG_CLUSTER")?,
            machine: required("CAPG_MACHINE")?,
            token: required("CAPG_TOKEN")?,
            project: required("CAPG_PROJECT")?,
            machine_setup_config: PathBuf::from(required("CAPG_MACHINE_SETUP_CONFIG")?),
            machine_os: optional("CAPG_MACHINE_OS", DEFAULT_MACHINE_OS),
        })
    }
}

// The token is a credential; keep it out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("namespace", &self.namespace)
            .field("cluster", &self.cluster)
            .field("machine", &self.machine)
            .field("token", &"<redacted>")
            .field("project", &self.project)
            .field("machine_setup_config", &self.machine_setup_config)
            .field("machine_os", &self.machine_os)
            .finish()
    }
}
