//! Machine setup configs
//!
//! Operators describe which image and startup script a machine gets based
//! on its OS, roles and versions:
//!
//! ```yaml
//! items:
//! - machineParams:
//!   - os: ubuntu-1604-lts
//!     roles: [Master]
//!     versions:
//!       kubelet: 1.13.0
//!       controlPlane: 1.13.0
//!   image: projects/ubuntu-os-cloud/global/images/family/ubuntu-1604-lts
//!   metadata:
//!     startupScript: |
//!       #!/bin/bash
//!       ...
//! ```

use crate::{CoreError, Result};
use capg_api::{MachineRole, MachineVersionInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// All machine setup configs known to the provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineSetupConfigs {
    #[serde(default)]
    pub items: Vec<MachineSetupConfig>,
}

/// Image and metadata for the machines matching any of `machine_params`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSetupConfig {
    pub machine_params: Vec<MachineParams>,
    pub image: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Instance metadata supplied by the operator
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Script appended to the generated variable block
    #[serde(default)]
    pub startup_script: String,
}

/// Parameters a machine setup config is selected by
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineParams {
    pub os: String,
    pub roles: Vec<MachineRole>,
    pub versions: MachineVersionInfo,
}

impl MachineParams {
    /// Whether two parameter sets select the same machines. Roles are
    /// compared regardless of order.
    pub fn matches(&self, other: &MachineParams) -> bool {
        self.os == other.os
            && self.versions == other.versions
            && self.roles.iter().collect::<BTreeSet<_>>()
                == other.roles.iter().collect::<BTreeSet<_>>()
    }
}

impl MachineSetupConfigs {
    /// Parse configs from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let configs: Self = serde_yaml::from_str(yaml)?;
        debug!("Loaded {} machine setup config(s)", configs.items.len());
        Ok(configs)
    }

    /// The first config with parameters matching `params`
    pub fn matching(&self, params: &MachineParams) -> Result<&MachineSetupConfig> {
        self.items
            .iter()
            .find(|config| config.machine_params.iter().any(|p| p.matches(params)))
            .ok_or_else(|| {
                CoreError::NoMachineSetup(format!(
                    "os={}, roles={:?}, versions={:?}",
                    params.os, params.roles, params.versions
                ))
            })
    }

    /// Image for machines matching `params`
    pub fn image(&self, params: &MachineParams) -> Result<&str> {
        Ok(&self.matching(params)?.image)
    }

    /// Metadata for machines matching `params`
    pub fn metadata(&self, params: &MachineParams) -> Result<&Metadata> {
        Ok(&self.matching(params)?.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIGS: &str = r#"
items:
- machineParams:
  - os: ubuntu-1604-lts
    roles:
    - Master
    versions:
      kubelet: 1.13.0
      controlPlane: 1.13.0
  image: projects/ubuntu-os-cloud/global/images/family/ubuntu-1604-lts
  metadata:
    startupScript: |
      echo master
- machineParams:
  - os: ubuntu-1604-lts
    roles:
    - Node
    versions:
      kubelet: 1.13.0
  - os: ubuntu-1604-lts
    roles:
    - Node
    versions:
      kubelet: 1.12.3
  image: projects/ubuntu-os-cloud/global/images/family/ubuntu-1604-lts-node
  metadata:
    startupScript: |
      echo node
"#;

    fn params(roles: Vec<MachineRole>, kubelet: &str, control_plane: &str) -> MachineParams {
        MachineParams {
            os: "ubuntu-1604-lts".to_string(),
            roles,
            versions: MachineVersionInfo {
                kubelet: kubelet.to_string(),
                control_plane: control_plane.to_string(),
            },
        }
    }

    #[test]
    fn test_from_yaml() {
        let configs = MachineSetupConfigs::from_yaml(CONFIGS).unwrap();
        assert_eq!(configs.items.len(), 2);
        assert_eq!(configs.items[1].machine_params.len(), 2);
        assert_eq!(configs.items[0].metadata.startup_script, "echo master\n");
    }

    #[test]
    fn test_from_yaml_invalid() {
        let result = MachineSetupConfigs::from_yaml("items: [{image: 3, machineParams: nope}]");
        assert!(matches!(result, Err(CoreError::MachineSetup(_))));
    }

    #[test]
    fn test_matching_master_and_node() {
        let configs = MachineSetupConfigs::from_yaml(CONFIGS).unwrap();

        let master = params(vec![MachineRole::Master], "1.13.0", "1.13.0");
        assert_eq!(configs.metadata(&master).unwrap().startup_script, "echo master\n");

        let node = params(vec![MachineRole::Node], "1.12.3", "");
        assert_eq!(
            configs.image(&node).unwrap(),
            "projects/ubuntu-os-cloud/global/images/family/ubuntu-1604-lts-node"
        );
    }

    #[test]
    fn test_no_match() {
        let configs = MachineSetupConfigs::from_yaml(CONFIGS).unwrap();
        let node = params(vec![MachineRole::Node], "1.11.0", "");
        assert!(matches!(configs.metadata(&node), Err(CoreError::NoMachineSetup(_))));

        let mut other_os = params(vec![MachineRole::Master], "1.13.0", "1.13.0");
        other_os.os = "cos-stable".to_string();
        assert!(matches!(configs.image(&other_os), Err(CoreError::NoMachineSetup(_))));
    }

    #[test]
    fn test_roles_compared_as_set() {
        let a = params(vec![MachineRole::Master, MachineRole::Node], "1.13.0", "1.13.0");
        let b = params(vec![MachineRole::Node, MachineRole::Master], "1.13.0", "1.13.0");
        let c = params(vec![MachineRole::Master], "1.13.0", "1.13.0");
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }
}
