use serde::Deserialize;
use std::path::Path;
use tracing::info;

use super::providers::{ExternalProvider, ProviderCatalog};
use super::state::{BackingStorageType, DeploymentKind, NodeInfo, WizardState};

const DEFAULT_CONFIG_PATH: &str = "/etc/quarry/wizard.toml";
const USER_CONFIG_PATH: &str = "quarry/wizard.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub general: GeneralConfig,
    pub cluster: ClusterConfig,
    pub defaults: DefaultsConfig,
    /// Site-specific external providers, added to the built-in catalog
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
    /// Candidate nodes for capacity placement
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            cluster: ClusterConfig::default(),
            defaults: DefaultsConfig::default(),
            providers: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

/// An external provider declared in the site config
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEntry {
    pub id: String,
    /// Display name shown in the provider selection (defaults to the id)
    #[serde(default)]
    pub display_name: String,
    /// Resource kind of the provider
    pub kind: String,
}

/// A compute node available for placement
#[derive(Debug, Clone, Deserialize)]
pub struct NodeEntry {
    pub name: String,
    #[serde(default)]
    pub cpus: u32,
    #[serde(default)]
    pub memory_gib: u32,
    #[serde(default)]
    pub zone: String,
}

impl WizardConfig {
    pub fn load() -> Result<Self, super::error::WizardError> {
        if let Some(path) = dirs::config_dir().map(|dir| dir.join(USER_CONFIG_PATH)) {
            if path.exists() {
                return Self::load_from(path);
            }
        }
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, super::error::WizardError> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: WizardConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Built-in providers extended with the configured ones.
    pub fn provider_catalog(&self) -> ProviderCatalog {
        ProviderCatalog::with_extra(self.providers.iter().map(|entry| ExternalProvider {
            id: entry.id.clone(),
            display_name: if entry.display_name.is_empty() {
                entry.id.clone()
            } else {
                entry.display_name.clone()
            },
            kind: entry.kind.clone(),
        }))
    }

    /// Nodes available for placement. With no configured nodes, dry run
    /// mode substitutes a sample inventory so the wizard stays usable.
    pub fn node_inventory(&self) -> Vec<NodeInfo> {
        if self.nodes.is_empty() && self.general.dryrun {
            return sample_nodes();
        }
        self.nodes
            .iter()
            .map(|entry| NodeInfo {
                name: entry.name.clone(),
                cpus: entry.cpus,
                memory_gib: entry.memory_gib,
                zone: entry.zone.clone(),
            })
            .collect()
    }

    /// Fresh session configuration seeded from the configured defaults.
    pub fn initial_state(&self) -> WizardState {
        let mut state = WizardState::new(self.node_inventory());
        state.backing_storage.storage_type = self.defaults.backing_storage;
        state.backing_storage.deployment = self.defaults.deployment;
        state.capacity_and_nodes.requested_capacity_gib = self.defaults.requested_capacity_gib;
        state.create_local_volume_set.volume_set_name = self.defaults.volume_set_name.clone();
        state.backing_storage.existing_storage_class = self
            .cluster
            .storage_classes
            .first()
            .cloned()
            .unwrap_or_default();
        state
    }
}

fn sample_nodes() -> Vec<NodeInfo> {
    ["a", "b", "c"]
        .iter()
        .enumerate()
        .map(|(idx, zone)| NodeInfo {
            name: format!("node-{idx}"),
            cpus: 16,
            memory_gib: 64,
            zone: format!("zone-{zone}"),
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    pub subtitle: String,
    /// Dry run mode - keeps the wizard fully navigable without writing a
    /// provisioning request, and substitutes sample nodes when the config
    /// declares none
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Quarry Storage Setup".to_string(),
            subtitle: "Provision a Quarry storage system".to_string(),
            dryrun: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub platform: String,
    /// Whether a Quarry cluster is already installed; shortens the
    /// external provisioning flow
    pub has_existing_cluster: bool,
    /// Storage classes offered for the use-existing flow
    pub storage_classes: Vec<String>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            platform: "baremetal".to_string(),
            has_existing_cluster: false,
            storage_classes: vec!["standard".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub backing_storage: BackingStorageType,
    pub deployment: DeploymentKind,
    pub requested_capacity_gib: u64,
    pub volume_set_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            backing_storage: BackingStorageType::UseExisting,
            deployment: DeploymentKind::BlockAndFile,
            requested_capacity_gib: 512,
            volume_set_name: "quarry-devices".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = WizardConfig::load_from("/nonexistent/quarry/wizard.toml").unwrap();
        assert_eq!(config.general.title, "Quarry Storage Setup");
        assert!(!config.cluster.has_existing_cluster);
        assert_eq!(config.defaults.backing_storage, BackingStorageType::UseExisting);
    }

    #[test]
    fn full_config_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[general]
title = "Lab Storage"
dryrun = true

[cluster]
platform = "vsphere"
has_existing_cluster = true
storage_classes = ["thin", "fast"]

[defaults]
backing_storage = "local-devices"
deployment = "object-only"
requested_capacity_gib = 2048
volume_set_name = "lab-devices"

[[providers]]
id = "acme"
display_name = "Acme Array"
kind = "AcmeArray"

[[nodes]]
name = "worker-0"
cpus = 32
memory_gib = 128
zone = "rack-1"
"#
        )
        .unwrap();

        let config = WizardConfig::load_from(file.path()).unwrap();
        assert_eq!(config.general.title, "Lab Storage");
        assert!(config.general.dryrun);
        assert!(config.cluster.has_existing_cluster);
        assert_eq!(config.cluster.storage_classes, vec!["thin", "fast"]);
        assert_eq!(config.defaults.backing_storage, BackingStorageType::LocalDevices);
        assert_eq!(config.defaults.deployment, DeploymentKind::ObjectOnly);
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.nodes.len(), 1);
        assert_eq!(config.nodes[0].cpus, 32);

        let catalog = config.provider_catalog();
        assert!(catalog.by_kind("AcmeArray").is_some());
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[defaults]\nbacking_storage = \"ceph\"\n").unwrap();
        assert!(WizardConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn initial_state_applies_defaults() {
        let mut config = WizardConfig::default();
        config.defaults.backing_storage = BackingStorageType::LocalDevices;
        config.defaults.requested_capacity_gib = 1024;

        let state = config.initial_state();
        assert_eq!(state.backing_storage.storage_type, BackingStorageType::LocalDevices);
        assert_eq!(state.capacity_and_nodes.requested_capacity_gib, 1024);
        assert_eq!(state.backing_storage.existing_storage_class, "standard");
        assert_eq!(state.step_id_reached, 1);
    }

    #[test]
    fn dryrun_substitutes_sample_nodes() {
        let mut config = WizardConfig::default();
        config.general.dryrun = true;
        let inventory = config.node_inventory();
        assert_eq!(inventory.len(), 3);

        config.general.dryrun = false;
        assert!(config.node_inventory().is_empty());
    }
}
