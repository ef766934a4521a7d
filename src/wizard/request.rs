use serde::Serialize;

use super::WizardApp;
use super::state::{
    BackingStorageType, DeploymentKind, DeviceClass, NetworkType, ReclaimPolicy,
    SecurityAndNetwork, StepSlice,
};
use super::steps::StepId;

/// The artifact the wizard produces: a description of the storage system
/// to provision, written as TOML when the user confirms the review step.
///
/// Sections mirror the plan. A section is present exactly when the step
/// that configures it was part of the traversed plan, so a request never
/// carries selections from branches the user backed out of. The API
/// token is never written; only the fact that one was supplied.
#[derive(Debug, Serialize)]
pub struct ProvisionRequest {
    platform: String,
    backing_storage: BackingStorageType,
    deployment: DeploymentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    existing_storage_class: Option<String>,
    steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    capacity: Option<CapacitySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    volume_set: Option<VolumeSetSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_class: Option<StorageClassSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection: Option<ConnectionSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    security: Option<SecuritySection>,
}

#[derive(Debug, Serialize)]
struct CapacitySection {
    requested_capacity_gib: u64,
    nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct VolumeSetSection {
    name: String,
    device_class: DeviceClass,
}

#[derive(Debug, Serialize)]
struct StorageClassSection {
    name: String,
    reclaim_policy: ReclaimPolicy,
}

#[derive(Debug, Serialize)]
struct ConnectionSection {
    endpoint: String,
    api_token_provided: bool,
}

#[derive(Debug, Serialize)]
struct SecuritySection {
    cluster_wide_encryption: bool,
    storage_class_encryption: bool,
    in_transit_encryption: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kms_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<NetworkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_network: Option<String>,
}

impl ProvisionRequest {
    pub fn from_app(app: &WizardApp) -> Self {
        let state = app.state();
        let backing = &state.backing_storage;

        let mut steps = vec![StepId::BackingStorage.name().to_string()];
        let mut capacity = None;
        let mut volume_set = None;
        let mut storage_class = None;
        let mut connection = None;
        let mut security = None;

        // One pass over the plan; each planned step contributes its own
        // slice and nothing else. Steps the current branch does not plan
        // leave their section absent no matter what the state holds.
        for descriptor in app.plan() {
            steps.push(descriptor.name().to_string());
            match state.slice_for(descriptor.step) {
                StepSlice::CapacityAndNodes(slice) => {
                    capacity = Some(CapacitySection {
                        requested_capacity_gib: slice.requested_capacity_gib,
                        nodes: slice.selected_nodes,
                    });
                }
                StepSlice::CreateLocalVolumeSet(slice) => {
                    volume_set = Some(VolumeSetSection {
                        name: slice.volume_set_name,
                        device_class: slice.device_class,
                    });
                }
                StepSlice::CreateStorageClass(slice) => {
                    storage_class = Some(StorageClassSection {
                        name: slice.name,
                        reclaim_policy: slice.reclaim_policy,
                    });
                }
                StepSlice::ConnectionDetails(slice) => {
                    connection = Some(ConnectionSection {
                        api_token_provided: !slice.api_token.is_empty(),
                        endpoint: slice.endpoint,
                    });
                }
                StepSlice::SecurityAndNetwork(slice) => {
                    security = Some(security_section(descriptor.step, slice));
                }
                StepSlice::BackingStorage(_) | StepSlice::Review => {}
            }
        }

        Self {
            platform: app.config.cluster.platform.clone(),
            backing_storage: backing.storage_type,
            deployment: backing.deployment,
            external_provider: backing.external_provider.clone(),
            existing_storage_class: match backing.storage_type {
                BackingStorageType::UseExisting => {
                    Some(backing.existing_storage_class.clone())
                }
                _ => None,
            },
            steps,
            capacity,
            volume_set,
            storage_class,
            connection,
            security,
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Only the combined flavor exposes network selections; the object-only
/// security step contributes encryption and KMS alone.
fn security_section(flavor: StepId, slice: SecurityAndNetwork) -> SecuritySection {
    let networked = flavor == StepId::SecurityAndNetwork;
    let dedicated = networked && slice.network_type == NetworkType::Dedicated;
    SecuritySection {
        cluster_wide_encryption: slice.encryption.cluster_wide,
        storage_class_encryption: slice.encryption.storage_class,
        in_transit_encryption: slice.encryption.in_transit,
        kms_service: slice.kms.enabled.then(|| slice.kms.service_name.clone()),
        network: networked.then_some(slice.network_type),
        cluster_network: (dedicated && !slice.cluster_network.is_empty())
            .then(|| slice.cluster_network.clone()),
        public_network: (dedicated && !slice.public_network.is_empty())
            .then(|| slice.public_network.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::state::ApiToken;
    use crate::wizard::{QUARRY_CLUSTER_KIND, WizardAction, WizardApp, WizardConfig};
    use std::path::PathBuf;

    fn app() -> WizardApp {
        let mut config = WizardConfig::default();
        config.general.dryrun = true;
        WizardApp::new(config, PathBuf::from("/tmp/quarry-request.toml"))
    }

    #[test]
    fn sections_follow_the_plan() {
        let mut app = app();

        // Default branch: existing class, block and file
        let request = ProvisionRequest::from_app(&app);
        assert!(request.capacity.is_some());
        assert!(request.security.is_some());
        assert!(request.volume_set.is_none());
        assert!(request.storage_class.is_none());
        assert!(request.connection.is_none());
        assert_eq!(
            request.steps,
            vec![
                "Backing storage",
                "Capacity and nodes",
                "Security and network",
                "Review and create",
            ]
        );

        // Cluster-kind external provider: connection only
        app.dispatch(WizardAction::SetBackingStorageType(
            BackingStorageType::External,
        ));
        app.dispatch(WizardAction::SetExternalProvider(Some(
            QUARRY_CLUSTER_KIND.to_string(),
        )));
        let request = ProvisionRequest::from_app(&app);
        assert!(request.capacity.is_none());
        assert!(request.security.is_none());
        assert!(request.connection.is_some());
        assert_eq!(request.external_provider.as_deref(), Some(QUARRY_CLUSTER_KIND));
    }

    #[test]
    fn token_never_reaches_the_request_file() {
        let mut app = app();
        app.dispatch(WizardAction::SetBackingStorageType(
            BackingStorageType::External,
        ));
        app.dispatch(WizardAction::SetExternalProvider(Some(
            QUARRY_CLUSTER_KIND.to_string(),
        )));
        app.dispatch(WizardAction::SetEndpoint("quarry.lab:9283".to_string()));
        app.dispatch(WizardAction::SetApiToken(ApiToken::new("s3cr3t-t0ken")));

        let rendered = ProvisionRequest::from_app(&app).to_toml().unwrap();
        assert!(!rendered.contains("s3cr3t-t0ken"));
        assert!(rendered.contains("api_token_provided = true"));
        assert!(rendered.contains("quarry.lab:9283"));
    }

    #[test]
    fn abandoned_branch_leaves_no_trace() {
        let mut app = app();

        // Visit the local devices branch, then back out of it
        app.dispatch(WizardAction::SetBackingStorageType(
            BackingStorageType::LocalDevices,
        ));
        app.dispatch(WizardAction::SetVolumeSetName("fast-set".to_string()));
        app.dispatch(WizardAction::SetBackingStorageType(
            BackingStorageType::UseExisting,
        ));

        let rendered = ProvisionRequest::from_app(&app).to_toml().unwrap();
        assert!(!rendered.contains("fast-set"));
        assert!(rendered.contains("backing_storage = \"use-existing\""));
    }

    #[test]
    fn dedicated_networks_appear_when_selected() {
        let mut app = app();
        app.dispatch(WizardAction::SetNetworkType(NetworkType::Dedicated));
        app.dispatch(WizardAction::SetClusterNetwork("quarry-ns/cluster".to_string()));
        app.dispatch(WizardAction::SetPublicNetwork("quarry-ns/public".to_string()));

        let rendered = ProvisionRequest::from_app(&app).to_toml().unwrap();
        assert!(rendered.contains("network = \"dedicated\""));
        assert!(rendered.contains("quarry-ns/cluster"));
        assert!(rendered.contains("quarry-ns/public"));
    }

    #[test]
    fn object_only_security_omits_network() {
        let mut app = app();
        // Leftover from a branch that was backed out of
        app.dispatch(WizardAction::SetNetworkType(NetworkType::Dedicated));
        app.dispatch(WizardAction::SetDeployment(DeploymentKind::ObjectOnly));

        let rendered = ProvisionRequest::from_app(&app).to_toml().unwrap();
        assert!(rendered.contains("[security]"));
        assert!(!rendered.contains("network"));
    }
}
