use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::WizardError;
use super::steps::StepId;

/// Step ID the user starts on (the backing storage selection stage).
pub const INITIAL_STEP_ID: u16 = 1;

/// Minimum number of nodes a block-and-file cluster must run on.
pub const MINIMUM_NODES: usize = 3;

/// How the storage system is backed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackingStorageType {
    /// Provision on top of an existing storage class.
    UseExisting,
    /// Claim raw devices attached to cluster nodes.
    LocalDevices,
    /// Connect an external storage system.
    External,
}

impl BackingStorageType {
    pub fn label(&self) -> &'static str {
        match self {
            BackingStorageType::UseExisting => "Use an existing storage class",
            BackingStorageType::LocalDevices => "Create a new volume set from local devices",
            BackingStorageType::External => "Connect an external storage platform",
        }
    }

    /// Cycle through the variants in selection order.
    pub fn next(&self) -> Self {
        match self {
            BackingStorageType::UseExisting => BackingStorageType::LocalDevices,
            BackingStorageType::LocalDevices => BackingStorageType::External,
            BackingStorageType::External => BackingStorageType::UseExisting,
        }
    }
}

impl fmt::Display for BackingStorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            BackingStorageType::UseExisting => "use-existing",
            BackingStorageType::LocalDevices => "local-devices",
            BackingStorageType::External => "external",
        };
        write!(f, "{token}")
    }
}

impl FromStr for BackingStorageType {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "use-existing" => Ok(BackingStorageType::UseExisting),
            "local-devices" => Ok(BackingStorageType::LocalDevices),
            "external" => Ok(BackingStorageType::External),
            other => Err(WizardError::InvalidBackingStorage(other.to_string())),
        }
    }
}

/// Whether the system serves block and file volumes or objects only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentKind {
    BlockAndFile,
    ObjectOnly,
}

impl DeploymentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DeploymentKind::BlockAndFile => "Block and file",
            DeploymentKind::ObjectOnly => "Object storage only",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DeploymentKind::BlockAndFile => DeploymentKind::ObjectOnly,
            DeploymentKind::ObjectOnly => DeploymentKind::BlockAndFile,
        }
    }
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            DeploymentKind::BlockAndFile => "block-and-file",
            DeploymentKind::ObjectOnly => "object-only",
        };
        write!(f, "{token}")
    }
}

impl FromStr for DeploymentKind {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block-and-file" => Ok(DeploymentKind::BlockAndFile),
            "object-only" => Ok(DeploymentKind::ObjectOnly),
            other => Err(WizardError::InvalidDeployment(other.to_string())),
        }
    }
}

/// Which network the storage cluster traffic rides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkType {
    /// Shared pod network; no attachment selections needed.
    #[default]
    Default,
    /// Dedicated attachments for cluster and public traffic.
    Dedicated,
}

impl NetworkType {
    pub fn label(&self) -> &'static str {
        match self {
            NetworkType::Default => "Default (shared network)",
            NetworkType::Dedicated => "Dedicated attachments",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            NetworkType::Default => NetworkType::Dedicated,
            NetworkType::Dedicated => NetworkType::Default,
        }
    }
}

/// Device class filter for a local volume set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    #[default]
    Any,
    Ssd,
    Hdd,
}

impl DeviceClass {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceClass::Any => "Any",
            DeviceClass::Ssd => "SSD / NVMe",
            DeviceClass::Hdd => "HDD",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DeviceClass::Any => DeviceClass::Ssd,
            DeviceClass::Ssd => DeviceClass::Hdd,
            DeviceClass::Hdd => DeviceClass::Any,
        }
    }
}

/// Reclaim policy for a storage class created over an external provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReclaimPolicy {
    #[default]
    Delete,
    Retain,
}

impl ReclaimPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            ReclaimPolicy::Delete => "Delete",
            ReclaimPolicy::Retain => "Retain",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ReclaimPolicy::Delete => ReclaimPolicy::Retain,
            ReclaimPolicy::Retain => ReclaimPolicy::Delete,
        }
    }
}

/// A validated `namespace/name` reference to a network attachment.
///
/// The store keeps network selections as plain strings; callers go through
/// this type before dispatching so malformed references never reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRef {
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for NetworkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for NetworkRef {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '/');
        let namespace = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        if namespace.is_empty() || name.is_empty() || name.contains('/') {
            return Err(WizardError::InvalidNetworkRef(s.to_string()));
        }
        Ok(NetworkRef {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }
}

/// A validated `host:port` endpoint for an external connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEndpoint {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for StorageEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for StorageEndpoint {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| WizardError::InvalidEndpoint(s.to_string()))?;
        if host.is_empty() {
            return Err(WizardError::InvalidEndpoint(s.to_string()));
        }
        let port: u16 = port
            .parse()
            .map_err(|_| WizardError::InvalidEndpoint(s.to_string()))?;
        Ok(StorageEndpoint {
            host: host.to_string(),
            port,
        })
    }
}

/// API token for an external connection. Wiped from memory on drop and
/// never printed.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "ApiToken(unset)")
        } else {
            write!(f, "ApiToken(redacted)")
        }
    }
}

impl PartialEq for ApiToken {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ApiToken {}

/// A candidate compute node, supplied by the host at session start.
/// Read-only to the planner and the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub cpus: u32,
    pub memory_gib: u32,
    pub zone: String,
}

/// Stage 1 selections: what backs the storage system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingStorage {
    pub storage_type: BackingStorageType,
    pub deployment: DeploymentKind,
    /// Kind of the selected external provider, when `storage_type` is
    /// `External`.
    pub external_provider: Option<String>,
    /// Storage class backing the system when `UseExisting` is selected.
    pub existing_storage_class: String,
}

impl Default for BackingStorage {
    fn default() -> Self {
        Self {
            storage_type: BackingStorageType::UseExisting,
            deployment: DeploymentKind::BlockAndFile,
            external_provider: None,
            existing_storage_class: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityAndNodes {
    pub requested_capacity_gib: u64,
    pub selected_nodes: Vec<String>,
}

impl Default for CapacityAndNodes {
    fn default() -> Self {
        Self {
            requested_capacity_gib: 512,
            selected_nodes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncryptionSelection {
    /// Encrypt data at rest across the whole cluster.
    pub cluster_wide: bool,
    /// Expose an encrypted storage class.
    pub storage_class: bool,
    /// Encrypt traffic between cluster members.
    pub in_transit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KmsSelection {
    pub enabled: bool,
    pub service_name: String,
}

/// Security and network selections. Network selections hold rendered
/// `namespace/name` strings; empty means unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityAndNetwork {
    pub encryption: EncryptionSelection,
    pub kms: KmsSelection,
    pub network_type: NetworkType,
    pub cluster_network: String,
    pub public_network: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStorageClass {
    pub name: String,
    pub reclaim_policy: ReclaimPolicy,
}

impl Default for CreateStorageClass {
    fn default() -> Self {
        Self {
            name: String::new(),
            reclaim_policy: ReclaimPolicy::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLocalVolumeSet {
    pub volume_set_name: String,
    pub device_class: DeviceClass,
}

impl Default for CreateLocalVolumeSet {
    fn default() -> Self {
        Self {
            volume_set_name: "quarry-devices".to_string(),
            device_class: DeviceClass::Any,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionDetails {
    /// Rendered `host:port`; empty means unset.
    pub endpoint: String,
    pub api_token: ApiToken,
}

/// The wizard's configuration: single source of truth, replaced wholesale
/// by the reducer on every transition, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub backing_storage: BackingStorage,
    pub capacity_and_nodes: CapacityAndNodes,
    pub security_and_network: SecurityAndNetwork,
    pub create_storage_class: CreateStorageClass,
    pub create_local_volume_set: CreateLocalVolumeSet,
    pub connection_details: ConnectionDetails,
    /// Candidate nodes, fixed for the session.
    pub nodes: Vec<NodeInfo>,
    /// Highest step ID the user has validated and advanced past.
    pub step_id_reached: u16,
}

/// By-value copy of the sub-record one step owns.
///
/// Collaborators that act on a single step's selections (the review
/// summary, the provisioning request builder) take a slice instead of
/// the whole configuration, so nothing outside a step's own record can
/// leak into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepSlice {
    BackingStorage(BackingStorage),
    CapacityAndNodes(CapacityAndNodes),
    SecurityAndNetwork(SecurityAndNetwork),
    CreateStorageClass(CreateStorageClass),
    CreateLocalVolumeSet(CreateLocalVolumeSet),
    ConnectionDetails(ConnectionDetails),
    /// The review step owns no record of its own.
    Review,
}

impl WizardState {
    pub fn new(nodes: Vec<NodeInfo>) -> Self {
        Self {
            backing_storage: BackingStorage::default(),
            capacity_and_nodes: CapacityAndNodes::default(),
            security_and_network: SecurityAndNetwork::default(),
            create_storage_class: CreateStorageClass::default(),
            create_local_volume_set: CreateLocalVolumeSet::default(),
            connection_details: ConnectionDetails::default(),
            nodes,
            step_id_reached: INITIAL_STEP_ID,
        }
    }

    /// Hand out the sub-record `step` owns, by value.
    ///
    /// `Security` and `SecurityAndNetwork` are two views over the same
    /// record; the object-only flavor never shows the network rows.
    pub fn slice_for(&self, step: StepId) -> StepSlice {
        match step {
            StepId::BackingStorage => StepSlice::BackingStorage(self.backing_storage.clone()),
            StepId::CapacityAndNodes => {
                StepSlice::CapacityAndNodes(self.capacity_and_nodes.clone())
            }
            StepId::Security | StepId::SecurityAndNetwork => {
                StepSlice::SecurityAndNetwork(self.security_and_network.clone())
            }
            StepId::CreateStorageClass => {
                StepSlice::CreateStorageClass(self.create_storage_class.clone())
            }
            StepId::CreateLocalVolumeSet => {
                StepSlice::CreateLocalVolumeSet(self.create_local_volume_set.clone())
            }
            StepId::ConnectionDetails => {
                StepSlice::ConnectionDetails(self.connection_details.clone())
            }
            StepId::ReviewAndCreate => StepSlice::Review,
        }
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_ref_parses_namespace_and_name() {
        let nref: NetworkRef = "quarry-ns/cluster-net".parse().unwrap();
        assert_eq!(nref.namespace, "quarry-ns");
        assert_eq!(nref.name, "cluster-net");
        assert_eq!(nref.to_string(), "quarry-ns/cluster-net");
    }

    #[test]
    fn network_ref_rejects_malformed_input() {
        assert!("".parse::<NetworkRef>().is_err());
        assert!("no-slash".parse::<NetworkRef>().is_err());
        assert!("/name-only".parse::<NetworkRef>().is_err());
        assert!("ns-only/".parse::<NetworkRef>().is_err());
        assert!("ns/a/b".parse::<NetworkRef>().is_err());
    }

    #[test]
    fn endpoint_parses_host_and_port() {
        let ep: StorageEndpoint = "quarry.example.com:9283".parse().unwrap();
        assert_eq!(ep.host, "quarry.example.com");
        assert_eq!(ep.port, 9283);
    }

    #[test]
    fn endpoint_rejects_malformed_input() {
        assert!("".parse::<StorageEndpoint>().is_err());
        assert!("no-port".parse::<StorageEndpoint>().is_err());
        assert!(":9283".parse::<StorageEndpoint>().is_err());
        assert!("host:not-a-port".parse::<StorageEndpoint>().is_err());
        assert!("host:99999".parse::<StorageEndpoint>().is_err());
    }

    #[test]
    fn api_token_debug_is_redacted() {
        let token = ApiToken::new("s3cr3t");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert_eq!(rendered, "ApiToken(redacted)");
        assert_eq!(format!("{:?}", ApiToken::default()), "ApiToken(unset)");
    }

    #[test]
    fn backing_storage_type_round_trips_through_str() {
        for ty in [
            BackingStorageType::UseExisting,
            BackingStorageType::LocalDevices,
            BackingStorageType::External,
        ] {
            assert_eq!(ty.to_string().parse::<BackingStorageType>().unwrap(), ty);
        }
        assert!("ceph".parse::<BackingStorageType>().is_err());
    }

    #[test]
    fn deployment_kind_round_trips_through_str() {
        for kind in [DeploymentKind::BlockAndFile, DeploymentKind::ObjectOnly] {
            assert_eq!(kind.to_string().parse::<DeploymentKind>().unwrap(), kind);
        }
        assert!("full".parse::<DeploymentKind>().is_err());
    }

    #[test]
    fn slices_carry_only_the_owning_record() {
        let mut state = WizardState::default();
        state.capacity_and_nodes.requested_capacity_gib = 2048;
        state.security_and_network.encryption.cluster_wide = true;

        match state.slice_for(StepId::CapacityAndNodes) {
            StepSlice::CapacityAndNodes(slice) => {
                assert_eq!(slice.requested_capacity_gib, 2048);
            }
            other => panic!("wrong slice: {other:?}"),
        }
        // Both security flavors resolve to the same record.
        assert_eq!(
            state.slice_for(StepId::Security),
            state.slice_for(StepId::SecurityAndNetwork)
        );
        assert_eq!(state.slice_for(StepId::ReviewAndCreate), StepSlice::Review);
    }
}
