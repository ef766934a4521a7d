use super::state::{
    ApiToken, BackingStorageType, DeploymentKind, DeviceClass, EncryptionSelection, KmsSelection,
    NetworkType, ReclaimPolicy, WizardState,
};

/// Every transition the wizard can apply to its configuration.
///
/// Each action writes exactly one slice of [`WizardState`]; the only
/// cross-field write is documented on [`WizardAction::SetNetworkType`].
/// The enum is closed on purpose: an unknown action kind is a compile
/// error, not a dispatch-time surprise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    // backing storage
    SetBackingStorageType(BackingStorageType),
    SetDeployment(DeploymentKind),
    /// Select an external provider by kind, or clear the selection.
    SetExternalProvider(Option<String>),
    SetExistingStorageClass(String),

    // capacity and nodes
    SetRequestedCapacity(u64),
    /// Add the node to the selection if absent, remove it if present.
    ToggleNodeSelection(String),

    // security and network
    /// Setting the type to `Default` also clears both network selections
    /// in the same transition: a selection is never present when the
    /// network type does not call for one.
    SetNetworkType(NetworkType),
    SetClusterNetwork(String),
    SetPublicNetwork(String),
    SetEncryption(EncryptionSelection),
    /// Flip in-transit encryption. Toggle semantics live here so callers
    /// never read and negate the stored flag themselves.
    ToggleInTransitEncryption,
    SetKms(KmsSelection),

    // storage class creation
    SetStorageClassName(String),
    SetReclaimPolicy(ReclaimPolicy),

    // local volume set
    SetVolumeSetName(String),
    SetDeviceClass(DeviceClass),

    // connection details
    SetEndpoint(String),
    SetApiToken(ApiToken),

    // navigation watermark
    SetStepIdReached(u16),
}

/// Fold one action into the configuration, producing a new value.
///
/// Pure and deterministic: the same action applied to the same state
/// always yields the same result, and the input is never mutated.
pub fn reduce(state: &WizardState, action: WizardAction) -> WizardState {
    let mut next = state.clone();
    match action {
        WizardAction::SetBackingStorageType(ty) => {
            next.backing_storage.storage_type = ty;
        }
        WizardAction::SetDeployment(kind) => {
            next.backing_storage.deployment = kind;
        }
        WizardAction::SetExternalProvider(kind) => {
            next.backing_storage.external_provider = kind;
        }
        WizardAction::SetExistingStorageClass(name) => {
            next.backing_storage.existing_storage_class = name;
        }
        WizardAction::SetRequestedCapacity(gib) => {
            next.capacity_and_nodes.requested_capacity_gib = gib;
        }
        WizardAction::ToggleNodeSelection(name) => {
            let selected = &mut next.capacity_and_nodes.selected_nodes;
            match selected.iter().position(|n| *n == name) {
                Some(idx) => {
                    selected.remove(idx);
                }
                None => selected.push(name),
            }
        }
        WizardAction::SetNetworkType(ty) => {
            next.security_and_network.network_type = ty;
            if ty == NetworkType::Default {
                next.security_and_network.cluster_network.clear();
                next.security_and_network.public_network.clear();
            }
        }
        WizardAction::SetClusterNetwork(network) => {
            next.security_and_network.cluster_network = network;
        }
        WizardAction::SetPublicNetwork(network) => {
            next.security_and_network.public_network = network;
        }
        WizardAction::SetEncryption(selection) => {
            next.security_and_network.encryption = selection;
        }
        WizardAction::ToggleInTransitEncryption => {
            let encryption = &mut next.security_and_network.encryption;
            encryption.in_transit = !encryption.in_transit;
        }
        WizardAction::SetKms(kms) => {
            next.security_and_network.kms = kms;
        }
        WizardAction::SetStorageClassName(name) => {
            next.create_storage_class.name = name;
        }
        WizardAction::SetReclaimPolicy(policy) => {
            next.create_storage_class.reclaim_policy = policy;
        }
        WizardAction::SetVolumeSetName(name) => {
            next.create_local_volume_set.volume_set_name = name;
        }
        WizardAction::SetDeviceClass(class) => {
            next.create_local_volume_set.device_class = class;
        }
        WizardAction::SetEndpoint(endpoint) => {
            next.connection_details.endpoint = endpoint;
        }
        WizardAction::SetApiToken(token) => {
            next.connection_details.api_token = token;
        }
        WizardAction::SetStepIdReached(id) => {
            next.step_id_reached = id;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_networks() -> WizardState {
        let state = WizardState::default();
        let state = reduce(&state, WizardAction::SetNetworkType(NetworkType::Dedicated));
        let state = reduce(
            &state,
            WizardAction::SetClusterNetwork("quarry-ns/cluster-net".to_string()),
        );
        reduce(
            &state,
            WizardAction::SetPublicNetwork("quarry-ns/public-net".to_string()),
        )
    }

    #[test]
    fn default_network_type_clears_both_selections() {
        let state = state_with_networks();
        assert_eq!(state.security_and_network.cluster_network, "quarry-ns/cluster-net");
        assert_eq!(state.security_and_network.public_network, "quarry-ns/public-net");

        let state = reduce(&state, WizardAction::SetNetworkType(NetworkType::Default));
        assert_eq!(state.security_and_network.network_type, NetworkType::Default);
        assert_eq!(state.security_and_network.cluster_network, "");
        assert_eq!(state.security_and_network.public_network, "");
    }

    #[test]
    fn dedicated_network_type_keeps_selections() {
        let state = state_with_networks();
        let state = reduce(&state, WizardAction::SetNetworkType(NetworkType::Dedicated));
        assert_eq!(state.security_and_network.cluster_network, "quarry-ns/cluster-net");
        assert_eq!(state.security_and_network.public_network, "quarry-ns/public-net");
    }

    #[test]
    fn toggle_in_transit_encryption_flips_only_that_flag() {
        let state = WizardState::default();
        assert!(!state.security_and_network.encryption.in_transit);

        let state = reduce(&state, WizardAction::ToggleInTransitEncryption);
        assert!(state.security_and_network.encryption.in_transit);
        assert!(!state.security_and_network.encryption.cluster_wide);
        assert!(!state.security_and_network.encryption.storage_class);

        let state = reduce(&state, WizardAction::ToggleInTransitEncryption);
        assert!(!state.security_and_network.encryption.in_transit);
    }

    #[test]
    fn toggle_node_selection_adds_then_removes() {
        let state = WizardState::default();
        let state = reduce(
            &state,
            WizardAction::ToggleNodeSelection("node-0".to_string()),
        );
        let state = reduce(
            &state,
            WizardAction::ToggleNodeSelection("node-1".to_string()),
        );
        assert_eq!(state.capacity_and_nodes.selected_nodes, vec!["node-0", "node-1"]);

        let state = reduce(
            &state,
            WizardAction::ToggleNodeSelection("node-0".to_string()),
        );
        assert_eq!(state.capacity_and_nodes.selected_nodes, vec!["node-1"]);
    }

    #[test]
    fn reduce_leaves_input_untouched() {
        let state = state_with_networks();
        let snapshot = state.clone();
        let _ = reduce(&state, WizardAction::SetNetworkType(NetworkType::Default));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn unrelated_actions_do_not_cross_slices() {
        let state = state_with_networks();
        let next = reduce(&state, WizardAction::SetRequestedCapacity(2048));

        assert_eq!(next.capacity_and_nodes.requested_capacity_gib, 2048);
        assert_eq!(next.security_and_network, state.security_and_network);
        assert_eq!(next.backing_storage, state.backing_storage);
        assert_eq!(next.create_storage_class, state.create_storage_class);
        assert_eq!(next.create_local_volume_set, state.create_local_volume_set);
        assert_eq!(next.connection_details, state.connection_details);
        assert_eq!(next.step_id_reached, state.step_id_reached);
    }

    #[test]
    fn same_action_sequence_yields_same_state() {
        let actions = || {
            vec![
                WizardAction::SetBackingStorageType(BackingStorageType::LocalDevices),
                WizardAction::SetDeployment(DeploymentKind::ObjectOnly),
                WizardAction::SetVolumeSetName("fast-set".to_string()),
                WizardAction::ToggleInTransitEncryption,
                WizardAction::SetStepIdReached(3),
            ]
        };

        let run = |actions: Vec<WizardAction>| {
            actions
                .into_iter()
                .fold(WizardState::default(), |state, action| reduce(&state, action))
        };

        assert_eq!(run(actions()), run(actions()));
    }

    #[test]
    fn set_step_id_reached_updates_watermark() {
        let state = WizardState::default();
        assert_eq!(state.step_id_reached, 1);
        let state = reduce(&state, WizardAction::SetStepIdReached(4));
        assert_eq!(state.step_id_reached, 4);
    }
}
