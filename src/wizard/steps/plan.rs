use super::{FIRST_PLANNED_ID, StepDescriptor, StepId};
use crate::wizard::providers;
use crate::wizard::state::{BackingStorageType, DeploymentKind, WizardState};

/// Compute the ordered step sequence for the current configuration.
///
/// Pure function of the configuration, its watermark, and the
/// existing-cluster flag. Every input resolves to a plan; a combination
/// with no provisioning path (external backing with no provider picked)
/// resolves to the empty plan, which the host must treat as "cannot
/// proceed".
///
/// Steps are numbered contiguously from [`FIRST_PLANNED_ID`] and the
/// last step of every non-empty plan is [`StepId::ReviewAndCreate`].
///
/// Precondition: after an edit that changes the step sequence, the host
/// clamps `step_id_reached` to at most the new last ID minus one before
/// trusting jump gating again. The planner itself never adjusts the
/// watermark.
pub fn plan_steps(state: &WizardState, has_existing_cluster: bool) -> Vec<StepDescriptor> {
    let backing = &state.backing_storage;

    let steps: Vec<StepId> = match backing.storage_type {
        BackingStorageType::UseExisting => match backing.deployment {
            DeploymentKind::ObjectOnly => vec![StepId::Security, StepId::ReviewAndCreate],
            DeploymentKind::BlockAndFile => vec![
                StepId::CapacityAndNodes,
                StepId::SecurityAndNetwork,
                StepId::ReviewAndCreate,
            ],
        },
        BackingStorageType::LocalDevices => match backing.deployment {
            DeploymentKind::ObjectOnly => vec![
                StepId::CreateLocalVolumeSet,
                StepId::Security,
                StepId::ReviewAndCreate,
            ],
            DeploymentKind::BlockAndFile => vec![
                StepId::CreateLocalVolumeSet,
                StepId::CapacityAndNodes,
                StepId::SecurityAndNetwork,
                StepId::ReviewAndCreate,
            ],
        },
        BackingStorageType::External => match backing.external_provider.as_deref() {
            None => Vec::new(),
            // A provider of the in-house cluster kind is attached over a
            // dedicated connection step, regardless of deployment kind.
            Some(kind) if providers::is_cluster_kind(kind) => {
                vec![StepId::ConnectionDetails, StepId::ReviewAndCreate]
            }
            Some(_) if !has_existing_cluster => match backing.deployment {
                DeploymentKind::ObjectOnly => vec![
                    StepId::CreateStorageClass,
                    StepId::Security,
                    StepId::ReviewAndCreate,
                ],
                DeploymentKind::BlockAndFile => vec![
                    StepId::CreateStorageClass,
                    StepId::CapacityAndNodes,
                    StepId::SecurityAndNetwork,
                    StepId::ReviewAndCreate,
                ],
            },
            // A cluster already exists: only the storage class is new.
            Some(_) => vec![StepId::CreateStorageClass, StepId::ReviewAndCreate],
        },
    };

    number(steps, state.step_id_reached)
}

fn number(steps: Vec<StepId>, step_id_reached: u16) -> Vec<StepDescriptor> {
    steps
        .into_iter()
        .enumerate()
        .map(|(offset, step)| {
            let id = FIRST_PLANNED_ID + offset as u16;
            StepDescriptor {
                id,
                step,
                can_jump_to: step_id_reached >= id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::providers::QUARRY_CLUSTER_KIND;
    use crate::wizard::reducer::{WizardAction, reduce};

    fn state(
        storage_type: BackingStorageType,
        deployment: DeploymentKind,
        provider: Option<&str>,
    ) -> WizardState {
        let mut state = WizardState::default();
        state.backing_storage.storage_type = storage_type;
        state.backing_storage.deployment = deployment;
        state.backing_storage.external_provider = provider.map(str::to_string);
        state
    }

    fn ids(plan: &[StepDescriptor]) -> Vec<u16> {
        plan.iter().map(|d| d.id).collect()
    }

    fn steps(plan: &[StepDescriptor]) -> Vec<StepId> {
        plan.iter().map(|d| d.step).collect()
    }

    #[test]
    fn existing_class_block_and_file_plan() {
        let state = state(
            BackingStorageType::UseExisting,
            DeploymentKind::BlockAndFile,
            None,
        );
        let plan = plan_steps(&state, false);
        assert_eq!(
            steps(&plan),
            vec![
                StepId::CapacityAndNodes,
                StepId::SecurityAndNetwork,
                StepId::ReviewAndCreate,
            ]
        );
        assert_eq!(ids(&plan), vec![2, 3, 4]);
    }

    #[test]
    fn existing_class_object_only_plan() {
        let state = state(
            BackingStorageType::UseExisting,
            DeploymentKind::ObjectOnly,
            None,
        );
        let plan = plan_steps(&state, false);
        assert_eq!(steps(&plan), vec![StepId::Security, StepId::ReviewAndCreate]);
        assert_eq!(ids(&plan), vec![2, 3]);
    }

    #[test]
    fn local_devices_object_only_plan() {
        let state = state(
            BackingStorageType::LocalDevices,
            DeploymentKind::ObjectOnly,
            None,
        );
        let plan = plan_steps(&state, false);
        assert_eq!(
            steps(&plan),
            vec![
                StepId::CreateLocalVolumeSet,
                StepId::Security,
                StepId::ReviewAndCreate,
            ]
        );
        assert_eq!(ids(&plan), vec![2, 3, 4]);
    }

    #[test]
    fn local_devices_block_and_file_plan() {
        let state = state(
            BackingStorageType::LocalDevices,
            DeploymentKind::BlockAndFile,
            None,
        );
        let plan = plan_steps(&state, false);
        assert_eq!(
            steps(&plan),
            vec![
                StepId::CreateLocalVolumeSet,
                StepId::CapacityAndNodes,
                StepId::SecurityAndNetwork,
                StepId::ReviewAndCreate,
            ]
        );
        assert_eq!(ids(&plan), vec![2, 3, 4, 5]);
    }

    #[test]
    fn cluster_kind_provider_plan_ignores_deployment() {
        for deployment in [DeploymentKind::BlockAndFile, DeploymentKind::ObjectOnly] {
            let state = state(
                BackingStorageType::External,
                deployment,
                Some(QUARRY_CLUSTER_KIND),
            );
            for has_cluster in [false, true] {
                let plan = plan_steps(&state, has_cluster);
                assert_eq!(
                    steps(&plan),
                    vec![StepId::ConnectionDetails, StepId::ReviewAndCreate]
                );
                assert_eq!(ids(&plan), vec![2, 3]);
            }
        }
    }

    #[test]
    fn other_provider_without_existing_cluster_plan() {
        let state = state(
            BackingStorageType::External,
            DeploymentKind::ObjectOnly,
            Some("FlashVaultSystem"),
        );
        let plan = plan_steps(&state, false);
        assert_eq!(
            steps(&plan),
            vec![
                StepId::CreateStorageClass,
                StepId::Security,
                StepId::ReviewAndCreate,
            ]
        );

        let state = state_block_and_file_other_provider();
        let plan = plan_steps(&state, false);
        assert_eq!(
            steps(&plan),
            vec![
                StepId::CreateStorageClass,
                StepId::CapacityAndNodes,
                StepId::SecurityAndNetwork,
                StepId::ReviewAndCreate,
            ]
        );
        assert_eq!(ids(&plan), vec![2, 3, 4, 5]);
    }

    fn state_block_and_file_other_provider() -> WizardState {
        state(
            BackingStorageType::External,
            DeploymentKind::BlockAndFile,
            Some("FlashVaultSystem"),
        )
    }

    #[test]
    fn other_provider_with_existing_cluster_plan_is_short() {
        for deployment in [DeploymentKind::BlockAndFile, DeploymentKind::ObjectOnly] {
            let state = state(
                BackingStorageType::External,
                deployment,
                Some("FlashVaultSystem"),
            );
            let plan = plan_steps(&state, true);
            assert_eq!(
                steps(&plan),
                vec![StepId::CreateStorageClass, StepId::ReviewAndCreate]
            );
            assert_eq!(ids(&plan), vec![2, 3]);
        }
    }

    #[test]
    fn external_without_provider_yields_empty_plan() {
        let state = state(BackingStorageType::External, DeploymentKind::BlockAndFile, None);
        assert!(plan_steps(&state, false).is_empty());
        assert!(plan_steps(&state, true).is_empty());
    }

    #[test]
    fn every_input_combination_resolves_to_a_plan() {
        let types = [
            BackingStorageType::UseExisting,
            BackingStorageType::LocalDevices,
            BackingStorageType::External,
        ];
        let deployments = [DeploymentKind::BlockAndFile, DeploymentKind::ObjectOnly];
        let provider_kinds = [None, Some(QUARRY_CLUSTER_KIND), Some("FlashVaultSystem")];

        for ty in types {
            for deployment in deployments {
                for provider in provider_kinds {
                    for has_cluster in [false, true] {
                        let state = state(ty, deployment, provider);
                        let plan = plan_steps(&state, has_cluster);

                        let unreachable = ty == BackingStorageType::External && provider.is_none();
                        assert_eq!(plan.is_empty(), unreachable);

                        // IDs run contiguously from 2 and the plan ends
                        // on the review step.
                        for (offset, descriptor) in plan.iter().enumerate() {
                            assert_eq!(descriptor.id, FIRST_PLANNED_ID + offset as u16);
                        }
                        if let Some(last) = plan.last() {
                            assert_eq!(last.step, StepId::ReviewAndCreate);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn can_jump_to_tracks_watermark() {
        let mut state = state(
            BackingStorageType::LocalDevices,
            DeploymentKind::BlockAndFile,
            None,
        );

        state.step_id_reached = 1;
        let plan = plan_steps(&state, false);
        assert!(plan.iter().all(|d| !d.can_jump_to));

        state.step_id_reached = 3;
        let plan = plan_steps(&state, false);
        let jumpable: Vec<u16> = plan.iter().filter(|d| d.can_jump_to).map(|d| d.id).collect();
        assert_eq!(jumpable, vec![2, 3]);
    }

    #[test]
    fn raising_watermark_never_revokes_a_jump() {
        let mut state = state(
            BackingStorageType::LocalDevices,
            DeploymentKind::BlockAndFile,
            None,
        );

        for watermark in 1..=6 {
            state.step_id_reached = watermark;
            let before = plan_steps(&state, false);
            state.step_id_reached = watermark + 1;
            let after = plan_steps(&state, false);

            for (b, a) in before.iter().zip(after.iter()) {
                if b.can_jump_to {
                    assert!(a.can_jump_to);
                }
            }
        }
    }

    #[test]
    fn unrelated_edit_leaves_plan_identical() {
        let state = state(
            BackingStorageType::UseExisting,
            DeploymentKind::BlockAndFile,
            None,
        );
        let before = plan_steps(&state, false);

        let state = reduce(&state, WizardAction::SetRequestedCapacity(4096));
        let state = reduce(&state, WizardAction::ToggleInTransitEncryption);
        let after = plan_steps(&state, false);

        assert_eq!(before, after);
    }
}
