mod plan;

pub use plan::plan_steps;

/// First step ID the planner assigns. ID 1 is the backing storage
/// selection step, owned by the host shell and never part of a plan.
pub const FIRST_PLANNED_ID: u16 = 2;

/// Unique identifier for each wizard step.
///
/// Shared registry: a step keeps the same name and rendering no matter
/// which branch placed it in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    BackingStorage,
    CreateLocalVolumeSet,
    CreateStorageClass,
    ConnectionDetails,
    CapacityAndNodes,
    SecurityAndNetwork,
    Security,
    ReviewAndCreate,
}

impl StepId {
    pub fn name(&self) -> &'static str {
        match self {
            StepId::BackingStorage => "Backing storage",
            StepId::CreateLocalVolumeSet => "Create local volume set",
            StepId::CreateStorageClass => "Create storage class",
            StepId::ConnectionDetails => "Connection details",
            StepId::CapacityAndNodes => "Capacity and nodes",
            StepId::SecurityAndNetwork => "Security and network",
            StepId::Security => "Security",
            StepId::ReviewAndCreate => "Review and create",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            StepId::BackingStorage => "Backing",
            StepId::CreateLocalVolumeSet => "Devices",
            StepId::CreateStorageClass => "Class",
            StepId::ConnectionDetails => "Connect",
            StepId::CapacityAndNodes => "Capacity",
            StepId::SecurityAndNetwork => "Security+Net",
            StepId::Security => "Security",
            StepId::ReviewAndCreate => "Review",
        }
    }
}

/// One visible step of the wizard, as computed by the planner.
///
/// Descriptors are recomputed wholesale on every configuration change
/// and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    /// Stable within one plan: strictly increasing from
    /// [`FIRST_PLANNED_ID`] with no gaps.
    pub id: u16,
    /// Rendering binding; the shell matches on this to draw the step.
    pub step: StepId,
    /// Whether direct navigation to this step is allowed.
    pub can_jump_to: bool,
}

impl StepDescriptor {
    pub fn name(&self) -> &'static str {
        self.step.name()
    }
}
