pub mod config;
pub mod error;
mod input;
pub mod providers;
pub mod reducer;
mod request;
pub mod state;
pub mod steps;
pub mod ui;
mod widgets;

pub use config::WizardConfig;
pub use input::EditBuffer;
pub use providers::{ProviderCatalog, QUARRY_CLUSTER_KIND};
pub use reducer::{WizardAction, reduce};
pub use request::ProvisionRequest;
pub use state::WizardState;
pub use steps::{FIRST_PLANNED_ID, StepDescriptor, StepId, plan_steps};
pub use widgets::StatusBarState;

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::ui::Theme;
use state::{
    INITIAL_STEP_ID, KmsSelection, MINIMUM_NODES, NetworkRef, NetworkType, StorageEndpoint,
};

/// Key handling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating steps and fields
    Normal,
    /// Editing a text field
    Insert,
}

impl InputMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            InputMode::Normal => "NORMAL",
            InputMode::Insert => "INSERT",
        }
    }
}

/// Which panel is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Welcome screen (before the wizard starts)
    Welcome,
    /// Sidebar with the step list
    Sidebar,
    /// Step pane
    Content,
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Confirm dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Create the provisioning request from the review step
    Create,
    /// Quit without creating anything
    Quit,
}

/// How a step pane row is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Space/Enter cycles through fixed choices
    Cycle,
    /// Space/Enter flips a flag
    Toggle,
    /// `i`/Enter opens the row for text entry
    Text,
    /// Text entry with masked display
    Secret,
}

/// The configuration field a row maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEdit {
    StorageType,
    Deployment,
    Provider,
    ExistingClass,
    Capacity,
    Node(usize),
    ClusterWideEncryption,
    StorageClassEncryption,
    InTransitEncryption,
    KmsToggle,
    KmsServiceName,
    NetworkType,
    ClusterNetwork,
    PublicNetwork,
    StorageClassName,
    ReclaimPolicy,
    VolumeSetName,
    DeviceClass,
    Endpoint,
    ApiToken,
}

/// One editable row of a step pane. Rows double as the render model and
/// the key-dispatch table: the UI draws them, the shell routes Space and
/// `i` through them.
pub struct StageRow {
    pub label: String,
    pub value: String,
    pub kind: RowKind,
    pub edit: RowEdit,
}

impl StageRow {
    fn new(kind: RowKind, label: impl Into<String>, value: impl Into<String>, edit: RowEdit) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            kind,
            edit,
        }
    }
}

fn flag(on: bool) -> &'static str {
    if on { "[x]" } else { "[ ]" }
}

/// Main wizard application state.
///
/// Owns the configuration store and the current plan. All configuration
/// writes go through [`WizardApp::dispatch`]; every dispatch re-plans,
/// and a dispatch that changes the step sequence clamps the navigation
/// watermark to the new plan.
pub struct WizardApp {
    pub config: WizardConfig,
    pub theme: Theme,
    pub catalog: ProviderCatalog,

    // Configuration store and planner output
    state: WizardState,
    plan: Vec<StepDescriptor>,
    has_existing_cluster: bool,

    // Navigation
    pub mode: InputMode,
    pub panel_focus: PanelFocus,
    pub selected_entry: usize,
    pub field_cursor: usize,

    // Text editing
    pub edit_buffer: EditBuffer,
    editing: Option<RowEdit>,

    // UI state
    pub message: Option<Message>,
    pub confirm_action: Option<ConfirmAction>,
    pub show_help: bool,
    pub should_exit: bool,
    pub started: bool,
    pub complete: bool,

    // Status bar state - updated after every event
    pub status_bar: StatusBarState,

    output_path: PathBuf,
}

impl WizardApp {
    pub fn new(config: WizardConfig, output_path: PathBuf) -> Self {
        let catalog = config.provider_catalog();
        let state = config.initial_state();
        let has_existing_cluster = config.cluster.has_existing_cluster;
        let plan = plan_steps(&state, has_existing_cluster);

        Self {
            config,
            theme: Theme::default(),
            catalog,
            state,
            plan,
            has_existing_cluster,
            mode: InputMode::Normal,
            panel_focus: PanelFocus::Welcome,
            selected_entry: 0,
            field_cursor: 0,
            edit_buffer: EditBuffer::new(),
            editing: None,
            message: None,
            confirm_action: None,
            show_help: false,
            should_exit: false,
            started: false,
            complete: false,
            status_bar: StatusBarState::welcome(),
            output_path,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn plan(&self) -> &[StepDescriptor] {
        &self.plan
    }

    pub fn is_dryrun(&self) -> bool {
        self.config.general.dryrun
    }

    /// Apply a transition and re-derive the plan. If the edit changed the
    /// step sequence, the watermark is clamped so jump gating never
    /// points past the new plan.
    pub fn dispatch(&mut self, action: WizardAction) {
        debug!(?action, "dispatch");
        let steps_before: Vec<StepId> = self.plan.iter().map(|d| d.step).collect();

        self.state = reduce(&self.state, action);
        self.replan();

        let steps_after: Vec<StepId> = self.plan.iter().map(|d| d.step).collect();
        if steps_before != steps_after {
            self.clamp_watermark();
        }

        self.selected_entry = self.selected_entry.min(self.entry_count() - 1);
        let rows = self.step_rows(self.current_step()).len();
        self.field_cursor = self.field_cursor.min(rows.saturating_sub(1));
    }

    fn replan(&mut self) {
        self.plan = plan_steps(&self.state, self.has_existing_cluster);
    }

    /// After a branch change the old watermark may point past the new
    /// sequence; cap it at the new last step ID minus one.
    fn clamp_watermark(&mut self) {
        let last_id = self.plan.last().map(|d| d.id).unwrap_or(INITIAL_STEP_ID);
        let ceiling = last_id.saturating_sub(1).max(INITIAL_STEP_ID);
        if self.state.step_id_reached > ceiling {
            debug!(
                from = self.state.step_id_reached,
                to = ceiling,
                "clamping watermark after branch change"
            );
            self.state = reduce(&self.state, WizardAction::SetStepIdReached(ceiling));
            self.replan();
        }
    }

    /// Sidebar entries: the backing storage step plus the planned steps.
    pub fn entry_count(&self) -> usize {
        1 + self.plan.len()
    }

    pub fn current_step(&self) -> StepId {
        if self.selected_entry == 0 {
            StepId::BackingStorage
        } else {
            self.plan
                .get(self.selected_entry - 1)
                .map(|d| d.step)
                .unwrap_or(StepId::BackingStorage)
        }
    }

    pub fn current_step_id(&self) -> u16 {
        if self.selected_entry == 0 {
            INITIAL_STEP_ID
        } else {
            self.plan
                .get(self.selected_entry - 1)
                .map(|d| d.id)
                .unwrap_or(INITIAL_STEP_ID)
        }
    }

    /// Whether a sidebar entry may be navigated to directly.
    pub fn entry_locked(&self, entry: usize) -> bool {
        if entry == 0 {
            return false;
        }
        self.plan
            .get(entry - 1)
            .map(|d| !d.can_jump_to)
            .unwrap_or(true)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key
        if self.message.is_some() {
            self.message = None;
        }

        // Handle confirm dialog first
        if let Some(action) = self.confirm_action {
            self.handle_confirm_key(key, action);
            self.update_status_bar();
            return;
        }

        // Handle help popup
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            self.update_status_bar();
            return;
        }

        // Completion screen only offers quitting
        if self.complete {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                self.should_exit = true;
            }
            return;
        }

        match self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Insert => self.handle_insert_key(key),
        }

        self.update_status_bar();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        // Ctrl+h/l for panel navigation
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('h') => {
                    self.focus_sidebar();
                    return;
                }
                KeyCode::Char('l') => {
                    self.focus_content();
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                self.navigate_down();
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                self.navigate_up();
            }

            // Edit the focused text row
            KeyCode::Char('i') | KeyCode::Char('a') => {
                if self.panel_focus == PanelFocus::Content {
                    self.begin_edit();
                }
            }

            // Action / Select
            KeyCode::Enter => {
                self.handle_enter();
            }
            KeyCode::Char(' ') => {
                if self.panel_focus == PanelFocus::Content {
                    self.activate_row();
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.panel_focus == PanelFocus::Sidebar {
                    self.enter_selected_step();
                } else if self.panel_focus == PanelFocus::Content {
                    self.activate_row();
                }
            }

            // Go back
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => {
                if self.panel_focus == PanelFocus::Content {
                    self.focus_sidebar();
                }
            }

            // Step navigation
            KeyCode::Char('n') => {
                self.advance_step();
            }
            KeyCode::Char('b') => {
                self.retreat_step();
            }

            // Function keys
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Char('q') => {
                self.confirm_action = Some(ConfirmAction::Quit);
            }

            // Quick select by number
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.started && self.panel_focus == PanelFocus::Sidebar {
                    let num = c.to_digit(10).unwrap_or(0) as usize;
                    if num > 0 && num <= self.entry_count() {
                        self.selected_entry = num - 1;
                        self.field_cursor = 0;
                    }
                }
            }

            _ => {}
        }
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.cancel_edit();
            }
            KeyCode::Enter => {
                self.commit_edit();
            }
            KeyCode::Backspace => {
                self.edit_buffer.delete_back();
            }
            KeyCode::Delete => {
                self.edit_buffer.delete_forward();
            }
            KeyCode::Left => {
                self.edit_buffer.move_left();
            }
            KeyCode::Right => {
                self.edit_buffer.move_right();
            }
            KeyCode::Home => {
                self.edit_buffer.move_start();
            }
            KeyCode::End => {
                self.edit_buffer.move_end();
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match c {
                        'u' => self.edit_buffer.clear(),
                        'a' => self.edit_buffer.move_start(),
                        'e' => self.edit_buffer.move_end(),
                        _ => {}
                    }
                } else {
                    self.edit_buffer.insert(c);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, action: ConfirmAction) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm_action = None;
                match action {
                    ConfirmAction::Create => self.create_request(),
                    ConfirmAction::Quit => {
                        self.should_exit = true;
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_action = None;
            }
            _ => {}
        }
    }

    fn handle_enter(&mut self) {
        match self.panel_focus {
            PanelFocus::Welcome => {
                self.start();
            }
            PanelFocus::Sidebar => {
                self.enter_selected_step();
            }
            PanelFocus::Content => {
                if self.current_step() == StepId::ReviewAndCreate {
                    self.confirm_action = Some(ConfirmAction::Create);
                    return;
                }
                let rows = self.step_rows(self.current_step());
                match rows.get(self.field_cursor).map(|r| r.kind) {
                    Some(RowKind::Text) | Some(RowKind::Secret) => self.begin_edit(),
                    Some(RowKind::Cycle) | Some(RowKind::Toggle) => self.activate_row(),
                    None => {}
                }
            }
        }
    }

    fn start(&mut self) {
        self.started = true;
        self.selected_entry = 0;
        self.field_cursor = 0;
        self.panel_focus = PanelFocus::Content;
        info!("wizard session started");
    }

    fn enter_selected_step(&mut self) {
        if self.entry_locked(self.selected_entry) {
            self.set_error("This step is locked. Complete previous steps first.".to_string());
            return;
        }
        self.focus_content();
    }

    fn focus_sidebar(&mut self) {
        if self.started && !self.complete {
            self.panel_focus = PanelFocus::Sidebar;
        }
    }

    fn focus_content(&mut self) {
        if self.started && !self.complete && !self.entry_locked(self.selected_entry) {
            self.panel_focus = PanelFocus::Content;
            self.field_cursor = 0;
        }
    }

    fn navigate_down(&mut self) {
        match self.panel_focus {
            PanelFocus::Welcome => {}
            PanelFocus::Sidebar => {
                if self.selected_entry + 1 < self.entry_count() {
                    self.selected_entry += 1;
                    self.field_cursor = 0;
                }
            }
            PanelFocus::Content => {
                let rows = self.step_rows(self.current_step()).len();
                if rows > 0 && self.field_cursor + 1 < rows {
                    self.field_cursor += 1;
                }
            }
        }
    }

    fn navigate_up(&mut self) {
        match self.panel_focus {
            PanelFocus::Welcome => {}
            PanelFocus::Sidebar => {
                if self.selected_entry > 0 {
                    self.selected_entry -= 1;
                    self.field_cursor = 0;
                }
            }
            PanelFocus::Content => {
                if self.field_cursor > 0 {
                    self.field_cursor -= 1;
                }
            }
        }
    }

    /// Rows of a step pane: the render model and key-dispatch table.
    pub fn step_rows(&self, step: StepId) -> Vec<StageRow> {
        match step {
            StepId::BackingStorage => {
                let backing = &self.state.backing_storage;
                let mut rows = vec![
                    StageRow::new(
                        RowKind::Cycle,
                        "Backing storage",
                        backing.storage_type.label(),
                        RowEdit::StorageType,
                    ),
                    StageRow::new(
                        RowKind::Cycle,
                        "Deployment",
                        backing.deployment.label(),
                        RowEdit::Deployment,
                    ),
                ];
                match backing.storage_type {
                    state::BackingStorageType::UseExisting => {
                        let class = if backing.existing_storage_class.is_empty() {
                            "(none selected)"
                        } else {
                            &backing.existing_storage_class
                        };
                        rows.push(StageRow::new(
                            RowKind::Cycle,
                            "Storage class",
                            class,
                            RowEdit::ExistingClass,
                        ));
                    }
                    state::BackingStorageType::External => {
                        let provider = match backing.external_provider.as_deref() {
                            Some(kind) => self.catalog.display_name(kind),
                            None => "(none selected)",
                        };
                        rows.push(StageRow::new(
                            RowKind::Cycle,
                            "External provider",
                            provider,
                            RowEdit::Provider,
                        ));
                    }
                    state::BackingStorageType::LocalDevices => {}
                }
                rows
            }
            StepId::CapacityAndNodes => {
                let capacity = &self.state.capacity_and_nodes;
                let mut rows = vec![StageRow::new(
                    RowKind::Text,
                    "Requested capacity (GiB)",
                    capacity.requested_capacity_gib.to_string(),
                    RowEdit::Capacity,
                )];
                for (idx, node) in self.state.nodes.iter().enumerate() {
                    let selected = capacity.selected_nodes.contains(&node.name);
                    rows.push(StageRow::new(
                        RowKind::Toggle,
                        format!(
                            "{}  ({} cpu, {} GiB, {})",
                            node.name, node.cpus, node.memory_gib, node.zone
                        ),
                        flag(selected),
                        RowEdit::Node(idx),
                    ));
                }
                rows
            }
            StepId::SecurityAndNetwork => {
                let security = &self.state.security_and_network;
                let mut rows = vec![
                    StageRow::new(
                        RowKind::Toggle,
                        "Cluster-wide encryption",
                        flag(security.encryption.cluster_wide),
                        RowEdit::ClusterWideEncryption,
                    ),
                    StageRow::new(
                        RowKind::Toggle,
                        "Storage class encryption",
                        flag(security.encryption.storage_class),
                        RowEdit::StorageClassEncryption,
                    ),
                    StageRow::new(
                        RowKind::Toggle,
                        "In-transit encryption",
                        flag(security.encryption.in_transit),
                        RowEdit::InTransitEncryption,
                    ),
                    StageRow::new(
                        RowKind::Toggle,
                        "External key management",
                        flag(security.kms.enabled),
                        RowEdit::KmsToggle,
                    ),
                ];
                if security.kms.enabled {
                    rows.push(StageRow::new(
                        RowKind::Text,
                        "KMS service name",
                        security.kms.service_name.clone(),
                        RowEdit::KmsServiceName,
                    ));
                }
                rows.push(StageRow::new(
                    RowKind::Cycle,
                    "Network",
                    security.network_type.label(),
                    RowEdit::NetworkType,
                ));
                if security.network_type == NetworkType::Dedicated {
                    rows.push(StageRow::new(
                        RowKind::Text,
                        "Cluster network (namespace/name)",
                        security.cluster_network.clone(),
                        RowEdit::ClusterNetwork,
                    ));
                    rows.push(StageRow::new(
                        RowKind::Text,
                        "Public network (namespace/name)",
                        security.public_network.clone(),
                        RowEdit::PublicNetwork,
                    ));
                }
                rows
            }
            StepId::Security => {
                let security = &self.state.security_and_network;
                let mut rows = vec![
                    StageRow::new(
                        RowKind::Toggle,
                        "Cluster-wide encryption",
                        flag(security.encryption.cluster_wide),
                        RowEdit::ClusterWideEncryption,
                    ),
                    StageRow::new(
                        RowKind::Toggle,
                        "In-transit encryption",
                        flag(security.encryption.in_transit),
                        RowEdit::InTransitEncryption,
                    ),
                    StageRow::new(
                        RowKind::Toggle,
                        "External key management",
                        flag(security.kms.enabled),
                        RowEdit::KmsToggle,
                    ),
                ];
                if security.kms.enabled {
                    rows.push(StageRow::new(
                        RowKind::Text,
                        "KMS service name",
                        security.kms.service_name.clone(),
                        RowEdit::KmsServiceName,
                    ));
                }
                rows
            }
            StepId::CreateStorageClass => {
                let class = &self.state.create_storage_class;
                vec![
                    StageRow::new(
                        RowKind::Text,
                        "Storage class name",
                        class.name.clone(),
                        RowEdit::StorageClassName,
                    ),
                    StageRow::new(
                        RowKind::Cycle,
                        "Reclaim policy",
                        class.reclaim_policy.label(),
                        RowEdit::ReclaimPolicy,
                    ),
                ]
            }
            StepId::CreateLocalVolumeSet => {
                let volume_set = &self.state.create_local_volume_set;
                vec![
                    StageRow::new(
                        RowKind::Text,
                        "Volume set name",
                        volume_set.volume_set_name.clone(),
                        RowEdit::VolumeSetName,
                    ),
                    StageRow::new(
                        RowKind::Cycle,
                        "Device class",
                        volume_set.device_class.label(),
                        RowEdit::DeviceClass,
                    ),
                ]
            }
            StepId::ConnectionDetails => {
                let connection = &self.state.connection_details;
                let endpoint = if connection.endpoint.is_empty() {
                    "(not set)".to_string()
                } else {
                    connection.endpoint.clone()
                };
                let token = if connection.api_token.is_empty() {
                    "(not set)"
                } else {
                    "********"
                };
                vec![
                    StageRow::new(RowKind::Text, "Endpoint (host:port)", endpoint, RowEdit::Endpoint),
                    StageRow::new(RowKind::Secret, "API token", token, RowEdit::ApiToken),
                ]
            }
            StepId::ReviewAndCreate => Vec::new(),
        }
    }

    /// Apply the cycle/toggle edit of the focused row.
    fn activate_row(&mut self) {
        let rows = self.step_rows(self.current_step());
        let Some(row) = rows.get(self.field_cursor) else {
            return;
        };

        match row.edit {
            RowEdit::StorageType => {
                let next = self.state.backing_storage.storage_type.next();
                self.dispatch(WizardAction::SetBackingStorageType(next));
            }
            RowEdit::Deployment => {
                let next = self.state.backing_storage.deployment.next();
                self.dispatch(WizardAction::SetDeployment(next));
            }
            RowEdit::Provider => {
                let current = self.state.backing_storage.external_provider.as_deref();
                let next = self.catalog.next_kind(current);
                self.dispatch(WizardAction::SetExternalProvider(next));
            }
            RowEdit::ExistingClass => {
                let classes = &self.config.cluster.storage_classes;
                if classes.is_empty() {
                    self.set_error("No storage classes configured".to_string());
                    return;
                }
                let next = match classes
                    .iter()
                    .position(|c| *c == self.state.backing_storage.existing_storage_class)
                {
                    Some(idx) => classes[(idx + 1) % classes.len()].clone(),
                    None => classes[0].clone(),
                };
                self.dispatch(WizardAction::SetExistingStorageClass(next));
            }
            RowEdit::Node(idx) => {
                if let Some(node) = self.state.nodes.get(idx) {
                    let name = node.name.clone();
                    self.dispatch(WizardAction::ToggleNodeSelection(name));
                }
            }
            RowEdit::ClusterWideEncryption => {
                let mut encryption = self.state.security_and_network.encryption;
                encryption.cluster_wide = !encryption.cluster_wide;
                self.dispatch(WizardAction::SetEncryption(encryption));
            }
            RowEdit::StorageClassEncryption => {
                let mut encryption = self.state.security_and_network.encryption;
                encryption.storage_class = !encryption.storage_class;
                self.dispatch(WizardAction::SetEncryption(encryption));
            }
            RowEdit::InTransitEncryption => {
                self.dispatch(WizardAction::ToggleInTransitEncryption);
            }
            RowEdit::KmsToggle => {
                let kms = &self.state.security_and_network.kms;
                let next = KmsSelection {
                    enabled: !kms.enabled,
                    service_name: kms.service_name.clone(),
                };
                self.dispatch(WizardAction::SetKms(next));
            }
            RowEdit::NetworkType => {
                let next = self.state.security_and_network.network_type.next();
                self.dispatch(WizardAction::SetNetworkType(next));
            }
            RowEdit::ReclaimPolicy => {
                let next = self.state.create_storage_class.reclaim_policy.next();
                self.dispatch(WizardAction::SetReclaimPolicy(next));
            }
            RowEdit::DeviceClass => {
                let next = self.state.create_local_volume_set.device_class.next();
                self.dispatch(WizardAction::SetDeviceClass(next));
            }
            // Text rows open the editor instead
            RowEdit::Capacity
            | RowEdit::KmsServiceName
            | RowEdit::ClusterNetwork
            | RowEdit::PublicNetwork
            | RowEdit::StorageClassName
            | RowEdit::VolumeSetName
            | RowEdit::Endpoint
            | RowEdit::ApiToken => {
                self.begin_edit();
            }
        }
    }

    fn begin_edit(&mut self) {
        let rows = self.step_rows(self.current_step());
        let Some(row) = rows.get(self.field_cursor) else {
            return;
        };
        if row.kind != RowKind::Text && row.kind != RowKind::Secret {
            return;
        }

        let (value, masked) = match row.edit {
            RowEdit::Capacity => (
                self.state
                    .capacity_and_nodes
                    .requested_capacity_gib
                    .to_string(),
                false,
            ),
            RowEdit::KmsServiceName => {
                (self.state.security_and_network.kms.service_name.clone(), false)
            }
            RowEdit::ClusterNetwork => {
                (self.state.security_and_network.cluster_network.clone(), false)
            }
            RowEdit::PublicNetwork => {
                (self.state.security_and_network.public_network.clone(), false)
            }
            RowEdit::StorageClassName => (self.state.create_storage_class.name.clone(), false),
            RowEdit::VolumeSetName => (
                self.state.create_local_volume_set.volume_set_name.clone(),
                false,
            ),
            RowEdit::Endpoint => (self.state.connection_details.endpoint.clone(), false),
            // Secrets are re-entered, never preloaded
            RowEdit::ApiToken => (String::new(), true),
            _ => return,
        };

        self.edit_buffer.load(&value, masked);
        self.editing = Some(row.edit);
        self.mode = InputMode::Insert;
    }

    fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.editing = None;
        self.mode = InputMode::Normal;
    }

    /// Validate and dispatch the edited value. Parse failures surface as
    /// messages and leave the configuration untouched.
    fn commit_edit(&mut self) {
        self.mode = InputMode::Normal;
        let text = self.edit_buffer.take();
        let Some(edit) = self.editing.take() else {
            return;
        };

        match edit {
            RowEdit::Capacity => match text.trim().parse::<u64>() {
                Ok(gib) if gib > 0 => self.dispatch(WizardAction::SetRequestedCapacity(gib)),
                _ => self.set_error("Capacity must be a positive number of GiB".to_string()),
            },
            RowEdit::KmsServiceName => {
                let kms = KmsSelection {
                    enabled: true,
                    service_name: text.trim().to_string(),
                };
                self.dispatch(WizardAction::SetKms(kms));
            }
            RowEdit::ClusterNetwork => match text.trim().parse::<NetworkRef>() {
                Ok(network) => {
                    self.dispatch(WizardAction::SetClusterNetwork(network.to_string()));
                }
                Err(e) => self.set_error(e.to_string()),
            },
            RowEdit::PublicNetwork => match text.trim().parse::<NetworkRef>() {
                Ok(network) => {
                    self.dispatch(WizardAction::SetPublicNetwork(network.to_string()));
                }
                Err(e) => self.set_error(e.to_string()),
            },
            RowEdit::StorageClassName => {
                let name = text.trim();
                if valid_resource_name(name) {
                    self.dispatch(WizardAction::SetStorageClassName(name.to_string()));
                } else {
                    self.set_error(
                        "Storage class name must be lowercase letters, digits and dashes"
                            .to_string(),
                    );
                }
            }
            RowEdit::VolumeSetName => {
                let name = text.trim();
                if valid_resource_name(name) {
                    self.dispatch(WizardAction::SetVolumeSetName(name.to_string()));
                } else {
                    self.set_error(
                        "Volume set name must be lowercase letters, digits and dashes".to_string(),
                    );
                }
            }
            RowEdit::Endpoint => match text.trim().parse::<StorageEndpoint>() {
                Ok(endpoint) => self.dispatch(WizardAction::SetEndpoint(endpoint.to_string())),
                Err(e) => self.set_error(e.to_string()),
            },
            RowEdit::ApiToken => {
                self.dispatch(WizardAction::SetApiToken(state::ApiToken::new(text)));
            }
            _ => {}
        }
    }

    /// Validate the current step and move forward, advancing the
    /// watermark past the step just completed.
    fn advance_step(&mut self) {
        if !self.started || self.panel_focus == PanelFocus::Welcome {
            return;
        }

        if self.plan.is_empty() {
            self.set_error(
                "No provisioning path for this selection. Pick an external provider.".to_string(),
            );
            return;
        }

        if self.selected_entry + 1 >= self.entry_count() {
            return;
        }

        let step = self.current_step();
        if let Err(msg) = self.validate_step(step) {
            self.set_error(msg);
            return;
        }

        let next_id = self.current_step_id() + 1;
        if self.state.step_id_reached < next_id {
            self.dispatch(WizardAction::SetStepIdReached(next_id));
        }
        self.selected_entry += 1;
        self.field_cursor = 0;
        self.panel_focus = PanelFocus::Content;
    }

    fn retreat_step(&mut self) {
        if self.started && self.selected_entry > 0 {
            self.selected_entry -= 1;
            self.field_cursor = 0;
            self.panel_focus = PanelFocus::Content;
        }
    }

    /// Per-step validation run when the user advances.
    fn validate_step(&self, step: StepId) -> Result<(), String> {
        match step {
            StepId::BackingStorage => {
                let backing = &self.state.backing_storage;
                match backing.storage_type {
                    state::BackingStorageType::UseExisting => {
                        if backing.existing_storage_class.is_empty() {
                            return Err("Select a storage class first".to_string());
                        }
                    }
                    state::BackingStorageType::External => {
                        if backing.external_provider.is_none() {
                            return Err("Select an external provider first".to_string());
                        }
                    }
                    state::BackingStorageType::LocalDevices => {}
                }
                Ok(())
            }
            StepId::CapacityAndNodes => {
                let capacity = &self.state.capacity_and_nodes;
                if capacity.requested_capacity_gib == 0 {
                    return Err("Requested capacity must be greater than zero".to_string());
                }
                if capacity.selected_nodes.len() < MINIMUM_NODES {
                    return Err(format!("Select at least {MINIMUM_NODES} nodes"));
                }
                Ok(())
            }
            StepId::CreateLocalVolumeSet => {
                if !valid_resource_name(&self.state.create_local_volume_set.volume_set_name) {
                    return Err("Enter a valid volume set name".to_string());
                }
                Ok(())
            }
            StepId::CreateStorageClass => {
                if !valid_resource_name(&self.state.create_storage_class.name) {
                    return Err("Enter a valid storage class name".to_string());
                }
                Ok(())
            }
            StepId::ConnectionDetails => {
                let connection = &self.state.connection_details;
                if connection.endpoint.is_empty() {
                    return Err("Enter the endpoint of the external system".to_string());
                }
                if connection.api_token.is_empty() {
                    return Err("Enter the API token".to_string());
                }
                Ok(())
            }
            StepId::SecurityAndNetwork => {
                let security = &self.state.security_and_network;
                if security.kms.enabled && security.kms.service_name.is_empty() {
                    return Err("Enter the KMS service name".to_string());
                }
                if security.network_type == NetworkType::Dedicated
                    && (security.cluster_network.is_empty() || security.public_network.is_empty())
                {
                    return Err("Select both dedicated networks".to_string());
                }
                Ok(())
            }
            StepId::Security => {
                let security = &self.state.security_and_network;
                if security.kms.enabled && security.kms.service_name.is_empty() {
                    return Err("Enter the KMS service name".to_string());
                }
                Ok(())
            }
            StepId::ReviewAndCreate => Ok(()),
        }
    }

    /// Confirmed from the review step: write the provisioning request.
    fn create_request(&mut self) {
        let request = ProvisionRequest::from_app(self);

        if self.is_dryrun() {
            info!("dry run: provisioning request not written");
            self.complete = true;
            self.set_info("Dry run: provisioning request was not written.".to_string());
            self.update_status_bar();
            return;
        }

        match request
            .to_toml()
            .map_err(crate::wizard::error::WizardError::from)
            .and_then(|content| std::fs::write(&self.output_path, content).map_err(Into::into))
        {
            Ok(()) => {
                info!(path = %self.output_path.display(), "provisioning request written");
                self.complete = true;
                self.set_info(format!(
                    "Provisioning request written to {}",
                    self.output_path.display()
                ));
            }
            Err(e) => {
                self.set_error(format!("Failed to write provisioning request: {e}"));
            }
        }
        self.update_status_bar();
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    pub fn tick(&mut self) {
        self.update_status_bar();
    }

    /// Update status bar based on current application state
    pub fn update_status_bar(&mut self) {
        if self.complete {
            self.status_bar = StatusBarState::complete();
            return;
        }

        if self.mode == InputMode::Insert {
            self.status_bar = StatusBarState::step_insert();
            return;
        }

        self.status_bar = match self.panel_focus {
            PanelFocus::Welcome => StatusBarState::welcome(),
            PanelFocus::Sidebar => {
                if self.plan.is_empty() {
                    StatusBarState::no_path()
                } else if self.entry_locked(self.selected_entry) {
                    StatusBarState::locked_step()
                } else {
                    StatusBarState::sidebar()
                }
            }
            PanelFocus::Content => {
                if self.entry_locked(self.selected_entry) {
                    StatusBarState::locked_step()
                } else {
                    match self.current_step() {
                        StepId::ReviewAndCreate => StatusBarState::review_step(),
                        _ => StatusBarState::step_select(),
                    }
                }
            }
        };
    }
}

fn valid_resource_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::state::BackingStorageType;

    fn app() -> WizardApp {
        let mut config = WizardConfig::default();
        config.general.dryrun = true;
        WizardApp::new(config, PathBuf::from("/tmp/quarry-request.toml"))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn branch_change_clamps_watermark() {
        let mut app = app();
        assert_eq!(app.plan().last().map(|d| d.id), Some(4));

        app.dispatch(WizardAction::SetStepIdReached(4));
        assert_eq!(app.state().step_id_reached, 4);

        // Switching to external with no provider empties the plan; the
        // watermark falls back to the initial step.
        app.dispatch(WizardAction::SetBackingStorageType(
            BackingStorageType::External,
        ));
        assert!(app.plan().is_empty());
        assert_eq!(app.state().step_id_reached, 1);

        app.dispatch(WizardAction::SetExternalProvider(Some(
            QUARRY_CLUSTER_KIND.to_string(),
        )));
        assert_eq!(app.plan().len(), 2);
        assert_eq!(app.state().step_id_reached, 1);
    }

    #[test]
    fn unrelated_edit_keeps_watermark_and_plan() {
        let mut app = app();
        app.dispatch(WizardAction::SetStepIdReached(3));
        let plan_before: Vec<_> = app.plan().to_vec();

        app.dispatch(WizardAction::SetRequestedCapacity(9000));
        assert_eq!(app.state().step_id_reached, 3);
        assert_eq!(app.plan(), plan_before.as_slice());
    }

    #[test]
    fn advance_bumps_watermark_and_moves_forward() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter)); // welcome -> start

        assert_eq!(app.selected_entry, 0);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.selected_entry, 1);
        assert_eq!(app.state().step_id_reached, 2);
    }

    #[test]
    fn advance_refuses_invalid_step() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('n'))); // onto capacity and nodes

        // No nodes selected yet
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.selected_entry, 1);
        assert!(app.message.as_ref().is_some_and(|m| m.is_error));
        assert_eq!(app.state().step_id_reached, 2);
    }

    #[test]
    fn advance_blocked_when_plan_is_empty() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.dispatch(WizardAction::SetBackingStorageType(
            BackingStorageType::External,
        ));
        assert!(app.plan().is_empty());

        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.selected_entry, 0);
        assert!(app.message.as_ref().is_some_and(|m| m.is_error));
    }

    #[test]
    fn locked_step_cannot_be_entered() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('h'))); // hand focus back and forth
        app.panel_focus = PanelFocus::Sidebar;

        // Jump selection to the review step, far past the watermark
        app.selected_entry = app.entry_count() - 1;
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.panel_focus, PanelFocus::Sidebar);
        assert!(app.message.as_ref().is_some_and(|m| m.is_error));
    }

    #[test]
    fn completed_steps_stay_jumpable() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('n'))); // backing storage done

        let capacity_entry = app.plan()[0];
        assert_eq!(capacity_entry.id, 2);
        assert!(capacity_entry.can_jump_to);

        // Select the three sample nodes and move on
        for node in ["node-0", "node-1", "node-2"] {
            app.dispatch(WizardAction::ToggleNodeSelection(node.to_string()));
        }
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.state().step_id_reached, 3);
        assert!(app.plan()[0].can_jump_to);
        assert!(app.plan()[1].can_jump_to);
    }

    #[test]
    fn dedicated_network_exposes_attachment_rows() {
        let mut app = app();
        let rows = app.step_rows(StepId::SecurityAndNetwork);
        assert!(!rows.iter().any(|r| r.edit == RowEdit::ClusterNetwork));

        app.dispatch(WizardAction::SetNetworkType(NetworkType::Dedicated));
        let rows = app.step_rows(StepId::SecurityAndNetwork);
        assert!(rows.iter().any(|r| r.edit == RowEdit::ClusterNetwork));
        assert!(rows.iter().any(|r| r.edit == RowEdit::PublicNetwork));
    }

    #[test]
    fn commit_edit_rejects_bad_network_ref() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.dispatch(WizardAction::SetNetworkType(NetworkType::Dedicated));

        app.editing = Some(RowEdit::ClusterNetwork);
        app.mode = InputMode::Insert;
        for c in "not-a-ref".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.state().security_and_network.cluster_network, "");
        assert!(app.message.as_ref().is_some_and(|m| m.is_error));
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[test]
    fn commit_edit_applies_valid_endpoint() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));

        app.editing = Some(RowEdit::Endpoint);
        app.mode = InputMode::Insert;
        for c in "quarry.lab:9283".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.state().connection_details.endpoint, "quarry.lab:9283");
        assert!(app.message.is_none());
    }

    #[test]
    fn resource_names_are_checked() {
        assert!(valid_resource_name("quarry-devices"));
        assert!(valid_resource_name("set1"));
        assert!(!valid_resource_name(""));
        assert!(!valid_resource_name("-leading"));
        assert!(!valid_resource_name("trailing-"));
        assert!(!valid_resource_name("Upper"));
        assert!(!valid_resource_name("with space"));
    }
}
