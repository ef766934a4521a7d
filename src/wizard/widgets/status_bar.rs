/// Dynamic status bar state, updated by the shell after every event
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    /// Left side hint text (e.g., "j/k: fields  Space: toggle")
    pub left_hint: String,
    /// Right side hint text (e.g., "Ctrl+h: steps")
    pub right_hint: String,
}

impl StatusBarState {
    /// Hints for the welcome screen
    pub fn welcome() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Enter: start".to_string(),
        }
    }

    /// Hints for the step list
    pub fn sidebar() -> Self {
        Self {
            left_hint: "j/k: steps".to_string(),
            right_hint: "l/Enter: open  n: next  ?: help".to_string(),
        }
    }

    /// Hints for a step pane in selection mode
    pub fn step_select() -> Self {
        Self {
            left_hint: "j/k: fields  Space: change".to_string(),
            right_hint: "i: edit  n: next  Ctrl+h: steps".to_string(),
        }
    }

    /// Hints while editing a text field
    pub fn step_insert() -> Self {
        Self {
            left_hint: "Type to edit".to_string(),
            right_hint: "Enter: apply  Esc: cancel".to_string(),
        }
    }

    /// Hints for the review step
    pub fn review_step() -> Self {
        Self {
            left_hint: "Review your selections".to_string(),
            right_hint: "Enter: create  Ctrl+h: steps".to_string(),
        }
    }

    /// Hints when the selected step is still locked
    pub fn locked_step() -> Self {
        Self {
            left_hint: "Step locked".to_string(),
            right_hint: "Complete previous steps first".to_string(),
        }
    }

    /// Hints when the configuration has no provisioning path
    pub fn no_path() -> Self {
        Self {
            left_hint: "No provisioning path".to_string(),
            right_hint: "Select an external provider".to_string(),
        }
    }

    /// Hints once the provisioning request has been created
    pub fn complete() -> Self {
        Self {
            left_hint: "Setup complete".to_string(),
            right_hint: "q: quit".to_string(),
        }
    }
}
