use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::steps::StepId;
use super::{ConfirmAction, InputMode, PanelFocus, WizardApp};
use crate::ui::Layout as ScreenLayout;

/// Main draw function for the wizard
pub fn draw(frame: &mut Frame, app: &WizardApp) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    if !app.started {
        draw_welcome_screen(frame, area, app);
    } else if app.complete {
        draw_complete_screen(frame, area, app);
    } else {
        draw_setup_screen(frame, area, app);
    }

    // Overlays
    if let Some(action) = app.confirm_action {
        draw_confirm_dialog(frame, action, app);
    }

    if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_welcome_screen(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let layout = ScreenLayout::new(area);

    draw_header(frame, layout.header, app);
    draw_welcome_content(frame, layout.content, app);
    draw_message(frame, layout.message, app);
    draw_status_bar(frame, layout.status, app);
}

/// Draw header bar (1 line, no borders)
fn draw_header(frame: &mut Frame, area: Rect, app: &WizardApp) {
    frame.render_widget(Clear, area);

    // Left side: title
    let title = format!(" {} ", app.config.general.title);
    frame.render_widget(
        Paragraph::new(title)
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    // Right side: clock, with a marker when nothing will be written
    let clock = Local::now().format("%H:%M").to_string();
    let right = if app.is_dryrun() {
        format!("[Dry run] {clock} ")
    } else {
        format!("{clock} ")
    };
    frame.render_widget(
        Paragraph::new(right)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_welcome_content(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let content_width = 62.min(area.width.saturating_sub(4));
    let content_height = 14.min(area.height.saturating_sub(2));
    let centered = ScreenLayout::centered_box(area, content_width, content_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(format!(" {} ", app.config.general.subtitle));

    let inner = block.inner(centered);
    frame.render_widget(Clear, centered);
    frame.render_widget(block, centered);

    let welcome_text = [
        "",
        "This wizard walks you through provisioning a storage system:",
        "",
        "  * Choose what backs the system",
        "  * Size capacity and pick the nodes it runs on",
        "  * Configure encryption and networking",
        "  * Review and create the provisioning request",
        "",
    ];

    let mut y = inner.y;
    for line in &welcome_text {
        if y >= inner.y + inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1),
        );
        y += 1;
    }

    // Begin button - centered at bottom
    let button_y = inner.y + inner.height.saturating_sub(2);
    let button_text = "[ Begin Setup ]";
    let button_width = button_text.len() as u16;
    let button_x = inner.x + (inner.width.saturating_sub(button_width)) / 2;

    frame.render_widget(
        Paragraph::new(button_text)
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)),
        Rect::new(button_x, button_y, button_width, 1),
    );

    let hint = "Press Enter to begin";
    let hint_x = inner.x + (inner.width.saturating_sub(hint.len() as u16)) / 2;
    frame.render_widget(
        Paragraph::new(hint).style(app.theme.muted_style()),
        Rect::new(hint_x, button_y + 1, hint.len() as u16, 1),
    );
}

fn draw_setup_screen(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let layout = ScreenLayout::new(area);

    draw_header(frame, layout.header, app);
    draw_setup_content(frame, layout.content, app);
    draw_message(frame, layout.message, app);
    draw_status_bar(frame, layout.status, app);
}

fn draw_setup_content(frame: &mut Frame, area: Rect, app: &WizardApp) {
    // Split: sidebar (25%) and step pane (75%)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);

    draw_sidebar(frame, chunks[0], app);
    draw_step_pane(frame, chunks[1], app);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let is_focused = app.panel_focus == PanelFocus::Sidebar;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.primary_style()
        } else {
            app.theme.border_style()
        })
        .title(" Steps ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let watermark = app.state().step_id_reached;

    for entry in 0..app.entry_count() {
        if entry as u16 >= inner.height {
            break;
        }

        let is_selected = entry == app.selected_entry;
        let is_locked = app.entry_locked(entry);

        let (id, step) = if entry == 0 {
            (super::state::INITIAL_STEP_ID, StepId::BackingStorage)
        } else {
            let descriptor = &app.plan()[entry - 1];
            (descriptor.id, descriptor.step)
        };

        // Completed means the user validated the step and moved past it
        let is_completed = id < watermark;

        let status = if is_locked {
            "[#]"
        } else if is_completed {
            "[x]"
        } else {
            "[ ]"
        };

        let line_text = format!(" {status} {}", step.short_name());

        let style = if is_locked {
            app.theme.muted_style()
        } else if is_selected && is_focused {
            app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else if is_selected {
            app.theme.secondary_style().add_modifier(Modifier::REVERSED)
        } else if is_completed {
            app.theme.secondary_style()
        } else {
            app.theme.style()
        };

        let line_area = Rect::new(inner.x, inner.y + entry as u16, inner.width, 1);

        if is_selected {
            frame.render_widget(Clear, line_area);
        }

        frame.render_widget(Paragraph::new(line_text).style(style), line_area);
    }

    // An empty plan leaves only the backing storage entry
    if app.plan().is_empty() && inner.height > 2 {
        frame.render_widget(
            Paragraph::new(" (no further steps)").style(app.theme.muted_style()),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }

    // Hint at bottom
    if is_focused && inner.height > app.entry_count() as u16 + 2 {
        let hint = "j/k:nav l/Enter:open";
        let hint_y = inner.y + inner.height - 1;
        frame.render_widget(
            Paragraph::new(hint).style(app.theme.muted_style()),
            Rect::new(inner.x, hint_y, inner.width, 1),
        );
    }
}

fn draw_step_pane(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let is_focused = app.panel_focus == PanelFocus::Content;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.primary_style()
        } else {
            app.theme.border_style()
        });

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if app.entry_locked(app.selected_entry) {
        draw_locked_step(frame, inner, app);
        return;
    }

    match app.current_step() {
        StepId::ReviewAndCreate => draw_review_step(frame, inner, app),
        step => draw_step_form(frame, inner, app, step),
    }
}

/// One-line description shown under each step title.
fn step_blurb(step: StepId) -> &'static str {
    match step {
        StepId::BackingStorage => "Choose what the storage system runs on.",
        StepId::CreateLocalVolumeSet => "Claim raw devices attached to the selected nodes.",
        StepId::CreateStorageClass => "Define the storage class backed by the external platform.",
        StepId::ConnectionDetails => "Connect to the external storage system.",
        StepId::CapacityAndNodes => "Size the system and pick the nodes it runs on.",
        StepId::SecurityAndNetwork => "Encryption and network placement.",
        StepId::Security => "Encryption for the object service.",
        StepId::ReviewAndCreate => "",
    }
}

fn draw_step_form(frame: &mut Frame, area: Rect, app: &WizardApp, step: StepId) {
    if area.height < 8 || area.width < 30 {
        return;
    }

    let is_content_focused = app.panel_focus == PanelFocus::Content;
    let mut y = area.y + 1;

    // Title
    frame.render_widget(
        Paragraph::new(step.name())
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, area.width - 4, 1),
    );
    y += 1;

    frame.render_widget(
        Paragraph::new(step_blurb(step)).style(app.theme.muted_style()),
        Rect::new(area.x + 2, y, area.width - 4, 1),
    );
    y += 2;

    let rows = app.step_rows(step);
    let label_width: u16 = 36;
    let max_y = area.y + area.height - 4;

    for (idx, row) in rows.iter().enumerate() {
        if y >= max_y {
            break;
        }

        let is_row_focused = is_content_focused && idx == app.field_cursor;
        let is_editing = is_row_focused && app.mode == InputMode::Insert;

        let cursor = if is_row_focused { ">" } else { " " };
        let label = format!("{cursor} {:<width$}", row.label, width = label_width as usize);

        let label_style = if is_row_focused {
            app.theme.primary_style()
        } else {
            app.theme.style()
        };

        let value_style = if row.value.starts_with('(') {
            app.theme.muted_style()
        } else if is_row_focused {
            app.theme.primary_style().add_modifier(Modifier::BOLD)
        } else {
            app.theme.style()
        };

        let line = if is_editing {
            // Insert mode - show cursor as |
            let display = app.edit_buffer.display('*');
            let cursor_pos = app.edit_buffer.cursor();
            let before: String = display.chars().take(cursor_pos).collect();
            let after: String = display.chars().skip(cursor_pos).collect();

            Line::from(vec![
                Span::styled(label, label_style),
                Span::styled(before, app.theme.style()),
                Span::styled("|", app.theme.primary_style().add_modifier(Modifier::BOLD)),
                Span::styled(after, app.theme.style()),
            ])
        } else {
            Line::from(vec![
                Span::styled(label, label_style),
                Span::styled(row.value.clone(), value_style),
            ])
        };

        frame.render_widget(
            Paragraph::new(line),
            Rect::new(area.x + 2, y, area.width - 4, 1),
        );
        y += 1;

        // Space between the capacity field and the node list
        if step == StepId::CapacityAndNodes && idx == 0 {
            y += 1;
        }
    }

    // Selections that plan no steps cannot proceed
    if step == StepId::BackingStorage && app.plan().is_empty() {
        y += 1;
        if y < max_y {
            frame.render_widget(
                Paragraph::new("No provisioning path for this selection.")
                    .style(app.theme.error_style()),
                Rect::new(area.x + 2, y, area.width - 4, 1),
            );
            y += 1;
            frame.render_widget(
                Paragraph::new("Pick an external provider to continue.")
                    .style(app.theme.muted_style()),
                Rect::new(area.x + 2, y, area.width - 4, 1),
            );
        }
    }

    // Node count reminder
    if step == StepId::CapacityAndNodes && y + 1 < max_y {
        let selected = app.state().capacity_and_nodes.selected_nodes.len();
        let minimum = super::state::MINIMUM_NODES;
        y += 1;
        frame.render_widget(
            Paragraph::new(format!("{selected} selected, minimum {minimum}"))
                .style(if selected >= minimum {
                    app.theme.secondary_style()
                } else {
                    app.theme.muted_style()
                }),
            Rect::new(area.x + 2, y, area.width - 4, 1),
        );
    }

    // Action button
    let button_y = area.y + area.height - 2;
    let button_text = " [n] Save & Next ";
    let button_width = button_text.len() as u16;

    let button_style = if is_content_focused && !app.plan().is_empty() {
        app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        app.theme.muted_style().add_modifier(Modifier::REVERSED)
    };

    frame.render_widget(
        Paragraph::new(button_text).style(button_style),
        Rect::new(area.x + 2, button_y, button_width, 1),
    );
}

fn draw_locked_step(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let mut y = area.y + area.height / 2 - 2;

    frame.render_widget(
        Paragraph::new("Step Locked")
            .style(app.theme.muted_style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1),
    );
    y += 2;

    frame.render_widget(
        Paragraph::new("Complete the previous steps to unlock this step.")
            .style(app.theme.muted_style())
            .alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1),
    );
}

fn draw_review_step(frame: &mut Frame, area: Rect, app: &WizardApp) {
    if area.height < 10 {
        return;
    }

    let is_content_focused = app.panel_focus == PanelFocus::Content;
    let state = app.state();
    let mut y = area.y + 1;

    // Title
    frame.render_widget(
        Paragraph::new("Review & Create")
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, area.width - 4, 1),
    );
    y += 2;

    frame.render_widget(
        Paragraph::new("Configuration summary:").style(app.theme.style()),
        Rect::new(area.x + 2, y, area.width - 4, 1),
    );
    y += 2;

    let planned = |step: StepId| app.plan().iter().any(|d| d.step == step);
    let mut lines: Vec<(String, Style)> = Vec::new();

    lines.push((
        format!("  Backing storage: {}", state.backing_storage.storage_type.label()),
        app.theme.style(),
    ));
    lines.push((
        format!("  Deployment: {}", state.backing_storage.deployment.label()),
        app.theme.style(),
    ));

    match state.backing_storage.storage_type {
        super::state::BackingStorageType::UseExisting => {
            lines.push((
                format!(
                    "  Storage class: {}",
                    state.backing_storage.existing_storage_class
                ),
                app.theme.style(),
            ));
        }
        super::state::BackingStorageType::External => {
            let provider = state
                .backing_storage
                .external_provider
                .as_deref()
                .map(|kind| app.catalog.display_name(kind))
                .unwrap_or("(none)");
            lines.push((format!("  Provider: {provider}"), app.theme.style()));
        }
        super::state::BackingStorageType::LocalDevices => {}
    }

    if planned(StepId::CreateLocalVolumeSet) {
        lines.push((
            format!(
                "  Volume set: {} ({})",
                state.create_local_volume_set.volume_set_name,
                state.create_local_volume_set.device_class.label()
            ),
            app.theme.style(),
        ));
    }

    if planned(StepId::CreateStorageClass) {
        lines.push((
            format!(
                "  New storage class: {} ({})",
                state.create_storage_class.name,
                state.create_storage_class.reclaim_policy.label()
            ),
            app.theme.style(),
        ));
    }

    if planned(StepId::ConnectionDetails) {
        lines.push((
            format!("  Endpoint: {}", state.connection_details.endpoint),
            app.theme.style(),
        ));
        let token = if state.connection_details.api_token.is_empty() {
            "  API token: (not set)"
        } else {
            "  API token: provided"
        };
        lines.push((token.to_string(), app.theme.style()));
    }

    if planned(StepId::CapacityAndNodes) {
        lines.push((
            format!(
                "  Capacity: {} GiB on {} nodes",
                state.capacity_and_nodes.requested_capacity_gib,
                state.capacity_and_nodes.selected_nodes.len()
            ),
            app.theme.style(),
        ));
    }

    if planned(StepId::Security) || planned(StepId::SecurityAndNetwork) {
        let security = &state.security_and_network;
        let mut enabled = Vec::new();
        if security.encryption.cluster_wide {
            enabled.push("cluster-wide");
        }
        if security.encryption.storage_class && planned(StepId::SecurityAndNetwork) {
            enabled.push("storage class");
        }
        if security.encryption.in_transit {
            enabled.push("in transit");
        }
        let encryption = if enabled.is_empty() {
            "none".to_string()
        } else {
            enabled.join(", ")
        };
        lines.push((format!("  Encryption: {encryption}"), app.theme.style()));

        if security.kms.enabled {
            lines.push((
                format!("  KMS: {}", security.kms.service_name),
                app.theme.style(),
            ));
        }

        if planned(StepId::SecurityAndNetwork) {
            lines.push((
                format!("  Network: {}", security.network_type.label()),
                app.theme.style(),
            ));
            if security.network_type == super::state::NetworkType::Dedicated {
                lines.push((
                    format!(
                        "    cluster {} / public {}",
                        security.cluster_network, security.public_network
                    ),
                    app.theme.muted_style(),
                ));
            }
        }
    }

    for (text, style) in &lines {
        if y >= area.y + area.height - 6 {
            break;
        }
        frame.render_widget(
            Paragraph::new(text.as_str()).style(*style),
            Rect::new(area.x + 2, y, area.width - 4, 1),
        );
        y += 1;
    }
    y += 1;

    // Unresolved steps block the create button
    let issues: Vec<(StepId, String)> = app
        .plan()
        .iter()
        .filter(|d| d.step != StepId::ReviewAndCreate)
        .filter_map(|d| app.validate_step(d.step).err().map(|msg| (d.step, msg)))
        .collect();

    if issues.is_empty() {
        if y < area.y + area.height - 4 {
            let note = if app.is_dryrun() {
                "Dry run: confirming will not write anything."
            } else {
                "Press Enter to create the provisioning request."
            };
            frame.render_widget(
                Paragraph::new(note).style(app.theme.style()),
                Rect::new(area.x + 2, y, area.width - 4, 1),
            );
        }
    } else {
        for (step, msg) in &issues {
            if y >= area.y + area.height - 4 {
                break;
            }
            frame.render_widget(
                Paragraph::new(format!("  [!] {}: {msg}", step.name()))
                    .style(app.theme.error_style()),
                Rect::new(area.x + 2, y, area.width - 4, 1),
            );
            y += 1;
        }
    }

    // Action button
    let button_y = area.y + area.height - 2;
    let button_text = " [Enter] Create ";
    let button_width = button_text.len() as u16;

    let button_style = if issues.is_empty() && is_content_focused {
        app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        app.theme.muted_style().add_modifier(Modifier::REVERSED)
    };

    frame.render_widget(
        Paragraph::new(button_text).style(button_style),
        Rect::new(area.x + 2, button_y, button_width, 1),
    );
}

fn draw_complete_screen(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let layout = ScreenLayout::new(area);

    draw_header(frame, layout.header, app);

    let content_width = 56.min(layout.content.width.saturating_sub(4));
    let content_height = 9.min(layout.content.height.saturating_sub(2));
    let centered = ScreenLayout::centered_box(layout.content, content_width, content_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Done ");

    let inner = block.inner(centered);
    frame.render_widget(Clear, centered);
    frame.render_widget(block, centered);

    let mut y = inner.y + 1;
    frame.render_widget(
        Paragraph::new("Provisioning request created.")
            .style(app.theme.secondary_style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(inner.x, y, inner.width, 1),
    );
    y += 2;

    let note = if app.is_dryrun() {
        "Dry run: nothing was written."
    } else {
        "The request file is ready for the provisioner."
    };
    frame.render_widget(
        Paragraph::new(note)
            .style(app.theme.style())
            .alignment(Alignment::Center),
        Rect::new(inner.x, y, inner.width, 1),
    );
    y += 2;

    frame.render_widget(
        Paragraph::new("Press q to exit.")
            .style(app.theme.muted_style())
            .alignment(Alignment::Center),
        Rect::new(inner.x, y, inner.width, 1),
    );

    draw_message(frame, layout.message, app);
    draw_status_bar(frame, layout.status, app);
}

fn draw_message(frame: &mut Frame, area: Rect, app: &WizardApp) {
    // Only draw message panel if there's a message
    let Some(msg) = &app.message else {
        return;
    };

    let (title, border_style, text_style) = if msg.is_error {
        (" Error ", app.theme.error_style(), app.theme.error_style())
    } else {
        (" Info ", app.theme.secondary_style(), app.theme.style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    let content = Line::from(vec![
        Span::styled(msg.text.as_str(), text_style),
    ]);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    frame.render_widget(Clear, area);

    // Mode indicator on left
    let mode_name = app.mode.display_name();
    let mode_style = app.theme.mode_style(mode_name);
    let mode_span = Span::styled(format!(" {mode_name} "), mode_style);

    let after_mode = if !app.status_bar.left_hint.is_empty() {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    } else {
        Span::raw("")
    };

    let left_line = Line::from(vec![mode_span, Span::raw(" "), after_mode]);
    frame.render_widget(
        Paragraph::new(left_line),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    // Progress and right hints
    let watermark = app.state().step_id_reached;
    let completed = (0..app.entry_count())
        .filter(|&entry| {
            let id = if entry == 0 {
                super::state::INITIAL_STEP_ID
            } else {
                app.plan()[entry - 1].id
            };
            id < watermark
        })
        .count();
    let total = app.entry_count();

    let right_text = if app.status_bar.right_hint.is_empty() {
        format!("{completed}/{total}")
    } else {
        format!("{completed}/{total}  {}", app.status_bar.right_hint)
    };

    frame.render_widget(
        Paragraph::new(right_text)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width * 2 / 3, 1),
    );
}

fn draw_confirm_dialog(frame: &mut Frame, action: ConfirmAction, app: &WizardApp) {
    let (title, message) = match action {
        ConfirmAction::Create => ("Create", "Create the provisioning request?"),
        ConfirmAction::Quit => ("Quit", "Quit without creating the storage system?"),
    };

    let width = 44.min(frame.area().width - 4);
    let height = 7;
    let area = ScreenLayout::centered_box(frame.area(), width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style())
        .title(format!(" {title} "));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    frame.render_widget(
        Paragraph::new(message)
            .style(app.theme.style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let hints = Line::from(vec![
        Span::styled("[", app.theme.style()),
        Span::styled("Y", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]es / [", app.theme.style()),
        Span::styled("N", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]o", app.theme.style()),
    ]);

    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 3, inner.width, 1),
    );
}

fn draw_help(frame: &mut Frame, app: &WizardApp) {
    let width = 60.min(frame.area().width - 4);
    let height = 20.min(frame.area().height - 4);
    let area = ScreenLayout::centered_box(frame.area(), width, height);

    let help_text = [
        "",
        "Navigation:",
        "",
        "  Ctrl+h         Focus sidebar",
        "  Ctrl+l         Focus step pane",
        "  j/k            Navigate up/down",
        "  Enter          Open / Apply",
        "  1-9            Quick select step",
        "  n              Save step and move forward",
        "  b              Go back one step",
        "",
        "Editing:",
        "",
        "  Space          Cycle or toggle the selection",
        "  i              Edit a text field",
        "  Esc            Cancel edit / back to sidebar",
        "",
        "Press q or Esc to close",
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, line) in help_text.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}

