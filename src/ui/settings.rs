// Settings window
// "Servers" tab edits the server registry and the chat endpoint, "History"
// tab deletes stored conversations

use chat_desk_backend::chat::bridge::ConfigSyncResult;
use chat_desk_backend::chat::ServerEndpoint;
use chat_desk_backend::state::ServerDraft;
use eframe::egui;

use super::components::{danger_button, primary_button};
use super::UiAction;

/// Settings tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    /// Server registry and endpoint
    #[default]
    Servers,
    /// Stored conversations
    History,
}

/// Window-local settings state
#[derive(Debug, Default)]
pub struct SettingsState {
    /// Window shown
    pub open: bool,
    /// Selected tab
    pub tab: SettingsTab,
    /// Server form contents
    pub form: ServerDraft,
    /// Server being edited, `None` when adding
    pub editing: Option<String>,
    /// Validation message for the form
    pub form_error: Option<String>,
    /// Chat endpoint input
    pub endpoint_input: String,
}

impl SettingsState {
    /// Open the window
    pub fn show(&mut self) {
        self.open = true;
    }

    /// Prefill the form with an existing server
    pub fn edit(&mut self, server: &ServerEndpoint) {
        self.form = ServerDraft::from_endpoint(server);
        self.editing = Some(server.id.clone());
        self.form_error = None;
    }

    /// Empty the form
    pub fn reset_form(&mut self) {
        self.form = ServerDraft::default();
        self.editing = None;
        self.form_error = None;
    }
}

/// Render the settings window when open
pub fn render_settings_window(
    ctx: &egui::Context,
    settings: &mut SettingsState,
    servers: &[ServerEndpoint],
    last_sync: Option<&ConfigSyncResult>,
    actions: &mut Vec<UiAction>,
) {
    let mut open = settings.open;
    egui::Window::new("Settings")
        .open(&mut open)
        .default_width(520.0)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut settings.tab, SettingsTab::Servers, "Servers");
                ui.selectable_value(&mut settings.tab, SettingsTab::History, "History");
            });
            ui.separator();
            ui.add_space(8.0);

            match settings.tab {
                SettingsTab::Servers => servers_tab(ui, settings, servers, last_sync, actions),
                SettingsTab::History => history_tab(ui, actions),
            }
        });
    settings.open = open;
}

fn servers_tab(
    ui: &mut egui::Ui,
    settings: &mut SettingsState,
    servers: &[ServerEndpoint],
    last_sync: Option<&ConfigSyncResult>,
    actions: &mut Vec<UiAction>,
) {
    ui.label(egui::RichText::new("Chat endpoint").strong());
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut settings.endpoint_input)
                .desired_width(360.0)
                .hint_text("http://localhost:8085/api/chat"),
        );
        if ui.button("Apply").clicked() {
            actions.push(UiAction::ApplyEndpoint);
        }
    });

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Servers").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Sync").clicked() {
                actions.push(UiAction::SyncServers);
            }
            if let Some(sync) = last_sync {
                match &sync.error {
                    None => ui.label(egui::RichText::new("Synced").weak()),
                    Some(error) => ui.colored_label(egui::Color32::from_rgb(220, 38, 38), error),
                };
            }
        });
    });
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .id_source("server_list_scroll")
        .max_height(180.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            if servers.is_empty() {
                ui.label(egui::RichText::new("No servers configured").italics().weak());
            }
            for server in servers {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(&server.name).strong());
                        ui.label(egui::RichText::new(&server.url).monospace().weak().size(12.0));
                        if !server.description.is_empty() {
                            ui.label(egui::RichText::new(&server.description).small());
                        }
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if danger_button(ui, "Delete").clicked() {
                            actions.push(UiAction::RemoveServer(server.id.clone()));
                        }
                        if ui.button("Edit").clicked() {
                            settings.edit(server);
                        }
                    });
                });
                ui.separator();
            }
        });

    ui.add_space(8.0);
    let heading = if settings.editing.is_some() {
        "Edit server"
    } else {
        "Add server"
    };
    ui.label(egui::RichText::new(heading).strong());

    egui::Grid::new("server_form")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut settings.form.name);
            ui.end_row();

            ui.label("URL");
            ui.text_edit_singleline(&mut settings.form.url);
            ui.end_row();

            ui.label("Description");
            ui.text_edit_multiline(&mut settings.form.description);
            ui.end_row();

            ui.label("Icon");
            let icon = settings.form.icon.get_or_insert_with(String::new);
            ui.add(egui::TextEdit::singleline(icon).hint_text("optional path or data URL"));
            ui.end_row();
        });

    if let Some(error) = &settings.form_error {
        ui.colored_label(egui::Color32::from_rgb(220, 38, 38), error);
    }

    ui.horizontal(|ui| {
        let label = if settings.editing.is_some() {
            "Save"
        } else {
            "Add"
        };
        if primary_button(ui, label).clicked() {
            actions.push(UiAction::SaveServer);
        }
        if settings.editing.is_some() && ui.button("Cancel").clicked() {
            settings.reset_form();
        }
    });
}

fn history_tab(ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
    ui.label("Conversations are stored on this computer.");
    ui.add_space(8.0);
    if danger_button(ui, "Delete all chats").clicked() {
        actions.push(UiAction::DeleteAllChats);
    }
}
