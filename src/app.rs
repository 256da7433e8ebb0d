// Chat Desk application
// Owns the controller, applies UI actions, and routes menu notifications

use std::path::PathBuf;

use chat_desk_backend::chat::bridge::Waker;
use chat_desk_backend::chat::Notification;
use chat_desk_backend::services::ExportError;
use chat_desk_backend::state::ChatController;
use chrono::Utc;
use eframe::egui;
use tracing::{info, warn};

use crate::dialogs::{save_transcript, show_error, show_info, NativeConfirm};
use crate::ui::layout::render_about_window;
use crate::ui::{render_app_layout, render_settings_window, SettingsState, UiAction};

/// Main application struct
pub struct ChatDeskApp {
    controller: ChatController,
    settings: SettingsState,
    about_open: bool,
    exports_dir: PathBuf,
}

impl ChatDeskApp {
    /// Create the application around a ready controller
    pub fn new(controller: ChatController, api_endpoint: String, exports_dir: PathBuf) -> Self {
        let settings = SettingsState {
            endpoint_input: api_endpoint,
            ..Default::default()
        };
        Self {
            controller,
            settings,
            about_open: false,
            exports_dir,
        }
    }

    /// Repaint the window whenever the bridge queues an event
    pub fn set_waker(&self, waker: Waker) {
        self.controller.set_waker(waker);
    }

    fn handle_shortcuts(&self, ctx: &egui::Context) {
        let shortcuts = [
            (egui::Key::N, Notification::NewChat),
            (egui::Key::E, Notification::ExportChat),
            (egui::Key::Comma, Notification::OpenSettings),
        ];
        for (key, notification) in shortcuts {
            let shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, key);
            if ctx.input_mut(|i| i.consume_shortcut(&shortcut)) {
                self.controller.notify(notification);
            }
        }
    }

    fn handle_notification(&mut self, notification: Notification) {
        match notification {
            // Applied by the controller itself
            Notification::NewChat => {}
            Notification::ExportChat => self.export_chat(),
            Notification::OpenSettings => self.settings.show(),
            Notification::ShowAbout => self.about_open = true,
        }
    }

    fn export_chat(&self) {
        let transcript = match self.controller.export_transcript(Utc::now()) {
            Ok(transcript) => transcript,
            Err(ExportError::Empty) => {
                show_info("No messages to export");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                return;
            }
        };

        match save_transcript(&transcript, &self.exports_dir) {
            Ok(Some(path)) => info!(path = %path.display(), "Transcript saved"),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Export failed");
                show_error(&e.to_string());
            }
        }
    }

    fn apply(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::Send => {
                // Rejections are logged by the controller
                let _ = self.controller.send_draft();
            }
            UiAction::QuickAction(action) => self.controller.quick_action(action),
            UiAction::SubmitPrompt => {
                let _ = self.controller.submit_prompt();
            }
            UiAction::CancelPrompt => self.controller.cancel_prompt(),
            UiAction::ClearChat => {
                self.controller.clear_chat(&NativeConfirm);
            }
            UiAction::LoadChat(id) => {
                self.controller.load_chat(&id);
            }
            UiAction::DeleteChat(id) => {
                self.controller.delete_chat(&id, &NativeConfirm);
            }
            UiAction::DeleteAllChats => {
                self.controller.delete_all_chats(&NativeConfirm);
            }
            UiAction::ToggleSidebar => self.controller.toggle_sidebar(),
            UiAction::Notify(notification) => self.controller.notify(notification),
            UiAction::SaveServer => self.save_server(),
            UiAction::RemoveServer(id) => {
                if self.settings.editing.as_deref() == Some(id.as_str()) {
                    self.settings.reset_form();
                }
                self.controller.remove_server(&id);
            }
            UiAction::SyncServers => self.controller.sync_servers(),
            UiAction::ApplyEndpoint => {
                let endpoint = self.settings.endpoint_input.trim();
                if !endpoint.is_empty() {
                    self.controller.set_api_endpoint(endpoint);
                }
            }
            UiAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn save_server(&mut self) {
        let result = match self.settings.editing.clone() {
            Some(id) => self.controller.update_server(&id, &self.settings.form),
            None => self.controller.add_server(&self.settings.form).map(|_| ()),
        };
        match result {
            Ok(()) => self.settings.reset_form(),
            Err(e) => self.settings.form_error = Some(e.to_string()),
        }
    }
}

impl eframe::App for ChatDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        for notification in self.controller.pump() {
            self.handle_notification(notification);
        }

        let view = self.controller.view(Utc::now());
        let mut actions = Vec::new();

        render_app_layout(ctx, &view, self.controller.inputs_mut(), &mut actions);
        render_settings_window(
            ctx,
            &mut self.settings,
            &view.servers,
            self.controller.last_sync(),
            &mut actions,
        );
        render_about_window(ctx, &mut self.about_open);

        for action in actions {
            self.apply(ctx, action);
        }
    }
}
