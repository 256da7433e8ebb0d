// Main application layout
// Menu bar, history sidebar, chat area, input bar and the small windows

use chat_desk_backend::chat::{Notification, QuickAction};
use chat_desk_backend::state::app_state::InputBuffers;
use chat_desk_backend::state::view::{ChatView, HistoryRowView};
use eframe::egui;

use super::components::*;
use super::UiAction;

const INPUT_ID: &str = "message_input";

/// Render the main application layout
/// Includes menu bar, sidebar, chat area and the identifier prompt
pub fn render_app_layout(
    ctx: &egui::Context,
    view: &ChatView,
    inputs: &mut InputBuffers,
    actions: &mut Vec<UiAction>,
) {
    render_menu_bar(ctx, actions);

    if view.sidebar_visible {
        render_sidebar(ctx, view, actions);
    }

    render_input_bar(ctx, view, inputs, actions);

    egui::CentralPanel::default().show(ctx, |ui| {
        render_chat_header(ui, view, actions);
        ui.separator();

        if view.welcome_visible {
            render_welcome_view(ui, actions);
        } else {
            render_messages(ui, view);
        }
    });

    if view.prompt.is_some() {
        render_id_prompt(ctx, view, inputs, actions);
    }
}

/// Render the top menu bar
fn render_menu_bar(ctx: &egui::Context, actions: &mut Vec<UiAction>) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                let items = [
                    ("New Chat", "Ctrl+N", Notification::NewChat),
                    ("Export Chat", "Ctrl+E", Notification::ExportChat),
                    ("Settings", "Ctrl+,", Notification::OpenSettings),
                ];
                for (label, shortcut, notification) in items {
                    if ui
                        .add(egui::Button::new(label).shortcut_text(shortcut))
                        .clicked()
                    {
                        actions.push(UiAction::Notify(notification));
                        ui.close_menu();
                    }
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    actions.push(UiAction::Quit);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Toggle Sidebar").clicked() {
                    actions.push(UiAction::ToggleSidebar);
                    ui.close_menu();
                }
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    let visuals = if dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    };
                    ctx.set_visuals(visuals);
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    actions.push(UiAction::Notify(Notification::ShowAbout));
                    ui.close_menu();
                }
            });
        });
    });
}

/// Render the left sidebar with grouped history
fn render_sidebar(ctx: &egui::Context, view: &ChatView, actions: &mut Vec<UiAction>) {
    egui::SidePanel::left("history_sidebar")
        .resizable(true)
        .default_width(250.0)
        .min_width(180.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            if primary_button(ui, "+ New Chat").clicked() {
                actions.push(UiAction::Notify(Notification::NewChat));
            }
            ui.add_space(4.0);
            ui.separator();

            egui::ScrollArea::vertical()
                .id_source("history_scroll")
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let sections = [
                        ("Today", &view.history.today),
                        ("This Week", &view.history.this_week),
                        ("This Month", &view.history.this_month),
                    ];
                    let empty = sections.iter().all(|(_, rows)| rows.is_empty());

                    if empty {
                        ui.vertical_centered(|ui| {
                            ui.add_space(40.0);
                            ui.label(egui::RichText::new("No conversations yet").italics().weak());
                        });
                        return;
                    }

                    for (title, rows) in sections {
                        if rows.is_empty() {
                            continue;
                        }
                        section_label(ui, title);
                        render_history_rows(ui, rows, actions);
                    }
                });
        });
}

fn render_history_rows(ui: &mut egui::Ui, rows: &[HistoryRowView], actions: &mut Vec<UiAction>) {
    for row in rows {
        match history_row(ui, row) {
            RowEvent::Open => actions.push(UiAction::LoadChat(row.id.clone())),
            RowEvent::Delete => actions.push(UiAction::DeleteChat(row.id.clone())),
            RowEvent::None => {}
        }
        ui.add_space(2.0);
    }
}

fn render_chat_header(ui: &mut egui::Ui, view: &ChatView, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        if ui.button("☰").on_hover_text("Toggle sidebar").clicked() {
            actions.push(UiAction::ToggleSidebar);
        }
        ui.heading("Chat Desk");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let clear = ui.add_enabled(view.has_conversation, egui::Button::new("Clear"));
            if clear.clicked() {
                actions.push(UiAction::ClearChat);
            }
            let export = ui.add_enabled(view.has_conversation, egui::Button::new("Export"));
            if export.clicked() {
                actions.push(UiAction::Notify(Notification::ExportChat));
            }
        });
    });
}

/// Render the welcome screen with quick actions
fn render_welcome_view(ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.heading(egui::RichText::new("How can I help you today?").size(24.0));
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new("Ask about projects and contracts, or start with a quick action")
                .size(14.0)
                .weak(),
        );
        ui.add_space(32.0);

        ui.horizontal_wrapped(|ui| {
            for action in QuickAction::ALL {
                if quick_action_card(ui, action.label()).clicked() {
                    actions.push(UiAction::QuickAction(action));
                }
            }
        });
    });
}

fn render_messages(ui: &mut egui::Ui, view: &ChatView) {
    egui::ScrollArea::vertical()
        .id_source("message_scroll")
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(8.0);
            for message in &view.messages {
                message_bubble(ui, message);
            }
            if view.typing {
                typing_indicator(ui);
            }
        });
}

/// Render the message input with its counter and send button
fn render_input_bar(
    ctx: &egui::Context,
    view: &ChatView,
    inputs: &mut InputBuffers,
    actions: &mut Vec<UiAction>,
) {
    egui::TopBottomPanel::bottom("input_bar")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            let input_id = egui::Id::new(INPUT_ID);

            // Enter sends, Shift+Enter falls through to the text edit
            let focused = ui.memory(|m| m.has_focus(input_id));
            let enter = focused
                && ui.input_mut(|i| {
                    !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
                });
            if enter && view.send_enabled {
                actions.push(UiAction::Send);
            }

            ui.horizontal(|ui| {
                let send_width = 72.0;
                ui.add(
                    egui::TextEdit::multiline(&mut inputs.draft)
                        .id(input_id)
                        .desired_rows(2)
                        .desired_width(ui.available_width() - send_width - 8.0)
                        .hint_text("Type your message..."),
                );
                let send = ui.add_enabled(
                    view.send_enabled,
                    egui::Button::new(egui::RichText::new("Send").strong())
                        .min_size(egui::vec2(send_width, 36.0)),
                );
                if send.clicked() {
                    actions.push(UiAction::Send);
                }
            });

            let counter = egui::RichText::new(view.counter_label()).small();
            let counter = if view.over_limit {
                counter.color(egui::Color32::from_rgb(239, 68, 68))
            } else {
                counter.weak()
            };
            ui.label(counter);
            ui.add_space(4.0);
        });
}

/// Small modal asking for a project or contract id
fn render_id_prompt(
    ctx: &egui::Context,
    view: &ChatView,
    inputs: &mut InputBuffers,
    actions: &mut Vec<UiAction>,
) {
    let Some(prompt) = &view.prompt else {
        return;
    };
    egui::Window::new(&prompt.title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut inputs.prompt_input)
                    .hint_text(prompt.placeholder.as_str())
                    .desired_width(260.0),
            );
            response.request_focus();
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if primary_button(ui, "Search").clicked() || submitted {
                    actions.push(UiAction::SubmitPrompt);
                }
                if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    actions.push(UiAction::CancelPrompt);
                }
            });
        });
}

/// About window with name and version
pub fn render_about_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("About")
        .open(open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Chat Desk");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(8.0);
                ui.label(egui::RichText::new("Desktop client for the chat assistant").weak());
            });
        });
}
