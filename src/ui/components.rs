// Reusable UI components
// Message bubbles, history rows, quick action cards and buttons

use chat_desk_backend::chat::Sender;
use chat_desk_backend::state::view::{HistoryRowView, MessageView};
use eframe::egui;

const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);
const DANGER: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);

/// Render one message bubble, user messages aligned right
pub fn message_bubble(ui: &mut egui::Ui, message: &MessageView) {
    let is_user = message.sender == Sender::User;
    let layout = if is_user {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        let max_width = ui.available_width() * 0.75;
        let mut frame = egui::Frame::none()
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .rounding(egui::Rounding::same(10.0));
        frame.fill = if is_user {
            USER_BUBBLE
        } else {
            ui.visuals().faint_bg_color
        };

        frame.show(ui, |ui| {
            ui.set_max_width(max_width);
            ui.vertical(|ui| {
                let text = egui::RichText::new(&message.text).size(14.0);
                let text = if is_user {
                    text.color(egui::Color32::WHITE)
                } else {
                    text
                };
                ui.add(egui::Label::new(text).wrap(true));
                ui.add_space(2.0);
                ui.label(egui::RichText::new(&message.time).weak().small());
            });
        });
    });
    ui.add_space(8.0);
}

/// Three-dot indicator shown while a reply is pending
pub fn typing_indicator(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let mut frame = egui::Frame::none()
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .rounding(egui::Rounding::same(10.0));
        frame.fill = ui.visuals().faint_bg_color;
        frame.show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(egui::RichText::new("Assistant is typing...").weak().italics());
            });
        });
    });
}

/// What happened to a history row this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEvent {
    /// Nothing
    None,
    /// Row clicked
    Open,
    /// Delete button clicked
    Delete,
}

/// Render a sidebar history row with a delete button
pub fn history_row(ui: &mut egui::Ui, row: &HistoryRowView) -> RowEvent {
    let row_id = ui.id().with(("history_row", &row.id));

    let mut frame = egui::Frame::none();
    frame.rounding = egui::Rounding::same(4.0);
    frame.inner_margin = egui::Margin::symmetric(4.0, 4.0);
    if row.active {
        frame.fill = ui.visuals().selection.bg_fill;
    }

    let mut event = RowEvent::None;
    let row_response = frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.add(egui::Label::new(&row.title).truncate(true));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .small_button(egui::RichText::new("🗑").color(DANGER))
                    .on_hover_text("Delete chat")
                    .clicked()
                {
                    event = RowEvent::Delete;
                }
            });
        })
    });

    let row_rect = row_response.response.rect;
    let interact = ui.interact(row_rect, row_id, egui::Sense::click());

    // Subtle outline so the text stays readable on hover
    if interact.hovered() && !row.active {
        let stroke_color = ui.visuals().widgets.hovered.bg_fill;
        let stroke_color = egui::Color32::from_rgba_unmultiplied(
            stroke_color.r(),
            stroke_color.g(),
            stroke_color.b(),
            100,
        );
        ui.painter().rect_stroke(
            row_rect,
            egui::Rounding::same(4.0),
            egui::Stroke::new(2.0, stroke_color),
        );
    }

    if event == RowEvent::None && interact.clicked() {
        event = RowEvent::Open;
    }
    event
}

/// Card-style button used for quick actions
pub fn quick_action_card(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add_sized(
        [160.0, 48.0],
        egui::Button::new(egui::RichText::new(label).size(14.0)).rounding(egui::Rounding::same(8.0)),
    )
}

/// Render a primary action button
pub fn primary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    ui.button(egui::RichText::new(text).strong())
}

/// Render a destructive action button
pub fn danger_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    ui.button(egui::RichText::new(text).color(DANGER))
}

/// Section heading in the history sidebar
pub fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.add_space(8.0);
    ui.label(egui::RichText::new(text).small().strong().weak());
    ui.add_space(2.0);
}
