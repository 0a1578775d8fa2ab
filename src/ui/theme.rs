use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use super::views::EventStatus;

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    // Phosphor icons as fallback in the proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
}

pub fn setup_theme(ctx: &egui::Context, dark_mode: bool) {
    let mut style = Style::default();

    let mut visuals = if dark_mode {
        let mut v = Visuals::dark();
        v.panel_fill = Color32::from_rgb(30, 30, 30);
        v.window_fill = Color32::from_rgb(30, 30, 30);
        v.faint_bg_color = Color32::from_rgb(40, 40, 40);
        v
    } else {
        let mut v = Visuals::light();
        v.panel_fill = Color32::WHITE;
        v.window_fill = Color32::WHITE;
        v.faint_bg_color = Color32::from_rgb(240, 240, 240);
        v
    };

    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(10.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    ctx.set_style(style);
}

/// Text color for an event row on today's schedule.
pub fn status_color(status: EventStatus, dark_mode: bool) -> Color32 {
    match status {
        EventStatus::Past => muted_color(dark_mode),
        EventStatus::Ongoing => Color32::from_rgb(224, 80, 80),
        EventStatus::Future => {
            if dark_mode {
                Color32::from_rgb(230, 230, 230)
            } else {
                Color32::from_rgb(20, 20, 20)
            }
        }
    }
}

/// Row background highlight for the ongoing event.
pub fn ongoing_bg(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(70, 40, 40)
    } else {
        Color32::from_rgb(255, 230, 230)
    }
}

/// Everything on a non-today day renders in this.
pub fn muted_color(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(140, 140, 140)
    } else {
        Color32::GRAY
    }
}

/// Frame for modal dialogs (add/edit, confirmations).
pub fn dialog_frame(dark_mode: bool) -> egui::Frame {
    let (bg, border) = if dark_mode {
        (Color32::from_rgb(30, 30, 30), Color32::from_rgb(70, 70, 70))
    } else {
        (Color32::WHITE, Color32::from_rgb(200, 200, 200))
    };
    egui::Frame::none()
        .fill(bg)
        .stroke(Stroke::new(1.5, border))
        .rounding(Rounding::same(8.0))
        .inner_margin(egui::Margin::same(16.0))
}
