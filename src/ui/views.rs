use chrono::{Duration, NaiveDateTime};
use egui::{Color32, RichText, Ui};

use crate::schedule::time::{self, TOTAL_HOURS};
use crate::schedule::Event;

/// Where an event on today's schedule sits relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Past,
    Ongoing,
    Future,
}

/// Classify an event against the current local time. Open-ended markers
/// (no end) stay Future for the rest of the day; an end at or before the
/// start belongs to tomorrow.
pub fn event_status(event: &Event, now: NaiveDateTime) -> EventStatus {
    let Some(start_t) = time::parse_clock(&event.start) else {
        return EventStatus::Future;
    };
    let start = now.date().and_time(start_t);

    let end = event.end.as_deref().and_then(time::parse_clock).map(|end_t| {
        let mut end = now.date().and_time(end_t);
        if end <= start {
            end += Duration::days(1);
        }
        end
    });

    let Some(end) = end else {
        return EventStatus::Future;
    };

    if now > end {
        EventStatus::Past
    } else if start <= now {
        EventStatus::Ongoing
    } else {
        EventStatus::Future
    }
}

/// One clickable event row. Returns true when clicked (opens the editor).
pub fn render_event_row(
    ui: &mut Ui,
    event: &Event,
    duration: f64,
    color: Color32,
    highlight: Option<Color32>,
) -> bool {
    let time_text = match &event.end {
        Some(end) => format!("{} - {}", event.start, end),
        None => event.start.clone(),
    };
    let text = format!("{:<20} {} ({:.2} hrs)", time_text, event.label, duration);

    let mut clicked = false;
    let frame = egui::Frame::none()
        .fill(highlight.unwrap_or(Color32::TRANSPARENT))
        .rounding(egui::Rounding::same(6.0))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0));
    frame.show(ui, |ui| {
        let button = egui::Button::new(RichText::new(text).color(color))
            .frame(false)
            .min_size(egui::vec2(ui.available_width(), 28.0));
        if ui.add(button).clicked() {
            clicked = true;
        }
    });
    clicked
}

/// Allocated/free hours footer under a day's list.
pub fn render_day_footer(ui: &mut Ui, allocated: f64, muted: Color32) {
    let free = (TOTAL_HOURS - allocated).max(0.0);
    ui.separator();
    ui.label(
        RichText::new(format!(
            "Allocated {allocated:.2} / {TOTAL_HOURS:.0} hours, {free:.2} free"
        ))
        .color(muted),
    );
}

/// Per-activity weekly hour totals, largest first.
pub fn render_weekly_summary(ui: &mut Ui, summary: &[(String, f64)]) {
    ui.add_space(8.0);
    ui.heading(format!("{} Weekly Summary", egui_phosphor::regular::CHART_BAR));
    ui.add_space(4.0);

    for (label, hours) in summary {
        ui.horizontal(|ui| {
            ui.label(RichText::new(label).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{hours:.2} hours/week"));
            });
        });
    }
}
