use std::time::{Duration, Instant};

use chrono::Local;
use eframe::egui;
use egui::RichText;
use tracing::error;

use crate::config::Preferences;
use crate::schedule::{self, normalize, ops, Event, Schedule, Store, DAYS_OF_WEEK};
use super::theme;
use super::views::{self, EventStatus};

/// The document is re-read on this interval so external edits show up.
const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub struct ScheduleApp {
    store: Store,
    prefs: Preferences,
    /// Compact variant: pinned to today, no day selector or undo chrome.
    compact: bool,

    selected_day: String,
    view: Schedule,
    last_refresh: Instant,

    // Add/edit dialog
    show_dialog: bool,
    dialog_mode: DialogMode,
    dialog_start: String,
    dialog_end: String,
    dialog_label: String,
    dialog_original_start: String,
    dialog_error: Option<String>,

    // Confirmations
    pending_delete: Option<Event>,
    show_delete_confirm: bool,
    show_restore_confirm: bool,

    // Status line
    status_message: Option<(String, bool)>, // (message, is_error)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DialogMode {
    Add,
    Edit,
}

fn today_name() -> String {
    Local::now().format("%A").to_string()
}

impl ScheduleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_compact(cc, false)
    }

    /// The compact today-only variant.
    pub fn new_compact(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_compact(cc, true)
    }

    fn with_compact(cc: &eframe::CreationContext<'_>, compact: bool) -> Self {
        let prefs = Preferences::load_or_default();
        let store = Store::open_default().unwrap_or_else(|e| {
            error!(error = %e, "falling back to working directory for schedule storage");
            Store::at(std::path::Path::new("."))
        });

        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx, prefs.dark_mode);

        let mut app = Self {
            store,
            prefs,
            compact,
            selected_day: today_name(),
            view: Schedule::default(),
            last_refresh: Instant::now(),
            show_dialog: false,
            dialog_mode: DialogMode::Add,
            dialog_start: String::new(),
            dialog_end: String::new(),
            dialog_label: String::new(),
            dialog_original_start: String::new(),
            dialog_error: None,
            pending_delete: None,
            show_delete_confirm: false,
            show_restore_confirm: false,
            status_message: None,
        };
        app.reload();
        app
    }

    /// Fresh load + expand + sort from disk.
    fn reload(&mut self) {
        match schedule::load_view(&self.store, &self.prefs.aliases) {
            Ok(view) => self.view = view,
            Err(e) => {
                error!(error = %e, "failed to load schedule");
                self.status_message = Some((format!("Failed to load schedule: {e:#}"), true));
            }
        }
        self.last_refresh = Instant::now();
    }

    fn report(&mut self, result: ops::Result<()>, success: &str) {
        match result {
            Ok(()) => {
                self.status_message = Some((success.to_string(), false));
                self.reload();
            }
            Err(e) => {
                error!(error = %e, "schedule operation failed");
                self.status_message = Some((e.to_string(), true));
            }
        }
    }

    fn open_add_dialog(&mut self) {
        self.dialog_mode = DialogMode::Add;
        self.dialog_start.clear();
        self.dialog_end.clear();
        self.dialog_label.clear();
        self.dialog_original_start.clear();
        self.dialog_error = None;
        self.show_dialog = true;
    }

    fn open_edit_dialog(&mut self, event: &Event) {
        self.dialog_mode = DialogMode::Edit;
        self.dialog_start = event.start.clone();
        self.dialog_end = event.end.clone().unwrap_or_default();
        self.dialog_label = event.label.clone();
        self.dialog_original_start = event.start.clone();
        self.dialog_error = None;
        self.show_dialog = true;
    }

    fn save_dialog(&mut self) {
        let start = self.dialog_start.trim().to_string();
        let end = self.dialog_end.trim().to_string();
        let label = self.dialog_label.trim().to_string();

        if !schedule::time::validate_clock(&start)
            || !schedule::time::validate_clock(&end)
            || label.is_empty()
        {
            self.dialog_error =
                Some("Enter a valid start time, end time (H:MM AM/PM), and activity.".to_string());
            return;
        }

        let result = match self.dialog_mode {
            DialogMode::Add => ops::add_event(
                &self.store,
                &self.prefs.aliases,
                &self.selected_day,
                &start,
                &end,
                &label,
            ),
            DialogMode::Edit => ops::update_event(
                &self.store,
                &self.prefs.aliases,
                &self.selected_day,
                &self.dialog_original_start,
                &start,
                &end,
                &label,
            ),
        };
        let success = match self.dialog_mode {
            DialogMode::Add => format!("Added {label} at {start}"),
            DialogMode::Edit => format!("Updated {label}"),
        };
        self.show_dialog = false;
        self.report(result, &success);
    }

    fn delete_pending(&mut self) {
        if let Some(event) = self.pending_delete.take() {
            let result = ops::delete_event(
                &self.store,
                &self.prefs.aliases,
                &self.selected_day,
                &event.start,
            );
            self.report(result, &format!("Deleted {}", event.label));
        }
    }

    fn restore_backup(&mut self) {
        match self.store.restore_latest() {
            Ok(Some(_)) => {
                self.status_message = Some(("Restored the last backup".to_string(), false));
                self.reload();
            }
            Ok(None) => {
                self.status_message = Some(("No backups found, nothing to undo".to_string(), true));
            }
            Err(e) => {
                error!(error = %e, "restore failed");
                self.status_message = Some((format!("Undo failed: {e:#}"), true));
            }
        }
    }

    fn toggle_dark_mode(&mut self, ctx: &egui::Context) {
        self.prefs.dark_mode = !self.prefs.dark_mode;
        super::setup_theme(ctx, self.prefs.dark_mode);
        if let Err(e) = self.prefs.save() {
            error!(error = %e, "failed to save preferences");
            self.status_message = Some((format!("Failed to save preferences: {e:#}"), true));
        }
    }

    /// Restore-confirmation text with the backup's timestamp, when one exists.
    fn restore_prompt(&self) -> String {
        let stamp = self
            .store
            .latest_backup()
            .ok()
            .flatten()
            .as_deref()
            .and_then(Store::backup_timestamp);
        match stamp {
            Some(dt) => format!(
                "Revert to the backup from {}?",
                dt.format("%A, %B %d, %Y at %-I:%M:%S %p")
            ),
            None => "Revert to the most recent backup?".to_string(),
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let today = today_name();
        ui.horizontal(|ui| {
            if self.compact {
                ui.heading(format!("Today - {}", self.selected_day));
            } else {
                egui::ComboBox::from_id_salt("day_select")
                    .selected_text(&self.selected_day)
                    .show_ui(ui, |ui| {
                        for day in DAYS_OF_WEEK {
                            ui.selectable_value(&mut self.selected_day, day.to_string(), day);
                        }
                    });

                if ui.button("Reset to Today").clicked() {
                    self.selected_day = today.clone();
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if !self.compact {
                    let mode_label = if self.prefs.dark_mode {
                        format!("{} Light Mode", egui_phosphor::regular::SUN)
                    } else {
                        format!("{} Dark Mode", egui_phosphor::regular::MOON)
                    };
                    if ui.button(mode_label).clicked() {
                        self.toggle_dark_mode(ctx);
                    }
                    if ui.button("Undo Last Change").clicked() {
                        self.show_restore_confirm = true;
                    }
                }
                if ui
                    .button(format!("{} Add Event", egui_phosphor::regular::PLUS))
                    .clicked()
                {
                    self.open_add_dialog();
                }
            });
        });
    }

    fn render_day(&mut self, ui: &mut egui::Ui) {
        let today = today_name();
        let is_today = self.selected_day == today;
        let now = Local::now().naive_local();
        let dark = self.prefs.dark_mode;

        let events: Vec<Event> = self
            .view
            .events_of(&self.selected_day)
            .cloned()
            .unwrap_or_default();

        let mut clicked_event: Option<Event> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for event in &events {
                let duration =
                    normalize::duration_with_fallback(&self.view, &self.selected_day, event);

                // Off-today days render uniformly muted.
                let (color, highlight) = if is_today {
                    let status = views::event_status(event, now);
                    let highlight = (status == EventStatus::Ongoing).then(|| theme::ongoing_bg(dark));
                    (theme::status_color(status, dark), highlight)
                } else {
                    (theme::muted_color(dark), None)
                };

                if views::render_event_row(ui, event, duration, color, highlight) {
                    clicked_event = Some(event.clone());
                }
            }

            views::render_day_footer(
                ui,
                normalize::allocated_hours(&self.view, &self.selected_day),
                theme::muted_color(dark),
            );

            if !self.compact {
                views::render_weekly_summary(ui, &normalize::weekly_summary(&self.view));
            }
        });

        if let Some(event) = clicked_event {
            self.open_edit_dialog(&event);
        }
    }

    fn render_dialog(&mut self, ctx: &egui::Context) {
        let title = match self.dialog_mode {
            DialogMode::Add => "Add Event",
            DialogMode::Edit => "Edit Event",
        };

        let mut save = false;
        let mut cancel = false;
        let mut delete = false;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(theme::dialog_frame(self.prefs.dark_mode))
            .show(ctx, |ui| {
                ui.label("Start Time (H:MM AM/PM):");
                ui.text_edit_singleline(&mut self.dialog_start);
                ui.label("End Time (H:MM AM/PM):");
                ui.text_edit_singleline(&mut self.dialog_end);
                ui.label("Activity:");
                ui.text_edit_singleline(&mut self.dialog_label);

                if let Some(err) = &self.dialog_error {
                    ui.colored_label(egui::Color32::from_rgb(224, 80, 80), err);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if self.dialog_mode == DialogMode::Edit
                        && ui
                            .button(format!("{} Delete", egui_phosphor::regular::TRASH))
                            .clicked()
                    {
                        delete = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if save {
            self.save_dialog();
        }
        if delete {
            let events = self.view.events_of(&self.selected_day);
            self.pending_delete = events.and_then(|evs| {
                evs.iter()
                    .find(|e| e.start == self.dialog_original_start)
                    .cloned()
            });
            self.show_dialog = false;
            self.show_delete_confirm = self.pending_delete.is_some();
        }
        if cancel {
            self.show_dialog = false;
        }
    }

    fn render_delete_confirm(&mut self, ctx: &egui::Context) {
        let mut confirm = false;
        let mut cancel = false;

        egui::Window::new("Delete Event")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(theme::dialog_frame(self.prefs.dark_mode))
            .show(ctx, |ui| {
                if let Some(event) = &self.pending_delete {
                    ui.label("Are you sure you want to delete this event?");
                    ui.label(RichText::new(format!("{}  {}", event.time_range(), event.label)).strong());
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        confirm = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if confirm {
            self.delete_pending();
            self.show_delete_confirm = false;
        }
        if cancel {
            self.pending_delete = None;
            self.show_delete_confirm = false;
        }
    }

    fn render_restore_confirm(&mut self, ctx: &egui::Context) {
        let mut confirm = false;
        let mut cancel = false;
        let prompt = self.restore_prompt();

        egui::Window::new("Undo Changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(theme::dialog_frame(self.prefs.dark_mode))
            .show(ctx, |ui| {
                ui.label(prompt);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Restore").clicked() {
                        confirm = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if confirm {
            self.restore_backup();
            self.show_restore_confirm = false;
        }
        if cancel {
            self.show_restore_confirm = false;
        }
    }
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Periodic re-read; there is no push model, the file is the truth.
        if self.last_refresh.elapsed() >= REFRESH_INTERVAL {
            if self.compact {
                self.selected_day = today_name();
            }
            self.reload();
        }
        ctx.request_repaint_after(Duration::from_secs(1));

        if self.show_dialog {
            self.render_dialog(ctx);
        }
        if self.show_delete_confirm {
            self.render_delete_confirm(ctx);
        }
        if self.show_restore_confirm {
            self.render_restore_confirm(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::same(12.0)))
            .show(ctx, |ui| {
                self.render_header(ui, ctx);

                if let Some((message, is_error)) = &self.status_message {
                    let color = if *is_error {
                        egui::Color32::from_rgb(224, 80, 80)
                    } else {
                        theme::muted_color(self.prefs.dark_mode)
                    };
                    ui.colored_label(color, message);
                }

                ui.separator();
                self.render_day(ui);
            });
    }
}
