//! Compact variant of the main GUI: a small always-on-top window pinned
//! to today's schedule.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use tracing::{error, warn};

use weekplan::lock::InstanceLock;
use weekplan::ui::ScheduleApp;

fn main() -> eframe::Result<()> {
    weekplan::init_logging();

    let _lock = match InstanceLock::acquire("weekplan-today.lock") {
        Ok(Some(lock)) => Some(lock),
        Ok(None) => {
            error!("another instance is already running, exiting");
            return Ok(());
        }
        Err(e) => {
            warn!(error = %e, "could not create instance lock");
            None
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([380.0, 520.0])
        .with_min_inner_size([320.0, 400.0])
        .with_always_on_top()
        .with_title("Weekplan - Today");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Weekplan - Today",
        options,
        Box::new(|cc| Ok(Box::new(ScheduleApp::new_compact(cc)))),
    )
}
