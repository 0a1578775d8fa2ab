#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use tracing::{error, warn};

use weekplan::lock::InstanceLock;
use weekplan::ui::ScheduleApp;

fn main() -> eframe::Result<()> {
    weekplan::init_logging();

    let _lock = match InstanceLock::acquire("weekplan.lock") {
        Ok(Some(lock)) => Some(lock),
        Ok(None) => {
            error!("another instance is already running, exiting");
            return Ok(());
        }
        Err(e) => {
            // The lock is advisory; failing to create it should not block
            // the app.
            warn!(error = %e, "could not create instance lock");
            None
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([800.0, 600.0])
        .with_min_inner_size([600.0, 480.0])
        .with_title("Weekplan");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Weekplan",
        options,
        Box::new(|cc| Ok(Box::new(ScheduleApp::new(cc)))),
    )
}
