use eframe::egui;
use taskmanager::app::TaskManagerApp;
use taskmanager::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging() {
    // RUST_LOG overrides; otherwise only warnings and errors reach stderr.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<(), eframe::Error> {
    init_logging();

    let config = Config::load();
    tracing::info!(tasks = %config.tasks_path().display(), "starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 550.0])
            .with_min_inner_size([420.0, 300.0])
            .with_resizable(true)
            .with_title("Task Manager")
            .with_app_id("taskmanager"),
        ..Default::default()
    };

    eframe::run_native(
        "Task Manager",
        options,
        Box::new(move |_cc| Ok(Box::new(TaskManagerApp::new(&config)))),
    )
}
