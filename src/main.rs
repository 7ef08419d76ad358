use std::cell::Cell;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use eframe::egui;
use strip_label::{AnnotationSession, Cli, Config};

mod app;

use app::{SelectionApp, STATUS_BAR_HEIGHT, TITLE};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // exits with status 2 on usage errors
    let cli = Cli::parse();

    let (config, session) = match Config::from_cli(cli).and_then(|config| {
        let session = AnnotationSession::from_config(&config)?;
        Ok((config, session))
    }) {
        Ok(started) => started,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let display_width = config.settings.display_width;
    let display_height = session.display_size().map(|(_, h)| h).unwrap_or(0);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                display_width as f32,
                display_height as f32 + STATUS_BAR_HEIGHT,
            ])
            .with_resizable(false)
            .with_title(TITLE),
        ..Default::default()
    };

    let failed = Rc::new(Cell::new(false));
    let app_failed = Rc::clone(&failed);
    let result = eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(SelectionApp::new(
                session,
                display_width,
                app_failed,
            )))
        }),
    );

    if let Err(e) = result {
        log::error!("window system error: {e}");
        return ExitCode::FAILURE;
    }
    if failed.get() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
