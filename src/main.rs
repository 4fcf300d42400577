use std::process::ExitCode;

use eframe::egui;

use pixelfe::app::PixelFEApp;
use pixelfe::{cli, logger};

fn main() -> ExitCode {
    // -- CLI / headless mode ----------------------------------------------
    if cli::CliArgs::is_cli_mode() {
        use clap::Parser;
        let args = cli::CliArgs::parse();
        return cli::run(args);
    }

    // -- GUI mode -----------------------------------------------------------

    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 560.0])
            .with_title("PixelFE"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "PixelFE",
        options,
        Box::new(|cc| Box::new(PixelFEApp::new(cc))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: failed to start PixelFE: {}", e);
            ExitCode::FAILURE
        }
    }
}
