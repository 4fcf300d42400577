// ============================================================================
// PixelFE CLI — headless access to the artwork store
// ============================================================================
//
// Usage examples:
//   pixelfe --list
//   pixelfe --export "My Artwork" --output art.png
//   pixelfe --export-all --output-dir exported/
//
// No GUI is opened in CLI mode. Artworks are read from the same JSON store
// the GUI uses (override with --store for backups or tests).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use crate::io;
use crate::store::ArtworkStore;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// PixelFE headless artwork exporter.
///
/// List saved pixel artworks and export them as PNG files — no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "pixelfe",
    about = "PixelFE headless artwork exporter",
    long_about = "List the artworks saved by the PixelFE editor and export them\n\
                  as standalone PNG files without opening a window.\n\n\
                  Example:\n  \
                  pixelfe --list\n  \
                  pixelfe --export \"My Artwork\" --output art.png\n  \
                  pixelfe --export-all --output-dir exported/"
)]
pub struct CliArgs {
    /// List saved artworks (name, grid size, save time).
    #[arg(short, long)]
    pub list: bool,

    /// Export one artwork by name.
    #[arg(short, long, value_name = "NAME")]
    pub export: Option<String>,

    /// Export every saved artwork.
    #[arg(long)]
    pub export_all: bool,

    /// Output file path for --export. Defaults to "<name>.png" in the
    /// current directory.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for --export-all (created if missing).
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Use an alternative store file instead of the default location.
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process
    /// arguments. Used by `main()` to route before creating a window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| {
            a == "--list" || a == "-l" || a == "--export" || a == "-e" || a == "--export-all"
        })
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = success, `1` = any failure.
pub fn run(args: CliArgs) -> ExitCode {
    let store_path = args
        .store
        .clone()
        .unwrap_or_else(ArtworkStore::default_path);
    let store = match ArtworkStore::open(store_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: could not open artwork store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.list {
        if store.is_empty() {
            println!("no saved artworks.");
            return ExitCode::SUCCESS;
        }
        for (name, record) in store.iter() {
            println!(
                "{:<32} {:>5}  {}",
                name,
                format!("{0}×{0}", record.grid_size),
                record.saved_at
            );
        }
        return ExitCode::SUCCESS;
    }

    if let Some(name) = &args.export {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.png", io::sanitize_filename(name))));
        return match export_one(&store, name, &output) {
            Ok(()) => {
                println!("{} → {}", name, output.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if args.export_all {
        if let Err(e) = std::fs::create_dir_all(&args.output_dir) {
            eprintln!(
                "error: could not create output directory '{}': {}",
                args.output_dir.display(),
                e
            );
            return ExitCode::FAILURE;
        }
        let mut any_failure = false;
        for (name, _) in store.iter() {
            let output = args
                .output_dir
                .join(format!("{}.png", io::sanitize_filename(name)));
            match export_one(&store, name, &output) {
                Ok(()) => println!("{} → {}", name, output.display()),
                Err(e) => {
                    eprintln!("error: {}: {}", name, e);
                    any_failure = true;
                }
            }
        }
        return if any_failure {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    eprintln!("nothing to do: pass --list, --export NAME, or --export-all.");
    ExitCode::FAILURE
}

/// Decode one stored artwork and write it to `output` as PNG.
fn export_one(store: &ArtworkStore, name: &str, output: &Path) -> Result<(), String> {
    let canvas = store.load(name).map_err(|e| e.to_string())?;
    let png = canvas.encode_png().map_err(|e| e.to_string())?;
    io::write_png(&png, output).map_err(|e| format!("write failed: {}", e))
}
