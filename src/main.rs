// SPDX-License-Identifier: GPL-3.0-only

use capture_screen::app::AppModel;
use capture_screen::i18n;
use capture_screen::screen::FeatureTarget;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "capture-screen")]
#[command(about = "Capture or pick a photo, crop it and hand it to a feature screen")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Feature screen to forward to (Scantext, ColorDetector, QRScanner)
    #[arg(short, long, global = true)]
    feature: Option<FeatureTarget>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run in terminal mode (renders the capture screen to the terminal)
    Terminal,

    /// List available cameras
    List,

    /// Capture, crop and print the route to the feature screen
    Photo {
        /// Camera index to use (from 'capture-screen list')
        #[arg(short, long)]
        camera: Option<usize>,

        /// Also run the feature screen on the cropped photo
        #[arg(short, long)]
        analyze: bool,
    },

    /// Run a feature screen on an existing image
    Analyze {
        /// Image file
        image: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=capture_screen=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Terminal) => capture_screen::terminal::run(cli.feature),
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Photo { camera, analyze }) => cli::take_photo(camera, cli.feature, analyze),
        Some(Commands::Analyze { image }) => {
            cli::analyze(image, cli.feature.unwrap_or_default())
        }
        None => run_gui(cli.feature),
    }
}

fn run_gui(feature: Option<FeatureTarget>) -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(480.0),
    );

    cosmic::app::run::<AppModel>(settings, feature)?;

    Ok(())
}
