// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use filter_camera::app::AppModel;
use filter_camera::backends::camera::Facing;
use filter_camera::constants::ui;
use filter_camera::filters::FilterType;
use filter_camera::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "filter-camera")]
#[command(about = "Capture, filter and save photos on the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Take a filtered photo
    Photo {
        /// Camera to use (back or front)
        #[arg(short, long, default_value = "back")]
        facing: Facing,

        /// Filter to apply (normal, sepia, grayscale, vintage)
        #[arg(short = 'F', long, default_value = "normal")]
        filter: FilterType,

        /// Output file or directory (default: save into the album)
        #[arg(short, long, conflicts_with = "album")]
        output: Option<PathBuf>,

        /// Album to save into (default: the configured album)
        #[arg(short, long)]
        album: Option<String>,
    },

    /// Send a push message to the running app
    Push {
        /// Notification title
        #[arg(short, long)]
        title: Option<String>,

        /// Notification body
        #[arg(short, long)]
        body: Option<String>,

        /// Extra data as key=value (repeatable)
        #[arg(short, long = "data", value_parser = cli::parse_key_value)]
        data: Vec<(String, String)>,

        /// Token of the receiving installation (default: this one)
        #[arg(long)]
        token: Option<String>,
    },

    /// Print this installation's push token
    Token,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=filter_camera=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Photo {
            facing,
            filter,
            output,
            album,
        }) => cli::take_photo(facing, filter, output, album),
        Some(Commands::Push {
            title,
            body,
            data,
            token,
        }) => cli::push(title, body, data, token),
        Some(Commands::Token) => cli::token(),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(ui::MIN_WINDOW_WIDTH)
            .min_height(ui::MIN_WINDOW_HEIGHT),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
