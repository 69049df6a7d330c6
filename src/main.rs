//! Gaze detection command line tool for single-frame processing.

use anyhow::Result;
use clap::Parser;
use gaze_detection::app::{AppConfig, GazeApp};
use gaze_detection::config::Config;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Frame image to process (loaded as grayscale)
    #[arg(short = 'F', long)]
    frame: PathBuf,

    /// JSON file with the frame's face observations
    #[arg(short = 'f', long)]
    faces: PathBuf,

    /// Write the JSON frame report to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Gaze Detection - Rust Port");

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    let app_config = AppConfig {
        frame_path: args.frame,
        faces_path: args.faces,
        output_path: args.output,
        config,
    };

    // Create and run application
    let mut app = GazeApp::new(app_config)?;
    let report = app.run()?;

    println!(
        "{} of {} face(s) looking toward camera{}",
        report.faces_looking,
        report.faces_total,
        if report.capture { " - capture!" } else { "" }
    );

    Ok(())
}
