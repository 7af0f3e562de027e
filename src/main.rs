use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use waypoint::core::config::{load_config, resolve};

#[derive(Parser)]
#[command(name = "waypoint", about = "Navigation coordinator demo")]
struct Args {
    /// Animate transitions (pushes complete one tick later)
    #[arg(long)]
    animated: bool,

    /// Complete transitions immediately
    #[arg(long)]
    no_animated: bool,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn animated(&self) -> Option<bool> {
        match (self.animated, self.no_animated) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let config = load_config().map_err(std::io::Error::other)?;
    let resolved = resolve(&config, args.animated(), args.log_level.as_deref());

    // Initialize file logger
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!(
        "Waypoint starting up (animated: {}, log: {})",
        resolved.animated,
        resolved.log_file.display()
    );

    waypoint::tui::run(resolved)
}
