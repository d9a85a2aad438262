//! Command-line converter for iOS application snapshot caches.
//!
//! Converts single `.ktx` snapshots or whole extracted snapshot directories
//! into PNG images.

mod commands;
mod launch_params;

use std::process::ExitCode;

use launch_params::Command;

fn run(command: Command) -> ktxsnap::Result<()> {
    match command {
        Command::Convert { input, output } => commands::convert(&input, &output),
        Command::Extract { input, output } => commands::extract(&input, &output),
        Command::Inspect { input } => {
            println!("{}", commands::inspect(&input)?);
            Ok(())
        }
        Command::Batch(options) => {
            commands::batch(&options)?;
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(launch_params::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
