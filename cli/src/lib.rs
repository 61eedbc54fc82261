pub mod args;
pub mod error;

pub use args::Cli;
pub use error::CliError;
pub use error::Result;

use gobundle_core::Bundler;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;

/// Log to stderr at a level picked by `-v` count; `RUST_LOG` wins when set
pub fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::Logging(e.to_string()))
}

/// Bundle the project described by `cli` and write it out. Returns the
/// path written.
pub fn run(cli: Cli) -> Result<PathBuf> {
    let config = cli.into_config()?;
    let output = config.output_path();
    let report = Bundler::new(config).run()?;

    std::fs::write(&output, &report.text).map_err(|source| CliError::WriteBundle {
        path: output.clone(),
        source,
    })?;
    info!(path = %output.display(), files = report.bundle.files.len(), "bundle written");
    Ok(output)
}
