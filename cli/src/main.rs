use clap::Parser;
use gobundle_cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    gobundle_cli::init_tracing(cli.verbose)?;

    let output = gobundle_cli::run(cli)?;
    println!("AI-friendly Go project bundle created: {}", output.display());
    Ok(())
}
