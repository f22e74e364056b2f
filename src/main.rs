//! tola-freeze - content-addressed asset freezing for static sites.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tola_freeze::cli::{self, Cli, Commands};
use tola_freeze::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose());

    match &cli.command {
        Commands::Init { path, dry } => {
            cli::init::write_config(path.as_deref().unwrap_or(&cli.config), *dry)
        }
        Commands::Freeze { args } => {
            let config = cli::load_config(&cli.config, args.overrides())?;
            cli::freeze::run_freeze(&args.input, &args.output, &config)
        }
        Commands::Resolve { args } => {
            let config = cli::load_config(&cli.config, args.overrides())?;
            cli::resolve::resolve_map_file(&args.map_file, &config)
        }
    }
}
