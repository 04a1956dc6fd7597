//! routeplan - plan the static build of a website source tree.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use routeplan::{
    cli::{Cli, Commands, check, classify, plan},
    config::SiteConfig,
    log, logger,
};

fn main() {
    if let Err(err) = run() {
        log!("error"; "{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Plan { output, pretty, .. } => {
            plan::run_plan(&config, output.as_deref(), *pretty)
        }
        Commands::Check { strict, .. } => check::run_check(&config, *strict),
        Commands::Classify { paths, .. } => classify::run_classify(&config, paths),
    }
}
