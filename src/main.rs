mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use chess_profile::config::DEFAULT_CONFIG_FILE;
use chess_profile::report::{self, ReportOptions};
use chess_profile::{AnalysisConfig, aggregate, read_games};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    chess_profile::chess::log::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    args.apply(&mut config);

    let username = config
        .username
        .clone()
        .context("no player given; pass --user or set `username` in the config file")?;

    let games = read_games(&args.inputs, config.compression).context("reading games failed")?;
    log::info!("read {} games from {} input(s)", games.len(), args.inputs.len());

    let bundle = aggregate(&games, &username, config.time_control_policy)
        .with_context(|| format!("aggregating games for '{username}' failed"))?;

    let options = ReportOptions::from(&config);
    if args.json {
        println!("{}", report::render_json(&bundle, &options)?);
    } else {
        print!("{}", report::render_text(&bundle, &options));
    }
    Ok(())
}
