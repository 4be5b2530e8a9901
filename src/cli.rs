//! Command-line interface.
//!
//! Flags override values from the optional `--config` TOML file, which in
//! turn override the built-in defaults.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use zeus_explorer::config::Config;
use zeus_explorer::{Result, RunMode};

pub fn build_cli() -> Command {
    Command::new("zeus-explorer")
        .about("Explore the DIS kinematic plane at HERA beam energies, with and without ISR")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Beam configuration: HER, MER, LER or ALL"),
        )
        .arg(
            Arg::new("no-isr")
                .long("no-isr")
                .help("Disable initial state radiation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed the event generator for a reproducible run")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("batch-size")
                .long("batch-size")
                .help("Events generated per frame (default: 5)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("buffer")
                .long("buffer")
                .help("Events kept on the kinematic plane (default: 800)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("tick-ms")
                .long("tick-ms")
                .help("Frame period in milliseconds (default: 16)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Log file used while the terminal UI is active")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log filter when RUST_LOG is unset (default: info)"),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .help("Generate N events without the UI and print them as JSON lines")
                .value_name("N")
                .value_parser(value_parser!(u64)),
        )
}

/// Resolve the effective configuration from parsed arguments.
pub fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    let mut cfg = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(mode) = matches.get_one::<String>("mode") {
        cfg.mode = mode.parse::<RunMode>()?;
    }
    if matches.get_flag("no-isr") {
        cfg.allow_isr = false;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        cfg.seed = Some(*seed);
    }
    if let Some(n) = matches.get_one::<usize>("batch-size") {
        cfg.batch_size = *n;
    }
    if let Some(n) = matches.get_one::<usize>("buffer") {
        cfg.buffer_capacity = *n;
    }
    if let Some(ms) = matches.get_one::<u64>("tick-ms") {
        cfg.tick_ms = *ms;
    }
    if let Some(path) = matches.get_one::<PathBuf>("log-file") {
        cfg.log_file = path.clone();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        cfg.log_level = level.clone();
    }

    cfg.validate()?;
    Ok(cfg)
}
