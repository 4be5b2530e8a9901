use std::fs::File;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use zeus_explorer::config::Config;
use zeus_explorer::{Error, Result};

/// Install the global subscriber. The terminal UI owns stdout, so
/// interactive runs log to `cfg.log_file`; headless runs log to stderr.
pub fn init(cfg: &Config, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .map_err(|e| Error::Config(format!("log level {:?}: {}", cfg.log_level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = if headless {
        builder.with_writer(io::stderr).try_init()
    } else {
        let file = File::create(&cfg.log_file)?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    };
    installed.map_err(|e| Error::Config(format!("logging: {}", e)))
}
