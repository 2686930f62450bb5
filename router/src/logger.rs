// Logger setup
// Colored console output with an optional plain-text file sink

use std::path::Path;

use accredit_common::config::VERSION;
use fern::colors::{Color, ColoredLevelConfig};
use log::{info, LevelFilter};

use crate::config::RouterConfig;

/// Install the global logger.
///
/// Fails if a logger was already installed or the log file can't be opened.
pub fn setup_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new().level(level).chain(console);

    if let Some(path) = log_file {
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}] [{}] [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::log_file(path)?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;
    info!("Accredit router {} (log level {})", VERSION, level);
    Ok(())
}

/// Install the global logger with the level and file of `config`
pub fn setup_logger_from_config(config: &RouterConfig) -> Result<(), fern::InitError> {
    setup_logger(
        config.log_level.into(),
        config.log_file.as_deref().map(Path::new),
    )
}
