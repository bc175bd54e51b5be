use std::io::{self, BufRead};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rotalog::config::{self, LoggerConfig};
use rotalog::{LogLevel, Logger};

/// Split an optional `level: ` prefix off a line, defaulting to `Info`
fn split_level(line: &str) -> (LogLevel, &str) {
    if let Some((prefix, rest)) = line.split_once(": ") {
        if let Ok(level) = prefix.parse() {
            return (level, rest);
        }
    }
    (LogLevel::Info, line)
}

fn main() -> Result<()> {
    // Diagnostics from the logger itself go to stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rotalog=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match config::config_file_path() {
        Some(path) => LoggerConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => LoggerConfig::default(),
    };

    let logger = Logger::init(Some(config)).context("Failed to initialize logger")?;
    if let Some(path) = logger.log_file_path() {
        tracing::info!("Logging to: {}", path.display());
    }

    // Pipe stdin into the logger, one record per line
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read standard input")?;
        if line.trim().is_empty() {
            continue;
        }
        let (level, message) = split_level(&line);
        logger
            .log(level, None, format_args!("{}", message))
            .context("Failed to write log line")?;
    }

    logger.close().context("Failed to close logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_level_prefix() {
        assert_eq!(split_level("warn: disk low"), (LogLevel::Warn, "disk low"));
        assert_eq!(split_level("CRIT: on fire"), (LogLevel::Critical, "on fire"));
    }

    #[test]
    fn test_split_level_defaults_to_info() {
        assert_eq!(split_level("plain message"), (LogLevel::Info, "plain message"));
        assert_eq!(split_level("note to self: hi"), (LogLevel::Info, "note to self: hi"));
    }
}
