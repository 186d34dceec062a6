use crate::infrastructure::NavdeckConfig;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("bad log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("logger already installed: {0}")]
    Init(String),
}

/// Installs the global subscriber, writing to the configured log file.
///
/// The terminal belongs to the UI, so nothing is written to stdout or
/// stderr. `RUST_LOG` overrides the configured filter when set.
pub fn init_logging(config: &NavdeckConfig) -> Result<(), LoggingError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|source| LoggingError::Open {
            path: config.log_file.clone(),
            source,
        })?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bad_filter_rejected() {
        let dir = tempdir().unwrap();
        let config = NavdeckConfig {
            log_file: dir.path().join("navdeck.log"),
            log_filter: "navdeck=loud".to_string(),
            ..NavdeckConfig::default()
        };
        // RUST_LOG may be set in the environment running the tests
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(init_logging(&config), Err(LoggingError::Filter(_))));
        }
    }

    #[test]
    fn test_unwritable_log_path() {
        let dir = tempdir().unwrap();
        let config = NavdeckConfig {
            log_file: dir.path().join("missing").join("navdeck.log"),
            ..NavdeckConfig::default()
        };
        assert!(matches!(init_logging(&config), Err(LoggingError::Open { .. })));
    }
}
