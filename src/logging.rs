use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

const DEFAULT_FILTER: &str = "info";

/// Installs the global tracing subscriber.
///
/// The terminal owns stdout and stderr while a game runs, so events are only
/// written when `log_file` is given. `RUST_LOG` overrides the default filter.
pub fn init(log_file: Option<&Path>) -> Result<(), AppError> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = open_log_file(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    File::options().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{init, open_log_file};

    #[test]
    fn no_log_file_is_a_noop() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn log_file_and_parent_are_created() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("worm-log-tests-{nanos}"));
        let path = dir.join("worm.log");

        let _file = open_log_file(&path).expect("log file should open");

        assert!(path.exists());
        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(&dir);
    }
}
