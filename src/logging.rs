use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

/// `$HOME/.git-graph/log`
pub fn log_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join(".git-graph").join("log"))
}

/// Install the global subscriber. Writes to a timestamped file under
/// [`log_dir`], or to stderr when that is not possible.
pub fn init(level: Level) {
    match open_log_file() {
        Ok(file) => tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(err) => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
            tracing::warn!("logging to stderr: {:#}", err);
        }
    }
}

fn open_log_file() -> Result<File> {
    let dir = log_dir().context("HOME is not set")?;
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(log_file_name(Local::now()));
    File::create(&path).with_context(|| format!("Failed to create {}", path.display()))
}

fn log_file_name<Tz: chrono::TimeZone>(now: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.log", now.format("%Y-%m-%d-%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_log_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log_file_name(now), "2024-03-09-07-05-01.log");
    }
}
