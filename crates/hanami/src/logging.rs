//! File logging. The terminal belongs to the UI, so logs go to
//! `<data_local_dir>/hanami/hanami.log`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "HANAMI_LOG";

/// Install the global subscriber. Returns the log file path, or `None` when
/// logging could not be set up.
pub fn init() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "hanami")?;
    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir).ok()?;
    let path = dir.join("hanami.log");
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}
