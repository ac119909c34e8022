use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::app_dirs::AppDirs;
use crate::error::Result;

/// Level used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Open (creating parents) the log file in append mode
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Route `log` output to a file; the terminal belongs to the UI.
///
/// Returns the path being written to.
pub fn init(path: Option<PathBuf>) -> Result<PathBuf> {
    let path = path
        .or_else(AppDirs::log_path)
        .unwrap_or_else(|| PathBuf::from("lightsout.log"));
    let file = open_log_file(&path)?;

    Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;

    Ok(path)
}
