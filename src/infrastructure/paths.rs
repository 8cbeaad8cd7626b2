//! Filesystem locations used by the client.
//!
//! Everything the client keeps on disk lives under one data directory:
//!
//! ```text
//! <data_dir>/
//! ├── credentials.json        # bearer token and user
//! ├── snapshots/<store>.json  # persisted collections
//! └── pump-inventory-otlp.json
//! ```

use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

const APP_QUALIFIER: &str = "";
const APP_ORG: &str = "";
const APP_DIR: &str = "pump-inventory";

/// Default data directory.
///
/// The platform data folder for `pump-inventory` as reported by
/// [`ProjectDirs::data_dir`], e.g. `~/.local/share/pump-inventory` on Linux and
/// `%APPDATA%\pump-inventory\data` on Windows.
///
/// Falls back to `./.pump-inventory` when no home directory is known.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_DIR).map_or_else(
        || PathBuf::from(format!(".{APP_DIR}")),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Resolves a configured data directory, expanding a leading `~`.
#[must_use]
pub fn resolve_data_dir(configured: Option<&str>) -> PathBuf {
    configured
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map_or_else(default_data_dir, |dir| expand_tilde(dir, home_dir().as_deref()))
}

/// Expands `~` and `~/...` against `home`. Other paths are returned as is.
///
/// # Examples
///
/// ```
/// use pump_inventory::infrastructure::expand_tilde;
/// use std::path::{Path, PathBuf};
///
/// let home = Some(Path::new("/home/ana"));
/// assert_eq!(expand_tilde("~/inventory", home), PathBuf::from("/home/ana/inventory"));
/// assert_eq!(expand_tilde("/var/lib/inventory", home), PathBuf::from("/var/lib/inventory"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}

/// Stored bearer token and user.
///
/// # Parameters
///
/// * `data_dir` - Resolved data directory
///
/// # Returns
///
/// `<data_dir>/credentials.json`
#[must_use]
pub fn credentials_file(data_dir: &Path) -> PathBuf {
    data_dir.join("credentials.json")
}

/// Directory holding one snapshot file per store.
#[must_use]
pub fn snapshots_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("snapshots")
}

/// OTLP JSON span export file.
#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{APP_DIR}-otlp.json"))
}
