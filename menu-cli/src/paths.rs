//! Where the CLI keeps its log files.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "menu-editor";
const APPLICATION: &str = "menu";

const LATEST_LOG: &str = "latest.log";

/// Archived logs kept next to `latest.log`.
const KEEP_ARCHIVED: usize = 10;

/// Cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/menu` or `~/.cache/menu`
/// - macOS: `~/Library/Caches/dev.menu-editor.menu`
/// - Windows: `C:\Users\<User>\AppData\Local\menu-editor\menu\cache`
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the log file for the current run.
pub fn log_file() -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archives the previous run's log under a timestamped name and prunes old
/// archives. Must run before the new log file is created.
pub fn rotate_logs() {
    let Some(dir) = log_dir() else { return };
    let latest = dir.join(LATEST_LOG);

    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, dir.join(format!("{}.log", stamp)));
    }

    prune_archived(&dir);
}

fn prune_archived(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut archived: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    if archived.len() <= KEEP_ARCHIVED {
        return;
    }

    // Oldest first.
    archived.sort_by_key(|entry| entry.metadata().and_then(|meta| meta.modified()).ok());
    let excess = archived.len() - KEEP_ARCHIVED;
    for entry in &archived[..excess] {
        let _ = fs::remove_file(entry.path());
    }
}
