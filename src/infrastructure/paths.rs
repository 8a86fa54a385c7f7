//! Path resolution for configuration and trace output.
//!
//! Tilde expansion and the default data directory both depend on `HOME`. The
//! `_with` variants take the home directory explicitly so they can be tested
//! without touching the process environment.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "eval-console";

/// Data directory used when `HOME` is not set.
const FALLBACK_DATA_DIR: &str = ".eval-console";

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expands a leading `~` against `HOME`.
///
/// # Examples
///
/// ```
/// use eval_console::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), std::path::PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, home_dir().as_deref())
}

/// Expands a leading `~` against the given home directory.
///
/// Paths without a leading `~`, and every path when `home` is `None`, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use eval_console::infrastructure::paths::expand_tilde_with;
/// use std::path::{Path, PathBuf};
///
/// let home = Path::new("/home/reviewer");
/// assert_eq!(expand_tilde_with("~/traces", Some(home)), PathBuf::from("/home/reviewer/traces"));
/// assert_eq!(expand_tilde_with("~", Some(home)), PathBuf::from("/home/reviewer"));
/// assert_eq!(expand_tilde_with("~/traces", None), PathBuf::from("~/traces"));
/// ```
#[must_use]
pub fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (_, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        _ => PathBuf::from(path),
    }
}

/// Returns the directory for trace output.
///
/// A configured directory wins (with `~` expanded); otherwise
/// `$HOME/.local/share/eval-console`, or `./.eval-console` without `HOME`.
#[must_use]
pub fn data_dir(configured: Option<&str>) -> PathBuf {
    data_dir_with(configured, home_dir().as_deref())
}

/// [`data_dir`] with an explicit home directory.
#[must_use]
pub fn data_dir_with(configured: Option<&str>, home: Option<&Path>) -> PathBuf {
    match (configured.filter(|dir| !dir.trim().is_empty()), home) {
        (Some(dir), _) => expand_tilde_with(dir.trim(), home),
        (None, Some(home)) => home.join(".local").join("share").join(APP_DIR),
        (None, None) => PathBuf::from(FALLBACK_DATA_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_wins() {
        let home = Path::new("/home/r");
        assert_eq!(data_dir_with(Some("/var/traces"), Some(home)), PathBuf::from("/var/traces"));
        assert_eq!(data_dir_with(Some("~/t"), Some(home)), PathBuf::from("/home/r/t"));
    }

    #[test]
    fn default_dir_under_home() {
        assert_eq!(
            data_dir_with(None, Some(Path::new("/home/r"))),
            PathBuf::from("/home/r/.local/share/eval-console")
        );
    }

    #[test]
    fn blank_config_falls_back() {
        assert_eq!(data_dir_with(Some("  "), None), PathBuf::from(".eval-console"));
    }

    #[test]
    fn tilde_inside_path_is_literal() {
        assert_eq!(
            expand_tilde_with("/data/~/x", Some(Path::new("/home/r"))),
            PathBuf::from("/data/~/x")
        );
    }
}
