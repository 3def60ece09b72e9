use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Resolve the server home directory to an absolute path.
///
/// * `Some("~/x")` expands `~` to the user's home directory.
/// * `Some("relative")` is taken relative to the current directory.
/// * `None` uses `default_subdir` under `%APPDATA%` on Windows and `$HOME` elsewhere.
///
/// With `create`, the directory is created when missing.
pub fn resolve_home_dir(configured: Option<String>, default_subdir: &str, create: bool) -> Result<PathBuf> {
    let resolved = match configured {
        Some(path) => absolute(expand_tilde(&path)?)?,
        None => platform_base()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("Failed to create home_dir {}", resolved.display()))?;
    }
    Ok(resolved)
}

fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return user_home();
    }
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => Ok(user_home()?.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine the user's home directory"))
}

#[cfg(target_os = "windows")]
fn platform_base() -> Result<PathBuf> {
    dirs::data_dir().ok_or_else(|| anyhow!("Cannot determine %APPDATA%"))
}

#[cfg(not(target_os = "windows"))]
fn platform_base() -> Result<PathBuf> {
    user_home()
}

/// `path` when absolute, otherwise `path` under `base`.
pub fn under(base: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn tilde_expands_to_the_user_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let resolved = resolve_home_dir(Some("~/.stamhoofd_paths".into()), ".unused", false).unwrap();
        assert_eq!(resolved, home.join(".stamhoofd_paths"));
    }

    #[test]
    fn absolute_paths_are_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested").join("home");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().into_owned()), ".unused", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_paths_become_absolute() {
        let resolved = resolve_home_dir(Some("relative/home".into()), ".unused", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("relative/home"));
    }

    #[cfg(unix)]
    #[test]
    fn log_files_resolve_under_home() {
        let base = Path::new("/srv/stamhoofd");
        assert_eq!(under(base, "logs/api.log"), base.join("logs/api.log"));
        assert_eq!(under(base, "/var/log/api.log"), PathBuf::from("/var/log/api.log"));
    }
}
