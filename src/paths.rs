//! Path resolution for znt
//!
//! # Environment Variables
//!
//! - `ZNT_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/znt`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `ZNT_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/znt` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\znt`
//!    - macOS/Linux: `~/.config/znt`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "ZNT_CONFIG_DIR";

const APP_DIR: &str = "znt";

/// Get the znt config directory path
pub fn config_dir() -> Result<PathBuf> {
    // 1. Check environment variable override
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    // 2. Check XDG_CONFIG_HOME
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join(APP_DIR);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    // 3. Platform default
    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join(APP_DIR);
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join(APP_DIR);
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left untouched.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    /// Serializes tests that change process environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        match ENV_LOCK.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Run `f` with `key` set to `value`, restoring the previous value after.
    ///
    /// # Safety
    /// Uses unsafe env::set_var/remove_var; callers hold [`env_guard`].
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    fn without_env_var<F, R>(key: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::remove_var(key) };
        let result = f();
        if let Some(v) = original {
            // SAFETY: Tests run in isolation
            unsafe { env::set_var(key, v) };
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        let _env = env_guard();
        with_env_var(ENV_CONFIG_DIR, "/custom/znt/config", || {
            let result = config_dir().unwrap();
            assert_eq!(result, PathBuf::from("/custom/znt/config"));
        });
    }

    #[test]
    fn test_config_dir_env_override_with_tilde() {
        let _env = env_guard();
        let home = dirs::home_dir().unwrap();
        let expected = home.join("dotfiles").join("znt-tilde-test");
        with_env_var(ENV_CONFIG_DIR, "~/dotfiles/znt-tilde-test", || {
            let result = config_dir().unwrap();
            assert_eq!(result, expected);
        });
    }

    #[cfg(unix)]
    #[test]
    fn test_xdg_config_home() {
        let _env = env_guard();
        without_env_var(ENV_CONFIG_DIR, || {
            with_env_var("XDG_CONFIG_HOME", "/tmp/xdg-znt-test", || {
                let result = config_dir().unwrap();
                assert_eq!(result, PathBuf::from("/tmp/xdg-znt-test/znt"));
            });
        });
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/test/path");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("test").join("path"));
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$ZNT_NONEXISTENT_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$ZNT_NONEXISTENT_VAR_12345/file"));
    }
}
