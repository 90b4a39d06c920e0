//! Resolve configuration, cache, and data directories for `toolbelt`.
//!
//! The helpers in this module respect environment overrides while falling back
//! to platform-appropriate locations provided by the `directories` crate.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "albo";
const APPLICATION: &str = "toolbelt";

const CONFIG_DIR_ENV: &str = "TOOLBELT_CONFIG_DIR";
const DATA_DIR_ENV: &str = "TOOLBELT_DATA_DIR";
const CACHE_DIR_ENV: &str = "TOOLBELT_CACHE_DIR";

const PROVIDERS_DIR: &str = "providers";

/// Return the platform-specific directory layout for the application.
fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow!("unable to determine project directories for toolbelt"))
}

/// Resolve an override directory from an environment variable.
///
/// An empty string is treated the same as an unset value so that callers can
/// use shell defaults without worrying about trailing whitespace.
fn dir_from_env(name: &str) -> Option<PathBuf> {
    let value = env::var_os(name)?;
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// Return the configuration directory used to persist user preferences.
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(dir) = dir_from_env(CONFIG_DIR_ENV) {
        return Ok(dir);
    }

    Ok(project_dirs()?.config_local_dir().to_path_buf())
}

/// Return the data directory that holds installed providers.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = dir_from_env(DATA_DIR_ENV) {
        return Ok(dir);
    }

    Ok(project_dirs()?.data_local_dir().to_path_buf())
}

/// Return the cache directory providers may use for scratch state.
pub fn get_cache_dir() -> Result<PathBuf> {
    if let Some(dir) = dir_from_env(CACHE_DIR_ENV) {
        return Ok(dir);
    }

    Ok(project_dirs()?.cache_dir().to_path_buf())
}

/// Default discovery root: `<data dir>/providers`.
pub fn get_providers_dir() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(PROVIDERS_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_overrides_are_ignored() {
        // SAFETY: the variable is private to this test.
        unsafe {
            env::set_var("TOOLBELT_TEST_BLANK_DIR", "");
        }
        assert_eq!(dir_from_env("TOOLBELT_TEST_BLANK_DIR"), None);

        unsafe {
            env::set_var("TOOLBELT_TEST_BLANK_DIR", "/srv/toolbelt");
        }
        assert_eq!(
            dir_from_env("TOOLBELT_TEST_BLANK_DIR"),
            Some(PathBuf::from("/srv/toolbelt"))
        );

        unsafe {
            env::remove_var("TOOLBELT_TEST_BLANK_DIR");
        }
    }
}
