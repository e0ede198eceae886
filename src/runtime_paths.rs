use std::{env, path::PathBuf};

use crate::{DEFAULT_ROOT_DIR_NAME, EXTENSION_DIR_ENV, EXTENSION_DIR_NAME, ROOT_DIR_ENV};

fn non_empty_env_path(key: &str) -> Option<PathBuf> {
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

pub fn default_root_dir() -> Option<PathBuf> {
    non_empty_env_path(ROOT_DIR_ENV)
        .or_else(|| home::home_dir().map(|home| home.join(DEFAULT_ROOT_DIR_NAME)))
}

pub fn extension_source_dir(root_dir: Option<&PathBuf>) -> Option<PathBuf> {
    non_empty_env_path(EXTENSION_DIR_ENV)
        .or_else(|| root_dir.map(|root| root.join(EXTENSION_DIR_NAME)))
}
