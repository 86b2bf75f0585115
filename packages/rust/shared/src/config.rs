//! Descriptor file discovery and I/O.
//!
//! A project keeps `pagebase.toml` at its root. Commands run from anywhere
//! inside the project; discovery walks up parent directories the same way
//! build tools locate their own config.

use std::path::{Path, PathBuf};

use crate::error::{PagebaseError, Result};
use crate::types::DeployDescriptor;

/// Descriptor file name looked up at the project root.
pub const DESCRIPTOR_FILE_NAME: &str = "pagebase.toml";

/// Path of the descriptor file inside `dir`.
pub fn descriptor_path(dir: &Path) -> PathBuf {
    dir.join(DESCRIPTOR_FILE_NAME)
}

/// Walk up from `start` until a descriptor file is found.
pub fn find_descriptor(start: &Path) -> Result<PathBuf> {
    let mut dir = Some(start);
    while let Some(d) = dir {
        let candidate = descriptor_path(d);
        if candidate.is_file() {
            return Ok(candidate);
        }
        dir = d.parent();
    }
    Err(PagebaseError::config(format!(
        "no {DESCRIPTOR_FILE_NAME} found in {} or any parent directory",
        start.display()
    )))
}

/// Load the descriptor for the project containing the current directory.
pub fn load_descriptor() -> Result<DeployDescriptor> {
    let cwd = std::env::current_dir().map_err(|e| PagebaseError::io(".", e))?;
    let path = find_descriptor(&cwd)?;
    load_descriptor_from(&path)
}

/// Load a descriptor from a specific file path.
///
/// Field invariants are enforced during deserialization, so a returned
/// descriptor is always valid.
pub fn load_descriptor_from(path: &Path) -> Result<DeployDescriptor> {
    tracing::debug!(?path, "loading deployment descriptor");
    let content = std::fs::read_to_string(path).map_err(|e| PagebaseError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PagebaseError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Write a descriptor file into `dir`. Refuses to overwrite an existing one.
/// Returns the path to the created file.
pub fn init_descriptor(dir: &Path, descriptor: &DeployDescriptor) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| PagebaseError::io(dir, e))?;

    let path = descriptor_path(dir);
    if path.exists() {
        return Err(PagebaseError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(descriptor)
        .map_err(|e| PagebaseError::Serialize(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PagebaseError::io(&path, e))?;
    tracing::info!(?path, "created deployment descriptor");

    Ok(path)
}

/// Expand `~` in a path to the user's home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(stripped) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    path.to_path_buf()
}
