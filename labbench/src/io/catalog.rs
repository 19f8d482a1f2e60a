//! Lab discovery: scans the labs directory and reads lab descriptions.
//!
//! Catalog lookups never fail outward. A missing labs directory yields an
//! empty listing and a missing README yields a placeholder; read errors are
//! logged at `warn` and degrade the same way.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::io::config::LabConfig;

/// Placeholder returned when a lab has no `README.md`.
pub const MISSING_DESCRIPTION: &str = "Description missing.";

/// Read-only view over the labs directory.
///
/// Holds no state beyond configuration; every call rescans the filesystem so
/// labs added or removed between calls are picked up.
#[derive(Debug, Clone)]
pub struct Catalog {
    labs_dir: PathBuf,
    script_extension: String,
}

impl Catalog {
    pub fn new(config: &LabConfig) -> Self {
        Self {
            labs_dir: config.labs_dir.clone(),
            script_extension: config.script_extension.clone(),
        }
    }

    /// Names of subfolders that contain at least one script file, sorted.
    ///
    /// Directory-listing order is platform-dependent, so names are sorted for
    /// deterministic output.
    pub fn list_labs(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.labs_dir) {
            Ok(entries) => entries,
            Err(err) => {
                if self.labs_dir.exists() {
                    warn!(labs_dir = %self.labs_dir.display(), err = %err, "failed to scan labs directory");
                } else {
                    debug!(labs_dir = %self.labs_dir.display(), "labs directory does not exist");
                }
                return Vec::new();
            }
        };

        let mut labs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() || self.first_script(&path).is_none() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => labs.push(name),
                Err(raw) => warn!(name = ?raw, "skipping lab with non-UTF-8 folder name"),
            }
        }
        labs.sort();
        labs
    }

    /// Full `README.md` text for a lab, or [`MISSING_DESCRIPTION`].
    ///
    /// `name` is not validated against the catalog; callers pass names they
    /// obtained from [`Self::list_labs`].
    pub fn description(&self, name: &str) -> String {
        let readme_path = self.labs_dir.join(name).join("README.md");
        match fs::read_to_string(&readme_path) {
            Ok(text) => text,
            Err(err) => {
                if readme_path.exists() {
                    warn!(path = %readme_path.display(), err = %err, "failed to read lab description");
                }
                MISSING_DESCRIPTION.to_string()
            }
        }
    }

    /// Path of the lab's script file, or `None` when the folder holds none.
    ///
    /// When a folder contains several script files the lexicographically
    /// first is chosen, matching the sorted listing order.
    pub fn script_path(&self, name: &str) -> Option<PathBuf> {
        self.first_script(&self.labs_dir.join(name))
    }

    fn first_script(&self, lab_dir: &Path) -> Option<PathBuf> {
        let entries = match fs::read_dir(lab_dir) {
            Ok(entries) => entries,
            Err(_) => return None,
        };
        let mut scripts: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext == self.script_extension.as_str())
            })
            .collect();
        scripts.sort();
        scripts.into_iter().next()
    }
}
