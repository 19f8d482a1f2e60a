//! Launcher configuration stored in `labbench.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Launcher configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to sensible values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabConfig {
    /// Base directory scanned for lab subfolders.
    pub labs_dir: PathBuf,

    /// File extension (without the dot) that marks a file as a lab script.
    pub script_extension: String,

    /// Argv prefix used to invoke a script (e.g. `["python3"]` or `["sh"]`).
    /// The script path is appended as the final argument.
    pub interpreter: Vec<String>,

    /// Wall-clock budget for one script run in seconds.
    pub run_timeout_secs: u64,

    /// Truncate captured script stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            labs_dir: PathBuf::from("labs"),
            script_extension: "py".to_string(),
            interpreter: vec!["python3".to_string()],
            run_timeout_secs: 600,
            output_limit_bytes: 100_000,
        }
    }
}

impl LabConfig {
    pub fn validate(&self) -> Result<()> {
        if self.run_timeout_secs == 0 {
            return Err(anyhow!("run_timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.interpreter.is_empty() || self.interpreter[0].trim().is_empty() {
            return Err(anyhow!("interpreter must be a non-empty array"));
        }
        if self.script_extension.is_empty() || self.script_extension.starts_with('.') {
            return Err(anyhow!(
                "script_extension must be non-empty and given without a leading dot"
            ));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LabConfig::default()`.
pub fn load_config(path: &Path) -> Result<LabConfig> {
    if !path.exists() {
        let cfg = LabConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LabConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &LabConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, LabConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("labbench.toml");
        let cfg = LabConfig {
            labs_dir: PathBuf::from("work/labs"),
            script_extension: "sh".to_string(),
            interpreter: vec!["sh".to_string()],
            run_timeout_secs: 5,
            output_limit_bytes: 4096,
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("labbench.toml");
        fs::write(&path, "script_extension = \"sh\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.script_extension, "sh");
        assert_eq!(cfg.labs_dir, PathBuf::from("labs"));
        assert_eq!(cfg.run_timeout_secs, 600);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = LabConfig {
            run_timeout_secs: 0,
            ..LabConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn dotted_extension_is_rejected() {
        let cfg = LabConfig {
            script_extension: ".py".to_string(),
            ..LabConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_interpreter_is_rejected() {
        let cfg = LabConfig {
            interpreter: Vec::new(),
            ..LabConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
