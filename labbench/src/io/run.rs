//! Lab execution: resolve a lab's script, feed it the input payload, and
//! render the outcome as a displayable string.
//!
//! `run` never fails outward. Every path, including spawn failures and
//! timeouts, resolves to a string the shell can show the user.

use std::process::Command;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::core::input::build_payload;
use crate::io::catalog::Catalog;
use crate::io::config::LabConfig;
use crate::io::process::{ScriptOutput, run_script};

/// Returned when a lab's folder holds no script file.
pub const LAB_FILE_NOT_FOUND: &str = "Lab file not found.";

/// Returned when the script exits cleanly without writing anything.
pub const NO_OUTPUT: &str = "No output.";

/// Stateless script runner; each [`Runner::run`] call is one full
/// request/response cycle against the filesystem and one child process.
#[derive(Debug, Clone)]
pub struct Runner {
    config: LabConfig,
    catalog: Catalog,
}

impl Runner {
    pub fn new(config: LabConfig) -> Self {
        let catalog = Catalog::new(&config);
        Self { config, catalog }
    }

    /// Run the named lab's script with a payload built from `raw_input`.
    ///
    /// A failed plain-mode parse degrades to an empty payload and the script
    /// still runs; an invalid random-mode spec is rendered as an input
    /// validation message instead of blocking for corrected input.
    pub fn run(&self, lab: &str, raw_input: &str) -> String {
        match self.try_run(lab, raw_input) {
            Ok(text) => text,
            Err(err) => format!("Execution error: {err:#}"),
        }
    }

    fn try_run(&self, lab: &str, raw_input: &str) -> Result<String> {
        let Some(script) = self.catalog.script_path(lab) else {
            debug!(lab, "no script file in lab folder");
            return Ok(LAB_FILE_NOT_FOUND.to_string());
        };

        let payload = match build_payload(raw_input) {
            Ok(payload) => payload,
            Err(err) => return Ok(format!("Input error: {err:#}")),
        };

        let (program, args) = self
            .config
            .interpreter
            .split_first()
            .ok_or_else(|| anyhow!("interpreter is not configured"))?;
        info!(lab, script = %script.display(), "running lab script");
        let mut cmd = Command::new(program);
        cmd.args(args).arg(&script);

        let timeout = Duration::from_secs(self.config.run_timeout_secs);
        let output = run_script(
            cmd,
            payload.as_bytes(),
            timeout,
            self.config.output_limit_bytes,
        )?;

        if output.timed_out {
            return Ok(format!(
                "Execution error: script exceeded the {}s time limit",
                timeout.as_secs()
            ));
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let notice = ScriptOutput::truncation_notice(output.stderr_truncated);
            return Ok(format!("Execution error:\n{stderr}{notice}"));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.is_empty() {
            return Ok(NO_OUTPUT.to_string());
        }
        let notice = ScriptOutput::truncation_notice(output.stdout_truncated);
        Ok(format!("{stdout}{notice}"))
    }
}
