//! Test-only helpers for building labs directory trees.

use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config::LabConfig;

/// Shell script that reads the count-prefixed payload and prints the sum.
pub const SUM_SCRIPT: &str = "read n\n\
total=0\n\
while [ \"$n\" -gt 0 ]; do\n\
  read v\n\
  total=$((total + v))\n\
  n=$((n - 1))\n\
done\n\
echo \"$total\"\n";

/// Config pointed at `labs_dir` that runs `*.sh` scripts through `sh`.
pub fn sh_config(labs_dir: &Path) -> LabConfig {
    LabConfig {
        labs_dir: labs_dir.to_path_buf(),
        script_extension: "sh".to_string(),
        interpreter: vec!["sh".to_string()],
        ..LabConfig::default()
    }
}

/// Create `labs_dir/lab/file_name` with the given script body.
pub fn write_lab_script(labs_dir: &Path, lab: &str, file_name: &str, script: &str) -> PathBuf {
    let dir = labs_dir.join(lab);
    fs::create_dir_all(&dir).expect("create lab dir");
    let path = dir.join(file_name);
    fs::write(&path, script).expect("write lab script");
    path
}

/// Create `labs_dir/lab/README.md` with the given text.
pub fn write_readme(labs_dir: &Path, lab: &str, text: &str) {
    let dir = labs_dir.join(lab);
    fs::create_dir_all(&dir).expect("create lab dir");
    fs::write(dir.join("README.md"), text).expect("write readme");
}
