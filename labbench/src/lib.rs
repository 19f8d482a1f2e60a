//! Backend for a student lab-script launcher.
//!
//! A labs directory holds one subfolder per lab, each containing a runnable
//! script and an optional `README.md`. This crate catalogs those labs, turns
//! free-text numeric input into the count-prefixed stdin payload the scripts
//! expect, and runs a lab's script as a child process with captured output.
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (payload building). No I/O,
//!   fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, directory scans, process
//!   execution). Isolated to enable temp-directory tests.
//!
//! Every runner operation resolves to a displayable string; nothing in the
//! run path propagates an error to the caller.

pub mod core;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
