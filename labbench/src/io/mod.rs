//! Side-effecting operations: configuration, catalog scans, process spawns.

pub mod catalog;
pub mod config;
pub mod process;
pub mod run;
