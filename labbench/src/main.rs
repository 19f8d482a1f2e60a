//! Command-line shell for the lab launcher.
//!
//! Mirrors the actions a presentation layer wires up: list the catalog, show
//! a lab's description, and run a lab's script against user input.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use labbench::io::catalog::Catalog;
use labbench::io::config::{LabConfig, load_config, write_config};
use labbench::io::run::Runner;
use labbench::logging;

#[derive(Parser)]
#[command(
    name = "labbench",
    version,
    about = "Catalog and launch student lab scripts"
)]
struct Cli {
    /// Path to the launcher config file.
    #[arg(long, default_value = "labbench.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file and create the labs directory if missing.
    Init {
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
    /// List labs that contain at least one runnable script.
    List,
    /// Print the README description for a lab.
    Describe { lab: String },
    /// Run a lab's script, feeding it a numeric payload built from INPUT.
    ///
    /// INPUT is comma or whitespace separated numbers, or a random spec of
    /// the form "random <count>,<min>,<max>".
    Run {
        lab: String,
        /// Raw input text forwarded to the payload builder.
        #[arg(default_value = "")]
        input: String,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::List => {
            let config = load_config(&cli.config)?;
            for lab in Catalog::new(&config).list_labs() {
                println!("{lab}");
            }
            Ok(())
        }
        Command::Describe { lab } => {
            let config = load_config(&cli.config)?;
            print_block(&Catalog::new(&config).description(&lab));
            Ok(())
        }
        Command::Run { lab, input } => {
            let config = load_config(&cli.config)?;
            print_block(&Runner::new(config).run(&lab, &input));
            Ok(())
        }
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    let config = LabConfig::default();
    if force || !config_path.exists() {
        write_config(config_path, &config)
            .with_context(|| format!("write {}", config_path.display()))?;
    }
    fs::create_dir_all(&config.labs_dir)
        .with_context(|| format!("create labs directory {}", config.labs_dir.display()))?;
    Ok(())
}

/// Print text that may or may not carry its own trailing newline.
fn print_block(text: &str) {
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}
