//! Command-line argument parsing for distro_releases
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// distro_releases - Build distribution release tables from mirror listings
#[derive(Parser, Debug)]
#[command(
    name = "distro_releases",
    version,
    about = "Discover Debian and Ubuntu releases from mirror listings and export CSV tables",
    long_about = "Crawls the recursive directory listing (ls-lR.gz) of each configured mirror,
reads the Release file of every release directory, keeps the releases that currently
matter and writes one CSV table per architecture family."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl every mirror and write the release tables
    Generate(GenerateArgs),

    /// Crawl mirrors and print every discovered release
    List(ListArgs),

    /// Show how a local Release file is classified
    Inspect(InspectArgs),

    /// Write a default configuration file
    InitConfig(InitConfigArgs),
}

/// Arguments for the generate command
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Directory the tables are written to (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Reference date for classification (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only crawl the mirror with this name
    #[arg(short, long)]
    pub mirror: Option<String>,

    /// Include releases that are not relevant
    #[arg(short, long)]
    pub all: bool,

    /// Reference date for classification (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Path to a Release file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Reference date for classification (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

/// Arguments for the init-config command
#[derive(Args, Debug, Clone)]
pub struct InitConfigArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level requested on the command line
    ///
    /// Returns `None` when no verbosity flag was given, in which case the
    /// configured level applies.
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }

    /// Whether interactive progress output should be shown
    pub fn show_progress(&self) -> bool {
        !self.global.quiet
    }
}
