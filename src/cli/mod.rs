//! Command-line interface components
//!
//! This module contains CLI-specific code for distro_releases, including
//! argument parsing, command handlers and crawl progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands, GenerateArgs, GlobalArgs, InitConfigArgs, InspectArgs, ListArgs};
pub use commands::{
    describe_release, handle_generate, handle_init_config, handle_inspect, handle_list,
    inspect_report,
};
pub use progress::{CrawlProgress, ProgressConfig};
