//! Command handlers for distro_releases CLI
//!
//! This module implements the command handlers that connect CLI arguments
//! with the core application functionality.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::app::pipeline::discover_mirror;
use crate::app::{self, MirrorClient, ReleaseCatalog, ReleaseRecord};
use crate::cli::{
    CrawlProgress, GenerateArgs, InitConfigArgs, InspectArgs, ListArgs, ProgressConfig,
};
use crate::config::AppConfig;
use crate::errors::{AppError, ConfigError, Result};

/// Handle the generate command
///
/// Crawls every configured mirror and writes every configured table.
pub async fn handle_generate(
    args: GenerateArgs,
    config: &AppConfig,
    show_progress: bool,
) -> Result<()> {
    let start_time = Instant::now();

    let (client_config, mut run_config) = config.to_runtime_config(args.today)?;
    if let Some(output_dir) = args.output_dir {
        run_config.output_dir = output_dir;
    }
    info!(
        "Generating {} tables from {} mirrors into {}",
        run_config.tables.len(),
        run_config.mirrors.len(),
        run_config.output_dir.display()
    );

    let client = MirrorClient::new(client_config)?;
    let progress = CrawlProgress::new(ProgressConfig {
        enabled: show_progress,
        ..ProgressConfig::default()
    });
    let result = app::run(&client, &run_config, &progress).await;
    progress.finish();
    let summary = result?;

    if show_progress {
        println!("✅ Release tables written:");
        for mirror in &summary.mirrors {
            println!(
                "   {}: {} releases ({} new)",
                mirror.name, mirror.releases, mirror.added
            );
        }
        println!(
            "   Merged: {} releases, {} relevant",
            summary.merged, summary.relevant
        );
        for table in &summary.tables {
            println!("   {}: {} rows", table.path.display(), table.rows);
        }
        println!("   Duration: {:.1?}", start_time.elapsed());
    }

    Ok(())
}

/// Handle the list command
///
/// Crawls the configured mirrors (or just one of them) and prints every
/// discovered release with its classification, in sort order.
pub async fn handle_list(args: ListArgs, config: &AppConfig, show_progress: bool) -> Result<()> {
    let (client_config, run_config) = config.to_runtime_config(args.today)?;
    let today = run_config.today();

    let mirrors: Vec<_> = match &args.mirror {
        Some(name) => run_config
            .mirrors
            .iter()
            .filter(|mirror| &mirror.name == name)
            .cloned()
            .collect(),
        None => run_config.mirrors.clone(),
    };
    if mirrors.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "mirror".to_string(),
            value: args.mirror.unwrap_or_default(),
            reason: "No configured mirror has this name".to_string(),
        }
        .into());
    }

    let client = MirrorClient::new(client_config)?;
    let progress = CrawlProgress::new(ProgressConfig {
        enabled: show_progress,
        ..ProgressConfig::default()
    });

    let mut catalog = ReleaseCatalog::new();
    for mirror in &mirrors {
        let found = match discover_mirror(&client, mirror, &progress).await {
            Ok(found) => found,
            Err(e) => {
                progress.finish();
                return Err(e);
            }
        };
        catalog.merge(found);
    }
    progress.finish();

    let shown: Vec<&ReleaseRecord> = catalog
        .sorted()
        .into_iter()
        .filter(|release| args.all || release.is_relevant_on(today))
        .collect();
    debug!(
        "Listing {} of {} releases as of {}",
        shown.len(),
        catalog.len(),
        today
    );

    for release in &shown {
        println!("{}", describe_release(release, today));
    }
    if shown.is_empty() {
        println!("No releases to show. Use --all to include releases that are not relevant.");
    }

    Ok(())
}

/// Handle the inspect command
pub async fn handle_inspect(args: InspectArgs) -> Result<()> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let text = tokio::fs::read_to_string(&args.file).await.map_err(|e| {
        AppError::generic(format!("Cannot read {}: {}", args.file.display(), e))
    })?;

    let release = app::parse_release_text(&text);
    print!("{}", inspect_report(&release, today));
    Ok(())
}

/// Handle the init-config command
pub async fn handle_init_config(args: InitConfigArgs) -> Result<()> {
    let path: PathBuf = match args.path {
        Some(path) => path,
        None => AppConfig::default_config_path()
            .ok_or_else(|| AppError::generic("Cannot determine the user config directory"))?,
    };

    if path.exists() && !args.force {
        return Err(AppError::generic(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, AppConfig::generate_default_config_content()).await?;

    info!("Wrote default configuration to {}", path.display());
    println!("✅ Configuration written to {}", path.display());
    Ok(())
}

/// One-line summary of a release for `list`
pub fn describe_release(release: &ReleaseRecord, today: NaiveDate) -> String {
    let mut flags = Vec::new();
    if release.is_relevant_on(today) {
        flags.push("relevant");
    }
    if release.is_lts() {
        flags.push("lts");
    }
    if release.is_experimental_on(today) {
        flags.push("experimental");
    }

    let architectures: Vec<&str> = release.architectures().iter().map(String::as_str).collect();
    format!(
        "{:<36} [{}] {}",
        release.display_name(),
        flags.join(","),
        architectures.join(" ")
    )
}

/// Multi-line report of the parsed and derived fields of a release
pub fn inspect_report(release: &ReleaseRecord, today: NaiveDate) -> String {
    fn or_dash(value: Option<&str>) -> &str {
        value.unwrap_or("-")
    }

    let architectures: Vec<&str> = release.architectures().iter().map(String::as_str).collect();
    let mut report = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(report, "Label:          {}", or_dash(release.label()));
    let _ = writeln!(report, "Suite:          {}", or_dash(release.suite()));
    let _ = writeln!(report, "Version:        {}", or_dash(release.version()));
    let _ = writeln!(report, "Codename:       {}", or_dash(release.codename()));
    let _ = writeln!(report, "Architectures:  {}", architectures.join(" "));
    let _ = writeln!(report, "Name:           {}", release.display_name());
    let _ = writeln!(report, "Sort key:       {}", release.sortkey());
    match (release.release_date(), release.age_on(today)) {
        (Some(date), Some(age)) => {
            let _ = writeln!(report, "Release date:   {} ({} days old)", date, age.num_days());
        }
        _ => {
            let _ = writeln!(report, "Release date:   unknown");
        }
    }
    let _ = writeln!(report, "LTS:            {}", yes_no(release.is_lts()));
    let _ = writeln!(
        report,
        "Relevant:       {} (as of {})",
        yes_no(release.is_relevant_on(today)),
        today
    );
    let _ = writeln!(
        report,
        "Experimental:   {}",
        yes_no(release.is_experimental_on(today))
    );
    report
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
