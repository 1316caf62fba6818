//! The mirror loop: repeated sync passes with per-pass console output

use colored::Colorize;

use mirror_core::{MirrorConfig, PassReport, ScheduleSummary, Scheduler, Synchronizer};

use crate::error::Result;

/// Print the startup banner.
pub fn print_banner(config: &MirrorConfig, pass_limit: Option<u64>) -> Result<()> {
    let (source, destination) = config.roots()?;

    println!("{} Starting folder synchronization program", "=>".blue().bold());
    println!("   {} {}", "source:     ".dimmed(), source.display());
    println!("   {} {}", "destination:".dimmed(), destination.display());
    match pass_limit {
        Some(1) => println!("   {} single pass", "schedule:   ".dimmed()),
        Some(n) => println!(
            "   {} {} passes, every {} min",
            "schedule:   ".dimmed(),
            n,
            config.interval_minutes
        ),
        None => println!(
            "   {} every {} min",
            "schedule:   ".dimmed(),
            config.interval_minutes
        ),
    }
    if config.sync.dry_run {
        println!("   {}", "dry run: destination will not be modified".yellow());
    }
    println!();

    Ok(())
}

/// Run sync passes from the configured source into the configured destination.
pub fn run_mirror(config: &MirrorConfig, pass_limit: Option<u64>, json: bool) -> Result<ScheduleSummary> {
    let (source, destination) = config.roots()?;
    tracing::info!("Starting folder synchronization program");

    let synchronizer = Synchronizer::new(config.sync.clone());
    let mut scheduler = Scheduler::new(config.interval());
    if let Some(limit) = pass_limit {
        scheduler = scheduler.with_max_passes(limit);
    }

    // A pass whose report cannot be printed ends the run
    scheduler.try_run(|number| -> Result<PassReport> {
        let report = synchronizer.sync(source, destination);
        print_report(number, &report, json)?;
        Ok(report)
    })
}

fn print_report(number: u64, report: &PassReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    let prefix = if report.dry_run {
        format!("[pass {}, dry run]", number)
    } else {
        format!("[pass {}]", number)
    };

    if !report.success {
        println!(
            "{} {} {} error(s)",
            prefix.dimmed(),
            "ERROR".red().bold(),
            report.errors.len()
        );
        for error in &report.errors {
            println!("   {} {}", "-".red(), error);
        }
    } else if report.is_noop() {
        println!("{} {} destination already in sync", prefix.dimmed(), "UNCHANGED".cyan().bold());
    } else {
        println!(
            "{} {} {} copied, {} deleted, {} dirs created, {} dirs deleted",
            prefix.dimmed(),
            "OK".green().bold(),
            report.files_copied,
            report.files_deleted,
            report.directories_created,
            report.directories_deleted
        );
    }

    Ok(())
}
