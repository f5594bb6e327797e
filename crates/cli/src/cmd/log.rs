//! Display the version history of a file

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rcs_journal::VersionInfo;
use std::path::Path;

pub struct LogOptions {
    pub limit: Option<usize>,
    pub oneline: bool,
}

pub fn run(data_dir: &Path, name: &str, options: LogOptions) -> Result<()> {
    let file = util::resolve_file(data_dir, name)?;
    let versions = file
        .list_versions()
        .with_context(|| format!("Failed to list versions of {}", name))?;

    if versions.is_empty() {
        println!("{}", format!("No versions of {} yet", name).dimmed());
        return Ok(());
    }

    let total = versions.len();
    let shown = options.limit.unwrap_or(total).min(total);

    if options.oneline {
        display_oneline(&versions[..shown]);
    } else {
        display_full(&versions[..shown]);
    }

    if shown < total {
        println!();
        println!("{}", format!("... {} older versions", total - shown).dimmed());
    }
    Ok(())
}

/// One line per version (like git log --oneline)
fn display_oneline(versions: &[VersionInfo]) {
    for info in versions {
        println!(
            "{} {} {}",
            util::short_id(info.version.as_str()).yellow(),
            util::format_relative_time(info.timestamp_ms()).dimmed(),
            info.comment
        );
    }
}

fn display_full(versions: &[VersionInfo]) {
    for (i, info) in versions.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} {}", "version".yellow(), info.version.yellow());
        println!(
            "Date:   {} ({})",
            util::format_absolute_time(info.timestamp_ms()),
            util::format_relative_time(info.timestamp_ms())
        );
        if !info.parent.is_root() {
            println!("Parent: {}", util::short_id(info.parent.as_str()).dimmed());
        }
        println!();
        if info.comment.is_empty() {
            println!("    {}", "(no comment)".dimmed());
        } else {
            for line in info.comment.lines() {
                println!("    {}", line);
            }
        }
    }
}
