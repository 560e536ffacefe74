use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::commands::sync::{self, SyncOptions};

#[derive(Debug, Parser)]
#[command(
    name = "storysync",
    version,
    about = "Sync exported postbox files into the versioned writing archive"
)]
struct Cli {
    /// The postbox dir to sync from
    #[arg(long)]
    src: Option<PathBuf>,

    /// The writing dir to sync to
    #[arg(long)]
    dst: Option<PathBuf>,

    /// Do not actually copy files, just report what would be copied
    #[arg(long)]
    dry_run: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = sync::run(&SyncOptions {
        src: cli.src,
        dst: cli.dst,
        dry_run: cli.dry_run,
    })?;

    for detail in &report.details {
        println!("{detail}");
    }
    if !report.ok {
        anyhow::bail!("{}", report.issues.join("; "));
    }
    Ok(())
}
