use anyhow::Result;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::sync::Syncer;
use crate::sync::config::load_config;
use crate::sync::copy::{DryRunCopier, FileCopier, RealCopier};
use crate::sync::paths::resolve_roots;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub src: Option<PathBuf>,
    pub dst: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn run(opts: &SyncOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("sync");
    let config = load_config()?;
    let roots = resolve_roots(opts.src.clone(), opts.dst.clone())?;

    report.detail(format!("src={}", roots.postbox_dir.display()));
    report.detail(format!("dst={}", roots.writing_dir.display()));
    if opts.dry_run {
        report.detail("dry-run: planned copies are reported, nothing is written".to_string());
    }

    if !roots.writing_dir.is_dir() {
        report.issue(format!(
            "writing dir {} does not exist",
            roots.writing_dir.display()
        ));
        return Ok(report);
    }

    let syncer = Syncer::new(&roots, config)?;
    let copier: &dyn FileCopier = if opts.dry_run { &DryRunCopier } else { &RealCopier };
    let outcome = syncer.run(copier)?;

    report.detail(format!(
        "postbox files considered: {}",
        syncer.postbox_records().len()
    ));
    report.detail(format!(
        "copied={} deduped={} refused={} failed={}",
        outcome.copied, outcome.deduped, outcome.refused, outcome.failed
    ));

    Ok(report)
}
