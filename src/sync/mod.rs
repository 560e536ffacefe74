pub mod config;
pub mod copy;
pub mod identity;
pub mod paths;
pub mod plan;
pub mod scan;

use anyhow::Result;
use std::path::PathBuf;

use crate::sync::config::SyncConfig;
use crate::sync::copy::FileCopier;
use crate::sync::identity::FileRecord;
use crate::sync::paths::SyncRoots;
use crate::sync::plan::PassOutcome;
use crate::sync::scan::ArchiveScan;

/// Owns one run's scanned state. Both sides are listed up front; the only
/// state consulted after that is the live filesystem, for overwrite safety.
pub struct Syncer {
    writing_dir: PathBuf,
    postbox_records: Vec<FileRecord>,
    archive: ArchiveScan,
    config: SyncConfig,
}

impl Syncer {
    pub fn new(roots: &SyncRoots, config: SyncConfig) -> Result<Self> {
        let postbox_records = scan::scan_postbox(&roots.postbox_dir)?;
        let archive = scan::scan_archive(&roots.writing_dir)?;
        Ok(Self {
            writing_dir: roots.writing_dir.clone(),
            postbox_records,
            archive,
            config,
        })
    }

    pub fn postbox_records(&self) -> &[FileRecord] {
        &self.postbox_records
    }

    pub fn archive_records(&self) -> &[FileRecord] {
        &self.archive.records
    }

    pub fn run(&self, copier: &dyn FileCopier) -> Result<PassOutcome> {
        plan::run_pass(
            &self.writing_dir,
            &self.archive,
            &self.postbox_records,
            &self.config,
            copier,
        )
    }
}
