use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

use crate::error::SyncFileError;
use crate::sync::identity::{self, FileRecord};

/// The three fixed export subdirectories under the postbox root.
pub const POSTBOX_SUBDIRS: [&str; 3] = ["A", "B", "C"];

#[derive(Debug, Clone, Default)]
pub struct ArchiveScan {
    /// Qualifying archive records, sorted by full path.
    pub records: Vec<FileRecord>,
    /// Names of the archive subdirectories. This set, not any registry,
    /// defines the known stories.
    pub stories: BTreeSet<String>,
}

/// Enumerate the postbox subdirectories and parse every file with the
/// postbox grammar. Per-file parse anomalies are logged and the file is
/// dropped; a missing subdirectory is routine.
pub fn scan_postbox(src: &Path) -> Result<Vec<FileRecord>> {
    let mut out = Vec::new();

    for sub in POSTBOX_SUBDIRS {
        let dir = src.join(sub);
        if !dir.is_dir() {
            debug!("expected dir {} but it wasn't found", dir.display());
            continue;
        }

        let read_dir =
            fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?;
        for entry in read_dir {
            let path = entry?.path();
            if !path.is_file() {
                debug!("skipping unexpected non-file entry: {}", path.display());
                continue;
            }

            let record = identity::from_postbox(&path)?;
            if record.date_num.is_none() {
                error!("{}", SyncFileError::BadDateDigits(path));
                continue;
            }
            if record.story.as_deref().unwrap_or("").is_empty() {
                debug!("skipping unexpected non-story file: {}", path.display());
                continue;
            }
            out.push(record);
        }
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Enumerate the archive root's immediate subdirectories and parse their
/// files with the archive grammar, keeping only records that satisfy the
/// archive-file invariant.
pub fn scan_archive(dst: &Path) -> Result<ArchiveScan> {
    let mut scan = ArchiveScan::default();

    let read_dir = fs::read_dir(dst).with_context(|| format!("failed to read {}", dst.display()))?;
    for entry in read_dir {
        let dir = entry?.path();
        if !dir.is_dir() {
            debug!("skipping unexpected non-dir file: {}", dir.display());
            continue;
        }
        if let Some(name) = dir.file_name().and_then(|s| s.to_str()) {
            scan.stories.insert(name.to_string());
        }

        let read_story =
            fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?;
        for entry in read_story {
            let path = entry?.path();
            if !path.is_file() {
                debug!("skipping unexpected non-file entry: {}", path.display());
                continue;
            }

            let record = identity::from_archive(&path)?;
            if identity::is_archive_file(&record) {
                scan.records.push(record);
            } else {
                debug!("skipping unexpected non-writing file: {}", path.display());
            }
        }
    }

    scan.records.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(scan)
}
