use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::error::SyncFileError;
use crate::sync::config::SyncConfig;
use crate::sync::copy::FileCopier;
use crate::sync::identity::FileRecord;
use crate::sync::scan::ArchiveScan;

#[derive(Debug, Clone, Copy, Default)]
pub struct PassOutcome {
    pub copied: usize,
    /// Postbox files whose content already exists in the archive.
    pub deduped: usize,
    /// Copies refused because the destination path already existed.
    pub refused: usize,
    /// Per-file anomalies (date-keyed story with no resolvable number).
    pub failed: usize,
}

/// Destination for a resolved copy: `<dst>/<story>/<story><num><ext>`,
/// zero-padded to 4 digits for date-keyed stories and 2 otherwise.
pub fn archive_file_path(dst: &Path, story: &str, num: u32, cfg: &SyncConfig) -> PathBuf {
    let filename = if cfg.is_date_keyed(story) {
        format!("{story}{num:04}{}", cfg.extension)
    } else {
        format!("{story}{num:02}{}", cfg.extension)
    };
    dst.join(story).join(filename)
}

/// The match/allocate/copy pass.
///
/// Stories are discovered from the archive side only; postbox files for a
/// story with no archive directory are ignored. Within a story, sequential
/// numbers are handed out in ascending path order of the postbox records,
/// and the counter advances even when the copy is refused or simulated so
/// that numbering is identical across dry and real runs.
pub fn run_pass(
    dst: &Path,
    archive: &ArchiveScan,
    postbox: &[FileRecord],
    cfg: &SyncConfig,
    copier: &dyn FileCopier,
) -> Result<PassOutcome> {
    let mut outcome = PassOutcome::default();

    for story in &archive.stories {
        let partition = archive
            .records
            .iter()
            .filter(|r| r.dir_story.as_deref() == Some(story.as_str()))
            .collect::<Vec<_>>();

        let existing_hashes = partition
            .iter()
            .map(|r| r.content_hash.as_str())
            .collect::<BTreeSet<_>>();
        let mut next_num = partition.iter().filter_map(|r| r.num).max().unwrap_or(0);

        for pb in postbox {
            if pb.story.as_deref() != Some(story.as_str()) {
                continue;
            }

            if existing_hashes.contains(pb.content_hash.as_str()) {
                debug!("a file for {story} with this hash exists: {}", pb.path.display());
                outcome.deduped += 1;
                continue;
            }

            let resolved_num = if cfg.is_date_keyed(story) {
                match pb.num.or(pb.date_num) {
                    Some(num) => num,
                    None => {
                        error!("{}", SyncFileError::NoResolvableNum(pb.path.clone()));
                        outcome.failed += 1;
                        continue;
                    }
                }
            } else {
                next_num += 1;
                next_num
            };

            let dst_path = archive_file_path(dst, story, resolved_num, cfg);
            // Live filesystem check, so copies made earlier in this run count.
            if dst_path.exists() {
                error!(
                    "{}",
                    SyncFileError::DestinationExists {
                        src: pb.path.clone(),
                        dst: dst_path,
                    }
                );
                outcome.refused += 1;
                continue;
            }

            copier.copy(&pb.path, &dst_path)?;
            outcome.copied += 1;
        }
    }

    Ok(outcome)
}
