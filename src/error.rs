use std::path::PathBuf;
use thiserror::Error;

/// Per-file anomalies. These are logged and the file is skipped; they never
/// abort the run. Copy-time I/O failures propagate as `anyhow` errors instead.
#[derive(Debug, Error)]
pub enum SyncFileError {
    #[error("bad date digits in postbox filename: {0}")]
    BadDateDigits(PathBuf),
    #[error("date-keyed story with neither version nor date: {0}")]
    NoResolvableNum(PathBuf),
    #[error("refusing to overwrite existing archive file {dst} with {src}")]
    DestinationExists { src: PathBuf, dst: PathBuf },
}
