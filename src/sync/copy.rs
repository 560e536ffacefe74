use anyhow::{Context, Result};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

const CHUNK_SIZE: usize = 8 * 1024;

/// Copy capability injected into the allocator. The dry-run variant is a
/// no-op double, so the planning path is identical in both modes.
pub trait FileCopier {
    fn copy(&self, src: &Path, dst: &Path) -> Result<()>;
}

/// Streams source bytes into an exclusively-created destination. The
/// `create_new` open fails if the destination appeared after the
/// allocator's existence check.
pub struct RealCopier;

impl FileCopier for RealCopier {
    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        info!("copying {} to {}", src.display(), dst.display());

        let mut reader =
            fs::File::open(src).with_context(|| format!("failed to read {}", src.display()))?;
        let mut writer = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dst)
            .with_context(|| format!("failed to create {}", dst.display()))?;

        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = reader
                .read(&mut buf)
                .with_context(|| format!("failed to read {}", src.display()))?;
            if n == 0 {
                break;
            }
            writer
                .write_all(&buf[..n])
                .with_context(|| format!("failed to write {}", dst.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", dst.display()))?;
        Ok(())
    }
}

/// Reports the intended copy and leaves the filesystem untouched.
pub struct DryRunCopier;

impl FileCopier for DryRunCopier {
    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        warn!("dry run, would copy from {} to {}", src.display(), dst.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn real_copier_copies_bytes_exactly() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        let data = vec![42u8; CHUNK_SIZE * 3 + 1000];
        fs::write(&src, &data).expect("write");

        RealCopier.copy(&src, &dst).expect("copy");
        assert_eq!(fs::read(&dst).expect("read"), data);
    }

    #[test]
    fn real_copier_refuses_existing_destination() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        fs::write(&src, "new").expect("write");
        fs::write(&dst, "old").expect("write");

        let err = RealCopier.copy(&src, &dst).unwrap_err();
        assert!(err.to_string().contains("failed to create"));
        assert_eq!(fs::read_to_string(&dst).expect("read"), "old");
    }

    #[test]
    fn dry_run_copier_mutates_nothing() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        fs::write(&src, "new").expect("write");

        DryRunCopier.copy(&src, &dst).expect("copy");
        assert!(!dst.exists());
    }
}
