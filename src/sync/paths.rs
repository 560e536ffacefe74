use anyhow::Result;
use chrono::Datelike;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SyncRoots {
    /// Postbox export root; holds the `A`, `B`, `C` subdirectories.
    pub postbox_dir: PathBuf,
    /// Archive root for the target year; holds one subdirectory per story.
    pub writing_dir: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_path(var: &str) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => None,
    }
}

fn writing_dir_for_year(home: &Path, year: i32) -> PathBuf {
    home.join("Dropbox/writing").join(year.to_string())
}

/// Resolve the postbox and writing roots: an explicit flag wins, then the
/// `STORYSYNC_SRC` / `STORYSYNC_DST` env vars, then the Dropbox defaults
/// (the writing default lands in the current year's directory).
pub fn resolve_roots(src: Option<PathBuf>, dst: Option<PathBuf>) -> Result<SyncRoots> {
    let postbox_dir = match src.or_else(|| env_path("STORYSYNC_SRC")) {
        Some(path) => path,
        None => required_home_dir()?.join("Dropbox/Apps/Postbox"),
    };

    let writing_dir = match dst.or_else(|| env_path("STORYSYNC_DST")) {
        Some(path) => path,
        None => writing_dir_for_year(&required_home_dir()?, chrono::Local::now().year()),
    };

    Ok(SyncRoots {
        postbox_dir,
        writing_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writing_default_lands_in_the_year_directory() {
        let got = writing_dir_for_year(Path::new("/home/alice"), 2024);
        assert_eq!(got, PathBuf::from("/home/alice/Dropbox/writing/2024"));
    }

    #[test]
    fn explicit_paths_win() {
        let roots = resolve_roots(
            Some(PathBuf::from("/pb")),
            Some(PathBuf::from("/writing/2024")),
        )
        .expect("roots");
        assert_eq!(roots.postbox_dir, PathBuf::from("/pb"));
        assert_eq!(roots.writing_dir, PathBuf::from("/writing/2024"));
    }
}
