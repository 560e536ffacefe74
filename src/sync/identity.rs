use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Length of the `YYYY-MM-DD ` capture-date prefix on postbox filenames.
const DATE_PREFIX_LEN: usize = 11;

/// Normalized identity of one file on either side of the sync.
///
/// Records are rebuilt from a full directory listing on every run; the
/// filesystem itself is the only persistent state.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Story name encoded in the filename. `None` for archive-side files
    /// whose name never hits a stop character.
    pub story: Option<String>,
    /// Archive side only: story implied by the parent directory name.
    pub dir_story: Option<String>,
    /// Lowercase sha256 hex of the full file contents.
    pub content_hash: String,
    /// 4-character year token (filename prefix or grandparent dir name).
    pub year: String,
    /// Version parsed from the numeric suffix, if any.
    pub num: Option<u32>,
    /// Postbox side only: `month * 100 + day` from the capture date.
    pub date_num: Option<u32>,
}

/// Historical story-character test: any code point in the half-open range
/// `'A'..'z'`, which admits ``[ \ ] ^ _ ` `` between the letter blocks and
/// treats `z` itself as a stop character. Existing archive filenames were
/// parsed with this exact range, so it must not be tightened.
fn is_story_char(ch: char) -> bool {
    ('A'..'z').contains(&ch)
}

/// Longest story prefix of `name` after skipping `skip` characters.
/// Returns the prefix and whether a stop character terminated the scan.
fn story_prefix(name: &str, skip: usize) -> (String, bool) {
    let mut out = String::new();
    for ch in name.chars().skip(skip) {
        if !is_story_char(ch) {
            return (out, true);
        }
        out.push(ch);
    }
    (out, false)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

fn two_digits(name: &str, start: usize) -> Option<u32> {
    let digits: String = name.chars().skip(start).take(2).collect();
    if digits.chars().count() != 2 {
        return None;
    }
    digits.parse().ok()
}

/// `month * 100 + day` from the fixed offsets of a postbox filename.
/// `None` when either field is not a valid two-digit number.
pub fn date_num(name: &str) -> Option<u32> {
    let month = two_digits(name, 5)?;
    let day = two_digits(name, 8)?;
    Some(month * 100 + day)
}

/// Digits after the story prefix in `stem`, parsed as a version number.
fn trailing_num(stem: &str, skip: usize) -> Option<u32> {
    let tail: String = stem.chars().skip(skip).collect();
    tail.parse().ok()
}

pub fn file_hash(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Parse a postbox filename: `YYYY-MM-DD <story>[<num>].ext`.
///
/// The story is the longest run of story characters after the date prefix;
/// when no stop character follows, the whole remainder is the story. A bad
/// capture date leaves `date_num` unset and the scanner drops the record.
pub fn from_postbox(path: &Path) -> Result<FileRecord> {
    let name = file_name(path);
    let stem = file_stem(path);
    let (story, _) = story_prefix(stem, DATE_PREFIX_LEN);
    let num = trailing_num(stem, DATE_PREFIX_LEN + story.chars().count());

    Ok(FileRecord {
        path: path.to_path_buf(),
        content_hash: file_hash(path)?,
        year: name.chars().take(4).collect(),
        num,
        date_num: date_num(name),
        story: Some(story),
        dir_story: None,
    })
}

fn parent_dir_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .map(ToOwned::to_owned)
}

fn grandparent_dir_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|p| p.parent())
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .map(ToOwned::to_owned)
}

/// Parse an archived filename under `<archive_root>/<story>/`.
///
/// Unlike the postbox side, a name with no stop character encodes no
/// story+version at all; such records carry `story = None` and are kept
/// only if the draft exception applies.
pub fn from_archive(path: &Path) -> Result<FileRecord> {
    let name = file_name(path);
    let (prefix, stopped) = story_prefix(name, 0);
    let story = stopped.then_some(prefix);
    let num = story
        .as_deref()
        .and_then(|s| trailing_num(file_stem(path), s.chars().count()));

    Ok(FileRecord {
        path: path.to_path_buf(),
        content_hash: file_hash(path)?,
        year: grandparent_dir_name(path).unwrap_or_default(),
        num,
        date_num: None,
        story,
        dir_story: parent_dir_name(path),
    })
}

/// Archive-file invariant: the filename story must match the containing
/// directory, with a carve-out for drafts filed under any story.
pub fn is_archive_file(record: &FileRecord) -> bool {
    match record.story.as_deref() {
        Some("draft") => true,
        Some(story) => record.dir_story.as_deref() == Some(story),
        None => false,
    }
}
