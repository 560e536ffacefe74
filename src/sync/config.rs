use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Extension used for archived filenames.
    pub extension: String,
    /// Stories whose version number is the capture date rather than an
    /// incrementing count.
    pub date_keyed_stories: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            extension: ".txt".to_string(),
            date_keyed_stories: vec!["journal".to_string()],
        }
    }
}

impl SyncConfig {
    pub fn is_date_keyed(&self, story: &str) -> bool {
        self.date_keyed_stories.iter().any(|s| s == story)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialSyncConfig {
    extension: Option<String>,
    date_keyed_stories: Option<Vec<String>>,
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_csv(var: &str, fallback: &[String]) -> Vec<String> {
    match env::var(var) {
        Ok(v) => {
            let out = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>();
            if out.is_empty() { fallback.to_vec() } else { out }
        }
        Err(_) => fallback.to_vec(),
    }
}

fn validate(cfg: &SyncConfig) -> Result<()> {
    if !cfg.extension.starts_with('.') || cfg.extension.len() < 2 {
        return Err(anyhow!(
            "invalid extension {:?}: must start with a dot",
            cfg.extension
        ));
    }
    if cfg.date_keyed_stories.iter().any(|s| s.trim().is_empty()) {
        return Err(anyhow!("invalid date-keyed story list: empty name"));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("STORYSYNC_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".config/storysync").join("storysync.toml"))
}

fn merge_file_config(base: &mut SyncConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialSyncConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    if let Some(extension) = parsed.extension {
        base.extension = extension;
    }
    if let Some(date_keyed_stories) = parsed.date_keyed_stories {
        base.date_keyed_stories = date_keyed_stories;
    }
    Ok(())
}

pub fn load_config() -> Result<SyncConfig> {
    let mut cfg = SyncConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.extension = env_or_string("STORYSYNC_EXTENSION", &cfg.extension);
    cfg.date_keyed_stories =
        env_or_csv("STORYSYNC_DATE_KEYED_STORIES", &cfg.date_keyed_stories);

    validate(&cfg)?;
    Ok(cfg)
}
