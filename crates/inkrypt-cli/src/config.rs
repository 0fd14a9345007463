use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Contents of `config.toml`. Every key is optional; unset paths fall back to
/// locations derived from the journal path.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InkryptConfig {
    #[serde(default)]
    pub journal: JournalSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JournalSection {
    pub path: Option<String>,
    pub settings_path: Option<String>,
    pub media_dir: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExportSection {
    pub dir: Option<String>,
    pub scratch_dir: Option<String>,
}

/// Every location the CLI touches, after defaults and overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub journal: PathBuf,
    pub settings: PathBuf,
    pub media_dir: PathBuf,
    pub export_dir: PathBuf,
    pub scratch_dir: Option<PathBuf>,
}

impl InkryptConfig {
    /// A config pinning the journal location and nothing else.
    pub fn for_journal(journal: &Path) -> Self {
        Self {
            journal: JournalSection {
                path: Some(journal.to_string_lossy().to_string()),
                ..JournalSection::default()
            },
            export: ExportSection::default(),
        }
    }

    /// Resolve paths, preferring `journal_override` for the store location.
    pub fn resolve(&self, journal_override: Option<&Path>) -> anyhow::Result<ResolvedPaths> {
        let journal = match (journal_override, self.journal.path.as_deref()) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => default_journal_path()?,
        };
        let base = journal
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let settings = match self.journal.settings_path.as_deref() {
            Some(path) => PathBuf::from(path),
            None => journal.with_extension("settings.json"),
        };
        let media_dir = self
            .journal
            .media_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| base.join("media"));
        let export_dir = self
            .export
            .dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| base.join("exports"));

        Ok(ResolvedPaths {
            journal,
            settings,
            media_dir,
            export_dir,
            scratch_dir: self.export.scratch_dir.as_deref().map(PathBuf::from),
        })
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_journal_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("inkrypt.db"))
}

/// Read `path`, treating a missing file as an empty config.
pub fn read_config(path: &Path) -> anyhow::Result<InkryptConfig> {
    if !path.exists() {
        return Ok(InkryptConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &InkryptConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("inkrypt"));
        }
    }
    Ok(home_dir()?.join(".config").join("inkrypt"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("inkrypt"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("inkrypt"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
