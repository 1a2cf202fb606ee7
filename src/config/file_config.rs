use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub data_dir: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,

    // Spreadsheet settings
    pub sheet: Option<SheetConfig>,

    // URL verification settings
    pub verify: Option<VerifyConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SheetConfig {
    pub export_url: Option<String>,
    pub songs_doc_key: Option<String>,
    pub copy_doc_key: Option<String>,
    pub songs_gid: Option<u32>,
    pub reviews_gid: Option<u32>,
    pub tags_gid: Option<u32>,
    pub share_gid: Option<u32>,
    pub http_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct VerifyConfig {
    pub audio_base_url: Option<String>,
    pub art_base_url: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
