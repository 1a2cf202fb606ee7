mod file_config;

pub use file_config::{FileConfig, SheetConfig, VerifyConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// Prefix for every environment variable this project reads.
pub const ENV_PREFIX: &str = "SONGLIST_";

pub const DEFAULT_EXPORT_URL: &str =
    "https://docs.google.com/feeds/download/spreadsheets/Export";
pub const DEFAULT_AUDIO_BASE_URL: &str = "http://pd.npr.org/anon.npr-mp3";
pub const DEFAULT_ART_BASE_URL: &str = "http://www.npr.org";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub songs_doc_key: Option<String>,
    pub copy_doc_key: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            data_dir: None,
            port: 8000,
            logging_level: RequestsLoggingLevel::default(),
            songs_doc_key: None,
            copy_doc_key: None,
        }
    }
}

/// Immutable configuration, resolved once at process start and passed to
/// every component that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,

    pub sheet: SheetSettings,
    pub verify: VerifySettings,
}

#[derive(Debug, Clone)]
pub struct SheetSettings {
    pub export_url: String,
    pub songs_doc_key: Option<String>,
    pub copy_doc_key: Option<String>,
    pub songs_gid: u32,
    pub reviews_gid: u32,
    pub tags_gid: u32,
    pub share_gid: u32,
    pub http_timeout_secs: u64,
}

impl Default for SheetSettings {
    fn default() -> Self {
        SheetSettings {
            export_url: DEFAULT_EXPORT_URL.to_string(),
            songs_doc_key: None,
            copy_doc_key: None,
            songs_gid: 0,
            reviews_gid: 1,
            tags_gid: 2,
            share_gid: 3,
            http_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerifySettings {
    pub audio_base_url: String,
    pub art_base_url: String,
}

impl Default for VerifySettings {
    fn default() -> Self {
        VerifySettings {
            audio_base_url: DEFAULT_AUDIO_BASE_URL.to_string(),
            art_base_url: DEFAULT_ART_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("data_dir must be specified via --data-dir or in config file")
            })?;

        if !data_dir.exists() {
            bail!("Data directory does not exist: {:?}", data_dir);
        }
        if !data_dir.is_dir() {
            bail!("data_dir is not a directory: {:?}", data_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let sheet_file = file.sheet.unwrap_or_default();
        let sheet_defaults = SheetSettings::default();
        let sheet = SheetSettings {
            export_url: sheet_file.export_url.unwrap_or(sheet_defaults.export_url),
            songs_doc_key: sheet_file
                .songs_doc_key
                .or_else(|| cli.songs_doc_key.clone()),
            copy_doc_key: sheet_file.copy_doc_key.or_else(|| cli.copy_doc_key.clone()),
            songs_gid: sheet_file.songs_gid.unwrap_or(sheet_defaults.songs_gid),
            reviews_gid: sheet_file.reviews_gid.unwrap_or(sheet_defaults.reviews_gid),
            tags_gid: sheet_file.tags_gid.unwrap_or(sheet_defaults.tags_gid),
            share_gid: sheet_file.share_gid.unwrap_or(sheet_defaults.share_gid),
            http_timeout_secs: sheet_file
                .http_timeout_secs
                .unwrap_or(sheet_defaults.http_timeout_secs),
        };

        let verify_file = file.verify.unwrap_or_default();
        let verify_defaults = VerifySettings::default();
        let verify = VerifySettings {
            audio_base_url: verify_file
                .audio_base_url
                .unwrap_or(verify_defaults.audio_base_url),
            art_base_url: verify_file
                .art_base_url
                .unwrap_or(verify_defaults.art_base_url),
        };

        Ok(AppConfig {
            data_dir,
            port,
            logging_level,
            sheet,
            verify,
        })
    }

    pub fn songs_json_path(&self) -> PathBuf {
        self.data_dir.join("songs.json")
    }

    pub fn featured_json_path(&self) -> PathBuf {
        self.data_dir.join("featured.json")
    }

    pub fn tags_json_path(&self) -> PathBuf {
        self.data_dir.join("tags.json")
    }

    pub fn song_lengths_csv_path(&self) -> PathBuf {
        self.data_dir.join("song-lengths.csv")
    }

    pub fn audio_cache_dir(&self) -> PathBuf {
        self.data_dir.join(".mp3-cache")
    }
}

/// Credentials, supplied only through `SONGLIST_`-prefixed environment
/// variables. Never committed to source, never read from files or CLI.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub preview_token: Option<String>,
    pub twitter_bearer_token: Option<String>,
    pub facebook_app_token: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Secrets {
        Secrets {
            preview_token: read_env("PREVIEW_TOKEN"),
            twitter_bearer_token: read_env("TWITTER_API_BEARER_TOKEN"),
            facebook_app_token: read_env("FACEBOOK_API_APP_TOKEN"),
        }
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(format!("{}{}", ENV_PREFIX, name))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_temp_data_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("path"),
            Some(RequestsLoggingLevel::Path)
        ));
        // Case insensitive
        assert!(matches!(
            parse_logging_level("HEADERS"),
            Some(RequestsLoggingLevel::Headers)
        ));
        // Invalid
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = make_temp_data_dir();
        let cli = CliConfig {
            data_dir: Some(temp_dir.path().to_path_buf()),
            port: 8000,
            logging_level: RequestsLoggingLevel::Headers,
            songs_doc_key: Some("doc-key-1".to_string()),
            copy_doc_key: Some("doc-key-2".to_string()),
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.data_dir, temp_dir.path());
        assert_eq!(config.port, 8000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.sheet.songs_doc_key.as_deref(), Some("doc-key-1"));
        assert_eq!(config.sheet.copy_doc_key.as_deref(), Some("doc-key-2"));
        assert_eq!(config.sheet.export_url, DEFAULT_EXPORT_URL);
        assert_eq!(config.verify.audio_base_url, DEFAULT_AUDIO_BASE_URL);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let temp_dir = make_temp_data_dir();
        let cli = CliConfig {
            data_dir: Some(PathBuf::from("/should/be/overridden")),
            port: 8000,
            ..Default::default()
        };

        let file_config = FileConfig {
            data_dir: Some(temp_dir.path().to_string_lossy().to_string()),
            port: Some(9000),
            logging_level: Some("none".to_string()),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        // TOML values should override CLI
        assert_eq!(config.data_dir, temp_dir.path());
        assert_eq!(config.port, 9000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::None);
    }

    #[test]
    fn test_resolve_sheet_section() {
        let temp_dir = make_temp_data_dir();
        let cli = CliConfig {
            data_dir: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let file_config = FileConfig {
            sheet: Some(SheetConfig {
                songs_doc_key: Some("abc123".to_string()),
                reviews_gid: Some(7),
                ..Default::default()
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();
        assert_eq!(config.sheet.songs_doc_key.as_deref(), Some("abc123"));
        assert_eq!(config.sheet.reviews_gid, 7);
        // Untouched fields keep their defaults
        assert_eq!(config.sheet.songs_gid, 0);
        assert_eq!(config.sheet.http_timeout_secs, 30);
    }

    #[test]
    fn test_resolve_missing_data_dir_error() {
        let cli = CliConfig::default();
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("data_dir must be specified"));
    }

    #[test]
    fn test_resolve_nonexistent_data_dir_error() {
        let cli = CliConfig {
            data_dir: Some(PathBuf::from("/nonexistent/path/that/should/not/exist")),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_data_path_helpers() {
        let temp_dir = make_temp_data_dir();
        let cli = CliConfig {
            data_dir: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.songs_json_path(), temp_dir.path().join("songs.json"));
        assert_eq!(
            config.featured_json_path(),
            temp_dir.path().join("featured.json")
        );
        assert_eq!(config.tags_json_path(), temp_dir.path().join("tags.json"));
    }
}
