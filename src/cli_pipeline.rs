use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use songlist_server::config::{self, Secrets};
use songlist_server::pipeline;
use songlist_server::social;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory the generated JSON documents are written to.
    #[clap(long, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    /// Key of the published song spreadsheet.
    #[clap(long)]
    pub songs_doc_key: Option<String>,

    /// Key of the published copy spreadsheet, holding the featured shares.
    #[clap(long)]
    pub copy_doc_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull the song, review and tag worksheets and rebuild songs.json.
    UpdateSongs {
        /// Skip the link checks and duplicate warnings.
        #[clap(long)]
        no_verify: bool,
    },
    /// Pull the featured tweets and Facebook posts and rebuild featured.json.
    UpdateFeatured,
    /// Measure audio durations and write the per-tag listening time report.
    SongLengths,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            data_dir: args.data_dir.clone(),
            port: 8000,
            logging_level: Default::default(),
            songs_doc_key: args.songs_doc_key.clone(),
            copy_doc_key: args.copy_doc_key.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    match cli_args.command {
        Command::UpdateSongs { no_verify } => {
            pipeline::update_songs(&app_config, !no_verify)?;
        }
        Command::UpdateFeatured => {
            let secrets = Secrets::from_env();
            social::update_featured(&app_config, &secrets)?;
            info!("Featured content written to {:?}", app_config.featured_json_path());
        }
        Command::SongLengths => {
            pipeline::update_song_lengths(&app_config)?;
        }
    }

    Ok(())
}
