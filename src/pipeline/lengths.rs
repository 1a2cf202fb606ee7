//! Per-tag listening time report.
//!
//! Measures the audio duration of every cataloged song and aggregates counts
//! and minutes per taxonomy tag, written as `song-lengths.csv`. Audio files
//! are downloaded once into a local cache; a file whose properties cannot be
//! read counts as zero length.

use crate::catalog::{load_catalog, load_taxonomy, Catalog, TagTaxonomy};
use crate::config::AppConfig;
use anyhow::{Context, Result};
use lofty::file::AudioFile;
use lofty::probe::Probe;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Seam for audio length measurement so tests can stub the download and
/// decoding.
pub trait DurationProbe {
    /// Length in seconds of the audio behind `media_url`. Zero means the
    /// file exists but its length could not be read.
    fn duration_secs(&self, media_url: &str) -> Result<f64>;
}

/// Real probe: downloads the file into a cache directory and reads its
/// properties with lofty.
pub struct HttpDurationProbe {
    client: reqwest::blocking::Client,
    audio_base_url: String,
    cache_dir: PathBuf,
}

impl HttpDurationProbe {
    pub fn new(audio_base_url: &str, cache_dir: &Path, timeout: Duration) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .with_context(|| format!("Failed to create audio cache dir {:?}", cache_dir))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build audio download client")?;
        Ok(HttpDurationProbe {
            client,
            audio_base_url: audio_base_url.to_string(),
            cache_dir: cache_dir.to_path_buf(),
        })
    }

    fn cached_path(&self, media_url: &str) -> PathBuf {
        let name = media_url.trim_start_matches('/').replace('/', "-");
        self.cache_dir.join(format!("{}.mp3", name))
    }

    fn download(&self, url: &str, target: &Path) -> Result<()> {
        info!("Downloading {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to download {}", url))?;
        if !response.status().is_success() {
            anyhow::bail!(
                "Audio download failed with status {} for {}",
                response.status(),
                url
            );
        }
        let bytes = response
            .bytes()
            .with_context(|| format!("Failed to read audio body of {}", url))?;
        std::fs::write(target, &bytes)
            .with_context(|| format!("Failed to cache audio at {:?}", target))
    }
}

impl DurationProbe for HttpDurationProbe {
    fn duration_secs(&self, media_url: &str) -> Result<f64> {
        if media_url.is_empty() {
            warn!("Song has no media URL, counting zero length");
            return Ok(0.0);
        }
        let path = self.cached_path(media_url);
        if !path.is_file() {
            let url = format!("{}{}.mp3", self.audio_base_url, media_url);
            self.download(&url, &path)?;
        }
        match Probe::open(&path).and_then(|p| p.read()) {
            Ok(tagged) => Ok(tagged.properties().duration().as_secs_f64()),
            Err(err) => {
                warn!("Could not read audio properties of {:?}: {}", path, err);
                Ok(0.0)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagDuration {
    pub tag: String,
    pub count: usize,
    pub minutes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LengthReport {
    pub tags: Vec<TagDuration>,
    pub total_songs: usize,
    pub total_minutes: f64,
}

/// Whole hours and leftover whole minutes of a minute total.
pub fn split_minutes(minutes: f64) -> (u64, u64) {
    let whole = minutes as u64;
    (whole / 60, whole % 60)
}

/// Measure every song and accumulate listening time per taxonomy tag, in
/// taxonomy order. A song counts toward each of its tags; a failed
/// measurement warns and counts as zero.
pub fn measure_song_lengths(
    catalog: &Catalog,
    taxonomy: &TagTaxonomy,
    probe: &dyn DurationProbe,
) -> LengthReport {
    let mut tags: Vec<TagDuration> = taxonomy
        .iter()
        .map(|t| TagDuration {
            tag: t.key.clone(),
            count: 0,
            minutes: 0.0,
        })
        .collect();

    let mut total_minutes = 0.0;
    for song in catalog.iter() {
        let secs = match probe.duration_secs(&song.media_url) {
            Ok(secs) => secs,
            Err(err) => {
                warn!("Could not measure \"{}\": {}", song.title, err);
                0.0
            }
        };
        let minutes = secs / 60.0;
        total_minutes += minutes;
        for code in &song.genre_tags {
            if let Some(entry) = tags.iter_mut().find(|t| &t.tag == code) {
                entry.count += 1;
                entry.minutes += minutes;
            }
        }
    }

    LengthReport {
        tags,
        total_songs: catalog.len(),
        total_minutes,
    }
}

/// Render the report as CSV, one row per taxonomy tag plus a total row.
pub fn render_length_csv(report: &LengthReport) -> String {
    let mut out = String::from("tag,count,duration (minutes),duration (hours),hours,minutes\n");
    for entry in &report.tags {
        let (hours, minutes) = split_minutes(entry.minutes);
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            entry.tag,
            entry.count,
            entry.minutes,
            entry.minutes / 60.0,
            hours,
            minutes
        ));
    }
    let (hours, minutes) = split_minutes(report.total_minutes);
    out.push_str(&format!(
        "total,{},{},{},{},{}\n",
        report.total_songs,
        report.total_minutes,
        report.total_minutes / 60.0,
        hours,
        minutes
    ));
    out
}

/// Full `song-lengths` run: read the published documents, measure, write
/// `song-lengths.csv`.
pub fn update_song_lengths(config: &AppConfig) -> Result<()> {
    let catalog = load_catalog(&config.songs_json_path())?;
    let taxonomy = load_taxonomy(&config.tags_json_path())?;

    let timeout = Duration::from_secs(config.sheet.http_timeout_secs);
    let probe = HttpDurationProbe::new(
        &config.verify.audio_base_url,
        &config.audio_cache_dir(),
        timeout,
    )?;

    info!("Measuring {} songs...", catalog.len());
    let report = measure_song_lengths(&catalog, &taxonomy, &probe);

    let path = config.song_lengths_csv_path();
    std::fs::write(&path, render_length_csv(&report))
        .with_context(|| format!("Failed to write length report {:?}", path))?;
    info!(
        "Wrote per-tag listening times ({:.1} minutes over {} songs) to {:?}",
        report.total_minutes, report.total_songs, path
    );
    Ok(())
}
