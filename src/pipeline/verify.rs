//! Best-effort integrity checks over the normalized batch.
//!
//! Issues HEAD requests against the constructed audio and art URLs and flags
//! duplicate audio URLs, art URLs and titles. Everything here is report-only:
//! findings become warnings and counters, the record always stays in the
//! output.

use super::UpdateStats;
use crate::catalog::Song;
use crate::config::VerifySettings;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::warn;

/// Seam for the outbound HEAD request so tests can stub the network.
pub trait LinkChecker {
    fn head_status(&self, url: &str) -> Result<u16>;
}

/// Real checker backed by a blocking HTTP client.
pub struct HttpLinkChecker {
    client: reqwest::blocking::Client,
}

impl HttpLinkChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build link checker HTTP client")?;
        Ok(HttpLinkChecker { client })
    }
}

impl LinkChecker for HttpLinkChecker {
    fn head_status(&self, url: &str) -> Result<u16> {
        let response = self.client.head(url).send()?;
        Ok(response.status().as_u16())
    }
}

/// Accumulates seen keys across the batch; first occurrence is never
/// flagged, second and later are.
pub struct Verifier<'a> {
    checker: &'a dyn LinkChecker,
    settings: &'a VerifySettings,
    seen_audio: Vec<String>,
    seen_art: Vec<String>,
    seen_titles: Vec<String>,
}

impl<'a> Verifier<'a> {
    pub fn new(checker: &'a dyn LinkChecker, settings: &'a VerifySettings) -> Verifier<'a> {
        Verifier {
            checker,
            settings,
            seen_audio: Vec::new(),
            seen_art: Vec::new(),
            seen_titles: Vec::new(),
        }
    }

    pub fn inspect(&mut self, song: &Song, stats: &mut UpdateStats) {
        self.check_links(song, stats);
        self.note_duplicates(song, stats);
    }

    fn check_links(&self, song: &Song, stats: &mut UpdateStats) {
        if !song.media_url.is_empty() {
            let audio_link = format!("{}{}.mp3", self.settings.audio_base_url, song.media_url);
            self.check_link(&audio_link, "audio", stats);
        }
        if !song.song_art.is_empty() {
            let art_link = format!("{}{}", self.settings.art_base_url, song.song_art);
            self.check_link(&art_link, "song art", stats);
        }
    }

    fn check_link(&self, url: &str, kind: &str, stats: &mut UpdateStats) {
        match self.checker.head_status(url) {
            Ok(200) => {}
            Ok(status) => {
                stats.broken_links += 1;
                warn!("{} The {} URL is invalid: {}", status, kind, url);
            }
            Err(err) => {
                // Network trouble during verification never aborts the batch.
                stats.link_check_failures += 1;
                warn!("HEAD request for {} failed: {}", url, err);
            }
        }
    }

    fn note_duplicates(&mut self, song: &Song, stats: &mut UpdateStats) {
        note_duplicate(
            &mut self.seen_audio,
            &song.media_url,
            "audio url",
            stats,
        );
        note_duplicate(&mut self.seen_art, &song.song_art, "song art url", stats);
        note_duplicate(&mut self.seen_titles, &song.title, "title", stats);
    }
}

fn note_duplicate(seen: &mut Vec<String>, value: &str, kind: &str, stats: &mut UpdateStats) {
    if value.is_empty() {
        return;
    }
    if seen.iter().any(|s| s == value) {
        stats.duplicates += 1;
        warn!("Duplicate {}: {}", kind, value);
    } else {
        seen.push(value.to_string());
    }
}
