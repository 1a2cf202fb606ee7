//! The offline song-catalog pipeline.
//!
//! One pass, synchronous: fetch the spreadsheet worksheets, normalize each
//! song row, merge reviews, optionally verify URLs and flag duplicates, then
//! overwrite the published JSON documents.

mod lengths;
mod merge;
mod normalize;
mod verify;

pub use lengths::{
    measure_song_lengths, render_length_csv, split_minutes, update_song_lengths, DurationProbe,
    HttpDurationProbe, LengthReport, TagDuration,
};
pub use merge::{attach_reviews, RawReviewRow};
pub use normalize::{
    coerce_featured, enlarge_art_url, normalize_song, resolve_genre_tags, RawSongRow,
};
pub use verify::{HttpLinkChecker, LinkChecker, Verifier};

use crate::catalog::{write_catalog, write_taxonomy, Catalog, TagTaxonomy};
use crate::config::AppConfig;
use crate::sheet::{SheetClient, Worksheet};
use anyhow::{bail, Context, Result};
use std::time::Duration;
use tracing::{info, warn};

/// Counters for the run summary. Data-quality findings accumulate here and
/// get logged as a block at the end of the run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateStats {
    pub songs_processed: usize,
    pub reviews_attached: usize,
    pub unknown_tags: usize,
    pub broken_links: usize,
    pub link_check_failures: usize,
    pub duplicates: usize,
}

impl UpdateStats {
    pub fn log_summary(&self) {
        info!("");
        info!("Update Summary");
        info!("==============");
        info!("Songs processed: {}", self.songs_processed);
        info!("Reviews attached: {}", self.reviews_attached);
        if self.unknown_tags > 0 {
            warn!("Unknown tags dropped: {}", self.unknown_tags);
        }
        if self.broken_links > 0 {
            warn!("Broken links: {}", self.broken_links);
        }
        if self.link_check_failures > 0 {
            warn!("Link checks that errored: {}", self.link_check_failures);
        }
        if self.duplicates > 0 {
            warn!("Duplicate fields: {}", self.duplicates);
        }
    }
}

/// Transform the raw worksheets into the published catalog. Pure with
/// respect to the filesystem; network is only touched through `checker`,
/// and only when `verify` is on.
pub fn process_songs(
    songs_ws: &Worksheet,
    reviews_ws: &Worksheet,
    taxonomy: &TagTaxonomy,
    verify: bool,
    checker: Option<&dyn LinkChecker>,
    config: &AppConfig,
) -> Result<(Catalog, UpdateStats)> {
    let mut stats = UpdateStats::default();

    let mut raw_reviews = Vec::with_capacity(reviews_ws.len());
    for row in reviews_ws.rows() {
        raw_reviews.push(RawReviewRow::from_row(&row)?);
    }

    let mut songs = Vec::with_capacity(songs_ws.len());
    for row in songs_ws.rows() {
        let raw = RawSongRow::from_row(&row)?;
        info!("{} - {}", raw.artist, raw.title);
        songs.push(normalize_song(&raw, taxonomy, verify, &mut stats));
        stats.songs_processed += 1;
    }

    stats.reviews_attached = attach_reviews(&mut songs, &raw_reviews);

    if verify {
        let checker = checker.context("Verification requested but no link checker provided")?;
        let mut verifier = Verifier::new(checker, &config.verify);
        for song in &songs {
            verifier.inspect(song, &mut stats);
        }
    }

    Ok((Catalog::new(songs), stats))
}

/// Full `update-songs` run: fetch, process, write `songs.json` and
/// `tags.json`.
pub fn update_songs(config: &AppConfig, verify: bool) -> Result<UpdateStats> {
    let songs_doc_key = match &config.sheet.songs_doc_key {
        Some(key) => key,
        None => bail!("No songs document key configured (sheet.songs_doc_key)"),
    };
    let copy_doc_key = match &config.sheet.copy_doc_key {
        Some(key) => key,
        None => bail!("No copy document key configured (sheet.copy_doc_key)"),
    };

    let timeout = Duration::from_secs(config.sheet.http_timeout_secs);
    let client = SheetClient::new(&config.sheet.export_url, timeout)?;

    info!("Fetching tag taxonomy...");
    let tags_ws = client.fetch_worksheet(copy_doc_key, config.sheet.tags_gid)?;
    let taxonomy = TagTaxonomy::from_worksheet(&tags_ws)?;
    info!("Taxonomy has {} tags", taxonomy.len());

    info!("Fetching songs and reviews...");
    let songs_ws = client.fetch_worksheet(songs_doc_key, config.sheet.songs_gid)?;
    let reviews_ws = client.fetch_worksheet(songs_doc_key, config.sheet.reviews_gid)?;
    info!(
        "Fetched {} song rows, {} review rows",
        songs_ws.len(),
        reviews_ws.len()
    );

    let http_checker;
    let checker: Option<&dyn LinkChecker> = if verify {
        http_checker = HttpLinkChecker::new(timeout)?;
        Some(&http_checker)
    } else {
        None
    };

    let (catalog, stats) = process_songs(&songs_ws, &reviews_ws, &taxonomy, verify, checker, config)?;

    write_catalog(&config.songs_json_path(), &catalog)
        .context("Failed to write the song catalog")?;
    write_taxonomy(&config.tags_json_path(), &taxonomy)
        .context("Failed to write the tag taxonomy")?;
    info!(
        "Wrote {} songs to {:?}",
        catalog.len(),
        config.songs_json_path()
    );

    stats.log_summary();
    Ok(stats)
}
