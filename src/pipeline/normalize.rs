//! Song row normalization.
//!
//! Raw spreadsheet rows come in as strings; this module trims them, applies
//! typographic quoting, coerces the featured flag, resolves genre tag codes
//! against the taxonomy and rewrites the art URL for a larger rendition.

use super::UpdateStats;
use crate::catalog::{Song, TagTaxonomy};
use crate::sheet::{Row, SheetError};
use crate::text::educate;
use tracing::warn;

/// Suffix inserted before the art file extension to request a larger
/// rendition from the image host.
const ART_SIZE_SUFFIX: &str = "-s500";

/// One song row as it appears in the spreadsheet, whitespace-trimmed but
/// otherwise untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSongRow {
    pub id: String,
    pub artist: String,
    pub title: String,
    pub featured: String,
    pub media_url: String,
    pub song_art: String,
    pub genre_tags: String,
}

impl RawSongRow {
    pub fn from_row(row: &Row<'_>) -> Result<RawSongRow, SheetError> {
        Ok(RawSongRow {
            id: row.get("id")?.trim().to_string(),
            artist: row.get("artist")?.trim().to_string(),
            title: row.get("title")?.trim().to_string(),
            featured: row.get("featured")?.trim().to_string(),
            media_url: row.get("media_url")?.trim().to_string(),
            song_art: row.get("song_art")?.trim().to_string(),
            genre_tags: row.get("genre_tags")?.trim().to_string(),
        })
    }
}

/// Only the literal string `"True"` means featured; anything else, including
/// `"TRUE"` and `"false"`, does not.
pub fn coerce_featured(raw: &str) -> bool {
    raw == "True"
}

/// Insert the size suffix before the file extension. An empty URL or one
/// without an extension is returned unchanged.
pub fn enlarge_art_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    match url.rfind('.') {
        Some(dot) if dot > url.rfind('/').map(|s| s + 1).unwrap_or(0) => {
            format!("{}{}{}", &url[..dot], ART_SIZE_SUFFIX, &url[dot..])
        }
        _ => url.to_string(),
    }
}

/// Split the raw comma-separated tag string and resolve each token against
/// the taxonomy. Unknown codes are dropped (logged when `verify` is on);
/// surviving codes keep input order, repeated codes are kept once.
pub fn resolve_genre_tags(
    raw: &str,
    taxonomy: &TagTaxonomy,
    verify: bool,
    stats: &mut UpdateStats,
) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match taxonomy.resolve(token) {
            Some(tag) => {
                if !tags.iter().any(|t| t == &tag.key) {
                    tags.push(tag.key.clone());
                }
            }
            None => {
                stats.unknown_tags += 1;
                if verify {
                    warn!("Tag \"{}\" is not a valid tag", token);
                }
            }
        }
    }
    tags
}

/// Produce a normalized song from a raw row. Never fails: data-quality
/// issues degrade to warnings, not aborts.
pub fn normalize_song(
    raw: &RawSongRow,
    taxonomy: &TagTaxonomy,
    verify: bool,
    stats: &mut UpdateStats,
) -> Song {
    let title = if raw.title.is_empty() {
        String::new()
    } else {
        educate(&raw.title)
    };
    let artist = if raw.artist.is_empty() {
        String::new()
    } else {
        educate(&raw.artist)
    };

    Song {
        id: raw.id.clone(),
        artist,
        title,
        featured: coerce_featured(&raw.featured),
        media_url: raw.media_url.clone(),
        song_art: enlarge_art_url(&raw.song_art),
        genre_tags: resolve_genre_tags(&raw.genre_tags, taxonomy, verify, stats),
        reviews: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Tag;

    fn taxonomy() -> TagTaxonomy {
        TagTaxonomy::new(vec![
            Tag {
                key: "rock".to_string(),
                displayname: "Rock".to_string(),
                genre: true,
            },
            Tag {
                key: "electronic".to_string(),
                displayname: "Electronic".to_string(),
                genre: true,
            },
        ])
    }

    fn raw_song() -> RawSongRow {
        RawSongRow {
            id: "1".to_string(),
            artist: "The War on Drugs".to_string(),
            title: "Red Eyes".to_string(),
            featured: "True".to_string(),
            media_url: "/atc/2014/12/redeyes".to_string(),
            song_art: "/img/redeyes.jpg".to_string(),
            genre_tags: "rock".to_string(),
        }
    }

    #[test]
    fn featured_requires_exact_literal() {
        assert!(coerce_featured("True"));
        assert!(!coerce_featured("TRUE"));
        assert!(!coerce_featured("true"));
        assert!(!coerce_featured("false"));
        assert!(!coerce_featured(""));
    }

    #[test]
    fn art_url_gets_size_suffix_before_extension() {
        assert_eq!(enlarge_art_url("/img/foo.jpg"), "/img/foo-s500.jpg");
        assert_eq!(enlarge_art_url("/a/b.c/foo.png"), "/a/b.c/foo-s500.png");
    }

    #[test]
    fn empty_or_extensionless_art_url_is_unchanged() {
        assert_eq!(enlarge_art_url(""), "");
        assert_eq!(enlarge_art_url("/img/noext"), "/img/noext");
    }

    #[test]
    fn resolves_known_tags_in_input_order() {
        let mut stats = UpdateStats::default();
        let tags = resolve_genre_tags(
            "electronic, rock",
            &taxonomy(),
            false,
            &mut stats,
        );
        assert_eq!(tags, vec!["electronic", "rock"]);
        assert_eq!(stats.unknown_tags, 0);
    }

    #[test]
    fn drops_unknown_tags_and_counts_them() {
        let mut stats = UpdateStats::default();
        let tags = resolve_genre_tags("rock, polka, rock", &taxonomy(), true, &mut stats);
        assert_eq!(tags, vec!["rock"]);
        assert_eq!(stats.unknown_tags, 1);
    }

    #[test]
    fn empty_tag_string_resolves_to_no_tags() {
        let mut stats = UpdateStats::default();
        assert!(resolve_genre_tags("", &taxonomy(), true, &mut stats).is_empty());
        assert_eq!(stats.unknown_tags, 0);
    }

    #[test]
    fn normalizes_full_row() {
        let mut stats = UpdateStats::default();
        let mut raw = raw_song();
        raw.title = "Don't Wanna Fight".to_string();
        let song = normalize_song(&raw, &taxonomy(), false, &mut stats);

        assert_eq!(song.title, "Don\u{2019}t Wanna Fight");
        assert!(song.featured);
        assert_eq!(song.song_art, "/img/redeyes-s500.jpg");
        assert_eq!(song.genre_tags, vec!["rock"]);
        assert!(song.reviews.is_empty());
    }

    #[test]
    fn empty_title_and_artist_stay_empty() {
        let mut stats = UpdateStats::default();
        let mut raw = raw_song();
        raw.title = String::new();
        raw.artist = String::new();
        let song = normalize_song(&raw, &taxonomy(), false, &mut stats);
        assert_eq!(song.title, "");
        assert_eq!(song.artist, "");
    }
}
