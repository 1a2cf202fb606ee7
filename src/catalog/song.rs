use serde::{Deserialize, Serialize};

/// One editorial review attached to a song, keyed by the song id.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Review {
    pub id: String,
    pub review: String,
    pub reviewer: String,
}

/// One normalized song record, the unit of the published catalog.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Song {
    pub id: String,
    pub artist: String,
    pub title: String,
    pub featured: bool,
    pub media_url: String,
    pub song_art: String,
    /// Taxonomy codes, input order, duplicates removed. Every code is
    /// guaranteed to exist in the taxonomy the song was normalized against.
    pub genre_tags: Vec<String>,
    pub reviews: Vec<Review>,
}
