//! Reading and writing the published JSON documents.
//!
//! The web layer re-reads these files on every request; the pipeline
//! overwrites them wholesale at the end of a run. Overwrite is direct, not
//! atomic, the pipeline runs out of band with page serving.

use super::{Catalog, TagTaxonomy};
use crate::social::FeaturedContent;
use anyhow::{Context, Result};
use std::path::Path;

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse catalog file: {:?}", path))
}

pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let text = serde_json::to_string(catalog).context("Failed to serialize catalog")?;
    std::fs::write(path, text).with_context(|| format!("Failed to write catalog file: {:?}", path))
}

pub fn load_taxonomy(path: &Path) -> Result<TagTaxonomy> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read taxonomy file: {:?}", path))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse taxonomy file: {:?}", path))
}

pub fn write_taxonomy(path: &Path, taxonomy: &TagTaxonomy) -> Result<()> {
    let text = serde_json::to_string(taxonomy).context("Failed to serialize taxonomy")?;
    std::fs::write(path, text).with_context(|| format!("Failed to write taxonomy file: {:?}", path))
}

pub fn load_featured(path: &Path) -> Result<FeaturedContent> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read featured content file: {:?}", path))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse featured content file: {:?}", path))
}

pub fn write_featured(path: &Path, featured: &FeaturedContent) -> Result<()> {
    let text = serde_json::to_string(featured).context("Failed to serialize featured content")?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write featured content file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Song;

    fn sample_song() -> Song {
        Song {
            id: "1".to_owned(),
            artist: "Hozier".to_owned(),
            title: "Take Me to Church".to_owned(),
            featured: true,
            media_url: "/atc/2014/09/church".to_owned(),
            song_art: "/assets/img/church-s500.jpg".to_owned(),
            genre_tags: vec!["rock".to_owned()],
            reviews: vec![],
        }
    }

    #[test]
    fn catalog_round_trips_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("songs.json");

        let catalog = Catalog::new(vec![sample_song()]);
        write_catalog(&path, &catalog).unwrap();
        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn write_overwrites_previous_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("songs.json");

        write_catalog(&path, &Catalog::new(vec![sample_song(), sample_song()])).unwrap();
        write_catalog(&path, &Catalog::new(vec![sample_song()])).unwrap();
        assert_eq!(load_catalog(&path).unwrap().len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_catalog(&dir.path().join("nope.json")).is_err());
    }
}
