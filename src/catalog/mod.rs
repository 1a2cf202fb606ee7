mod load;
mod song;
mod tag;

pub use load::{
    load_catalog, load_featured, load_taxonomy, write_catalog, write_featured, write_taxonomy,
};
pub use song::{Review, Song};
pub use tag::{Tag, TagTaxonomy};

use serde::{Deserialize, Serialize};

/// The full normalized song list, regenerated wholesale on every pipeline
/// run. The JSON file it is written to is the only durable state.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    pub fn new(songs: Vec<Song>) -> Catalog {
        Catalog { songs }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn into_songs(self) -> Vec<Song> {
        self.songs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_array() {
        let catalog = Catalog::new(vec![]);
        assert_eq!(serde_json::to_string(&catalog).unwrap(), "[]");
    }
}
