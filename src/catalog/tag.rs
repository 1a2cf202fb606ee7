use crate::sheet::Worksheet;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One entry of the editorial tag taxonomy.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Tag {
    /// Stable code used in song records and as the grouping bucket key.
    pub key: String,
    /// Human label shown on the pages.
    pub displayname: String,
    /// True for genre tags, false for playlist/curator tags.
    pub genre: bool,
}

/// The tag taxonomy, loaded once per run. Order is editorial order and is
/// preserved everywhere tags are listed or grouped.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TagTaxonomy {
    tags: Vec<Tag>,
}

impl TagTaxonomy {
    pub fn new(tags: Vec<Tag>) -> TagTaxonomy {
        TagTaxonomy { tags }
    }

    /// Build the taxonomy from the `tags` worksheet. The `genre` column uses
    /// the same literal convention as song rows: only `"True"` means true.
    pub fn from_worksheet(worksheet: &Worksheet) -> Result<TagTaxonomy> {
        let mut tags = Vec::with_capacity(worksheet.len());
        for row in worksheet.rows() {
            let key = row.get("key")?.trim().to_string();
            if key.is_empty() {
                continue;
            }
            tags.push(Tag {
                key,
                displayname: row.get("displayname")?.trim().to_string(),
                genre: row.get("genre")? == "True",
            });
        }
        Ok(TagTaxonomy { tags })
    }

    /// Look up a tag by code. `None` means the code is not part of the
    /// taxonomy; callers decide whether that is worth a warning.
    pub fn resolve(&self, code: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key == code)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn genre_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| t.genre)
    }

    pub fn playlist_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| !t.genre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy_worksheet() -> Worksheet {
        Worksheet::parse(
            "key,displayname,genre\n\
             rock,Rock,True\n\
             electronic,Electronic,True\n\
             bobs-picks,Bob's Picks,False\n",
        )
        .unwrap()
    }

    #[test]
    fn builds_from_worksheet_in_order() {
        let taxonomy = TagTaxonomy::from_worksheet(&taxonomy_worksheet()).unwrap();
        let keys: Vec<&str> = taxonomy.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["rock", "electronic", "bobs-picks"]);
    }

    #[test]
    fn resolve_finds_known_codes_only() {
        let taxonomy = TagTaxonomy::from_worksheet(&taxonomy_worksheet()).unwrap();
        assert_eq!(taxonomy.resolve("rock").unwrap().displayname, "Rock");
        assert!(taxonomy.resolve("polka").is_none());
    }

    #[test]
    fn genre_flag_uses_literal_true() {
        let ws = Worksheet::parse("key,displayname,genre\na,A,True\nb,B,TRUE\nc,C,\n").unwrap();
        let taxonomy = TagTaxonomy::from_worksheet(&ws).unwrap();
        assert!(taxonomy.resolve("a").unwrap().genre);
        assert!(!taxonomy.resolve("b").unwrap().genre);
        assert!(!taxonomy.resolve("c").unwrap().genre);
    }

    #[test]
    fn splits_genre_and_playlist_tags() {
        let taxonomy = TagTaxonomy::from_worksheet(&taxonomy_worksheet()).unwrap();
        assert_eq!(taxonomy.genre_tags().count(), 2);
        assert_eq!(taxonomy.playlist_tags().count(), 1);
    }
}
