//! Page assembly: pure transforms over the materialized JSON documents.
//!
//! Sorting and grouping happen fresh on every request; nothing here holds
//! state between requests.

use crate::catalog::{Song, Tag, TagTaxonomy};
use crate::social::FeaturedContent;
use tracing::warn;

/// Case-insensitive sort key on the artist name. A leading "the " is
/// dropped, so "The National" sorts under "N".
pub fn artist_sort_key(artist: &str) -> String {
    let lower = artist.to_lowercase();
    match lower.strip_prefix("the ") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Sort songs by artist. Stable: ties keep their input order.
pub fn sort_songs(songs: &mut [Song]) {
    songs.sort_by_key(|s| artist_sort_key(&s.artist));
}

/// One bucket of the genre-grouped view.
#[derive(Debug, Clone)]
pub struct GenreGroup {
    pub tag: Tag,
    pub songs: Vec<Song>,
}

/// Group songs by the first entry of their genre tag list, one bucket per
/// taxonomy tag in taxonomy order. A song without any genre tag cannot be
/// placed and is skipped with a warning; empty buckets are kept.
pub fn group_by_genre(songs: &[Song], taxonomy: &TagTaxonomy) -> Vec<GenreGroup> {
    let mut groups: Vec<GenreGroup> = taxonomy
        .iter()
        .map(|tag| GenreGroup {
            tag: tag.clone(),
            songs: Vec::new(),
        })
        .collect();

    for song in songs {
        let code = match song.genre_tags.first() {
            Some(code) => code,
            None => {
                warn!(
                    "Song \"{}\" has no genre tags and is left out of the grouped view",
                    song.title
                );
                continue;
            }
        };
        match groups.iter_mut().find(|g| &g.tag.key == code) {
            Some(group) => group.songs.push(song.clone()),
            None => warn!(
                "Song \"{}\" is tagged \"{}\" which is not in the taxonomy",
                song.title, code
            ),
        }
    }

    groups
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

const HOME_SHELL: &str = include_str!("../ui/home.html");
const COVERS_SHELL: &str = include_str!("../ui/covers.html");
const SEAMUS_SHELL: &str = include_str!("../ui/seamus.html");

fn tag_list_items(tags: impl Iterator<Item = Tag>) -> String {
    let mut out = String::new();
    for tag in tags {
        out.push_str(&format!(
            "<li data-tag=\"{}\">{}</li>\n",
            escape_html(&tag.key),
            escape_html(&tag.displayname)
        ));
    }
    out
}

/// Render the home page: song count, the taxonomy split into genre and
/// playlist tags, and the featured social content.
pub fn render_home(total_songs: usize, taxonomy: &TagTaxonomy, featured: &FeaturedContent) -> String {
    let mut featured_html = String::new();
    for tweet in &featured.tweets {
        featured_html.push_str(&format!(
            "<article class=\"tweet\">\n<p>{}</p>\n<footer>@{} &middot; {}</footer>\n</article>\n",
            tweet.html,
            escape_html(&tweet.user.screen_name),
            escape_html(&tweet.creation_date)
        ));
    }
    for post in &featured.facebook_posts {
        featured_html.push_str(&format!(
            "<article class=\"facebook-post\">\n<p>{}</p>\n<footer>{} &middot; {}</footer>\n</article>\n",
            escape_html(&post.message),
            escape_html(&post.from.name),
            escape_html(&post.creation_date)
        ));
    }

    HOME_SHELL
        .replace("{{total_songs}}", &total_songs.to_string())
        .replace("{{genre_tags}}", &tag_list_items(taxonomy.genre_tags().cloned()))
        .replace(
            "{{playlist_tags}}",
            &tag_list_items(taxonomy.playlist_tags().cloned()),
        )
        .replace("{{featured}}", &featured_html)
}

fn song_list_item(song: &Song) -> String {
    let art = if song.song_art.is_empty() {
        String::new()
    } else {
        format!("<img src=\"{}\" alt=\"\">", escape_html(&song.song_art))
    };
    format!(
        "<li class=\"song\">{}<span class=\"artist\">{}</span> &mdash; <span class=\"title\">{}</span></li>\n",
        art,
        escape_html(&song.artist),
        escape_html(&song.title)
    )
}

/// Render the covers page: the full song list, sorted by artist.
pub fn render_covers(songs: &[Song]) -> String {
    let mut rows = String::new();
    for song in songs {
        rows.push_str(&song_list_item(song));
    }
    COVERS_SHELL.replace("{{songs}}", &rows)
}

/// Render the genre-grouped page.
pub fn render_seamus(groups: &[GenreGroup]) -> String {
    let mut sections = String::new();
    for group in groups {
        sections.push_str(&format!(
            "<section class=\"genre\" id=\"{}\">\n<h2>{}</h2>\n<ul>\n",
            escape_html(&group.tag.key),
            escape_html(&group.tag.displayname)
        ));
        for song in &group.songs {
            sections.push_str(&song_list_item(song));
        }
        sections.push_str("</ul>\n</section>\n");
    }
    SEAMUS_SHELL.replace("{{groups}}", &sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(artist: &str, title: &str, tags: &[&str]) -> Song {
        Song {
            id: title.to_string(),
            artist: artist.to_string(),
            title: title.to_string(),
            featured: false,
            media_url: String::new(),
            song_art: String::new(),
            genre_tags: tags.iter().map(|t| t.to_string()).collect(),
            reviews: vec![],
        }
    }

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

    #[test]
    fn the_prefix_is_dropped_from_the_sort_key() {
        assert_eq!(artist_sort_key("The National"), "national");
        assert_eq!(artist_sort_key("Bob Boilen"), "bob boilen");
        // Only the word "the " counts, not the fragment "the".
        assert_eq!(artist_sort_key("Theesatisfaction"), "theesatisfaction");
    }

    #[test]
    fn sorts_case_insensitively_with_the_prefix_rule() {
        let mut songs = vec![
            song("The National", "a", &[]),
            song("alt-J", "b", &[]),
            song("Beck", "c", &[]),
        ];
        sort_songs(&mut songs);
        let artists: Vec<&str> = songs.iter().map(|s| s.artist.as_str()).collect();
        assert_eq!(artists, vec!["alt-J", "Beck", "The National"]);
    }

    #[test]
    fn sorting_is_idempotent_and_stable() {
        let mut songs = vec![
            song("Air", "first", &[]),
            song("Air", "second", &[]),
            song("The Air", "third", &[]),
        ];
        sort_songs(&mut songs);
        let once: Vec<String> = songs.iter().map(|s| s.title.clone()).collect();
        // All three share the sort key "air"; input order is preserved.
        assert_eq!(once, vec!["first", "second", "third"]);

        sort_songs(&mut songs);
        let twice: Vec<String> = songs.iter().map(|s| s.title.clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn groups_by_first_genre_tag_in_taxonomy_order() {
        let songs = vec![
            song("The Band", "A", &["rock"]),
            song("Air", "B", &["rock", "electronic"]),
            song("Caribou", "C", &["electronic"]),
        ];
        let groups = group_by_genre(&songs, &taxonomy());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].tag.key, "rock");
        let rock_titles: Vec<&str> = groups[0].songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(rock_titles, vec!["A", "B"]);
        assert_eq!(groups[1].songs.len(), 1);
    }

    #[test]
    fn song_without_genre_tags_is_skipped_not_a_crash() {
        let songs = vec![song("Air", "B", &[]), song("Beck", "C", &["rock"])];
        let groups = group_by_genre(&songs, &taxonomy());
        let total: usize = groups.iter().map(|g| g.songs.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn empty_buckets_are_kept_in_taxonomy_order() {
        let groups = group_by_genre(&[], &taxonomy());
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.songs.is_empty()));
    }

    #[test]
    fn escapes_html_in_rendered_pages() {
        let songs = vec![song("Sleater<Kinney", "No \"Cities\"", &[])];
        let html = render_covers(&songs);
        assert!(html.contains("Sleater&lt;Kinney"));
        assert!(html.contains("No &quot;Cities&quot;"));
    }

    #[test]
    fn renders_home_with_counts_and_tag_lists() {
        let html = render_home(42, &taxonomy(), &FeaturedContent::default());
        assert!(html.contains("42"));
        assert!(html.contains("Rock"));
        assert!(html.contains("Electronic"));
    }
}
