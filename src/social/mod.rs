//! Featured social content.
//!
//! Curated tweets and Facebook posts shown on the home page. The share
//! worksheet of the copy document lists up to three featured URLs of each
//! kind; this module fetches them and writes `featured.json`. A failed fetch
//! skips that item, it never fails the whole refresh.

mod facebook;
mod twitter;

pub use facebook::FacebookClient;
pub use twitter::{
    render_tweet_html, HashtagEntity, MediaEntity, TweetEntities, TwitterClient, UrlEntity,
};

use crate::catalog::write_featured;
use crate::config::{AppConfig, Secrets};
use crate::sheet::{SheetClient, Worksheet};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// The featured content document, as published to `featured.json`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct FeaturedContent {
    pub tweets: Vec<FeaturedTweet>,
    pub facebook_posts: Vec<FacebookPost>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FeaturedTweet {
    pub id: u64,
    pub url: String,
    pub html: String,
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub user: TweetUser,
    pub creation_date: String,
    pub photo: Option<TweetPhoto>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TweetUser {
    pub id: u64,
    pub name: String,
    pub screen_name: String,
    pub profile_image_url: String,
    pub url: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TweetPhoto {
    pub url: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FacebookPost {
    pub id: String,
    pub message: String,
    pub link: FacebookLink,
    pub from: FacebookFrom,
    pub likes: u64,
    pub comments: u64,
    pub creation_date: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct FacebookLink {
    pub url: String,
    pub name: String,
    pub caption: Option<String>,
    pub description: String,
    pub picture: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct FacebookFrom {
    pub name: String,
    pub link: String,
    pub picture: String,
}

/// Normalized creation-date string, e.g. "Aug 9".
pub fn format_social_date(date: &DateTime<FixedOffset>) -> String {
    format!("{} {}", date.format("%b"), date.day())
}

/// Last path segment of a share URL, which is the post/status id.
pub fn id_from_url(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

/// Look up a value in the key/value `share` worksheet. Blank values read as
/// absent.
fn share_value(worksheet: &Worksheet, key: &str) -> Option<String> {
    for row in worksheet.rows() {
        if row.get("key").ok()? == key {
            let value = row.get("value").ok()?.trim();
            if value.is_empty() {
                return None;
            }
            return Some(value.to_string());
        }
    }
    None
}

/// Refresh `featured.json` from the share worksheet and the social APIs.
pub fn update_featured(config: &AppConfig, secrets: &Secrets) -> Result<()> {
    let copy_doc_key = match &config.sheet.copy_doc_key {
        Some(key) => key,
        None => bail!("No copy document key configured (sheet.copy_doc_key)"),
    };
    let twitter_token = match &secrets.twitter_bearer_token {
        Some(token) => token,
        None => bail!("SONGLIST_TWITTER_API_BEARER_TOKEN is not set"),
    };
    let facebook_token = match &secrets.facebook_app_token {
        Some(token) => token,
        None => bail!("SONGLIST_FACEBOOK_API_APP_TOKEN is not set"),
    };

    let timeout = Duration::from_secs(config.sheet.http_timeout_secs);
    let sheet_client = SheetClient::new(&config.sheet.export_url, timeout)?;
    let share_ws = sheet_client.fetch_worksheet(copy_doc_key, config.sheet.share_gid)?;

    let twitter = TwitterClient::new(twitter_token, timeout)?;
    let facebook = FacebookClient::new(facebook_token, timeout)?;

    info!("Fetching tweets...");
    let mut tweets = Vec::new();
    for i in 1..=3 {
        let key = format!("featured_tweet{}", i);
        let Some(tweet_url) = share_value(&share_ws, &key) else {
            continue;
        };
        match twitter.fetch_featured(&tweet_url) {
            Ok(tweet) => tweets.push(tweet),
            Err(err) => warn!("Skipping {}: {}", key, err),
        }
    }

    info!("Fetching Facebook posts...");
    let mut facebook_posts = Vec::new();
    for i in 1..=3 {
        let key = format!("featured_facebook{}", i);
        let Some(post_url) = share_value(&share_ws, &key) else {
            continue;
        };
        match facebook.fetch_featured(&post_url) {
            Ok(post) => facebook_posts.push(post),
            Err(err) => warn!("Skipping {}: {}", key, err),
        }
    }

    let featured = FeaturedContent {
        tweets,
        facebook_posts,
    };
    write_featured(&config.featured_json_path(), &featured)
        .context("Failed to write featured content")?;
    info!(
        "Wrote {} tweets and {} Facebook posts to {:?}",
        featured.tweets.len(),
        featured.facebook_posts.len(),
        config.featured_json_path()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dates_without_zero_padding() {
        let date = DateTime::parse_from_str("Sat Aug 09 13:08:45 +0000 2014", "%a %b %d %H:%M:%S %z %Y")
            .unwrap();
        assert_eq!(format_social_date(&date), "Aug 9");

        let date =
            DateTime::parse_from_str("2014-12-25T08:00:00+0000", "%Y-%m-%dT%H:%M:%S%z").unwrap();
        assert_eq!(format_social_date(&date), "Dec 25");
    }

    #[test]
    fn extracts_id_from_share_url() {
        assert_eq!(
            id_from_url("https://twitter.com/nprmusic/status/12345"),
            Some("12345")
        );
        assert_eq!(id_from_url("https://www.facebook.com/page/posts/678/"), Some("678"));
        assert_eq!(id_from_url(""), None);
    }

    #[test]
    fn reads_share_values_and_skips_blanks() {
        let ws = Worksheet::parse(
            "key,value\n\
             featured_tweet1,https://twitter.com/a/status/1\n\
             featured_tweet2,\n",
        )
        .unwrap();
        assert_eq!(
            share_value(&ws, "featured_tweet1").as_deref(),
            Some("https://twitter.com/a/status/1")
        );
        assert_eq!(share_value(&ws, "featured_tweet2"), None);
        assert_eq!(share_value(&ws, "featured_tweet3"), None);
    }

    #[test]
    fn featured_content_round_trips_through_json() {
        let featured = FeaturedContent {
            tweets: vec![],
            facebook_posts: vec![FacebookPost {
                id: "1".to_string(),
                message: "hello".to_string(),
                link: FacebookLink::default(),
                from: FacebookFrom::default(),
                likes: 3,
                comments: 1,
                creation_date: "Dec 25".to_string(),
            }],
        };
        let json = serde_json::to_string(&featured).unwrap();
        let back: FeaturedContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, featured);
    }
}
