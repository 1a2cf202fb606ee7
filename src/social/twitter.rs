//! Twitter API client for featured tweets.
//!
//! Fetches a status by id and rewrites its entity spans (media, urls,
//! hashtags) into anchor tags for direct embedding on the home page.

use super::{format_social_date, id_from_url, FeaturedTweet, TweetPhoto, TweetUser};
use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const TWITTER_API_BASE: &str = "https://api.twitter.com/1.1";
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

pub struct TwitterClient {
    client: Client,
    bearer_token: String,
}

#[derive(Deserialize, Debug)]
struct StatusResponse {
    id: u64,
    text: String,
    created_at: String,
    favorite_count: Option<u64>,
    retweet_count: Option<u64>,
    user: StatusUser,
    #[serde(default)]
    entities: TweetEntities,
}

#[derive(Deserialize, Debug)]
struct StatusUser {
    id: u64,
    name: String,
    screen_name: String,
    profile_image_url: String,
    url: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct TweetEntities {
    #[serde(default)]
    pub media: Vec<MediaEntity>,
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MediaEntity {
    pub url: String,
    pub media_url: String,
    pub display_url: String,
    pub indices: (usize, usize),
    #[serde(rename = "type")]
    pub media_type: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UrlEntity {
    pub url: String,
    pub display_url: String,
    pub indices: (usize, usize),
}

#[derive(Deserialize, Debug, Clone)]
pub struct HashtagEntity {
    pub text: String,
    pub indices: (usize, usize),
}

/// Entity indices count codepoints, not bytes.
fn slice_codepoints(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

fn anchor(href: &str, label: &str) -> String {
    format!("<a href=\"{}\" target=\"_blank\">{}</a>", href, label)
}

/// Rewrite the entity spans of a tweet's text into anchor tags. Returns the
/// HTML and the first photo, if any.
pub fn render_tweet_html(text: &str, entities: &TweetEntities) -> (String, Option<TweetPhoto>) {
    let mut subs: Vec<(String, String)> = Vec::new();
    let mut photo = None;

    for media in &entities.media {
        let original = slice_codepoints(text, media.indices.0, media.indices.1);
        subs.push((original, anchor(&media.url, &media.display_url)));
        if media.media_type == "photo" && photo.is_none() {
            photo = Some(TweetPhoto {
                url: media.media_url.clone(),
            });
        }
    }

    for url in &entities.urls {
        let original = slice_codepoints(text, url.indices.0, url.indices.1);
        subs.push((original, anchor(&url.url, &url.display_url)));
    }

    for hashtag in &entities.hashtags {
        let original = slice_codepoints(text, hashtag.indices.0, hashtag.indices.1);
        let href = format!("https://twitter.com/hashtag/{}", hashtag.text);
        subs.push((original, anchor(&href, &format!("#{}", hashtag.text))));
    }

    let mut html = text.to_string();
    for (original, replacement) in &subs {
        if !original.is_empty() {
            html = html.replace(original.as_str(), replacement);
        }
    }

    (html, photo)
}

impl TwitterClient {
    pub fn new(bearer_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Twitter HTTP client")?;
        Ok(TwitterClient {
            client,
            bearer_token: bearer_token.to_string(),
        })
    }

    /// Fetch one featured tweet by its share URL.
    pub fn fetch_featured(&self, tweet_url: &str) -> Result<FeaturedTweet> {
        let tweet_id = id_from_url(tweet_url)
            .with_context(|| format!("Could not extract tweet id from \"{}\"", tweet_url))?;

        let url = format!("{}/statuses/show.json?id={}", TWITTER_API_BASE, tweet_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .context("Twitter API request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Twitter API failed with status {}", response.status());
        }

        let status: StatusResponse = response
            .json()
            .context("Failed to parse Twitter API response")?;

        let creation_date = DateTime::parse_from_str(&status.created_at, CREATED_AT_FORMAT)
            .with_context(|| format!("Unparseable created_at \"{}\"", status.created_at))?;

        let canonical_url = format!(
            "http://twitter.com/{}/status/{}",
            status.user.screen_name, status.id
        );
        let (html, photo) = render_tweet_html(&status.text, &status.entities);

        Ok(FeaturedTweet {
            id: status.id,
            url: canonical_url,
            html,
            favorite_count: status.favorite_count.unwrap_or(0),
            retweet_count: status.retweet_count.unwrap_or(0),
            user: TweetUser {
                id: status.user.id,
                name: status.user.name,
                screen_name: status.user.screen_name,
                profile_image_url: status.user.profile_image_url,
                url: status.user.url,
            },
            creation_date: format_social_date(&creation_date),
            photo,
        })
    }
}
