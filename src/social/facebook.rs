//! Facebook Graph API client for featured posts.

use super::{format_social_date, id_from_url, FacebookFrom, FacebookLink, FacebookPost};
use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const GRAPH_API_BASE: &str = "https://graph.facebook.com";
const CREATED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub struct FacebookClient {
    client: Client,
    app_token: String,
}

#[derive(Deserialize, Debug)]
struct PostResponse {
    id: String,
    message: String,
    created_time: String,
    link: String,
    name: String,
    caption: Option<String>,
    description: String,
    picture: String,
    from: PostAuthor,
}

#[derive(Deserialize, Debug)]
struct PostAuthor {
    id: String,
}

#[derive(Deserialize, Debug)]
struct UserResponse {
    name: String,
    link: String,
}

#[derive(Deserialize, Debug)]
struct PictureResponse {
    data: PictureData,
}

#[derive(Deserialize, Debug)]
struct PictureData {
    url: String,
}

#[derive(Deserialize, Debug)]
struct SummaryResponse {
    summary: Summary,
}

#[derive(Deserialize, Debug)]
struct Summary {
    total_count: u64,
}

impl FacebookClient {
    pub fn new(app_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Facebook HTTP client")?;
        Ok(FacebookClient {
            client,
            app_token: app_token.to_string(),
        })
    }

    fn get_object<T: DeserializeOwned>(&self, path: &str, extra_query: &str) -> Result<T> {
        let url = format!(
            "{}/{}?access_token={}{}",
            GRAPH_API_BASE, path, self.app_token, extra_query
        );
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Graph API request for {} failed", path))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Graph API failed with status {} for {}",
                response.status(),
                path
            );
        }

        response
            .json()
            .with_context(|| format!("Failed to parse Graph API response for {}", path))
    }

    /// Fetch one featured post by its share URL, along with its author and
    /// engagement summaries.
    pub fn fetch_featured(&self, post_url: &str) -> Result<FacebookPost> {
        let post_id = id_from_url(post_url)
            .with_context(|| format!("Could not extract post id from \"{}\"", post_url))?;

        let post: PostResponse = self.get_object(post_id, "")?;
        let user: UserResponse = self.get_object(&post.from.id, "")?;
        let user_picture: PictureResponse =
            self.get_object(&format!("{}/picture", post.from.id), "&redirect=false")?;
        let likes: SummaryResponse =
            self.get_object(&format!("{}/likes", post_id), "&summary=true&limit=0")?;
        let comments: SummaryResponse =
            self.get_object(&format!("{}/comments", post_id), "&summary=true&limit=0")?;

        let creation_date = DateTime::parse_from_str(&post.created_time, CREATED_TIME_FORMAT)
            .with_context(|| format!("Unparseable created_time \"{}\"", post.created_time))?;

        Ok(FacebookPost {
            id: post.id,
            message: post.message,
            link: FacebookLink {
                url: post.link,
                name: post.name,
                caption: post.caption,
                description: post.description,
                picture: post.picture,
            },
            from: FacebookFrom {
                name: user.name,
                link: user.link,
                picture: user_picture.data.url,
            },
            likes: likes.summary.total_count,
            comments: comments.summary.total_count,
            creation_date: format_social_date(&creation_date),
        })
    }
}
