//! Minimal Giphy search client for the image replies.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const SEARCH_URL: &str = "https://api.giphy.com/v1/gifs/search";
const SEARCH_LIMIT: u8 = 10;

#[derive(Clone)]
pub struct GiphyClient {
    client: Client,
    api_key: String,
}

impl GiphyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Original-size URL of the first GIF matching `query`, if any.
    pub async fn search_gif(&self, query: &str) -> Result<Option<String>> {
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .context("failed to reach Giphy")?;

        if !response.status().is_success() {
            anyhow::bail!("Giphy search failed with status {}", response.status());
        }

        let body = response.text().await.context("failed to read Giphy response")?;
        let url = first_gif_url(&body)?;
        debug!(query, found = url.is_some(), "giphy search");

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Gif>,
}

#[derive(Debug, Deserialize)]
struct Gif {
    images: Images,
}

#[derive(Debug, Deserialize)]
struct Images {
    original: Rendition,
}

#[derive(Debug, Deserialize)]
struct Rendition {
    url: String,
}

fn first_gif_url(body: &str) -> Result<Option<String>> {
    let response: SearchResponse =
        serde_json::from_str(body).context("unexpected Giphy response shape")?;

    Ok(response
        .data
        .into_iter()
        .next()
        .map(|gif| gif.images.original.url))
}
