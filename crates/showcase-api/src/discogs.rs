// Discogs collection client
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_status, decode_json, Result};

const DISCOGS_API_BASE: &str = "https://api.discogs.com";

/// Discogs allows up to 100 releases per page
pub const MAX_PER_PAGE: u32 = 100;

pub struct DiscogsClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl DiscogsClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, DISCOGS_API_BASE.to_string())
    }

    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        // Discogs rejects requests without a User-Agent outright
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(crate::USER_AGENT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            token: token.filter(|t| !t.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Folder 0 is the "All" folder every Discogs collection has
    pub fn collection_url(&self, username: &str) -> String {
        format!(
            "{}/users/{}/collection/folders/0/releases",
            self.base_url,
            urlencoding::encode(username)
        )
    }

    /// Fetch the first page of a user's collection
    pub async fn list_collection(&self, username: &str) -> Result<Vec<DiscogsRelease>> {
        let url = self.collection_url(username);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", MAX_PER_PAGE.to_string())]);

        if let Some(ref token) = self.token {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Discogs token={}", token),
            );
        }

        let response = request.send().await?;
        let response = check_status(response, username).await?;

        let page: CollectionPage = decode_json(response).await?;
        Ok(page.releases)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionPage {
    /// Required: a 2xx body without it is an error payload, not an empty shelf
    releases: Vec<DiscogsRelease>,
}

/// One release in a collection folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsRelease {
    pub id: u64,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    pub basic_information: BasicInformation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicInformation {
    #[serde(default)]
    pub title: Option<String>,
    /// Discogs uses 0 for "unknown"
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub artists: Vec<DiscogsArtist>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub formats: Vec<DiscogsFormat>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsArtist {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsFormat {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qty: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
}
