// GitHub REST client - only the two endpoints the showcase actually needs
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_status, decode_json, Result};

const GITHUB_API_BASE: &str = "https://api.github.com";

/// GitHub caps `per_page` at 100, and a personal account rarely has more
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or a local stub server
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(crate::USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn repos_url(&self, owner: &str) -> String {
        format!(
            "{}/users/{}/repos",
            self.base_url,
            urlencoding::encode(owner)
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// List public repositories of a user, ordered by `sort` on GitHub's side
    /// (`updated`, `pushed`, `created`, `full_name`).
    pub async fn list_user_repos(&self, owner: &str, sort: &str) -> Result<Vec<GitHubRepo>> {
        let url = self.repos_url(owner);
        debug!("GET {} (sort={})", url, sort);

        let request = self.client.get(&url).query(&[
            ("sort", sort.to_string()),
            ("per_page", MAX_PER_PAGE.to_string()),
        ]);

        let response = self.authorized(request).send().await?;
        let response = check_status(response, owner).await?;

        decode_json(response).await
    }

    /// Fetch the language breakdown (language name -> bytes) for one repository
    pub async fn get_languages(&self, languages_url: &str) -> Result<LanguageBreakdown> {
        debug!("GET {}", languages_url);

        let response = self
            .authorized(self.client.get(languages_url))
            .send()
            .await?;
        let response = check_status(response, languages_url).await?;

        decode_json(response).await
    }
}

/// Language name -> byte count, exactly as GitHub returns it
pub type LanguageBreakdown = BTreeMap<String, u64>;

/// One entry of `GET /users/{owner}/repos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub languages_url: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub private: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPOS_FIXTURE: &str = r#"[
        {
            "id": 1296269,
            "name": "mattytr.dev",
            "full_name": "MathisTRD/mattytr.dev",
            "description": "Personal site",
            "html_url": "https://github.com/MathisTRD/mattytr.dev",
            "homepage": "https://mattytr.dev",
            "stargazers_count": 12,
            "forks_count": 3,
            "watchers_count": 12,
            "language": "JavaScript",
            "languages_url": "https://api.github.com/repos/MathisTRD/mattytr.dev/languages",
            "topics": ["portfolio", "website"],
            "updated_at": "2024-05-01T10:00:00Z",
            "fork": false,
            "private": false
        },
        {
            "id": 42,
            "name": "forked-thing",
            "full_name": "MathisTRD/forked-thing",
            "description": null,
            "html_url": "https://github.com/MathisTRD/forked-thing",
            "fork": true
        }
    ]"#;

    #[test]
    fn test_repos_fixture_parses() {
        let repos: Vec<GitHubRepo> = serde_json::from_str(REPOS_FIXTURE).unwrap();
        assert_eq!(repos.len(), 2);

        let site = &repos[0];
        assert_eq!(site.full_name, "MathisTRD/mattytr.dev");
        assert_eq!(site.stargazers_count, 12);
        assert_eq!(site.topics, vec!["portfolio", "website"]);
        assert!(site.updated_at.is_some());

        // Missing fields fall back to their defaults
        let fork = &repos[1];
        assert!(fork.fork);
        assert!(!fork.private);
        assert_eq!(fork.stargazers_count, 0);
        assert!(fork.topics.is_empty());
        assert!(fork.languages_url.is_none());
    }

    #[test]
    fn test_language_breakdown_parses() {
        let langs: LanguageBreakdown =
            serde_json::from_str(r#"{"JavaScript": 9000, "CSS": 800, "HTML": 200}"#).unwrap();
        assert_eq!(langs.get("JavaScript"), Some(&9000));
        assert_eq!(langs.len(), 3);
    }

    #[test]
    fn test_repos_url_encodes_owner() {
        let client =
            GitHubClient::with_base_url(None, "https://api.example.com/".to_string()).unwrap();
        assert_eq!(
            client.repos_url("some user"),
            "https://api.example.com/users/some%20user/repos"
        );
    }
}
