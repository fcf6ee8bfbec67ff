// Existence checks for locally hosted screenshots
use tracing::debug;

use crate::error::Result;

/// Issues `HEAD` requests against the site's own static asset directory
pub struct AssetProbe {
    client: reqwest::Client,
    base_url: String,
}

impl AssetProbe {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the screenshot for a repository, e.g. `{base}/mattytr.dev.png`
    pub fn screenshot_url(&self, repo_name: &str) -> String {
        format!("{}/{}.png", self.base_url, urlencoding::encode(repo_name))
    }

    /// `Ok(true)` only for a 2xx answer. Any other status is a plain "no";
    /// transport failures come back as errors for the caller to swallow.
    pub async fn exists(&self, url: &str) -> Result<bool> {
        let response = self.client.head(url).send().await?;
        let found = response.status().is_success();
        debug!("HEAD {} -> {}", url, response.status());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_url() {
        let probe = AssetProbe::new("https://mattytr.dev/assets/screenshots/".into()).unwrap();
        assert_eq!(
            probe.screenshot_url("LetsGoDeeperV2"),
            "https://mattytr.dev/assets/screenshots/LetsGoDeeperV2.png"
        );
        assert_eq!(
            probe.screenshot_url("my repo"),
            "https://mattytr.dev/assets/screenshots/my%20repo.png"
        );
    }
}
