use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::normalize::{GenreOverride, GenreOverrides, RepoSelection};
use crate::pager::DEFAULT_PAGE_SIZE;

/// Main configuration structure
///
/// Loaded from `config.toml`; CLI flags and the token env vars win over
/// whatever is in the file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub discogs: DiscogsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Load config from the default location, defaults if there is none
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> crate::Result<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> crate::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, contents)?;
        Ok(())
    }

    /// XDG config dir on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("showcase");

        Ok(config_dir.join("config.toml"))
    }

    /// Where the SQLite cache lives unless `cache.db_path` says otherwise
    pub fn cache_db_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.cache.db_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("showcase");

        Ok(data_dir.join("cache.db"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubConfig {
    #[serde(default = "default_github_user")]
    pub username: String,

    /// Personal access token, only needed to get past the anonymous rate limit
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_github_url")]
    pub api_url: String,

    /// `created`, `updated`, `pushed` or `full_name`
    #[serde(default = "default_github_sort")]
    pub sort: String,

    #[serde(default = "default_true")]
    pub exclude_forked: bool,

    /// Keep the N most popular repositories, 0 keeps all of them
    #[serde(default = "default_max_repos")]
    pub max_repos: usize,

    /// Repository names shown on the pinned tab
    #[serde(default = "default_pinned")]
    pub pinned: Vec<String>,

    /// Site folder holding `{repo}.png` screenshots
    #[serde(default)]
    pub screenshot_base: Option<String>,
}

fn default_github_user() -> String {
    "MathisTRD".to_string()
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_sort() -> String {
    "updated".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_repos() -> usize {
    6
}

fn default_pinned() -> Vec<String> {
    vec!["LetsGoDeeperV2".to_string(), "mattytr.dev".to_string()]
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: default_github_user(),
            token: None,
            api_url: default_github_url(),
            sort: default_github_sort(),
            exclude_forked: default_true(),
            max_repos: default_max_repos(),
            pinned: default_pinned(),
            screenshot_base: None,
        }
    }
}

impl GitHubConfig {
    pub fn selection(&self) -> RepoSelection {
        RepoSelection {
            exclude_forked: self.exclude_forked,
            max_repos: (self.max_repos > 0).then_some(self.max_repos),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscogsConfig {
    #[serde(default = "default_discogs_user")]
    pub username: String,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_discogs_url")]
    pub api_url: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Exact artist + title matches that get a forced primary genre
    #[serde(default)]
    pub genre_overrides: Vec<GenreOverride>,
}

fn default_discogs_user() -> String {
    "MathisTRD".to_string()
}

fn default_discogs_url() -> String {
    "https://api.discogs.com".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for DiscogsConfig {
    fn default() -> Self {
        Self {
            username: default_discogs_user(),
            token: None,
            api_url: default_discogs_url(),
            page_size: default_page_size(),
            genre_overrides: Vec::new(),
        }
    }
}

impl DiscogsConfig {
    pub fn overrides(&self) -> GenreOverrides {
        GenreOverrides::new(self.genre_overrides.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Overrides the default location under the user data dir
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            db_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.username, "MathisTRD");
        assert_eq!(config.github.sort, "updated");
        assert!(config.github.exclude_forked);
        assert_eq!(config.github.selection().max_repos, Some(6));
        assert_eq!(config.discogs.page_size, 50);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [github]
            username = "octocat"
            exclude_forked = false
            max_repos = 0

            [[discogs.genre_overrides]]
            creator = "Daughter"
            title = "Stereo Mind Game"
            genre = "Rock"
            "#,
        )
        .unwrap();

        assert_eq!(config.github.username, "octocat");
        assert!(!config.github.exclude_forked);
        assert_eq!(config.github.selection().max_repos, None);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.pinned.len(), 2);
        assert_eq!(
            config.discogs.overrides().lookup("Daughter", "Stereo Mind Game"),
            Some("Rock")
        );
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.discogs.username = "someone".into();
        config.cache.db_path = Some(dir.path().join("cache.db"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.cache_db_path().unwrap(), dir.path().join("cache.db"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_broken_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[github\nusername = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, crate::Error::ConfigError(_)));
    }
}
