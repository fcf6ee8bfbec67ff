// API clients for the two collection providers plus the asset host
pub mod assets;
pub mod discogs;
pub mod error;
pub mod github;

// Re-export common types
pub use assets::AssetProbe;
pub use discogs::{DiscogsClient, DiscogsRelease};
pub use error::{ApiError, Result};
pub use github::{GitHubClient, GitHubRepo, LanguageBreakdown};

/// Sent with every request; Discogs refuses anonymous agents
pub const USER_AGENT: &str = concat!("showcase/", env!("CARGO_PKG_VERSION"));
