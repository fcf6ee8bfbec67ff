// Collection sources for the two providers
pub mod discogs;
pub mod github;

pub use discogs::DiscogsSource;
pub use github::GitHubSource;
