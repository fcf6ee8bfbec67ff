// GitHub source - bridges the API client with the CollectionSource trait
use async_trait::async_trait;
use showcase_api::GitHubClient;
use tracing::debug;

use crate::{
    models::{CollectionKind, SourceItem},
    normalize::{select_repos, RepoSelection},
    source::CollectionSource,
    Result,
};

/// Public repositories of one user, ranked and capped
///
/// The cache stores the list after `sort` and `selection` were applied, and
/// its key is only collection and owner. Changing either setting takes effect
/// once the entry expires or after `showcase cache clear repos`.
pub struct GitHubSource {
    client: GitHubClient,
    /// Passed straight through as `?sort=`
    sort: String,
    selection: RepoSelection,
}

impl GitHubSource {
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            sort: "updated".to_string(),
            selection: RepoSelection::default(),
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_selection(mut self, selection: RepoSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }
}

#[async_trait]
impl CollectionSource for GitHubSource {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Repositories
    }

    async fn fetch(&self, owner: &str) -> Result<Vec<SourceItem>> {
        let repos = self.client.list_user_repos(owner, &self.sort).await?;
        let fetched = repos.len();

        let items = select_repos(repos, &self.selection);
        debug!("{} of {} repositories selected for {}", items.len(), fetched, owner);

        Ok(items)
    }
}
