// Wire types -> SourceItem. Every optional field gets its default here, once,
// so nothing downstream has to poke at nested Options again.
use serde::{Deserialize, Serialize};
use showcase_api::discogs::DiscogsFormat;
use showcase_api::{DiscogsRelease, GitHubRepo};

use crate::models::SourceItem;

/// Which repositories make it onto the showcase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSelection {
    pub exclude_forked: bool,
    /// Keep only the N most popular; `None` keeps everything
    pub max_repos: Option<usize>,
}

impl Default for RepoSelection {
    fn default() -> Self {
        Self {
            exclude_forked: true,
            max_repos: Some(6),
        }
    }
}

/// Drop private repos (and forks, if asked), rank by popularity, cap the count
pub fn select_repos(repos: Vec<GitHubRepo>, selection: &RepoSelection) -> Vec<SourceItem> {
    let mut items: Vec<SourceItem> = repos
        .into_iter()
        .filter(|repo| !repo.private)
        .filter(|repo| !(selection.exclude_forked && repo.fork))
        .map(repo_to_item)
        .collect();

    // sort_by is stable, so equal scores keep GitHub's order
    items.sort_by(|a, b| b.popularity().cmp(&a.popularity()));

    if let Some(max) = selection.max_repos {
        items.truncate(max);
    }

    items
}

pub fn repo_to_item(repo: GitHubRepo) -> SourceItem {
    let creator = repo
        .full_name
        .split_once('/')
        .map(|(owner, _)| owner.to_string())
        .unwrap_or_default();

    SourceItem {
        id: repo.id,
        title: repo.name,
        creator,
        creator_id: None,
        full_name: Some(repo.full_name),
        description: non_empty(repo.description),
        url: repo.html_url,
        homepage: non_empty(repo.homepage),
        tags: repo.topics,
        language: non_empty(repo.language),
        languages_url: non_empty(repo.languages_url),
        stars: Some(repo.stargazers_count),
        forks: Some(repo.forks_count),
        watchers: Some(repo.watchers_count),
        year: None,
        timestamp: repo.updated_at,
        media_url: None,
        format: None,
    }
}

/// Forces a genre for one exact creator + title pair. Some releases come back
/// from Discogs with no (or the wrong) genre; this is the fix-up table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreOverride {
    pub creator: String,
    pub title: String,
    pub genre: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreOverrides {
    entries: Vec<GenreOverride>,
}

impl GenreOverrides {
    pub fn new(entries: Vec<GenreOverride>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, creator: &str, title: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|o| o.creator == creator && o.title == title)
            .map(|o| o.genre.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn release_to_item(release: DiscogsRelease, overrides: &GenreOverrides) -> SourceItem {
    let info = release.basic_information;
    let first_artist = info.artists.into_iter().next();

    let creator_id = first_artist.as_ref().and_then(|a| a.id);
    // Missing names stay empty so search and sort see them as absent;
    // the renderer supplies the "Unknown ..." labels
    let creator = first_artist
        .and_then(|a| non_empty(a.name))
        .unwrap_or_default();
    let title = non_empty(info.title).unwrap_or_default();

    let mut tags = info.genres;
    if let Some(genre) = overrides.lookup(&creator, &title) {
        tags.retain(|g| g != genre);
        tags.insert(0, genre.to_string());
    }

    let media_url = non_empty(info.cover_image).or_else(|| non_empty(info.thumb));

    SourceItem {
        id: release.id,
        title,
        creator,
        creator_id,
        full_name: None,
        description: None,
        url: format!("https://www.discogs.com/release/{}", release.id),
        homepage: None,
        tags,
        language: None,
        languages_url: None,
        stars: None,
        forks: None,
        watchers: None,
        year: info.year.filter(|y| *y > 0),
        timestamp: release.date_added,
        media_url,
        format: format_label(&info.formats),
    }
}

pub fn releases_to_items(releases: Vec<DiscogsRelease>, overrides: &GenreOverrides) -> Vec<SourceItem> {
    releases
        .into_iter()
        .map(|r| release_to_item(r, overrides))
        .collect()
}

/// `Album 12"`, `LP`, `7"`... built from the first format entry
pub fn format_label(formats: &[DiscogsFormat]) -> Option<String> {
    let format = formats.first()?;
    let has = |d: &str| format.descriptions.iter().any(|x| x == d);

    let kind = ["Album", "LP", "Single", "EP"]
        .into_iter()
        .find(|d| has(*d))
        .map(str::to_string)
        .or_else(|| format.name.clone().filter(|n| !n.is_empty()));

    let size = ["12\"", "7\"", "10\""].into_iter().find(|d| has(*d));

    match (kind, size) {
        (Some(kind), Some(size)) => Some(format!("{} {}", kind, size)),
        (Some(kind), None) => Some(kind),
        (None, Some(size)) => Some(size.to_string()),
        (None, None) => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_api::discogs::{BasicInformation, DiscogsArtist};

    fn repo(id: u64, stars: u32, forks: u32, fork: bool, private: bool) -> GitHubRepo {
        GitHubRepo {
            id,
            name: format!("repo-{}", id),
            full_name: format!("MathisTRD/repo-{}", id),
            description: Some(String::new()),
            html_url: format!("https://github.com/MathisTRD/repo-{}", id),
            homepage: Some(String::new()),
            stargazers_count: stars,
            forks_count: forks,
            watchers_count: stars,
            language: None,
            languages_url: Some(format!("https://api.github.com/repos/MathisTRD/repo-{}/languages", id)),
            topics: vec![],
            updated_at: None,
            fork,
            private,
        }
    }

    fn release(artist: Option<&str>, title: Option<&str>, genres: &[&str]) -> DiscogsRelease {
        DiscogsRelease {
            id: 99,
            date_added: None,
            basic_information: BasicInformation {
                title: title.map(str::to_string),
                year: Some(0),
                artists: artist
                    .map(|name| {
                        vec![DiscogsArtist {
                            id: Some(5),
                            name: Some(name.to_string()),
                        }]
                    })
                    .unwrap_or_default(),
                genres: genres.iter().map(|g| g.to_string()).collect(),
                styles: vec![],
                formats: vec![],
                cover_image: Some(String::new()),
                thumb: Some("https://i.discogs.com/thumb.jpg".into()),
            },
        }
    }

    #[test]
    fn test_select_repos_drops_forks_and_private() {
        // 8 repos: 2 forks, 1 private -> 5 left
        let repos = vec![
            repo(1, 5, 0, false, false),
            repo(2, 1, 0, true, false),
            repo(3, 9, 1, false, false),
            repo(4, 0, 0, false, true),
            repo(5, 2, 2, false, false),
            repo(6, 7, 0, true, false),
            repo(7, 0, 0, false, false),
            repo(8, 3, 3, false, false),
        ];
        let selection = RepoSelection {
            exclude_forked: true,
            max_repos: None,
        };

        let items = select_repos(repos, &selection);

        assert_eq!(items.len(), 5);
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        // 3: 19, 1: 10, 8: 9, 5: 6, 7: 0
        assert_eq!(ids, vec![3, 1, 8, 5, 7]);
    }

    #[test]
    fn test_select_repos_keeps_forks_when_asked_and_caps() {
        let repos = vec![
            repo(1, 1, 0, true, false),
            repo(2, 2, 0, false, false),
            repo(3, 3, 0, false, true),
        ];
        let selection = RepoSelection {
            exclude_forked: false,
            max_repos: Some(1),
        };

        let items = select_repos(repos, &selection);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 2);
    }

    #[test]
    fn test_repo_to_item_blanks_become_none() {
        let item = repo_to_item(repo(1, 4, 2, false, false));
        assert_eq!(item.creator, "MathisTRD");
        assert_eq!(item.title, "repo-1");
        assert_eq!(item.description, None);
        assert_eq!(item.homepage, None);
        assert_eq!(item.popularity(), 10);
    }

    #[test]
    fn test_release_defaults() {
        let item = release_to_item(release(None, None, &[]), &GenreOverrides::default());
        assert_eq!(item.creator, "");
        assert_eq!(item.title, "");
        assert_eq!(item.year, None);
        // Empty cover falls through to the thumbnail
        assert_eq!(item.media_url.as_deref(), Some("https://i.discogs.com/thumb.jpg"));
        assert_eq!(item.url, "https://www.discogs.com/release/99");
    }

    #[test]
    fn test_genre_override_is_exact_and_primary() {
        let overrides = GenreOverrides::new(vec![GenreOverride {
            creator: "Daughter".into(),
            title: "Stereo Mind Game".into(),
            genre: "Rock".into(),
        }]);

        let item = release_to_item(
            release(Some("Daughter"), Some("Stereo Mind Game"), &["Electronic", "Rock"]),
            &overrides,
        );
        assert_eq!(item.tags, vec!["Rock", "Electronic"]);
        assert_eq!(item.creator_id, Some(5));

        // Substrings don't count
        let other = release_to_item(
            release(Some("Daughters"), Some("Stereo Mind Game"), &["Electronic"]),
            &overrides,
        );
        assert_eq!(other.tags, vec!["Electronic"]);
    }

    #[test]
    fn test_format_label() {
        let fmt = |name: Option<&str>, d: &[&str]| DiscogsFormat {
            name: name.map(str::to_string),
            qty: None,
            descriptions: d.iter().map(|s| s.to_string()).collect(),
        };

        assert_eq!(
            format_label(&[fmt(Some("Vinyl"), &["LP", "Album", "12\""])]),
            Some("Album 12\"".to_string())
        );
        assert_eq!(format_label(&[fmt(Some("Vinyl"), &["7\""])]), Some("Vinyl 7\"".to_string()));
        assert_eq!(format_label(&[fmt(None, &["10\""])]), Some("10\"".to_string()));
        assert_eq!(format_label(&[fmt(Some("CD"), &[])]), Some("CD".to_string()));
        assert_eq!(format_label(&[]), None);
    }
}
