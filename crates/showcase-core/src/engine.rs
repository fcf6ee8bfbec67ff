// Filtering and sorting over the in-memory collection.
//
// Everything here works on indices into the full list, so a filtered view
// can only ever contain items that were actually fetched.
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{FilterState, SortKey, SourceItem};

/// Apply `state` to `items` and return the matching items in display order
pub fn apply<'a>(items: &'a [SourceItem], state: &FilterState) -> Vec<&'a SourceItem> {
    apply_indices(items, state)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Like `apply`, but returns positions in `items`
pub fn apply_indices(items: &[SourceItem], state: &FilterState) -> Vec<usize> {
    apply_within(items, (0..items.len()).collect(), state)
}

/// Filter and sort a subset of `items` given as positions. With
/// `SortKey::Source` the candidates keep the order they came in.
pub fn apply_within(items: &[SourceItem], candidates: Vec<usize>, state: &FilterState) -> Vec<usize> {
    let term = state.search.trim().to_lowercase();

    let mut selected: Vec<usize> = candidates
        .into_iter()
        .filter(|&i| i < items.len())
        .filter(|&i| matches_search(&items[i], &term))
        .filter(|&i| match &state.category {
            Some(category) => items[i].has_tag(category),
            None => true,
        })
        .filter(|&i| match state.year {
            Some(year) => items[i].year == Some(year),
            None => true,
        })
        .collect();

    sort_indices(items, &mut selected, state.sort);
    selected
}

/// Case-insensitive substring match on creator or title. `term` must already
/// be lowercased; an empty term matches everything.
fn matches_search(item: &SourceItem, term: &str) -> bool {
    term.is_empty()
        || item.creator.to_lowercase().contains(term)
        || item.title.to_lowercase().contains(term)
}

/// Stable sort of `indices` by `key`
pub fn sort_indices(items: &[SourceItem], indices: &mut [usize], key: SortKey) {
    if key == SortKey::Source {
        return;
    }
    indices.sort_by(|&a, &b| compare(&items[a], &items[b], key));
}

/// Comparator behind every sort key. Missing fields count as zero/empty.
pub fn compare(a: &SourceItem, b: &SourceItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Source => Ordering::Equal,
        SortKey::Creator => text_order(&a.creator, &b.creator),
        SortKey::Title => text_order(&a.title, &b.title),
        SortKey::Year => b.year.unwrap_or(0).cmp(&a.year.unwrap_or(0)),
        SortKey::Recent => timestamp_ms(b).cmp(&timestamp_ms(a)),
        SortKey::Popularity => b.popularity().cmp(&a.popularity()),
        SortKey::Featured => b
            .featured_score()
            .partial_cmp(&a.featured_score())
            .unwrap_or(Ordering::Equal),
    }
}

fn timestamp_ms(item: &SourceItem) -> i64 {
    item.timestamp.map(|t| t.timestamp_millis()).unwrap_or(0)
}

/// Human ordering for names: case-insensitive first, exact spelling only to
/// break ties between otherwise equal strings.
pub fn text_order(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    match folded {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

/// Values for the filter dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    /// Alphabetical, unique
    pub categories: Vec<String>,
    /// Newest first, unique
    pub years: Vec<i32>,
}

pub fn facets(items: &[SourceItem]) -> Facets {
    let categories: BTreeSet<&str> = items
        .iter()
        .flat_map(|item| item.tags.iter().map(String::as_str))
        .collect();
    let years: BTreeSet<i32> = items.iter().filter_map(|item| item.year).collect();

    Facets {
        categories: categories.into_iter().map(str::to_string).collect(),
        years: years.into_iter().rev().collect(),
    }
}

/// Header numbers of the vinyl page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub total: usize,
    pub newest_year: Option<i32>,
    pub oldest_year: Option<i32>,
}

pub fn stats(items: &[SourceItem]) -> CollectionStats {
    let years = || items.iter().filter_map(|item| item.year).filter(|y| *y > 0);

    CollectionStats {
        total: items.len(),
        newest_year: years().max(),
        oldest_year: years().min(),
    }
}

/// The three showcase tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowcaseView {
    All,
    #[default]
    Pinned,
    Recent,
}

impl std::str::FromStr for ShowcaseView {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ShowcaseView::All),
            "pinned" => Ok(ShowcaseView::Pinned),
            "recent" => Ok(ShowcaseView::Recent),
            other => Err(crate::Error::InvalidInput(format!("unknown view '{}'", other))),
        }
    }
}

/// How many repos the pinned tab shows when nothing is explicitly pinned
pub const PINNED_FALLBACK_COUNT: usize = 3;

/// Indices of the repos a showcase tab displays
///
/// `Pinned` shows the repos named in `pinned` if any of them exist, otherwise
/// the top three by featured score.
pub fn view_indices(items: &[SourceItem], view: ShowcaseView, pinned: &[String]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..items.len()).collect();

    match view {
        ShowcaseView::All => indices,
        ShowcaseView::Recent => {
            sort_indices(items, &mut indices, SortKey::Recent);
            indices
        }
        ShowcaseView::Pinned => {
            let named: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|&i| pinned.iter().any(|name| *name == items[i].title))
                .collect();

            if !named.is_empty() {
                return named;
            }

            sort_indices(items, &mut indices, SortKey::Featured);
            indices.truncate(PINNED_FALLBACK_COUNT);
            indices
        }
    }
}
