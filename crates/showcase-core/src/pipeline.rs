// One collection on screen: fetch -> filter/sort -> page -> render -> enrich
use futures::stream::{FuturesUnordered, StreamExt};
use showcase_cache::CollectionCache;
use tracing::{debug, info, warn};

use crate::engine::{self, apply_within, view_indices, CollectionStats, Facets, ShowcaseView};
use crate::enrich::Enricher;
use crate::fetch::{fetch_with_cache, FetchOutcome, Origin};
use crate::models::{DisplayItem, EnrichmentState, FilterState, Page, SourceItem};
use crate::pager::{paginate, DEFAULT_PAGE_SIZE};
use crate::render::Renderer;
use crate::source::CollectionSource;
use crate::Result;

/// `Idle -> Loading -> Loaded | Error`. Filter and page changes stay in
/// `Loaded`; only an explicit load or retry goes back to `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Whatever draws the collection
pub trait CollectionView: Send {
    fn show_loading(&mut self);
    fn show_items(&mut self, page: &Page<DisplayItem>);
    /// Loaded fine, nothing to show (empty collection or no filter matches)
    fn show_empty(&mut self);
    fn show_error(&mut self, message: &str);
    /// One item of the current page changed after enrichment
    fn update_item(&mut self, item: &DisplayItem);
}

/// Identifies one load. Only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub owner: String,
    pub page_size: usize,
    pub view: ShowcaseView,
    /// Repository names for `ShowcaseView::Pinned`
    pub pinned: Vec<String>,
    /// Page shown after a successful load, clamped like `set_page`
    pub start_page: usize,
}

impl PipelineOptions {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            page_size: DEFAULT_PAGE_SIZE,
            view: ShowcaseView::All,
            pinned: Vec::new(),
            start_page: 1,
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn view(mut self, view: ShowcaseView, pinned: Vec<String>) -> Self {
        self.view = view;
        self.pinned = pinned;
        self
    }

    pub fn start_page(mut self, page_number: usize) -> Self {
        self.start_page = page_number;
        self
    }
}

pub struct Pipeline<V: CollectionView> {
    source: Box<dyn CollectionSource>,
    cache: Option<CollectionCache>,
    enricher: Box<dyn Enricher>,
    renderer: Renderer,
    view: V,
    options: PipelineOptions,

    state: PipelineState,
    origin: Option<Origin>,
    /// Everything that was fetched, in provider order
    items: Vec<SourceItem>,
    /// Positions in `items` that pass the current view and filter
    filtered: Vec<usize>,
    filter: FilterState,
    page_number: usize,
    page: Option<Page<DisplayItem>>,
    generation: u64,
}

impl<V: CollectionView> Pipeline<V> {
    pub fn new(
        source: Box<dyn CollectionSource>,
        enricher: Box<dyn Enricher>,
        view: V,
        options: PipelineOptions,
    ) -> Self {
        let renderer = Renderer::new(source.kind());
        Self {
            source,
            cache: None,
            enricher,
            renderer,
            view,
            options,
            state: PipelineState::Idle,
            origin: None,
            items: Vec::new(),
            filtered: Vec::new(),
            filter: FilterState::default(),
            page_number: 1,
            page: None,
            generation: 0,
        }
    }

    pub fn with_cache(mut self, cache: CollectionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn items(&self) -> &[SourceItem] {
        &self.items
    }

    /// Current filtered list in display order
    pub fn filtered(&self) -> Vec<&SourceItem> {
        self.filtered.iter().map(|&i| &self.items[i]).collect()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page(&self) -> Option<&Page<DisplayItem>> {
        self.page.as_ref()
    }

    pub fn facets(&self) -> Facets {
        engine::facets(&self.items)
    }

    pub fn stats(&self) -> CollectionStats {
        engine::stats(&self.items)
    }

    /// Begin a load. Any load started earlier is superseded.
    pub fn start_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = PipelineState::Loading;
        self.view.show_loading();
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// The network/cache half of a load. Doesn't touch pipeline state.
    pub async fn fetch(&self) -> Result<FetchOutcome> {
        fetch_with_cache(self.source.as_ref(), self.cache.as_ref(), &self.options.owner).await
    }

    /// Finish the load `ticket` belongs to. Returns false and changes
    /// nothing if a newer load has started since.
    pub async fn complete_load(&mut self, ticket: LoadTicket, outcome: Result<FetchOutcome>) -> bool {
        if !self.is_current(ticket) {
            debug!("Dropping superseded load {:?} (current {})", ticket, self.generation);
            return false;
        }

        match outcome {
            Ok(outcome) => {
                info!(
                    "Loaded {} {} items from {:?}",
                    outcome.items.len(),
                    self.renderer.kind(),
                    outcome.origin
                );
                self.items = outcome.items;
                self.origin = Some(outcome.origin);
                self.state = PipelineState::Loaded;
                self.page_number = self.options.start_page;
                self.refilter();
                self.show_page().await;
            }
            Err(e) => {
                warn!("Loading {} failed: {}", self.renderer.kind(), e);
                let message = e.to_string();
                self.items.clear();
                self.filtered.clear();
                self.page = None;
                self.origin = None;
                self.view.show_error(&message);
                self.state = PipelineState::Error(message);
            }
        }

        true
    }

    pub async fn load(&mut self) {
        let ticket = self.start_load();
        let outcome = self.fetch().await;
        self.complete_load(ticket, outcome).await;
    }

    /// Same as `load`; the only way out of `Error`
    pub async fn retry(&mut self) {
        self.load().await;
    }

    /// Replace the filter and go back to page 1. Never refetches.
    pub async fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.page_number = 1;
        self.refilter();
        if self.state == PipelineState::Loaded {
            self.show_page().await;
        }
    }

    pub async fn set_showcase_view(&mut self, view: ShowcaseView) {
        self.options.view = view;
        self.page_number = 1;
        self.refilter();
        if self.state == PipelineState::Loaded {
            self.show_page().await;
        }
    }

    /// Jump to a page; out of range numbers are clamped. Never refetches.
    pub async fn set_page(&mut self, page_number: usize) {
        self.page_number = page_number;
        if self.state == PipelineState::Loaded {
            self.show_page().await;
        }
    }

    pub async fn next_page(&mut self) {
        let next = self.page_number.saturating_add(1);
        self.set_page(next).await;
    }

    pub async fn prev_page(&mut self) {
        let prev = self.page_number.saturating_sub(1).max(1);
        self.set_page(prev).await;
    }

    /// Forget the cached copy of this collection. Next load hits the network.
    pub fn clear_cache(&self) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.clear(self.source.kind().cache_collection(), &self.options.owner)?;
        }
        Ok(())
    }

    fn refilter(&mut self) {
        let candidates = view_indices(&self.items, self.options.view, &self.options.pinned);
        self.filtered = apply_within(&self.items, candidates, &self.filter);
    }

    /// Render the current page, then enrich its items as lookups complete
    async fn show_page(&mut self) {
        let positions = paginate(&self.filtered, self.page_number, self.options.page_size);
        self.page_number = positions.page_number;

        let mut rendered = self
            .renderer
            .render(positions.clone().map(|i| &self.items[i]));

        for (display, &i) in rendered.items.iter_mut().zip(&positions.items) {
            if self.enricher.applies_to(&self.items[i]) {
                display.enrichment = EnrichmentState::Pending;
            }
        }

        if rendered.is_empty() {
            self.view.show_empty();
        } else {
            self.view.show_items(&rendered);
        }

        let enricher = &self.enricher;
        let items = &self.items;
        let mut lookups: FuturesUnordered<_> = positions
            .items
            .iter()
            .enumerate()
            .filter(|(_, i)| enricher.applies_to(&items[**i]))
            .map(|(slot, &i)| async move { (slot, enricher.enrich(&items[i]).await) })
            .collect();

        // Completion order, each result only touches its own slot
        while let Some((slot, found)) = lookups.next().await {
            if let Some(display) = rendered.items.get_mut(slot) {
                display.apply_enrichment(found);
                self.view.update_item(display);
            }
        }
        drop(lookups);

        self.page = Some(rendered);
    }
}
