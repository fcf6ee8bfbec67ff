// Terminal rendering of a pipeline's output
use showcase_core::{CollectionKind, CollectionView, DisplayItem, EnrichmentState, Page};

/// What the pipeline last asked us to show
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Items(Page<DisplayItem>),
    Empty,
    Error(String),
}

/// Buffers the latest screen and prints it once the command is done,
/// so intermediate renders (filter, page jump) don't spam the terminal.
#[derive(Debug)]
pub struct TerminalView {
    screen: Screen,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            screen: Screen::Loading,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn print_json(&self) -> anyhow::Result<()> {
        match &self.screen {
            Screen::Items(page) => println!("{}", serde_json::to_string_pretty(page)?),
            Screen::Empty => println!("[]"),
            Screen::Loading => {}
            Screen::Error(message) => anyhow::bail!("{}", message),
        }
        Ok(())
    }

    pub fn print(&self) -> anyhow::Result<()> {
        match &self.screen {
            Screen::Loading => println!("Loading..."),
            Screen::Empty => {
                println!("Nothing to show.");
                println!("Try a different search or filter, or run the command again.");
            }
            Screen::Error(message) => {
                eprintln!("Could not load the collection: {}", message);
                eprintln!("Run the command again to retry.");
                anyhow::bail!("load failed");
            }
            Screen::Items(page) => {
                for item in &page.items {
                    match item.kind {
                        CollectionKind::Repositories => print_repository(item),
                        CollectionKind::Vinyl => print_release(item),
                    }
                }
                print_footer(page);
            }
        }
        Ok(())
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionView for TerminalView {
    fn show_loading(&mut self) {
        tracing::debug!("Loading...");
        self.screen = Screen::Loading;
    }

    fn show_items(&mut self, page: &Page<DisplayItem>) {
        self.screen = Screen::Items(page.clone());
    }

    fn show_empty(&mut self) {
        self.screen = Screen::Empty;
    }

    fn show_error(&mut self, message: &str) {
        self.screen = Screen::Error(message.to_string());
    }

    fn update_item(&mut self, item: &DisplayItem) {
        if let Screen::Items(page) = &mut self.screen {
            if let Some(slot) = page.items.iter_mut().find(|i| i.id == item.id) {
                *slot = item.clone();
            }
        }
    }
}

fn print_repository(item: &DisplayItem) {
    let language = item.primary_tag.as_deref().unwrap_or("-");
    println!(
        "{}  [{}]  stars {}  forks {}",
        item.title,
        language,
        item.stars.unwrap_or(0),
        item.forks.unwrap_or(0)
    );
    println!("    {}", item.description);

    if !item.tags.is_empty() {
        println!("    topics: {}", item.tags.join(", "));
    }

    match item.enrichment {
        EnrichmentState::Done if !item.languages.is_empty() => {
            let chips: Vec<String> = item.languages.iter().map(|l| l.title()).collect();
            println!("    languages: {}", chips.join(" / "));
        }
        EnrichmentState::Pending => println!("    Loading languages..."),
        _ => {}
    }

    println!("    {}", item.url);
    if let Some(homepage) = &item.homepage {
        println!("    {}", homepage);
    }
    if let Some(image) = item.media.url() {
        println!("    image: {}", image);
    }
    if let Some(date) = &item.date {
        println!("    updated {}", date);
    }
    println!();
}

fn print_release(item: &DisplayItem) {
    let year = item
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());

    print!("{} - {} ({})", item.creator, item.title, year);
    if let Some(format) = &item.format {
        print!("  {}", format);
    }
    if let Some(genre) = &item.primary_tag {
        print!("  [{}]", genre);
    }
    println!();
    println!("    {}", item.url);
}

fn print_footer(page: &Page<DisplayItem>) {
    println!(
        "Page {}/{} ({} items)",
        page.page_number, page.total_pages, page.total_items
    );
    if page.has_next() {
        println!("Next: --page {}", page.page_number + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::{EnrichmentState, Media};

    fn display(id: u64) -> DisplayItem {
        DisplayItem {
            id,
            kind: CollectionKind::Repositories,
            title: format!("repo-{}", id),
            creator: "MathisTRD".into(),
            creator_url: None,
            description: "No description available.".into(),
            url: format!("https://github.com/MathisTRD/repo-{}", id),
            homepage: None,
            tags: vec![],
            primary_tag: None,
            stars: Some(1),
            forks: Some(0),
            popularity: Some(2),
            year: None,
            date: None,
            format: None,
            media: Media::Placeholder,
            languages: vec![],
            enrichment: EnrichmentState::Pending,
        }
    }

    #[test]
    fn test_update_item_patches_buffered_page() {
        let mut view = TerminalView::new();
        view.show_items(&Page {
            items: vec![display(1), display(2)],
            page_number: 1,
            page_size: 50,
            total_pages: 1,
            total_items: 2,
        });

        let mut done = display(2);
        done.enrichment = EnrichmentState::Cleared;
        view.update_item(&done);

        let Screen::Items(page) = view.screen() else {
            panic!("expected items");
        };
        assert_eq!(page.items[0].enrichment, EnrichmentState::Pending);
        assert_eq!(page.items[1].enrichment, EnrichmentState::Cleared);
    }

    #[test]
    fn test_error_screen_fails_the_command() {
        let mut view = TerminalView::new();
        view.show_error("rate limited");
        assert!(view.print().is_err());
        assert!(view.print_json().is_err());

        view.show_empty();
        assert!(view.print().is_ok());
    }
}
