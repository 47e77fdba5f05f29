//! Immutable application state and the pagination cursor.
//!
//! [`State`] is a value: every change derives a new snapshot through a
//! `with_*` method, and the store replaces its held snapshot wholesale.
//! Nothing in this module performs I/O.

mod item;
mod likes;
mod theme;

pub use item::Item;
pub use likes::LikeSet;
pub use theme::Theme;

/// Page size used by the catalog API.
pub const PAGE_SIZE: usize = 20;

/// Snapshot of everything a consumer renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Fetched catalog items, in fetch order. Pages are appended, never
    /// replaced, so the length is monotonically non-decreasing in a session.
    pub items: Vec<Item>,
    /// Identifier of the last item opened for details.
    pub selected_id: Option<u64>,
    /// Total item count reported by the most recent successful fetch;
    /// 0 means not yet known.
    pub total_count: usize,
    /// Total page count reported by the most recent successful fetch;
    /// 0 means not yet known.
    pub total_pages: usize,
    /// Liked item ids. Independent of `items`: an id stays liked even when
    /// the catalog is refetched without it.
    pub likes: LikeSet,
    /// Theme preference. `Unset` defers to the platform default.
    pub theme: Theme,
}

impl State {
    /// The next page to fetch, or `None` when the catalog is exhausted.
    ///
    /// `total_pages == 0` means no fetch has been observed yet, so the
    /// `candidate == 1` branch bootstraps the very first fetch. The
    /// `items.len() >= total_count` stop takes priority over the page
    /// arithmetic: it protects against a server reporting a page count
    /// inconsistent with its item count.
    pub fn next_page(&self) -> Option<usize> {
        let pages_already_fetched = self.items.len() / PAGE_SIZE;
        let candidate = pages_already_fetched + 1;

        if self.items.len() >= self.total_count && self.total_count > 0 {
            return None;
        }

        if candidate == 1 || candidate <= self.total_pages {
            Some(candidate)
        } else {
            None
        }
    }

    /// Find a loaded item by id.
    pub fn item(&self, id: u64) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Derive a state with a fetched page appended and fresh totals.
    pub fn with_page_appended(
        &self,
        page: Vec<Item>,
        total_count: usize,
        total_pages: usize,
    ) -> State {
        let mut items = self.items.clone();
        items.extend(page);
        State {
            items,
            total_count,
            total_pages,
            ..self.clone()
        }
    }

    /// Derive a state with a different like-set.
    pub fn with_likes(&self, likes: LikeSet) -> State {
        State {
            likes,
            ..self.clone()
        }
    }

    /// Derive a state with a different theme preference.
    pub fn with_theme(&self, theme: Theme) -> State {
        State {
            theme,
            ..self.clone()
        }
    }

    /// Derive a state recording the last-viewed item.
    pub fn with_selected(&self, id: u64) -> State {
        State {
            selected_id: Some(id),
            ..self.clone()
        }
    }
}
