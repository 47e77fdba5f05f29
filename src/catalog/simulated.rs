//! In-memory catalog for tests and offline use.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ActionError;
use crate::state::{Item, PAGE_SIZE};

use super::{CatalogClient, CatalogPage};

/// Names of the fixture items, in catalog order.
const NAMES: [&str; 25] = [
    "Rick Sanchez",
    "Morty Smith",
    "Summer Smith",
    "Beth Smith",
    "Jerry Smith",
    "Abadango Cluster Princess",
    "Abradolf Lincler",
    "Adjudicator Rick",
    "Agency Director",
    "Alan Rails",
    "Albert Einstein",
    "Alexander",
    "Alien Googah",
    "Alien Morty",
    "Alien Rick",
    "Amish Cyborg",
    "Annie",
    "Antenna Morty",
    "Antenna Rick",
    "Ants in my Eyes Johnson",
    "Aqua Morty",
    "Aqua Rick",
    "Arcade Alien",
    "Armagheadon",
    "Armothy",
];

/// Catalog serving a fixed 25-item fixture across 2 pages (20 + 5),
/// mirroring the remote paging numbers.
pub struct SimulatedCatalog {
    delay: Duration,
}

impl SimulatedCatalog {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Simulate network latency before answering.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    fn item(index: usize) -> Item {
        let id = index as u64 + 1;
        Item {
            id,
            title: NAMES[index].to_string(),
            status: "Alive".to_string(),
            species: "Human".to_string(),
            gender: "Unknown".to_string(),
            origin: "Earth (C-137)".to_string(),
            location: "Citadel of Ricks".to_string(),
            episode_count: (index % 7) + 1,
            image_url: format!("https://example.invalid/avatar/{id}.jpeg"),
        }
    }
}

impl Default for SimulatedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogClient for SimulatedCatalog {
    async fn fetch_page(&self, page: usize) -> Result<CatalogPage, ActionError> {
        if page == 0 {
            return Err(ActionError::Invariant("catalog pages are 1-based".into()));
        }

        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        }

        let start = (page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(NAMES.len());
        let items = (start..end.max(start)).map(Self::item).collect();

        Ok(CatalogPage {
            items,
            total_count: NAMES.len(),
            total_pages: NAMES.len().div_ceil(PAGE_SIZE),
        })
    }
}
