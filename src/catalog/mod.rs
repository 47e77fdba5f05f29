//! Catalog clients.
//!
//! The store talks to the catalog through [`CatalogClient`], injected at
//! construction: [`RemoteCatalog`] speaks GraphQL over HTTP, and
//! [`SimulatedCatalog`] serves a fixed in-memory fixture for tests and
//! offline use.

mod remote;
mod simulated;

pub use remote::RemoteCatalog;
pub use simulated::SimulatedCatalog;

use async_trait::async_trait;

use crate::error::ActionError;
use crate::state::Item;

/// One fetched page plus the totals reported alongside it.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub items: Vec<Item>,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Remote catalog boundary.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of catalog items. Pages are 1-based.
    async fn fetch_page(&self, page: usize) -> Result<CatalogPage, ActionError>;
}
