//! cardstock: a paginated catalog browser core.
//!
//! The heart of the crate is the [`store::Store`] dispatch engine: typed
//! [`store::Action`]s are executed with non-reentrancy guarding,
//! connectivity pre-checks, and retry-with-backoff, and resolve into an
//! atomic replacement or transformation of the immutable [`state::State`]
//! snapshot. The pagination cursor ([`state::State::next_page`]) derives
//! the next catalog page to fetch from the snapshot alone, and the
//! [`persist`] module keeps the like-set slice durable across restarts.

pub mod catalog;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod persist;
pub mod state;
pub mod store;
