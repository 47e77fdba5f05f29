//! Pagination scenarios against the simulated catalog.

mod common;

use cardstock::store::Action;
use common::*;

#[tokio::test]
async fn first_fetch_loads_a_full_page() {
    let store = simulated_store();

    let state = store.state();
    assert!(state.items.is_empty());
    assert_eq!(state.total_pages, 0);
    assert_eq!(state.total_count, 0);
    assert_eq!(state.next_page(), Some(1));

    store.dispatch_and_wait(Action::FetchMore).await;

    let state = store.state();
    assert_eq!(state.items.len(), 20);
    assert_eq!(state.total_pages, 2);
    assert_eq!(state.total_count, 25);
    assert_eq!(state.next_page(), Some(2));
    assert_eq!(state.items[0].title, "Rick Sanchez");
    assert_eq!(state.items[1].title, "Morty Smith");
}

#[tokio::test]
async fn second_fetch_appends_the_remainder() {
    let store = simulated_store();
    store.dispatch_and_wait(Action::FetchMore).await;
    let first_title = store.state().items[0].title.clone();

    store.dispatch_and_wait(Action::FetchMore).await;

    let state = store.state();
    assert_eq!(state.items.len(), 25);
    // The first page is still there, in order; the second was appended.
    assert_eq!(state.items[0].title, first_title);
    assert_eq!(state.items[20].id, 21);
    assert_eq!(state.next_page(), None);
}

#[tokio::test]
async fn fetching_an_exhausted_catalog_is_a_no_op() {
    let store = simulated_store();
    store.dispatch_and_wait(Action::FetchMore).await;
    store.dispatch_and_wait(Action::FetchMore).await;
    let before = store.state();
    assert_eq!(before.next_page(), None);

    let mut updates = store.subscribe();
    store.dispatch_and_wait(Action::FetchMore).await;

    let after = store.state();
    assert_eq!(after.items.len(), 25);
    assert_eq!(after.total_count, before.total_count);
    assert_eq!(after.total_pages, before.total_pages);
    // A no-op resolution publishes nothing.
    assert!(!updates.has_changed().expect("publisher alive"));
}

#[tokio::test]
async fn subscribers_observe_applied_states() {
    let store = simulated_store();
    let mut updates = store.subscribe();

    store.dispatch_and_wait(Action::FetchMore).await;

    updates.changed().await.expect("publisher alive");
    assert_eq!(updates.borrow().items.len(), 20);
}

#[tokio::test]
async fn select_records_the_last_viewed_item() {
    let store = simulated_store();
    store.dispatch_and_wait(Action::FetchMore).await;

    store.dispatch_and_wait(Action::Select { id: 2 }).await;

    let state = store.state();
    assert_eq!(state.selected_id, Some(2));
    assert_eq!(state.item(2).map(|item| item.title.as_str()), Some("Morty Smith"));
}
