//! End-to-end tests for the composed registry stack:
//! notification over durability over the in-memory map.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use waygate_registry::{load_registry, WarpRegistry};
use waygate_storage::MemoryWarpStore;
use waygate_types::{
    Invitation, PlayerId, Position, Rotation, Warp, WarpBuilder, WarpEvent, WarpField, WarpKind,
    WorldId,
};

fn warp(name: &str, creator: PlayerId) -> Warp {
    WarpBuilder::new(
        name,
        creator,
        WarpKind::Public,
        WorldId::generate(),
        Position::new(100.5, 65.0, -200.5),
        Rotation::new(0.0, 180.0),
    )
    .build()
}

#[tokio::test]
async fn mutations_are_readable_immediately_and_durable_eventually() {
    let store = Arc::new(MemoryWarpStore::new());
    let (events, _rx) = broadcast::channel(64);
    let mut stack = load_registry(store.clone(), events).await.unwrap();

    let creator = PlayerId::generate();
    let spawn = warp("spawn", creator);
    stack.add(spawn.clone()).unwrap();

    // Read-your-write against the registry, before the store has seen it.
    assert_eq!(stack.get("spawn"), Some(&spawn));

    stack.record_visit("spawn").unwrap();
    assert_eq!(stack.get("spawn").unwrap().visits, 1);

    stack
        .into_inner()
        .shutdown(Duration::from_secs(5))
        .await
        .unwrap();

    let stored = store.stored("spawn").unwrap();
    assert_eq!(stored.visits, 1);
}

#[tokio::test]
async fn store_observes_writes_in_submission_order() {
    let store = Arc::new(MemoryWarpStore::new());
    let (events, _rx) = broadcast::channel(64);
    let mut stack = load_registry(store.clone(), events).await.unwrap();

    let creator = PlayerId::generate();

    // A burst of mutations across several warps, issued back to back with no
    // yield in between; the worker must still apply them in this order.
    stack.add(warp("one", creator)).unwrap();
    stack.add(warp("two", creator)).unwrap();
    stack.record_visit("one").unwrap();
    stack
        .update_kind("two", WarpKind::Private)
        .unwrap();
    stack
        .invite("two", Invitation::Group("mods".to_string()))
        .unwrap();
    stack.remove("one").unwrap();

    stack
        .into_inner()
        .shutdown(Duration::from_secs(5))
        .await
        .unwrap();

    let journal = store.journal();
    let ops: Vec<(&str, &str)> = journal.iter().map(|e| (e.op, e.warp.as_str())).collect();
    assert_eq!(
        ops,
        vec![
            ("add", "one"),
            ("add", "two"),
            ("update_visits", "one"),
            ("update_kind", "two"),
            ("add_invitation", "two"),
            ("remove", "one"),
        ]
    );
}

#[tokio::test]
async fn events_mirror_mutations_through_the_whole_stack() {
    let store = Arc::new(MemoryWarpStore::new());
    let (events, mut rx) = broadcast::channel(64);
    let mut stack = load_registry(store, events).await.unwrap();

    let creator = PlayerId::generate();
    stack.add(warp("spawn", creator)).unwrap();
    stack
        .update_welcome_message("spawn", "welcome".to_string())
        .unwrap();

    match rx.try_recv().unwrap() {
        WarpEvent::Added { warp } => assert_eq!(warp.name, "spawn"),
        other => panic!("unexpected event {other:?}"),
    }
    match rx.try_recv().unwrap() {
        WarpEvent::Updated { field, warp } => {
            assert_eq!(field, WarpField::WelcomeMessage);
            assert_eq!(warp.welcome_message, "welcome");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn reload_rebuilds_from_whatever_the_store_drained() {
    let store = Arc::new(MemoryWarpStore::new());
    let (events, _rx) = broadcast::channel(64);

    // First life: create some data and shut down cleanly.
    let mut stack = load_registry(store.clone(), events.clone()).await.unwrap();
    let creator = PlayerId::generate();
    stack.add(warp("keep", creator)).unwrap();
    stack.add(warp("drop", creator)).unwrap();
    stack.remove("drop").unwrap();
    stack
        .into_inner()
        .shutdown(Duration::from_secs(5))
        .await
        .unwrap();

    // Second life: the store is the source of truth again.
    let stack = load_registry(store, events).await.unwrap();
    assert!(stack.contains("keep"));
    assert!(!stack.contains("drop"));
}
