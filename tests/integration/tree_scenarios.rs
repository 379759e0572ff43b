use crate::integration::support::{
    assert_expansion_matches_shape, counting_provider, memory_controller, three_children,
};
use futures::FutureExt;
use lazytree::controller::{NodeState, ToggleOutcome};
use lazytree::error::ProviderError;
use lazytree::provider::{from_fn, MockChildProvider, MockProviderConfig};
use lazytree::render::{render_rows, RowMarker};
use lazytree::tree::find_node;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn expand_root_then_collapse() {
    let (provider, calls) = counting_provider();
    let (controller, _) = memory_controller(provider);

    let outcome = controller.toggle("root").await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Expanded { children: 3 });
    let roots = controller.roots();
    let root = find_node(&roots, "root").unwrap();
    assert_eq!(root.children().len(), 3);
    assert!(!root.is_loading);
    assert!(controller.expanded_ids().contains("root"));

    let outcome = controller.toggle("root").await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Collapsed);
    assert!(find_node(&controller.roots(), "root").unwrap().children().is_empty());
    assert!(!controller.expanded_ids().contains("root"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_expansion_matches_shape(&controller);
}

#[tokio::test]
async fn toggling_a_file_changes_nothing() {
    let (provider, calls) = counting_provider();
    let (controller, repo) = memory_controller(provider);
    controller.toggle("root").await.unwrap();
    let before = controller.snapshot().unwrap();
    let writes = repo.write_count();

    assert_eq!(controller.toggle("root-1").await.unwrap(), ToggleOutcome::NoOp);
    assert_eq!(controller.snapshot().unwrap(), before);
    assert_eq!(repo.write_count(), writes);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn nested_expansion_and_ancestor_collapse() {
    let (provider, calls) = counting_provider();
    let (controller, _) = memory_controller(provider);

    controller.toggle("root").await.unwrap();
    controller.toggle("root-0").await.unwrap();
    let expanded: Vec<_> = controller.expanded_ids().into_iter().collect();
    assert_eq!(expanded, vec!["root".to_string(), "root-0".to_string()]);
    assert_expansion_matches_shape(&controller);

    let rows = render_rows(&controller.roots(), &controller.expanded_ids());
    assert_eq!(rows.len(), 1 + 3 + 3);

    controller.toggle("root").await.unwrap();
    let rows = render_rows(&controller.roots(), &controller.expanded_ids());
    assert_eq!(rows.len(), 1);
    assert_expansion_matches_shape(&controller);

    controller.toggle("root").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(controller.node_state("root-0"), Some(NodeState::Collapsed));
}

#[tokio::test]
async fn empty_directory_has_no_chevron() {
    let provider = from_fn(|_| async { Ok(Vec::new()) }.boxed());
    let (controller, _) = memory_controller(Arc::new(provider));

    assert_eq!(controller.toggle("root").await.unwrap(), ToggleOutcome::Empty);
    let rows = render_rows(&controller.roots(), &controller.expanded_ids());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].marker, RowMarker::None);
    assert_expansion_matches_shape(&controller);
}

#[tokio::test]
async fn provider_failure_is_visible_and_retryable() {
    let fail = Arc::new(std::sync::atomic::AtomicBool::new(true));
    let flag = Arc::clone(&fail);
    let provider = from_fn(move |parent_id| {
        let result = if flag.swap(false, Ordering::SeqCst) {
            Err(ProviderError::fetch_failed(parent_id, "connection reset"))
        } else {
            Ok(three_children(parent_id))
        };
        async move { result }.boxed()
    });
    let (controller, _) = memory_controller(Arc::new(provider));

    let outcome = controller.toggle("root").await.unwrap();
    assert!(matches!(outcome, ToggleOutcome::Failed { .. }));
    let rows = render_rows(&controller.roots(), &controller.expanded_ids());
    assert_eq!(
        rows[0].marker,
        RowMarker::Error {
            reason: "connection reset".to_string()
        }
    );

    let outcome = controller.retry("root").await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Expanded { children: 3 });
    assert_expansion_matches_shape(&controller);
}

#[tokio::test(start_paused = true)]
async fn double_toggle_during_fetch_cancels_and_drops_late_result() {
    let provider = MockChildProvider::new(MockProviderConfig {
        delay_ms: 1000,
        seed: Some(9),
        ..MockProviderConfig::default()
    });
    let (controller, _) = memory_controller(Arc::new(provider));

    let (first, second) = tokio::join!(controller.toggle("root"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.toggle("root").await
    });

    assert_eq!(second.unwrap(), ToggleOutcome::Cancelled);
    assert_eq!(first.unwrap(), ToggleOutcome::Discarded);
    let roots = controller.roots();
    let root = find_node(&roots, "root").unwrap();
    assert!(!root.is_loading);
    assert!(root.children().is_empty());
    assert!(controller.expanded_ids().is_empty());
}

#[tokio::test]
async fn seeded_mock_provider_keeps_invariant_over_random_walk() {
    let provider = MockChildProvider::new(MockProviderConfig {
        delay_ms: 0,
        seed: Some(2024),
        failure_rate: 0.2,
        ..MockProviderConfig::default()
    });
    let (controller, _) = memory_controller(Arc::new(provider));

    for step in 0..60 {
        let rows = render_rows(&controller.roots(), &controller.expanded_ids());
        let row = &rows[(step * 7) % rows.len()];
        controller.toggle(&row.id.clone()).await.unwrap();
        assert_expansion_matches_shape(&controller);
        assert!(controller.roots().iter().all(|r| !r.is_loading));
    }
}
