use futures::FutureExt;
use lazytree::controller::TreeController;
use lazytree::error::ProviderError;
use lazytree::provider::{from_fn, ChildProvider};
use lazytree::store::{MemoryStateRepository, TreeStore};
use lazytree::tree::{derive_expanded, Node, NodeKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Three children per parent: a directory, a png and a doc
pub fn three_children(parent_id: &str) -> Vec<Node> {
    vec![
        Node::directory(format!("{}-0", parent_id), "Folder_10"),
        Node::file(
            format!("{}-1", parent_id),
            "File_11.png",
            NodeKind::Png,
            Some("11KB".to_string()),
        ),
        Node::file(
            format!("{}-2", parent_id),
            "File_12.doc",
            NodeKind::Doc,
            Some("12KB".to_string()),
        ),
    ]
}

/// Provider returning `three_children`, counting calls
pub fn counting_provider() -> (Arc<dyn ChildProvider>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let provider = from_fn(move |parent_id| {
        counter.fetch_add(1, Ordering::SeqCst);
        let children = three_children(parent_id);
        async move { Ok::<_, ProviderError>(children) }.boxed()
    });
    (Arc::new(provider), calls)
}

pub fn memory_controller(
    provider: Arc<dyn ChildProvider>,
) -> (TreeController, Arc<MemoryStateRepository>) {
    let repo = Arc::new(MemoryStateRepository::new());
    let controller = TreeController::new(TreeStore::open(repo.clone()), provider);
    (controller, repo)
}

pub fn assert_expansion_matches_shape(controller: &TreeController) {
    let (roots, expanded) = controller.view();
    assert_eq!(expanded, derive_expanded(&roots));
}
