use crate::integration::support::{counting_provider, three_children};
use lazytree::controller::TreeController;
use lazytree::store::{
    decode_roots, default_roots, encode_roots, SledStateRepository, StateRepository, TreeStore,
};
use lazytree::tree::{Node, NodeKind};
use std::sync::Arc;
use tempfile::TempDir;

fn open_controller(temp: &TempDir) -> TreeController {
    let repo = SledStateRepository::open(&temp.path().join("state"), "fileSystemState").unwrap();
    let (provider, _) = counting_provider();
    TreeController::new(TreeStore::open(Arc::new(repo)), provider)
}

#[tokio::test]
async fn tree_and_expansion_survive_restart() {
    let temp = TempDir::new().unwrap();
    let (roots, expanded) = {
        let controller = open_controller(&temp);
        controller.toggle("root").await.unwrap();
        controller.toggle("root-0").await.unwrap();
        controller.view()
    };

    let controller = open_controller(&temp);
    assert_eq!(controller.roots(), roots);
    assert_eq!(controller.expanded_ids(), expanded);
}

#[tokio::test]
async fn collapsed_state_survives_restart() {
    let temp = TempDir::new().unwrap();
    {
        let controller = open_controller(&temp);
        controller.toggle("root").await.unwrap();
        controller.toggle("root").await.unwrap();
    }
    let controller = open_controller(&temp);
    assert!(controller.expanded_ids().is_empty());
    assert_eq!(controller.roots(), default_roots());
}

#[test]
fn corrupt_snapshot_falls_back_to_root() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state");
    {
        let repo = SledStateRepository::open(&path, "fileSystemState").unwrap();
        repo.save("[{\"id\": \"root\", \"label\": ").unwrap();
    }
    let repo = SledStateRepository::open(&path, "fileSystemState").unwrap();
    let store = TreeStore::open(Arc::new(repo));
    assert_eq!(store.get(), default_roots().as_slice());
}

#[test]
fn snapshot_round_trip_is_field_for_field() {
    let mut failed = Node::directory("root-3", "Folder_4");
    failed.error = Some("denied".to_string());
    let mut empty = Node::directory("root-4", "Folder_5");
    empty.is_empty = true;
    let mut children = three_children("root");
    children.push(failed);
    children.push(empty);
    children.push(Node::file("root-5", "File_6.jpg", NodeKind::Jpg, None));
    let roots = vec![Arc::new(Node::root().with_children(children))];

    let encoded = encode_roots(&roots).unwrap();
    let decoded = decode_roots(&encoded).unwrap();
    assert_eq!(decoded, roots);
    assert_eq!(encode_roots(&decoded).unwrap(), encoded);
}

#[test]
fn storage_schema_matches_documented_shape() {
    let roots = vec![Arc::new(Node::root().with_children(three_children("root")))];
    let value: serde_json::Value = serde_json::from_str(&encode_roots(&roots).unwrap()).unwrap();
    let root = &value[0];
    assert_eq!(root["id"], "root");
    assert_eq!(root["type"], "directory");
    let file = &root["children"][1];
    assert_eq!(file["type"], "png");
    assert_eq!(file["size"], "11KB");
    assert!(file.get("children").is_none());
    assert!(file.get("isLoading").is_none());
}
