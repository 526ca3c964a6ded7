use pretty_assertions::assert_eq;
use shelfwise_vector_store::{
    Collection, IndexBuildInfo, IndexEntry, VectorIndex, VectorStore, VectorStoreError,
};
use tempfile::TempDir;

fn info() -> IndexBuildInfo {
    IndexBuildInfo::new("text-embedding-3-small", 2)
}

#[tokio::test]
async fn test_open_missing_collection() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path());

    let err = store.open_collection("books").await.unwrap_err();
    assert!(matches!(err, VectorStoreError::NotFound(name) if name == "books"));
}

#[tokio::test]
async fn test_persisted_collection_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path().join("index"));

    let mut books = store.recreate_collection("books", info()).await.unwrap();
    books
        .add(vec![
            IndexEntry::new("book-000", vec![1.0, 0.0], "Dune\n\nDesert planet.")
                .with_metadata("title", "Dune"),
            IndexEntry::new("book-001", vec![0.0, 1.0], "Emma\n\nMatchmaking.")
                .with_metadata("title", "Emma"),
        ])
        .unwrap();
    store.save_collection(&books).await.unwrap();

    let reopened = store.open_collection("books").await.unwrap();
    assert_eq!(reopened.build_info(), &info());
    assert_eq!(VectorIndex::count(&reopened).await.unwrap(), 2);

    let before = books.query(&[0.9, 0.1], 2).unwrap();
    let after = VectorIndex::query(&reopened, &[0.9, 0.1], 2).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(after.ids(), ["book-000", "book-001"]);
}

#[tokio::test]
async fn test_recreate_discards_previous_entries() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path());

    let mut books = store.recreate_collection("books", info()).await.unwrap();
    books
        .add(vec![IndexEntry::new("old", vec![1.0, 0.0], "stale")])
        .unwrap();
    store.save_collection(&books).await.unwrap();

    let fresh = store
        .recreate_collection("books", IndexBuildInfo::new("other-model", 3))
        .await
        .unwrap();
    assert!(fresh.is_empty());

    let reopened = store.open_collection("books").await.unwrap();
    assert!(reopened.is_empty());
    assert_eq!(reopened.build_info().embed_model, "other-model");
}

#[tokio::test]
async fn test_get_or_create_keeps_existing() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path());

    let mut books = store.get_or_create_collection("books", info()).await.unwrap();
    books
        .add(vec![IndexEntry::new("a", vec![1.0, 0.0], "kept")])
        .unwrap();
    store.save_collection(&books).await.unwrap();

    let again = store
        .get_or_create_collection("books", IndexBuildInfo::new("ignored", 9))
        .await
        .unwrap();
    assert_eq!(again.count(), 1);
    assert_eq!(again.build_info(), &info());
}

#[tokio::test]
async fn test_rejects_path_like_names() {
    let store = VectorStore::new("unused");
    for name in ["", "..", "a/b", "a\\b"] {
        assert!(matches!(
            store.exists(name).await,
            Err(VectorStoreError::InvalidName(_))
        ));
    }
}

#[tokio::test]
async fn test_collection_file_uses_name() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path());
    store
        .save_collection(&Collection::new("books", info()))
        .await
        .unwrap();

    assert!(dir.path().join("books.json").exists());
    assert!(store.delete_collection("books").await.unwrap());
    assert!(!store.delete_collection("books").await.unwrap());
}
