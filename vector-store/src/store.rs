//! Named collections persisted under a root directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::collection::{Collection, IndexBuildInfo};
use crate::error::{Result, VectorStoreError};

/// Directory of collections, one `<name>.json` file each.
#[derive(Debug, Clone)]
pub struct VectorStore {
    root: PathBuf,
}

impl VectorStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing the named collection.
    pub fn collection_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && !name.contains('\0');
        if !valid {
            return Err(VectorStoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.json")))
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        let path = self.collection_path(name)?;
        fs::try_exists(&path)
            .await
            .map_err(|e| VectorStoreError::io(path, e))
    }

    /// Load an existing collection.
    pub async fn open_collection(&self, name: &str) -> Result<Collection> {
        if !self.exists(name).await? {
            return Err(VectorStoreError::NotFound(name.to_string()));
        }
        Collection::load(&self.collection_path(name)?).await
    }

    /// Load the collection, or create and persist an empty one.
    pub async fn get_or_create_collection(
        &self,
        name: &str,
        build_info: IndexBuildInfo,
    ) -> Result<Collection> {
        if self.exists(name).await? {
            return self.open_collection(name).await;
        }
        let collection = Collection::new(name, build_info);
        self.save_collection(&collection).await?;
        Ok(collection)
    }

    /// Replace any existing collection with an empty one.
    pub async fn recreate_collection(
        &self,
        name: &str,
        build_info: IndexBuildInfo,
    ) -> Result<Collection> {
        if self.delete_collection(name).await? {
            info!("Dropped existing collection {name}");
        }
        let collection = Collection::new(name, build_info);
        self.save_collection(&collection).await?;
        Ok(collection)
    }

    pub async fn save_collection(&self, collection: &Collection) -> Result<()> {
        let path = self.collection_path(collection.name())?;
        collection.save(&path).await
    }

    /// Remove the collection file. Returns whether one existed.
    pub async fn delete_collection(&self, name: &str) -> Result<bool> {
        let path = self.collection_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VectorStoreError::io(path, e)),
        }
    }
}
