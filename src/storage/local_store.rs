use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::storage::errors::StoreError;
use crate::storage::{ListPage, ObjectStore};

/// Keys returned per listing page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Serves a local directory tree as an object store.
///
/// Keys are paths relative to the root, `/`-separated, listed in sorted order.
pub struct LocalStore {
    root: PathBuf,
    page_size: usize
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_size: DEFAULT_PAGE_SIZE
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collect_keys(&self, directory: &Path, keys: &mut Vec<String>) -> Result<(), StoreError> {
        let entries = fs::read_dir(directory).map_err(|error| StoreError::io(directory.display(), error))?;

        for entry in entries {
            let entry = entry.map_err(|error| StoreError::io(directory.display(), error))?;
            let path = entry.path();

            if path.is_dir() {
                self.collect_keys(&path, keys)?;
            } else if let Ok(relative) = path.strip_prefix(&self.root) {
                let key = relative.components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                keys.push(key);
            }
        }

        Ok(())
    }
}

impl ObjectStore for LocalStore {
    fn location(&self) -> String {
        format!("file://{}", self.root.display())
    }

    fn list_page(&self, prefix: &str, continuation: Option<&str>) -> Result<ListPage, StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::LocationNotFound { location: self.location() });
        }

        let mut keys = Vec::new();
        self.collect_keys(&self.root, &mut keys)?;

        keys.retain(|key| key.starts_with(prefix) && continuation.is_none_or(|after| key.as_str() > after));
        keys.sort();

        let next = if keys.len() > self.page_size {
            keys.truncate(self.page_size);
            keys.last().cloned()
        } else {
            None
        };

        debug!("Listed {} keys under [{}{}]", keys.len(), self.location(), prefix);

        Ok(ListPage { keys, next })
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.root.join(key);
        fs::read(&path).map_err(|error| StoreError::io(key, error))
    }
}
