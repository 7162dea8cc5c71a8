mod errors;
mod local_store;

pub use errors::StoreError;
pub use local_store::{LocalStore, DEFAULT_PAGE_SIZE};

/// One page of a key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Continuation token for the next page; `None` on the last page.
    pub next: Option<String>
}

/// Read-only access to a bucket-like store of partition files.
///
/// Remote clients implement this to plug into the loader; the crate ships a
/// filesystem implementation.
pub trait ObjectStore: Send + Sync {
    /// Stable name of the store, used as the cache key and in diagnostics.
    fn location(&self) -> String;
    fn list_page(&self, prefix: &str, continuation: Option<&str>) -> Result<ListPage, StoreError>;
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Lists every key under `prefix`, following continuation tokens.
    fn list_all(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self.list_page(prefix, continuation.as_deref())?;
            keys.extend(page.keys);

            match page.next {
                Some(next) => continuation = Some(next),
                None => return Ok(keys)
            }
        }
    }
}
