mod cache;
pub mod store;

pub use cache::{TranslationCache, fingerprint};
pub use store::{BlobStore, MemoryStore, StoreError};
