//! Dynamic catalog caching and static/dynamic merging

mod cache;
mod fingerprint;
mod merge;

pub use cache::{CatalogCache, CatalogCacheEntry};
pub use fingerprint::Fingerprint;
pub use merge::{exclude_static, merge_catalog};
