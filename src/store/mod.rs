//! Local page cache
//!
//! Raw page bodies are cached under a deterministic path keyed by
//! (event, heat, page index). Files are overwritten wholesale on the next
//! completed crawl of the same key; nothing here is transactional across
//! files, a crash mid-crawl just leaves a partial cache with no fingerprint.

mod pages;

pub use pages::{PageKey, PageStore};
