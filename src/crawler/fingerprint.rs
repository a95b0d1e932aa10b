//! Change detection over the discovered link set
//!
//! The only piece of state that survives between runs is a digest of the
//! ordered event-link sequence. If the digest matches the one persisted by
//! the last completed crawl, the source listing is unchanged and the crawl
//! is skipped entirely. The digest is order-sensitive: a reordered listing
//! counts as a change.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Digest over the serialized, ordered link sequence
pub fn fingerprint(links: &[String]) -> String {
    let mut hasher = Sha256::new();
    // Length-prefix each link so the digest is unambiguous across link
    // boundaries ("ab","c" must not collide with "a","bc").
    for link in links {
        hasher.update((link.len() as u64).to_be_bytes());
        hasher.update(link.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Decides whether a crawl is needed and commits the digest afterwards
///
/// `should_crawl` has no side effects; the new fingerprint is only written
/// by [`ChangeDetector::commit`], which the orchestrator calls after every
/// page of the crawl has landed. An aborted crawl therefore leaves the old
/// fingerprint in place and the next run redoes the whole crawl.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    hash_path: PathBuf,
}

impl ChangeDetector {
    pub fn new(hash_path: impl AsRef<Path>) -> Self {
        Self {
            hash_path: hash_path.as_ref().to_path_buf(),
        }
    }

    /// Returns whether a crawl is needed, plus the current fingerprint
    ///
    /// A missing or unreadable prior fingerprint reads as the empty string,
    /// which never equals a real digest, so the first run always crawls.
    pub fn should_crawl(&self, links: &[String]) -> (bool, String) {
        let current = fingerprint(links);
        let prior = std::fs::read_to_string(&self.hash_path)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        (prior != current, current)
    }

    /// Persists the fingerprint of a completed crawl
    pub fn commit(&self, fingerprint: &str) -> std::io::Result<()> {
        std::fs::write(&self.hash_path, fingerprint)
    }
}
