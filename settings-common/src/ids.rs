//! Identifier generation

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Built-in outbound that sends traffic straight out.
/// Fixed identifier, never produced by an [`IdGenerator`].
pub const DIRECT_ID: &str = "direct";

/// Built-in outbound that rejects traffic.
pub const BLOCK_ID: &str = "block";

/// Returns true for identifiers that downstream consumers treat specially
pub fn is_sentinel(id: &str) -> bool {
    id == DIRECT_ID || id == BLOCK_ID
}

/// Source of opaque identifiers, unique within the process
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in their compact (hyphen-less) form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `<prefix>-<n>` identifiers for tests and fixtures
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }

    /// Number of identifiers handed out so far
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_are_distinct() {
        let ids = UuidGenerator;
        let set: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 1000);
    }

    #[test]
    fn test_uuid_ids_never_collide_with_sentinels() {
        let ids = UuidGenerator;
        for _ in 0..100 {
            let id = ids.next_id();
            assert!(!is_sentinel(&id));
            assert_eq!(id.len(), 32);
        }
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("t");
        assert_eq!(ids.next_id(), "t-1");
        assert_eq!(ids.next_id(), "t-2");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_sentinels() {
        assert!(is_sentinel("direct"));
        assert!(is_sentinel("block"));
        assert!(!is_sentinel("Direct"));
        assert!(!is_sentinel(""));
    }
}
