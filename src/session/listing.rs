//! Cached service listings
//!
//! Every fetch takes a ticket before it goes out. A result is applied only
//! if its ticket is newer than the one already stored, so a slow early
//! fetch can never overwrite a list produced by a later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug)]
struct Slot<T> {
    ticket: u64,
    items: Arc<Vec<T>>,
}

/// A list replaced wholesale, newest fetch wins
#[derive(Debug)]
pub struct Listing<T> {
    issued: AtomicU64,
    slot: RwLock<Slot<T>>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: RwLock::new(Slot {
                ticket: 0,
                items: Arc::new(Vec::new()),
            }),
        }
    }
}

impl<T> Listing<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the ordering position for a fetch about to start.
    pub fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.slot.read().items)
    }

    /// Apply the result of the fetch holding `ticket`.
    ///
    /// Returns `false`, leaving the list untouched, when a newer fetch has
    /// already been applied.
    pub fn store(&self, ticket: u64, items: Vec<T>) -> bool {
        let mut slot = self.slot.write();
        if ticket <= slot.ticket {
            return false;
        }
        slot.ticket = ticket;
        slot.items = Arc::new(items);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let listing: Listing<u8> = Listing::new();
        let first = listing.ticket();
        let second = listing.ticket();
        assert!(second > first);
    }

    #[test]
    fn test_store_replaces_list() {
        let listing = Listing::new();
        let ticket = listing.ticket();
        assert!(listing.store(ticket, vec!["ada", "grace"]));
        assert_eq!(*listing.get(), ["ada", "grace"]);
    }

    #[test]
    fn test_late_older_result_is_dropped() {
        let listing = Listing::new();
        let early = listing.ticket();
        let late = listing.ticket();

        assert!(listing.store(late, vec!["ada", "grace", "sam"]));
        assert!(!listing.store(early, vec!["ada", "grace"]));
        assert_eq!(listing.get().len(), 3);
    }

    #[test]
    fn test_ticket_is_single_use() {
        let listing = Listing::new();
        let ticket = listing.ticket();
        assert!(listing.store(ticket, vec![1]));
        assert!(!listing.store(ticket, vec![2]));
        assert_eq!(*listing.get(), [1]);
    }

    #[test]
    fn test_unapplied_ticket_does_not_block_newer() {
        let listing = Listing::new();
        let _failed = listing.ticket();
        let next = listing.ticket();
        assert!(listing.store(next, vec![7]));
    }
}
