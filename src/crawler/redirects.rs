//! Redirect chain tracking and loop detection
//!
//! Chains are keyed by the originally requested URL and bounded to the most
//! recent entries to bound memory. Loop detection is a closed-cycle
//! heuristic: it reports a loop only for chains that have already closed
//! back on their first hop, not for every possible redirect graph.

use std::collections::HashMap;

/// Per-chain bound; oldest entries are evicted beyond this
const MAX_CHAIN_ENTRIES: usize = 10;

/// Records per-URL redirect chains and detects cycles
#[derive(Debug, Default)]
pub struct RedirectTracker {
    chains: HashMap<String, Vec<String>>,
}

impl RedirectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a redirect destination to the chain for `from`, trimming the
    /// chain to the most recent entries
    pub fn record(&mut self, from: &str, to: &str) {
        let chain = self.chains.entry(from.to_string()).or_default();
        chain.push(to.to_string());
        if chain.len() > MAX_CHAIN_ENTRIES {
            let excess = chain.len() - MAX_CHAIN_ENTRIES;
            chain.drain(..excess);
        }
    }

    /// Reports whether a URL participates in an observed redirect cycle
    ///
    /// A chain counts as a closed cycle once it has at least two entries and
    /// its first entry equals its last; any URL appearing in such a chain is
    /// considered looping.
    pub fn is_loop(&self, url: &str) -> bool {
        self.chains.values().any(|chain| {
            chain.len() >= 2
                && chain.first() == chain.last()
                && chain.iter().any(|entry| entry == url)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_loop_initially() {
        let tracker = RedirectTracker::new();
        assert!(!tracker.is_loop("https://a.com/"));
    }

    #[test]
    fn test_single_redirect_is_not_a_loop() {
        let mut tracker = RedirectTracker::new();
        tracker.record("https://a.com/", "https://b.com/");
        assert!(!tracker.is_loop("https://a.com/"));
        assert!(!tracker.is_loop("https://b.com/"));
    }

    #[test]
    fn test_two_url_cycle_detected_after_second_pass() {
        let mut tracker = RedirectTracker::new();

        // First cycle: A -> B, B -> A
        tracker.record("A", "B");
        tracker.record("B", "A");
        assert!(!tracker.is_loop("A"));
        assert!(!tracker.is_loop("B"));

        // Second cycle closes both chains on themselves
        tracker.record("A", "B");
        tracker.record("B", "A");
        assert!(tracker.is_loop("A"));
        assert!(tracker.is_loop("B"));
    }

    #[test]
    fn test_unrelated_url_not_flagged() {
        let mut tracker = RedirectTracker::new();
        tracker.record("A", "B");
        tracker.record("A", "B");
        assert!(!tracker.is_loop("C"));
    }

    #[test]
    fn test_self_redirect_detected() {
        let mut tracker = RedirectTracker::new();
        tracker.record("A", "A");
        tracker.record("A", "A");
        assert!(tracker.is_loop("A"));
    }

    #[test]
    fn test_chain_trimmed_to_most_recent_entries() {
        let mut tracker = RedirectTracker::new();
        for i in 0..15 {
            tracker.record("A", &format!("hop-{}", i));
        }

        let chain = tracker.chains.get("A").unwrap();
        assert_eq!(chain.len(), MAX_CHAIN_ENTRIES);
        assert_eq!(chain.first().unwrap(), "hop-5");
        assert_eq!(chain.last().unwrap(), "hop-14");
    }

    #[test]
    fn test_eviction_can_discard_cycle_evidence() {
        // Documented consequence of the bounded-chain heuristic: once the
        // closing entry is evicted, the loop is no longer reported.
        let mut tracker = RedirectTracker::new();
        tracker.record("A", "B");
        for i in 0..10 {
            tracker.record("A", &format!("hop-{}", i));
        }
        assert!(!tracker.is_loop("B"));
    }
}
