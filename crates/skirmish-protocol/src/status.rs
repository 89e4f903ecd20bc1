//! Per-operation loading and error bookkeeping.
//!
//! Both the combat store and the session directory expose
//! `{ is_loading[key], errors[key] }` pairs to the presentation layer.
//! Each key is independent: a failed `Join` never clears a pending
//! `Fetch`, and a fresh `Fetch` never hides the last `Join` error.
//!
//! The three-phase lifecycle of a tracked operation:
//!
//! ```text
//! begin(key) ──→ [loading] ──→ succeed(key)  → not loading, no error
//!                     │
//!                     └──────→ fail(key, msg) → not loading, errors[key] = msg
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Loading flags and error messages keyed by operation.
#[derive(Debug, Clone)]
pub struct OpTracker<K> {
    loading: HashSet<K>,
    errors: HashMap<K, String>,
}

impl<K: Copy + Eq + Hash + fmt::Debug> OpTracker<K> {
    /// Creates an empty tracker: nothing loading, no errors.
    pub fn new() -> Self {
        Self {
            loading: HashSet::new(),
            errors: HashMap::new(),
        }
    }

    /// Pending phase: marks `key` as in flight and clears its last error.
    pub fn begin(&mut self, key: K) {
        self.loading.insert(key);
        self.errors.remove(&key);
    }

    /// Fulfilled phase: clears both the loading flag and the error.
    pub fn succeed(&mut self, key: K) {
        self.loading.remove(&key);
        self.errors.remove(&key);
    }

    /// Rejected phase: clears the loading flag and stores `message`.
    pub fn fail(&mut self, key: K, message: impl Into<String>) {
        self.loading.remove(&key);
        self.errors.insert(key, message.into());
    }

    /// Records an error for an operation that never went in flight
    /// (synchronous validation failures).
    pub fn record_error(&mut self, key: K, message: impl Into<String>) {
        self.errors.insert(key, message.into());
    }

    /// Whether `key` is currently in flight.
    pub fn is_loading(&self, key: K) -> bool {
        self.loading.contains(&key)
    }

    /// The last error recorded for `key`.
    pub fn error(&self, key: K) -> Option<&str> {
        self.errors.get(&key).map(String::as_str)
    }

    /// Whether any operation is in flight.
    pub fn any_loading(&self) -> bool {
        !self.loading.is_empty()
    }
}

// Written by hand: `#[derive(Default)]` would demand `K: Default`,
// which operation-key enums have no reason to implement.
impl<K: Copy + Eq + Hash + fmt::Debug> Default for OpTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Op {
        Fetch,
        Join,
    }

    #[test]
    fn test_begin_marks_loading_and_clears_error() {
        let mut t = OpTracker::new();
        t.fail(Op::Join, "boom");

        t.begin(Op::Join);

        assert!(t.is_loading(Op::Join));
        assert_eq!(t.error(Op::Join), None);
    }

    #[test]
    fn test_fail_stores_message_and_stops_loading() {
        let mut t = OpTracker::new();
        t.begin(Op::Join);

        t.fail(Op::Join, "network down");

        assert!(!t.is_loading(Op::Join));
        assert_eq!(t.error(Op::Join), Some("network down"));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut t = OpTracker::new();
        t.begin(Op::Fetch);
        t.begin(Op::Join);

        t.fail(Op::Join, "nope");

        assert!(t.is_loading(Op::Fetch), "fetch must stay in flight");
        assert_eq!(t.error(Op::Fetch), None);
        assert!(t.any_loading());

        t.succeed(Op::Fetch);
        assert_eq!(t.error(Op::Join), Some("nope"));
        assert!(!t.any_loading());
    }

    #[test]
    fn test_record_error_does_not_touch_loading() {
        let mut t = OpTracker::new();
        t.record_error(Op::Fetch, "bad input");
        assert!(!t.is_loading(Op::Fetch));
        assert_eq!(t.error(Op::Fetch), Some("bad input"));

        t.succeed(Op::Fetch);
        assert_eq!(t.error(Op::Fetch), None);
    }
}
