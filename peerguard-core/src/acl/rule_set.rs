//! Ordered rule storage with copy-on-write snapshots
//!
//! Writers (configuration code) are serialized, build the next rule list
//! off to the side and publish it with one atomic pointer swap. Readers load
//! the current [`Snapshot`] without locking and walk it, so a concurrent
//! append or clear is either fully visible to them or not at all.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use super::rule::Rule;

/// Immutable view of the rules at one point in time
pub type Snapshot = Arc<Vec<Rule>>;

#[derive(Debug)]
pub struct RuleSet {
    rules: ArcSwap<Vec<Rule>>,
    // Held by writers across read-copy-publish so no update is lost.
    writer: Mutex<()>,
    default_allow: AtomicBool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(false)
    }
}

impl RuleSet {
    pub fn new(default_allow: bool) -> Self {
        Self {
            rules: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
            default_allow: AtomicBool::new(default_allow),
        }
    }

    /// Current rules, in insertion order
    pub fn snapshot(&self) -> Snapshot {
        self.rules.load_full()
    }

    pub fn append(&self, rule: Rule) {
        self.extend(std::iter::once(rule));
    }

    /// Append several rules in a single publication
    pub fn extend(&self, rules: impl IntoIterator<Item = Rule>) {
        // The guard protects no data, a poisoned one is still usable.
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.rules.load_full();
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.extend(rules);
        self.rules.store(Arc::new(next));
    }

    /// Replace every rule at once
    pub fn replace(&self, rules: Vec<Rule>) {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.rules.store(Arc::new(rules));
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.rules.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn default_allow(&self) -> bool {
        self.default_allow.load(Ordering::Acquire)
    }

    pub fn set_default_allow(&self, allow: bool) {
        self.default_allow.store(allow, Ordering::Release);
    }

    /// First-match-wins evaluation over one snapshot.
    ///
    /// The verdict of the first rule whose matcher accepts `address` is
    /// returned; insertion order is the only precedence. Falls back to the
    /// default policy when nothing matches.
    pub fn evaluate(&self, address: &[u8]) -> bool {
        let rules = self.rules.load();
        match rules.iter().find(|rule| rule.matches(address)) {
            Some(rule) => {
                log::trace!("Peer {:?} matched rule {}", address, rule);
                !rule.is_deny()
            }
            None => self.default_allow(),
        }
    }
}
