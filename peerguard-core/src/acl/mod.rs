//! Peer access control lists
//!
//! - [`pattern`] - peer pattern grammar and compilation
//! - [`rule`] - compiled rules and matchers
//! - [`rule_set`] - ordered rule storage with lock-free snapshots for readers
//! - [`controller`] - [`AccessController`], the configuration and evaluation API

pub mod controller;
pub mod pattern;
pub mod rule;
pub mod rule_set;

pub use controller::AccessController;
pub use pattern::{classify, compile, parse, PatternKind};
pub use rule::{Action, Matcher, Rule};
pub use rule_set::{RuleSet, Snapshot};
