//! Peerguard - Core
//!
//! Ordered allow/deny access control for peer addresses.
//!
//! # Overview
//!
//! An [`AccessController`] holds a list of rules, each an allow or deny
//! verdict attached to a peer pattern, plus a default verdict. For every
//! incoming connection the rules are walked in the order they were added and
//! the first one that matches decides; when none does, the default applies.
//! There is no longest-prefix preference: order is the only precedence.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use peerguard_core::prelude::*;
//!
//! let acl = AccessController::new();
//! acl.add_allow("10.0.0.0/8")?
//!     .add_deny("10.1.2.3")?          // shadowed by the rule above
//!     .add_allow("2001:db8:*:*:*:*:*:*")?;
//!
//! assert!(acl.is_allowed([10, 1, 2, 3]));
//! assert!(!acl.is_allowed([11, 0, 0, 1]));
//! ```
//!
//! To guard a Hyper pipeline, wrap the downstream handler:
//!
//! ```rust,ignore
//! let guard = AccessControlHandler::new(Arc::new(my_handler));
//! guard.controller().add_allow("192.168.*.*")?;
//! peerguard_core::http::serve(TcpListener::bind("0.0.0.0:8080").await?, Arc::new(guard)).await?;
//! ```
//!
//! # Architecture
//!
//! - [`acl`] - pattern grammar, compiled rules, rule storage, controller
//! - [`config`] - serde configuration values and environment layering
//! - [`http`] - access-control handler and a Hyper listener
//! - [`error`] - error and result types

pub mod acl;
pub mod config;
pub mod error;
pub mod http;

// Prelude module for convenient imports
pub mod prelude;

// Re-exports of main types
pub use crate::acl::{AccessController, Action, Matcher, Rule};
pub use crate::config::{AclConfig, PeerguardConfig};
pub use crate::error::{AclError, Result};
pub use crate::http::{AccessControlHandler, HttpHandler, ResponseCodeHandler};
