//! Prelude module for convenient imports.
//!
//! Import everything you need with a single line:
//!
//! ```rust,ignore
//! use peerguard_core::prelude::*;
//! ```

// === Access control ===
pub use crate::acl::{AccessController, Action, Matcher, PatternKind, Rule};

// === Configuration ===
pub use crate::config::{resolve_acl_config, AclConfig, PeerguardConfig, RuleConfig, ServerConfig};

// === Errors ===
pub use crate::error::{AclError, Result};

// === HTTP types ===
pub use crate::http::{
    serve, serve_with_shutdown, AccessControlHandler, HttpHandler, Req, Resp, ResponseCodeHandler,
};

// === HTTP essentials (re-exported from the `http` crate) ===
pub use http::Request;
pub use http::Response;
pub use http::StatusCode;

// === Common std types ===
pub use std::sync::Arc;
