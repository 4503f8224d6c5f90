//! Configuration system for Peerguard
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** (builder values) - Highest priority
//! 2. **Environment Variables**
//! 3. **Defaults** - Lowest priority
//!
//! # Environment
//!
//! | Variable               | Meaning                                   |
//! |------------------------|-------------------------------------------|
//! | `PG_ACL_DEFAULT_ALLOW` | verdict when no rule matches (`true`/`false`) |
//! | `PG_ACL_ALLOW`         | comma-separated allow patterns            |
//! | `PG_ACL_DENY`          | comma-separated deny patterns             |
//! | `PG_LISTEN`            | listener socket address                   |

pub mod acl;
pub mod server;

pub use acl::{resolve_acl_config, resolve_acl_config_with, AclConfig, RuleConfig};
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::Result;

/// Complete Peerguard configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerguardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub acl: AclConfig,
}

impl PeerguardConfig {
    /// Defaults overridden by the environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::resolve_with(None, None, lookup)
    }

    /// Effective configuration for a listener.
    ///
    /// Each section is resolved on its own: a builder value wins, otherwise
    /// the environment is read, otherwise the default applies.
    pub fn resolve(listen: Option<SocketAddr>, acl: Option<AclConfig>) -> Result<Self> {
        Self::resolve_with(listen, acl, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(
        listen: Option<SocketAddr>,
        acl: Option<AclConfig>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut server = ServerConfig::default();
        match listen {
            Some(addr) => server.listen = addr,
            None => server.apply_lookup(&lookup)?,
        }
        let acl = resolve_acl_config_with(acl, &lookup)?;
        Ok(Self { server, acl })
    }

    pub fn validate(&self) -> Result<()> {
        self.acl.validate()
    }
}
