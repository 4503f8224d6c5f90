//! Listener configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::{AclError, Result};

pub const ENV_LISTEN: &str = "PG_LISTEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen: SocketAddr::from(([127, 0, 0, 1], 8080)) }
    }
}

impl ServerConfig {
    pub fn apply_env_vars(&mut self) -> Result<()> {
        self.apply_lookup(|key| std::env::var(key).ok())
    }

    pub fn apply_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(ENV_LISTEN) {
            self.listen = raw.trim().parse().map_err(|_| {
                AclError::Config(format!("{} must be a socket address, got '{}'", ENV_LISTEN, raw))
            })?;
        }
        Ok(())
    }
}
