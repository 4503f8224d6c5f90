use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Response;
use peerguard_core::config::PeerguardConfig;
use peerguard_core::http::{serve, Req, Resp};
use peerguard_core::{AccessControlHandler, AccessController, HttpHandler};
use tokio::net::TcpListener;

use super::RuleArgs;

/// Answers `ok` to every request that gets past the access check
struct Ok200;

#[async_trait]
impl HttpHandler for Ok200 {
    async fn handle(&self, _req: Req, _peer: SocketAddr) -> Resp {
        Response::new(Full::new(Bytes::from_static(b"ok")).map_err(|never| match never {}).boxed())
    }
}

/// Resolve listen address and rules, then serve until the process is stopped.
///
/// Rule flags win over `PG_ACL_*`; the environment is read only when none is given.
pub fn run(args: &RuleArgs, listen: Option<&str>) -> anyhow::Result<()> {
    let config = resolve(args, listen, |key| std::env::var(key).ok())?;
    let controller = Arc::new(AccessController::from_config(&config.acl)?);
    log::info!(
        "Loaded {} rule(s), default {}",
        controller.len(),
        if controller.default_allow() { "allow" } else { "deny" }
    );
    for rule in controller.rules().iter() {
        log::debug!("  {}", rule);
    }

    let handler = AccessControlHandler::new(Arc::new(Ok200)).with_controller(controller);
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(config.server.listen)
            .await
            .with_context(|| format!("failed to bind {}", config.server.listen))?;
        serve(listener, Arc::new(handler)).await
    })
}

/// Command-line values over `PG_*` variables over defaults
fn resolve(
    args: &RuleArgs,
    listen: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<PeerguardConfig> {
    let listen = listen
        .map(|raw| {
            raw.parse::<SocketAddr>()
                .with_context(|| format!("invalid listen address \"{}\"", raw))
        })
        .transpose()?;
    let acl = if args.is_empty() {
        None
    } else {
        Some(args.to_config().map_err(anyhow::Error::msg)?)
    };
    Ok(PeerguardConfig::resolve_with(listen, acl, lookup)?)
}
