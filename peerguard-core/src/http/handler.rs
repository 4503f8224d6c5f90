//! Request handlers and the access-control handler that guards them

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Response, StatusCode};

use super::{Req, Resp, RespBody};
use crate::acl::AccessController;

#[inline]
pub(crate) fn empty_body() -> RespBody {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

/// Something that turns a request from a peer into a response
#[async_trait]
pub trait HttpHandler: Send + Sync {
    async fn handle(&self, req: Req, peer: SocketAddr) -> Resp;
}

/// Answers every request with a fixed status and an empty body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCodeHandler {
    status: StatusCode,
}

impl ResponseCodeHandler {
    pub const NOT_FOUND: Self = Self::new(StatusCode::NOT_FOUND);
    pub const FORBIDDEN: Self = Self::new(StatusCode::FORBIDDEN);

    pub const fn new(status: StatusCode) -> Self {
        Self { status }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

#[async_trait]
impl HttpHandler for ResponseCodeHandler {
    async fn handle(&self, _req: Req, _peer: SocketAddr) -> Resp {
        let mut resp = Response::new(empty_body());
        *resp.status_mut() = self.status;
        resp
    }
}

/// Handler that limits the peers allowed to reach `next`.
///
/// Peers are checked against an [`AccessController`]. Allowed requests go to
/// `next` (404 by default); the others go to the rejection handler, a bare
/// 403 unless replaced.
pub struct AccessControlHandler {
    controller: Arc<AccessController>,
    next: Arc<dyn HttpHandler>,
    rejection: Arc<dyn HttpHandler>,
}

impl Default for AccessControlHandler {
    fn default() -> Self {
        Self::new(Arc::new(ResponseCodeHandler::NOT_FOUND))
    }
}

impl AccessControlHandler {
    pub fn new(next: Arc<dyn HttpHandler>) -> Self {
        Self {
            controller: Arc::new(AccessController::new()),
            next,
            rejection: Arc::new(ResponseCodeHandler::FORBIDDEN),
        }
    }

    /// Share an existing controller, e.g. one reconfigured elsewhere at runtime
    pub fn with_controller(mut self, controller: Arc<AccessController>) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_next(mut self, next: Arc<dyn HttpHandler>) -> Self {
        self.next = next;
        self
    }

    pub fn with_rejection(mut self, rejection: Arc<dyn HttpHandler>) -> Self {
        self.rejection = rejection;
        self
    }

    /// The rule list guarding this handler; configure it through here
    pub fn controller(&self) -> &Arc<AccessController> {
        &self.controller
    }

    pub fn next(&self) -> &Arc<dyn HttpHandler> {
        &self.next
    }

    pub fn is_allowed(&self, peer: SocketAddr) -> bool {
        self.controller.is_ip_allowed(peer.ip())
    }
}

#[async_trait]
impl HttpHandler for AccessControlHandler {
    async fn handle(&self, req: Req, peer: SocketAddr) -> Resp {
        if self.is_allowed(peer) {
            self.next.handle(req, peer).await
        } else {
            log::debug!("Peer {} rejected: {} {}", peer.ip(), req.method(), req.uri().path());
            self.rejection.handle(req, peer).await
        }
    }
}
