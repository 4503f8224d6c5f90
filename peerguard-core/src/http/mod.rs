//! HTTP integration
//!
//! - [`handler`] - [`HttpHandler`] trait, [`ResponseCodeHandler`] and the
//!   [`AccessControlHandler`] that puts an ACL in front of another handler
//! - [`server`] - Hyper listener passing the peer address along with each request

pub mod handler;
pub mod server;

use bytes::Bytes;
use http_body_util::combinators::{BoxBody, UnsyncBoxBody};
use hyper::{Request, Response};
use std::convert::Infallible;

pub use handler::{AccessControlHandler, HttpHandler, ResponseCodeHandler};
pub use server::{serve, serve_with_shutdown};

// Module-level request/response type aliases for Hyper 1.x
pub type ReqBody = UnsyncBoxBody<Bytes, hyper::Error>;
pub type Req = Request<ReqBody>;
pub type RespBody = BoxBody<Bytes, Infallible>;
pub type Resp = Response<RespBody>;
