//! Minimal HTTP/1.1 listener built on Hyper
//!
//! Accepts TCP connections and hands every request, together with the
//! connection's peer address, to an [`HttpHandler`].

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use super::HttpHandler;

/// Serve `handler` on `listener` until an accept error occurs
pub async fn serve(listener: TcpListener, handler: Arc<dyn HttpHandler>) -> anyhow::Result<()> {
    serve_with_shutdown(listener, handler, std::future::pending()).await
}

/// Serve `handler` on `listener` until `shutdown` resolves.
///
/// Connections already accepted keep running on their own tasks.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    handler: Arc<dyn HttpHandler>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    log::info!("Peerguard listening on http://{}", listener.local_addr()?);
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => {
                log::info!("Peerguard listener shutting down");
                return Ok(());
            }
            accepted = listener.accept() => accepted?,
        };
        let io = TokioIo::new(stream);
        let handler = Arc::clone(&handler);

        tokio::task::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let handler = Arc::clone(&handler);
                async move {
                    let req = req.map(|body| body.boxed_unsync());
                    Ok::<_, Infallible>(handler.handle(req, peer).await)
                }
            });
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                log::debug!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}
