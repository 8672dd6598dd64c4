use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

use super::config::Config;
use crate::h1::{DecodeOutcome, RequestDecoder};
use crate::http::{Method, StatusCode};
use crate::log::{debug, trace};
use crate::request::Request;
use crate::response::writer::{WriteOptions, write_response};
use crate::response::IntoResponse;
use crate::routing::Router;

/// Serve HTTP/1.1 requests from `io` until the connection closes.
///
/// Requests are answered strictly in the order they were received. The connection closes on
/// peer disconnect, malformed input, idle timeout, or when either side asks for it.
pub async fn serve_connection<IO>(
    io: IO,
    peer: Option<SocketAddr>,
    router: Arc<Router>,
    config: Arc<Config>,
) where
    IO: AsyncRead + AsyncWrite + Unpin,
{
    Connection::new(io, peer, router, config, None).run().await
}

pub(crate) struct Connection<IO> {
    io: IO,
    peer: Option<SocketAddr>,
    router: Arc<Router>,
    config: Arc<Config>,
    decoder: RequestDecoder,
    opts: WriteOptions,
    seq: u64,
    shutdown: Option<watch::Receiver<bool>>,
}

/// What the connection does after an event.
enum Next {
    Continue,
    Close,
}

impl<IO> Connection<IO>
where
    IO: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(
        io: IO,
        peer: Option<SocketAddr>,
        router: Arc<Router>,
        config: Arc<Config>,
        shutdown: Option<watch::Receiver<bool>>,
    ) -> Self {
        Self {
            io,
            peer,
            decoder: RequestDecoder::new(config.limits.clone()),
            opts: config.write_options(),
            router,
            config,
            seq: 0,
            shutdown,
        }
    }

    pub(crate) async fn run(mut self) {
        trace!("connection open: {:?}", self.peer);
        match self.drive().await {
            Ok(()) => {}
            Err(err) => {
                debug!("connection error: {err}");
            }
        }
        let _ = self.io.shutdown().await;
        trace!("connection closed: {:?}, {} requests", self.peer, self.seq);
    }

    async fn drive(&mut self) -> io::Result<()> {
        loop {
            // buffered pipelined requests are handled before reading more
            match self.decoder.decode() {
                DecodeOutcome::Complete(req) => match self.respond(req).await? {
                    Next::Continue => continue,
                    Next::Close => return Ok(()),
                },
                DecodeOutcome::Malformed(err) => {
                    debug!("malformed request from {:?}: {err}", self.peer);
                    let opts = WriteOptions {
                        keep_alive: false,
                        ..self.opts.clone()
                    };
                    write_response(&mut self.io, err.into_response(), &opts).await?;
                    return Ok(());
                }
                DecodeOutcome::Incomplete => {}
            }

            match self.read().await? {
                Next::Continue => {}
                Next::Close => return Ok(()),
            }
        }
    }

    /// Read more bytes into the decoder buffer.
    async fn read(&mut self) -> io::Result<Next> {
        let idle_timeout = self.config.idle_timeout;
        let read = tokio::time::timeout(idle_timeout, self.io.read_buf(self.decoder.read_buffer()));

        let read = tokio::select! {
            biased;
            _ = shutdown_signal(&mut self.shutdown) => {
                trace!("connection closed by shutdown");
                return Ok(Next::Close);
            }
            read = read => read,
        };

        match read {
            Ok(Ok(0)) => Ok(Next::Close),
            Ok(Ok(_)) => Ok(Next::Continue),
            Ok(Err(err)) => Err(err),
            Err(_) if self.decoder.is_idle() => {
                trace!("idle timeout: {:?}", self.peer);
                Ok(Next::Close)
            }
            Err(_) => {
                debug!("request timeout: {:?}", self.peer);
                let opts = WriteOptions {
                    keep_alive: false,
                    ..self.opts.clone()
                };
                let res = (StatusCode::REQUEST_TIMEOUT, "Request Timeout").into_response();
                write_response(&mut self.io, res, &opts).await?;
                Ok(Next::Close)
            }
        }
    }

    async fn respond(&mut self, mut req: Request) -> io::Result<Next> {
        self.seq += 1;
        let parts = req.parts_mut();
        parts.seq = self.seq;
        parts.remote = self.peer;

        let method = req.method();
        let version = req.version();
        let keep_alive = req.keep_alive();
        debug!("#{} {} {} {}", self.seq, method, req.target(), version);

        let res = self.router.dispatch(req).await;

        let opts = WriteOptions {
            version,
            head: method == Method::HEAD,
            keep_alive: keep_alive && !self.is_shutdown(),
            ..self.opts.clone()
        };
        match write_response(&mut self.io, res, &opts).await? {
            true => Ok(Next::Continue),
            false => Ok(Next::Close),
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

/// Resolves when shutdown is requested, never without a receiver.
pub(crate) async fn shutdown_signal(shutdown: &mut Option<watch::Receiver<bool>>) {
    match shutdown {
        // sender dropped along with its server, treated as shutdown
        Some(rx) => {
            let _ = rx.wait_for(|stop| *stop).await;
        }
        None => std::future::pending().await,
    }
}
