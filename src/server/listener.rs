use std::io;
use std::net::SocketAddr;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};

/// Source of incoming connections.
pub trait Listener: Send + Sync + 'static {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Poll for a new connection and its peer address, if the transport has one.
    fn poll_accept(&self, cx: &mut Context) -> Poll<io::Result<(Self::Stream, Option<SocketAddr>)>>;

    /// Returns the bound address, if the transport has one.
    fn local_addr(&self) -> Option<SocketAddr>;
}

impl Listener for TcpListener {
    type Stream = TcpStream;

    #[inline]
    fn poll_accept(&self, cx: &mut Context) -> Poll<io::Result<(Self::Stream, Option<SocketAddr>)>> {
        TcpListener::poll_accept(self, cx).map_ok(|(io, addr)| (io, Some(addr)))
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        TcpListener::local_addr(self).ok()
    }
}

#[cfg(unix)]
impl Listener for UnixListener {
    type Stream = UnixStream;

    #[inline]
    fn poll_accept(&self, cx: &mut Context) -> Poll<io::Result<(Self::Stream, Option<SocketAddr>)>> {
        UnixListener::poll_accept(self, cx).map_ok(|(io, _)| (io, None))
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        None
    }
}
