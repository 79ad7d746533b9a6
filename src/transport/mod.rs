//! Datagram transports
//!
//! Streaming tasks only need "send these bytes to that endpoint". The
//! [`Transport`] trait captures that; [`UdpTransport`] is the network
//! implementation and [`ChannelTransport`] hands frames to an in-process
//! receiver instead.

use std::collections::HashSet;
use std::future::Future;
use std::io;
use std::net::SocketAddr;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// One-way datagram sender shared by all streaming tasks
pub trait Transport: Send + Sync + 'static {
    /// Send one datagram, returning the number of bytes written
    fn send_to(
        &self,
        frame: Bytes,
        destination: SocketAddr,
    ) -> impl Future<Output = io::Result<usize>> + Send;
}

/// UDP transport over a single local socket
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind the local socket (use port 0 for an ephemeral port)
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        tracing::debug!(local = %socket.local_addr()?, "UDP transport bound");
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl Transport for UdpTransport {
    async fn send_to(&self, frame: Bytes, destination: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(&frame, destination).await
    }
}

/// A datagram captured by [`ChannelTransport`]
#[derive(Debug, Clone)]
pub struct SentFrame {
    pub destination: SocketAddr,
    pub data: Bytes,
}

/// In-process transport that forwards frames to a channel
///
/// Sends fail with `BrokenPipe` once the receiver is dropped, and with
/// `ConnectionRefused` for destinations marked unreachable.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<SentFrame>,
    unreachable: HashSet<SocketAddr>,
}

impl ChannelTransport {
    /// Create a transport and the receiver that observes its frames
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SentFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            tx,
            unreachable: HashSet::new(),
        };
        (transport, rx)
    }

    /// Make every send to `destination` fail
    pub fn unreachable(mut self, destination: SocketAddr) -> Self {
        self.unreachable.insert(destination);
        self
    }
}

impl Transport for ChannelTransport {
    async fn send_to(&self, frame: Bytes, destination: SocketAddr) -> io::Result<usize> {
        if self.unreachable.contains(&destination) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("{} unreachable", destination),
            ));
        }

        let len = frame.len();
        self.tx
            .send(SentFrame {
                destination,
                data: frame,
            })
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "frame receiver closed"))?;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_transport_delivers() {
        let (transport, mut rx) = ChannelTransport::new();
        let dest: SocketAddr = "127.0.0.1:4712".parse().unwrap();

        let n = transport
            .send_to(Bytes::from_static(&[1, 2, 3]), dest)
            .await
            .unwrap();
        assert_eq!(n, 3);

        let sent = rx.recv().await.unwrap();
        assert_eq!(sent.destination, dest);
        assert_eq!(&sent.data[..], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_channel_transport_closed_receiver() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);

        let err = transport
            .send_to(Bytes::from_static(&[0]), "127.0.0.1:1".parse().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_channel_transport_unreachable() {
        let bad: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let good: SocketAddr = "127.0.0.1:10".parse().unwrap();
        let (transport, mut rx) = ChannelTransport::new();
        let transport = transport.unreachable(bad);

        let err = transport.send_to(Bytes::from_static(&[0]), bad).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);

        tokio_test::assert_ok!(transport.send_to(Bytes::from_static(&[0]), good).await);
        assert_eq!(rx.recv().await.unwrap().destination, good);
    }

    #[tokio::test]
    async fn test_udp_transport_loopback() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let dest = receiver.local_addr().unwrap();
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();

        let n = transport
            .send_to(Bytes::from_static(b"frame"), dest)
            .await
            .unwrap();
        assert_eq!(n, 5);

        let mut buf = [0u8; 64];
        let (len, from) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"frame");
        assert_eq!(from, transport.local_addr().unwrap());
    }
}
