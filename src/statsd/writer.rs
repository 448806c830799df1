use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{debug, error, warn};

use crate::{MetricResult, MetricsError};

/// Destination for flushed packets.
///
/// Implement this trait to send packets somewhere other than a UDP socket.
/// `write` may be called from several flush workers at once.
pub trait Writer: Send + Sync {
    /// Writes one whole packet.
    ///
    /// # Errors
    /// Returns the underlying I/O error; the caller logs it and moves on.
    fn write(&self, buf: &[u8]) -> std::io::Result<usize>;
}

impl<T> Writer for Arc<T>
where
    T: Writer + ?Sized,
{
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        (**self).write(buf)
    }
}

impl<T> Writer for Box<T>
where
    T: Writer + ?Sized,
{
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        (**self).write(buf)
    }
}

/// Connected, non-blocking UDP socket writing one datagram per packet.
pub struct UdpSocketWriter {
    sock: UdpSocket,
    destination_addr: SocketAddr,
}

impl UdpSocketWriter {
    /// Binds an ephemeral socket of the destination's family and connects it.
    ///
    /// # Errors
    /// Returns the bind, connect or mode-switch error.
    pub fn connect(destination_addr: SocketAddr) -> MetricResult<Self> {
        let bind_addr: SocketAddr = match destination_addr {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let sock = UdpSocket::bind(bind_addr)?;
        sock.connect(destination_addr)?;
        sock.set_nonblocking(true)?;
        Ok(Self {
            sock,
            destination_addr,
        })
    }

    /// The collector this socket is connected to.
    #[must_use]
    pub const fn destination(&self) -> SocketAddr {
        self.destination_addr
    }
}

impl Writer for UdpSocketWriter {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        self.sock.send(buf)
    }
}

/// How [`Transport::open`] obtains its writer.
pub enum TransportType {
    /// Dial the collector over UDP.
    Udp,
    /// Install a user-provided writer instead of dialing.
    Custom(Arc<dyn Writer>),
}

impl std::fmt::Debug for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Udp => write!(f, "Udp"),
            Self::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}

/// Lifecycle of a [`Transport`] (and of the client owning it).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClientState {
    /// Constructed, or `open` failed; sends are logged no-ops.
    Unopened,
    /// A writer is installed.
    Open,
    /// `close` released the writer; sends are logged no-ops.
    Closed,
}

const STATE_UNOPENED: u8 = 0;
const STATE_OPEN: u8 = 1;
const STATE_CLOSED: u8 = 2;

// Arc<T> in arc-swap needs a sized T.
type WriterSlot = Box<dyn Writer>;

/// Best-effort, write-only handle to the collector.
///
/// The installed writer sits behind an [`ArcSwapOption`]: flush workers load
/// it without locking and `open`/`close` replace it atomically.
pub struct Transport {
    host: String,
    port: u16,
    transport_type: TransportType,
    writer: ArcSwapOption<WriterSlot>,
    state: AtomicU8,
}

impl Transport {
    /// Creates an unopened transport for `host:port`.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, transport_type: TransportType) -> Self {
        Self {
            host: host.into(),
            port,
            transport_type,
            writer: ArcSwapOption::empty(),
            state: AtomicU8::new(STATE_UNOPENED),
        }
    }

    /// Resolves the collector address and installs a connected writer.
    ///
    /// # Errors
    /// Returns resolution or socket errors. The transport keeps its previous
    /// state in that case.
    pub fn open(&self) -> MetricResult<()> {
        let writer: WriterSlot = match &self.transport_type {
            TransportType::Udp => {
                let destination = self.resolve()?;
                let writer = UdpSocketWriter::connect(destination)?;
                debug!("UDP transport connected to {}", writer.destination());
                Box::new(writer)
            }
            TransportType::Custom(writer) => Box::new(Arc::clone(writer)),
        };

        self.writer.store(Some(Arc::new(writer)));
        self.state.store(STATE_OPEN, Ordering::Release);
        Ok(())
    }

    fn resolve(&self) -> MetricResult<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| MetricsError::Unresolved(format!("{}:{}", self.host, self.port)))
    }

    /// Sends one packet, logging any failure.
    ///
    /// Returns the number of bytes written, `0` when the packet was dropped.
    pub fn send(&self, packet: &[u8]) -> usize {
        match self.try_send(packet) {
            Ok(written) => written,
            Err(err) => {
                warn!("Error sending metrics: {err}");
                0
            }
        }
    }

    fn try_send(&self, packet: &[u8]) -> MetricResult<usize> {
        let guard = self.writer.load();
        let Some(writer) = &*guard else {
            return Err(MetricsError::TransportUnavailable(match self.state() {
                ClientState::Closed => "closed",
                _ => "not open",
            }));
        };
        Ok(writer.write(packet)?)
    }

    /// Releases the writer. Sends after this are logged no-ops.
    pub fn close(&self) {
        if self.writer.swap(None).is_none() {
            error!("Closing a transport that was never opened");
        }
        self.state.store(STATE_CLOSED, Ordering::Release);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClientState {
        match self.state.load(Ordering::Acquire) {
            STATE_OPEN => ClientState::Open,
            STATE_CLOSED => ClientState::Closed,
            _ => ClientState::Unopened,
        }
    }

    /// Collector endpoint as configured, `host:port`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("endpoint", &self.endpoint())
            .field("transport_type", &self.transport_type)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
