//! UDP socket setup for both ends of a transfer.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use crate::error::{Result, TransferError};

/// Listening socket parameters for the server side.
#[derive(Debug, Clone)]
pub struct ListenConfig {
    pub addr: SocketAddr,
    pub recv_buffer: usize,
    /// Read timeout. Bounds how long a blocked read waits before checking
    /// for shutdown; transfers themselves have no timeout.
    pub poll_interval: Duration,
}

/// Bind the server's listening socket.
pub fn bind_listener(config: &ListenConfig) -> Result<UdpSocket> {
    create_listen_socket(config).map_err(|source| TransferError::Bind {
        address: config.addr.to_string(),
        source,
    })
}

fn create_listen_socket(config: &ListenConfig) -> io::Result<UdpSocket> {
    let socket = Socket::new(
        Domain::for_address(config.addr),
        Type::DGRAM,
        Some(Protocol::UDP),
    )?;
    if config.addr.is_ipv6() {
        // [::] also accepts IPv4-mapped peers
        socket.set_only_v6(false)?;
    }
    socket.set_nonblocking(false)?;
    socket.set_recv_buffer_size(config.recv_buffer)?;
    socket.set_read_timeout(Some(config.poll_interval))?;
    socket.bind(&config.addr.into())?;

    Ok(socket.into())
}

/// Resolve `host:port` (IPv6 hosts in brackets) to the first address found.
pub fn resolve(address: &str) -> Result<SocketAddr> {
    let resolve_err = |source| TransferError::Resolve {
        address: address.to_string(),
        source,
    };

    address
        .to_socket_addrs()
        .map_err(resolve_err)?
        .next()
        .ok_or_else(|| {
            resolve_err(io::Error::new(
                io::ErrorKind::NotFound,
                "no addresses found",
            ))
        })
}

/// Open a client socket on an ephemeral port, connected to `target`.
/// Reads on it block without a timeout.
pub fn connect(target: SocketAddr) -> Result<UdpSocket> {
    let local: SocketAddr = if target.is_ipv6() {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    };
    let bind_err = |source| TransferError::Bind {
        address: target.to_string(),
        source,
    };

    let socket = UdpSocket::bind(local).map_err(bind_err)?;
    socket.connect(target).map_err(bind_err)?;
    Ok(socket)
}
