//! Listener setup and local address discovery.

use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};

use tokio::net::TcpListener;

use crate::error::{Error, Result};

/// Bind the HTTP listener.
///
/// # Errors
///
/// Returns [`Error::PortInUse`] if another process already holds the port.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| match e.kind() {
        io::ErrorKind::AddrInUse => Error::PortInUse(addr.port()),
        _ => Error::Io(e),
    })
}

/// Primary non-loopback IPv4 address of this machine, if any.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface, whose address is then read back.
pub fn primary_ipv4() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_loopback() && !ip.is_unspecified()).then_some(ip)
}

/// URLs clients can use to reach a server listening on `addr`.
pub fn reachable_urls(addr: SocketAddr) -> Vec<String> {
    let port = addr.port();
    let mut urls = vec![format!("http://127.0.0.1:{port}")];

    if addr.ip().is_unspecified() {
        if let Some(ip) = primary_ipv4() {
            urls.push(format!("http://{ip}:{port}"));
        }
    } else if !addr.ip().is_loopback() {
        urls = vec![format!("http://{addr}")];
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_reports_port_in_use() {
        let first = bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
        let taken = first.local_addr().unwrap();

        let err = bind(taken).await.unwrap_err();
        assert!(matches!(err, Error::PortInUse(p) if p == taken.port()));
    }

    #[test]
    fn test_reachable_urls_localhost() {
        let urls = reachable_urls(SocketAddr::from(([127, 0, 0, 1], 8000)));
        assert_eq!(urls, vec!["http://127.0.0.1:8000".to_string()]);
    }

    #[test]
    fn test_reachable_urls_unspecified() {
        let urls = reachable_urls(SocketAddr::from(([0, 0, 0, 0], 8000)));
        assert!(!urls.is_empty());
        assert_eq!(urls[0], "http://127.0.0.1:8000");
        assert!(urls.iter().all(|u| u.ends_with(":8000")));
    }
}
