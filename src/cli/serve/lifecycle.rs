//! Server lifecycle management.

use crate::{core::register_server, log};
use anyhow::Result;
use crossbeam::channel::{Receiver, RecvTimeoutError};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// How long in-flight requests may run after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let Some(port) = base_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind {} from port {} after {} attempts: {}",
        interface,
        base_port,
        MAX_PORT_RETRIES,
        last_error.map_or_else(|| "port range exhausted".to_string(), |e| e.to_string())
    ))
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the handler set up in main() unblocks the server
/// so the request loop returns.
pub fn register_server_for_shutdown(server: Arc<Server>) {
    register_server(server);
}

/// Wait until every in-flight request has dropped its sender, or give up
/// after [`DRAIN_TIMEOUT`].
pub fn wait_for_drain(done: Receiver<()>) {
    match done.recv_timeout(DRAIN_TIMEOUT) {
        Err(RecvTimeoutError::Disconnected) | Ok(()) => {}
        Err(RecvTimeoutError::Timeout) => {
            log!("serve"; "requests still running after {}s, exiting", DRAIN_TIMEOUT.as_secs());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_bind_retries_next_port() {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let (first, addr) = bind_with_retry(localhost, 0).unwrap();
        // Port 0 lets the OS pick; bind the same concrete port again
        let taken = first.server_addr().to_ip().map_or(addr.port(), |a| a.port());

        let (_second, addr2) = bind_with_retry(localhost, taken).unwrap();
        assert_ne!(addr2.port(), taken);
        assert!(addr2.port() > taken);
    }

    #[test]
    fn test_drain_returns_when_senders_drop() {
        let (tx, rx) = crossbeam::channel::unbounded::<()>();
        let worker = tx.clone();
        drop(tx);
        std::thread::spawn(move || drop(worker));
        wait_for_drain(rx);
    }
}
