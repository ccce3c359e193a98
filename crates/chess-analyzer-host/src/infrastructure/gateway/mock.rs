//! Mock gateway for integration tests.
//!
//! Records start/stop calls without binding a socket.  Set
//! [`fail_start`](MockGateway::fail_start) to simulate an occupied port.

use std::io;
use std::net::SocketAddr;

use chess_analyzer_gateway::GatewayError;

use crate::application::supervisor::ServiceGateway;

/// In-memory gateway that never touches the network.
#[derive(Debug)]
pub struct MockGateway {
    addr: SocketAddr,
    running: bool,
    /// When `true`, `start` returns `GatewayError::Bind`.
    pub fail_start: bool,
    /// Number of successful `start` calls.
    pub starts: usize,
    /// Number of `stop` calls that stopped a running gateway.
    pub stops: usize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], chess_analyzer_gateway::DEFAULT_PORT)),
            running: false,
            fail_start: false,
            starts: 0,
            stops: 0,
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceGateway for MockGateway {
    fn start(&mut self) -> Result<(), GatewayError> {
        if self.fail_start {
            return Err(GatewayError::Bind {
                addr: self.addr,
                source: io::Error::from(io::ErrorKind::AddrInUse),
            });
        }
        self.running = true;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}
