use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result, ensure};

use tally_transfer::ListenConfig;

const DEFAULT_HOST: &str = "::";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
const DEFAULT_RECV_BUFFER: usize = 4 * 1024 * 1024;

/// Server settings, read from `TALLY_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub poll_interval: Duration,
    pub recv_buffer: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host: IpAddr = lookup("TALLY_HOST")
            .unwrap_or_else(|| DEFAULT_HOST.into())
            .parse()
            .context("TALLY_HOST must be an IP address")?;
        let port: u16 = match lookup("TALLY_PORT") {
            Some(v) => v.parse().context("TALLY_PORT must be a port number")?,
            None => DEFAULT_PORT,
        };
        let poll_ms: u64 = match lookup("TALLY_POLL_INTERVAL_MS") {
            Some(v) => v
                .parse()
                .context("TALLY_POLL_INTERVAL_MS must be a number")?,
            None => DEFAULT_POLL_INTERVAL_MS,
        };
        ensure!(poll_ms > 0, "TALLY_POLL_INTERVAL_MS must be greater than zero");
        let recv_buffer: usize = match lookup("TALLY_RECV_BUFFER") {
            Some(v) => v.parse().context("TALLY_RECV_BUFFER must be a byte count")?,
            None => DEFAULT_RECV_BUFFER,
        };

        Ok(Self {
            host,
            port,
            poll_interval: Duration::from_millis(poll_ms),
            recv_buffer,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn listen_config(&self) -> ListenConfig {
        ListenConfig {
            addr: self.listen_addr(),
            recv_buffer: self.recv_buffer,
            poll_interval: self.poll_interval,
        }
    }
}
