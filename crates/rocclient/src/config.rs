//! Client configuration surface

use crate::error::{ClientError, Result};
use rocproto::DeviceAddress;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Connection and addressing options for one device.
///
/// The `roc` pair addresses the remote unit; the `host` pair identifies
/// this client in the frame header and defaults to address 1, group 0.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Numeric IPv4 or IPv6 address of the device.
    pub host: String,
    pub port: u16,
    pub roc_address: u8,
    pub roc_group: u8,
    pub host_address: u8,
    pub host_group: u8,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub close_timeout: Duration,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, roc_address: u8, roc_group: u8) -> Self {
        Self {
            host: host.into(),
            port,
            roc_address,
            roc_group,
            host_address: 1,
            host_group: 0,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(15),
            write_timeout: Duration::from_secs(1),
            close_timeout: Duration::from_secs(1),
        }
    }

    pub fn with_host_address(mut self, host_address: u8, host_group: u8) -> Self {
        self.host_address = host_address;
        self.host_group = host_group;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Parse and validate the endpoint. The host must be a numeric IP;
    /// name resolution is deliberately out of scope.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ClientError::ConfigInvalid(format!("not a numeric IP: {:?}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn device_address(&self) -> DeviceAddress {
        DeviceAddress {
            roc_address: self.roc_address,
            roc_group: self.roc_group,
            host_address: self.host_address,
            host_group: self.host_group,
        }
    }
}
