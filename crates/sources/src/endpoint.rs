//! Sensor URI parsing

use std::net::{IpAddr, SocketAddr};

use sensplot_core::{TransportError, COAP_DEFAULT_PORT};

const COAP_SCHEME: &str = "coap://";

/// Parsed `coap://host[:port]/path` address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorUri {
    pub host: String,
    pub port: u16,
    /// Path segments, without empty ones
    pub path: Vec<String>,
}

impl SensorUri {
    /// Parse a CoAP URI. IPv6 literals must be bracketed.
    pub fn parse(uri: &str) -> Result<Self, TransportError> {
        let invalid = || TransportError::InvalidAddress(uri.to_string());

        let rest = uri.trim().strip_prefix(COAP_SCHEME).ok_or_else(invalid)?;
        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => (rest, ""),
        };

        let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
            let end = bracketed.find(']').ok_or_else(invalid)?;
            let port = match &bracketed[end + 1..] {
                "" => COAP_DEFAULT_PORT,
                tail => tail
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(invalid)?,
            };
            (&bracketed[..end], port)
        } else {
            match authority.rsplit_once(':') {
                Some((host, port)) => (host, port.parse().map_err(|_| invalid())?),
                None => (authority, COAP_DEFAULT_PORT),
            }
        };

        if host.is_empty() {
            return Err(invalid());
        }

        let path = path
            .split('?')
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            host: host.to_string(),
            port,
            path,
        })
    }

    /// Path segments joined with `/`
    pub fn resource(&self) -> String {
        self.path.join("/")
    }

    /// Resolve the host to a socket address
    pub async fn resolve(&self) -> Result<SocketAddr, TransportError> {
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| TransportError::Resolve {
                host: self.host.clone(),
                source: Some(e),
            })?;

        addrs.next().ok_or_else(|| TransportError::Resolve {
            host: self.host.clone(),
            source: None,
        })
    }
}
