// Network utilities - Target parsing and DNS resolution

use anyhow::{Context, Result};
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::*;
use std::net::{IpAddr, SocketAddr};

/// Default TLS port
pub const DEFAULT_PORT: u16 = 443;

/// Target information
#[derive(Debug, Clone)]
pub struct Target {
    pub hostname: String,
    pub port: u16,
    pub ip_addresses: Vec<IpAddr>,
}

impl Target {
    /// Parse target from string (host:port, [v6]:port, URL or just host)
    /// and resolve it
    pub async fn parse(input: &str) -> Result<Self> {
        let (hostname, port) = split_host_port(input)?;
        let ip_addresses = resolve_hostname(&hostname).await?;

        Ok(Self {
            hostname,
            port,
            ip_addresses,
        })
    }

    /// Override the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get all socket addresses
    pub fn socket_addrs(&self) -> Vec<SocketAddr> {
        self.ip_addresses
            .iter()
            .map(|ip| SocketAddr::new(*ip, self.port))
            .collect()
    }

    /// Address probed by default (first resolved IP)
    pub fn primary_addr(&self) -> Option<SocketAddr> {
        self.ip_addresses
            .first()
            .map(|ip| SocketAddr::new(*ip, self.port))
    }
}

/// Split a target string into hostname and port without resolving it
pub fn split_host_port(input: &str) -> Result<(String, u16)> {
    let input = input.trim();

    if input.contains("://") {
        // URL format (https://example.com:443)
        let url = url::Url::parse(input)?;
        let host = url.host_str().context("No hostname in URL")?;
        let host = host.trim_start_matches('[').trim_end_matches(']').to_string();
        return Ok((host, url.port().unwrap_or(DEFAULT_PORT)));
    }

    if let Some(rest) = input.strip_prefix('[') {
        // [v6] or [v6]:port
        let (host, after) = rest.split_once(']').context("Unterminated IPv6 literal")?;
        let port = match after.strip_prefix(':') {
            Some(port_str) => parse_port(port_str)?,
            None if after.is_empty() => DEFAULT_PORT,
            None => anyhow::bail!("Unexpected text after IPv6 literal: {}", after),
        };
        return Ok((host.to_string(), port));
    }

    // A bare IPv6 address has several colons and no port
    if input.parse::<IpAddr>().is_ok() {
        return Ok((input.to_string(), DEFAULT_PORT));
    }

    match input.rsplit_once(':') {
        Some((host, port_str)) => Ok((host.to_string(), parse_port(port_str)?)),
        None => Ok((input.to_string(), DEFAULT_PORT)),
    }
}

/// Resolve hostname to IP addresses
pub async fn resolve_hostname(hostname: &str) -> Result<Vec<IpAddr>> {
    // Check if it's already an IP address
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let response = resolver
        .lookup_ip(hostname)
        .await
        .with_context(|| format!("DNS lookup failed for {}", hostname))?;

    let ips: Vec<IpAddr> = response.iter().collect();

    if ips.is_empty() {
        anyhow::bail!("No IP addresses found for {}", hostname);
    }

    Ok(ips)
}

/// Parse port from string
pub fn parse_port(port_str: &str) -> Result<u16> {
    port_str
        .parse::<u16>()
        .with_context(|| format!("Invalid port number: {}", port_str))
}
