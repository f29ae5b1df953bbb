//! Minimal HTTP/1.1 client framing for the collector POST.

use core::fmt::{self, Write as _};

pub const HOST_MAX: usize = 64;
pub const PATH_MAX: usize = 128;
const DEFAULT_PORT: u16 = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointError {
    UnsupportedScheme,
    MissingHost,
    InvalidPort,
    TooLong,
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnsupportedScheme => "only http:// collector urls are supported",
            Self::MissingHost => "collector url has no host",
            Self::InvalidPort => "collector url has an invalid port",
            Self::TooLong => "collector url is too long",
        })
    }
}

/// Collector location parsed from `http://host[:port][/path]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    host: heapless::String<HOST_MAX>,
    port: u16,
    path: heapless::String<PATH_MAX>,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, EndpointError> {
        let rest = url
            .strip_prefix("http://")
            .ok_or(EndpointError::UnsupportedScheme)?;
        let (authority, path) = match rest.find('/') {
            Some(at) => rest.split_at(at),
            None => (rest, "/"),
        };
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>()
                    .ok()
                    .filter(|port| *port != 0)
                    .ok_or(EndpointError::InvalidPort)?,
            ),
            None => (authority, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(EndpointError::MissingHost);
        }

        let mut endpoint = Self {
            host: heapless::String::new(),
            port,
            path: heapless::String::new(),
        };
        endpoint
            .host
            .push_str(host)
            .map_err(|_| EndpointError::TooLong)?;
        endpoint
            .path
            .push_str(path)
            .map_err(|_| EndpointError::TooLong)?;
        Ok(endpoint)
    }

    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// The host as a dotted-quad literal, when it is one.
    pub fn host_ipv4(&self) -> Option<[u8; 4]> {
        parse_ipv4(self.host())
    }
}

pub fn parse_ipv4(text: &str) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut parts = text.split('.');
    for octet in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}

/// Request line and headers for a JSON POST, terminated by the blank line.
pub fn write_request_head<W: fmt::Write>(
    out: &mut W,
    endpoint: &Endpoint,
    content_length: usize,
) -> fmt::Result {
    write!(out, "POST {} HTTP/1.1\r\nHost: {}", endpoint.path(), endpoint.host())?;
    if endpoint.port() != DEFAULT_PORT {
        write!(out, ":{}", endpoint.port())?;
    }
    write!(
        out,
        "\r\nContent-Type: application/json\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
    )
}

pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

/// Status code from `HTTP/1.x NNN reason`. Needs only the first line.
pub fn parse_status_line(buf: &[u8]) -> Option<u16> {
    let line_end = buf.windows(2).position(|window| window == b"\r\n")?;
    let line = core::str::from_utf8(&buf[..line_end]).ok()?;
    let mut parts = line.split_ascii_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/1.") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse::<u16>().ok().filter(|code| (100..600).contains(code))
}
