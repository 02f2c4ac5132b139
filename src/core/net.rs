// src/core/net.rs

// HTTP/1.0 GET over TCP (std-only). The mirror serves plain HTTP and closes
// the connection at the end, so no chunked transfer to deal with.

use std::{io::{Read, Write}, net::TcpStream, time::Duration};

use thiserror::Error;

use crate::config::consts::TIMEOUT_SECS;

/// Transport failure classification. The resolver only cares that these are
/// terminal for the current attempt; the message detail is for the log.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0} for {1}")]
    Status(u16, String),
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed HTTP response")]
    Malformed,
}

/// Plain GET, returns the raw body bytes. Bytes, not a String: the archive
/// endpoint serves zip data.
pub fn http_get(host: &str, path: &str) -> Result<Vec<u8>, FetchError> {
    let mut s = TcpStream::connect((host, 80))?;
    s.set_read_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))?;
    s.set_write_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))?;

    let req = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: cn_scrape/0.4\r\nConnection: close\r\n\r\n",
        path, host
    );
    s.write_all(req.as_bytes())?;
    s.flush()?;

    let mut buf = Vec::new();
    s.read_to_end(&mut buf)?;

    let header_end = find_subslice(&buf, b"\r\n\r\n").ok_or(FetchError::Malformed)?;
    let status_line = buf[..header_end]
        .split(|&b| b == b'\r')
        .next()
        .unwrap_or(&[]);
    let code = parse_status(status_line).ok_or(FetchError::Malformed)?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Status(code, format!("{}{}", host, path)));
    }

    Ok(buf[header_end + 4..].to_vec())
}

/// "HTTP/1.0 200 OK" → 200
fn parse_status(line: &[u8]) -> Option<u16> {
    let line = std::str::from_utf8(line).ok()?;
    line.split_ascii_whitespace().nth(1)?.parse().ok()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_parses() {
        assert_eq!(parse_status(b"HTTP/1.0 200 OK"), Some(200));
        assert_eq!(parse_status(b"HTTP/1.1 404 Not Found"), Some(404));
        assert_eq!(parse_status(b"garbage"), None);
    }

    #[test]
    fn subslice_search_finds_header_break() {
        let resp = b"HTTP/1.0 200 OK\r\nA: b\r\n\r\nbody";
        let i = find_subslice(resp, b"\r\n\r\n").unwrap();
        assert_eq!(&resp[i + 4..], b"body");
    }
}
