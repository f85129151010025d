//! HTTP/1.1 over the on-box eAPI UNIX domain socket.
//!
//! The socket endpoint is unauthenticated, so no credentials are sent.
//! Each request opens a fresh stream with `Connection: close` and reads
//! until the peer hangs up.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use super::config::{COMMAND_API_PATH, TransportConfig};
use super::{Transport, check_status};
use crate::error::{ConnectionError, Result};

/// Transport for the `socket` kind.
pub struct SocketTransport {
    path: PathBuf,
    timeout: Duration,
}

impl SocketTransport {
    /// Create a socket transport from a transport configuration.
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            path: config.socket_path.clone(),
            timeout: config.timeout,
        }
    }

    async fn round_trip(&self, body: &str) -> Result<Vec<u8>> {
        let mut stream = UnixStream::connect(&self.path)
            .await
            .map_err(ConnectionError::Io)?;

        let request = format!(
            "POST {COMMAND_API_PATH} HTTP/1.1\r\n\
             Host: localhost\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {body}",
            body.len()
        );
        stream
            .write_all(request.as_bytes())
            .await
            .map_err(ConnectionError::Io)?;

        let mut raw = Vec::with_capacity(4096);
        stream
            .read_to_end(&mut raw)
            .await
            .map_err(ConnectionError::Io)?;
        Ok(raw)
    }
}

#[async_trait]
impl Transport for SocketTransport {
    async fn send(&self, body: String) -> Result<String> {
        trace!("POST unix:{}", self.path.display());

        let raw = tokio::time::timeout(self.timeout, self.round_trip(&body))
            .await
            .map_err(|_| ConnectionError::Timeout(self.timeout))??;

        let (status, body) = parse_http_response(&raw)?;
        check_status(status, body)
    }

    fn endpoint(&self) -> String {
        format!("unix:{}", self.path.display())
    }
}

fn invalid(message: impl Into<String>) -> ConnectionError {
    ConnectionError::InvalidResponse {
        message: message.into(),
    }
}

/// Split a raw HTTP/1.1 response into status code and decoded body.
fn parse_http_response(raw: &[u8]) -> std::result::Result<(u16, String), ConnectionError> {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| invalid("missing end of HTTP headers"))?;
    let head = std::str::from_utf8(&raw[..split]).map_err(|_| invalid("non UTF-8 headers"))?;
    let payload = &raw[split + 4..];

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| invalid(format!("bad status line '{status_line}'")))?;

    let mut chunked = false;
    let mut content_length = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "transfer-encoding" => chunked = value.eq_ignore_ascii_case("chunked"),
            "content-length" => content_length = value.parse::<usize>().ok(),
            _ => {}
        }
    }

    let body = if chunked {
        decode_chunked(payload)?
    } else if let Some(len) = content_length {
        payload
            .get(..len)
            .ok_or_else(|| invalid("truncated body"))?
            .to_vec()
    } else {
        payload.to_vec()
    };

    let body = String::from_utf8(body).map_err(|_| invalid("non UTF-8 body"))?;
    Ok((status, body))
}

fn decode_chunked(mut data: &[u8]) -> std::result::Result<Vec<u8>, ConnectionError> {
    let mut out = Vec::with_capacity(data.len());
    loop {
        let eol = data
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| invalid("missing chunk size"))?;
        let size_line =
            std::str::from_utf8(&data[..eol]).map_err(|_| invalid("bad chunk size"))?;
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| invalid(format!("bad chunk size '{size_hex}'")))?;
        data = &data[eol + 2..];

        if size == 0 {
            return Ok(out);
        }
        let chunk = data
            .get(..size)
            .ok_or_else(|| invalid("truncated chunk"))?;
        out.extend_from_slice(chunk);
        data = data.get(size + 2..).unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::transport::TransportKind;
    use tokio::net::UnixListener;

    #[test]
    fn test_parse_content_length() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
        let (status, body) = parse_http_response(raw).unwrap();
        assert_eq!(status, 200);
        assert_eq!(body, "hello");
    }

    #[test]
    fn test_parse_chunked() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\n{\"a\"\r\n3\r\n:1}\r\n0\r\n\r\n";
        let (status, body) = parse_http_response(raw).unwrap();
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"a":1}"#);
    }

    #[test]
    fn test_parse_bad_status() {
        let raw = b"garbage\r\n\r\n";
        assert!(parse_http_response(raw).is_err());
        assert!(parse_http_response(b"HTTP/1.1 200 OK").is_err());
    }

    #[tokio::test]
    async fn test_round_trip_over_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("command-api.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = stream.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let body = r#"{"jsonrpc":"2.0","id":1,"result":[{}]}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            request
        });

        let mut config = TransportConfig::new(TransportKind::Socket, "localhost");
        config.socket_path = path;
        let transport = SocketTransport::new(&config);
        let body = transport.send("{\"id\":1}".to_string()).await.unwrap();
        assert!(body.contains("\"result\""));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /command-api HTTP/1.1\r\n"));
        assert!(request.ends_with("{\"id\":1}"));
    }
}
