//! Blocking HTTP/1.1 POST used on native targets. Runs on the IO task pool,
//! never on the frame thread.

use std::io::{Read, Write};
use std::net::TcpStream;

use crate::error::ScenarioError;
use crate::response::{decode_reply, ScenarioData, SimulationRequest};

/// Parsed `http://host[:port]/path` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

pub(crate) fn parse_endpoint(url: &str) -> Result<Endpoint, ScenarioError> {
    let rest = url.trim().strip_prefix("http://").ok_or_else(|| {
        ScenarioError::Transport(format!("unsupported endpoint '{url}' (expected http://)"))
    })?;

    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };
    if authority.is_empty() {
        return Err(ScenarioError::Transport(format!("endpoint '{url}' has no host")));
    }

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|e| ScenarioError::Transport(format!("bad port in '{url}': {e}")))?;
            (host, port)
        }
        None => (authority, 80),
    };

    Ok(Endpoint {
        host: host.to_string(),
        port,
        path: path.to_string(),
    })
}

/// Send the request and decode the reply.
pub(crate) fn post_request(
    url: &str,
    request: &SimulationRequest,
) -> Result<ScenarioData, ScenarioError> {
    let endpoint = parse_endpoint(url)?;
    let body = request.to_json()?;

    let transport = |e: std::io::Error| {
        ScenarioError::Transport(format!("{}:{}: {e}", endpoint.host, endpoint.port))
    };

    let mut stream =
        TcpStream::connect((endpoint.host.as_str(), endpoint.port)).map_err(transport)?;
    let head = format!(
        "POST {} HTTP/1.1\r\nHost: {}:{}\r\nContent-Type: application/json\r\n\
         Accept: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        endpoint.path,
        endpoint.host,
        endpoint.port,
        body.len()
    );
    stream.write_all(head.as_bytes()).map_err(transport)?;
    stream.write_all(body.as_bytes()).map_err(transport)?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).map_err(transport)?;

    let (status, reply) = split_response(&raw)?;
    decode_reply(status, &reply)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Split a raw HTTP/1.1 response into status code and decoded body text.
/// Framing works on bytes; the body is decoded as UTF-8 once at the end.
pub(crate) fn split_response(raw: &[u8]) -> Result<(u16, String), ScenarioError> {
    let split = find(raw, b"\r\n\r\n")
        .ok_or_else(|| ScenarioError::Transport("truncated HTTP response".into()))?;
    let head = String::from_utf8_lossy(&raw[..split]);
    let body = &raw[split + 4..];

    let mut lines = head.lines();
    let status_line = lines.next().unwrap_or_default();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| ScenarioError::Transport(format!("bad status line '{status_line}'")))?;

    let chunked = lines.any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding")
                && value.trim().eq_ignore_ascii_case("chunked")
        })
    });

    let body = if chunked {
        String::from_utf8_lossy(&dechunk(body)?).into_owned()
    } else {
        String::from_utf8_lossy(body).into_owned()
    };
    Ok((status, body))
}

fn dechunk(mut body: &[u8]) -> Result<Vec<u8>, ScenarioError> {
    let mut out = Vec::with_capacity(body.len());
    loop {
        let line_end = find(body, b"\r\n")
            .ok_or_else(|| ScenarioError::Transport("truncated chunk header".into()))?;
        let size_line = String::from_utf8_lossy(&body[..line_end]);
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|e| ScenarioError::Transport(format!("bad chunk size '{size_hex}': {e}")))?;
        if size == 0 {
            return Ok(out);
        }
        let rest = &body[line_end + 2..];
        let chunk = rest
            .get(..size)
            .ok_or_else(|| ScenarioError::Transport("truncated chunk".into()))?;
        out.extend_from_slice(chunk);
        let after = &rest[size..];
        body = after.strip_prefix(b"\r\n").unwrap_or(after);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_endpoint() {
        let e = parse_endpoint("http://localhost:5000/api/run_simulation").unwrap();
        assert_eq!(e.host, "localhost");
        assert_eq!(e.port, 5000);
        assert_eq!(e.path, "/api/run_simulation");
    }

    #[test]
    fn test_parse_endpoint_without_port_or_path() {
        let e = parse_endpoint("http://sim.example").unwrap();
        assert_eq!(e.port, 80);
        assert_eq!(e.path, "/");
    }

    #[test]
    fn test_https_is_a_transport_error() {
        let err = parse_endpoint("https://sim.example/run").unwrap_err();
        assert!(matches!(err, ScenarioError::Transport(_)));
    }

    #[test]
    fn test_split_plain_response() {
        let raw = b"HTTP/1.1 500 INTERNAL SERVER ERROR\r\nContent-Type: application/json\r\n\r\n{\"error\":\"x\"}";
        let (status, body) = split_response(raw).unwrap();
        assert_eq!(status, 500);
        assert_eq!(body, "{\"error\":\"x\"}");
    }

    #[test]
    fn test_split_chunked_response() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\n{\"a\"\r\n3\r\n:1}\r\n0\r\n\r\n";
        let (status, body) = split_response(raw).unwrap();
        assert_eq!(status, 200);
        assert_eq!(body, "{\"a\":1}");
    }

    #[test]
    fn test_chunk_sizes_count_raw_bytes() {
        // First chunk carries an invalid UTF-8 byte; the next chunk must
        // still start at the right offset.
        let mut raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\n".to_vec();
        raw.extend_from_slice(&[b'a', 0xFF, b'b']);
        raw.extend_from_slice(b"\r\n2\r\ncd\r\n0\r\n\r\n");
        let (status, body) = split_response(&raw).unwrap();
        assert_eq!(status, 200);
        assert_eq!(body, "a\u{FFFD}bcd");
    }

    #[test]
    fn test_truncated_response_is_transport_error() {
        assert!(matches!(
            split_response(b"HTTP/1.1 200 OK\r\nContent-"),
            Err(ScenarioError::Transport(_))
        ));
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is practically never listening on loopback.
        let req = SimulationRequest {
            season: Default::default(),
            forest_type: Default::default(),
        };
        let err = post_request("http://127.0.0.1:9/api/run_simulation", &req).unwrap_err();
        assert!(matches!(err, ScenarioError::Transport(_)));
    }
}
