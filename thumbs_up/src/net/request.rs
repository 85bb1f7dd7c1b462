//! Minimal HTTP/1.1 request framing.
//!
//! A request is a start line, header lines and an optional body, with the
//! head terminated by a blank line. Only what the game endpoints need is
//! supported: no chunked bodies, no keep-alive.

use std::collections::HashMap;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::errors::{RequestError, Result};

/// Maximum size of the start line plus headers.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Maximum declared body size. Game payloads are a few dozen bytes.
pub const MAX_BODY_SIZE: usize = 64 * 1024;

const READ_CHUNK: usize = 4096;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    pub method: String,
    /// Request target with any query string removed
    pub path: String,
    pub query: Option<String>,
    pub version: String,
    /// Header names are stored lowercase
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

struct Head {
    method: String,
    path: String,
    query: Option<String>,
    version: String,
    headers: HashMap<String, String>,
}

impl Head {
    fn content_length(&self) -> Result<usize> {
        let Some(value) = self.headers.get("content-length") else {
            return Ok(0);
        };
        let len: usize = value
            .parse()
            .map_err(|_| RequestError::InvalidContentLength(value.clone()))?;
        if len > MAX_BODY_SIZE {
            return Err(RequestError::TooLarge {
                actual: len,
                max: MAX_BODY_SIZE,
            });
        }
        Ok(len)
    }

    fn into_request(self, body: Vec<u8>) -> Request {
        Request {
            method: self.method,
            path: self.path,
            query: self.query,
            version: self.version,
            headers: self.headers,
            body,
        }
    }
}

/// Parse a complete request held in memory.
///
/// Without a `Content-Length` header everything after the blank line is
/// taken as the body.
pub fn parse_request(buf: &[u8]) -> Result<Request> {
    let (head_len, separator_len) = find_head_end(buf).ok_or(RequestError::Incomplete)?;
    let head = parse_head(&buf[..head_len])?;
    let rest = &buf[head_len + separator_len..];

    let body = if head.headers.contains_key("content-length") {
        let len = head.content_length()?;
        rest.get(..len).ok_or(RequestError::Incomplete)?.to_vec()
    } else {
        rest.to_vec()
    };
    Ok(head.into_request(body))
}

/// Read exactly one request from a stream.
pub async fn read_request<R>(reader: &mut R) -> Result<Request>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    let (head_len, separator_len) = loop {
        if let Some(end) = find_head_end(&buf) {
            break end;
        }
        if buf.len() > MAX_HEAD_SIZE {
            return Err(RequestError::TooLarge {
                actual: buf.len(),
                max: MAX_HEAD_SIZE,
            });
        }
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(RequestError::ConnectionClosed);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = parse_head(&buf[..head_len])?;
    let len = head.content_length()?;

    let mut body = buf.split_off(head_len + separator_len);
    while body.len() < len {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(RequestError::ConnectionClosed);
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(len);

    Ok(head.into_request(body))
}

/// Offset and length of the head terminator: a line break, an optional
/// `\r`, then `\n`. Covers `\r\n\r\n`, bare `\n\n` and mixtures of the two.
fn find_head_end(buf: &[u8]) -> Option<(usize, usize)> {
    buf.iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'\n')
        .find_map(|(idx, _)| {
            let gap = match &buf[idx + 1..] {
                [b'\n', ..] => 1,
                [b'\r', b'\n', ..] => 2,
                _ => return None,
            };
            let start = if idx > 0 && buf[idx - 1] == b'\r' {
                idx - 1
            } else {
                idx
            };
            Some((start, idx + 1 + gap - start))
        })
}

fn parse_head(bytes: &[u8]) -> Result<Head> {
    let text = std::str::from_utf8(bytes).map_err(|_| RequestError::InvalidEncoding)?;
    // Stray line breaks before the request line are ignored.
    let mut lines = text.trim_start_matches(['\r', '\n']).lines();

    let start = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(RequestError::MissingStartLine)?;
    let (method, target, version) = parse_start_line(start)?;
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    };

    let mut headers: HashMap<String, String> = HashMap::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| RequestError::MalformedHeader(line.to_string()))?;
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(RequestError::MalformedHeader(line.to_string()));
        }
        let value = value.trim();
        headers
            .entry(name)
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    Ok(Head {
        method: method.to_string(),
        path,
        query,
        version: version.to_string(),
        headers,
    })
}

fn parse_start_line(line: &str) -> Result<(&str, &str, &str)> {
    let malformed = || RequestError::MalformedStartLine(line.to_string());

    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    if !method.bytes().all(|b| b.is_ascii_uppercase())
        || !target.starts_with('/')
        || !version.starts_with("HTTP/")
    {
        return Err(malformed());
    }
    Ok((method, target, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn parse_get_without_body() {
        let req = parse_request(b"GET /join HTTP/1.1\r\nPlayer-ID: P1\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/join");
        assert_eq!(req.version, "HTTP/1.1");
        assert_eq!(req.header("player-id"), Some("P1"));
        assert_eq!(req.header("PLAYER-ID"), Some("P1"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn parse_post_with_body() {
        let raw = b"POST /submit_thumbs HTTP/1.1\r\nContent-Length: 12\r\n\r\n{\"thumbs\":1}trailing";
        let req = parse_request(raw).unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.body, b"{\"thumbs\":1}");
    }

    #[test]
    fn header_whitespace_is_tolerated() {
        let req = parse_request(b"GET /game_state HTTP/1.1\r\nPlayer-ID:P1\r\n  Accept  :   */*  \r\n\r\n")
            .unwrap();
        assert_eq!(req.header("Player-ID"), Some("P1"));
        assert_eq!(req.header("accept"), Some("*/*"));
    }

    #[test]
    fn repeated_headers_are_joined() {
        let req = parse_request(b"GET / HTTP/1.1\r\nX-A: 1\r\nx-a: 2\r\n\r\n").unwrap();
        assert_eq!(req.header("x-a"), Some("1, 2"));
    }

    #[test]
    fn bare_line_feeds_are_accepted() {
        let req = parse_request(b"GET /join HTTP/1.0\nPlayer-ID: P2\n\n").unwrap();
        assert_eq!(req.path, "/join");
        assert_eq!(req.header("player-id"), Some("P2"));
    }

    #[test]
    fn mixed_line_endings_end_the_head() {
        let req = parse_request(b"GET /join HTTP/1.1\r\nPlayer-ID: P1\n\r\n").unwrap();
        assert_eq!(req.header("player-id"), Some("P1"));

        let req = parse_request(b"POST /submit_thumbs HTTP/1.1\nContent-Length: 2\r\n\n{}").unwrap();
        assert_eq!(req.body, b"{}");

        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n\r\n"), Some((14, 4)));
        assert_eq!(find_head_end(b"GET / HTTP/1.1\n\r\n"), Some((14, 3)));
        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n\r"), None);
    }

    #[tokio::test]
    async fn read_request_stops_at_mixed_terminator() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client
            .write_all(b"GET /game_state HTTP/1.1\nPlayer-ID: P2\n\r\n")
            .await
            .unwrap();

        // The client half stays open; the head alone must complete the read.
        let req = read_request(&mut server).await.unwrap();
        assert_eq!(req.path, "/game_state");
        assert_eq!(req.header("player-id"), Some("P2"));
    }

    #[test]
    fn query_string_is_split_off() {
        let req = parse_request(b"GET /game_state?verbose=1 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.path, "/game_state");
        assert_eq!(req.query.as_deref(), Some("verbose=1"));
    }

    #[test]
    fn missing_start_line() {
        assert!(matches!(
            parse_request(b"\r\n\r\n"),
            Err(RequestError::MissingStartLine)
        ));
    }

    #[test]
    fn malformed_start_lines() {
        for raw in [
            &b"GARBAGE\r\n\r\n"[..],
            b"GET /join\r\n\r\n",
            b"get /join HTTP/1.1\r\n\r\n",
            b"GET join HTTP/1.1\r\n\r\n",
            b"GET /join FTP/1.0\r\n\r\n",
            b"GET /join HTTP/1.1 extra\r\n\r\n",
        ] {
            assert!(
                matches!(parse_request(raw), Err(RequestError::MalformedStartLine(_))),
                "{:?}",
                String::from_utf8_lossy(raw)
            );
        }
    }

    #[test]
    fn header_without_colon() {
        assert!(matches!(
            parse_request(b"GET / HTTP/1.1\r\nPlayer-ID P1\r\n\r\n"),
            Err(RequestError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_request(b"GET / HTTP/1.1\r\n: P1\r\n\r\n"),
            Err(RequestError::MalformedHeader(_))
        ));
    }

    #[test]
    fn bad_content_length() {
        assert!(matches!(
            parse_request(b"POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n"),
            Err(RequestError::InvalidContentLength(_))
        ));
        assert!(matches!(
            parse_request(b"POST / HTTP/1.1\r\nContent-Length: 99999999\r\n\r\n"),
            Err(RequestError::TooLarge { .. })
        ));
    }

    #[test]
    fn incomplete_requests() {
        assert!(matches!(
            parse_request(b"GET /join HTTP/1.1\r\nPlayer-ID: P1\r\n"),
            Err(RequestError::Incomplete)
        ));
        assert!(matches!(
            parse_request(b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\n{}"),
            Err(RequestError::Incomplete)
        ));
    }

    #[tokio::test]
    async fn read_request_across_chunks() {
        let (mut client, mut server) = tokio::io::duplex(16);
        tokio::spawn(async move {
            for piece in [
                &b"POST /submit_bet HT"[..],
                b"TP/1.1\r\nContent-Len",
                b"gth: 24\r\nPlayer-ID: P1\r\n\r",
                b"\n{\"bet\":2,",
                b"\"own_thumbs\":1}",
            ] {
                client.write_all(piece).await.unwrap();
            }
        });

        let req = read_request(&mut server).await.unwrap();
        assert_eq!(req.path, "/submit_bet");
        assert_eq!(req.header("player-id"), Some("P1"));
        assert_eq!(req.body, br#"{"bet":2,"own_thumbs":1}"#);
    }

    #[tokio::test]
    async fn read_request_closed_early() {
        let mut raw: &[u8] = b"GET /join HTTP/1.1\r\n";
        assert!(matches!(
            read_request(&mut raw).await,
            Err(RequestError::ConnectionClosed)
        ));

        let mut raw: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nab";
        assert!(matches!(
            read_request(&mut raw).await,
            Err(RequestError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn read_request_rejects_oversized_head() {
        let mut raw = b"GET / HTTP/1.1\r\nX-Pad: ".to_vec();
        raw.extend(std::iter::repeat_n(b'a', MAX_HEAD_SIZE + 10));
        let mut reader: &[u8] = &raw;
        assert!(matches!(
            read_request(&mut reader).await,
            Err(RequestError::TooLarge { .. })
        ));
    }
}
