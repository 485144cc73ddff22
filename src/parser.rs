use crate::error::{ServerError, ServerResult};
use crate::http::Request;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};

/// Reads exactly one HTTP/1.0-compatible request from a byte stream.
///
/// Lines are CRLF-terminated; a line ending in a bare `\n` never matches the
/// request-line or header grammar. The parser never propagates I/O errors:
/// they are logged to the error sink and reported as a parse failure, which
/// the dispatcher turns into a 400.
pub struct RequestParser<R> {
    reader: BufReader<R>,
}

impl<R: Read> RequestParser<R> {
    pub fn new(stream: R) -> Self {
        Self {
            reader: BufReader::new(stream),
        }
    }

    /// Consume one request from the stream.
    ///
    /// Malformed header lines are logged to the error sink and skipped; the
    /// parse continues until the blank line. Reaching end-of-stream before
    /// the blank line is a parse failure even when the request line was
    /// valid.
    pub fn read_request(&mut self, error_log: &mut dyn Write) -> ServerResult<Request> {
        let line = self.read_line(error_log)?;
        let line =
            line.ok_or_else(|| ServerError::HttpParse("empty request stream".to_string()))?;
        let (method, path) = parse_request_line(&line)
            .ok_or_else(|| ServerError::HttpParse("invalid request line".to_string()))?;

        let mut headers = HashMap::new();
        loop {
            let line = self.read_line(error_log)?.ok_or_else(|| {
                ServerError::HttpParse("end of stream before end of headers".to_string())
            })?;
            if line == b"\r\n" {
                break;
            }
            match parse_header_line(&line) {
                Some((name, value)) => {
                    // Duplicates are last-one-wins
                    headers.insert(name, value);
                }
                None => {
                    let shown = String::from_utf8_lossy(&line);
                    log::warn!("malformed header: {:?}", shown);
                    let _ = writeln!(error_log, "malformed header: {:?}", shown);
                }
            }
        }

        Ok(Request {
            method,
            path,
            headers,
        })
    }

    /// Read up to and including the next `\n`; `None` means end-of-stream.
    fn read_line(&mut self, error_log: &mut dyn Write) -> ServerResult<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf)),
            Err(e) => {
                let _ = writeln!(error_log, "Error: {}", e);
                Err(ServerError::Io(e))
            }
        }
    }
}

/// Match `METHOD SP "/" PATH SP "HTTP/1." ("0"|"1") CRLF`, returning the
/// method verbatim and the path with its leading slash stripped.
fn parse_request_line(line: &[u8]) -> Option<(String, String)> {
    let line = std::str::from_utf8(line).ok()?;
    let line = line.strip_suffix("\r\n")?;

    let mut parts = line.split(' ');
    let method = parts.next()?;
    let target = parts.next()?;
    let version = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let path = target.strip_prefix('/')?;
    if version != "HTTP/1.0" && version != "HTTP/1.1" {
        return None;
    }

    Some((method.to_string(), path.to_string()))
}

/// Match `NAME ":" SP VALUE CRLF`: name is one or more non-whitespace
/// characters, a single space follows the colon, and the value starts with a
/// non-whitespace character.
fn parse_header_line(line: &[u8]) -> Option<(String, String)> {
    let line = std::str::from_utf8(line).ok()?;
    let line = line.strip_suffix("\r\n")?;

    let colon = line.find(':')?;
    let name = &line[..colon];
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }

    let value = line[colon + 1..].strip_prefix(' ')?;
    if value.chars().next().map_or(true, char::is_whitespace) {
        return None;
    }

    Some((name.to_string(), value.to_string()))
}
