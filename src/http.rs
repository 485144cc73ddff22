use std::collections::HashMap;
use std::fmt;
use std::io::Read;

/// HTTP status codes produced by this server. The set is closed: every
/// response carries one of these five codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    InternalServerError = 500,
}

impl Status {
    /// Get the reason phrase for this status code
    pub fn as_str(&self) -> &'static str {
        match *self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::InternalServerError => "Internal Server Error",
        }
    }

    /// Get the numeric code
    pub fn code(&self) -> u16 {
        *self as u16
    }
}

/// A parsed HTTP request.
///
/// The method is kept verbatim as it appeared on the wire (uppercase per the
/// request-line grammar); lowercasing happens at the dispatcher/handler
/// boundary. The path is the raw URL path after the leading slash, not
/// decoded. Header names are case-sensitive as transmitted; duplicate
/// headers are last-one-wins.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            headers: HashMap::new(),
        }
    }

    /// Look up a header by its exact name as transmitted
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }
}

/// A response body: either bytes already in memory or a byte stream still to
/// be drained (a file handle for successful GETs).
pub enum Body {
    Bytes(Vec<u8>),
    Stream(Box<dyn Read + Send>),
}

// Custom Debug implementation since a boxed reader can't be derived
impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Body::Stream(_) => f.debug_tuple("Stream").field(&"<reader>").finish(),
        }
    }
}

/// HTTP response
///
/// Headers are kept as an insertion-ordered list because they are written to
/// the wire in the order supplied. An absent body writes nothing after the
/// blank line, which is observably identical to an empty one.
#[derive(Debug)]
pub struct Response {
    pub status: Status,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl Response {
    /// Create a new response with no headers and no body
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set a header, replacing an existing one in place to keep its position
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.headers.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    /// Get a header value by exact name
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an in-memory body
    pub fn set_body(&mut self, body: &[u8]) {
        self.body = Some(Body::Bytes(body.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_and_reasons() {
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::Ok.as_str(), "OK");
        assert_eq!(Status::BadRequest.code(), 400);
        assert_eq!(Status::NotFound.as_str(), "Not Found");
        assert_eq!(Status::MethodNotAllowed.code(), 405);
        assert_eq!(Status::InternalServerError.as_str(), "Internal Server Error");
    }

    #[test]
    fn test_response_header_order_preserved() {
        let mut response = Response::new(Status::Ok);
        response.set_header("Content-Type", "text/plain");
        response.set_header("Content-Length", "10");
        response.set_header("Last-Modified", "then");

        // Overwriting keeps the original position
        response.set_header("Content-Length", "4");

        let names: Vec<&str> = response.headers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Content-Type", "Content-Length", "Last-Modified"]);
        assert_eq!(response.get_header("Content-Length").unwrap(), "4");
    }

    #[test]
    fn test_request_headers_case_sensitive() {
        let mut request = Request::new("GET", "index.html");
        request.set_header("Accept-Encoding", "gzip");

        assert_eq!(request.get_header("Accept-Encoding").unwrap(), "gzip");
        assert!(request.get_header("accept-encoding").is_none());
    }
}
