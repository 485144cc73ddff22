use crate::error::{ServerError, ServerResult};
use crate::handler::{Handler, Outcome};
use crate::http::{Body, Response, Status};
use crate::parser::RequestParser;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::{self, Read, Write};

/// Orchestrates one request/response cycle: parse the request, invoke the
/// handler, negotiate the encoding, serialize the response, and emit one
/// access-log record.
///
/// Expected failures never escape `run`: a parse failure becomes a 400 and a
/// handler fault becomes a 500 with the fault logged to the error sink. Only
/// write failures on the output stream itself propagate.
pub struct Dispatcher<H> {
    handler: H,
    access_log: Box<dyn Write + Send>,
    error_log: Box<dyn Write + Send>,
}

impl<H: Handler> Dispatcher<H> {
    /// Create a dispatcher logging to stdout and stderr
    pub fn new(handler: H) -> Self {
        Self::with_logs(handler, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Create a dispatcher with caller-owned access and error sinks
    pub fn with_logs(
        handler: H,
        access_log: Box<dyn Write + Send>,
        error_log: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            handler,
            access_log,
            error_log,
        }
    }

    /// Process exactly one request from `input` and write the complete
    /// response to `output`.
    pub fn run<R: Read, W: Write>(&mut self, input: R, mut output: W) -> ServerResult<()> {
        let mut method = "-".to_string();
        let mut path = "-".to_string();
        let mut request_headers = HashMap::new();

        let mut parser = RequestParser::new(input);
        let mut response = match parser.read_request(&mut *self.error_log) {
            Ok(request) => {
                method = request.method;
                path = request.path;
                request_headers = request.headers;

                // Methods are lowercased only at this boundary; header
                // lookups stay case-sensitive as transmitted.
                match self.handler.handle(&method.to_ascii_lowercase(), &path) {
                    Ok(Outcome::Resource(resource)) => {
                        let mut response = Response::new(Status::Ok);
                        for (name, value) in resource.headers() {
                            response.set_header(&name, &value);
                        }
                        response.body = Some(Body::Stream(resource.content));
                        response
                    }
                    Ok(Outcome::NotFound) => Response::new(Status::NotFound),
                    Ok(Outcome::MethodNotAllowed) => Response::new(Status::MethodNotAllowed),
                    Err(e) => {
                        self.log_error(&e);
                        Self::internal_error_response()
                    }
                }
            }
            Err(_) => Response::new(Status::BadRequest),
        };

        // Materialize the body before negotiation. A read fault here is a
        // handler fault like any other; the backing file is dropped (and
        // closed) either way.
        let mut data = match response.body.take() {
            None => None,
            Some(Body::Bytes(bytes)) => Some(bytes),
            Some(Body::Stream(mut reader)) => {
                let mut bytes = Vec::new();
                match reader.read_to_end(&mut bytes) {
                    Ok(_) => Some(bytes),
                    Err(e) => {
                        self.log_error(&ServerError::Io(e));
                        response = Self::internal_error_response();
                        match response.body.take() {
                            Some(Body::Bytes(bytes)) => Some(bytes),
                            _ => None,
                        }
                    }
                }
            }
        };

        // Permissive negotiation: substring presence, not quality-value
        // parsing, so "gzipno" matches too.
        let is_text = response
            .get_header("Content-Type")
            .map_or(false, |ct| ct.starts_with("text/"));
        let accepts_gzip = request_headers
            .get("Accept-Encoding")
            .map_or(false, |v| v.contains("gzip"));

        if is_text && accepts_gzip {
            if let Some(bytes) = data.take() {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&bytes)?;
                let compressed = encoder.finish()?;
                response.set_header("Content-Encoding", "gzip");
                response.set_header("Content-Length", &compressed.len().to_string());
                data = Some(compressed);
            }
        }

        write!(
            output,
            "HTTP/1.0 {} {}\r\n",
            response.status.code(),
            response.status.as_str()
        )?;
        for (name, value) in &response.headers {
            write!(output, "{}: {}\r\n", name, value)?;
        }
        write!(output, "\r\n")?;
        if let Some(bytes) = &data {
            output.write_all(bytes)?;
        }
        output.flush()?;

        log::info!("{} {} {}", method, path, response.status.code());
        writeln!(
            self.access_log,
            "{} {} {}",
            method,
            path,
            response.status.code()
        )?;

        Ok(())
    }

    fn internal_error_response() -> Response {
        let mut response = Response::new(Status::InternalServerError);
        response.set_header("Content-Type", "text/plain");
        response.set_body(Status::InternalServerError.as_str().as_bytes());
        response
    }

    fn log_error(&mut self, e: &ServerError) {
        log::error!("handler error: {}", e);
        let _ = writeln!(self.error_log, "Error: {}", e);
    }
}
