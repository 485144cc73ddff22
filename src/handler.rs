use crate::error::ServerResult;
use crate::mime;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A resource successfully resolved for a GET: its descriptive metadata plus
/// the still-unread byte stream. The stream is owned by the single
/// request/response cycle that produced it and must be fully drained there.
pub struct Resource {
    pub content_type: String,
    pub len: u64,
    pub modified: SystemTime,
    pub content: Box<dyn Read + Send>,
}

impl Resource {
    /// Descriptive headers for this resource, in wire order
    pub fn headers(&self) -> [(String, String); 3] {
        [
            ("Content-Type".to_string(), self.content_type.clone()),
            ("Content-Length".to_string(), self.len.to_string()),
            (
                "Last-Modified".to_string(),
                httpdate::fmt_http_date(self.modified),
            ),
        ]
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("content_type", &self.content_type)
            .field("len", &self.len)
            .field("modified", &self.modified)
            .field("content", &"<reader>")
            .finish()
    }
}

/// The three-way result of resolving a request. Expected failures are
/// ordinary variants so the dispatcher can match exhaustively; only
/// unexpected I/O faults travel through `Err`.
#[derive(Debug)]
pub enum Outcome {
    Resource(Resource),
    NotFound,
    MethodNotAllowed,
}

/// A resource handler: resolves a lowercased method and a raw URL path into
/// an outcome.
pub trait Handler {
    fn handle(&self, method: &str, path: &str) -> ServerResult<Outcome>;
}

/// Serves files from a fixed root directory.
///
/// Paths containing a literal `..` segment are rejected before touching the
/// filesystem; directories resolve through their index file or not at all.
#[derive(Debug, Clone)]
pub struct FileHandler {
    root: PathBuf,
    index_file: String,
}

impl FileHandler {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            index_file: "index.html".to_string(),
        }
    }

    /// Set the file served for directory requests
    pub fn with_index_file(mut self, name: &str) -> Self {
        self.index_file = name.to_string();
        self
    }
}

impl Handler for FileHandler {
    fn handle(&self, method: &str, path: &str) -> ServerResult<Outcome> {
        if !method.eq_ignore_ascii_case("get") {
            return Ok(Outcome::MethodNotAllowed);
        }

        // Sole traversal defense: any ".." segment anywhere in the path
        if path.split('/').any(|segment| segment == "..") {
            return Ok(Outcome::NotFound);
        }

        let mut location = self.root.join(path);
        if !location.exists() {
            return Ok(Outcome::NotFound);
        }

        if location.is_dir() {
            location = location.join(&self.index_file);
            if !location.is_file() {
                return Ok(Outcome::NotFound);
            }
        }

        let file = File::open(&location)?;
        let meta = file.metadata()?;

        Ok(Outcome::Resource(Resource {
            content_type: mime::resolve(&location).to_string(),
            len: meta.len(),
            modified: meta.modified()?,
            content: Box::new(file),
        }))
    }
}
