use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

/// Content type used when the extension is not in the table
pub const FALLBACK: &str = "binary/octet-stream";

static CONTENT_TYPES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// The extension → content-type table, built once per process
fn content_type_map() -> &'static HashMap<&'static str, &'static str> {
    CONTENT_TYPES.get_or_init(|| {
        let mut map = HashMap::new();

        // Text types
        map.insert("html", "text/html");
        map.insert("htm", "text/html");
        map.insert("css", "text/css");
        map.insert("js", "text/javascript");
        map.insert("txt", "text/plain");
        map.insert("md", "text/markdown");
        map.insert("csv", "text/csv");

        // Application types
        map.insert("json", "application/json");
        map.insert("xml", "application/xml");
        map.insert("pdf", "application/pdf");
        map.insert("zip", "application/zip");
        map.insert("gz", "application/gzip");
        map.insert("wasm", "application/wasm");

        // Image types
        map.insert("png", "image/png");
        map.insert("jpg", "image/jpeg");
        map.insert("jpeg", "image/jpeg");
        map.insert("gif", "image/gif");
        map.insert("svg", "image/svg+xml");
        map.insert("webp", "image/webp");
        map.insert("ico", "image/x-icon");

        // Font types
        map.insert("ttf", "font/ttf");
        map.insert("otf", "font/otf");
        map.insert("woff", "font/woff");
        map.insert("woff2", "font/woff2");

        map
    })
}

/// Resolve the content type for a file based on its extension
pub fn resolve(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    content_type_map().get(ext).copied().unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_known_extensions() {
        assert_eq!(resolve(&PathBuf::from("index.html")), "text/html");
        assert_eq!(resolve(&PathBuf::from("notes.txt")), "text/plain");
        assert_eq!(resolve(&PathBuf::from("logo.png")), "image/png");
        assert_eq!(resolve(&PathBuf::from("dir/app.wasm")), "application/wasm");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(resolve(&PathBuf::from("data.blob")), FALLBACK);
        assert_eq!(resolve(&PathBuf::from("no-extension")), FALLBACK);
    }
}
