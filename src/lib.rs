pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod http;
pub mod mime;
pub mod parser;

/// Re-exports of common components for easier access
pub use config::ServerConfig;
pub use dispatcher::Dispatcher;
pub use error::{ServerError, ServerResult};
pub use handler::{FileHandler, Handler, Outcome, Resource};
pub use http::{Body, Request, Response, Status};
pub use parser::RequestParser;
