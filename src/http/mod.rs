//! HTTP server lifecycle.
//!
//! Serves plain HTTP; TLS is expected to be terminated in front of the process.
//! The server drains in-flight requests on SIGTERM/SIGINT before exiting.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
