//! Command-line front end for the chatrelay server.
//!
//! The binary in `main.rs` is the composition root: it loads `.env`, parses
//! [`Cli`], sets up tracing and runs [`chatrelay_proxy::serve`].

pub mod parser;

pub use parser::{Cli, DEFAULT_HOST, DEFAULT_PORT};
