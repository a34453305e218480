#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod emitter;
pub mod error;
pub mod gate;
pub mod relay;
pub mod server;
pub mod state;

pub use error::HttpError;
pub use server::{create_router, serve};
pub use state::{AppState, RelayState};
