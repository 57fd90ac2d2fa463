//! Client for an httpbin-style echo service.
//!
//! The service reflects whatever it receives: query parameters come back
//! under `args`, a JSON body under `json`. [`EchoClient`] is a thin typed
//! layer over [`crate::http::Executor`] for its `/get` and `/post` endpoints.

mod client;
mod types;

pub use client::EchoClient;
pub use types::{EchoArgs, EchoJson, EchoResponse, SampleRequest};
