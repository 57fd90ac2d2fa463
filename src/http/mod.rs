//! Typed HTTP request pipeline.
//!
//! This module turns "call this path with these parameters and give me back a
//! `T`" into a single async call, on top of [`reqwest`].
//!
//! # Architecture
//!
//! - [`Session`] - owns the configured `reqwest::Client`, the base URL and the
//!   registered [`Observer`]s; performs exactly one network call per
//!   [`RequestDescriptor`] and reports the outcome as a [`ResponseEnvelope`]
//! - [`Executor`] - encodes parameters (query string for read methods, JSON
//!   body for write methods), delegates to the session and decodes the body
//!   into the caller's type
//! - [`KeyDecodingStrategy`] - rewrites `snake_case` response keys to
//!   `camelCase` before deserialization
//! - [`LoggingObserver`] - writes request and response details to the log
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use echofetch::http::{Executor, LoggingObserver, Session};
//! use reqwest::Method;
//! use serde::{Deserialize, Serialize};
//! use url::Url;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Search {
//!     search_term: String,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Echo {
//!     args: serde_json::Value,
//! }
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let session = Session::builder(Url::parse("https://httpbin.org")?)
//!     .observer(LoggingObserver)
//!     .build()?;
//! let executor = Executor::new(Arc::new(session));
//!
//! let params = Search { search_term: "rust".into() };
//! let echo: Echo = executor.send_typed("/get", Method::GET, &params).await?;
//! println!("{echo:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! [`RequestError`] separates the three ways a call can fail:
//!
//! - [`EncodeError`] - the request could not be built, nothing was sent
//! - [`TransportError`] - connection, timeout, TLS or non-2xx status
//! - [`DecodeError`] - the response body did not match the requested type
//!
//! Failures inside observers never reach the caller; they are logged and
//! the request continues.

mod error;
mod executor;
mod keys;
mod observer;
mod session;
mod types;

pub use error::{DecodeError, EncodeError, RequestError, TransportError};
pub use executor::{Executor, ParameterEncoding, decode_response, encode_request};
pub use keys::{KeyDecodingStrategy, convert_from_snake_case};
pub use observer::{LoggingObserver, Observer};
pub(crate) use session::default_user_agent;
pub use session::{Session, SessionBuilder};
pub use types::{RawResponse, RequestDescriptor, ResponseEnvelope};
