// Copyright 2025 The echofetch Authors
// SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

use reqwest::{Method, StatusCode, header::HeaderMap};
use url::Url;

use super::error::TransportError;

/// A fully resolved outgoing request.
///
/// Built fresh by the executor for every call. Parameters have already been
/// encoded into either the URL query or the body, so observers see exactly
/// what goes on the wire.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    /// The body as text, for diagnostics.
    pub fn body_text(&self) -> Option<String> {
        self.body.as_deref().map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

/// A successful (2xx) response with its body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Time from sending the request until the body was read.
    pub elapsed: Duration,
}

/// Outcome of exactly one network call.
pub type ResponseEnvelope = Result<RawResponse, TransportError>;
