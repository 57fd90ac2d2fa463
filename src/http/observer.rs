//! Passive hooks on the request lifecycle.
//!
//! Observers are registered once when a [`Session`](super::Session) is built
//! and are called synchronously around every network call. They exist for
//! diagnostics only: whatever an observer does, including returning an error
//! or panicking, the request carries on and its result reaches the caller
//! unchanged.

use log::{debug, info, warn};
use reqwest::header::HeaderMap;

use super::types::{RequestDescriptor, ResponseEnvelope};
use crate::log::mask_header;

/// Maximum number of body bytes echoed into the debug log.
const BODY_PREVIEW_BYTES: usize = 512;

/// Lifecycle hooks for a [`Session`](super::Session).
///
/// Both methods have no-op defaults, so an observer only implements the
/// events it cares about.
pub trait Observer: Send + Sync {
    /// Called before the request is sent, with the fully resolved URL,
    /// headers and body.
    fn on_request_start(&self, _request: &RequestDescriptor) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once the response body has been read, or the call has failed.
    fn on_response_received(&self, _request: &RequestDescriptor, _envelope: &ResponseEnvelope) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writes every request and response to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn on_request_start(&self, request: &RequestDescriptor) -> anyhow::Result<()> {
        info!(
            method:% = request.method,
            url:% = request.url,
            headers = &*format_headers(&request.headers);
            "HTTP: Request started"
        );
        let body = request.body_text().unwrap_or_else(|| "None".to_string());
        info!(
            url:% = request.url,
            body = &*body;
            "HTTP: Request body"
        );
        Ok(())
    }

    fn on_response_received(&self, request: &RequestDescriptor, envelope: &ResponseEnvelope) -> anyhow::Result<()> {
        match envelope {
            Ok(response) => {
                info!(
                    url:% = request.url,
                    status = response.status.as_u16(),
                    elapsed_ms = response.elapsed.as_millis() as u64,
                    bytes = response.body.len(),
                    headers = &*format_headers(&response.headers);
                    "HTTP: Response received"
                );
                let preview_len = response.body.len().min(BODY_PREVIEW_BYTES);
                debug!(
                    body = &*String::from_utf8_lossy(&response.body[..preview_len]);
                    "HTTP: Response body"
                );
            },
            Err(e) => {
                warn!(
                    method:% = request.method,
                    url:% = request.url,
                    error:% = e;
                    "HTTP: Request failed"
                );
            },
        }
        Ok(())
    }
}

/// Renders headers as `name: value` pairs, masking credentials.
fn format_headers(headers: &HeaderMap) -> String {
    if headers.is_empty() {
        return "None".to_string();
    }

    headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes());
            format!("{}: {}", name, mask_header(name.as_str(), &value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};

    use super::*;

    #[test]
    fn format_headers_lists_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert_eq!(format_headers(&headers), "content-type: application/json");
    }

    #[test]
    fn format_headers_masks_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret-token"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let rendered = format_headers(&headers);

        let expected = format!(
            "authorization: {}, content-type: text/plain",
            mask_header("authorization", "Bearer secret-token")
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn format_headers_empty() {
        assert_eq!(format_headers(&HeaderMap::new()), "None");
    }
}
