// Copyright 2025 The echofetch Authors
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::{Duration, Instant},
};

use log::{trace, warn};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use super::{
    error::TransportError,
    observer::Observer,
    types::{RawResponse, RequestDescriptor, ResponseEnvelope},
};
use crate::config::ClientConfig;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Owns the configured HTTP client and the observers notified around every
/// request.
///
/// A `Session` is built once and shared (usually behind an [`Arc`]) by every
/// caller. It is `Send + Sync`; concurrent calls to [`execute`](Self::execute)
/// do not wait on each other.
pub struct Session {
    base_url: Url,
    client: reqwest::Client,
    default_headers: HeaderMap,
    observers: Vec<Arc<dyn Observer>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    /// Starts building a session that resolves relative paths against
    /// `base_url`.
    pub fn builder(base_url: Url) -> SessionBuilder {
        SessionBuilder::new(base_url)
    }

    /// A session with default timeout and user agent and no observers.
    pub fn new(base_url: Url) -> Result<Self, anyhow::Error> {
        Self::builder(base_url).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request unless the descriptor overrides them.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Performs the network call described by `descriptor`.
    ///
    /// Every failure, including a non-2xx status, comes back as the `Err`
    /// side of the envelope. Observers are notified before the request is
    /// sent and after the envelope is complete, and see the descriptor with
    /// the session's default headers merged in.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> ResponseEnvelope {
        let resolved = self.resolve(descriptor);
        self.notify("request_start", |observer| observer.on_request_start(&resolved));

        let envelope = self.send(&resolved).await;

        self.notify("response_received", |observer| {
            observer.on_response_received(&resolved, &envelope)
        });
        envelope
    }

    fn resolve(&self, descriptor: &RequestDescriptor) -> RequestDescriptor {
        let mut headers = self.default_headers.clone();
        // descriptor headers replace defaults of the same name
        headers.extend(descriptor.headers.clone());
        RequestDescriptor {
            headers,
            ..descriptor.clone()
        }
    }

    async fn send(&self, descriptor: &RequestDescriptor) -> ResponseEnvelope {
        let start = Instant::now();

        let mut req = self
            .client
            .request(descriptor.method.clone(), descriptor.url.clone())
            .headers(descriptor.headers.clone());
        if let Some(body) = &descriptor.body {
            req = req.body(body.clone());
        }

        let resp = req.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();

        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".into());
            return Err(TransportError::Status { status, body });
        }

        let body = resp.bytes().await?.to_vec();
        let elapsed = start.elapsed();
        trace!(
            url:% = descriptor.url,
            elapsed_ms = elapsed.as_millis() as u64;
            "HTTP: Round trip complete"
        );

        Ok(RawResponse {
            status,
            headers,
            body,
            elapsed,
        })
    }

    /// Runs `event` against every observer, swallowing failures.
    fn notify<F>(&self, event: &'static str, call: F)
    where F: Fn(&dyn Observer) -> anyhow::Result<()> {
        for observer in &self.observers {
            match panic::catch_unwind(AssertUnwindSafe(|| call(observer.as_ref()))) {
                Ok(Ok(())) => {},
                Ok(Err(e)) => {
                    warn!(
                        event = event,
                        error:% = e;
                        "Observer failed, continuing request"
                    );
                },
                Err(payload) => {
                    warn!(
                        event = event,
                        panic = panic_message(payload.as_ref());
                        "Observer panicked, continuing request"
                    );
                },
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

/// Builder for [`Session`]. Observers can only be added here; the list is
/// fixed once the session is built.
pub struct SessionBuilder {
    base_url: Url,
    timeout: Duration,
    user_agent: String,
    observers: Vec<Arc<dyn Observer>>,
}

impl SessionBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            observers: Vec::new(),
        }
    }

    /// Seeds a builder from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self::new(base_url)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Registers an observer. Observers are called in registration order.
    pub fn observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Registers an observer that the caller keeps a handle to.
    pub fn shared_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<Session, anyhow::Error> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        default_headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(default_headers.clone())
            .build()?;

        Ok(Session {
            base_url: self.base_url,
            client,
            default_headers,
            observers: self.observers,
        })
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reqwest::{Method, StatusCode};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
        headers: Mutex<Vec<HeaderMap>>,
    }

    impl Observer for Recorder {
        fn on_request_start(&self, request: &RequestDescriptor) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(format!("start {}", request.url.path()));
            self.headers.lock().unwrap().push(request.headers.clone());
            Ok(())
        }

        fn on_response_received(
            &self,
            _request: &RequestDescriptor,
            envelope: &ResponseEnvelope,
        ) -> anyhow::Result<()> {
            let tag = match envelope {
                Ok(resp) => format!("ok {}", resp.status.as_u16()),
                Err(e) => format!("err {:?}", e.status().map(|s| s.as_u16())),
            };
            self.events.lock().unwrap().push(tag);
            Ok(())
        }
    }

    fn descriptor(url: Url) -> RequestDescriptor {
        RequestDescriptor {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn execute_returns_body_and_notifies_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let recorder = Arc::new(Recorder::default());
        let base = Url::parse(&server.uri()).unwrap();
        let session = Session::builder(base.clone())
            .shared_observer(recorder.clone())
            .build()
            .unwrap();

        let envelope = session.execute(&descriptor(base.join("/ping").unwrap())).await;

        let resp = envelope.unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, b"pong");
        assert_eq!(*recorder.events.lock().unwrap(), vec!["start /ping", "ok 200"]);
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let recorder = Arc::new(Recorder::default());
        let base = Url::parse(&server.uri()).unwrap();
        let session = Session::builder(base.clone())
            .shared_observer(recorder.clone())
            .build()
            .unwrap();

        let err = session.execute(&descriptor(base)).await.unwrap_err();

        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "maintenance");
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(recorder.events.lock().unwrap()[1], "err Some(503)");
    }

    #[tokio::test]
    async fn panicking_observer_does_not_stop_later_observers() {
        struct Exploding;
        impl Observer for Exploding {
            fn on_request_start(&self, _request: &RequestDescriptor) -> anyhow::Result<()> {
                panic!("boom");
            }
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let recorder = Arc::new(Recorder::default());
        let base = Url::parse(&server.uri()).unwrap();
        let session = Session::builder(base.clone())
            .observer(Exploding)
            .shared_observer(recorder.clone())
            .build()
            .unwrap();

        let resp = session.execute(&descriptor(base)).await.unwrap();

        assert_eq!(resp.status, StatusCode::NO_CONTENT);
        assert_eq!(recorder.events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn observers_see_session_default_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "tester/2.0"))
            .and(header("x-trace", "abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let recorder = Arc::new(Recorder::default());
        let base = Url::parse(&server.uri()).unwrap();
        let session = Session::builder(base.clone())
            .user_agent("tester/2.0")
            .shared_observer(recorder.clone())
            .build()
            .unwrap();

        let mut request = descriptor(base);
        request.headers.insert("x-trace", HeaderValue::from_static("abc"));
        session.execute(&request).await.unwrap();

        let seen = recorder.headers.lock().unwrap();
        assert_eq!(seen[0][USER_AGENT], "tester/2.0");
        assert_eq!(seen[0][ACCEPT], "*/*");
        assert_eq!(seen[0]["x-trace"], "abc");
    }

    #[test]
    fn descriptor_headers_override_defaults() {
        let session = Session::new(Url::parse("http://localhost").unwrap()).unwrap();
        let mut request = descriptor(session.base_url().clone());
        request.headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let resolved = session.resolve(&request);

        assert_eq!(resolved.headers[ACCEPT], "application/json");
        assert_eq!(resolved.headers[USER_AGENT].to_str().unwrap(), default_user_agent());
        assert!(request.headers.get(USER_AGENT).is_none());
    }

    #[test]
    fn panic_message_extracts_text() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn builder_reads_config() {
        let config = ClientConfig {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 5,
            user_agent: "tester/1.0".to_string(),
        };
        let session = SessionBuilder::from_config(&config).unwrap().build().unwrap();
        assert_eq!(session.base_url().as_str(), "http://localhost:8080/");
    }
}
