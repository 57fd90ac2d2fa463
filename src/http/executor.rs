use std::sync::Arc;

use log::{debug, warn};
use reqwest::{
    Method, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use super::{
    error::{DecodeError, EncodeError, RequestError},
    keys::KeyDecodingStrategy,
    session::Session,
    types::{RawResponse, RequestDescriptor},
};

/// Where a method's parameters go on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterEncoding {
    /// `key=value` pairs appended to the URL query; no body.
    Query,
    /// A JSON object in the body, with `Content-Type: application/json`.
    JsonBody,
}

impl ParameterEncoding {
    /// Read methods carry parameters in the query, write methods in a JSON
    /// body. Other methods have no defined encoding.
    pub fn for_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET | Method::HEAD | Method::DELETE => Some(ParameterEncoding::Query),
            Method::POST | Method::PUT | Method::PATCH => Some(ParameterEncoding::JsonBody),
            _ => None,
        }
    }
}

/// Sends typed requests through a shared [`Session`].
///
/// Parameters are encoded according to the method (see
/// [`ParameterEncoding::for_method`]) and the response is decoded into
/// whatever type the caller asks for. Cloning an `Executor` is cheap; all
/// clones share the same session.
#[derive(Debug, Clone)]
pub struct Executor {
    session: Arc<Session>,
    key_decoding: KeyDecodingStrategy,
}

impl Executor {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            key_decoding: KeyDecodingStrategy::default(),
        }
    }

    pub fn with_key_decoding(mut self, strategy: KeyDecodingStrategy) -> Self {
        self.key_decoding = strategy;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Encodes `parameters`, performs exactly one network call and decodes
    /// the response body into `T`.
    ///
    /// `path` is either an absolute URL or is resolved against the session's
    /// base URL.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Encode`] if the request cannot be built; nothing is
    ///   sent.
    /// - [`RequestError::Transport`] if the call fails or the server answers
    ///   with a non-2xx status; no decoding is attempted.
    /// - [`RequestError::Decode`] if the body is not JSON or does not match
    ///   `T`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    ///
    /// use echofetch::http::{Executor, Session};
    /// use reqwest::Method;
    /// use serde::Deserialize;
    /// use url::Url;
    ///
    /// #[derive(Debug, Deserialize)]
    /// #[serde(rename_all = "camelCase")]
    /// struct Slideshow {
    ///     slide_count: Option<u32>,
    /// }
    ///
    /// # async fn example() -> Result<(), anyhow::Error> {
    /// let session = Session::new(Url::parse("https://httpbin.org")?)?;
    /// let executor = Executor::new(Arc::new(session));
    /// let show: Slideshow = executor.send_typed("/json", Method::GET, &()).await?;
    /// println!("{show:?}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_typed<T, P>(&self, path: &str, method: Method, parameters: &P) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let descriptor = encode_request(self.session.base_url(), path, method, parameters)?;

        let response = match self.session.execute(&descriptor).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    method:% = descriptor.method,
                    url:% = descriptor.url,
                    error:% = e;
                    "HTTP: Typed request failed in transport"
                );
                return Err(e.into());
            },
        };

        let decoded = decode_response(&descriptor.method, &response, self.key_decoding).inspect_err(|e| {
            warn!(
                url:% = descriptor.url,
                error:% = e;
                "HTTP: Response could not be decoded"
            );
        })?;
        Ok(decoded)
    }
}

/// Builds the wire-level request for `path`, `method` and `parameters`.
///
/// Performs no I/O; exposed so the encoding rules can be checked without a
/// server.
pub fn encode_request<P>(
    base_url: &Url,
    path: &str,
    method: Method,
    parameters: &P,
) -> Result<RequestDescriptor, EncodeError>
where
    P: Serialize + ?Sized,
{
    if path.is_empty() {
        return Err(EncodeError::EmptyPath);
    }
    let encoding =
        ParameterEncoding::for_method(&method).ok_or_else(|| EncodeError::UnsupportedMethod(method.clone()))?;
    let mut url = resolve_url(base_url, path)?;
    let mut headers = HeaderMap::new();

    let body = match encoding {
        ParameterEncoding::Query => {
            // a literal `+` is already escaped as `%2B`, so every `+` left is a space
            let query = serde_urlencoded::to_string(parameters)?.replace('+', "%20");
            if !query.is_empty() {
                let merged = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                    _ => query,
                };
                url.set_query(Some(&merged));
            }
            None
        },
        ParameterEncoding::JsonBody => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Some(serde_json::to_vec(parameters)?)
        },
    };

    Ok(RequestDescriptor {
        method,
        url,
        headers,
        body,
    })
}

/// Absolute URLs are used as-is; anything else is appended to the base
/// URL's path with exactly one `/` between them.
fn resolve_url(base_url: &Url, path: &str) -> Result<Url, url::ParseError> {
    match Url::parse(path) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let mut base = base_url.clone();
            base.set_query(None);
            base.set_fragment(None);
            let joined = format!(
                "{}/{}",
                base.as_str().trim_end_matches('/'),
                path.trim_start_matches('/')
            );
            Url::parse(&joined)
        },
        Err(e) => Err(e),
    }
}

/// Decodes a successful response body into `T`.
///
/// The body is parsed as JSON, its keys are rewritten with `strategy`, and
/// the result is deserialized. An empty body on a `HEAD` request or a
/// 204/205 response decodes as JSON `null`.
pub fn decode_response<T>(
    method: &Method,
    response: &RawResponse,
    strategy: KeyDecodingStrategy,
) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    let value = if response.body.is_empty() && allows_empty_body(method, response.status) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&response.body).map_err(DecodeError::Syntax)?
    };

    let value = strategy.apply(value);
    let decoded = T::deserialize(&value).map_err(DecodeError::Shape)?;
    debug!(
        value:% = value;
        "HTTP: Decoded response"
    );
    Ok(decoded)
}

fn allows_empty_body(method: &Method, status: StatusCode) -> bool {
    *method == Method::HEAD || status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT
}
