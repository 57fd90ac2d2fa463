//! Typed client for an httpbin-style echo service.
//!
//! Wraps an [`Executor`] with one method per echo endpoint. GET parameters
//! travel in the query string and come back under `args`; POST parameters
//! travel as a JSON body and come back under `json`.

use log::debug;
use reqwest::Method;
use serde::Serialize;

use super::types::EchoResponse;
use crate::http::{Executor, RequestError};

const GET_PATH: &str = "/get";
const POST_PATH: &str = "/post";

#[derive(Debug, Clone)]
pub struct EchoClient {
    executor: Executor,
}

impl EchoClient {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// The base URL requests are resolved against.
    pub fn get_address(&self) -> String {
        self.executor.session().base_url().to_string()
    }

    /// Sends `params` as a query string to `/get`.
    pub async fn get<P>(&self, params: &P) -> Result<EchoResponse, RequestError>
    where P: Serialize + ?Sized {
        debug!(address = &*self.get_address(); "HTTP: Requesting GET echo");
        self.executor.send_typed(GET_PATH, Method::GET, params).await
    }

    /// Sends `params` as a JSON body to `/post`.
    pub async fn post<P>(&self, params: &P) -> Result<EchoResponse, RequestError>
    where P: Serialize + ?Sized {
        debug!(address = &*self.get_address(); "HTTP: Requesting POST echo");
        self.executor.send_typed(POST_PATH, Method::POST, params).await
    }
}
