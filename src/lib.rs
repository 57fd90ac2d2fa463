//! Typed requests against an httpbin-style echo service.
//!
//! The reusable part lives in [`http`]: a [`Session`](http::Session) that
//! owns the client and its observers, and an [`Executor`](http::Executor)
//! that encodes parameters by method and decodes responses into any
//! `DeserializeOwned` type. [`echo`] builds the `/get` and `/post` calls on
//! top of it; [`config`], [`log`] and [`cli`] serve the command line front
//! end.

pub mod cli;
pub mod config;
pub mod echo;
pub mod http;
pub mod log;
