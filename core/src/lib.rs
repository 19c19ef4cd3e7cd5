//! Synchronous client for the Yammer REST API.
//!
//! # Overview
//! Endpoint clients ([`api`]) turn typed call arguments into flat wire
//! parameters with a [`Pipeline`], send them through a [`Client`], and
//! classify the reply into a [`Response`] or an [`Error`]. OAuth token
//! exchange lives in [`auth`].
//!
//! # Design
//! - The [`Transport`] trait is the only I/O seam. `UreqTransport` (feature
//!   `ureq`, on by default) executes requests; tests substitute their own.
//! - Models wrap the decoded JSON; there are no per-resource structs, so
//!   fields the service adds are never lost.
//! - Argument conversion is a fixed list of stages per resource family,
//!   each independently testable.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod identifier;
pub mod model;
pub mod pipeline;
mod records;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod value;
pub mod yammer;

#[cfg(test)]
mod test_support;

pub use auth::{AuthConfig, Authenticator};
pub use client::{Client, ClientConfig};
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use model::{Model, Response};
pub use pipeline::{Pipeline, Stage};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use value::{CallArguments, FlatParameters, Identifiable, Param, Record, Value};
pub use yammer::Yammer;
