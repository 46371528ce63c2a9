#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the ATV rental client
//!
//! A hyper-based client with:
//! - TLS via rustls (HTTPS only unless insecure HTTP is explicitly allowed)
//! - Connection pooling
//! - Optional per-request timeouts (none by default)
//! - Default `User-Agent` and `Accept` headers
//! - Transparent response decompression (gzip, brotli, deflate)
//! - Query strings, JSON and `multipart/form-data` bodies
//!
//! Body size limits apply to **decompressed** bytes.
//!
//! # Example
//!
//! ```ignore
//! use atv_http::HttpClient;
//!
//! let client = HttpClient::builder().build()?;
//! let atvs: serde_json::Value = client
//!     .get("https://atvrental.example/api/atvs")
//!     .query(&[("page", "1")])
//!     .bearer_auth(&token)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
pub mod layers;
pub mod multipart;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::{HttpClient, HttpService};
pub use config::{
    DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT, HttpClientConfig, TlsRootConfig, TransportSecurity,
};
pub use error::{HttpError, UrlProblem};
pub use multipart::Form;
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody};
