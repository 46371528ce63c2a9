//! Tower layers for the HTTP client stack
//!
//! - [`DefaultHeadersLayer`] - Adds `User-Agent` and `Accept` unless the caller set them

mod default_headers;

pub use default_headers::{DefaultHeadersLayer, DefaultHeadersService};
