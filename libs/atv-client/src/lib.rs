#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Client SDK for the ATV rental backend
//!
//! - [`session`]: bearer token and user profile over a pluggable [`store`]
//! - [`api`]: the request layer with uniform error shape and 401 handling
//! - [`auth`]: page guards and the logout flow
//! - [`messages`]: user-facing text and the error classifier
//! - [`ui`]: navigation visibility, toasts, formatting, badges, pagination
//! - [`context`]: wires it all together
//!
//! ```ignore
//! let ctx = AppContext::builder(config)
//!     .store(Arc::new(FileStore::for_origin(&api_base_url)?))
//!     .navigator(navigator)
//!     .prompt(prompt)
//!     .build()?;
//!
//! let user = ctx.auth_api().login("ana@example.com", &password).await?;
//! let atvs = ctx.api().get("/atvs", &[("status", "available")]).await?;
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod messages;
pub mod models;
pub mod session;
pub mod store;
pub mod ui;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{ApiClient, ApiError, AuthApi, ErrorKind, RequestBody, RequestOverrides};
pub use auth::{AuthGate, Dialogs, LogoutOutcome, Navigator, Prompt};
pub use config::{AppConfig, ConfigError, HttpSettings};
pub use context::{AppContext, AppContextBuilder, ContextError};
pub use models::{Pagination, Role, UserProfile, ValidationErrors};
pub use session::Session;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
