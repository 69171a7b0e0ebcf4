//! Async REST client core for resource collections.
//!
//! # Overview
//! `ResourceClient<T>` provides list/get/create/update/delete for any type
//! implementing [`Resource`]. `RoleClient` specializes it for `/roles`,
//! adding paginated listing and broadcast channels for change notification.
//!
//! # Design
//! - Every operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`); the async method runs both
//!   around one `HttpTransport::execute` call.
//! - The transport is injected as `Arc<dyn HttpTransport>` and shared by all
//!   clients. `ReqwestTransport` is the production implementation.
//! - Failures propagate unchanged. Nothing is retried or cached.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
pub mod role;
pub mod transport;

pub use broadcast::{Broadcast, Subscription};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use resource::{CrudClient, Resource, ResourceClient};
pub use role::{Page, Role, RoleClient};
pub use transport::ReqwestTransport;
