//! Data access for Policy Console
//!
//! Wraps the remote policy collection behind the `PolicyGateway` trait.
//! Supports both an HTTP backend (the real policy API) and an in-memory
//! backend for development and testing.

pub mod endpoints;
pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use endpoints::EndpointConfig;
pub use error::GatewayError;
pub use http::HttpPolicyGateway;
pub use memory::InMemoryGateway;
pub use traits::PolicyGateway;
