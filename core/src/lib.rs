//! Synchronous client for the ProsperWorks developer API.
//!
//! # Overview
//! `ProsperworksClient` builds authenticated `HttpRequest` values for every
//! vendor endpoint and classifies `HttpResponse` values, without touching
//! the network. `Gateway` adds a blocking `Transport` (ureq by default) and
//! exposes one method per operation, each returning
//! `Result<Option<Payload>, ApiError>`.
//!
//! # Design
//! - Configuration is immutable; every call is independent.
//! - The status-to-error mapping is a lookup table (`ErrorKind::from_status`).
//! - Response bodies are passed through as JSON or text, never reshaped.
//!
//! ```no_run
//! use prosperworks_core::{ClientConfig, Gateway};
//!
//! let gateway = Gateway::new(ClientConfig::new("api-key", "me@example.com"));
//! let _leads = gateway.get_lead_by_email("lead@example.com")?;
//! # Ok::<(), prosperworks_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use client::{ProsperworksClient, LISTING_DEFAULTS};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, ErrorKind, TransportError};
pub use gateway::Gateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{classify, ApiResult, Payload};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Fields, NewSubscription, RecordId, SubscriptionEvent, SubscriptionResource,
    SubscriptionSecret,
};
