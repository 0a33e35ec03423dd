//! DEV-CRAFT portal backend.
//!
//! Hexagonal layout: `domain` holds the entities and driving ports, `inbound`
//! the HTTP adapter, `outbound` the Diesel/PostgreSQL adapters, and `server`
//! the wiring that assembles them into a running service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-tracing middleware re-exported for server assembly.
pub use middleware::Trace;
