//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_portal_gateway;

pub use http_portal_gateway::HttpPortalGateway;
