//! Service Module
//!
//! Business logic layer for the server.
//! Services sit between the HTTP handlers and the platform client.

pub mod fleet;

// Re-export for convenience
pub use fleet as fleet_service;
