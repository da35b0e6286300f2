//! Data Transfer Objects
//!
//! Wire formats of the platform API and its OAuth2 token endpoint.
//! DTOs are kept separate from domain types so platform quirks stay here.

pub mod app;
pub mod auth;
