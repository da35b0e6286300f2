//! Core domain types
//!
//! These types are shared between the client (which produces them from
//! platform responses) and the server and CLI (which report them).

pub mod build;
pub mod instance;
pub mod verdict;
pub mod worker;
