//! Fleetwatch Core
//!
//! Core types for supervising a pool of build-worker containers.
//!
//! This crate contains:
//! - Domain types: workers, instance states, histograms and fleet verdicts
//! - DTOs: wire formats of the platform API and its token endpoint

pub mod domain;
pub mod dto;
