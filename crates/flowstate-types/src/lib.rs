//! Shared domain types for Flowstate.
//!
//! This crate contains the domain types used across the workspace:
//! workflow definitions, running instances, server configuration, and
//! the error enums the engine returns.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod workflow;
