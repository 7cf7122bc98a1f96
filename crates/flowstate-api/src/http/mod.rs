//! HTTP/REST API layer for Flowstate.
//!
//! Axum-based API over the workflow engine. Handlers only translate between
//! HTTP and engine calls; every decision lives in `flowstate-core`.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
