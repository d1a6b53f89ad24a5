//! HTTP transport used to reach the ingestion endpoint.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client with connect and request timeouts ([`ReqwestClient`])

mod client;
mod error;
mod exchange;

#[cfg(test)]
mod exchange_tests;

pub use client::{ReqwestClient, Timeouts};
pub use error::HttpError;
pub use exchange::{HttpClient, HttpRequest, HttpResponse};
