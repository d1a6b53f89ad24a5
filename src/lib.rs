//! OMS shipper: container logs to Azure Log Analytics
//!
//! A library for turning container log lines into JSON envelopes and
//! delivering them, signed with the workspace shared key, to the
//! HTTP Data Collector API with bounded retry.

pub mod adapter;
pub mod config;
pub mod ingest;
pub mod message;
pub mod stream;
pub mod time;
pub mod transport;
