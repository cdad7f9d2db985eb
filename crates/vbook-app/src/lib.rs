//! HTTP surface of the address book bridge.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod registry_handler;
