//! Shared configuration, constants and error types for the vbook workspace.

pub mod config;
pub mod constants;
pub mod error;
