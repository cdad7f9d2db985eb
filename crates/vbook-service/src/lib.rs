//! Address book logic on top of the billing backend.
//!
//! - [`backend`] - backend collaborator trait, HTTP client and contact model
//! - [`dav`] - property registry and request-scoped rendering
//! - [`carddav`] - reports and single contact retrieval
//! - [`token`] - random opaque tokens

pub mod backend;
pub mod carddav;
pub mod dav;
pub mod error;
pub mod token;
