//! Protocol building blocks for the vbook address book bridge.
//!
//! - [`dav`] - `WebDAV`/`CardDAV` request parsing and multistatus responses
//! - [`vcard`] - declarative vCard 3.0 encoder
//!
//! Nothing in this crate performs I/O.

pub mod dav;
pub mod error;
pub mod vcard;
