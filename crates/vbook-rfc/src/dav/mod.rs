//! `WebDAV`/`CardDAV` request parsing and multistatus responses.
//!
//! Requests are parsed into a [`DavRequest`] holding the report root name and
//! the requested property names in document order. Rendered properties are
//! collected as [`Element`]s into [`ResponseBlock`]s of a [`Multistatus`]
//! document, which [`serialize_multistatus`] turns into the wire XML.

mod build;
mod element;
mod multistatus;
mod namespace;
mod parse;
mod status;

pub use build::serialize_multistatus;
pub use element::{Element, Payload};
pub use multistatus::{Multistatus, ResponseBlock};
pub use namespace::{CARDDAV_NS, CS_NS, DAV_NS, Prefix};
pub use parse::{
    DavRequest, ParseError, ParseErrorKind, ParseResult, RequestedProperty, parse_multistatus,
    parse_request,
};
pub use status::Status;
