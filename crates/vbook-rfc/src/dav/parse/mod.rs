//! DAV XML parsing.

mod error;
mod multistatus;
mod request;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use multistatus::parse_multistatus;
pub use request::{DavRequest, RequestedProperty, parse_request};
