//! Rendered property results.

use super::namespace::Prefix;
use super::status::Status;

/// Inner content of a rendered element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    /// No content.
    #[default]
    Empty,
    /// Well-formed XML fragment, written verbatim.
    Raw(String),
    /// Plain text, escaped when written.
    Text(String),
}

impl Payload {
    #[must_use]
    pub fn raw(xml: impl Into<String>) -> Self {
        Self::Raw(xml.into())
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Raw(s) | Self::Text(s) => s.is_empty(),
        }
    }

    /// Returns the content as stored, without escaping.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Raw(s) | Self::Text(s) => s,
        }
    }
}

/// A property rendered for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Unqualified element name.
    pub name: String,
    pub prefix: Prefix,
    pub payload: Payload,
    /// Status the element was rendered under.
    pub status: Status,
}

impl Element {
    /// Creates a 200 element.
    #[must_use]
    pub fn new(prefix: Prefix, name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            prefix,
            payload,
            status: Status::Ok,
        }
    }

    /// Creates an empty element under the given status.
    #[must_use]
    pub fn empty(prefix: Prefix, name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            prefix,
            payload: Payload::Empty,
            status,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Returns `prefix:name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.prefix.qualify(&self.name)
    }
}
