//! Multistatus response model (RFC 4918 §13).

use super::element::Element;
use super::status::Status;

/// Elements sharing one status, optionally tied to a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBlock {
    /// Resource reference; written only when present.
    pub href: Option<String>,
    pub status: Status,
    pub elements: Vec<Element>,
}

impl ResponseBlock {
    #[must_use]
    pub fn new(status: Status, elements: Vec<Element>) -> Self {
        Self {
            href: None,
            status,
            elements,
        }
    }

    pub fn set_href(&mut self, href: impl Into<String>) {
        self.href = Some(href.into());
    }

    /// Returns the first element with the given local name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.name == name)
    }
}

/// A multistatus document.
///
/// The `d`, `card` and `cs` namespace declarations are fixed and written by
/// the serializer. Block order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multistatus {
    pub responses: Vec<ResponseBlock>,
    /// Sync token (for sync-collection).
    pub sync_token: Option<String>,
}

impl Multistatus {
    /// Creates an empty multistatus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block and returns it so the caller can attach an href.
    pub fn add_response(&mut self, status: Status, elements: Vec<Element>) -> &mut ResponseBlock {
        self.responses.push(ResponseBlock::new(status, elements));
        let last = self.responses.len() - 1;
        &mut self.responses[last]
    }

    /// Sets the sync token.
    pub fn set_sync_token(&mut self, token: impl Into<String>) {
        self.sync_token = Some(token.into());
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Returns the first block with the given status.
    #[must_use]
    pub fn block(&self, status: Status) -> Option<&ResponseBlock> {
        self.responses.iter().find(|r| r.status == status)
    }
}
