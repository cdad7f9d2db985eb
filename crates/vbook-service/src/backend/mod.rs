//! Billing backend collaborator.
//!
//! Handlers only see [`ContactsBackend`]; the HTTP implementation lives in
//! [`sbss`] and tests substitute their own.

#[cfg(any(test, feature = "testing"))]
pub mod mock;
pub mod model;
pub mod sbss;

use std::pin::Pin;
use std::sync::Arc;

pub use model::{Contact, ContactsList, Email, SyncTag};

use crate::error::BackendResult;

/// Username and password of the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Narrows a contact list request to one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactFilter {
    pub id: i64,
}

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = BackendResult<T>> + Send + 'a>>;

/// Source of contacts and of the collection change tag.
///
/// Every call authenticates with the given credentials. A reply with
/// `success: false` is returned as data; only transport and decoding
/// failures are errors.
pub trait ContactsBackend: Send + Sync {
    fn fetch_contacts<'a>(
        &'a self,
        credentials: &'a Credentials,
        filter: Option<ContactFilter>,
    ) -> BackendFuture<'a, ContactsList>;

    fn fetch_sync_tag<'a>(&'a self, credentials: &'a Credentials) -> BackendFuture<'a, SyncTag>;
}

/// Creates one backend client per session.
pub trait BackendFactory: Send + Sync {
    /// ## Errors
    /// Returns an error if the client cannot be constructed.
    fn create(&self) -> BackendResult<Arc<dyn ContactsBackend>>;
}
