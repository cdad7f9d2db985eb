//! In-memory backend for tests.
//!
//! Answers from a fixed contact list and records every request, so tests can
//! check how often the backend was reached and with which credentials.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{
    BackendFuture, Contact, ContactFilter, ContactsBackend, ContactsList, Credentials, SyncTag,
};
use crate::error::BackendError;

#[derive(Default)]
pub struct MockBackend {
    pub contacts: Vec<Contact>,
    /// `None` makes change tag requests fail.
    pub etag: Option<String>,
    /// Answer contact requests with `success: false` and this message.
    pub rejection: Option<String>,
    /// Answer change tag requests with `success: false` and this message.
    pub tag_rejection: Option<String>,
    /// Fail contact requests at the transport level.
    pub fail_contacts: bool,
    calls: AtomicUsize,
    usernames: Mutex<Vec<String>>,
}

impl MockBackend {
    #[must_use]
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            contacts,
            etag: Some("42".to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rejecting(message: &str) -> Self {
        Self {
            rejection: Some(message.to_owned()),
            ..Self::default()
        }
    }

    /// Makes change tag requests fail.
    #[must_use]
    pub fn without_change_tag(mut self) -> Self {
        self.etag = None;
        self
    }

    /// Makes change tag requests answer `success: false` with `message`.
    #[must_use]
    pub fn rejecting_change_tag(mut self, message: &str) -> Self {
        self.tag_rejection = Some(message.to_owned());
        self
    }

    /// Makes contact requests fail at the transport level.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_contacts = true;
        self
    }

    /// Number of backend requests served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Usernames of the credentials seen, in request order.
    #[must_use]
    pub fn usernames(&self) -> Vec<String> {
        self.usernames
            .lock()
            .map(|names| names.clone())
            .unwrap_or_default()
    }

    fn record(&self, credentials: &Credentials) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut names) = self.usernames.lock() {
            names.push(credentials.username.clone());
        }
    }
}

impl ContactsBackend for MockBackend {
    fn fetch_contacts<'a>(
        &'a self,
        credentials: &'a Credentials,
        filter: Option<ContactFilter>,
    ) -> BackendFuture<'a, ContactsList> {
        Box::pin(async move {
            self.record(credentials);

            if self.fail_contacts {
                return Err(BackendError::Status(502));
            }
            if let Some(ref message) = self.rejection {
                return Ok(ContactsList {
                    error: message.clone(),
                    ..ContactsList::default()
                });
            }

            let results = self
                .contacts
                .iter()
                .filter(|c| filter.is_none_or(|f| f.id == c.id))
                .cloned()
                .collect();

            Ok(ContactsList {
                success: true,
                results,
                ..ContactsList::default()
            })
        })
    }

    fn fetch_sync_tag<'a>(&'a self, credentials: &'a Credentials) -> BackendFuture<'a, SyncTag> {
        Box::pin(async move {
            self.record(credentials);

            if let Some(ref message) = self.tag_rejection {
                return Ok(SyncTag {
                    error: message.clone(),
                    ..SyncTag::default()
                });
            }

            match self.etag {
                Some(ref etag) => Ok(SyncTag {
                    success: true,
                    etag: etag.clone(),
                    ..SyncTag::default()
                }),
                None => Err(BackendError::Status(503)),
            }
        })
    }
}
