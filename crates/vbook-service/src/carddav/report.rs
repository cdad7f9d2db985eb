//! CardDAV REPORT service layer.
//!
//! Business logic for sync-collection and addressbook-multiget reports.

use vbook_core::constants::{CARDDAV_ROUTE_PREFIX, CONTACTS_ROUTE_PREFIX};
use vbook_rfc::dav::{Element, Multistatus, Payload, Prefix, Status};
use vbook_rfc::vcard::encode_wrapped;

use crate::backend::{Contact, ContactsBackend, Credentials};
use crate::dav::PropertyRequest;
use crate::error::{BackendError, ServiceError, ServiceResult};
use crate::token::{SYNC_TOKEN_LEN, random_token};

/// Content type announced per resource by sync-collection.
const SYNC_CONTENT_TYPE: &str = "text/vcard";

/// Reports recognized by the document element's local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    SyncCollection,
    AddressbookMultiget,
}

impl ReportKind {
    #[must_use]
    pub fn from_root(root: &str) -> Option<Self> {
        match root {
            "sync-collection" => Some(Self::SyncCollection),
            "addressbook-multiget" => Some(Self::AddressbookMultiget),
            _ => None,
        }
    }
}

/// ## Summary
/// Dispatches a REPORT body to its report.
///
/// ## Errors
/// Returns `UnsupportedReport` for an unknown document element, and the
/// errors of the selected report.
pub async fn execute_report(
    backend: &dyn ContactsBackend,
    credentials: &Credentials,
    request: &PropertyRequest,
) -> ServiceResult<Multistatus> {
    match ReportKind::from_root(&request.root) {
        Some(ReportKind::SyncCollection) => {
            execute_sync_collection(backend, credentials, request).await
        }
        Some(ReportKind::AddressbookMultiget) => {
            execute_addressbook_multiget(backend, credentials, request).await
        }
        None => Err(ServiceError::UnsupportedReport(request.root.clone())),
    }
}

/// ## Summary
/// Executes a sync-collection report.
///
/// Lists every contact with its etag, plus a content type element when the
/// request asks for `getcontenttype`, under `/carddav/<uid>.vcf`. The
/// document carries a fresh sync token.
///
/// ## Side Effects
/// Fetches the full contact list from the backend.
///
/// ## Errors
/// Returns backend errors; a rejected reply is `BackendError::Rejected`.
pub async fn execute_sync_collection(
    backend: &dyn ContactsBackend,
    credentials: &Credentials,
    request: &PropertyRequest,
) -> ServiceResult<Multistatus> {
    let with_content_type = request.get("getcontenttype").is_some();
    let contacts = fetch_all(backend, credentials).await?;

    let mut multistatus = Multistatus::new();
    for contact in &contacts {
        let mut elements = vec![etag_element(contact)];
        if with_content_type {
            elements.push(Element::new(
                Prefix::Dav,
                "getcontenttype",
                Payload::text(SYNC_CONTENT_TYPE),
            ));
        }

        multistatus
            .add_response(Status::Ok, elements)
            .set_href(format!("{CARDDAV_ROUTE_PREFIX}/{}", contact.file_name()));
    }

    multistatus.set_sync_token(random_token(SYNC_TOKEN_LEN));

    tracing::debug!(count = contacts.len(), "Built sync-collection report");

    Ok(multistatus)
}

/// ## Summary
/// Executes an addressbook-multiget report.
///
/// Each contact is returned with its etag and its vCard under
/// `/carddav/contacts/<uid>.vcf`. Without hrefs in the body every contact
/// is returned. With hrefs, contacts are matched by the last path segment
/// and each unmatched href gets its own 404 block. That block carries the
/// requested href, the only non-success block with an href, so a client can
/// tell which resource is missing.
///
/// ## Side Effects
/// Fetches the full contact list from the backend.
///
/// ## Errors
/// Returns backend errors. A contact whose vCard encodes empty is skipped
/// and logged.
pub async fn execute_addressbook_multiget(
    backend: &dyn ContactsBackend,
    credentials: &Credentials,
    request: &PropertyRequest,
) -> ServiceResult<Multistatus> {
    let contacts = fetch_all(backend, credentials).await?;
    let mut multistatus = Multistatus::new();

    if request.hrefs.is_empty() {
        for contact in &contacts {
            add_address_data(&mut multistatus, contact);
        }
        return Ok(multistatus);
    }

    for href in &request.hrefs {
        let file_name = href.rsplit('/').next().unwrap_or_default();
        match contacts.iter().find(|c| c.file_name() == file_name) {
            Some(contact) => add_address_data(&mut multistatus, contact),
            None => {
                tracing::debug!(%href, "Multiget target not found");
                multistatus
                    .add_response(Status::NotFound, Vec::new())
                    .set_href(href.as_str());
            }
        }
    }

    Ok(multistatus)
}

fn add_address_data(multistatus: &mut Multistatus, contact: &Contact) {
    let vcard = encode_wrapped(contact);
    if vcard.is_empty() {
        tracing::error!(uid = %contact.uid, "Can't encode contact");
        return;
    }

    multistatus
        .add_response(
            Status::Ok,
            vec![
                etag_element(contact),
                Element::new(Prefix::CardDav, "address-data", Payload::text(vcard)),
            ],
        )
        .set_href(format!("{CONTACTS_ROUTE_PREFIX}/{}", contact.file_name()));
}

fn etag_element(contact: &Contact) -> Element {
    Element::new(Prefix::Dav, "getetag", Payload::raw(contact.etag()))
}

async fn fetch_all(
    backend: &dyn ContactsBackend,
    credentials: &Credentials,
) -> ServiceResult<Vec<Contact>> {
    let list = backend.fetch_contacts(credentials, None).await?;
    if list.is_rejected() {
        return Err(BackendError::Rejected(list.error).into());
    }
    Ok(list.results)
}
