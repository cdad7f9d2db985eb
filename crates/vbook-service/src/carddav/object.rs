//! Single contact retrieval.

use vbook_core::constants::{CONTACT_FILE_SUFFIX, CONTACT_UID_PREFIX};
use vbook_rfc::vcard::encode_wrapped;

use crate::backend::{ContactFilter, ContactsBackend, Credentials};
use crate::error::{BackendError, ServiceError, ServiceResult};

/// ## Summary
/// Extracts the numeric contact id from a `uuid-<id>.vcf` path segment.
///
/// Both the prefix and the suffix are optional. Returns `None` for a
/// non-numeric or zero id.
#[must_use]
pub fn parse_contact_id(segment: &str) -> Option<i64> {
    let id = segment.strip_prefix(CONTACT_UID_PREFIX).unwrap_or(segment);
    let id = id.strip_suffix(CONTACT_FILE_SUFFIX).unwrap_or(id);

    id.parse::<i64>().ok().filter(|id| *id != 0)
}

/// ## Summary
/// Fetches one contact and returns it as a vCard document.
///
/// ## Side Effects
/// One backend request filtered by the contact id.
///
/// ## Errors
/// - `NotFound` for an invalid id or an empty result
/// - `Backend(Rejected)` when the backend refuses the request with a message
/// - `Backend` for transport and decoding failures
pub async fn get_contact(
    backend: &dyn ContactsBackend,
    credentials: &Credentials,
    segment: &str,
) -> ServiceResult<String> {
    let id = parse_contact_id(segment)
        .ok_or_else(|| ServiceError::NotFound(format!("no contact id in {segment:?}")))?;

    let list = backend
        .fetch_contacts(credentials, Some(ContactFilter { id }))
        .await?;

    if list.is_rejected() {
        return Err(BackendError::Rejected(list.error).into());
    }

    let contact = list
        .results
        .first()
        .ok_or_else(|| ServiceError::NotFound(format!("contact {id}")))?;

    Ok(encode_wrapped(contact))
}
