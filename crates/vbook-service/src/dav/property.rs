//! Catalog of supported DAV and `CardDAV` properties.

use std::collections::HashMap;

use vbook_core::constants::{CARDDAV_ROUTE_PREFIX, CONTACTS_ROUTE_PREFIX, VCARD_CONTENT_TYPE};
use vbook_rfc::dav::{Element, Payload, Prefix, Status};

use super::request::RenderContext;

/// Payload of a change tag that could not be fetched.
const CHANGE_TAG_FAILURE: &str = "<d:error>Internal server error</d:error>";

/// How a property produces its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    /// Same payload on every render.
    Static(Payload),
    /// Collection change tag, fetched from the backend on every render.
    ChangeTag,
    /// Not in the catalog; renders empty under 404.
    Missing,
}

/// A requested property, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub prefix: Prefix,
    /// Status the property expects to render with.
    pub status: Status,
    pub kind: PropertyKind,
}

impl Property {
    fn fixed(prefix: Prefix, name: &str, payload: Payload) -> Self {
        Self {
            name: name.to_owned(),
            prefix,
            status: Status::Ok,
            kind: PropertyKind::Static(payload),
        }
    }

    /// Creates the 404 property for a name outside the catalog.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: Prefix::None,
            status: Status::NotFound,
            kind: PropertyKind::Missing,
        }
    }

    /// ## Summary
    /// Renders the property.
    ///
    /// ## Side Effects
    /// A change tag performs one backend request. A failed request, or any
    /// reply with `success: false`, renders with status 500 and a generic
    /// error payload.
    pub async fn render(&self, ctx: &RenderContext<'_>) -> Element {
        match self.kind {
            PropertyKind::Static(ref payload) => {
                Element::new(self.prefix, self.name.clone(), payload.clone()).with_status(self.status)
            }
            PropertyKind::Missing => Element::empty(self.prefix, self.name.clone(), self.status),
            PropertyKind::ChangeTag => {
                match ctx.backend.fetch_sync_tag(ctx.credentials).await {
                    Ok(tag) if tag.success => Element::new(
                        self.prefix,
                        self.name.clone(),
                        Payload::raw(format!("\"{}\"", tag.etag)),
                    ),
                    Ok(tag) => {
                        tracing::error!(error = %tag.error, "Backend refused change tag request");
                        self.change_tag_failure()
                    }
                    Err(e) => {
                        tracing::error!("Failed to fetch change tag: {e}");
                        self.change_tag_failure()
                    }
                }
            }
        }
    }

    fn change_tag_failure(&self) -> Element {
        Element::new(self.prefix, self.name.clone(), Payload::raw(CHANGE_TAG_FAILURE))
            .with_status(Status::InternalServerError)
    }
}

/// Immutable name to property table.
///
/// Built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct PropertyRegistry {
    entries: HashMap<String, Property>,
}

impl PropertyRegistry {
    /// ## Summary
    /// Builds the catalog. `display_name` is the payload of `displayname`.
    #[must_use]
    pub fn new(display_name: &str) -> Self {
        let entries = [
            Property {
                name: "getctag".to_owned(),
                prefix: Prefix::CalendarServer,
                status: Status::Ok,
                kind: PropertyKind::ChangeTag,
            },
            Property::fixed(
                Prefix::CardDav,
                "addressbook-home-set",
                Payload::raw(format!("<d:href>{CONTACTS_ROUTE_PREFIX}</d:href>")),
            ),
            Property::fixed(
                Prefix::Dav,
                "supported-report-set",
                Payload::raw(
                    "<d:supported-report><d:report><d:sync-collection/></d:report></d:supported-report>",
                ),
            ),
            Property::fixed(Prefix::Dav, "displayname", Payload::text(display_name)),
            Property::fixed(
                Prefix::Dav,
                "resourcetype",
                Payload::raw("<d:collection/><card:addressbook/>"),
            ),
            Property::fixed(Prefix::Dav, "getcontenttype", Payload::text(VCARD_CONTENT_TYPE)),
            Property::fixed(
                Prefix::Dav,
                "current-user-principal",
                Payload::raw(format!("<d:href>{CARDDAV_ROUTE_PREFIX}</d:href>")),
            ),
            Property::fixed(Prefix::Dav, "getetag", Payload::Empty),
        ];

        let entries = entries.into_iter().map(|p| (p.name.clone(), p)).collect();

        Self { entries }
    }

    /// Returns the catalog entry for a local name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Property> {
        self.entries.get(name)
    }

    /// ## Summary
    /// Creates the property for a requested name, or a 404 property when the
    /// name is not in the catalog.
    #[must_use]
    pub fn construct(&self, name: &str) -> Property {
        self.lookup(name)
            .cloned()
            .unwrap_or_else(|| Property::missing(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
