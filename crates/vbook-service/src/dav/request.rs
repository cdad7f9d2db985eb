//! Request-scoped property dispatch.

use std::collections::BTreeMap;

use vbook_rfc::dav::{DavRequest, Element, Multistatus, ParseResult, Status, parse_request};

use super::property::{Property, PropertyRegistry};
use crate::backend::{ContactsBackend, Credentials};

/// Everything a property needs to render for one request.
pub struct RenderContext<'a> {
    pub backend: &'a dyn ContactsBackend,
    pub credentials: &'a Credentials,
    /// Target resource reference attached to successful blocks.
    pub href: String,
}

impl<'a> RenderContext<'a> {
    #[must_use]
    pub fn new(
        backend: &'a dyn ContactsBackend,
        credentials: &'a Credentials,
        href: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            credentials,
            href: href.into(),
        }
    }
}

/// Properties requested by a PROPFIND or REPORT body, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRequest {
    /// Local name of the document element.
    pub root: String,
    /// Target hrefs listed in the body.
    pub hrefs: Vec<String>,
    pub properties: Vec<Property>,
}

impl PropertyRequest {
    /// ## Summary
    /// Parses a request body and resolves every requested name through the
    /// registry. Duplicates are kept and unknown names become 404 properties.
    ///
    /// Returns `Ok(None)` for an empty body.
    ///
    /// ## Errors
    /// Returns an error if the body is not well-formed XML.
    pub fn parse(xml: &[u8], registry: &PropertyRegistry) -> ParseResult<Option<Self>> {
        Ok(parse_request(xml)?.map(|request| Self::from_request(request, registry)))
    }

    #[must_use]
    pub fn from_request(request: DavRequest, registry: &PropertyRegistry) -> Self {
        let properties = request
            .properties
            .iter()
            .map(|p| registry.construct(&p.name))
            .collect();

        Self {
            root: request.root,
            hrefs: request.hrefs,
            properties,
        }
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// ## Summary
    /// Renders every property and adds one block per resulting status.
    ///
    /// Blocks with a success status carry `ctx.href`; other blocks have no
    /// href. Blocks are added in ascending status order.
    ///
    /// ## Side Effects
    /// Each change tag property performs its own backend request.
    pub async fn each(&self, multistatus: &mut Multistatus, ctx: &RenderContext<'_>) {
        let mut buckets: BTreeMap<Status, Vec<Element>> = BTreeMap::new();

        for property in &self.properties {
            tracing::debug!(
                name = %property.name,
                status = property.status.code(),
                "Processing property"
            );

            let element = property.render(ctx).await;
            buckets.entry(element.status).or_default().push(element);
        }

        for (status, elements) in buckets {
            let block = multistatus.add_response(status, elements);
            if status.is_success() {
                block.set_href(ctx.href.as_str());
            }
        }
    }
}
