//! PROPFIND and REPORT request body parsing.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

use super::error::{ParseError, ParseResult};

/// A property named inside the `prop` container of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedProperty {
    /// Local element name, e.g. `getctag`.
    pub name: String,
    /// Namespace URI bound to the element's prefix, if declared.
    pub namespace: Option<String>,
}

/// A parsed PROPFIND or REPORT body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavRequest {
    /// Local name of the document element (`propfind`, `sync-collection`, ...).
    pub root: String,
    /// Requested properties in document order, duplicates kept.
    pub properties: Vec<RequestedProperty>,
    /// `href` children of the document element (multiget targets).
    pub hrefs: Vec<String>,
    /// `sync-token` child of the document element.
    pub sync_token: Option<String>,
}

impl DavRequest {
    /// Returns true if a property with this local name was requested.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }

    /// Returns the requested local names in document order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }
}

/// Text child of the document element currently being collected.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Capture {
    Href,
    SyncToken,
}

/// Parses a PROPFIND or REPORT request body.
///
/// ## Summary
/// Records the document element's local name, the direct children of its
/// `prop` container in document order, and any `href` and `sync-token`
/// children. Nested content of a property element is ignored.
///
/// Returns `Ok(None)` for an empty or whitespace-only body.
///
/// ## Errors
/// Returns an error if the XML is malformed, ends before every element is
/// closed, or has no document element.
#[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn parse_request(xml: &[u8]) -> ParseResult<Option<DavRequest>> {
    if xml.iter().all(u8::is_ascii_whitespace) {
        tracing::debug!("Empty request body");
        return Ok(None);
    }

    let mut reader = Reader::from_reader(xml);

    let mut buf = Vec::new();
    let mut namespaces: Vec<(String, String)> = Vec::new();
    // Length of `namespaces` before each open element's declarations
    let mut scopes: Vec<usize> = Vec::new();
    let mut root: Option<String> = None;
    let mut properties = Vec::new();
    let mut hrefs = Vec::new();
    let mut sync_token: Option<String> = None;
    let mut depth = 0usize;
    let mut in_prop = false;
    let mut capture: Option<Capture> = None;
    let mut text = String::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                scopes.push(namespaces.len());
                collect_namespaces(e, &mut namespaces)?;
                let local_name = local_name(e)?;

                match depth {
                    1 => root = Some(local_name),
                    2 => match local_name.as_str() {
                        "prop" => in_prop = true,
                        "href" => capture = Some(Capture::Href),
                        "sync-token" => capture = Some(Capture::SyncToken),
                        _ => {}
                    },
                    3 if in_prop => properties.push(requested_property(e, &namespaces)?),
                    _ => {}
                }
            }
            Event::Empty(ref e) => {
                let scope = namespaces.len();
                collect_namespaces(e, &mut namespaces)?;
                match depth {
                    0 => root = Some(local_name(e)?),
                    2 if in_prop => properties.push(requested_property(e, &namespaces)?),
                    _ => {}
                }
                namespaces.truncate(scope);
            }
            Event::Text(ref e) => {
                if capture.is_some() {
                    let decoded = reader.decoder().decode(e.as_ref())?;
                    text.push_str(&decoded);
                }
            }
            Event::GeneralRef(ref e) => {
                if capture.is_some() {
                    text.push_str(&resolve_reference(e)?);
                }
            }
            Event::CData(ref e) => {
                if capture.is_some() {
                    text.push_str(std::str::from_utf8(e.as_ref())?);
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    in_prop = false;
                    match capture.take() {
                        Some(Capture::Href) => hrefs.push(text.trim().to_owned()),
                        Some(Capture::SyncToken) => sync_token = Some(text.trim().to_owned()),
                        None => {}
                    }
                    text.clear();
                }
                depth = depth.saturating_sub(1);
                if let Some(scope) = scopes.pop() {
                    namespaces.truncate(scope);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::missing_element("closing tag"));
    }

    let root = root.ok_or_else(|| ParseError::missing_element("document element"))?;

    tracing::debug!(
        root = %root,
        properties = properties.len(),
        hrefs = hrefs.len(),
        "Parsed request body"
    );

    Ok(Some(DavRequest {
        root,
        properties,
        hrefs,
        sync_token,
    }))
}

fn local_name(e: &BytesStart<'_>) -> ParseResult<String> {
    let local_name_bytes = e.local_name();
    Ok(std::str::from_utf8(local_name_bytes.as_ref())?.to_owned())
}

/// Collects `xmlns` declarations of an element.
fn collect_namespaces(
    e: &BytesStart<'_>,
    namespaces: &mut Vec<(String, String)>,
) -> ParseResult<()> {
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            namespaces.push((prefix.to_owned(), value.to_owned()));
        } else if key == "xmlns" {
            namespaces.push((String::new(), value.to_owned()));
        } else {
            // Other attributes ignored
        }
    }
    Ok(())
}

/// Resolves a character reference or one of the predefined XML entities.
fn resolve_reference(e: &BytesRef<'_>) -> ParseResult<String> {
    if let Some(ch) = e.resolve_char_ref()? {
        return Ok(ch.to_string());
    }

    let name = e.decode()?;
    resolve_predefined_entity(&name)
        .map(str::to_owned)
        .ok_or_else(|| ParseError::invalid_value(format!("unknown entity: &{name};")))
}

fn requested_property(
    e: &BytesStart<'_>,
    namespaces: &[(String, String)],
) -> ParseResult<RequestedProperty> {
    let qualified = e.name();
    let qualified = std::str::from_utf8(qualified.as_ref())?;
    let (prefix, name) = qualified.split_once(':').unwrap_or(("", qualified));

    let namespace = namespaces
        .iter()
        .rev()
        .find(|(p, _)| p == prefix)
        .map(|(_, ns)| ns.clone());

    Ok(RequestedProperty {
        name: name.to_owned(),
        namespace,
    })
}
