//! Multistatus response parsing.
//!
//! Reads back documents produced by [`serialize_multistatus`](crate::dav::serialize_multistatus).

use std::borrow::Cow;
use std::ops::Range;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::error::{ParseError, ParseResult};
use crate::dav::{Element, Multistatus, Payload, Prefix, Status};

/// Parses a multistatus document.
///
/// ## Summary
/// Each `response` becomes a [`ResponseBlock`](crate::dav::ResponseBlock). A `prop` child holding
/// only character data becomes an unescaped [`Payload::Text`]. One holding
/// child elements keeps its inner markup verbatim as a [`Payload::Raw`], and
/// one without content is [`Payload::Empty`]. Elements take the status of
/// their `propstat`.
///
/// ## Errors
/// Returns an error on malformed XML, a missing `status`, or a status line
/// without a defined reason phrase.
pub fn parse_multistatus(xml: &[u8]) -> ParseResult<Multistatus> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut multistatus = Multistatus::new();
    let mut href: Option<String> = None;
    let mut elements: Vec<Element> = Vec::new();
    let mut status: Option<Status> = None;
    let mut in_prop = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if in_prop {
                    let span = reader.read_to_end(e.name())?;
                    elements.push(property_element(&e, inner_text(xml, span)?)?);
                    continue;
                }

                match local_name(&e)?.as_str() {
                    "response" => {
                        href = None;
                        elements.clear();
                        status = None;
                    }
                    "prop" => in_prop = true,
                    "href" => {
                        let span = reader.read_to_end(e.name())?;
                        href = Some(unescape_text(inner_text(xml, span)?.trim())?);
                    }
                    "status" => {
                        let span = reader.read_to_end(e.name())?;
                        let line = inner_text(xml, span)?;
                        status = Some(Status::from_status_line(line).ok_or_else(|| {
                            ParseError::invalid_value(format!("undefined status line: {line}"))
                        })?);
                    }
                    "sync-token" => {
                        let span = reader.read_to_end(e.name())?;
                        multistatus.set_sync_token(unescape_text(inner_text(xml, span)?.trim())?);
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if in_prop {
                    elements.push(property_element(&e, "")?);
                }
            }
            Event::End(e) => {
                let local_name_bytes = e.local_name();
                match std::str::from_utf8(local_name_bytes.as_ref())? {
                    "prop" => in_prop = false,
                    "response" => {
                        let status = status
                            .take()
                            .ok_or_else(|| ParseError::missing_element("status"))?;
                        let mut elements = std::mem::take(&mut elements);
                        for element in &mut elements {
                            element.status = status;
                        }
                        let block = multistatus.add_response(status, elements);
                        block.href = href.take();
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(multistatus)
}

fn local_name(e: &BytesStart<'_>) -> ParseResult<String> {
    let local_name_bytes = e.local_name();
    Ok(std::str::from_utf8(local_name_bytes.as_ref())?.to_owned())
}

fn property_element(e: &BytesStart<'_>, inner: &str) -> ParseResult<Element> {
    let qualified = e.name();
    let qualified = std::str::from_utf8(qualified.as_ref())?;
    let (prefix, name) = match qualified.split_once(':') {
        Some((prefix, name)) => (Prefix::from_written(prefix), name),
        None => (Prefix::None, qualified),
    };

    let payload = if inner.is_empty() {
        Payload::Empty
    } else if inner.contains('<') {
        Payload::raw(inner)
    } else {
        Payload::text(unescape_text(inner)?)
    };

    Ok(Element::new(prefix, name, payload))
}

fn unescape_text(text: &str) -> ParseResult<String> {
    unescape(text)
        .map(Cow::into_owned)
        .map_err(|e| ParseError::invalid_value(e.to_string()))
}

/// Returns the raw input between an element's start and end tags.
fn inner_text(xml: &[u8], span: Range<u64>) -> ParseResult<&str> {
    let start = usize::try_from(span.start).map_err(|e| ParseError::invalid_value(e.to_string()))?;
    let end = usize::try_from(span.end).map_err(|e| ParseError::invalid_value(e.to_string()))?;
    let bytes = xml
        .get(start..end)
        .ok_or_else(|| ParseError::invalid_value("element span outside of input"))?;
    Ok(std::str::from_utf8(bytes)?)
}
