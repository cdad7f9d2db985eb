//! Multistatus XML serialization.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::element::{Element, Payload};
use super::multistatus::{Multistatus, ResponseBlock};
use super::namespace::Prefix;
use crate::error::RfcResult;

/// Serializes a multistatus response to XML.
///
/// ## Summary
/// Writes `d:multistatus` with the `d`, `card` and `cs` namespace
/// declarations, one `d:response` per block and the sync token when set.
/// Each block becomes `d:response > d:href?, d:propstat > (d:prop, d:status)`.
///
/// ## Errors
/// Returns an error if XML writing fails or the output is not valid UTF-8.
pub fn serialize_multistatus(multistatus: &Multistatus) -> RfcResult<String> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("d:multistatus");
    for attr in Prefix::declarations() {
        root.push_attribute(attr);
    }
    writer.write_event(Event::Start(root))?;

    for response in &multistatus.responses {
        write_response(&mut writer, response)?;
    }

    if let Some(ref token) = multistatus.sync_token {
        write_text_element(&mut writer, "d:sync-token", token)?;
    }

    writer.write_event(Event::End(BytesEnd::new("d:multistatus")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

/// Writes a single response element.
fn write_response<W: Write>(
    writer: &mut Writer<W>,
    response: &ResponseBlock,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("d:response")))?;

    if let Some(ref href) = response.href {
        write_text_element(writer, "d:href", href)?;
    }

    writer.write_event(Event::Start(BytesStart::new("d:propstat")))?;
    writer.write_event(Event::Start(BytesStart::new("d:prop")))?;

    for element in &response.elements {
        write_element(writer, element)?;
    }

    writer.write_event(Event::End(BytesEnd::new("d:prop")))?;
    write_text_element(writer, "d:status", &response.status.status_line())?;
    writer.write_event(Event::End(BytesEnd::new("d:propstat")))?;

    writer.write_event(Event::End(BytesEnd::new("d:response")))?;

    Ok(())
}

/// Writes `<prefix:name>payload</prefix:name>`.
fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), quick_xml::Error> {
    let name = element.qualified_name();

    writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
    match &element.payload {
        Payload::Empty => {}
        Payload::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        Payload::Raw(xml) => {
            // Producer guarantees a well-formed fragment
            writer.get_mut().write_all(xml.as_bytes())?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;

    Ok(())
}

/// Writes a simple text element.
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
