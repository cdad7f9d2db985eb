//! Recursive vCard encoder.

use std::sync::LazyLock;

use super::options::FieldOptions;
use super::value::{Schema, ToVCard, Value};

/// Encodes a value with no owning field.
#[must_use]
pub fn encode<T: ToVCard + ?Sized>(value: &T) -> String {
    element(&value.to_vcard(), None)
}

/// Encodes a value as a complete vCard 3.0 document.
///
/// A record is enclosed in `BEGIN:VCARD`, `VERSION:3.0` and `END:VCARD`; each
/// record of a list gets its own envelope.
#[must_use]
pub fn encode_wrapped<T: ToVCard + ?Sized>(value: &T) -> String {
    static WRAPPER: LazyLock<Schema> =
        LazyLock::new(|| Schema::new(&[("item", ",omitname,wrapvcard,version(3.0)")]));

    element(&Value::Record(&WRAPPER, vec![value.to_vcard()]), None)
}

/// Encloses an encoded body in a vCard envelope when `opts` asks for it.
///
/// Parts end with a newline, or with the two characters `\n` when the
/// envelope is itself an inline value.
#[must_use]
pub fn wrap(body: String, opts: Option<&FieldOptions>) -> String {
    let Some(opts) = opts.filter(|o| o.wrap) else {
        return body;
    };
    if body.is_empty() {
        return body;
    }

    let line_end = if opts.inline { "\\n" } else { "\n" };

    let mut out = String::with_capacity(body.len() + 48);
    out.push_str("BEGIN:VCARD");
    out.push_str(line_end);
    if opts.version {
        out.push_str("VERSION:");
        out.push_str(&opts.version_number);
        out.push_str(line_end);
    }
    out.push_str(&body);
    out.push_str(line_end);
    out.push_str("END:VCARD");
    out.push_str(line_end);
    out
}

fn element(value: &Value<'_>, opts: Option<&FieldOptions>) -> String {
    if opts.is_some_and(|o| o.skip) {
        return String::new();
    }

    match value {
        Value::Absent => String::new(),
        Value::Text(text) => {
            if text.is_empty() && opts.is_some_and(|o| o.omit_empty) {
                String::new()
            } else {
                (*text).to_owned()
            }
        }
        Value::Number(number) => number.clone(),
        Value::List(items) => list(items, opts),
        Value::Record(schema, values) => record(schema, values, opts),
    }
}

fn list(items: &[Value<'_>], opts: Option<&FieldOptions>) -> String {
    let prefix_items = opts.is_some_and(|o| o.item_inline && !o.inline && !o.omit_name);

    let encoded: Vec<String> = items
        .iter()
        .map(|item| element(item, opts))
        .filter(|body| !body.is_empty())
        .map(|body| match opts {
            Some(o) if prefix_items => format!("{}{}{body}", o.name, o.separator),
            _ => body,
        })
        .collect();

    let joiner = match opts {
        Some(o) if o.inline => o.glue.as_str(),
        _ => "\n",
    };

    encoded.join(joiner)
}

fn record(schema: &Schema, values: &[Value<'_>], opts: Option<&FieldOptions>) -> String {
    let mut encoded = Vec::with_capacity(values.len());

    for (field, value) in schema.fields().iter().zip(values) {
        if field.skip {
            continue;
        }

        let body = element(value, Some(field));
        let named = !field.omit_name && (value.is_scalar() || field.inline);

        if body.is_empty() {
            // An empty scalar keeps its `NAME:` line unless omitempty is set
            if named && value.is_scalar() && !field.omit_empty {
                encoded.push(format!("{}{}", field.name, field.separator));
            }
            continue;
        }

        if named {
            encoded.push(format!("{}{}{body}", field.name, field.separator));
        } else {
            encoded.push(body);
        }
    }

    let joiner = match opts {
        Some(o) if o.item_inline => o.item_glue.as_str(),
        _ => "\n",
    };

    wrap(encoded.join(joiner), opts)
}
