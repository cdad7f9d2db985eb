//! Value shapes understood by the encoder.

use super::options::FieldOptions;

/// Declared fields of a record type, in declaration order.
///
/// Built once per type, usually in a `static LazyLock`, so directives are
/// parsed a single time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldOptions>,
}

impl Schema {
    /// Builds a schema from `(identifier, directives)` pairs.
    #[must_use]
    pub fn new(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(ident, directives)| FieldOptions::parse(ident, directives))
                .collect(),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldOptions] {
        &self.fields
    }
}

/// A value viewed through its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// A missing optional value.
    Absent,
    Text(&'a str),
    /// A number, already formatted as plain decimal.
    Number(String),
    List(Vec<Value<'a>>),
    /// Field values aligned with the schema's fields.
    Record(&'a Schema, Vec<Value<'a>>),
}

impl Value<'_> {
    /// Text and numbers are scalars; everything else is composite.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Number(_))
    }
}

/// Types that can be encoded as vCard.
///
/// Record types return [`Value::Record`] with a schema describing their
/// fields:
///
/// ```
/// use std::sync::LazyLock;
/// use vbook_rfc::vcard::{Schema, ToVCard, Value, encode};
///
/// struct Person {
///     name: String,
///     nick: Vec<String>,
/// }
///
/// impl ToVCard for Person {
///     fn to_vcard(&self) -> Value<'_> {
///         static SCHEMA: LazyLock<Schema> =
///             LazyLock::new(|| Schema::new(&[("name", "fn"), ("nick", "nickname,inline(,)")]));
///         Value::Record(&SCHEMA, vec![self.name.to_vcard(), self.nick.to_vcard()])
///     }
/// }
///
/// let person = Person { name: "Jane".into(), nick: vec!["J".into(), "JD".into()] };
/// assert_eq!(encode(&person), "FN:Jane\nNICKNAME:J,JD");
/// ```
pub trait ToVCard {
    fn to_vcard(&self) -> Value<'_>;
}

impl ToVCard for str {
    fn to_vcard(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl ToVCard for String {
    fn to_vcard(&self) -> Value<'_> {
        Value::Text(self)
    }
}

macro_rules! number_to_vcard {
    ($($ty:ty),*) => {
        $(
            impl ToVCard for $ty {
                fn to_vcard(&self) -> Value<'_> {
                    Value::Number(self.to_string())
                }
            }
        )*
    };
}

// `Display` of floats is the shortest round-trip decimal, never exponential.
number_to_vcard!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: ToVCard> ToVCard for Option<T> {
    fn to_vcard(&self) -> Value<'_> {
        self.as_ref().map_or(Value::Absent, ToVCard::to_vcard)
    }
}

impl<T: ToVCard + ?Sized> ToVCard for Box<T> {
    fn to_vcard(&self) -> Value<'_> {
        (**self).to_vcard()
    }
}

impl<T: ToVCard + ?Sized> ToVCard for &T {
    fn to_vcard(&self) -> Value<'_> {
        (**self).to_vcard()
    }
}

impl<T: ToVCard> ToVCard for [T] {
    fn to_vcard(&self) -> Value<'_> {
        Value::List(self.iter().map(ToVCard::to_vcard).collect())
    }
}

impl<T: ToVCard> ToVCard for Vec<T> {
    fn to_vcard(&self) -> Value<'_> {
        self.as_slice().to_vcard()
    }
}
