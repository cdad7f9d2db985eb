//! Billing backend response records.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use vbook_core::constants::CONTACT_UID_PREFIX;
use vbook_rfc::vcard::{Schema, ToVCard, Value};

/// Timestamp format of the `updated` field.
const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Contact `type` marking an organization.
const ORGANIZATION_KIND: i64 = 1;

/// Answer to a contact list request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactsList {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: String,
    /// Set when the backend refused the credentials.
    #[serde(default)]
    pub challenge: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Contact>,
}

impl ContactsList {
    /// A failed answer that carries a message.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        !self.success && !self.error.is_empty()
    }
}

/// Answer to a change tag request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncTag {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub challenge: i64,
    #[serde(default)]
    pub etag: String,
}

/// E-mail address of a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub kind: String,
    pub value: String,
}

impl ToVCard for Email {
    fn to_vcard(&self) -> Value<'_> {
        static SCHEMA: LazyLock<Schema> =
            LazyLock::new(|| Schema::new(&[("type", ",separator(=)"), ("value", ",omitname")]));
        Value::Record(&SCHEMA, vec![self.kind.to_vcard(), self.value.to_vcard()])
    }
}

/// A billing client exposed as an address book entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawContact")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub kind: i64,
    /// Set for organizations.
    pub organization: String,
    /// Name parts of a person.
    pub full_name: Vec<String>,
    pub email: Option<Email>,
    /// `uuid-<id>`
    pub uid: String,
    pub classname: String,
    pub updated: Option<NaiveDateTime>,
}

impl Contact {
    /// ## Summary
    /// Creates a contact and derives its uid and name fields.
    ///
    /// Kind `1` is an organization named `name`; any other kind is a person
    /// whose name is split on spaces into name parts.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, kind: i64) -> Self {
        let name = name.into();
        let (organization, full_name) = if kind == ORGANIZATION_KIND {
            (name.clone(), Vec::new())
        } else {
            (String::new(), name.split(' ').map(str::to_owned).collect())
        };

        Self {
            id,
            uid: format!("{CONTACT_UID_PREFIX}{id}"),
            name,
            kind,
            organization,
            full_name,
            email: None,
            classname: String::new(),
            updated: None,
        }
    }

    /// Sets a preferred internet e-mail address; empty input clears it.
    #[must_use]
    pub fn with_email(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        self.email = (!address.is_empty()).then(|| Email {
            kind: "internet,pref".to_owned(),
            value: address,
        });
        self
    }

    #[must_use]
    pub fn with_classname(mut self, classname: impl Into<String>) -> Self {
        self.classname = classname.into();
        self
    }

    #[must_use]
    pub fn with_updated(mut self, updated: NaiveDateTime) -> Self {
        self.updated = Some(updated);
        self
    }

    /// Quoted Unix timestamp of the last update; `"0"` when unknown.
    #[must_use]
    pub fn etag(&self) -> String {
        let ts = self.updated.map_or(0, |t| t.and_utc().timestamp());
        format!("\"{ts}\"")
    }

    /// Resource file name, e.g. `uuid-12.vcf`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}{}", self.uid, vbook_core::constants::CONTACT_FILE_SUFFIX)
    }
}

impl ToVCard for Contact {
    fn to_vcard(&self) -> Value<'_> {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(&[
                ("id", "-"),
                ("name", "fn"),
                ("kind", "-"),
                ("organization", "org"),
                ("full_name", "n,inline"),
                ("email", "email,separator(;),inline,iteminline(:)"),
                ("uid", "uid"),
                ("classname", "categories"),
                ("updated", "-"),
            ])
        });

        Value::Record(
            &SCHEMA,
            vec![
                Value::Absent,
                self.name.to_vcard(),
                Value::Absent,
                self.organization.to_vcard(),
                self.full_name.to_vcard(),
                self.email.to_vcard(),
                self.uid.to_vcard(),
                self.classname.to_vcard(),
                Value::Absent,
            ],
        )
    }
}

/// Numbers arrive either as JSON numbers or as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flexible {
    Number(i64),
    Text(String),
}

impl Flexible {
    /// Unparsable text counts as zero.
    fn as_i64(&self) -> i64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawContact {
    #[serde(default)]
    id: Option<Flexible>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<Flexible>,
    #[serde(default)]
    classname: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    updated: Option<String>,
}

impl From<RawContact> for Contact {
    fn from(raw: RawContact) -> Self {
        let id = raw.id.as_ref().map_or(0, Flexible::as_i64);
        let kind = raw.kind.as_ref().map_or(0, Flexible::as_i64);

        let mut contact = Self::new(id, raw.name.unwrap_or_default(), kind)
            .with_email(raw.email.unwrap_or_default())
            .with_classname(raw.classname.unwrap_or_default());

        contact.updated = raw
            .updated
            .filter(|s| !s.is_empty())
            .and_then(|s| match NaiveDateTime::parse_from_str(&s, UPDATED_FORMAT) {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::debug!(id, updated = %s, "Unparsable update time: {e}");
                    None
                }
            });

        contact
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Contact>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Contact>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
