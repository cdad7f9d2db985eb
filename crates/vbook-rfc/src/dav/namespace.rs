//! XML namespaces declared on every multistatus document.

/// `DAV:` namespace URI.
pub const DAV_NS: &str = "DAV:";

/// `CardDAV` namespace URI.
pub const CARDDAV_NS: &str = "urn:ietf:params:xml:ns:carddav";

/// `CalendarServer` (Apple) namespace URI.
pub const CS_NS: &str = "http://calendarserver.org/ns/";

/// Namespace prefix of a rendered element.
///
/// The multistatus root binds `d`, `card` and `cs`; `None` renders the bare
/// local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    Dav,
    CardDav,
    CalendarServer,
    None,
}

impl Prefix {
    /// Returns the prefix as written in element names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dav => "d",
            Self::CardDav => "card",
            Self::CalendarServer => "cs",
            Self::None => "",
        }
    }

    /// Returns the namespace URI bound to this prefix.
    #[must_use]
    pub const fn namespace(self) -> Option<&'static str> {
        match self {
            Self::Dav => Some(DAV_NS),
            Self::CardDav => Some(CARDDAV_NS),
            Self::CalendarServer => Some(CS_NS),
            Self::None => None,
        }
    }

    /// Maps a written prefix back to its variant; anything unknown is `None`.
    #[must_use]
    pub fn from_written(prefix: &str) -> Self {
        match prefix {
            "d" => Self::Dav,
            "card" => Self::CardDav,
            "cs" => Self::CalendarServer,
            _ => Self::None,
        }
    }

    /// Returns `prefix:name`, or `name` alone when there is no prefix.
    #[must_use]
    pub fn qualify(self, name: &str) -> String {
        match self {
            Self::None => name.to_owned(),
            _ => format!("{}:{name}", self.as_str()),
        }
    }

    /// Root element attributes binding every prefix to its namespace.
    #[must_use]
    pub fn declarations() -> [(&'static str, &'static str); 3] {
        [
            ("xmlns:d", DAV_NS),
            ("xmlns:card", CARDDAV_NS),
            ("xmlns:cs", CS_NS),
        ]
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
