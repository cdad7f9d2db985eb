/// Program name used in the startup banner and default session cookie.
pub const PROGRAM_NAME: &str = "sbss-vbook";

/// Route component constants shared across crates
pub const CARDDAV_ROUTE_COMPONENT: &str = "carddav";
pub const CARDDAV_ROUTE_PREFIX: &str = const_str::concat!("/", CARDDAV_ROUTE_COMPONENT);

pub const CONTACTS_ROUTE_COMPONENT: &str = "contacts";
pub const CONTACTS_ROUTE_PREFIX: &str =
    const_str::concat!(CARDDAV_ROUTE_PREFIX, "/", CONTACTS_ROUTE_COMPONENT);

pub const WELL_KNOWN_CARDDAV: &str = "/.well-known/carddav";

/// Contact resources are addressed as `uuid-<id>.vcf`.
pub const CONTACT_UID_PREFIX: &str = "uuid-";
pub const CONTACT_FILE_SUFFIX: &str = ".vcf";

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
pub const VCARD_CONTENT_TYPE: &str = "text/x-vcard; charset=utf-8";
