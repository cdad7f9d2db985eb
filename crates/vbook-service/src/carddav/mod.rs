//! `CardDAV` reports and contact retrieval.

pub mod object;
pub mod report;

pub use object::{get_contact, parse_contact_id};
pub use report::{
    ReportKind, execute_addressbook_multiget, execute_report, execute_sync_collection,
};
