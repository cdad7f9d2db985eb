pub mod get;
pub mod propfind;
pub mod report;
