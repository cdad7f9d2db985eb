mod get_contact;
mod helpers;
mod propfind;
mod report;
mod routing;
