//! Declarative vCard 3.0 encoder.
//!
//! Records describe their fields with a [`Schema`] of directive strings:
//!
//! | Directive           | Effect                                              |
//! |---------------------|-----------------------------------------------------|
//! | first token         | property name, defaults to the upper-cased field    |
//! | `-`                 | skip the field                                      |
//! | `omitempty`         | drop the field when its text is empty               |
//! | `omitname`          | write the value without `NAME:`                     |
//! | `inline(glue)`      | join list items on one line (default `;`)           |
//! | `iteminline(glue)`  | join a record item's fields on one line (default `;`) |
//! | `separator(sep)`    | text between name and value (default `:`)           |
//! | `wrapvcard`         | enclose the record in `BEGIN:VCARD`/`END:VCARD`     |
//! | `version(num)`      | write `VERSION:num` inside the envelope (default `3.0`) |
//!
//! Output is not escaped; callers embedding it in XML escape it there.

mod encode;
mod options;
mod value;

pub use encode::{encode, encode_wrapped, wrap};
pub use options::FieldOptions;
pub use value::{Schema, ToVCard, Value};
