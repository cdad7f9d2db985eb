//! Field directive parsing.
//!
//! A directive string has the form `name,option,option(arg),...`. The first
//! token is the vCard property name; an empty first token falls back to the
//! field identifier. Both are upper-cased. A lone `-` skips the field.

const DEFAULT_GLUE: &str = ";";
const DEFAULT_SEPARATOR: &str = ":";
const DEFAULT_VERSION: &str = "3.0";

/// Encoding options of one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOptions {
    /// Upper-cased property name.
    pub name: String,
    /// Join list items (or record fields) on one line with `glue`.
    pub inline: bool,
    pub glue: String,
    /// Join a composite item's fields on one line with `item_glue`.
    pub item_inline: bool,
    pub item_glue: String,
    /// Written between the name and the value.
    pub separator: String,
    /// Drop empty text values.
    pub omit_empty: bool,
    /// Write the value without `NAME<separator>`.
    pub omit_name: bool,
    pub skip: bool,
    /// Write `VERSION:<version_number>` inside the wrapper.
    pub version: bool,
    pub version_number: String,
    /// Enclose a record in `BEGIN:VCARD` / `END:VCARD`.
    pub wrap: bool,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            inline: false,
            glue: DEFAULT_GLUE.to_owned(),
            item_inline: false,
            item_glue: DEFAULT_GLUE.to_owned(),
            separator: DEFAULT_SEPARATOR.to_owned(),
            omit_empty: false,
            omit_name: false,
            skip: false,
            version: false,
            version_number: DEFAULT_VERSION.to_owned(),
            wrap: false,
        }
    }
}

impl FieldOptions {
    /// Parses the directive string of a field.
    ///
    /// Unknown options are ignored. `inline` without `iteminline` turns on
    /// `iteminline` with the default glue.
    #[must_use]
    pub fn parse(ident: &str, directives: &str) -> Self {
        if directives == "-" {
            return Self {
                skip: true,
                ..Self::default()
            };
        }

        let mut tokens = directives.split(',');
        let name = tokens.next().filter(|n| !n.is_empty()).unwrap_or(ident);

        let mut opts = Self {
            name: name.to_uppercase(),
            ..Self::default()
        };

        for token in tokens {
            match token {
                "omitempty" => opts.omit_empty = true,
                "omitname" => opts.omit_name = true,
                "wrapvcard" => opts.wrap = true,
                _ => {
                    if let Some(arg) = argument(token, "inline") {
                        opts.inline = true;
                        if !arg.is_empty() {
                            arg.clone_into(&mut opts.glue);
                        }
                    } else if let Some(arg) = argument(token, "iteminline") {
                        opts.item_inline = true;
                        if !arg.is_empty() {
                            arg.clone_into(&mut opts.item_glue);
                        }
                    } else if let Some(arg) = argument(token, "separator") {
                        if !arg.is_empty() {
                            arg.clone_into(&mut opts.separator);
                        }
                    } else if let Some(arg) = argument(token, "version") {
                        opts.version = true;
                        if !arg.is_empty() {
                            arg.clone_into(&mut opts.version_number);
                        }
                    } else {
                        tracing::trace!(token, "Ignoring unknown vCard directive");
                    }
                }
            }
        }

        if opts.inline {
            opts.item_inline = true;
        }

        opts
    }
}

/// Returns the argument of `keyword` or `keyword(arg)`, stripped of spaces
/// and parentheses.
fn argument<'a>(token: &'a str, keyword: &str) -> Option<&'a str> {
    token
        .strip_prefix(keyword)
        .map(|rest| rest.trim_matches(|c| matches!(c, ' ' | '(' | ')')))
}
