//! Status codes reported inside `propstat` blocks.

use crate::error::{RfcError, RfcResult};

/// Result code of a rendered property.
///
/// Only codes with a defined reason phrase exist; converting any other code
/// is an error because clients compare the status line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    /// 200 Ok
    Ok,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl Status {
    /// Returns the status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    /// Returns the reason phrase.
    #[must_use]
    pub const fn reason_phrase(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    /// Returns the status line, e.g. `HTTP/1.1 200 Ok`.
    #[must_use]
    pub fn status_line(self) -> String {
        format!("HTTP/1.1 {} {}", self.code(), self.reason_phrase())
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Parses a status line produced by [`Status::status_line`].
    #[must_use]
    pub fn from_status_line(line: &str) -> Option<Self> {
        let code = line.trim().strip_prefix("HTTP/1.1 ")?.get(..3)?;
        code.parse::<u16>().ok().and_then(|c| Self::try_from(c).ok())
    }
}

impl TryFrom<u16> for Status {
    type Error = RfcError;

    fn try_from(code: u16) -> RfcResult<Self> {
        match code {
            200 => Ok(Self::Ok),
            404 => Ok(Self::NotFound),
            500 => Ok(Self::InternalServerError),
            _ => Err(RfcError::UndefinedStatus(code)),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason_phrase())
    }
}
