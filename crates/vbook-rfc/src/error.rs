use thiserror::Error;

/// Errors raised while producing protocol output.
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("XML write error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No reason phrase defined for status {0}")]
    UndefinedStatus(u16),

    #[error("Invalid UTF-8 in generated output")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
