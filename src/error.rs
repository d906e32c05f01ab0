//! Error taxonomy shared by extraction, the rule engine and the render layer.

use thiserror::Error;

/// Errors surfaced by the public API.
///
/// Extraction errors abort the whole `parse_workbook` call; nothing partial is
/// cached. Rule errors only surface when the engine runs with
/// [`FailurePolicy::Abort`](crate::FailurePolicy::Abort).
#[derive(Debug, Error)]
pub enum Error {
    /// A zip container was found but holds no inner `.twb` document, or its
    /// directory could not be read at all.
    #[error("invalid workbook archive: {0}")]
    InvalidArchive(String),

    /// The markup is not well-formed XML (or not UTF-8).
    #[error("malformed workbook document: {0}")]
    MalformedDocument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a render/export target tag is not recognized.
    #[error("unknown export format: {0}")]
    UnknownExportFormat(String),

    /// The source was rejected before parsing (extension or size limit).
    #[error("unsupported workbook source: {0}")]
    UnsupportedSource(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("rule `{rule}` failed: {message}")]
    Rule { rule: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Error::Io(io),
            other => Error::InvalidArchive(other.to_string()),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_io_errors_keep_their_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: Error = zip::result::ZipError::Io(io).into();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn zip_format_errors_become_invalid_archive() {
        let err: Error = zip::result::ZipError::InvalidArchive("bad central directory".into()).into();
        assert!(matches!(err, Error::InvalidArchive(_)));
    }
}
