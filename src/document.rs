//! Reading workbook markup from disk or memory.
//!
//! A source is either a bare `.twb` XML document or a `.twbx` package (a zip
//! container holding the `.twb` next to extracts and images). Packages are
//! recognized by their zip signature or by a `.twbx` name; the first entry in
//! archive order whose name ends in `.twb` is the document.
//!
//! Nothing here is lenient: a missing document, bad zip, non-UTF-8 text or
//! broken XML fails the whole read.

use crate::config::SourceLimits;
use crate::error::{Error, Result};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";
const MARKUP_EXTENSION: &str = ".twb";
const PACKAGE_EXTENSION: &str = ".twbx";

/// Where a workbook comes from.
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    Path(PathBuf),
    /// An uploaded file: its original name plus contents.
    Bytes { filename: String, bytes: Vec<u8> },
}

impl WorkbookSource {
    pub fn bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        WorkbookSource::Bytes { filename: filename.into(), bytes: bytes.into() }
    }

    /// Base name reported in the workbook model.
    pub fn filename(&self) -> String {
        match self {
            WorkbookSource::Path(path) => {
                path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
            }
            WorkbookSource::Bytes { filename, .. } => {
                Path::new(filename).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
            }
        }
    }
}

impl From<PathBuf> for WorkbookSource {
    fn from(path: PathBuf) -> Self {
        WorkbookSource::Path(path)
    }
}

impl From<&Path> for WorkbookSource {
    fn from(path: &Path) -> Self {
        WorkbookSource::Path(path.to_path_buf())
    }
}

/// Workbook markup pulled out of a source, not yet parsed.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub filename: String,
    /// Name of the archive entry the markup came from, for packaged sources.
    pub entry: Option<String>,
    pub markup: String,
}

impl RawDocument {
    /// Parse the markup into a tree borrowing from `self`.
    pub fn parse(&self) -> Result<roxmltree::Document<'_>> {
        parse_markup(&self.markup)
    }
}

/// Read the markup of `source`, unwrapping a package when there is one.
pub fn extract(source: &WorkbookSource, limits: &SourceLimits) -> Result<RawDocument> {
    let filename = source.filename();
    check_extension(&filename, limits)?;

    let bytes = match source {
        WorkbookSource::Path(path) => read_file(path, limits)?,
        WorkbookSource::Bytes { bytes, .. } => {
            check_size(bytes.len() as u64, limits, &filename)?;
            bytes.clone()
        }
    };

    if is_package(&filename, &bytes) {
        let (entry, markup) = read_package(Cursor::new(bytes), limits)?;
        tracing::debug!(%filename, %entry, "unwrapped packaged workbook");
        Ok(RawDocument { filename, entry: Some(entry), markup })
    } else {
        Ok(RawDocument { filename, entry: None, markup: decode(bytes)? })
    }
}

/// Parse workbook markup into a tree.
pub fn parse_markup(markup: &str) -> Result<roxmltree::Document<'_>> {
    let markup = markup.strip_prefix('\u{feff}').unwrap_or(markup);
    let options = roxmltree::ParsingOptions { allow_dtd: true, ..roxmltree::ParsingOptions::default() };
    Ok(roxmltree::Document::parse_with_options(markup, options)?)
}

fn is_package(filename: &str, bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || filename.to_ascii_lowercase().ends_with(PACKAGE_EXTENSION)
}

fn check_extension(filename: &str, limits: &SourceLimits) -> Result<()> {
    if limits.allowed_extensions.is_empty() {
        return Ok(());
    }
    let lower = filename.to_ascii_lowercase();
    if limits.allowed_extensions.iter().any(|ext| lower.ends_with(&ext.to_ascii_lowercase())) {
        return Ok(());
    }
    Err(Error::UnsupportedSource(format!(
        "`{filename}` is not one of {}",
        limits.allowed_extensions.join(", ")
    )))
}

fn check_size(len: u64, limits: &SourceLimits, what: &str) -> Result<()> {
    if len > limits.max_document_bytes {
        return Err(Error::UnsupportedSource(format!(
            "`{what}` is {len} bytes, larger than the {} byte limit",
            limits.max_document_bytes
        )));
    }
    Ok(())
}

fn read_file(path: &Path, limits: &SourceLimits) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path)?;
    let len = file.metadata()?.len();
    check_size(len, limits, &path.display().to_string())?;
    let mut bytes = Vec::new();
    file.take(limits.max_document_bytes.saturating_add(1)).read_to_end(&mut bytes)?;
    check_size(bytes.len() as u64, limits, &path.display().to_string())?;
    Ok(bytes)
}

fn read_package<R: Read + Seek>(reader: R, limits: &SourceLimits) -> Result<(String, String)> {
    let mut archive = ZipArchive::new(reader)?;

    let mut found = None;
    for i in 0..archive.len() {
        // Raw access reads only the header, so extracts in exotic formats
        // never get decompressed while scanning.
        let entry = archive.by_index_raw(i)?;
        if !entry.is_dir() && entry.name().to_ascii_lowercase().ends_with(MARKUP_EXTENSION) {
            found = Some(i);
            break;
        }
    }
    let index = found.ok_or_else(|| Error::InvalidArchive(format!("no {MARKUP_EXTENSION} document in archive")))?;

    let entry = archive.by_index(index)?;
    let name = entry.name().to_string();
    // Entry sizes come from untrusted metadata; bound the read instead.
    let mut bytes = Vec::new();
    entry.take(limits.max_document_bytes.saturating_add(1)).read_to_end(&mut bytes)?;
    check_size(bytes.len() as u64, limits, &name)?;

    Ok((name, decode(bytes)?))
}

fn decode(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::MalformedDocument(format!("document is not valid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const MINIMAL: &str = r#"<?xml version='1.0' encoding='utf-8' ?><workbook name="Tiny" version="18.1"/>"#;

    fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn plain_markup_is_read_directly() {
        let raw = extract(&WorkbookSource::bytes("tiny.twb", MINIMAL), &SourceLimits::default()).unwrap();
        assert_eq!(raw.filename, "tiny.twb");
        assert!(raw.entry.is_none());
        assert_eq!(raw.parse().unwrap().root_element().attribute("name"), Some("Tiny"));
    }

    #[test]
    fn first_twb_entry_is_used() {
        let bytes = package(&[
            ("Data/Extracts/sales.hyper", "binary"),
            ("Tiny.twb", MINIMAL),
            ("Other.twb", "<workbook name='Other'/>"),
        ]);
        let raw = extract(&WorkbookSource::bytes("tiny.twbx", bytes), &SourceLimits::default()).unwrap();
        assert_eq!(raw.entry.as_deref(), Some("Tiny.twb"));
        assert!(raw.markup.contains("Tiny"));
    }

    #[test]
    fn packages_are_sniffed_by_signature() {
        let bytes = package(&[("Tiny.twb", MINIMAL)]);
        let raw = extract(&WorkbookSource::bytes("upload.twb", bytes), &SourceLimits::default()).unwrap();
        assert_eq!(raw.entry.as_deref(), Some("Tiny.twb"));
    }

    #[test]
    fn package_without_markup_is_invalid_archive() {
        let bytes = package(&[("Data/extract.hyper", "x"), ("Image/logo.png", "y")]);
        let err = extract(&WorkbookSource::bytes("empty.twbx", bytes), &SourceLimits::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArchive(_)), "{err:?}");
    }

    #[test]
    fn twbx_that_is_not_a_zip_is_invalid_archive() {
        let err = extract(&WorkbookSource::bytes("broken.twbx", MINIMAL), &SourceLimits::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArchive(_)), "{err:?}");
    }

    #[test]
    fn broken_xml_is_malformed() {
        let source = WorkbookSource::bytes("bad.twb", "<workbook><worksheet></workbook>");
        let raw = extract(&source, &SourceLimits::default()).unwrap();
        assert!(matches!(raw.parse(), Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn non_utf8_is_malformed() {
        let err =
            extract(&WorkbookSource::bytes("latin1.twb", vec![0x3c, 0x77, 0xe9, 0x3e]), &SourceLimits::default())
                .unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract(&WorkbookSource::Path(dir.path().join("nope.twb")), &SourceLimits::default()).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn limits_reject_extension_and_size() {
        let limits = SourceLimits { max_document_bytes: 16, ..SourceLimits::uploads() };
        let err = extract(&WorkbookSource::bytes("notes.txt", "x"), &limits).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource(_)));
        let err = extract(&WorkbookSource::bytes("big.twb", MINIMAL), &limits).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource(_)));
        assert!(extract(&WorkbookSource::bytes("TINY.TWB", MINIMAL), &SourceLimits::uploads()).is_ok());
    }

    #[test]
    fn default_limits_accept_any_filename() {
        for name in ["workbook.xml", ""] {
            let raw = extract(&WorkbookSource::bytes(name, MINIMAL), &SourceLimits::default()).unwrap();
            assert_eq!(raw.filename, name);
            assert_eq!(raw.parse().unwrap().root_element().attribute("name"), Some("Tiny"));
        }
    }

    #[test]
    fn utf8_bom_is_tolerated() {
        let markup = format!("\u{feff}{MINIMAL}");
        assert!(parse_markup(&markup).is_ok());
    }
}
