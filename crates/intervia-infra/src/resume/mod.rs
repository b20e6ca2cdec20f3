//! Resume ingestion: format detection, text extraction, and contact-field
//! mining.
//!
//! Accepts `.pdf`, `.txt`, and `.md` files. The format is decided from
//! the extension before any parse attempt, so unsupported types (such as
//! `.docx`) are rejected without touching the file contents. PDF files
//! additionally get a `%PDF-` magic sanity check.

use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use intervia_types::candidate::CandidateInfo;
use intervia_types::error::ResumeError;

pub mod fields;

/// Supported resume file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    /// Plain text, including markdown.
    Text,
}

/// Decide the format from the file extension alone.
pub fn detect_format(path: &Path) -> Result<ResumeFormat, ResumeError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => Ok(ResumeFormat::Pdf),
        "txt" | "md" => Ok(ResumeFormat::Text),
        _ => Err(ResumeError::UnsupportedFormat(extension)),
    }
}

/// Extract the resume's text and mine contact fields from it.
///
/// The returned [`CandidateInfo`] is partial: any field the heuristics
/// could not find is left `None` for the info-collection phase to fill.
pub fn extract_candidate(path: &Path) -> Result<CandidateInfo, ResumeError> {
    let format = detect_format(path)?;
    let text = match format {
        ResumeFormat::Pdf => {
            check_pdf_magic(path)?;
            pdf_extract::extract_text(path)
                .map_err(|err| ResumeError::ExtractionFailed(err.to_string()))?
        }
        ResumeFormat::Text => fs::read_to_string(path)?,
    };

    if text.trim().is_empty() {
        return Err(ResumeError::EmptyDocument);
    }
    debug!(chars = text.len(), ?format, "Resume text extracted");

    let candidate = fields::mine_contact_fields(&text);
    info!(
        name_found = candidate.name.is_some(),
        email_found = candidate.email.is_some(),
        phone_found = candidate.phone.is_some(),
        "Resume contact fields mined"
    );
    Ok(candidate)
}

/// A `.pdf` extension on a non-PDF file fails here rather than deep
/// inside the parser.
fn check_pdf_magic(path: &Path) -> Result<(), ResumeError> {
    let mut header = [0u8; 5];
    let mut file = fs::File::open(path)?;
    let read = file.read(&mut header)?;
    if read < header.len() || &header != b"%PDF-" {
        return Err(ResumeError::ExtractionFailed(
            "file does not start with a %PDF- header".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_format_by_extension() {
        assert_eq!(
            detect_format(Path::new("cv.pdf")).unwrap(),
            ResumeFormat::Pdf
        );
        assert_eq!(
            detect_format(Path::new("cv.txt")).unwrap(),
            ResumeFormat::Text
        );
        assert_eq!(
            detect_format(Path::new("notes.md")).unwrap(),
            ResumeFormat::Text
        );
        // Extension casing does not matter.
        assert_eq!(
            detect_format(Path::new("CV.PDF")).unwrap(),
            ResumeFormat::Pdf
        );
    }

    #[test]
    fn test_docx_rejected_before_any_parse() {
        // The path does not exist; rejection must happen on extension alone.
        let err = detect_format(Path::new("/nonexistent/cv.docx")).unwrap_err();
        assert!(matches!(err, ResumeError::UnsupportedFormat(ext) if ext == "docx"));

        let err = extract_candidate(Path::new("/nonexistent/cv.docx")).unwrap_err();
        assert!(matches!(err, ResumeError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_extension_rejected() {
        let err = detect_format(Path::new("resume")).unwrap_err();
        assert!(matches!(err, ResumeError::UnsupportedFormat(ext) if ext.is_empty()));
    }

    #[test]
    fn test_text_resume_yields_contact_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        fs::write(
            &path,
            "Jane Doe\njane@example.com\n555-123-4567\n\nSenior engineer.",
        )
        .unwrap();

        let candidate = extract_candidate(&path).unwrap();
        assert_eq!(candidate.name.as_deref(), Some("Jane Doe"));
        assert_eq!(candidate.email.as_deref(), Some("jane@example.com"));
        assert_eq!(candidate.phone.as_deref(), Some("555-123-4567"));
    }

    #[test]
    fn test_empty_text_resume_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        fs::write(&path, "   \n\n  ").unwrap();

        let err = extract_candidate(&path).unwrap_err();
        assert!(matches!(err, ResumeError::EmptyDocument));
    }

    #[test]
    fn test_pdf_magic_check_rejects_masquerading_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"this is not a pdf at all").unwrap();

        let err = extract_candidate(&path).unwrap_err();
        assert!(matches!(err, ResumeError::ExtractionFailed(_)));
    }
}
