//! Text extraction for uploaded documents (PDF, DOCX, plain text).
//!
//! Upload handlers supply raw bytes plus a format tag derived from the file
//! extension; this module returns the full extracted text as one string.
//! Binary formats are written to a scoped temporary file first and the
//! format-specific extractor runs over that path. The temp file is removed
//! on every exit path (`NamedTempFile` deletes on drop).

use std::io::Write;

/// Formats the loader knows how to extract.
pub const SUPPORTED_FORMATS: &[&str] = &["pdf", "docx", "txt"];

/// Extraction error. Loader failures are reported to the caller; nothing
/// here panics on malformed input.
#[derive(Debug)]
pub enum LoadError {
    UnsupportedFormat(String),
    Decode(String),
    Pdf(String),
    Docx(String),
    Io(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::UnsupportedFormat(tag) => {
                write!(
                    f,
                    "unsupported file type: {} (supported: {})",
                    tag,
                    SUPPORTED_FORMATS.join(", ")
                )
            }
            LoadError::Decode(e) => write!(f, "text decoding failed: {}", e),
            LoadError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            LoadError::Docx(e) => write!(f, "DOCX extraction failed: {}", e),
            LoadError::Io(e) => write!(f, "I/O error during extraction: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

/// Lowercased extension of an uploaded filename, used as the format tag.
pub fn format_tag(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Extracts plain text from uploaded bytes given a format tag.
pub fn extract_text(bytes: &[u8], format: &str) -> Result<String, LoadError> {
    match format {
        "pdf" => extract_pdf(bytes),
        "docx" => extract_docx(bytes),
        "txt" => extract_txt(bytes),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn extract_txt(bytes: &[u8]) -> Result<String, LoadError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| LoadError::Decode(e.to_string()))
}

/// Writes bytes to a scoped temp file with the given suffix. The file is
/// deleted when the returned handle drops, including on error paths.
fn spool_to_temp(bytes: &[u8], suffix: &str) -> Result<tempfile::NamedTempFile, LoadError> {
    let mut temp = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .map_err(|e| LoadError::Io(e.to_string()))?;
    temp.write_all(bytes)
        .map_err(|e| LoadError::Io(e.to_string()))?;
    temp.flush().map_err(|e| LoadError::Io(e.to_string()))?;
    Ok(temp)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, LoadError> {
    let temp = spool_to_temp(bytes, ".pdf")?;
    // pdf-extract inserts blank lines between pages.
    pdf_extract::extract_text(temp.path()).map_err(|e| LoadError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, LoadError> {
    let temp = spool_to_temp(bytes, ".docx")?;
    let file = std::fs::File::open(temp.path()).map_err(|e| LoadError::Io(e.to_string()))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| LoadError::Docx(e.to_string()))?;
    let mut doc_xml = Vec::new();
    {
        use std::io::Read;
        let mut entry = archive
            .by_name("word/document.xml")
            .map_err(|_| LoadError::Docx("word/document.xml not found".to_string()))?;
        entry
            .read_to_end(&mut doc_xml)
            .map_err(|e| LoadError::Docx(e.to_string()))?;
    }
    extract_docx_paragraphs(&doc_xml)
}

/// Walks `word/document.xml`, concatenating `<w:t>` runs and separating
/// paragraphs (`<w:p>`) with blank lines.
fn extract_docx_paragraphs(xml: &[u8]) -> Result<String, LoadError> {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(quick_xml::events::Event::Text(te)) if in_text_run => {
                let text = te
                    .unescape()
                    .map_err(|e| LoadError::Docx(e.to_string()))?;
                current.push_str(text.as_ref());
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(current.trim().to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(LoadError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    if !current.trim().is_empty() {
        paragraphs.push(current.trim().to_string());
    }
    Ok(paragraphs.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file(
                "word/document.xml",
                zip::write::SimpleFileOptions::default(),
            )
            .unwrap();
            let body: String = paragraphs
                .iter()
                .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
                .collect();
            let xml = format!(
                "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
                body
            );
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn unsupported_format_returns_error() {
        let err = extract_text(b"data", "xyz").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn txt_decodes_utf8() {
        let text = extract_text("héllo world".as_bytes(), "txt").unwrap();
        assert_eq!(text, "héllo world");
    }

    #[test]
    fn txt_rejects_invalid_utf8() {
        let err = extract_text(&[0xff, 0xfe, 0x00], "txt").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let err = extract_text(b"not a pdf", "pdf").unwrap_err();
        assert!(matches!(err, LoadError::Pdf(_)));
    }

    #[test]
    fn invalid_zip_returns_error_for_docx() {
        let err = extract_text(b"not a zip", "docx").unwrap_err();
        assert!(matches!(err, LoadError::Docx(_)));
    }

    #[test]
    fn docx_extracts_text_with_paragraph_separators() {
        let bytes = docx_with_paragraphs(&["First paragraph.", "Second paragraph."]);
        let text = extract_text(&bytes, "docx").unwrap();
        assert_eq!(text, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn docx_with_unknown_entity_fails() {
        let bytes = docx_with_paragraphs(&["bad &notanentity; run"]);
        let err = extract_text(&bytes, "docx").unwrap_err();
        assert!(matches!(err, LoadError::Docx(_)));
    }

    #[test]
    fn docx_without_document_xml_fails() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = extract_text(&buf, "docx").unwrap_err();
        assert!(matches!(err, LoadError::Docx(_)));
    }

    #[test]
    fn format_tag_lowercases_extension() {
        assert_eq!(format_tag("Report.PDF").as_deref(), Some("pdf"));
        assert_eq!(format_tag("notes.txt").as_deref(), Some("txt"));
        assert_eq!(format_tag("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(format_tag("noextension"), None);
        assert_eq!(format_tag("trailingdot."), None);
    }
}
