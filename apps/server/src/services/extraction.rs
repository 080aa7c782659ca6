//! Text extraction from uploaded report documents.
//!
//! The format is detected from the file name's extension. Plain-text
//! formats are decoded as lossy UTF-8; PDF and DOCX go through their own
//! extractors.

use std::io::Cursor;
use std::path::Path;

use crate::error::AppError;

/// Maximum extracted text length (100KB).
pub const MAX_EXTRACT_BYTES: usize = 100_000;

/// Document formats accepted by the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// .txt, .md, .csv, .json
    PlainText,
    Pdf,
    Docx,
    Unsupported,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported document format: .{0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        AppError::InvalidInput(e.to_string())
    }
}

fn extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Detect the document format from a file name.
pub fn detect_format(file_name: &str) -> DocumentFormat {
    match extension(file_name).as_str() {
        "txt" | "md" | "csv" | "json" => DocumentFormat::PlainText,
        "pdf" => DocumentFormat::Pdf,
        "docx" => DocumentFormat::Docx,
        _ => DocumentFormat::Unsupported,
    }
}

/// Extract text from an in-memory document, truncated to [`MAX_EXTRACT_BYTES`].
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let raw = match detect_format(file_name) {
        DocumentFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::Unsupported => {
            let ext = extension(file_name);
            return Err(ExtractError::UnsupportedFormat(if ext.is_empty() {
                "unknown".to_string()
            } else {
                ext
            }));
        }
    };

    Ok(truncate_text(raw, MAX_EXTRACT_BYTES))
}

/// Run [`extract_text`] on the blocking pool.
///
/// PDF and DOCX parsing is synchronous CPU work on buffers up to the upload
/// limit and must not occupy an actix worker thread.
pub async fn extract_text_blocking(
    file_name: String,
    bytes: Vec<u8>,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extract_text(&file_name, &bytes))
        .await
        .map_err(|e| AppError::Storage(format!("Extraction task failed: {}", e)))?
        .map_err(AppError::from)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract can panic on malformed PDFs.
    let owned = bytes.to_vec();
    let result = std::panic::catch_unwind(move || pdf_extract::extract_text_from_mem(&owned));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::ExtractionFailed(format!("PDF: {}", e))),
        Err(_) => Err(ExtractError::ExtractionFailed(
            "PDF extraction panicked (malformed file)".to_string(),
        )),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    use quick_xml::events::Event;

    // A DOCX is a ZIP archive; the body lives in word/document.xml as <w:t> runs.
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::ExtractionFailed(format!("DOCX zip: {}", e)))?;

    let doc = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::ExtractionFailed(format!("DOCX missing document.xml: {}", e)))?;

    let mut reader = quick_xml::Reader::from_reader(std::io::BufReader::new(doc));
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text_tag = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_tag = true,
                b"p" if !text.is_empty() && !text.ends_with('\n') => text.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"t" => in_text_tag = false,
            Ok(Event::Text(ref e)) if in_text_tag => {
                if let Ok(s) = e.unescape() {
                    text.push_str(&s);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::ExtractionFailed(format!("DOCX XML: {}", e)));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

fn truncate_text(mut text: String, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text
}
