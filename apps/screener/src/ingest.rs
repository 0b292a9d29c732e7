//! Text Source Adapter — turns uploaded document bytes into plain text.
//!
//! `DocumentTextSource` handles PDFs (via `pdf-extract`) and plain text.
//! PDF parsing is CPU-bound, so it runs inside `tokio::task::spawn_blocking`.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Source of document text. Carried in `AppState` as `Arc<dyn TextSource>`.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, AppError>;
}

pub struct DocumentTextSource;

#[async_trait]
impl TextSource for DocumentTextSource {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, AppError> {
        if !is_pdf(&bytes) {
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        let pages = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    AppError::TextSource("PDF parser panicked".to_string())
                } else {
                    AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
                }
            })?
            .map_err(|e| AppError::TextSource(format!("unreadable PDF: {e}")))?;

        Ok(join_pages(pages.iter().map(String::as_str)))
    }
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Concatenates page texts, skipping blank pages, each page followed by a newline.
pub fn join_pages<'a, I>(pages: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .fold(String::new(), |mut out, page| {
            out.push_str(page);
            out.push('\n');
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_skips_blank_pages() {
        assert_eq!(join_pages(["Page one", "   ", "", "Page two"]), "Page one\nPage two\n");
    }

    #[test]
    fn test_join_pages_empty() {
        assert_eq!(join_pages(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_pdf_magic_detection() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(!is_pdf(b"Jane Doe, Python developer"));
        assert!(!is_pdf(b""));
    }

    #[tokio::test]
    async fn test_plain_text_passthrough() {
        let text = DocumentTextSource
            .extract_text(Bytes::from_static("Python, SQL — ₹5,00,000".as_bytes()))
            .await
            .unwrap();
        assert_eq!(text, "Python, SQL — ₹5,00,000");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_lossy() {
        let text = DocumentTextSource
            .extract_text(Bytes::from_static(b"Python \xff SQL"))
            .await
            .unwrap();
        assert!(text.starts_with("Python ") && text.ends_with(" SQL"));
    }

    #[tokio::test]
    async fn test_pdf_pages_are_kept_apart() {
        // Three pages: "Python", a blank page, "Django".
        let pdf = include_bytes!("../fixtures/three_pages.pdf");
        let text = DocumentTextSource
            .extract_text(Bytes::from_static(pdf))
            .await
            .unwrap();
        assert!(text.contains("Python") && text.contains("Django"), "{text:?}");
        assert!(!text.contains("PythonDjango"), "{text:?}");
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_text_source_error() {
        let err = DocumentTextSource
            .extract_text(Bytes::from_static(b"%PDF-1.4\nthis is not a real pdf"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "TEXT_SOURCE_ERROR");
    }
}
