use super::error::ClientError;
use async_trait::async_trait;

pub const PLAIN_TEXT_MIME: &str = "text/plain";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A file picked by the user
#[derive(Debug, Clone)]
pub struct ImportedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    PlainText,
    RichDocument,
}

impl FileKind {
    /// Classify by MIME type, ignoring parameters such as `charset`
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(PLAIN_TEXT_MIME) {
            Some(FileKind::PlainText)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Some(FileKind::RichDocument)
        } else {
            None
        }
    }
}

/// Extracts paragraph text from rich documents
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, ClientError>;
}

/// Turn an imported file into text for the input field
pub async fn extract_text(
    file: &ImportedFile,
    extractor: &dyn DocumentExtractor,
) -> Result<String, ClientError> {
    let kind = FileKind::from_mime(&file.mime)
        .ok_or_else(|| ClientError::UnsupportedFileType(file.mime.clone()))?;

    tracing::debug!(
        file_name = %file.name,
        kind = ?kind,
        size_bytes = file.bytes.len(),
        "Importing text from file"
    );

    match kind {
        FileKind::PlainText => String::from_utf8(file.bytes.clone())
            .map_err(|e| ClientError::FileRead(e.to_string())),
        FileKind::RichDocument => {
            let paragraphs = extractor.paragraphs(&file.bytes).await?;
            Ok(paragraphs.join("\n"))
        }
    }
}
