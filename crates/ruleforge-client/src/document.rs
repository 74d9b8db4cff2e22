// crates/ruleforge-client/src/document.rs
// ============================================================================
// Module: Source Documents
// Description: PDF documents selected for upload and their cache identity.
// Purpose: Accept only PDFs and detect when the selection changes.
// Dependencies: sha2
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;

use sha2::Digest;
use sha2::Sha256;

use crate::pipeline::RunError;

/// Accepted document extension (compared case-insensitively).
const PDF_EXTENSION: &str = ".pdf";

/// A PDF selected for upload.
///
/// # Invariants
/// - `file_name` ends with `.pdf` (any case).
#[derive(Clone, PartialEq, Eq)]
pub struct PdfDocument {
    /// File name sent with the upload.
    file_name: String,
    /// Document bytes.
    bytes: Vec<u8>,
}

impl PdfDocument {
    /// Wraps in-memory document bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::NotPdf`] when the name lacks a `.pdf` extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, RunError> {
        let file_name = file_name.into();
        if !file_name.to_ascii_lowercase().ends_with(PDF_EXTENSION) {
            return Err(RunError::NotPdf(file_name));
        }
        Ok(Self {
            file_name,
            bytes,
        })
    }

    /// Reads a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the path is not a PDF or cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, RunError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| RunError::NotPdf(path.display().to_string()))?;
        if !file_name.to_ascii_lowercase().ends_with(PDF_EXTENSION) {
            return Err(RunError::NotPdf(file_name));
        }
        let bytes = fs::read(path)
            .map_err(|err| RunError::Io(format!("{}: {err}", path.display())))?;
        Self::new(file_name, bytes)
    }

    /// Returns the file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the document bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the cache identity over the bytes and file name.
    #[must_use]
    pub fn identity(&self) -> DocumentId {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hasher.update([0]);
        hasher.update(self.file_name.as_bytes());
        DocumentId(hasher.finalize().into())
    }
}

impl fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfDocument")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// SHA-256 identity of a selected document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId([u8; 32]);
