//! Input documents.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RfpxError};

/// Kind of document the pipeline can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Html,
}

impl DocumentType {
    /// Resolve a type from a file extension (case-insensitive, without dot).
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "html" | "htm" => Ok(Self::Html),
            other => Err(RfpxError::UnsupportedFormat(if other.is_empty() {
                "(no extension)".to_string()
            } else {
                other.to_string()
            })),
        }
    }

    /// Resolve a type from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(extension)
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Raw document bytes with their type.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Display name (usually the file name).
    pub name: String,
    /// Document type discriminator.
    pub document_type: DocumentType,
    /// File contents.
    pub data: Vec<u8>,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, document_type: DocumentType, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            document_type,
            data,
        }
    }

    /// Read a document from disk, typing it by extension.
    ///
    /// The type is resolved before the file is read, so an unsupported file
    /// fails without touching the filesystem.
    pub fn from_path(path: &Path) -> Result<Self> {
        let document_type = DocumentType::from_path(path)?;
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self::new(name, document_type, data))
    }
}

/// Where stage one gets its document from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// A file on disk, typed by extension.
    Path(PathBuf),
    /// Bytes already in memory.
    Raw(RawDocument),
}

impl DocumentSource {
    /// Path of the source, if it came from disk.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Raw(_) => None,
        }
    }

    /// Name used in logs and reports.
    pub fn label(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Raw(document) => document.name.clone(),
        }
    }

    /// Load the document, reading from disk if needed.
    pub fn load(self) -> Result<RawDocument> {
        match self {
            Self::Path(path) => RawDocument::from_path(&path),
            Self::Raw(document) => Ok(document),
        }
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<RawDocument> for DocumentSource {
    fn from(document: RawDocument) -> Self {
        Self::Raw(document)
    }
}
