//! @acp:module "Content"
//! @acp:summary "Content types and documents under validation"
//! @acp:domain gate
//! @acp:layer model
//!
//! Content types and the immutable document handed to the gate.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// Kind of generated prose being validated
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Raw research dump for a race
    Research,
    /// Short race brief
    Brief,
    /// Long-form athlete guide
    Guide,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [
        ContentType::Research,
        ContentType::Brief,
        ContentType::Guide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Research => "research",
            ContentType::Brief => "brief",
            ContentType::Guide => "guide",
        }
    }

    /// Infer the content type from a file name such as `unbound-200.research.md`.
    ///
    /// Only the file name is inspected; directories are ignored so that a guide
    /// stored under `research/` is still classified by its own name.
    pub fn infer_from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        Self::ALL.into_iter().find(|ct| name.contains(ct.as_str()))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "research" => Ok(ContentType::Research),
            "brief" => Ok(ContentType::Brief),
            "guide" => Ok(ContentType::Guide),
            other => Err(GateError::UnknownContentType(other.to_string())),
        }
    }
}

/// A piece of generated prose submitted for validation.
///
/// Checks only ever borrow the document; nothing in the gate mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    text: String,
    content_type: ContentType,
}

impl ContentDocument {
    pub fn new(text: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            text: text.into(),
            content_type,
        }
    }

    /// Document standing in for a missing input
    pub fn empty(content_type: ContentType) -> Self {
        Self::new(String::new(), content_type)
    }

    /// Read a document from disk. A missing or unreadable file becomes an
    /// empty document, which then fails the critical content check.
    pub fn read_or_empty(path: &Path, content_type: ContentType) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::new(text, content_type),
            Err(e) => {
                tracing::warn!("Evaluating {} as empty: {}", path.display(), e);
                Self::empty(content_type)
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parse() {
        assert_eq!("research".parse::<ContentType>().unwrap(), ContentType::Research);
        assert_eq!(" Guide ".parse::<ContentType>().unwrap(), ContentType::Guide);
        assert_eq!("BRIEF".parse::<ContentType>().unwrap(), ContentType::Brief);
        assert!("newsletter".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_infer_from_path_uses_file_name() {
        assert_eq!(
            ContentType::infer_from_path(Path::new("research/unbound.guide.md")),
            Some(ContentType::Guide)
        );
        assert_eq!(
            ContentType::infer_from_path(Path::new("out/leadville-brief.md")),
            Some(ContentType::Brief)
        );
        assert_eq!(ContentType::infer_from_path(Path::new("notes.md")), None);
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = ContentDocument::read_or_empty(&dir.path().join("gone.md"), ContentType::Guide);
        assert!(doc.is_blank());
        assert_eq!(doc.content_type(), ContentType::Guide);
    }

    #[test]
    fn test_blank_document() {
        assert!(ContentDocument::new("  \n\t", ContentType::Brief).is_blank());
        assert!(!ContentDocument::new("x", ContentType::Brief).is_blank());
    }
}
