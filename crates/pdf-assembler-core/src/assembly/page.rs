use serde::Serialize;
use std::fmt;

/// Unique identity of a staged page.
///
/// Built from the owning document name, the page number, a millisecond
/// timestamp and a store-wide counter, so uploading the same file twice
/// never produces colliding ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(crate) fn generate(document: &str, page_number: u32, millis: u128, counter: u64) -> Self {
        Self(format!("{document}-page-{page_number}-{millis}-{counter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Reference from a page to the upload it came from.
///
/// `upload_seq` keeps two uploads of the same filename apart when
/// regrouping pages by document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub name: String,
    pub upload_seq: u64,
}

/// Rotation annotation, advanced a quarter turn at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Next clockwise quarter turn (270 wraps to 0).
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::R0 => Self::R90,
            Self::R90 => Self::R180,
            Self::R180 => Self::R270,
            Self::R270 => Self::R0,
        }
    }

    pub const fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }
}

/// One rendered page drawn from a source document.
///
/// Immutable once staged; rotation lives in the store's annotation map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub(crate) id: PageId,
    pub(crate) page_number: u32,
    pub(crate) image_data: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) document: DocumentKey,
    /// Ingestion order across the whole session
    pub(crate) seq: u64,
}

impl Page {
    pub const fn id(&self) -> &PageId {
        &self.id
    }

    /// 1-based page number within the source document
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Encoded preview image (typically a `data:image/png;base64,...` URL)
    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Name of the owning document
    pub fn document_name(&self) -> &str {
        &self.document.name
    }

    pub const fn document_key(&self) -> &DocumentKey {
        &self.document
    }

    /// Short label such as `a.pdf:2`
    pub fn label(&self) -> String {
        format!("{}:{}", self.document.name, self.page_number)
    }
}

/// One uploaded source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) key: DocumentKey,
    pub(crate) page_count: usize,
    pub(crate) metadata: serde_json::Value,
}

impl Document {
    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub const fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// Page count reported by the backend at upload time
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// Opaque metadata bag as returned by the backend
    pub const fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycle() {
        let mut r = Rotation::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            r = r.next();
            seen.push(r.degrees());
        }
        assert_eq!(seen, vec![90, 180, 270, 0]);
    }

    #[test]
    fn test_generated_id_format() {
        let id = PageId::generate("a.pdf", 3, 1_700_000_000_000, 7);
        assert_eq!(id.as_str(), "a.pdf-page-3-1700000000000-7");
    }
}
