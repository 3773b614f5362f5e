//! The document assembly store.
//!
//! Holds the flat page order (authoritative for submission), the document
//! order, and the rotation annotations. Two projections are derived from it:
//!
//! - **Pages view**: the flat order as-is.
//! - **Documents view**: pages grouped under their owning document, in
//!   document order, each block listed in flat order.
//!
//! Page drags only touch the flat order, so after one the flat order may
//! interleave documents. A document drag re-derives the flat order from the
//! document order, and each block is put back into ingestion order. Page
//! shuffles made before a document drag do not survive it.
//!
//! Every operation here is synchronous and leaves all three structures
//! consistent when it returns.

use std::collections::HashMap;
use tracing::debug;

use super::page::{Document, DocumentKey, Page, PageId, Rotation};
use super::session::ViewMode;
use crate::backend::ManifestEntry;
use crate::ingest::IngestedDocument;

/// Pages of one document, as shown in the documents view.
#[derive(Debug)]
pub struct DocumentGroup<'a> {
    pub document: &'a Document,
    pub pages: Vec<&'a Page>,
}

/// Projection of the store for one view mode.
#[derive(Debug)]
pub enum AssemblyView<'a> {
    Pages(Vec<&'a Page>),
    Documents(Vec<DocumentGroup<'a>>),
}

#[derive(Debug, Default)]
pub struct AssemblyStore {
    pages: Vec<Page>,
    documents: Vec<Document>,
    rotations: HashMap<PageId, Rotation>,
    /// Page counter, never reset so ids stay unique across `clear()`
    next_page_seq: u64,
    next_upload_seq: u64,
}

impl AssemblyStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Pages in flat (output) order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Documents in document order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.documents.is_empty()
    }

    /// Rotation of a page, `R0` when never rotated.
    pub fn rotation(&self, id: &PageId) -> Rotation {
        self.rotations.get(id).copied().unwrap_or_default()
    }

    /// Whether a rotation entry exists for the page (even one back at 0).
    pub fn has_rotation_entry(&self, id: &PageId) -> bool {
        self.rotations.contains_key(id)
    }

    pub fn rotation_entries(&self) -> usize {
        self.rotations.len()
    }

    fn position(&self, id: &PageId) -> Option<usize> {
        self.pages.iter().position(|p| &p.id == id)
    }

    /// Pages grouped by document, following document order.
    pub fn grouped(&self) -> Vec<DocumentGroup<'_>> {
        self.documents
            .iter()
            .map(|document| DocumentGroup {
                document,
                pages: self
                    .pages
                    .iter()
                    .filter(|p| p.document == document.key)
                    .collect(),
            })
            .collect()
    }

    pub fn view(&self, mode: ViewMode) -> AssemblyView<'_> {
        match mode {
            ViewMode::Pages => AssemblyView::Pages(self.pages.iter().collect()),
            ViewMode::Documents => AssemblyView::Documents(self.grouped()),
        }
    }

    /// True when the flat order is exactly the documents' blocks
    /// concatenated in document order.
    pub fn is_grouped(&self) -> bool {
        let mut flat = self.pages.iter();
        for group in self.grouped() {
            for page in group.pages {
                if flat.next().map(|p| &p.id) != Some(&page.id) {
                    return false;
                }
            }
        }
        flat.next().is_none()
    }

    /// Submission manifest in flat order, unrotated pages reported as 0.
    pub fn manifest(&self) -> Vec<ManifestEntry> {
        self.pages
            .iter()
            .map(|p| ManifestEntry {
                source_pdf: p.document.name.clone(),
                page_number: p.page_number,
                unique_id: p.id.as_str().to_string(),
                rotation: self.rotation(&p.id).degrees(),
            })
            .collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Stage a freshly ingested document and its pages at the end.
    pub fn append(&mut self, ingested: IngestedDocument) -> DocumentKey {
        let key = DocumentKey {
            name: ingested.document_name,
            upload_seq: self.next_upload_seq,
        };
        self.next_upload_seq += 1;

        let millis = crate::util::unix_millis();
        let page_total = ingested.pages.len();
        for entry in ingested.pages {
            let seq = self.next_page_seq;
            self.next_page_seq += 1;
            self.pages.push(Page {
                id: PageId::generate(&key.name, entry.page_number, millis, seq),
                page_number: entry.page_number,
                image_data: entry.image_data,
                width: entry.width,
                height: entry.height,
                document: key.clone(),
                seq,
            });
        }

        self.documents.push(Document {
            key: key.clone(),
            page_count: ingested.page_count,
            metadata: ingested.metadata,
        });

        debug!("Appended {} ({} pages)", key.name, page_total);
        key
    }

    /// Move `dragged` into the slot `target` occupies, shifting the pages
    /// in between. Dragged forward, it lands after the target; dragged
    /// backward, before it. Document order is untouched.
    pub fn reorder_page(&mut self, dragged: &PageId, target: &PageId) -> bool {
        let (Some(from), Some(to)) = (self.position(dragged), self.position(target)) else {
            return false;
        };
        if from == to {
            return false;
        }

        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        debug!("Moved page {} from {} to {}", dragged, from, to);
        true
    }

    /// Move the document at `from` to `to`, then rebuild the flat page
    /// order from the new document order.
    pub fn reorder_document(&mut self, from: usize, to: usize) -> bool {
        let len = self.documents.len();
        if from == to || from >= len || to >= len {
            return false;
        }

        let document = self.documents.remove(from);
        debug!("Moved document {} from {} to {}", document.name(), from, to);
        self.documents.insert(to, document);
        self.rederive_page_order();
        true
    }

    /// Rebuild the flat order block by block. Reuses the existing pages.
    fn rederive_page_order(&mut self) {
        let mut pages = std::mem::take(&mut self.pages);
        pages.sort_by_key(|p| p.seq);

        let mut by_document: HashMap<DocumentKey, Vec<Page>> = HashMap::new();
        for page in pages {
            by_document.entry(page.document.clone()).or_default().push(page);
        }

        let mut ordered = Vec::with_capacity(by_document.values().map(Vec::len).sum());
        for document in &self.documents {
            if let Some(block) = by_document.remove(&document.key) {
                ordered.extend(block);
            }
        }

        // Orphans cannot occur through the public API; keep them rather than drop pages
        let mut orphans: Vec<Page> = by_document.into_values().flatten().collect();
        orphans.sort_by_key(|p| p.seq);
        ordered.extend(orphans);

        self.pages = ordered;
    }

    /// Remove a single page and its rotation entry.
    pub fn remove_page(&mut self, id: &PageId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.pages.remove(index);
        self.rotations.remove(id);
        debug!("Removed page {}", id);
        true
    }

    /// Remove every document with this name, cascading to its pages and
    /// their rotation entries.
    pub fn remove_document(&mut self, name: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.key.name != name);
        if self.documents.len() == before {
            return false;
        }

        let rotations = &mut self.rotations;
        self.pages.retain(|p| {
            let keep = p.document.name != name;
            if !keep {
                rotations.remove(&p.id);
            }
            keep
        });
        debug!("Removed document {}", name);
        true
    }

    /// Advance a page's rotation by 90 degrees. `None` for unknown pages.
    pub fn rotate_page(&mut self, id: &PageId) -> Option<Rotation> {
        if self.position(id).is_none() {
            return None;
        }
        let rotation = self.rotations.entry(id.clone()).or_default();
        *rotation = rotation.next();
        debug!("Rotated page {} to {}", id, rotation.degrees());
        Some(*rotation)
    }

    /// Empty pages, documents and rotations together.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.documents.clear();
        self.rotations.clear();
        debug!("Cleared assembly");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::PageManifestEntry;

    pub(crate) fn ingested(name: &str, pages: u32) -> IngestedDocument {
        IngestedDocument {
            document_name: name.to_string(),
            metadata: serde_json::json!({ "title": name }),
            page_count: pages as usize,
            pages: (1..=pages)
                .map(|n| PageManifestEntry {
                    page_number: n,
                    image_data: format!("data:image/png;base64,{name}{n}"),
                    width: 600,
                    height: 800,
                })
                .collect(),
        }
    }

    fn labels(store: &AssemblyStore) -> Vec<String> {
        store.pages().iter().map(Page::label).collect()
    }

    fn id_of(store: &AssemblyStore, label: &str) -> PageId {
        store
            .pages()
            .iter()
            .find(|p| p.label() == label)
            .map(|p| p.id().clone())
            .unwrap()
    }

    fn sorted_ids(store: &AssemblyStore) -> Vec<PageId> {
        let mut ids: Vec<_> = store.pages().iter().map(|p| p.id().clone()).collect();
        ids.sort();
        ids
    }

    fn two_documents() -> AssemblyStore {
        let mut store = AssemblyStore::new();
        store.append(ingested("a.pdf", 2));
        store.append(ingested("b.pdf", 1));
        store
    }

    #[test]
    fn test_append_builds_flat_order() {
        let store = two_documents();
        assert_eq!(labels(&store), vec!["a.pdf:1", "a.pdf:2", "b.pdf:1"]);
        assert_eq!(store.document_count(), 2);
        assert_eq!(store.documents()[0].page_count(), 2);
        assert!(store.is_grouped());
    }

    #[test]
    fn test_same_filename_twice_gets_unique_ids() {
        let mut store = AssemblyStore::new();
        store.append(ingested("a.pdf", 2));
        store.append(ingested("a.pdf", 2));

        let mut ids = sorted_ids(&store);
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_reorder_page_backward() {
        let mut store = two_documents();
        let b1 = id_of(&store, "b.pdf:1");
        let a1 = id_of(&store, "a.pdf:1");

        assert!(store.reorder_page(&b1, &a1));
        assert_eq!(labels(&store), vec!["b.pdf:1", "a.pdf:1", "a.pdf:2"]);
        // Document order untouched
        assert_eq!(store.documents()[0].name(), "a.pdf");
    }

    #[test]
    fn test_reorder_page_forward_takes_target_slot() {
        let mut store = two_documents();
        let a1 = id_of(&store, "a.pdf:1");
        let b1 = id_of(&store, "b.pdf:1");

        // Dropping onto the last page moves the dragged page to the end
        assert!(store.reorder_page(&a1, &b1));
        assert_eq!(labels(&store), vec!["a.pdf:2", "b.pdf:1", "a.pdf:1"]);
    }

    #[test]
    fn test_reorder_page_onto_right_neighbour_swaps() {
        let mut store = two_documents();
        let a1 = id_of(&store, "a.pdf:1");
        let a2 = id_of(&store, "a.pdf:2");

        assert!(store.reorder_page(&a1, &a2));
        assert_eq!(labels(&store), vec!["a.pdf:2", "a.pdf:1", "b.pdf:1"]);
    }

    #[test]
    fn test_reorder_page_noops() {
        let mut store = two_documents();
        let a1 = id_of(&store, "a.pdf:1");
        let missing = PageId::from("nope");

        assert!(!store.reorder_page(&a1, &a1));
        assert!(!store.reorder_page(&a1, &missing));
        assert!(!store.reorder_page(&missing, &a1));
        assert_eq!(labels(&store), vec!["a.pdf:1", "a.pdf:2", "b.pdf:1"]);
    }

    #[test]
    fn test_reorder_page_sequence_preserves_pages() {
        let mut store = AssemblyStore::new();
        store.append(ingested("a.pdf", 4));
        store.append(ingested("b.pdf", 3));
        let before = sorted_ids(&store);

        let ids: Vec<PageId> = store.pages().iter().map(|p| p.id().clone()).collect();
        for (i, dragged) in ids.iter().enumerate() {
            let target = &ids[(i * 3 + 2) % ids.len()];
            store.reorder_page(dragged, target);
        }

        assert_eq!(sorted_ids(&store), before);
    }

    #[test]
    fn test_reorder_document_moves_block() {
        let mut store = two_documents();
        assert!(store.reorder_document(1, 0));
        assert_eq!(labels(&store), vec!["b.pdf:1", "a.pdf:1", "a.pdf:2"]);
        assert_eq!(store.documents()[0].name(), "b.pdf");
        assert!(store.is_grouped());
    }

    #[test]
    fn test_reorder_document_discards_page_shuffles() {
        let mut store = AssemblyStore::new();
        store.append(ingested("a.pdf", 2));
        store.append(ingested("b.pdf", 2));
        store.append(ingested("c.pdf", 1));

        // Shuffle within a and interleave b into a's block
        let a1 = id_of(&store, "a.pdf:1");
        let a2 = id_of(&store, "a.pdf:2");
        let b2 = id_of(&store, "b.pdf:2");
        store.reorder_page(&a2, &a1);
        store.reorder_page(&b2, &a1);
        assert!(!store.is_grouped());

        assert!(store.reorder_document(2, 0));
        assert_eq!(
            labels(&store),
            vec!["c.pdf:1", "a.pdf:1", "a.pdf:2", "b.pdf:1", "b.pdf:2"]
        );
        assert!(store.is_grouped());
    }

    #[test]
    fn test_reorder_document_noops() {
        let mut store = two_documents();
        let a1 = id_of(&store, "a.pdf:1");
        let a2 = id_of(&store, "a.pdf:2");
        store.reorder_page(&a2, &a1);

        assert!(!store.reorder_document(1, 1));
        assert!(!store.reorder_document(0, 2));
        assert!(!store.reorder_document(5, 0));
        // A no-op must not re-derive either
        assert_eq!(labels(&store), vec!["a.pdf:2", "a.pdf:1", "b.pdf:1"]);
    }

    #[test]
    fn test_duplicate_names_stay_separate_blocks() {
        let mut store = AssemblyStore::new();
        store.append(ingested("a.pdf", 1));
        store.append(ingested("b.pdf", 1));
        store.append(ingested("a.pdf", 1));

        assert!(store.reorder_document(2, 0));
        assert_eq!(store.page_count(), 3);
        assert_eq!(labels(&store), vec!["a.pdf:1", "a.pdf:1", "b.pdf:1"]);
        assert!(store.is_grouped());
    }

    #[test]
    fn test_rotate_and_remove_page() {
        let mut store = two_documents();
        let a1 = id_of(&store, "a.pdf:1");

        store.rotate_page(&a1);
        assert_eq!(store.rotate_page(&a1), Some(Rotation::R180));
        assert_eq!(store.rotation(&a1).degrees(), 180);

        assert!(store.remove_page(&a1));
        assert!(!store.has_rotation_entry(&a1));
        assert_eq!(labels(&store), vec!["a.pdf:2", "b.pdf:1"]);
        assert_eq!(store.document_count(), 2);
    }

    #[test]
    fn test_rotate_four_times_returns_to_zero() {
        let mut store = two_documents();
        let b1 = id_of(&store, "b.pdf:1");
        for _ in 0..4 {
            store.rotate_page(&b1);
        }
        assert_eq!(store.rotation(&b1), Rotation::R0);
    }

    #[test]
    fn test_rotate_unknown_page_is_noop() {
        let mut store = two_documents();
        assert_eq!(store.rotate_page(&PageId::from("ghost")), None);
        assert_eq!(store.rotation_entries(), 0);
    }

    #[test]
    fn test_remove_document_cascades() {
        let mut store = two_documents();
        let a1 = id_of(&store, "a.pdf:1");
        let b1 = id_of(&store, "b.pdf:1");
        store.rotate_page(&a1);
        store.rotate_page(&b1);

        assert!(store.remove_document("a.pdf"));
        assert!(store.pages().iter().all(|p| p.document_name() != "a.pdf"));
        assert!(!store.has_rotation_entry(&a1));
        assert!(store.has_rotation_entry(&b1));
        assert_eq!(store.document_count(), 1);

        assert!(!store.remove_document("a.pdf"));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut store = two_documents();
        let a1 = id_of(&store, "a.pdf:1");
        store.rotate_page(&a1);

        store.clear();
        assert!(store.is_empty());
        assert!(store.pages().is_empty());
        assert!(store.documents().is_empty());
        assert_eq!(store.rotation_entries(), 0);

        // Ids keep counting after a clear
        store.append(ingested("a.pdf", 1));
        assert_ne!(store.pages()[0].id(), &a1);
    }

    #[test]
    fn test_manifest_carries_rotation() {
        let mut store = two_documents();
        let a2 = id_of(&store, "a.pdf:2");
        store.rotate_page(&a2);

        let manifest = store.manifest();
        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest[0].rotation, 0);
        assert_eq!(manifest[1].source_pdf, "a.pdf");
        assert_eq!(manifest[1].page_number, 2);
        assert_eq!(manifest[1].unique_id, a2.as_str());
        assert_eq!(manifest[1].rotation, 90);
    }

    #[test]
    fn test_grouped_view_follows_flat_order() {
        let mut store = two_documents();
        let a1 = id_of(&store, "a.pdf:1");
        let a2 = id_of(&store, "a.pdf:2");
        store.reorder_page(&a2, &a1);

        let AssemblyView::Documents(groups) = store.view(ViewMode::Documents) else {
            panic!("expected documents view");
        };
        assert_eq!(groups.len(), 2);
        let first: Vec<u32> = groups[0].pages.iter().map(|p| p.page_number()).collect();
        assert_eq!(first, vec![2, 1]);

        let AssemblyView::Pages(pages) = store.view(ViewMode::Pages) else {
            panic!("expected pages view");
        };
        assert_eq!(pages.len(), 3);
    }
}
