//! Drag-and-drop as explicit events.
//!
//! A UI translates its pointer callbacks into [`DragEvent`]s and feeds them
//! to [`DragState::handle`]. The drop dispatches to the store's page or
//! document reorder depending on what was picked up.

use tracing::debug;

use super::page::PageId;
use super::store::AssemblyStore;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSubject {
    Page(PageId),
    /// Index into the document order
    Document(usize),
}

/// What the subject is dragged over or dropped on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Page(PageId),
    Document(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start { subject: DragSubject },
    Over { target: DropTarget },
    Drop { target: DropTarget },
    Cancel,
}

/// Result of feeding one event to the drag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Started,
    Hovering,
    Reordered,
    /// Drop accepted but nothing moved (same slot, stale id, kind mismatch)
    Unchanged,
    Cancelled,
    /// Event arrived with no drag in progress
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        subject: DragSubject,
        over: Option<DropTarget>,
    },
}

impl DragState {
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Page currently picked up, for dimming it in a pages view.
    pub const fn dragged_page(&self) -> Option<&PageId> {
        match self {
            Self::Dragging {
                subject: DragSubject::Page(id),
                ..
            } => Some(id),
            _ => None,
        }
    }

    pub const fn hover_target(&self) -> Option<&DropTarget> {
        match self {
            Self::Dragging { over, .. } => over.as_ref(),
            Self::Idle => None,
        }
    }

    /// Apply one event. Drop and Cancel always return the state to idle.
    pub fn handle(&mut self, event: DragEvent, store: &mut AssemblyStore) -> DragOutcome {
        match event {
            DragEvent::Start { subject } => {
                debug!("Drag started: {:?}", subject);
                *self = Self::Dragging {
                    subject,
                    over: None,
                };
                DragOutcome::Started
            }
            DragEvent::Over { target } => match self {
                Self::Dragging { over, .. } => {
                    *over = Some(target);
                    DragOutcome::Hovering
                }
                Self::Idle => DragOutcome::Ignored,
            },
            DragEvent::Drop { target } => match std::mem::take(self) {
                Self::Dragging { subject, .. } => {
                    let moved = match (subject, target) {
                        (DragSubject::Page(dragged), DropTarget::Page(target)) => {
                            store.reorder_page(&dragged, &target)
                        }
                        (DragSubject::Document(from), DropTarget::Document(to)) => {
                            store.reorder_document(from, to)
                        }
                        _ => false,
                    };
                    if moved {
                        DragOutcome::Reordered
                    } else {
                        DragOutcome::Unchanged
                    }
                }
                Self::Idle => DragOutcome::Ignored,
            },
            DragEvent::Cancel => {
                if std::mem::take(self).is_dragging() {
                    DragOutcome::Cancelled
                } else {
                    DragOutcome::Ignored
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::store::tests::ingested;

    fn store() -> AssemblyStore {
        let mut store = AssemblyStore::new();
        store.append(ingested("a.pdf", 2));
        store.append(ingested("b.pdf", 1));
        store
    }

    fn page_id(store: &AssemblyStore, index: usize) -> PageId {
        store.pages()[index].id().clone()
    }

    #[test]
    fn test_page_drag_drop() {
        let mut store = store();
        let mut drag = DragState::default();
        let b1 = page_id(&store, 2);
        let a1 = page_id(&store, 0);

        assert_eq!(
            drag.handle(DragEvent::Start { subject: DragSubject::Page(b1.clone()) }, &mut store),
            DragOutcome::Started
        );
        assert_eq!(drag.dragged_page(), Some(&b1));
        assert_eq!(
            drag.handle(DragEvent::Over { target: DropTarget::Page(a1.clone()) }, &mut store),
            DragOutcome::Hovering
        );
        assert_eq!(drag.hover_target(), Some(&DropTarget::Page(a1.clone())));
        assert_eq!(
            drag.handle(DragEvent::Drop { target: DropTarget::Page(a1) }, &mut store),
            DragOutcome::Reordered
        );
        assert_eq!(store.pages()[0].id(), &b1);
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_document_drag_drop() {
        let mut store = store();
        let mut drag = DragState::default();

        drag.handle(DragEvent::Start { subject: DragSubject::Document(1) }, &mut store);
        let outcome = drag.handle(DragEvent::Drop { target: DropTarget::Document(0) }, &mut store);

        assert_eq!(outcome, DragOutcome::Reordered);
        assert_eq!(store.documents()[0].name(), "b.pdf");
        assert_eq!(store.pages()[0].document_name(), "b.pdf");
    }

    #[test]
    fn test_mismatched_kinds_do_nothing() {
        let mut store = store();
        let mut drag = DragState::default();
        let a1 = page_id(&store, 0);

        drag.handle(DragEvent::Start { subject: DragSubject::Document(1) }, &mut store);
        let outcome = drag.handle(DragEvent::Drop { target: DropTarget::Page(a1.clone()) }, &mut store);

        assert_eq!(outcome, DragOutcome::Unchanged);
        assert_eq!(store.pages()[0].id(), &a1);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_events_without_start_are_ignored() {
        let mut store = store();
        let mut drag = DragState::default();
        let a1 = page_id(&store, 0);

        assert_eq!(
            drag.handle(DragEvent::Over { target: DropTarget::Page(a1.clone()) }, &mut store),
            DragOutcome::Ignored
        );
        assert_eq!(
            drag.handle(DragEvent::Drop { target: DropTarget::Page(a1) }, &mut store),
            DragOutcome::Ignored
        );
        assert_eq!(drag.handle(DragEvent::Cancel, &mut store), DragOutcome::Ignored);
    }

    #[test]
    fn test_cancel_resets() {
        let mut store = store();
        let mut drag = DragState::default();
        let a2 = page_id(&store, 1);

        drag.handle(DragEvent::Start { subject: DragSubject::Page(a2) }, &mut store);
        assert_eq!(drag.handle(DragEvent::Cancel, &mut store), DragOutcome::Cancelled);
        assert_eq!(drag, DragState::Idle);
    }
}
