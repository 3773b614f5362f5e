mod drag;
mod page;
mod session;
pub(crate) mod store;

pub use drag::{DragEvent, DragOutcome, DragState, DragSubject, DropTarget};
pub use page::{Document, DocumentKey, Page, PageId, Rotation};
pub use session::{AssemblySession, RequestKind, RequestState, ViewMode};
pub use store::{AssemblyStore, AssemblyView, DocumentGroup};
