//! Command-line edit operations applied to a staged session.
//!
//! Pages are addressed as `file.pdf:N`, where N is the page number inside
//! that upload. Documents are addressed by 1-based position in the current
//! document order.

use anyhow::{Result, bail};
use pdf_assembler_core::{
    AssemblySession, DragEvent, DragOutcome, DragSubject, DropTarget, Error, PageId,
};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A page reference like `report.pdf:3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub file: String,
    pub page: u32,
}

impl FromStr for PageRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // File names may contain ':', the page number never does
        let (file, page) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected FILE:PAGE, got '{s}'"))?;
        if file.is_empty() {
            return Err(format!("missing file name in '{s}'"));
        }
        let page: u32 = page
            .parse()
            .map_err(|_| format!("invalid page number in '{s}'"))?;
        if page == 0 {
            return Err(format!("page numbers start at 1 in '{s}'"));
        }
        Ok(Self {
            file: file.to_string(),
            page,
        })
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.page)
    }
}

/// `--move-file FROM:TO`, 1-based document positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentMove {
    pub from: usize,
    pub to: usize,
}

impl FromStr for DocumentMove {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| format!("expected FROM:TO, got '{s}'"))?;
        let parse = |v: &str| -> Result<usize, String> {
            match v.trim().parse::<usize>() {
                Ok(0) | Err(_) => Err(format!("invalid document position '{v}' in '{s}'")),
                Ok(n) => Ok(n),
            }
        };
        Ok(Self {
            from: parse(from)?,
            to: parse(to)?,
        })
    }
}

/// `--move-page PAGE@TARGET`: drop PAGE onto TARGET's slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMove {
    pub page: PageRef,
    pub target: PageRef,
}

impl FromStr for PageMove {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (page, target) = s
            .split_once('@')
            .ok_or_else(|| format!("expected PAGE@TARGET, got '{s}'"))?;
        Ok(Self {
            page: page.parse()?,
            target: target.parse()?,
        })
    }
}

/// Every edit requested on the command line.
#[derive(Debug, Default)]
pub struct EditPlan {
    pub document_moves: Vec<DocumentMove>,
    pub page_moves: Vec<PageMove>,
    pub rotations: Vec<PageRef>,
    pub removals: Vec<PageRef>,
    pub file_removals: Vec<String>,
}

impl EditPlan {
    /// Apply in a fixed order: document moves, page moves, rotations,
    /// page removals, file removals.
    pub fn apply(&self, session: &mut AssemblySession) -> Result<()> {
        for mv in &self.document_moves {
            let count = session.store().document_count();
            if mv.from > count || mv.to > count {
                bail!(
                    "document position out of range in {}:{} ({} documents staged)",
                    mv.from,
                    mv.to,
                    count
                );
            }
            drag(
                session,
                DragSubject::Document(mv.from - 1),
                DropTarget::Document(mv.to - 1),
            );
        }

        for mv in &self.page_moves {
            let page = resolve(session, &mv.page)?;
            let target = resolve(session, &mv.target)?;
            drag(session, DragSubject::Page(page), DropTarget::Page(target));
        }

        for page in &self.rotations {
            let id = resolve(session, page)?;
            session.rotate_page(&id);
        }

        for page in &self.removals {
            let id = resolve(session, page)?;
            session.remove_page(&id);
        }

        for file in &self.file_removals {
            if !session.remove_document(file) {
                return Err(Error::UnknownDocument(file.clone()).into());
            }
        }

        Ok(())
    }
}

fn drag(session: &mut AssemblySession, subject: DragSubject, target: DropTarget) {
    let label = format!("{subject:?} -> {target:?}");
    session.drag(DragEvent::Start { subject });
    session.drag(DragEvent::Over {
        target: target.clone(),
    });
    if session.drag(DragEvent::Drop { target }) == DragOutcome::Unchanged {
        debug!("Move left the order unchanged: {}", label);
    }
}

/// Find the first staged page matching the reference.
fn resolve(session: &AssemblySession, page: &PageRef) -> Result<PageId> {
    session
        .store()
        .pages()
        .iter()
        .find(|p| p.document_name() == page.file && p.page_number() == page.page)
        .map(|p| p.id().clone())
        .ok_or_else(|| Error::UnknownPage(page.to_string()).into())
}
