//! Render-time visit listeners.
//!
//! Listeners are called around every query part the renderer visits, in
//! registration order for both [`VisitListener::visit_start`] and
//! [`VisitListener::visit_end`]. During `visit_start` a listener may replace
//! the current part with another part of the same kind; later listeners see
//! the replacement and the renderer renders it instead of the original.

use quill_types::Dialect;

use crate::error::{QuillError, Result};
use crate::expr::Expr;
use crate::query::{Call, Delete, Insert, Merge, Select, Update};
use crate::settings::Settings;
use crate::table::TableRef;

/// Clause currently being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    With,
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    Window,
    OrderBy,
    Limit,
    Offset,
    InsertColumns,
    InsertValues,
    OnConflict,
    Set,
    Returning,
    MergeUsing,
    MergeOn,
    CallArgs,
}

/// Borrowed view of a visited part.
#[derive(Debug, Clone, Copy)]
pub enum QueryPartRef<'a> {
    Expr(&'a Expr),
    Table(&'a TableRef),
    Select(&'a Select),
    Insert(&'a Insert),
    Update(&'a Update),
    Delete(&'a Delete),
    Merge(&'a Merge),
    Call(&'a Call),
}

/// Owned replacement for a visited part.
#[derive(Debug, Clone)]
pub enum QueryPart {
    Expr(Expr),
    Table(TableRef),
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Merge(Merge),
    Call(Call),
}

impl QueryPart {
    pub fn as_part_ref(&self) -> QueryPartRef<'_> {
        match self {
            QueryPart::Expr(p) => QueryPartRef::Expr(p),
            QueryPart::Table(p) => QueryPartRef::Table(p),
            QueryPart::Select(p) => QueryPartRef::Select(p),
            QueryPart::Insert(p) => QueryPartRef::Insert(p),
            QueryPart::Update(p) => QueryPartRef::Update(p),
            QueryPart::Delete(p) => QueryPartRef::Delete(p),
            QueryPart::Merge(p) => QueryPartRef::Merge(p),
            QueryPart::Call(p) => QueryPartRef::Call(p),
        }
    }
}

impl QueryPartRef<'_> {
    pub const fn kind(&self) -> &'static str {
        match self {
            QueryPartRef::Expr(_) => "expression",
            QueryPartRef::Table(_) => "table",
            QueryPartRef::Select(_) => "select",
            QueryPartRef::Insert(_) => "insert",
            QueryPartRef::Update(_) => "update",
            QueryPartRef::Delete(_) => "delete",
            QueryPartRef::Merge(_) => "merge",
            QueryPartRef::Call(_) => "call",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    End,
}

/// What a listener sees for one visited part.
pub struct VisitContext<'a> {
    part: QueryPartRef<'a>,
    replacement: Option<QueryPart>,
    clause: Option<Clause>,
    dialect: Dialect,
    settings: &'a Settings,
    phase: Phase,
}

impl<'a> VisitContext<'a> {
    /// The current part, including any replacement made by an earlier listener.
    pub fn part(&self) -> QueryPartRef<'_> {
        match &self.replacement {
            Some(replacement) => replacement.as_part_ref(),
            None => self.part,
        }
    }

    /// Replace the current part. Only legal in `visit_start`, and only with a
    /// part of the same kind.
    pub fn replace(&mut self, part: QueryPart) -> Result<()> {
        if self.phase == Phase::End {
            return Err(QuillError::render(
                "query part",
                "replacement is only possible in visit_start",
            ));
        }
        let current = self.part().kind();
        let new = part.as_part_ref().kind();
        if current != new {
            return Err(QuillError::render(
                "query part",
                format!("cannot replace a {current} with a {new}"),
            ));
        }
        self.replacement = Some(part);
        Ok(())
    }

    pub fn clause(&self) -> Option<Clause> {
        self.clause
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }
}

/// Observer of the render traversal.
pub trait VisitListener: Send + Sync {
    fn visit_start(&self, _ctx: &mut VisitContext<'_>) -> Result<()> {
        Ok(())
    }

    fn visit_end(&self, _ctx: &mut VisitContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Run `visit_start` of every listener; returns the replacement, if any.
pub(crate) fn start(
    listeners: &[std::sync::Arc<dyn VisitListener>],
    part: QueryPartRef<'_>,
    clause: Option<Clause>,
    dialect: Dialect,
    settings: &Settings,
) -> Result<Option<QueryPart>> {
    let mut ctx = VisitContext {
        part,
        replacement: None,
        clause,
        dialect,
        settings,
        phase: Phase::Start,
    };
    for listener in listeners {
        listener.visit_start(&mut ctx)?;
    }
    Ok(ctx.replacement)
}

/// Run `visit_end` of every listener on the part that was rendered.
pub(crate) fn end(
    listeners: &[std::sync::Arc<dyn VisitListener>],
    part: QueryPartRef<'_>,
    clause: Option<Clause>,
    dialect: Dialect,
    settings: &Settings,
) -> Result<()> {
    let mut ctx = VisitContext {
        part,
        replacement: None,
        clause,
        dialect,
        settings,
        phase: Phase::End,
    };
    for listener in listeners {
        listener.visit_end(&mut ctx)?;
    }
    Ok(())
}
