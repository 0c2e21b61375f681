//! The rendering facade.

use std::fmt;
use std::sync::Arc;

use quill_core::binding::StatementHandle;
use quill_core::capability::{Capabilities, Operation, Support};
use quill_core::error::Result;
use quill_core::listener::VisitListener;
use quill_core::query::Cte;
use quill_core::render::{RenderedQuery, render};
use quill_core::settings::{Settings, StatementType};
use quill_core::table::TableRef;
use quill_types::Dialect;

use crate::builder::{
    CallBuilder, DeleteBuilder, InsertBuilder, MergeBuilder, SelectBuilder, SelectFields,
    SelectInitial, ToStatement, UpdateBuilder, WithBuilder,
};

/// Runs rendered statements. Implemented by the caller on top of a driver.
pub trait Executor {
    type Statement: StatementHandle;

    /// Prepare `sql` for execution.
    fn prepare(&mut self, sql: &str) -> Result<Self::Statement>;

    /// Execute a prepared and bound statement; returns the affected row count.
    fn execute(&mut self, statement: &mut Self::Statement) -> Result<u64>;
}

/// A dialect, its render settings and the listeners called while
/// rendering.
///
/// Contexts are cheap to clone and safe to share; every render call keeps
/// its traversal state to itself.
///
/// ```
/// use quill::prelude::*;
///
/// let users = Table::new("users");
/// let id: Field<i32> = users.column("id");
///
/// let ctx = DslContext::new(Dialect::MySQL)
///     .with_settings(Settings::new().with_render_keyword_case(RenderKeywordCase::Upper));
/// let rendered = ctx.render(&ctx.select(&id).from(&users).limit(10))?;
/// assert_eq!(rendered.sql(), "SELECT `id` FROM `users` LIMIT ?");
/// # Ok::<(), quill::QuillError>(())
/// ```
#[derive(Clone)]
pub struct DslContext {
    dialect: Dialect,
    settings: Settings,
    listeners: Vec<Arc<dyn VisitListener>>,
}

impl fmt::Debug for DslContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DslContext")
            .field("dialect", &self.dialect)
            .field("settings", &self.settings)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl DslContext {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            settings: Settings::default(),
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Appends a listener; listeners run in the order they were added.
    #[must_use]
    pub fn with_listener(mut self, listener: impl VisitListener + 'static) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    #[must_use]
    pub fn with_shared_listener(mut self, listener: Arc<dyn VisitListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::of(self.dialect)
    }

    pub fn support(&self, operation: Operation) -> Support {
        self.capabilities().support(operation)
    }

    /// Render `query` to SQL text and its ordered bind list.
    pub fn render(&self, query: &impl ToStatement) -> Result<RenderedQuery> {
        render(&query.to_statement(), self.dialect, &self.settings, &self.listeners)
    }

    /// Render `query` with every value inlined as a literal.
    pub fn render_inlined(&self, query: &impl ToStatement) -> Result<String> {
        let settings = self
            .settings
            .clone()
            .with_statement_type(StatementType::StaticStatement);
        let rendered = render(&query.to_statement(), self.dialect, &settings, &self.listeners)?;
        Ok(rendered.into_sql())
    }

    /// Replay the bind list of `query` onto `statement`.
    pub fn bind(&self, query: &RenderedQuery, statement: &mut dyn StatementHandle) -> Result<()> {
        quill_core::bind(query, statement)
    }

    /// Render, prepare, bind and execute `query`.
    pub fn execute<E: Executor>(&self, executor: &mut E, query: &impl ToStatement) -> Result<u64> {
        let rendered = self.render(query)?;
        let mut statement = executor.prepare(rendered.sql())?;
        self.bind(&rendered, &mut statement)?;
        let affected = executor.execute(&mut statement)?;

        #[cfg(feature = "tracing")]
        if self.settings.execute_logging {
            tracing::debug!(dialect = %self.dialect, rows = affected, "quill.execute");
        }
        Ok(affected)
    }

    //--------------------------------------------------------------------------
    // Builder entry points
    //--------------------------------------------------------------------------

    pub fn select<F: SelectFields>(&self, fields: F) -> SelectBuilder<F::Row, SelectInitial> {
        crate::dsl::select(fields)
    }

    pub fn select_distinct<F: SelectFields>(&self, fields: F) -> SelectBuilder<F::Row, SelectInitial> {
        crate::dsl::select_distinct(fields)
    }

    pub fn insert_into(&self, table: impl Into<TableRef>) -> InsertBuilder<()> {
        crate::dsl::insert_into(table)
    }

    pub fn update(&self, table: impl Into<TableRef>) -> UpdateBuilder {
        crate::dsl::update(table)
    }

    pub fn delete_from(&self, table: impl Into<TableRef>) -> DeleteBuilder {
        crate::dsl::delete_from(table)
    }

    pub fn merge_into(&self, table: impl Into<TableRef>) -> MergeBuilder {
        crate::dsl::merge_into(table)
    }

    pub fn call(&self, procedure: &str) -> CallBuilder {
        crate::dsl::call(procedure)
    }

    pub fn with<I: IntoIterator<Item = Cte>>(&self, ctes: I) -> WithBuilder {
        crate::dsl::with(ctes)
    }
}
