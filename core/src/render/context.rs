//! Per-render traversal state.
//!
//! A [`RenderContext`] is created for every render call and owns the output
//! buffer, the bind list and the marker counter. SQL text and bind values are
//! produced in the same pass, so the n-th marker in the text always matches
//! the n-th recorded marker.

use std::sync::Arc;

use compact_str::{CompactString, format_compact};
use quill_types::Dialect;
use smallvec::SmallVec;

use super::{BindValue, OutParameter};
use crate::binding::{BindingSqlContext, Emission};
use crate::capability::{self, Operation, Support};
use crate::error::{QuillError, Result};
use crate::expr::{Param, WindowDefinition};
use crate::listener::{self, Clause, QueryPart, QueryPartRef, VisitListener};
use crate::name::{Name, QualifiedName, Quoted};
use crate::settings::{ParamType, RenderKeywordCase, RenderQuotedNames, Settings};

pub(crate) struct RenderContext<'a> {
    pub(crate) dialect: Dialect,
    pub(crate) settings: &'a Settings,
    listeners: &'a [Arc<dyn VisitListener>],
    sql: String,
    pub(crate) binds: SmallVec<[BindValue; 8]>,
    pub(crate) out_parameters: SmallVec<[OutParameter; 2]>,
    markers: usize,
    clause: Option<Clause>,
    /// Render `expr as alias` rather than the alias alone
    declare_aliases: bool,
    /// Inline every value regardless of settings (TOP n)
    force_inline: bool,
    /// WINDOW clause definitions inlined into OVER clauses
    windows: Vec<Vec<WindowDefinition>>,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(
        dialect: Dialect,
        settings: &'a Settings,
        listeners: &'a [Arc<dyn VisitListener>],
    ) -> Self {
        Self {
            dialect,
            settings,
            listeners,
            sql: String::with_capacity(256),
            binds: SmallVec::new(),
            out_parameters: SmallVec::new(),
            markers: 0,
            clause: None,
            declare_aliases: false,
            force_inline: false,
            windows: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> (String, SmallVec<[BindValue; 8]>, SmallVec<[OutParameter; 2]>, usize) {
        (self.sql, self.binds, self.out_parameters, self.markers)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Raw SQL text.
    #[inline]
    pub(crate) fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Keyword text, subject to `render_keyword_case`.
    pub(crate) fn kw(&mut self, keyword: &str) {
        match self.settings.render_keyword_case {
            RenderKeywordCase::Upper => {
                self.sql
                    .extend(keyword.chars().map(|c| c.to_ascii_uppercase()));
            }
            RenderKeywordCase::Lower | RenderKeywordCase::AsIs => self.sql.push_str(keyword),
        }
    }

    /// Identifier, quoted per settings and the name's own preference.
    pub(crate) fn name(&mut self, name: &Name) {
        let quote = match (self.settings.render_quoted_names, name.quoting()) {
            (RenderQuotedNames::Always, _) => true,
            (RenderQuotedNames::Never, _) => false,
            (RenderQuotedNames::ExplicitDefaultQuoted, q) => q != Quoted::Unquoted,
            (RenderQuotedNames::ExplicitDefaultUnquoted, q) => q == Quoted::Quoted,
        };
        if !quote {
            self.sql.push_str(name.as_str());
            return;
        }
        let (open, close) = self.dialect.quote_style().delimiters();
        self.sql.push(open);
        for c in name.as_str().chars() {
            if c == close {
                self.sql.push(close);
            }
            self.sql.push(c);
        }
        self.sql.push(close);
    }

    pub(crate) fn qualified_name(&mut self, name: &QualifiedName) {
        for (i, part) in name.parts().iter().enumerate() {
            if i > 0 {
                self.sql.push('.');
            }
            self.name(part);
        }
    }

    /// ` as <alias>`, or ` <alias>` where the dialect rejects `as` for tables.
    pub(crate) fn table_alias(&mut self, alias: &Name) {
        if self.dialect.supports_table_alias_as() {
            self.kw(" as ");
        } else {
            self.push(" ");
        }
        self.name(alias);
    }

    /// Render `items` separated by `sep`.
    pub(crate) fn list<T>(
        &mut self,
        items: &[T],
        sep: &str,
        mut f: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            f(self, item)?;
        }
        Ok(())
    }

    // =========================================================================
    // Clauses and modes
    // =========================================================================

    pub(crate) fn in_clause(
        &mut self,
        clause: Clause,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let saved = (self.clause, self.declare_aliases);
        self.clause = Some(clause);
        self.declare_aliases = matches!(clause, Clause::Select | Clause::Returning);
        let result = f(self);
        (self.clause, self.declare_aliases) = saved;
        result
    }

    #[inline]
    pub(crate) fn declares_aliases(&self) -> bool {
        self.declare_aliases
    }

    pub(crate) fn inlined(&mut self, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let saved = self.force_inline;
        self.force_inline = true;
        let result = f(self);
        self.force_inline = saved;
        result
    }

    pub(crate) fn with_windows(
        &mut self,
        windows: &[WindowDefinition],
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.windows.push(windows.to_vec());
        let result = f(self);
        self.windows.pop();
        result
    }

    /// Definition of a named window from the innermost enclosing select.
    pub(crate) fn window_definition(&self, name: &Name) -> Option<WindowDefinition> {
        self.windows
            .iter()
            .rev()
            .flat_map(|defs| defs.iter())
            .find(|w| w.name == *name)
            .cloned()
    }

    // =========================================================================
    // Capabilities
    // =========================================================================

    pub(crate) fn support(&self, operation: Operation) -> Support {
        capability::support(operation, self.dialect)
    }

    /// Fails for unsupported operations; traces emulations.
    pub(crate) fn require(&self, operation: Operation) -> Result<Support> {
        let support = capability::require(operation, self.dialect)?;
        if support == Support::Emulated {
            self.emulating(operation);
        }
        Ok(support)
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub(crate) fn emulating(&self, operation: Operation) {
        crate::quill_trace_emulation!(self.settings, operation, self.dialect);
    }

    pub(crate) fn unsupported(&self, operation: Operation) -> QuillError {
        QuillError::unsupported(operation, self.dialect)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    fn should_inline(&self, param: &Param) -> bool {
        if param.mode().is_output() {
            return false;
        }
        self.force_inline
            || param.is_inline()
            || self.settings.inline_all()
            || (self.settings.param_type == ParamType::NamedOrInlined && param.name().is_none())
    }

    fn marker(&mut self, index: usize, name: Option<&str>) -> CompactString {
        match self.settings.param_type {
            ParamType::Named | ParamType::NamedOrInlined => {
                if self.support(Operation::NamedParameters) == Support::Supported {
                    match name {
                        Some(name) => format_compact!(":{name}"),
                        None => format_compact!(":{index}"),
                    }
                } else {
                    self.emulating(Operation::NamedParameters);
                    CompactString::const_new("?")
                }
            }
            ParamType::Numbered => self.dialect.numbered_placeholder(index).into(),
            ParamType::Indexed | ParamType::Inlined => CompactString::const_new("?"),
        }
    }

    /// Render a parameter as a marker or a literal through its binding.
    pub(crate) fn param(&mut self, param: &Param) -> Result<()> {
        let value = param.wire_value()?;
        let data_type = param.data_type();
        let mut binding_ctx =
            BindingSqlContext::new(self.dialect, &value, data_type, self.should_inline(param));
        data_type.binding().sql(&mut binding_ctx)?;

        match binding_ctx.finish() {
            Emission::Literal(sql) => {
                if param.mode().is_output() {
                    return Err(QuillError::render(
                        "parameter",
                        "OUT parameters must render a marker",
                    ));
                }
                self.push(&sql);
            }
            Emission::Marker { cast } => {
                self.markers += 1;
                let index = self.markers;
                let marker = self.marker(index, param.name());
                match cast {
                    Some(type_name) => {
                        self.kw("cast(");
                        self.push(&marker);
                        self.kw(" as ");
                        self.push(&type_name);
                        self.push(")");
                    }
                    None => self.push(&marker),
                }

                if param.mode().is_input() {
                    self.binds.push(BindValue {
                        index,
                        name: param.name().map(CompactString::from),
                        data_type: data_type.clone(),
                        value,
                        mode: param.mode(),
                    });
                }
                if param.mode().is_output() {
                    self.out_parameters.push(OutParameter {
                        index,
                        data_type: data_type.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    #[inline]
    pub(crate) fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub(crate) fn visit_start(&self, part: QueryPartRef<'_>) -> Result<Option<QueryPart>> {
        listener::start(self.listeners, part, self.clause, self.dialect, self.settings)
    }

    pub(crate) fn visit_end(&self, part: QueryPartRef<'_>) -> Result<()> {
        listener::end(self.listeners, part, self.clause, self.dialect, self.settings)
    }
}
