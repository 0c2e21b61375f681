//! SELECT rendering.

use quill_types::{Dialect, LimitStyle};

use super::context::RenderContext;
use super::expr::PREC_CMP;
use crate::capability::{Operation, Support};
use crate::error::{QuillError, Result};
use crate::expr::{
    BinaryOp, CompareOp, Condition, Expr, FunctionCall, FunctionKind, Over, SortField, SortOrder,
    WindowSpec,
};
use crate::listener::{Clause, QueryPart, QueryPartRef};
use crate::name::Name;
use crate::query::{Distinct, LockMode, LockWait, Select, SetOperator, With};
use crate::table::{JoinConstraint, JoinKind, TableRef};

/// Column holding the row number of the OFFSET emulation.
const ROW_NUMBER_ALIAS: &str = "rn";

/// Alias of the derived table wrapping an emulated query.
const DERIVED_ALIAS: &str = "t";

impl RenderContext<'_> {
    pub(crate) fn select(&mut self, select: &Select) -> Result<()> {
        if !self.has_listeners() {
            return self.select_node(select);
        }
        let replacement = self.visit_start(QueryPartRef::Select(select))?;
        let rendered = match &replacement {
            Some(QueryPart::Select(replaced)) => replaced,
            _ => select,
        };
        self.select_node(rendered)?;
        self.visit_end(QueryPartRef::Select(rendered))
    }

    fn select_node(&mut self, select: &Select) -> Result<()> {
        if select.offset.is_some() && self.require(Operation::Offset)? == Support::Emulated {
            return self.offset_emulation(select);
        }
        if select.limit.is_some()
            && select.is_compound()
            && self.dialect.limit_style() == LimitStyle::Top
        {
            return self.top_of_compound(select);
        }

        if let Some(with) = &select.with {
            self.with_clause(with)?;
        }
        if select.windows.is_empty()
            || self.require(Operation::WindowClause)? == Support::Supported
        {
            self.select_body(select)
        } else {
            self.with_windows(&select.windows, |ctx| ctx.select_body(select))
        }
    }

    pub(crate) fn with_clause(&mut self, with: &With) -> Result<()> {
        if with.ctes.is_empty() {
            return Ok(());
        }
        self.require(Operation::CommonTableExpressions)?;
        self.in_clause(Clause::With, |ctx| {
            ctx.kw("with ");
            if with.recursive && ctx.dialect.requires_recursive_keyword() {
                ctx.kw("recursive ");
            }
            ctx.list(&with.ctes, ", ", |ctx, cte| {
                ctx.name(&cte.name);
                if !cte.columns.is_empty() {
                    ctx.push("(");
                    ctx.list(&cte.columns, ", ", |ctx, c| {
                        ctx.name(c);
                        Ok(())
                    })?;
                    ctx.push(")");
                }
                ctx.kw(" as (");
                ctx.select(&cte.query)?;
                ctx.push(")");
                Ok(())
            })?;
            ctx.push(" ");
            Ok(())
        })
    }

    fn select_body(&mut self, select: &Select) -> Result<()> {
        self.simple_select(select)?;

        for (operator, operand) in &select.set_ops {
            self.set_operator(*operator)?;
            let wrap = !operand.order_by.is_empty()
                || operand.limit.is_some()
                || operand.offset.is_some()
                || operand.is_compound();
            if wrap {
                self.push("(");
            }
            self.select(operand)?;
            if wrap {
                self.push(")");
            }
        }

        if !select.order_by.is_empty() {
            self.in_clause(Clause::OrderBy, |ctx| {
                ctx.kw(" order by ");
                ctx.sort_fields(&select.order_by)
            })?;
        }
        self.limit_tail(select)?;
        self.lock(select)
    }

    /// Everything from `select` to `window`.
    fn simple_select(&mut self, select: &Select) -> Result<()> {
        self.in_clause(Clause::Select, |ctx| {
            ctx.kw("select ");
            match &select.distinct {
                Distinct::All => {}
                Distinct::Distinct => ctx.kw("distinct "),
                Distinct::On(exprs) => {
                    ctx.require(Operation::DistinctOn)?;
                    ctx.kw("distinct on (");
                    ctx.list(exprs, ", ", |ctx, e| ctx.expr0(e))?;
                    ctx.push(") ");
                }
            }
            ctx.limit_head(select)?;
            if select.fields.is_empty() {
                ctx.push("*");
            } else {
                ctx.list(&select.fields, ", ", |ctx, f| ctx.expr0(f))?;
            }
            Ok(())
        })?;

        if select.from.is_empty() {
            if let Some(dummy) = self.dialect.dummy_table() {
                self.kw(" from ");
                self.push(dummy);
            }
        } else {
            self.in_clause(Clause::From, |ctx| {
                ctx.kw(" from ");
                ctx.list(&select.from, ", ", |ctx, t| ctx.table_ref(t))
            })?;
        }

        self.where_clause(select.where_.expr())?;

        if !select.group_by.is_empty() {
            self.in_clause(Clause::GroupBy, |ctx| {
                ctx.kw(" group by ");
                ctx.list(&select.group_by, ", ", |ctx, e| ctx.expr0(e))
            })?;
        }
        if !select.having.is_none() {
            self.in_clause(Clause::Having, |ctx| {
                ctx.kw(" having ");
                ctx.expr0(select.having.expr())
            })?;
        }

        if !select.windows.is_empty() && self.support(Operation::WindowClause) == Support::Supported
        {
            self.in_clause(Clause::Window, |ctx| {
                ctx.kw(" window ");
                ctx.list(&select.windows, ", ", |ctx, w| {
                    ctx.name(&w.name);
                    ctx.kw(" as (");
                    ctx.window_spec(&w.spec)?;
                    ctx.push(")");
                    Ok(())
                })
            })?;
        }
        Ok(())
    }

    pub(crate) fn where_clause(&mut self, condition: &Expr) -> Result<()> {
        if condition.is_no_condition() {
            return Ok(());
        }
        self.in_clause(Clause::Where, |ctx| {
            ctx.kw(" where ");
            ctx.expr0(condition)
        })
    }

    fn set_operator(&mut self, operator: SetOperator) -> Result<()> {
        let keyword = match operator {
            SetOperator::Intersect => {
                self.require(Operation::Intersect)?;
                operator.as_str()
            }
            SetOperator::Except => match self.require(Operation::Except)? {
                Support::Emulated => "minus",
                _ => operator.as_str(),
            },
            _ => operator.as_str(),
        };
        self.push(" ");
        self.kw(keyword);
        self.push(" ");
        Ok(())
    }

    // =========================================================================
    // FROM items
    // =========================================================================

    pub(crate) fn table_ref(&mut self, table: &TableRef) -> Result<()> {
        if !self.has_listeners() {
            return self.table_node(table);
        }
        let replacement = self.visit_start(QueryPartRef::Table(table))?;
        let rendered = match &replacement {
            Some(QueryPart::Table(replaced)) => replaced,
            _ => table,
        };
        self.table_node(rendered)?;
        self.visit_end(QueryPartRef::Table(rendered))
    }

    fn table_node(&mut self, table: &TableRef) -> Result<()> {
        match table {
            TableRef::Named { name, alias } => {
                self.qualified_name(name);
                if let Some(alias) = alias {
                    self.table_alias(alias);
                }
            }
            TableRef::Derived {
                query,
                alias,
                columns,
            } => {
                self.push("(");
                self.select(query)?;
                self.push(")");
                self.table_alias(alias);
                if !columns.is_empty() {
                    self.push("(");
                    self.list(columns, ", ", |ctx, c| {
                        ctx.name(c);
                        Ok(())
                    })?;
                    self.push(")");
                }
            }
            TableRef::Join(join) => {
                if join.kind == JoinKind::Full {
                    self.require(Operation::FullOuterJoin)?;
                }
                self.table_ref(&join.left)?;
                self.push(" ");
                self.kw(join.kind.as_str());
                self.push(" ");
                let nested = matches!(join.right, TableRef::Join(_));
                if nested {
                    self.push("(");
                }
                self.table_ref(&join.right)?;
                if nested {
                    self.push(")");
                }
                match &join.constraint {
                    JoinConstraint::None => {}
                    JoinConstraint::On(condition) => {
                        self.in_clause(Clause::Join, |ctx| {
                            ctx.kw(" on ");
                            ctx.expr0(condition)
                        })?;
                    }
                    JoinConstraint::Using(columns) => {
                        self.kw(" using (");
                        self.list(columns, ", ", |ctx, c| {
                            ctx.name(c);
                            Ok(())
                        })?;
                        self.push(")");
                    }
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Row limiting
    // =========================================================================

    /// `top n` and `skip ? first ?`, written right after SELECT.
    fn limit_head(&mut self, select: &Select) -> Result<()> {
        match self.dialect.limit_style() {
            LimitStyle::Top => {
                if let Some(limit) = &select.limit {
                    self.in_clause(Clause::Limit, |ctx| {
                        ctx.kw("top ");
                        ctx.inlined(|ctx| ctx.expr(limit, PREC_CMP + 1))?;
                        ctx.push(" ");
                        Ok(())
                    })?;
                }
            }
            LimitStyle::SkipFirst => {
                if let Some(offset) = &select.offset {
                    self.in_clause(Clause::Offset, |ctx| {
                        ctx.kw("skip ");
                        ctx.expr(offset, PREC_CMP + 1)?;
                        ctx.push(" ");
                        Ok(())
                    })?;
                }
                if let Some(limit) = &select.limit {
                    self.in_clause(Clause::Limit, |ctx| {
                        ctx.kw("first ");
                        ctx.expr(limit, PREC_CMP + 1)?;
                        ctx.push(" ");
                        Ok(())
                    })?;
                }
            }
            LimitStyle::LimitOffset | LimitStyle::OffsetFetch => {}
        }
        Ok(())
    }

    fn limit_tail(&mut self, select: &Select) -> Result<()> {
        match self.dialect.limit_style() {
            LimitStyle::LimitOffset => {
                match (&select.limit, &select.offset) {
                    (Some(limit), _) => self.in_clause(Clause::Limit, |ctx| {
                        ctx.kw(" limit ");
                        ctx.expr(limit, PREC_CMP + 1)
                    })?,
                    (None, Some(_)) => match self.dialect {
                        Dialect::MySQL | Dialect::MariaDB => {
                            self.kw(" limit ");
                            self.push("18446744073709551615");
                        }
                        Dialect::SQLite => {
                            self.kw(" limit ");
                            self.push("-1");
                        }
                        _ => {}
                    },
                    (None, None) => {}
                }
                if let Some(offset) = &select.offset {
                    self.in_clause(Clause::Offset, |ctx| {
                        ctx.kw(" offset ");
                        ctx.expr(offset, PREC_CMP + 1)
                    })?;
                }
            }
            LimitStyle::OffsetFetch => {
                if select.limit.is_none() && select.offset.is_none() {
                    return Ok(());
                }
                let fetch_needs_offset = self.dialect.offset_requires_order_by();
                if fetch_needs_offset && select.order_by.is_empty() {
                    self.kw(" order by (select 0)");
                }
                match &select.offset {
                    Some(offset) => self.in_clause(Clause::Offset, |ctx| {
                        ctx.kw(" offset ");
                        ctx.expr(offset, PREC_CMP + 1)?;
                        ctx.kw(" rows");
                        Ok(())
                    })?,
                    None if fetch_needs_offset => self.kw(" offset 0 rows"),
                    None => {}
                }
                if let Some(limit) = &select.limit {
                    self.in_clause(Clause::Limit, |ctx| {
                        ctx.kw(" fetch next ");
                        ctx.expr(limit, PREC_CMP + 1)?;
                        ctx.kw(" rows only");
                        Ok(())
                    })?;
                }
            }
            LimitStyle::Top | LimitStyle::SkipFirst => {}
        }
        Ok(())
    }

    fn lock(&mut self, select: &Select) -> Result<()> {
        let Some(lock) = select.lock else {
            return Ok(());
        };
        self.require(Operation::ForUpdate)?;
        self.kw(match lock.mode {
            LockMode::Update => " for update",
            LockMode::Share => " for share",
        });
        match lock.wait {
            LockWait::Wait => {}
            LockWait::NoWait => self.kw(" nowait"),
            LockWait::SkipLocked => {
                self.require(Operation::SkipLocked)?;
                self.kw(" skip locked");
            }
        }
        Ok(())
    }

    // =========================================================================
    // Emulations
    // =========================================================================

    /// OFFSET through `row_number()`:
    ///
    /// ```sql
    /// select a, b from (select a, b, row_number() over (order by ..) as rn from ..) as t
    /// where rn > ? and rn <= ? + ? order by rn
    /// ```
    fn offset_emulation(&mut self, select: &Select) -> Result<()> {
        let (Some(offset), true) = (&select.offset, !select.fields.is_empty()) else {
            return Err(QuillError::render(
                "select",
                "OFFSET emulation needs an explicit select list",
            ));
        };
        let outer_fields = select
            .fields
            .iter()
            .map(|f| {
                f.output_name().cloned().map(Expr::column).ok_or_else(|| {
                    QuillError::render(
                        f.node_name(),
                        "OFFSET emulation needs a name for every select field",
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let row_number = Expr::Function(Box::new(FunctionCall {
            name: "row_number".into(),
            args: Vec::new(),
            kind: FunctionKind::Window,
            distinct: false,
            filter: None,
            over: Some(Over::Spec(
                WindowSpec::default().order_by(select.order_by.iter().cloned()),
            )),
        }))
        .alias(ROW_NUMBER_ALIAS);

        let mut inner = select.clone();
        inner.with = None;
        inner.order_by.clear();
        inner.limit = None;
        inner.offset = None;
        inner.lock = None;
        inner.fields.push(row_number);

        let rn = || Expr::column(ROW_NUMBER_ALIAS);
        let mut condition = Expr::Compare {
            op: CompareOp::Gt,
            left: Box::new(rn()),
            right: Box::new(offset.clone()),
        };
        if let Some(limit) = &select.limit {
            condition = condition.and(Expr::Compare {
                op: CompareOp::Le,
                left: Box::new(rn()),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Add,
                    left: Box::new(offset.clone()),
                    right: Box::new(limit.clone()),
                }),
            });
        }

        let outer = Select {
            with: select.with.clone(),
            fields: outer_fields,
            from: vec![TableRef::Derived {
                query: Box::new(inner),
                alias: Name::new(DERIVED_ALIAS),
                columns: Vec::new(),
            }],
            where_: Condition::new(condition),
            order_by: vec![SortField::new(rn(), SortOrder::Default)],
            ..Select::default()
        };
        self.select_node(&outer)
    }

    /// `select top n * from (<compound>) as t order by ..`
    fn top_of_compound(&mut self, select: &Select) -> Result<()> {
        let mut inner = select.clone();
        inner.with = None;
        inner.order_by.clear();
        inner.limit = None;

        let outer = Select {
            with: select.with.clone(),
            from: vec![TableRef::Derived {
                query: Box::new(inner),
                alias: Name::new(DERIVED_ALIAS),
                columns: Vec::new(),
            }],
            order_by: select.order_by.clone(),
            limit: select.limit.clone(),
            lock: select.lock,
            ..Select::default()
        };
        self.select_node(&outer)
    }
}
