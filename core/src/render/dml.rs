//! INSERT, UPDATE, DELETE, MERGE and CALL rendering.

use quill_types::Dialect;

use super::context::RenderContext;
use crate::capability::{Operation, Support};
use crate::error::{QuillError, Result};
use crate::expr::{CaseExpr, ColumnRef, CompareOp, Condition, Expr, FunctionCall};
use crate::listener::{Clause, QueryPart, QueryPartRef};
use crate::name::{Name, QualifiedName};
use crate::query::{
    Assignment, Call, ConflictAction, Delete, Insert, InsertSource, Merge, MergeClause,
    OnConflict, Select, Update,
};
use crate::table::TableRef;

/// Alias of the proposed row when an upsert is rendered as MERGE.
const EXCLUDED_ALIAS: &str = "excluded";

/// Listener hook around a statement node.
macro_rules! visited {
    ($ctx:ident, $variant:ident, $node:expr, $render:ident) => {{
        if !$ctx.has_listeners() {
            return $ctx.$render($node);
        }
        let replacement = $ctx.visit_start(QueryPartRef::$variant($node))?;
        let rendered = match &replacement {
            Some(QueryPart::$variant(replaced)) => replaced,
            _ => $node,
        };
        $ctx.$render(rendered)?;
        $ctx.visit_end(QueryPartRef::$variant(rendered))
    }};
}

impl RenderContext<'_> {
    pub(crate) fn insert(&mut self, insert: &Insert) -> Result<()> {
        visited!(self, Insert, insert, insert_node)
    }

    pub(crate) fn update(&mut self, update: &Update) -> Result<()> {
        visited!(self, Update, update, update_node)
    }

    pub(crate) fn delete(&mut self, delete: &Delete) -> Result<()> {
        visited!(self, Delete, delete, delete_node)
    }

    pub(crate) fn merge(&mut self, merge: &Merge) -> Result<()> {
        visited!(self, Merge, merge, merge_node)
    }

    pub(crate) fn call(&mut self, call: &Call) -> Result<()> {
        visited!(self, Call, call, call_node)
    }

    // =========================================================================
    // Shared clauses
    // =========================================================================

    fn assignments(&mut self, set: &[Assignment]) -> Result<()> {
        self.in_clause(Clause::Set, |ctx| {
            ctx.list(set, ", ", |ctx, (column, value)| {
                ctx.target_column(column)?;
                ctx.push(" = ");
                ctx.expr0(value)
            })
        })
    }

    /// A column written to by INSERT, UPDATE or MERGE.
    fn target_column(&mut self, column: &Name) -> Result<()> {
        if column.as_str().is_empty() {
            return Err(QuillError::render("column", "assignment target is not a column reference"));
        }
        self.name(column);
        Ok(())
    }

    fn column_list(&mut self, columns: &[Name]) -> Result<()> {
        self.push("(");
        self.list(columns, ", ", |ctx, c| ctx.target_column(c))?;
        self.push(")");
        Ok(())
    }

    fn returning(&mut self, returning: &[Expr]) -> Result<()> {
        if returning.is_empty() || self.require(Operation::Returning)? != Support::Supported {
            return Ok(());
        }
        self.in_clause(Clause::Returning, |ctx| {
            ctx.kw(" returning ");
            ctx.list(returning, ", ", |ctx, e| ctx.expr0(e))
        })
    }

    /// `output inserted.a, inserted.b` in place of RETURNING.
    fn output_clause(&mut self, pseudo_table: &str, returning: &[Expr]) -> Result<()> {
        if returning.is_empty() || self.require(Operation::Returning)? != Support::Emulated {
            return Ok(());
        }
        self.in_clause(Clause::Returning, |ctx| {
            ctx.kw(" output ");
            ctx.list(returning, ", ", |ctx, e| {
                let Expr::Column(column) = e.clone().unaliased() else {
                    return Err(ctx.unsupported(Operation::Returning));
                };
                ctx.kw(pseudo_table);
                ctx.push(".");
                ctx.name(&column.name);
                Ok(())
            })
        })
    }

    // =========================================================================
    // INSERT
    // =========================================================================

    fn insert_node(&mut self, insert: &Insert) -> Result<()> {
        let mysql = self.dialect.is_mysql_family();
        if let Some(on_conflict) = &insert.on_conflict
            && self.require(Operation::OnConflict)? == Support::Emulated
            && !mysql
        {
            return self.upsert_as_merge(insert, on_conflict);
        }

        if let Some(with) = &insert.with {
            self.with_clause(with)?;
        }
        let ignore = mysql
            && matches!(
                insert.on_conflict,
                Some(OnConflict {
                    action: ConflictAction::DoNothing,
                    ..
                })
            );
        self.kw(if ignore { "insert ignore into " } else { "insert into " });
        self.table_ref(&insert.table)?;

        if !insert.columns.is_empty() {
            self.in_clause(Clause::InsertColumns, |ctx| {
                ctx.push(" ");
                ctx.column_list(&insert.columns)
            })?;
        }
        self.output_clause("inserted", &insert.returning)?;

        self.in_clause(Clause::InsertValues, |ctx| ctx.insert_source(insert))?;

        if let Some(on_conflict) = &insert.on_conflict {
            self.in_clause(Clause::OnConflict, |ctx| {
                if mysql {
                    ctx.on_duplicate_key(on_conflict)
                } else {
                    ctx.on_conflict(on_conflict)
                }
            })?;
        }
        self.returning(&insert.returning)
    }

    fn insert_source(&mut self, insert: &Insert) -> Result<()> {
        match &insert.source {
            InsertSource::Values(rows) if rows.is_empty() => self.default_values(),
            InsertSource::DefaultValues => self.default_values(),
            InsertSource::Values(rows) => {
                if rows.len() > 1 && self.require(Operation::MultiRowInsert)? == Support::Emulated
                {
                    // select .. from dual union all select .. from dual
                    for (i, row) in rows.iter().enumerate() {
                        self.kw(if i == 0 { " select " } else { " union all select " });
                        self.list(row, ", ", |ctx, e| ctx.expr0(e))?;
                        if let Some(dummy) = self.dialect.dummy_table() {
                            self.kw(" from ");
                            self.push(dummy);
                        }
                    }
                    return Ok(());
                }
                self.kw(" values ");
                self.list(rows, ", ", |ctx, row| {
                    ctx.push("(");
                    ctx.list(row, ", ", |ctx, e| ctx.expr0(e))?;
                    ctx.push(")");
                    Ok(())
                })
            }
            InsertSource::Select(query) => {
                self.push(" ");
                self.select(query)?;
                // `on` after a bare select parses as a join constraint
                if self.dialect == Dialect::SQLite
                    && insert.on_conflict.is_some()
                    && ends_with_from(query)
                {
                    self.kw(" where true");
                }
                Ok(())
            }
        }
    }

    fn default_values(&mut self) -> Result<()> {
        if self.dialect.is_mysql_family() {
            self.kw(" values ()");
        } else {
            self.kw(" default values");
        }
        Ok(())
    }

    fn on_conflict(&mut self, on_conflict: &OnConflict) -> Result<()> {
        self.kw(" on conflict");
        if !on_conflict.target.is_empty() {
            self.push(" ");
            self.column_list(&on_conflict.target)?;
        }
        match &on_conflict.action {
            ConflictAction::DoNothing => self.kw(" do nothing"),
            ConflictAction::DoUpdate { set, where_ } => {
                if on_conflict.target.is_empty() {
                    return Err(QuillError::render(
                        "ON CONFLICT",
                        "DO UPDATE needs a conflict target",
                    ));
                }
                self.kw(" do update set ");
                self.assignments(set)?;
                self.where_clause(where_.expr())?;
            }
        }
        Ok(())
    }

    fn on_duplicate_key(&mut self, on_conflict: &OnConflict) -> Result<()> {
        match &on_conflict.action {
            // Rendered as `insert ignore`
            ConflictAction::DoNothing => Ok(()),
            ConflictAction::DoUpdate { set, where_ } => {
                if !where_.is_none() {
                    return Err(self.unsupported(Operation::OnConflict));
                }
                self.kw(" on duplicate key update ");
                self.assignments(set)
            }
        }
    }

    /// Upsert through MERGE, with the proposed row as a derived table named
    /// `excluded`.
    fn upsert_as_merge(&mut self, insert: &Insert, on_conflict: &OnConflict) -> Result<()> {
        if self.support(Operation::Merge) != Support::Supported || !insert.returning.is_empty() {
            return Err(self.unsupported(Operation::OnConflict));
        }
        if on_conflict.target.is_empty() {
            return Err(QuillError::render(
                "ON CONFLICT",
                "emulating ON CONFLICT through MERGE needs a conflict target",
            ));
        }
        let row = match &insert.source {
            InsertSource::Values(rows) if rows.len() == 1 => &rows[0],
            _ => return Err(self.unsupported(Operation::OnConflict)),
        };
        if row.len() != insert.columns.len() {
            return Err(QuillError::render(
                "INSERT",
                "every inserted column needs exactly one value",
            ));
        }
        let Some(target) = insert.table.reference_name() else {
            return Err(self.unsupported(Operation::OnConflict));
        };
        let target = QualifiedName::from(target.clone());
        let excluded = QualifiedName::from(Name::new(EXCLUDED_ALIAS));

        let proposed = Select {
            fields: row
                .iter()
                .zip(&insert.columns)
                .map(|(value, column)| value.clone().alias(column.clone()))
                .collect(),
            ..Select::default()
        };
        let on = on_conflict
            .target
            .iter()
            .map(|column| Expr::Compare {
                op: CompareOp::Eq,
                left: Box::new(Expr::qualified_column(target.clone(), column.clone())),
                right: Box::new(Expr::qualified_column(excluded.clone(), column.clone())),
            })
            .fold(Expr::NoCondition, Expr::and);

        let mut clauses = Vec::with_capacity(2);
        if let ConflictAction::DoUpdate { set, where_ } = &on_conflict.action {
            clauses.push(MergeClause::MatchedUpdate {
                set: set.clone(),
                where_: where_.clone(),
            });
        }
        clauses.push(MergeClause::NotMatchedInsert {
            columns: insert.columns.clone(),
            values: insert
                .columns
                .iter()
                .map(|c| Expr::qualified_column(excluded.clone(), c.clone()))
                .collect(),
            where_: Condition::none(),
        });

        let merge = Merge {
            table: insert.table.clone(),
            using: TableRef::Derived {
                query: Box::new(proposed),
                alias: Name::new(EXCLUDED_ALIAS),
                columns: Vec::new(),
            },
            on: Condition::new(on),
            clauses,
        };
        if let Some(with) = &insert.with {
            self.with_clause(with)?;
        }
        self.merge_node(&merge)
    }

    // =========================================================================
    // UPDATE / DELETE
    // =========================================================================

    fn update_node(&mut self, update: &Update) -> Result<()> {
        if let Some(with) = &update.with {
            self.with_clause(with)?;
        }
        self.kw("update ");
        self.table_ref(&update.table)?;
        self.kw(" set ");
        self.assignments(&update.set)?;
        self.output_clause("inserted", &update.returning)?;

        if !update.from.is_empty() {
            self.require(Operation::UpdateFrom)?;
            self.in_clause(Clause::From, |ctx| {
                ctx.kw(" from ");
                ctx.list(&update.from, ", ", |ctx, t| ctx.table_ref(t))
            })?;
        }
        self.where_clause(update.where_.expr())?;
        self.returning(&update.returning)
    }

    fn delete_node(&mut self, delete: &Delete) -> Result<()> {
        if let Some(with) = &delete.with {
            self.with_clause(with)?;
        }

        let using = if delete.using.is_empty() {
            Support::Supported
        } else {
            self.require(Operation::DeleteUsing)?
        };

        if using == Support::Emulated {
            // delete t from t, u where ..
            let Some(target) = delete.table.reference_name() else {
                return Err(self.unsupported(Operation::DeleteUsing));
            };
            self.kw("delete ");
            self.name(target);
            self.output_clause("deleted", &delete.returning)?;
            self.in_clause(Clause::From, |ctx| {
                ctx.kw(" from ");
                ctx.table_ref(&delete.table)?;
                for table in &delete.using {
                    ctx.push(", ");
                    ctx.table_ref(table)?;
                }
                Ok(())
            })?;
        } else {
            self.kw("delete from ");
            self.table_ref(&delete.table)?;
            self.output_clause("deleted", &delete.returning)?;
            if !delete.using.is_empty() {
                self.in_clause(Clause::From, |ctx| {
                    ctx.kw(" using ");
                    ctx.list(&delete.using, ", ", |ctx, t| ctx.table_ref(t))
                })?;
            }
        }

        self.where_clause(delete.where_.expr())?;
        self.returning(&delete.returning)
    }

    // =========================================================================
    // MERGE
    // =========================================================================

    fn merge_node(&mut self, merge: &Merge) -> Result<()> {
        if self.require(Operation::Merge)? == Support::Emulated {
            let insert = merge_as_upsert(merge, self.dialect)?;
            return self.insert_node(&insert);
        }

        let oracle = self.dialect == Dialect::Oracle;
        self.kw("merge into ");
        self.table_ref(&merge.table)?;
        self.in_clause(Clause::MergeUsing, |ctx| {
            ctx.kw(" using ");
            ctx.table_ref(&merge.using)
        })?;
        self.in_clause(Clause::MergeOn, |ctx| {
            ctx.kw(" on (");
            ctx.expr0(merge.on.expr())?;
            ctx.push(")");
            Ok(())
        })?;

        let mut after_update = false;
        for clause in &merge.clauses {
            match clause {
                MergeClause::MatchedUpdate { set, where_ } => {
                    self.kw(" when matched");
                    if !oracle {
                        self.merge_condition(where_)?;
                    }
                    self.kw(" then update set ");
                    self.assignments(set)?;
                    if oracle {
                        self.where_clause(where_.expr())?;
                    }
                    after_update = true;
                }
                MergeClause::MatchedDelete { where_ } if oracle => {
                    // Only as a rider of the preceding update
                    if !after_update {
                        return Err(self.unsupported(Operation::Merge));
                    }
                    self.kw(" delete where ");
                    if where_.is_none() {
                        self.bool_literal(true);
                    } else {
                        self.expr0(where_.expr())?;
                    }
                    after_update = false;
                }
                MergeClause::MatchedDelete { where_ } => {
                    self.kw(" when matched");
                    self.merge_condition(where_)?;
                    self.kw(" then delete");
                }
                MergeClause::NotMatchedInsert {
                    columns,
                    values,
                    where_,
                } => {
                    self.kw(" when not matched");
                    if !oracle {
                        self.merge_condition(where_)?;
                    }
                    self.kw(" then insert ");
                    self.column_list(columns)?;
                    self.kw(" values (");
                    self.list(values, ", ", |ctx, e| ctx.expr0(e))?;
                    self.push(")");
                    if oracle {
                        self.where_clause(where_.expr())?;
                    }
                    after_update = false;
                }
            }
        }

        if self.dialect == Dialect::SqlServer {
            self.push(";");
        }
        Ok(())
    }

    fn merge_condition(&mut self, condition: &Condition) -> Result<()> {
        if condition.is_none() {
            return Ok(());
        }
        self.kw(" and ");
        self.expr(condition.expr(), super::expr::PREC_AND)
    }

    // =========================================================================
    // CALL
    // =========================================================================

    fn call_node(&mut self, call: &Call) -> Result<()> {
        self.require(Operation::ProcedureCall)?;
        match self.dialect {
            Dialect::Oracle => {
                self.kw("begin ");
                self.qualified_name(&call.name);
                self.call_args(call, true)?;
                self.kw("; end;");
            }
            Dialect::SqlServer | Dialect::Sybase => {
                self.kw("exec ");
                self.qualified_name(&call.name);
                if !call.args.is_empty() {
                    self.push(" ");
                    self.call_args(call, false)?;
                }
            }
            _ => {
                self.kw("call ");
                self.qualified_name(&call.name);
                self.call_args(call, true)?;
            }
        }
        Ok(())
    }

    fn call_args(&mut self, call: &Call, parenthesized: bool) -> Result<()> {
        self.in_clause(Clause::CallArgs, |ctx| {
            if parenthesized {
                ctx.push("(");
            }
            ctx.list(&call.args, ", ", |ctx, e| ctx.expr0(e))?;
            if parenthesized {
                ctx.push(")");
            }
            Ok(())
        })
    }
}

/// Rewrite a MERGE into an INSERT .. ON CONFLICT for dialects without MERGE.
///
/// Supported shape: an ON condition made of `target.col = source.col`
/// equalities, exactly one WHEN NOT MATCHED THEN INSERT and at most one WHEN
/// MATCHED THEN UPDATE.
fn merge_as_upsert(merge: &Merge, dialect: Dialect) -> Result<Insert> {
    let unsupported = || QuillError::unsupported(Operation::Merge, dialect);

    let target = merge.table.reference_name().ok_or_else(unsupported)?;
    let source = merge.using.reference_name().ok_or_else(unsupported)?;

    let mut keys = Vec::new();
    let equalities: &[Expr] = match merge.on.expr() {
        Expr::And(items) => items,
        single => core::slice::from_ref(single),
    };
    for equality in equalities {
        let Expr::Compare {
            op: CompareOp::Eq,
            left,
            right,
        } = equality
        else {
            return Err(unsupported());
        };
        let key = match (left.as_ref(), right.as_ref()) {
            (Expr::Column(l), Expr::Column(_)) if qualified_by(l, target) => l.name.clone(),
            (Expr::Column(_), Expr::Column(r)) if qualified_by(r, target) => r.name.clone(),
            _ => return Err(unsupported()),
        };
        keys.push(key);
    }
    if keys.is_empty() {
        return Err(unsupported());
    }

    let mut update = None;
    let mut insert = None;
    for clause in &merge.clauses {
        match clause {
            MergeClause::MatchedUpdate { set, where_ } if update.is_none() => {
                update = Some((set, where_));
            }
            MergeClause::NotMatchedInsert {
                columns,
                values,
                where_,
            } if insert.is_none() => insert = Some((columns, values, where_)),
            _ => return Err(unsupported()),
        }
    }
    let (columns, values, insert_where) = insert.ok_or_else(unsupported)?;
    if columns.len() != values.len() {
        return Err(unsupported());
    }

    // Source columns map to the excluded row by the insert column they feed
    let excluded_for = |column: &ColumnRef| -> Result<Option<Expr>> {
        if !qualified_by(column, source) {
            return Ok(None);
        }
        values
            .iter()
            .zip(columns)
            .find_map(|(value, insert_column)| match value {
                Expr::Column(c) if c.name == column.name && qualified_by(c, source) => {
                    Some(Expr::Excluded(insert_column.clone()))
                }
                _ => None,
            })
            .map(Some)
            .ok_or_else(unsupported)
    };

    let action = match update {
        None => ConflictAction::DoNothing,
        Some((set, where_)) => {
            if !where_.is_none() && dialect.is_mysql_family() {
                return Err(unsupported());
            }
            let mut rewritten = Vec::with_capacity(set.len());
            for (column, value) in set {
                rewritten.push((column.clone(), rewrite(value, &excluded_for)?));
            }
            ConflictAction::DoUpdate {
                set: rewritten,
                where_: Condition::new(rewrite(where_.expr(), &excluded_for)?),
            }
        }
    };

    let query = Select {
        fields: values.clone(),
        from: vec![merge.using.clone()],
        where_: insert_where.clone(),
        ..Select::default()
    };

    Ok(Insert {
        with: None,
        table: merge.table.clone(),
        columns: columns.clone(),
        source: InsertSource::Select(Box::new(query)),
        on_conflict: Some(OnConflict {
            target: keys,
            action,
        }),
        returning: Vec::new(),
    })
}

/// Whether the last clause of `query` is its FROM clause.
fn ends_with_from(query: &Select) -> bool {
    query.where_.is_none()
        && query.group_by.is_empty()
        && query.having.is_none()
        && query.windows.is_empty()
        && !query.is_compound()
        && query.order_by.is_empty()
        && query.limit.is_none()
        && query.offset.is_none()
}

/// Whether `column` is qualified by exactly `name`.
fn qualified_by(column: &ColumnRef, name: &Name) -> bool {
    column
        .qualifier
        .as_ref()
        .and_then(QualifiedName::last)
        .is_some_and(|q| q == name)
}

/// Copy of `expr` with columns replaced by `f`. Subqueries are kept as is.
fn rewrite(expr: &Expr, f: &impl Fn(&ColumnRef) -> Result<Option<Expr>>) -> Result<Expr> {
    let boxed = |e: &Expr| rewrite(e, f).map(Box::new);
    let all = |items: &[Expr]| items.iter().map(|e| rewrite(e, f)).collect::<Result<Vec<_>>>();

    Ok(match expr {
        Expr::Column(column) => match f(column)? {
            Some(replacement) => replacement,
            None => Expr::Column(column.clone()),
        },
        Expr::Unary { op, expr } => Expr::Unary {
            op: *op,
            expr: boxed(expr)?,
        },
        Expr::Binary { op, left, right } => Expr::Binary {
            op: *op,
            left: boxed(left)?,
            right: boxed(right)?,
        },
        Expr::Compare { op, left, right } => Expr::Compare {
            op: *op,
            left: boxed(left)?,
            right: boxed(right)?,
        },
        Expr::And(items) => Expr::And(all(items)?),
        Expr::Or(items) => Expr::Or(all(items)?),
        Expr::Not(inner) => Expr::Not(boxed(inner)?),
        Expr::IsNull { expr, negated } => Expr::IsNull {
            expr: boxed(expr)?,
            negated: *negated,
        },
        Expr::IsDistinctFrom {
            left,
            right,
            negated,
        } => Expr::IsDistinctFrom {
            left: boxed(left)?,
            right: boxed(right)?,
            negated: *negated,
        },
        Expr::Between {
            expr,
            low,
            high,
            negated,
            symmetric,
        } => Expr::Between {
            expr: boxed(expr)?,
            low: boxed(low)?,
            high: boxed(high)?,
            negated: *negated,
            symmetric: *symmetric,
        },
        Expr::InList {
            expr,
            list,
            negated,
        } => Expr::InList {
            expr: boxed(expr)?,
            list: all(list)?,
            negated: *negated,
        },
        Expr::Like {
            expr,
            pattern,
            escape,
            negated,
            case_insensitive,
        } => Expr::Like {
            expr: boxed(expr)?,
            pattern: boxed(pattern)?,
            escape: *escape,
            negated: *negated,
            case_insensitive: *case_insensitive,
        },
        Expr::Function(call) => Expr::Function(Box::new(FunctionCall {
            args: all(&call.args)?,
            filter: call.filter.as_ref().map(|e| rewrite(e, f)).transpose()?,
            ..FunctionCall::clone(call)
        })),
        Expr::Case(case) => Expr::Case(Box::new(CaseExpr {
            whens: case
                .whens
                .iter()
                .map(|(w, t)| Ok((rewrite(w, f)?, rewrite(t, f)?)))
                .collect::<Result<Vec<_>>>()?,
            otherwise: case.otherwise.as_ref().map(|e| rewrite(e, f)).transpose()?,
        })),
        Expr::Cast { expr, to } => Expr::Cast {
            expr: boxed(expr)?,
            to: to.clone(),
        },
        Expr::Alias { expr, alias } => Expr::Alias {
            expr: boxed(expr)?,
            alias: alias.clone(),
        },
        Expr::Array(items) => Expr::Array(all(items)?),
        other => other.clone(),
    })
}
