//! Expression rendering.
//!
//! Every node has a binding strength; a child weaker than its context is
//! parenthesized. Right operands of binary operators are rendered one level
//! tighter, so `a - (b - c)` keeps its parentheses and `(a - b) - c` loses
//! them.

use super::context::RenderContext;
use crate::capability::{Operation, Support};
use crate::error::{QuillError, Result};
use crate::expr::{
    BinaryOp, CaseExpr, ColumnRef, CompareOp, Expr, FunctionCall, FunctionKind, Over,
    PlainSql, Quantifier, SortField, UnaryOp, WindowSpec,
};
use crate::expr::{Frame, FrameBound, FrameUnits, NullsOrder, SortOrder};
use crate::listener::{QueryPart, QueryPartRef};
use quill_types::Dialect;

pub(crate) const PREC_OR: u8 = 1;
pub(crate) const PREC_AND: u8 = 2;
pub(crate) const PREC_NOT: u8 = 3;
pub(crate) const PREC_CMP: u8 = 4;
const PREC_BIT_OR: u8 = 5;
const PREC_BIT_XOR: u8 = 6;
const PREC_BIT_AND: u8 = 7;
const PREC_ADD: u8 = 8;
const PREC_MUL: u8 = 9;
const PREC_UNARY: u8 = 10;
const PREC_ATOM: u8 = 11;

fn binary_prec(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::BitOr => PREC_BIT_OR,
        BinaryOp::BitXor => PREC_BIT_XOR,
        BinaryOp::BitAnd => PREC_BIT_AND,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Concat => PREC_ADD,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => PREC_MUL,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Or(items) if items.len() > 1 => PREC_OR,
        Expr::And(items) if items.len() > 1 => PREC_AND,
        Expr::Not(_) => PREC_NOT,
        Expr::Compare { .. }
        | Expr::IsNull { .. }
        | Expr::IsDistinctFrom { .. }
        | Expr::Between { .. }
        | Expr::InList { .. }
        | Expr::InSelect { .. }
        | Expr::Exists { .. }
        | Expr::Like { .. }
        | Expr::NoCondition => PREC_CMP,
        Expr::Binary { op, .. } => binary_prec(*op),
        Expr::Unary { .. } => PREC_UNARY,
        // Single-item AND/OR render their item
        Expr::Or(items) | Expr::And(items) => items.first().map_or(PREC_CMP, precedence),
        // `1 = 1` without boolean literals
        Expr::Bool(_) => PREC_CMP,
        _ => PREC_ATOM,
    }
}

impl RenderContext<'_> {
    /// Render `expr` in a context binding at `min_prec`.
    pub(crate) fn expr(&mut self, expr: &Expr, min_prec: u8) -> Result<()> {
        if !self.has_listeners() {
            return self.expr_node(expr, min_prec);
        }
        let replacement = self.visit_start(QueryPartRef::Expr(expr))?;
        let rendered = match &replacement {
            Some(QueryPart::Expr(replaced)) => replaced,
            _ => expr,
        };
        self.expr_node(rendered, min_prec)?;
        self.visit_end(QueryPartRef::Expr(rendered))
    }

    /// Top-level expression, never parenthesized.
    #[inline]
    pub(crate) fn expr0(&mut self, expr: &Expr) -> Result<()> {
        self.expr(expr, 0)
    }

    fn expr_node(&mut self, expr: &Expr, min_prec: u8) -> Result<()> {
        let prec = precedence(expr);
        let wrap = prec < min_prec;
        if wrap {
            self.push("(");
        }
        self.expr_inner(expr, prec)?;
        if wrap {
            self.push(")");
        }
        Ok(())
    }

    fn expr_inner(&mut self, expr: &Expr, prec: u8) -> Result<()> {
        match expr {
            Expr::Column(column) => self.column(column),
            Expr::Sql(sql) => self.plain_sql(sql)?,
            Expr::Param(param) => self.param(param)?,
            Expr::Unary { op, expr } => self.unary(*op, expr)?,
            Expr::Binary { op, left, right } => self.binary(*op, left, right, prec)?,
            Expr::Compare { op, left, right } => self.compare(*op, left, right)?,
            Expr::Quantified { quantifier, query } => {
                self.require(Operation::QuantifiedComparison)?;
                self.kw(match quantifier {
                    Quantifier::All => "all (",
                    Quantifier::Any => "any (",
                });
                self.select(query)?;
                self.push(")");
            }
            Expr::Subquery(query) => {
                self.push("(");
                self.select(query)?;
                self.push(")");
            }
            Expr::And(items) => self.junction(items, " and ", PREC_AND, true)?,
            Expr::Or(items) => self.junction(items, " or ", PREC_OR, false)?,
            Expr::Not(inner) => {
                self.kw("not (");
                self.expr0(inner)?;
                self.push(")");
            }
            Expr::IsNull { expr, negated } => {
                self.expr(expr, PREC_CMP + 1)?;
                self.kw(if *negated { " is not null" } else { " is null" });
            }
            Expr::IsDistinctFrom {
                left,
                right,
                negated,
            } => self.is_distinct_from(left, right, *negated)?,
            Expr::Between {
                expr,
                low,
                high,
                negated,
                symmetric,
            } => self.between(expr, low, high, *negated, *symmetric)?,
            Expr::InList {
                expr,
                list,
                negated,
            } => self.in_list(expr, list, *negated)?,
            Expr::InSelect {
                expr,
                query,
                negated,
            } => {
                self.expr(expr, PREC_CMP + 1)?;
                self.kw(if *negated { " not in (" } else { " in (" });
                self.select(query)?;
                self.push(")");
            }
            Expr::Exists { query, negated } => {
                self.kw(if *negated { "not exists (" } else { "exists (" });
                self.select(query)?;
                self.push(")");
            }
            Expr::Like {
                expr,
                pattern,
                escape,
                negated,
                case_insensitive,
            } => self.like(expr, pattern, *escape, *negated, *case_insensitive)?,
            Expr::Function(call) => self.function(call)?,
            Expr::Case(case) => self.case(case)?,
            Expr::Cast { expr, to } => {
                self.kw("cast(");
                self.expr0(expr)?;
                self.kw(" as ");
                let type_name = to.cast_type_name(self.dialect);
                self.push(&type_name);
                self.push(")");
            }
            Expr::Alias { expr, alias } => {
                if self.declares_aliases() {
                    self.expr(expr, PREC_CMP + 1)?;
                    self.kw(" as ");
                }
                self.name(alias);
            }
            Expr::Asterisk(qualifier) => {
                if let Some(qualifier) = qualifier {
                    self.qualified_name(qualifier);
                    self.push(".");
                }
                self.push("*");
            }
            Expr::Array(items) => {
                self.require(Operation::ArrayLiterals)?;
                let bracket_only = matches!(self.dialect, Dialect::BigQuery | Dialect::ClickHouse);
                self.kw(if bracket_only { "[" } else { "array[" });
                self.list(items, ", ", |ctx, item| ctx.expr0(item))?;
                self.push("]");
            }
            Expr::Default => self.kw("default"),
            Expr::Excluded(name) => {
                if name.as_str().is_empty() {
                    return Err(QuillError::render(
                        expr.node_name(),
                        "excluded() needs a column reference",
                    ));
                }
                if self.dialect.is_mysql_family() {
                    self.kw("values(");
                    self.name(name);
                    self.push(")");
                } else {
                    self.kw("excluded.");
                    self.name(name);
                }
            }
            Expr::Bool(value) => self.bool_literal(*value),
            Expr::NoCondition => self.bool_literal(true),
        }
        Ok(())
    }

    fn column(&mut self, column: &ColumnRef) {
        if let Some(qualifier) = &column.qualifier {
            self.qualified_name(qualifier);
            self.push(".");
        }
        self.name(&column.name);
    }

    pub(crate) fn bool_literal(&mut self, value: bool) {
        if self.support(Operation::BooleanLiterals) == Support::Supported {
            self.kw(if value { "true" } else { "false" });
        } else {
            self.emulating(Operation::BooleanLiterals);
            self.push(if value { "1 = 1" } else { "1 = 0" });
        }
    }

    /// Substitute `{n}` placeholders; anything else is copied verbatim.
    fn plain_sql(&mut self, sql: &PlainSql) -> Result<()> {
        let template = sql.template.as_str();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after.find('}');
            let index = close.and_then(|c| after[..c].parse::<usize>().ok());
            match (close, index) {
                (Some(close), Some(index)) if index < sql.args.len() => {
                    self.push(&rest[..open]);
                    self.expr(&sql.args[index], PREC_ATOM)?;
                    rest = &after[close + 1..];
                }
                _ => {
                    self.push(&rest[..=open]);
                    rest = after;
                }
            }
        }
        self.push(rest);
        Ok(())
    }

    /// `-x`; anything but a column is parenthesized so a leading `-` in the
    /// operand cannot form a `--` comment.
    fn negated(&mut self, expr: &Expr) -> Result<()> {
        if let Expr::Column(_) = expr {
            self.push("-");
            return self.expr(expr, PREC_UNARY);
        }
        self.push("-(");
        self.expr0(expr)?;
        self.push(")");
        Ok(())
    }

    fn unary(&mut self, op: UnaryOp, expr: &Expr) -> Result<()> {
        match op {
            UnaryOp::Neg => self.negated(expr),
            UnaryOp::BitNot => match self.require(Operation::BitwiseOperations)? {
                Support::Supported => {
                    self.push("~");
                    self.expr(expr, PREC_UNARY)
                }
                _ => match self.dialect {
                    Dialect::Oracle => {
                        self.push("(");
                        self.negated(expr)?;
                        self.push(" - 1)");
                        Ok(())
                    }
                    Dialect::Firebird => self.call_expr("bin_not", &[expr]),
                    _ => self.call_expr("bitnot", &[expr]),
                },
            },
        }
    }

    /// `name(arg, ..)` with arguments rendered at top level.
    fn call_expr(&mut self, name: &str, args: &[&Expr]) -> Result<()> {
        self.kw(name);
        self.push("(");
        self.list(args, ", ", |ctx, arg| ctx.expr0(arg))?;
        self.push(")");
        Ok(())
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, prec: u8) -> Result<()> {
        let symbol = match op {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => {
                if matches!(
                    self.dialect,
                    Dialect::Oracle
                        | Dialect::Db2
                        | Dialect::Firebird
                        | Dialect::Informix
                        | Dialect::Derby
                        | Dialect::Hsqldb
                        | Dialect::Teradata
                ) {
                    return self.call_expr("mod", &[left, right]);
                }
                "%"
            }
            BinaryOp::Concat => match self.dialect {
                Dialect::MySQL | Dialect::MariaDB => {
                    return self.call_expr("concat", &[left, right]);
                }
                Dialect::SqlServer | Dialect::Sybase => "+",
                _ => "||",
            },
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
                match self.bitwise(op, left, right)? {
                    Some(symbol) => symbol,
                    None => return Ok(()),
                }
            }
        };
        self.expr(left, prec)?;
        self.push(" ");
        self.push(symbol);
        self.push(" ");
        self.expr(right, prec + 1)
    }

    /// Operator symbol for a native bitwise operation, or `None` after
    /// rendering an emulation.
    fn bitwise(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Option<&'static str>> {
        let operation = if op == BinaryOp::BitXor {
            Operation::BitwiseXor
        } else {
            Operation::BitwiseOperations
        };
        if self.require(operation)? == Support::Supported {
            return Ok(Some(match op {
                BinaryOp::BitAnd => "&",
                BinaryOp::BitOr => "|",
                _ if self.dialect.is_postgres_family() => "#",
                _ => "^",
            }));
        }

        match (self.dialect, op) {
            (Dialect::Oracle, BinaryOp::BitAnd) => self.call_expr("bitand", &[left, right])?,
            (Dialect::Oracle, _) => {
                // a | b = a + b - bitand(a, b); a ^ b = a + b - 2 * bitand(a, b)
                self.push("(");
                self.expr(left, PREC_ADD)?;
                self.push(" + ");
                self.expr(right, PREC_ADD + 1)?;
                self.push(if op == BinaryOp::BitOr { " - " } else { " - 2 * " });
                self.call_expr("bitand", &[left, right])?;
                self.push(")");
            }
            (Dialect::SQLite, _) => {
                // Only xor is missing
                self.push("((");
                self.expr(left, PREC_BIT_OR)?;
                self.push(" | ");
                self.expr(right, PREC_BIT_OR + 1)?;
                self.push(") - (");
                self.expr(left, PREC_BIT_AND)?;
                self.push(" & ");
                self.expr(right, PREC_BIT_AND + 1)?;
                self.push("))");
            }
            (Dialect::Firebird, _) => {
                let name = match op {
                    BinaryOp::BitAnd => "bin_and",
                    BinaryOp::BitOr => "bin_or",
                    _ => "bin_xor",
                };
                self.call_expr(name, &[left, right])?;
            }
            _ => {
                let name = match op {
                    BinaryOp::BitAnd => "bitand",
                    BinaryOp::BitOr => "bitor",
                    _ => "bitxor",
                };
                self.call_expr(name, &[left, right])?;
            }
        }
        Ok(None)
    }

    fn compare(&mut self, op: CompareOp, left: &Expr, right: &Expr) -> Result<()> {
        if let Expr::Quantified { quantifier, query } = right
            && self.support(Operation::QuantifiedComparison) == Support::Emulated
        {
            let negated = match (op, quantifier) {
                (CompareOp::Eq, Quantifier::Any) => false,
                (CompareOp::Ne, Quantifier::All) => true,
                _ => return Err(self.unsupported(Operation::QuantifiedComparison)),
            };
            self.emulating(Operation::QuantifiedComparison);
            self.expr(left, PREC_CMP + 1)?;
            self.kw(if negated { " not in (" } else { " in (" });
            self.select(query)?;
            self.push(")");
            return Ok(());
        }

        self.expr(left, PREC_CMP + 1)?;
        self.push(" ");
        self.push(op.as_str());
        self.push(" ");
        self.expr(right, PREC_CMP + 1)
    }

    fn junction(&mut self, items: &[Expr], sep: &str, prec: u8, and: bool) -> Result<()> {
        if items.is_empty() {
            self.bool_literal(and);
            return Ok(());
        }
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.kw(sep);
            }
            // Plain SQL conditions may contain their own operators
            if items.len() > 1 && matches!(item, Expr::Sql(_)) {
                self.push("(");
                self.expr0(item)?;
                self.push(")");
            } else {
                self.expr(item, prec)?;
            }
        }
        Ok(())
    }

    fn is_distinct_from(&mut self, left: &Expr, right: &Expr, negated: bool) -> Result<()> {
        if self.require(Operation::IsDistinctFrom)? == Support::Supported {
            self.expr(left, PREC_CMP + 1)?;
            self.kw(if negated {
                " is not distinct from "
            } else {
                " is distinct from "
            });
            return self.expr(right, PREC_CMP + 1);
        }

        match self.dialect {
            Dialect::MySQL | Dialect::MariaDB => {
                if !negated {
                    self.kw("not (");
                }
                self.expr(left, PREC_CMP + 1)?;
                self.push(" <=> ");
                self.expr(right, PREC_CMP + 1)?;
                if !negated {
                    self.push(")");
                }
            }
            Dialect::SQLite => {
                self.expr(left, PREC_CMP + 1)?;
                self.kw(if negated { " is " } else { " is not " });
                self.expr(right, PREC_CMP + 1)?;
            }
            _ => {
                // case when a = b or (a is null and b is null) then 1 else 0 end = 0
                self.kw("case when ");
                self.expr(left, PREC_CMP + 1)?;
                self.push(" = ");
                self.expr(right, PREC_CMP + 1)?;
                self.kw(" or (");
                self.expr(left, PREC_CMP + 1)?;
                self.kw(" is null and ");
                self.expr(right, PREC_CMP + 1)?;
                self.kw(" is null) then 1 else 0 end = ");
                self.push(if negated { "1" } else { "0" });
            }
        }
        Ok(())
    }

    fn between(
        &mut self,
        expr: &Expr,
        low: &Expr,
        high: &Expr,
        negated: bool,
        symmetric: bool,
    ) -> Result<()> {
        let keyword = if negated { " not between " } else { " between " };
        if symmetric && self.require(Operation::BetweenSymmetric)? == Support::Emulated {
            // (x between a and b or x between b and a)
            self.push("(");
            for (i, (lo, hi)) in [(low, high), (high, low)].into_iter().enumerate() {
                if i > 0 {
                    self.kw(if negated { " and " } else { " or " });
                }
                self.expr(expr, PREC_CMP + 1)?;
                self.kw(keyword);
                self.expr(lo, PREC_CMP + 1)?;
                self.kw(" and ");
                self.expr(hi, PREC_CMP + 1)?;
            }
            self.push(")");
            return Ok(());
        }

        self.expr(expr, PREC_CMP + 1)?;
        self.kw(keyword);
        if symmetric {
            self.kw("symmetric ");
        }
        self.expr(low, PREC_CMP + 1)?;
        self.kw(" and ");
        self.expr(high, PREC_CMP + 1)
    }

    fn in_list(&mut self, expr: &Expr, list: &[Expr], negated: bool) -> Result<()> {
        if list.is_empty() {
            // No SQL literal for an empty list
            self.push(if negated { "1 = 1" } else { "1 = 0" });
            return Ok(());
        }

        let padded;
        let pad = self.settings.in_list_padding && list.iter().all(|e| matches!(e, Expr::Param(_)));
        let list = if pad {
            padded = pad_in_list(list, self.settings.in_list_pad_base);
            padded.as_slice()
        } else {
            list
        };

        let chunk_size = self.dialect.max_in_list_size().unwrap_or(usize::MAX);
        let chunked = list.len() > chunk_size;
        if chunked {
            self.push("(");
        }
        for (i, chunk) in list.chunks(chunk_size).enumerate() {
            if i > 0 {
                self.kw(if negated { " and " } else { " or " });
            }
            self.expr(expr, PREC_CMP + 1)?;
            self.kw(if negated { " not in (" } else { " in (" });
            self.list(chunk, ", ", |ctx, item| ctx.expr0(item))?;
            self.push(")");
        }
        if chunked {
            self.push(")");
        }
        Ok(())
    }

    fn like(
        &mut self,
        expr: &Expr,
        pattern: &Expr,
        escape: Option<char>,
        negated: bool,
        case_insensitive: bool,
    ) -> Result<()> {
        let lower = case_insensitive && self.require(Operation::ILike)? == Support::Emulated;
        if lower {
            self.call_expr("lower", &[expr])?;
        } else {
            self.expr(expr, PREC_CMP + 1)?;
        }

        self.kw(match (negated, case_insensitive && !lower) {
            (false, false) => " like ",
            (true, false) => " not like ",
            (false, true) => " ilike ",
            (true, true) => " not ilike ",
        });

        if lower {
            self.call_expr("lower", &[pattern])?;
        } else {
            self.expr(pattern, PREC_CMP + 1)?;
        }

        if let Some(escape) = escape {
            self.kw(" escape ");
            let mut literal = String::new();
            super::literal::quote_string(&mut literal, &escape.to_string(), self.dialect);
            self.push(&literal);
        }
        Ok(())
    }

    /// Dialect spelling of a built-in function.
    fn function_name<'n>(&self, name: &'n str) -> &'n str {
        match (name, self.dialect) {
            ("length", Dialect::SqlServer | Dialect::Sybase) => "len",
            ("substring", Dialect::Oracle | Dialect::SQLite) => "substr",
            _ => name,
        }
    }

    fn function(&mut self, call: &FunctionCall) -> Result<()> {
        if call.kind == FunctionKind::Window || call.over.is_some() {
            self.require(Operation::WindowFunctions)?;
        }

        let filter = match &call.filter {
            Some(filter) if !filter.is_no_condition() => Some(filter),
            _ => None,
        };
        let emulate_filter =
            filter.is_some() && self.require(Operation::AggregateFilter)? == Support::Emulated;

        let name = self.function_name(&call.name);
        self.kw(name);
        self.push("(");
        if call.distinct {
            self.kw("distinct ");
        }

        match filter {
            Some(filter) if emulate_filter => {
                // agg(case when <filter> then <arg> end)
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.kw("case when ");
                    self.expr0(filter)?;
                    self.kw(" then ");
                    match arg {
                        Expr::Asterisk(None) => self.push("1"),
                        arg => self.expr0(arg)?,
                    }
                    self.kw(" end");
                }
            }
            _ => self.list(&call.args, ", ", |ctx, arg| ctx.expr0(arg))?,
        }
        self.push(")");

        if let Some(filter) = filter
            && !emulate_filter
        {
            self.kw(" filter (where ");
            self.expr0(filter)?;
            self.push(")");
        }

        match &call.over {
            None => {}
            Some(Over::Spec(spec)) => {
                self.kw(" over (");
                self.window_spec(spec)?;
                self.push(")");
            }
            Some(Over::Named(name)) => match self.require(Operation::WindowClause)? {
                Support::Supported => {
                    self.kw(" over ");
                    self.name(name);
                }
                _ => {
                    let Some(definition) = self.window_definition(name) else {
                        return Err(QuillError::render(
                            "window",
                            format!("window {name} is not defined"),
                        ));
                    };
                    self.kw(" over (");
                    self.window_spec(&definition.spec)?;
                    self.push(")");
                }
            },
        }
        Ok(())
    }

    pub(crate) fn window_spec(&mut self, spec: &WindowSpec) -> Result<()> {
        let mut first = true;
        if !spec.partition_by.is_empty() {
            self.kw("partition by ");
            self.list(&spec.partition_by, ", ", |ctx, e| ctx.expr0(e))?;
            first = false;
        }
        if !spec.order_by.is_empty() {
            if !first {
                self.push(" ");
            }
            self.kw("order by ");
            self.sort_fields(&spec.order_by)?;
            first = false;
        }
        if let Some(frame) = &spec.frame {
            if !first {
                self.push(" ");
            }
            self.frame(frame);
        }
        Ok(())
    }

    fn frame(&mut self, frame: &Frame) {
        self.kw(match frame.units {
            FrameUnits::Rows => "rows ",
            FrameUnits::Range => "range ",
        });
        match frame.end {
            Some(end) => {
                self.kw("between ");
                self.frame_bound(frame.start);
                self.kw(" and ");
                self.frame_bound(end);
            }
            None => self.frame_bound(frame.start),
        }
    }

    fn frame_bound(&mut self, bound: FrameBound) {
        match bound {
            FrameBound::UnboundedPreceding => self.kw("unbounded preceding"),
            FrameBound::Preceding(n) => {
                self.push(&n.to_string());
                self.kw(" preceding");
            }
            FrameBound::CurrentRow => self.kw("current row"),
            FrameBound::Following(n) => {
                self.push(&n.to_string());
                self.kw(" following");
            }
            FrameBound::UnboundedFollowing => self.kw("unbounded following"),
        }
    }

    pub(crate) fn sort_fields(&mut self, fields: &[SortField]) -> Result<()> {
        self.list(fields, ", ", |ctx, field| ctx.sort_field(field))
    }

    fn sort_field(&mut self, field: &SortField) -> Result<()> {
        let nulls = match field.nulls {
            Some(nulls) => Some((nulls, self.require(Operation::NullsOrdering)?)),
            None => None,
        };

        if let Some((nulls, Support::Emulated)) = nulls {
            // case when x is null then 0 else 1 end, x
            self.kw("case when ");
            self.expr(&field.expr, PREC_CMP + 1)?;
            self.kw(" is null then ");
            self.push(if nulls == NullsOrder::First { "0" } else { "1" });
            self.kw(" else ");
            self.push(if nulls == NullsOrder::First { "1" } else { "0" });
            self.kw(" end, ");
        }

        self.expr0(&field.expr)?;
        match field.order {
            SortOrder::Default => {}
            SortOrder::Asc => self.kw(" asc"),
            SortOrder::Desc => self.kw(" desc"),
        }

        if let Some((nulls, Support::Supported)) = nulls {
            self.kw(match nulls {
                NullsOrder::First => " nulls first",
                NullsOrder::Last => " nulls last",
            });
        }
        Ok(())
    }

    fn case(&mut self, case: &CaseExpr) -> Result<()> {
        self.kw("case");
        for (condition, result) in &case.whens {
            self.kw(" when ");
            self.expr0(condition)?;
            self.kw(" then ");
            self.expr0(result)?;
        }
        if let Some(otherwise) = &case.otherwise {
            self.kw(" else ");
            self.expr0(otherwise)?;
        }
        self.kw(" end");
        Ok(())
    }
}

/// Repeat the last element up to the next power of `base`.
fn pad_in_list(list: &[Expr], base: u32) -> Vec<Expr> {
    let base = base.max(2) as usize;
    let mut target = 1usize;
    while target < list.len() {
        target = target.saturating_mul(base);
    }
    let mut padded = list.to_vec();
    if let Some(last) = list.last() {
        padded.resize(target, last.clone());
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_reaches_next_power() {
        let list: Vec<Expr> = (0..5).map(|i| Expr::column(format!("c{i}"))).collect();
        assert_eq!(pad_in_list(&list, 2).len(), 8);
        assert_eq!(pad_in_list(&list, 3).len(), 9);
        assert_eq!(pad_in_list(&list[..4], 2).len(), 4);
        assert_eq!(pad_in_list(&list[..1], 2).len(), 1);
    }
}
