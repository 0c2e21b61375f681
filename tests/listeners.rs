use std::sync::{Arc, Mutex};

use common::Users;
use quill::listener::{QueryPart, QueryPartRef};
use quill::prelude::*;
use quill::table::TableRef;

mod common;

/// Moves unqualified tables into a tenant schema.
struct TenantSchema {
    schema: &'static str,
}

impl VisitListener for TenantSchema {
    fn visit_start(&self, ctx: &mut VisitContext<'_>) -> quill::Result<()> {
        let QueryPartRef::Table(TableRef::Named { name, alias }) = ctx.part() else {
            return Ok(());
        };
        if name.parts().len() != 1 {
            return Ok(());
        }
        let Some(table) = name.last().map(|n| n.as_str().to_owned()) else {
            return Ok(());
        };
        let mut replacement = Table::with_schema(self.schema, table.as_str());
        if let Some(alias) = alias {
            replacement = replacement.as_(alias.clone());
        }
        ctx.replace(QueryPart::Table(replacement.into()))
    }
}

/// Restricts every top-level select to one tenant.
struct TenantFilter {
    tenant: i32,
}

impl VisitListener for TenantFilter {
    fn visit_start(&self, ctx: &mut VisitContext<'_>) -> quill::Result<()> {
        let QueryPartRef::Select(select) = ctx.part() else {
            return Ok(());
        };
        if ctx.clause().is_some() {
            return Ok(());
        }
        let tenant_id: Field<i32> = Table::new("users").column("tenant_id");
        let mut select = select.clone();
        select.where_ = select.where_.and(tenant_id.eq(self.tenant));
        ctx.replace(QueryPart::Select(select))
    }
}

#[derive(Default)]
struct Trace {
    events: Mutex<Vec<(&'static str, &'static str, Option<Clause>)>>,
}

impl VisitListener for Trace {
    fn visit_start(&self, ctx: &mut VisitContext<'_>) -> quill::Result<()> {
        let event = ("start", ctx.part().kind(), ctx.clause());
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    fn visit_end(&self, ctx: &mut VisitContext<'_>) -> quill::Result<()> {
        let event = ("end", ctx.part().kind(), ctx.clause());
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[test]
fn test_table_replacement() {
    let u = Users::new();
    let ctx = DslContext::new(Dialect::PostgreSQL).with_listener(TenantSchema { schema: "tenant_1" });

    let rendered = ctx
        .render(&select(&u.id).from(&u.table).where_(u.id.eq(7)))
        .unwrap();
    assert_eq!(
        rendered.sql(),
        r#"select "id" from "tenant_1"."users" where "id" = ?"#
    );

    let rendered = ctx.render(&delete_from(&u.table).where_(u.id.eq(7))).unwrap();
    assert_eq!(
        rendered.sql(),
        r#"delete from "tenant_1"."users" where "id" = ?"#
    );
}

#[test]
fn test_table_replacement_keeps_alias() {
    let u = Users::aliased("u");
    let ctx = DslContext::new(Dialect::MySQL).with_listener(TenantSchema { schema: "tenant_1" });

    let rendered = ctx.render(&select(&u.id).from(&u.table)).unwrap();
    assert_eq!(
        rendered.sql(),
        "select `u`.`id` from `tenant_1`.`users` as `u`"
    );
}

#[test]
fn test_select_replacement_adds_condition() {
    let u = Users::new();
    let ctx = DslContext::new(Dialect::PostgreSQL).with_listener(TenantFilter { tenant: 42 });

    let rendered = ctx
        .render(&select(&u.id).from(&u.table).where_(u.age.gt(18)))
        .unwrap();
    assert_eq!(
        rendered.sql(),
        r#"select "id" from "users" where "age" > ? and "tenant_id" = ?"#
    );
    assert_eq!(
        bind_values!(rendered),
        [Value::Int(18), Value::Int(42)]
    );
}

#[test]
fn test_listeners_run_in_registration_order() {
    let u = Users::new();
    let trace = Arc::new(Trace::default());
    let ctx = DslContext::new(Dialect::PostgreSQL)
        .with_listener(TenantSchema { schema: "tenant_1" })
        .with_shared_listener(trace.clone());

    ctx.render(&select(&u.id).from(&u.table)).unwrap();

    let events = trace.events.lock().unwrap();
    assert_eq!(
        *events,
        [
            ("start", "select", None),
            ("start", "expression", Some(Clause::Select)),
            ("end", "expression", Some(Clause::Select)),
            ("start", "table", Some(Clause::From)),
            ("end", "table", Some(Clause::From)),
            ("end", "select", None),
        ]
    );
}

#[test]
fn test_clause_is_reported() {
    let u = Users::new();
    let trace = Arc::new(Trace::default());
    let ctx = DslContext::new(Dialect::SQLite).with_shared_listener(trace.clone());

    ctx.render(
        &select(&u.id)
            .from(&u.table)
            .where_(u.age.gt(18))
            .order_by(u.id.asc()),
    )
    .unwrap();

    let events = trace.events.lock().unwrap();
    assert!(events.contains(&("start", "expression", Some(Clause::Where))));
    assert!(events.contains(&("start", "expression", Some(Clause::OrderBy))));
}

#[test]
fn test_replacement_must_keep_the_kind() {
    struct Mismatch;

    impl VisitListener for Mismatch {
        fn visit_start(&self, ctx: &mut VisitContext<'_>) -> quill::Result<()> {
            if let QueryPartRef::Table(_) = ctx.part() {
                ctx.replace(QueryPart::Expr(Expr::Default))?;
            }
            Ok(())
        }
    }

    let u = Users::new();
    let ctx = DslContext::new(Dialect::PostgreSQL).with_listener(Mismatch);
    let err = ctx.render(&select(&u.id).from(&u.table)).unwrap_err();
    match err {
        QuillError::Render { message, .. } => {
            assert_eq!(message, "cannot replace a table with a expression");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_replacement_only_in_visit_start() {
    struct Late;

    impl VisitListener for Late {
        fn visit_end(&self, ctx: &mut VisitContext<'_>) -> quill::Result<()> {
            if let QueryPartRef::Table(table) = ctx.part() {
                let table = table.clone();
                ctx.replace(QueryPart::Table(table))?;
            }
            Ok(())
        }
    }

    let u = Users::new();
    let ctx = DslContext::new(Dialect::PostgreSQL).with_listener(Late);
    let err = ctx.render(&select(&u.id).from(&u.table)).unwrap_err();
    assert!(matches!(err, QuillError::Render { .. }), "{err:?}");
}
