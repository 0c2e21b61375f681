use chrono::NaiveDate;
use common::{Recorded, Recorder, Users};
use quill::expr::ParamMode;
use quill::prelude::*;
use rust_decimal::Decimal;

mod common;

fn by_id_and_age(u: &Users) -> impl ToStatement {
    select(&u.id)
        .from(&u.table)
        .where_(u.id.eq(param("uid", 7)))
        .and(u.age.gt(18))
}

fn with_params(dialect: Dialect, param_type: ParamType) -> DslContext {
    DslContext::new(dialect).with_settings(Settings::new().with_param_type(param_type))
}

#[test]
fn test_binder_follows_marker_order() {
    let u = Users::new();
    let ctx = DslContext::new(Dialect::PostgreSQL);
    let rendered = ctx
        .render(
            &update(&u.table)
                .set(&u.email, None::<String>)
                .set(&u.name, "ada")
                .where_(u.id.eq(7)),
        )
        .unwrap();

    let mut recorder = Recorder::default();
    ctx.bind(&rendered, &mut recorder).unwrap();
    assert_eq!(
        recorder.calls,
        [
            Recorded::Null(1),
            Recorded::Value(2, Value::Text("ada".into())),
            Recorded::Value(3, Value::Int(7)),
        ]
    );
}

#[test]
fn test_out_parameters() {
    let query = call("next_id").arg(val(5)).out::<i64>();

    let rendered = assert_sql!(Dialect::PostgreSQL, query, r#"call "next_id"(?, ?)"#);
    assert_eq!(rendered.marker_count(), 2);
    assert_eq!(rendered.binds().len(), 1);
    assert_eq!(rendered.out_parameters().len(), 1);
    assert_eq!(rendered.out_parameters()[0].index, 2);

    let mut recorder = Recorder::default();
    quill::bind(&rendered, &mut recorder).unwrap();
    assert_eq!(
        recorder.calls,
        [Recorded::Value(1, Value::Int(5)), Recorded::Out(2)]
    );

    assert_sql!(Dialect::Oracle, query, r#"begin "next_id"(?, ?); end;"#);
    assert_sql!(Dialect::SqlServer, query, "exec [next_id] ?, ?");
    assert_unsupported!(Dialect::SQLite, query, Operation::ProcedureCall);
}

#[test]
fn test_in_out_parameter_is_registered_and_set() {
    let query = call("bump").in_out(3);
    let rendered = assert_sql!(Dialect::SqlServer, query, "exec [bump] ?");

    assert_eq!(rendered.binds()[0].mode, ParamMode::InOut);
    let mut recorder = Recorder::default();
    quill::bind(&rendered, &mut recorder).unwrap();
    assert_eq!(
        recorder.calls,
        [Recorded::Out(1), Recorded::Value(1, Value::Int(3))]
    );
}

#[test]
fn test_call_without_arguments() {
    assert_sql!(
        Dialect::PostgreSQL,
        call("admin.refresh"),
        r#"call "admin"."refresh"()"#
    );
    assert_sql!(Dialect::Sybase, call("refresh"), "exec [refresh]");
}

#[test]
fn test_numbered_markers() {
    let u = Users::new();
    let query = by_id_and_age(&u);

    let numbered = |dialect| {
        with_params(dialect, ParamType::Numbered)
            .render(&query)
            .unwrap()
            .into_sql()
    };
    assert_eq!(
        numbered(Dialect::PostgreSQL),
        r#"select "id" from "users" where "id" = $1 and "age" > $2"#
    );
    assert_eq!(
        numbered(Dialect::SQLite),
        r#"select "id" from "users" where "id" = ?1 and "age" > ?2"#
    );
    assert_eq!(
        numbered(Dialect::Oracle),
        r#"select "id" from "users" where "id" = :1 and "age" > :2"#
    );
    assert_eq!(
        numbered(Dialect::MySQL),
        "select `id` from `users` where `id` = ? and `age` > ?"
    );
}

#[test]
fn test_named_markers() {
    let u = Users::new();
    let query = by_id_and_age(&u);

    let rendered = with_params(Dialect::Oracle, ParamType::Named)
        .render(&query)
        .unwrap();
    assert_eq!(
        rendered.sql(),
        r#"select "id" from "users" where "id" = :uid and "age" > :2"#
    );
    assert_eq!(rendered.binds()[0].name.as_deref(), Some("uid"));
    assert_eq!(rendered.binds()[1].name, None);

    // No named markers on PostgreSQL
    let rendered = with_params(Dialect::PostgreSQL, ParamType::Named)
        .render(&query)
        .unwrap();
    assert_eq!(
        rendered.sql(),
        r#"select "id" from "users" where "id" = ? and "age" > ?"#
    );
}

#[test]
fn test_named_or_inlined() {
    let u = Users::new();
    let rendered = with_params(Dialect::Oracle, ParamType::NamedOrInlined)
        .render(&by_id_and_age(&u))
        .unwrap();

    assert_eq!(
        rendered.sql(),
        r#"select "id" from "users" where "id" = :uid and "age" > 18"#
    );
    assert_eq!(bind_values!(rendered), [Value::Int(7)]);
}

#[test]
fn test_static_statement_inlines_everything() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.name.eq("O'Brien"))
        .and(u.age.gt(30));

    let ctx = DslContext::new(Dialect::PostgreSQL).with_settings(
        Settings::new().with_statement_type(StatementType::StaticStatement),
    );
    let rendered = ctx.render(&query).unwrap();
    assert_eq!(
        rendered.sql(),
        r#"select "id" from "users" where "name" = 'O''Brien' and "age" > 30"#
    );
    assert!(rendered.binds().is_empty());
    assert_eq!(rendered.marker_count(), 0);

    assert_eq!(
        DslContext::new(Dialect::MySQL).render_inlined(&query).unwrap(),
        "select `id` from `users` where `name` = 'O''Brien' and `age` > 30"
    );
}

#[test]
fn test_inline_literals() {
    let u = Users::new();
    let query = select(&u.id).from(&u.table).where_(u.id.eq(inline(5)));
    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where "id" = 5"#
    );
    assert!(rendered.binds().is_empty());

    let flag = select(inline(true));
    assert_sql!(Dialect::PostgreSQL, flag, "select true");
    assert_sql!(Dialect::SqlServer, flag, "select 1");

    let date = select(inline(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
    assert_sql!(Dialect::PostgreSQL, date, "select date '2024-01-31'");
    assert_sql!(Dialect::SQLite, date, "select '2024-01-31'");
}

#[test]
fn test_placeholders_are_bound_by_name() {
    let u = Users::new();
    let query = select(&u.id).from(&u.table).where_(
        u.id.eq(placeholder::<i32>("uid"))
            .or(u.age.eq(placeholder::<i32>("uid"))),
    );
    let mut rendered = crate::common::render(Dialect::PostgreSQL, &query);
    assert_eq!(bind_values!(rendered), [Value::Null, Value::Null]);

    assert_eq!(rendered.bind_named("uid", 42).unwrap(), 2);
    assert_eq!(bind_values!(rendered), [Value::Int(42), Value::Int(42)]);

    // Values are coerced to the column type
    rendered.bind_named("uid", "43").unwrap();
    assert_eq!(bind_values!(rendered), [Value::Int(43), Value::Int(43)]);

    assert!(rendered.bind_named("uid", "not a number").is_err());
    match rendered.bind_named("missing", 1) {
        Err(QuillError::Statement { index: 0, message }) => {
            assert!(message.contains("missing"), "{message}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_bind_named_all() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.id.eq(placeholder::<i32>("uid")))
        .and(u.name.eq(placeholder::<String>("who")));
    let mut rendered = crate::common::render(Dialect::SQLite, &query);

    rendered
        .bind_named_all([("uid", Value::Int(7)), ("who", Value::from("ada"))])
        .unwrap();
    assert_eq!(
        bind_values!(rendered),
        [Value::Int(7), Value::Text("ada".into())]
    );

    let err = rendered
        .bind_named_all([("uid", Value::Int(8)), ("nope", Value::Int(1))])
        .unwrap_err();
    assert!(matches!(err, QuillError::Statement { index: 0, .. }), "{err:?}");
}

#[test]
fn test_invalid_settings_are_rejected() {
    let u = Users::new();
    let ctx = DslContext::new(Dialect::PostgreSQL)
        .with_settings(Settings::new().with_in_list_pad_base(1));
    let err = ctx.render(&select(&u.id).from(&u.table)).unwrap_err();
    assert!(matches!(err, QuillError::Config(_)), "{err:?}");
}

#[test]
fn test_decimal_values() {
    let products = Table::new("products");
    let price: Field<Decimal> = products.column("price");
    let query = update(&products)
        .set(&price, Decimal::new(1990, 2))
        .where_(price.lt(Decimal::ONE));

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"update "products" set "price" = ? where "price" < ?"#
    );
    assert_eq!(
        bind_values!(rendered),
        [Value::Decimal(Decimal::new(1990, 2)), Value::Decimal(Decimal::ONE)]
    );
    assert_eq!(
        DslContext::new(Dialect::MySQL).render_inlined(&query).unwrap(),
        "update `products` set `price` = 19.90 where `price` < 1"
    );
}

#[test]
fn test_inlined_strings_escape_backslashes_on_mysql() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.name.eq(r"x\' or 1=1 -- "))
        .and(u.id.eq(1));

    let ctx = DslContext::new(Dialect::MySQL)
        .with_settings(Settings::new().with_param_type(ParamType::Inlined));
    assert_eq!(
        ctx.render(&query).unwrap().sql(),
        r"select `id` from `users` where `name` = 'x\\'' or 1=1 -- ' and `id` = 1"
    );
    assert_eq!(
        DslContext::new(Dialect::PostgreSQL).render_inlined(&query).unwrap(),
        r#"select "id" from "users" where "name" = 'x\'' or 1=1 -- ' and "id" = 1"#
    );
}
