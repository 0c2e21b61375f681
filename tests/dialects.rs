use common::{Posts, Users};
use quill::prelude::*;
use quill::value::Value;

mod common;

fn paged(u: &Users) -> impl ToStatement {
    select(&u.id)
        .from(&u.table)
        .order_by(u.id.asc())
        .limit(10)
        .offset(20)
}

#[test]
fn test_limit_offset_styles() {
    let u = Users::new();
    let query = paged(&u);

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" order by "id" asc limit ? offset ?"#
    );
    assert_eq!(bind_values!(rendered), [Value::BigInt(10), Value::BigInt(20)]);

    let rendered = assert_sql!(
        Dialect::SqlServer,
        query,
        "select [id] from [users] order by [id] asc offset ? rows fetch next ? rows only"
    );
    assert_eq!(bind_values!(rendered), [Value::BigInt(20), Value::BigInt(10)]);

    assert_sql!(
        Dialect::Oracle,
        query,
        r#"select "id" from "users" order by "id" asc offset ? rows fetch next ? rows only"#
    );

    let rendered = assert_sql!(
        Dialect::Informix,
        query,
        r#"select skip ? first ? "id" from "users" order by "id" asc"#
    );
    assert_eq!(bind_values!(rendered), [Value::BigInt(20), Value::BigInt(10)]);
}

#[test]
fn test_offset_without_limit() {
    let u = Users::new();
    let query = select(&u.id).from(&u.table).offset(5);

    assert_sql!(
        Dialect::MySQL,
        query,
        "select `id` from `users` limit 18446744073709551615 offset ?"
    );
    assert_sql!(
        Dialect::SQLite,
        query,
        r#"select "id" from "users" limit -1 offset ?"#
    );
    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" offset ?"#
    );
}

#[test]
fn test_sql_server_fetch_without_order_by() {
    let u = Users::new();
    assert_sql!(
        Dialect::SqlServer,
        select(&u.id).from(&u.table).limit(3),
        "select [id] from [users] order by (select 0) offset 0 rows fetch next ? rows only"
    );
}

#[test]
fn test_top_inlines_the_limit() {
    let u = Users::new();
    let rendered = assert_sql!(
        Dialect::Sybase,
        select(&u.id).from(&u.table).order_by(u.id.asc()).limit(10),
        "select top 10 [id] from [users] order by [id] asc"
    );
    assert!(rendered.binds().is_empty());

    assert_unsupported!(Dialect::Sybase, paged(&u), Operation::Offset);
}

#[test]
fn test_offset_emulated_with_row_number() {
    let u = Users::new();
    let rendered = assert_sql!(
        Dialect::Teradata,
        paged(&u),
        r#"select "id" from (select "id", row_number() over (order by "id" asc) as "rn" from "users") as "t" where "rn" > ? and "rn" <= ? + ? order by "rn""#
    );
    assert_eq!(
        bind_values!(rendered),
        [Value::BigInt(20), Value::BigInt(20), Value::BigInt(10)]
    );
}

#[test]
fn test_offset_emulation_needs_named_fields() {
    let u = Users::new();
    let query = select(u.age.add(1)).from(&u.table).offset(1);
    let err = crate::common::render_err(Dialect::Teradata, &query);
    assert!(matches!(err, QuillError::Render { .. }), "{err:?}");
}

#[test]
fn test_boolean_literals() {
    let u = Users::new();
    let always = select(&u.id).from(&u.table).where_(Condition::true_());
    let never = select(&u.id).from(&u.table).where_(Condition::false_());

    assert_sql!(Dialect::PostgreSQL, always, r#"select "id" from "users" where true"#);
    assert_sql!(Dialect::SqlServer, always, "select [id] from [users] where 1 = 1");
    assert_sql!(Dialect::Oracle, never, r#"select "id" from "users" where 1 = 0"#);
}

#[test]
fn test_ilike_emulated_with_lower() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.name.like_ignore_case("a%"));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where "name" ilike ?"#
    );
    assert_sql!(
        Dialect::MySQL,
        query,
        "select `id` from `users` where lower(`name`) like lower(?)"
    );
}

#[test]
fn test_like_escape() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.name.like_escape("100!%", '!'));
    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where "name" like ? escape '!'"#
    );
}

#[test]
fn test_nulls_ordering() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .order_by(u.age.asc().nulls_last());

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" order by "age" asc nulls last"#
    );
    assert_sql!(
        Dialect::MySQL,
        query,
        "select `id` from `users` order by case when `age` is null then 1 else 0 end, `age` asc"
    );

    let first = select(&u.id)
        .from(&u.table)
        .order_by(u.age.desc().nulls_first());
    assert_sql!(
        Dialect::SqlServer,
        first,
        "select [id] from [users] order by case when [age] is null then 0 else 1 end, [age] desc"
    );
}

#[test]
fn test_is_distinct_from() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.age.is_distinct_from(30));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where "age" is distinct from ?"#
    );
    assert_sql!(
        Dialect::MySQL,
        query,
        "select `id` from `users` where not (`age` <=> ?)"
    );
    assert_sql!(
        Dialect::SQLite,
        query,
        r#"select "id" from "users" where "age" is not ?"#
    );
    let rendered = assert_sql!(
        Dialect::Oracle,
        query,
        r#"select "id" from "users" where case when "age" = ? or ("age" is null and ? is null) then 1 else 0 end = 0"#
    );
    assert_eq!(rendered.marker_count(), 2);
}

#[test]
fn test_between_symmetric() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.age.between_symmetric(65, 18));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where "age" between symmetric ? and ?"#
    );
    assert_sql!(
        Dialect::MySQL,
        query,
        "select `id` from `users` where (`age` between ? and ? or `age` between ? and ?)"
    );
}

#[test]
fn test_in_list_edge_cases() {
    let u = Users::new();

    assert_sql!(
        Dialect::PostgreSQL,
        select(&u.id).from(&u.table).where_(u.id.is_in([1, 2, 3])),
        r#"select "id" from "users" where "id" in (?, ?, ?)"#
    );
    assert_sql!(
        Dialect::PostgreSQL,
        select(&u.id).from(&u.table).where_(u.id.is_in(Vec::<i32>::new())),
        r#"select "id" from "users" where 1 = 0"#
    );
    assert_sql!(
        Dialect::PostgreSQL,
        select(&u.id).from(&u.table).where_(u.id.not_in(Vec::<i32>::new())),
        r#"select "id" from "users" where 1 = 1"#
    );
}

#[test]
fn test_not_in_keeps_null_members() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.id.not_in([Some(1), Some(2), None]));

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where "id" not in (?, ?, ?)"#
    );
    assert_eq!(
        bind_values!(rendered),
        [Value::Int(1), Value::Int(2), Value::Null]
    );
    assert_eq!(
        DslContext::new(Dialect::PostgreSQL).render_inlined(&query).unwrap(),
        r#"select "id" from "users" where "id" not in (1, 2, null)"#
    );
}

#[test]
fn test_in_list_padding() {
    let u = Users::new();
    let ctx = DslContext::new(Dialect::PostgreSQL)
        .with_settings(Settings::new().with_in_list_padding(true));
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.id.is_in([1, 2, 3, 4, 5]));

    let rendered = ctx.render(&query).unwrap();
    assert_eq!(
        rendered.sql(),
        r#"select "id" from "users" where "id" in (?, ?, ?, ?, ?, ?, ?, ?)"#
    );
    let values = bind_values!(rendered);
    assert_eq!(values.len(), 8);
    assert!(values[4..].iter().all(|v| *v == Value::Int(5)));
}

#[test]
fn test_oracle_splits_long_in_lists() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.id.is_in(0..1001));

    let rendered = crate::common::render(Dialect::Oracle, &query);
    assert!(
        rendered
            .sql()
            .starts_with(r#"select "id" from "users" where ("id" in (?, "#)
    );
    assert!(rendered.sql().ends_with(r#"?) or "id" in (?))"#));
    assert_eq!(rendered.marker_count(), 1001);
}

#[test]
fn test_operator_spellings() {
    let u = Users::new();

    let concat = select(u.name.concat(u.email.clone())).from(&u.table);
    assert_sql!(
        Dialect::PostgreSQL,
        concat,
        r#"select "name" || "email" from "users""#
    );
    assert_sql!(
        Dialect::MySQL,
        concat,
        "select concat(`name`, `email`) from `users`"
    );
    assert_sql!(Dialect::SqlServer, concat, "select [name] + [email] from [users]");

    let modulo = select(u.age.modulo(2)).from(&u.table);
    assert_sql!(Dialect::PostgreSQL, modulo, r#"select "age" % ? from "users""#);
    assert_sql!(Dialect::Oracle, modulo, r#"select mod("age", ?) from "users""#);

    let len = select(length(&u.name)).from(&u.table);
    assert_sql!(Dialect::PostgreSQL, len, r#"select length("name") from "users""#);
    assert_sql!(Dialect::SqlServer, len, "select len([name]) from [users]");
}

#[test]
fn test_precedence_keeps_needed_parentheses() {
    let u = Users::new();
    let query = select(u.age.sub(u.id.sub(1))).from(&u.table);
    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "age" - ("id" - ?) from "users""#
    );

    let query = select(u.age.sub(1).sub(&u.id)).from(&u.table);
    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "age" - ? - "id" from "users""#
    );
}

#[test]
fn test_capabilities_registry() {
    let ctx = DslContext::new(Dialect::SQLite);
    assert_eq!(ctx.support(Operation::Merge), Support::Emulated);
    assert_eq!(ctx.support(Operation::Returning), Support::Supported);
    assert_eq!(ctx.support(Operation::ProcedureCall), Support::Unsupported);
    assert!(ctx.capabilities().emulated().any(|op| op == Operation::Merge));
}

#[test]
fn test_negation_never_forms_a_comment() {
    let u = Users::new();

    assert_sql!(
        Dialect::PostgreSQL,
        select(u.age.neg()).from(&u.table),
        r#"select -"age" from "users""#
    );
    assert_sql!(
        Dialect::PostgreSQL,
        select(u.age.neg().neg()).from(&u.table),
        r#"select -(-"age") from "users""#
    );
    assert_sql!(
        Dialect::PostgreSQL,
        select(inline(-5).neg()).from(&u.table),
        r#"select -(-5) from "users""#
    );

    let ctx = DslContext::new(Dialect::MySQL)
        .with_settings(Settings::new().with_param_type(ParamType::Inlined));
    let rendered = ctx
        .render(&select(&u.id).from(&u.table).where_(u.age.eq(val(-3).neg())))
        .unwrap();
    assert_eq!(rendered.sql(), "select `id` from `users` where `age` = -(-3)");
}

/// Renders a statement whose only dialect-dependent part is `operation`.
fn render_operation(ctx: &DslContext, operation: Operation) -> Option<quill::Result<RenderedQuery>> {
    let u = Users::new();
    let p = Posts::new();
    let authors = || select(&p.author_id).from(&p.table);

    let result = match operation {
        Operation::Offset => ctx.render(
            &select(&u.id)
                .from(&u.table)
                .order_by(u.id.asc())
                .limit(10)
                .offset(20),
        ),
        Operation::Returning => ctx.render(
            &insert_into(&u.table)
                .columns((&u.name,))
                .values(("ada",))
                .returning(&u.id),
        ),
        Operation::FullOuterJoin => ctx.render(
            &select(&u.id)
                .from(&u.table)
                .full_join(&p.table)
                .on(u.id.eq(&p.author_id)),
        ),
        Operation::WindowFunctions => ctx.render(
            &select(row_number().over(window().order_by([u.id.asc()]))).from(&u.table),
        ),
        Operation::AggregateFilter => {
            ctx.render(&select(count_star().filter_where(u.age.ge(18))).from(&u.table))
        }
        Operation::ILike => {
            ctx.render(&select(&u.id).from(&u.table).where_(u.name.like_ignore_case("a%")))
        }
        Operation::IsDistinctFrom => {
            ctx.render(&select(&u.id).from(&u.table).where_(u.age.is_distinct_from(&u.id)))
        }
        Operation::QuantifiedComparison => ctx.render(
            &select(&u.id)
                .from(&u.table)
                .where_(u.id.eq(any::<i32>(authors()))),
        ),
        Operation::ForUpdate => ctx.render(&select(&u.id).from(&u.table).for_update()),
        Operation::Intersect => ctx.render(&select(&u.id).from(&u.table).intersect(authors())),
        Operation::Except => ctx.render(&select(&u.id).from(&u.table).except(authors())),
        Operation::NullsOrdering => {
            ctx.render(&select(&u.id).from(&u.table).order_by(u.name.asc().nulls_first()))
        }
        Operation::BetweenSymmetric => {
            ctx.render(&select(&u.id).from(&u.table).where_(u.age.between_symmetric(65, 18)))
        }
        Operation::DistinctOn => {
            ctx.render(&select((&u.age, &u.name)).distinct_on(&u.age).from(&u.table))
        }
        Operation::BooleanLiterals => {
            ctx.render(&select(&u.id).from(&u.table).where_(Condition::true_()))
        }
        Operation::ProcedureCall => ctx.render(&call("refresh")),
        Operation::BitwiseOperations => ctx.render(&select(u.age.bit_not()).from(&u.table)),
        Operation::BitwiseXor => ctx.render(&select(u.age.bit_xor(1)).from(&u.table)),
        Operation::UpdateFrom => ctx.render(
            &update(&u.table)
                .set(&u.name, &p.title)
                .from([&p.table])
                .where_(p.author_id.eq(&u.id)),
        ),
        Operation::DeleteUsing => ctx.render(
            &delete_from(&u.table)
                .using([&p.table])
                .where_(p.author_id.eq(&u.id)),
        ),
        _ => return None,
    };
    Some(result)
}

#[test]
fn test_rendering_agrees_with_capabilities() {
    let mut checked = 0;
    for dialect in Dialect::ALL {
        let ctx = DslContext::new(dialect);
        for operation in Operation::ALL {
            let Some(result) = render_operation(&ctx, operation) else {
                continue;
            };
            checked += 1;
            match (ctx.support(operation), result) {
                (Support::Unsupported, Err(QuillError::UnsupportedDialect { operation: op, dialect: d })) => {
                    assert_eq!((op, d), (operation, dialect));
                }
                (Support::Unsupported, other) => {
                    panic!("{operation:?} on {dialect}: expected UnsupportedDialect, got {other:?}")
                }
                (_, Ok(_)) => {}
                (support, Err(e)) => panic!("{operation:?} is {support:?} on {dialect} but failed: {e}"),
            }
        }
    }
    assert!(checked >= 20 * Dialect::ALL.len());
}
