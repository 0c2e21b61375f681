use common::{Posts, Users};
use quill::prelude::*;
use quill::value::Value;

mod common;

#[test]
fn test_select_all_columns() {
    let u = Users::new();
    assert_sql!(Dialect::PostgreSQL, select(()).from(&u.table), r#"select * from "users""#);
}

#[test]
fn test_where_groups_or_inside_and() {
    let u = Users::new();
    let query = select(&u.id).from(&u.table).where_(
        u.name
            .eq("ada")
            .or(u.name.eq("bob"))
            .and(u.age.gt(18)),
    );

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where ("name" = ? or "name" = ?) and "age" > ?"#
    );
    assert_eq!(
        bind_values!(rendered),
        [
            Value::Text("ada".into()),
            Value::Text("bob".into()),
            Value::Int(18)
        ]
    );
}

#[test]
fn test_where_chain_methods() {
    let u = Users::new();
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.age.ge(18))
        .and(u.email.is_not_null())
        .and_not(u.name.like("test%"));

    assert_sql!(
        Dialect::SQLite,
        query,
        r#"select "id" from "users" where "age" >= ? and "email" is not null and not ("name" like ?)"#
    );
}

#[test]
fn test_no_condition_omits_where() {
    let u = Users::new();
    let query = select(&u.id).from(&u.table).where_(Condition::none());
    assert_sql!(Dialect::PostgreSQL, query, r#"select "id" from "users""#);
}

#[test]
fn test_left_join_with_aliases() {
    let u = Users::aliased("u");
    let p = Posts::new();

    let query = select((&u.name, &p.title))
        .from(&u.table)
        .left_join(&p.table)
        .on(u.id.eq(&p.author_id));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "u"."name", "posts"."title" from "users" as "u" left outer join "posts" on "u"."id" = "posts"."author_id""#
    );
    // Oracle rejects AS before a table alias
    assert_sql!(
        Dialect::Oracle,
        query,
        r#"select "u"."name", "posts"."title" from "users" "u" left outer join "posts" on "u"."id" = "posts"."author_id""#
    );
}

#[test]
fn test_join_chain_and_cross_join() {
    let u = Users::aliased("u");
    let p = Posts::new();
    let tags = Table::new("tags");

    let query = select(&u.id)
        .from(&u.table)
        .join(&p.table)
        .on(u.id.eq(&p.author_id))
        .cross_join(&tags);

    assert_sql!(
        Dialect::MySQL,
        query,
        "select `u`.`id` from `users` as `u` join `posts` on `u`.`id` = `posts`.`author_id` cross join `tags`"
    );
}

#[test]
fn test_join_using() {
    let u = Users::new();
    let profiles = Table::new("profiles");
    let query = select(()).from(&u.table).join(&profiles).using(&u.id);
    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select * from "users" join "profiles" using ("id")"#
    );
}

#[test]
fn test_full_outer_join_unsupported_on_mysql() {
    let u = Users::aliased("u");
    let p = Posts::new();
    let query = select(&u.id)
        .from(&u.table)
        .full_join(&p.table)
        .on(u.id.eq(&p.author_id));

    assert_unsupported!(Dialect::MySQL, query, Operation::FullOuterJoin);
    crate::common::render(Dialect::SQLite, &query);
}

#[test]
fn test_group_by_having() {
    let u = Users::new();
    let query = select((&u.age, count_star().as_("n")))
        .from(&u.table)
        .group_by(&u.age)
        .having(count_star().gt(1))
        .order_by(u.age.asc());

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "age", count(*) as "n" from "users" group by "age" having count(*) > ? order by "age" asc"#
    );
}

#[test]
fn test_aggregate_filter_native_and_emulated() {
    let u = Users::new();
    let adults = count_star().filter_where(u.age.ge(18));
    let query = select(adults.as_("adults")).from(&u.table);

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select count(*) filter (where "age" >= ?) as "adults" from "users""#
    );
    assert_sql!(
        Dialect::MySQL,
        query,
        "select count(case when `age` >= ? then 1 end) as `adults` from `users`"
    );
}

#[test]
fn test_window_function_inline_spec() {
    let u = Users::new();
    let rn = row_number()
        .over(window().partition_by([&u.age]).order_by([u.id.desc()]))
        .as_("rn");
    let query = select((&u.id, &rn)).from(&u.table);

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id", row_number() over (partition by "age" order by "id" desc) as "rn" from "users""#
    );
}

#[test]
fn test_named_window_inlined_without_window_clause() {
    let u = Users::new();
    let w = window().order_by([u.id.asc()]).as_("w");
    let ranked = rank().over(&w).as_("r");
    let query = select((&u.id, &ranked)).from(&u.table).window([w]);

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id", rank() over "w" as "r" from "users" window "w" as (order by "id" asc)"#
    );
    assert_sql!(
        Dialect::Oracle,
        query,
        r#"select "id", rank() over (order by "id" asc) as "r" from "users""#
    );
}

#[test]
fn test_union_with_order_by() {
    let u = Users::new();
    let minors = select(&u.id).from(&u.table).where_(u.age.lt(18));
    let seniors = select(&u.id).from(&u.table).where_(u.age.gt(65));

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        minors.union(seniors).order_by(u.id.asc()),
        r#"select "id" from "users" where "age" < ? union select "id" from "users" where "age" > ? order by "id" asc"#
    );
    assert_eq!(bind_values!(rendered), [Value::Int(18), Value::Int(65)]);
}

#[test]
fn test_except_is_minus_on_oracle() {
    let u = Users::new();
    let banned = Table::new("banned");
    let banned_id: Field<i32> = banned.column("user_id");
    let query = select(&u.id)
        .from(&u.table)
        .except(select(&banned_id).from(&banned));

    assert_sql!(
        Dialect::Oracle,
        query,
        r#"select "id" from "users" minus select "user_id" from "banned""#
    );
    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" except select "user_id" from "banned""#
    );
}

#[test]
fn test_correlated_exists() {
    let u = Users::aliased("u");
    let p = Posts::new();
    let query = select(&u.name).from(&u.table).where_(exists(
        select(&p.id)
            .from(&p.table)
            .where_(p.author_id.eq(&u.id)),
    ));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "u"."name" from "users" as "u" where exists (select "posts"."id" from "posts" where "posts"."author_id" = "u"."id")"#
    );
}

#[test]
fn test_derived_table() {
    let u = Users::new();
    let adults = select((&u.id, &u.name))
        .from(&u.table)
        .where_(u.age.ge(18))
        .as_table("adults");
    let id: Field<i32> = adults.column("id");

    assert_sql!(
        Dialect::PostgreSQL,
        select(&id).from(&adults),
        r#"select "adults"."id" from (select "id", "name" from "users" where "age" >= ?) as "adults""#
    );
}

#[test]
fn test_quantified_comparison_emulated_on_sqlite() {
    let u = Users::new();
    let admins = Table::new("admins");
    let admin_id: Field<i32> = admins.column("user_id");
    let query = select(&u.id)
        .from(&u.table)
        .where_(u.id.eq(any::<i32>(select(&admin_id).from(&admins))));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where "id" = any (select "user_id" from "admins")"#
    );
    assert_sql!(
        Dialect::SQLite,
        query,
        r#"select "id" from "users" where "id" in (select "user_id" from "admins")"#
    );
}

#[test]
fn test_scalar_subquery_operand() {
    let u = Users::new();
    let oldest = select(max(&u.age)).from(&u.table).as_scalar();
    let query = select(&u.id).from(&u.table).where_(u.age.ge(oldest));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" where "age" >= (select max("age") from "users")"#
    );
    assert_sql!(
        Dialect::SqlServer,
        query,
        "select [id] from [users] where [age] >= (select max([age]) from [users])"
    );
}

#[test]
fn test_distinct_on() {
    let u = Users::new();
    let query = select((&u.age, &u.name)).distinct_on(&u.age).from(&u.table);

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select distinct on ("age") "age", "name" from "users""#
    );
    assert_unsupported!(Dialect::MySQL, query, Operation::DistinctOn);
}

#[test]
fn test_row_locks() {
    let u = Users::new();
    let query = select(&u.id).from(&u.table).for_update().skip_locked();

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "id" from "users" for update skip locked"#
    );
    assert_unsupported!(Dialect::SQLite, query, Operation::ForUpdate);
    assert_unsupported!(Dialect::Db2, query, Operation::SkipLocked);

    assert_sql!(
        Dialect::MySQL,
        select(&u.id).from(&u.table).for_share().nowait(),
        "select `id` from `users` for share nowait"
    );
}

#[test]
fn test_select_without_from_uses_dummy_table() {
    let query = select(val(1));
    assert_sql!(Dialect::PostgreSQL, query, "select ?");
    assert_sql!(Dialect::Oracle, query, "select ? from dual");
    assert_sql!(Dialect::Firebird, query, "select ? from rdb$database");
}

#[test]
fn test_recursive_cte() {
    let t = cte("t").columns(["n"]);
    let n: Field<i32> = t.table().column("n");
    let seed = select(val(1));
    let step = select(n.add(1)).from(t.table()).where_(n.lt(10));
    let query = with_recursive([t.as_(seed.union_all(step))])
        .select(&n)
        .from(t.table());

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"with recursive "t"("n") as (select ? union all select "n" + ? from "t" where "n" < ?) select "n" from "t""#
    );
    assert_sql!(
        Dialect::Oracle,
        query,
        r#"with "t"("n") as (select ? from dual union all select "n" + ? from "t" where "n" < ?) select "n" from "t""#
    );
}

#[test]
fn test_keyword_case_and_unquoted_names() {
    let u = Users::new();
    let ctx = DslContext::new(Dialect::PostgreSQL).with_settings(
        Settings::new()
            .with_render_keyword_case(RenderKeywordCase::Upper)
            .with_render_quoted_names(RenderQuotedNames::Never),
    );
    let rendered = ctx
        .render(&select(&u.id).from(&u.table).where_(u.age.gt(30)))
        .unwrap();
    assert_eq!(rendered.sql(), "SELECT id FROM users WHERE age > ?");
}

#[test]
fn test_render_is_deterministic() {
    let u = Users::new();
    let query = select((&u.id, &u.name))
        .from(&u.table)
        .where_(u.name.starts_with("a"))
        .order_by((u.name.asc(), u.id.desc()))
        .limit(5);
    let ctx = DslContext::new(Dialect::SQLite);

    let first = ctx.render(&query).unwrap();
    let second = ctx.render(&query).unwrap();
    assert_eq!(first.sql(), second.sql());
    assert_eq!(bind_values!(first), bind_values!(second));
}
