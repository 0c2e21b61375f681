use common::{Posts, Users};
use quill::model::{DeleteQuery, InsertQuery, SelectQuery, UpdateQuery};
use quill::prelude::*;

mod common;

#[test]
fn test_select_query_from_runtime_filters() {
    let u = Users::aliased("u");
    let p = Posts::new();
    let filters: [Option<&str>; 3] = [Some("a%"), None, Some("%z")];

    let mut query = SelectQuery::new();
    query.add_select(&u.name);
    query.add_select(count(&p.id).as_("posts"));
    query.add_from(&u.table);
    query.add_join(&p.table, JoinKind::Left, u.id.eq(&p.author_id));
    for pattern in filters.into_iter().flatten() {
        query.add_conditions(u.name.like(pattern));
    }
    query.add_group_by(&u.name);
    query.add_having(count(&p.id).gt(2));
    query.add_order_by(u.name.asc());
    query.set_limit(10);
    query.set_offset(30);

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "u"."name", count("posts"."id") as "posts" from "users" as "u" left outer join "posts" on "u"."id" = "posts"."author_id" where "u"."name" like ? and "u"."name" like ? group by "u"."name" having count("posts"."id") > ? order by "u"."name" asc limit ? offset ?"#
    );
    assert_eq!(rendered.marker_count(), 5);
}

#[test]
fn test_select_query_distinct_and_union() {
    let u = Users::new();
    let archived = Table::new("archived_users");
    let archived_name: Field<String> = archived.column("name");

    let mut query = SelectQuery::new();
    query.set_distinct(true);
    query.add_select(&u.name);
    query.add_from(&u.table);
    query.union(select(&archived_name).from(&archived));

    assert_sql!(
        Dialect::SQLite,
        query,
        r#"select distinct "name" from "users" union select "name" from "archived_users""#
    );
}

#[test]
fn test_select_query_as_subquery() {
    let u = Users::aliased("u");
    let p = Posts::new();

    let mut authored = SelectQuery::new();
    authored.add_select(&p.id);
    authored.add_from(&p.table);
    authored.add_conditions(p.author_id.eq(&u.id));

    let query = select(&u.name).from(&u.table).where_(exists(authored));
    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"select "u"."name" from "users" as "u" where exists (select "posts"."id" from "posts" where "posts"."author_id" = "u"."id")"#
    );
}

#[test]
fn test_insert_query_records() {
    let u = Users::new();
    let mut query = InsertQuery::new(&u.table);
    for (name, age) in [("ada", 36), ("bob", 41)] {
        query.add_value(&u.name, name);
        query.add_value(&u.age, age);
        query.new_record();
    }
    query.add_returning(&u.id);

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "users" ("name", "age") values (?, ?), (?, ?) returning "id""#
    );
    assert_eq!(
        bind_values!(rendered),
        [
            Value::Text("ada".into()),
            Value::Int(36),
            Value::Text("bob".into()),
            Value::Int(41)
        ]
    );
}

#[test]
fn test_insert_query_without_records() {
    let u = Users::new();
    let query = InsertQuery::new(&u.table);
    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "users" default values"#
    );
}

#[test]
fn test_update_query() {
    let u = Users::new();
    let mut query = UpdateQuery::new(&u.table);
    query.add_value(&u.name, "ada");
    query.add_value(&u.age, u.age.add(1));
    query.add_conditions(u.id.eq(3));
    query.add_conditions(u.email.is_not_null());

    assert_sql!(
        Dialect::MySQL,
        query,
        "update `users` set `name` = ?, `age` = `age` + ? where `id` = ? and `email` is not null"
    );
}

#[test]
fn test_delete_query() {
    let users = Table::new("users");
    let user_id: Field<i32> = users.qualified("id");
    let p = Posts::new();

    let mut query = DeleteQuery::new(&users);
    query.add_using(&p.table);
    query.add_conditions(p.author_id.eq(&user_id));
    query.add_returning(&user_id);

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"delete from "users" using "posts" where "posts"."author_id" = "users"."id" returning "users"."id""#
    );
}

#[test]
fn test_models_move_between_threads() {
    fn assert_send<T: Send>() {}
    assert_send::<SelectQuery>();
    assert_send::<InsertQuery>();
    assert_send::<UpdateQuery>();
    assert_send::<DeleteQuery>();
}
