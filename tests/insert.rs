use common::Users;
use quill::prelude::*;
use quill::value::Value;

mod common;

#[test]
fn test_insert_values() {
    let u = Users::new();
    let query = insert_into(&u.table)
        .columns((&u.name, &u.age))
        .values(("ada", 36));

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "users" ("name", "age") values (?, ?)"#
    );
    assert_eq!(
        bind_values!(rendered),
        [Value::Text("ada".into()), Value::Int(36)]
    );
}

#[test]
fn test_insert_multiple_rows() {
    let u = Users::new();
    let query = insert_into(&u.table)
        .columns((&u.name, &u.age))
        .values(("ada", 36))
        .values(("bob", 41));

    assert_sql!(
        Dialect::MySQL,
        query,
        "insert into `users` (`name`, `age`) values (?, ?), (?, ?)"
    );
    let rendered = assert_sql!(
        Dialect::Oracle,
        query,
        r#"insert into "users" ("name", "age") select ?, ? from dual union all select ?, ? from dual"#
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
fn test_values_all() {
    let u = Users::new();
    let rows = vec![("ada", 36), ("bob", 41), ("cy", 29)];
    let query = insert_into(&u.table)
        .columns((&u.name, &u.age))
        .values_all(rows);

    let rendered = assert_sql!(
        Dialect::SQLite,
        query,
        r#"insert into "users" ("name", "age") values (?, ?), (?, ?), (?, ?)"#
    );
    assert_eq!(rendered.marker_count(), 6);
}

#[test]
fn test_null_and_default_in_values() {
    let u = Users::new();
    let query = insert_into(&u.table)
        .columns((&u.email, &u.name))
        .values((None::<String>, default_value::<String>()));

    let rendered = assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "users" ("email", "name") values (?, default)"#
    );
    assert_eq!(bind_values!(rendered), [Value::Null]);
}

#[test]
fn test_default_values() {
    let u = Users::new();
    let query = insert_into(&u.table).default_values();

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "users" default values"#
    );
    assert_sql!(Dialect::MySQL, query, "insert into `users` values ()");
}

#[test]
fn test_insert_select() {
    let u = Users::new();
    let archive = Table::new("archive");
    let archive_id: Field<i32> = archive.column("id");
    let archive_name: Field<String> = archive.column("name");

    let query = insert_into(&archive)
        .columns((&archive_id, &archive_name))
        .select(select((&u.id, &u.name)).from(&u.table).where_(u.age.gt(90)));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "archive" ("id", "name") select "id", "name" from "users" where "age" > ?"#
    );
}

#[test]
fn test_sqlite_insert_select_with_conflict_clause() {
    let u = Users::new();
    let archive = Table::new("archive");
    let archive_id: Field<i32> = archive.column("id");
    let archive_name: Field<String> = archive.column("name");

    let query = insert_into(&archive)
        .columns((&archive_id, &archive_name))
        .select(select((&u.id, &u.name)).from(&u.table))
        .on_conflict(&archive_id)
        .do_nothing();

    assert_sql!(
        Dialect::SQLite,
        query,
        r#"insert into "archive" ("id", "name") select "id", "name" from "users" where true on conflict ("id") do nothing"#
    );
}

#[test]
fn test_returning() {
    let u = Users::new();
    let query = insert_into(&u.table)
        .columns(&u.name)
        .values(("ada",))
        .returning(&u.id);

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "users" ("name") values (?) returning "id""#
    );
    assert_sql!(
        Dialect::SqlServer,
        query,
        "insert into [users] ([name]) output inserted.[id] values (?)"
    );
    assert_unsupported!(Dialect::MySQL, query, Operation::Returning);
}

#[test]
fn test_on_conflict_do_nothing() {
    let u = Users::new();
    let targeted = insert_into(&u.table)
        .columns((&u.email, &u.name))
        .values(("ada@example.com", "ada"))
        .on_conflict(&u.email)
        .do_nothing();

    assert_sql!(
        Dialect::PostgreSQL,
        targeted,
        r#"insert into "users" ("email", "name") values (?, ?) on conflict ("email") do nothing"#
    );
    assert_sql!(
        Dialect::MySQL,
        targeted,
        "insert ignore into `users` (`email`, `name`) values (?, ?)"
    );

    let untargeted = insert_into(&u.table)
        .columns((&u.email, &u.name))
        .values(("ada@example.com", "ada"))
        .on_conflict_do_nothing();
    assert_sql!(
        Dialect::SQLite,
        untargeted,
        r#"insert into "users" ("email", "name") values (?, ?) on conflict do nothing"#
    );
}

#[test]
fn test_on_conflict_do_update() {
    let u = Users::new();
    let query = insert_into(&u.table)
        .columns((&u.email, &u.name))
        .values(("ada@example.com", "ada"))
        .on_conflict(&u.email)
        .do_update()
        .set(&u.name, excluded(&u.name));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "users" ("email", "name") values (?, ?) on conflict ("email") do update set "name" = excluded."name""#
    );
    assert_sql!(
        Dialect::MySQL,
        query,
        "insert into `users` (`email`, `name`) values (?, ?) on duplicate key update `name` = values(`name`)"
    );
}

#[test]
fn test_on_conflict_do_update_where() {
    let u = Users::new();
    let query = insert_into(&u.table)
        .columns((&u.email, &u.age))
        .values(("ada@example.com", 37))
        .on_conflict(&u.email)
        .do_update()
        .set(&u.age, excluded(&u.age))
        .where_(u.age.lt(excluded(&u.age)));

    assert_sql!(
        Dialect::PostgreSQL,
        query,
        r#"insert into "users" ("email", "age") values (?, ?) on conflict ("email") do update set "age" = excluded."age" where "age" < excluded."age""#
    );
    assert_unsupported!(Dialect::MySQL, query, Operation::OnConflict);
}

#[test]
fn test_on_duplicate_key_update() {
    let u = Users::new();
    let query = insert_into(&u.table)
        .columns((&u.id, &u.age))
        .values((1, 30))
        .on_duplicate_key_update()
        .set(&u.age, u.age.add(1));

    assert_sql!(
        Dialect::MariaDB,
        query,
        "insert into `users` (`id`, `age`) values (?, ?) on duplicate key update `age` = `age` + ?"
    );
}

#[test]
fn test_upsert_emulated_with_merge() {
    let u = Users::new();
    let query = insert_into(&u.table)
        .columns((&u.email, &u.name))
        .values(("ada@example.com", "ada"))
        .on_conflict(&u.email)
        .do_update()
        .set(&u.name, excluded(&u.name));

    assert_sql!(
        Dialect::SqlServer,
        query,
        "merge into [users] using (select ? as [email], ? as [name]) as [excluded] on ([users].[email] = [excluded].[email]) when matched then update set [name] = excluded.[name] when not matched then insert ([email], [name]) values ([excluded].[email], [excluded].[name]);"
    );
    let rendered = assert_sql!(
        Dialect::Oracle,
        query,
        r#"merge into "users" using (select ? as "email", ? as "name" from dual) "excluded" on ("users"."email" = "excluded"."email") when matched then update set "name" = excluded."name" when not matched then insert ("email", "name") values ("excluded"."email", "excluded"."name")"#
    );
    assert_eq!(
        bind_values!(rendered),
        [
            Value::Text("ada@example.com".into()),
            Value::Text("ada".into())
        ]
    );
}

#[test]
fn test_upsert_emulation_limits() {
    let u = Users::new();

    let many_rows = insert_into(&u.table)
        .columns((&u.email, &u.name))
        .values(("ada@example.com", "ada"))
        .values(("bob@example.com", "bob"))
        .on_conflict(&u.email)
        .do_nothing();
    assert_unsupported!(Dialect::Oracle, many_rows, Operation::OnConflict);

    let returning = insert_into(&u.table)
        .columns((&u.email, &u.name))
        .values(("ada@example.com", "ada"))
        .on_conflict(&u.email)
        .do_nothing()
        .returning(&u.id);
    assert_unsupported!(Dialect::SqlServer, returning, Operation::OnConflict);

    let untargeted = insert_into(&u.table)
        .columns((&u.email, &u.name))
        .values(("ada@example.com", "ada"))
        .on_conflict_do_nothing();
    let err = crate::common::render_err(Dialect::Oracle, &untargeted);
    assert!(matches!(err, QuillError::Render { .. }), "{err:?}");

    assert_unsupported!(Dialect::ClickHouse, untargeted, Operation::OnConflict);
}
