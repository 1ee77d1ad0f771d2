//! One query model, every dialect.

use chrono::NaiveDate;
use sqlgram::{Builder, Dialect, Grammar, SqlError, Value};

fn report_query() -> Builder {
    let mut qb = Builder::default();
    qb.table_prefix("app_")
        .select(["users.id", "users.name", "email"])
        .from("users")
        .left_join("orders", "id", "=", "orders.user_id")
        .unwrap()
        .where_("users.created_at", ">=", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .unwrap()
        .where_("note", "like", "it's%")
        .unwrap()
        .where_null("users.deleted_at")
        .order_by_desc("users.id")
        .paginate(2, 10);
    qb
}

#[test]
fn mysql() {
    assert_eq!(
        Grammar::new(Dialect::MySql).compile(&report_query()).unwrap(),
        "SELECT `app_users`.`id`, `app_users`.`name`, `email` FROM `app_users` \
         LEFT JOIN `app_orders` ON `app_users`.`id` = `app_orders`.`user_id` \
         WHERE `app_users`.`created_at` >= '2024-01-01' AND `note` LIKE 'it\\'s%' \
         AND `app_users`.`deleted_at` IS NULL \
         ORDER BY `app_users`.`id` DESC LIMIT 10 OFFSET 10"
    );
}

#[test]
fn postgres() {
    assert_eq!(
        Grammar::new(Dialect::Postgres).compile(&report_query()).unwrap(),
        r#"SELECT "app_users"."id", "app_users"."name", "email" FROM "app_users" LEFT JOIN "app_orders" ON "app_users"."id" = "app_orders"."user_id" WHERE "app_users"."created_at" >= '2024-01-01' AND "note" LIKE 'it''s%' AND "app_users"."deleted_at" IS NULL ORDER BY "app_users"."id" DESC LIMIT 10 OFFSET 10"#
    );
}

#[test]
fn sqlserver() {
    assert_eq!(
        Grammar::new(Dialect::SqlServer).compile(&report_query()).unwrap(),
        "SELECT [app_users].[id], [app_users].[name], [email] FROM [app_users] \
         LEFT JOIN [app_orders] ON [app_users].[id] = [app_orders].[user_id] \
         WHERE [app_users].[created_at] >= '2024-01-01' AND [note] LIKE 'it''s%' \
         AND [app_users].[deleted_at] IS NULL \
         ORDER BY [app_users].[id] DESC OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn oracle() {
    assert_eq!(
        Grammar::new(Dialect::Oracle).compile(&report_query()).unwrap(),
        r#"SELECT "app_users"."id", "app_users"."name", "email" FROM "app_users" LEFT JOIN "app_orders" ON "app_users"."id" = "app_orders"."user_id" WHERE "app_users"."created_at" >= '2024-01-01' AND "note" LIKE 'it''s%' AND "app_users"."deleted_at" IS NULL ORDER BY "app_users"."id" DESC OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"#
    );
}

#[test]
fn dialects_resolve_by_name() {
    for (name, dialect) in [
        ("mysql", Dialect::MySql),
        ("pgsql", Dialect::Postgres),
        ("sqlite", Dialect::Sqlite),
        ("sqlsrv", Dialect::SqlServer),
        ("oracle", Dialect::Oracle),
    ] {
        assert_eq!(Grammar::from_name(name).unwrap().dialect(), dialect);
    }
    assert!(matches!(
        Grammar::from_name("db2").unwrap_err(),
        SqlError::UnknownDialect(_)
    ));
}

#[test]
fn non_finite_floats_fail_the_whole_compilation() {
    let mut qb = Builder::for_dialect(Dialect::MySql);
    qb.from("t").where_("score", ">", f64::NAN).unwrap();
    assert!(qb.to_sql().unwrap_err().is_unsupported_value());
}

#[test]
fn json_values() {
    let mut qb = Builder::for_dialect(Dialect::Postgres);
    qb.update("events")
        .unwrap()
        .set("payload", Value::json(&serde_json::json!({"tags": ["a", "b"]})).unwrap())
        .where_("id", "=", 9)
        .unwrap();
    assert_eq!(
        qb.to_sql().unwrap(),
        r#"UPDATE "events" SET "payload" = '{"tags":["a","b"]}' WHERE "id" = 9"#
    );
}
