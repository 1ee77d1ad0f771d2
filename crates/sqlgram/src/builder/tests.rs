use super::*;
use crate::condition::Predicate;
use crate::operator::Operator;

fn mysql() -> Builder {
    Builder::for_dialect(Dialect::MySql)
}

// ==================== Operators ====================

#[test]
fn test_unknown_operator_is_rejected_without_side_effects() {
    let mut qb = mysql();
    qb.from("users");

    let err = qb.where_("id", "===", 1).unwrap_err();
    assert!(err.is_unknown_operator());
    assert!(qb.model().wheres.is_empty());

    assert!(qb.having("n", "nope", 1).is_err());
    assert!(qb.join("posts", "id", "=>", "posts.user_id").is_err());
    assert!(qb.model().joins.is_empty());
}

#[test]
fn test_value_shape_is_checked_at_the_call() {
    let mut qb = mysql();
    qb.from("t");

    assert!(
        qb.where_("x", "between", vec![1, 2, 3])
            .unwrap_err()
            .is_unsupported_value()
    );
    assert!(qb.where_("x", "between", 5).unwrap_err().is_unsupported_value());
    assert!(qb.where_("x", "in", 5).unwrap_err().is_unsupported_value());
    assert!(qb.or_where("x", "not in", "a").is_err());
    assert!(qb.having("n", "not between", 1).is_err());
    assert!(
        qb.where_many(&["a", "b"], &["=", "in"], vec![1.into(), 2.into()])
            .is_err()
    );
    assert!(qb.model().wheres.is_empty());
    assert!(qb.model().havings.is_empty());

    qb.where_("x", "between", vec![1, 9])
        .unwrap()
        .where_("y", "in", vec!["a", "b"])
        .unwrap();
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT * FROM `t` WHERE `x` BETWEEN 1 AND 9 AND `y` IN ('a', 'b')"
    );
}

#[test]
fn test_operators_are_normalized() {
    let mut qb = mysql();
    qb.where_("name", "  NOT   LIKE ", "a%").unwrap();

    match &qb.model().wheres[0].predicate {
        Predicate::Compare { operator, .. } => assert_eq!(*operator, Operator::NotLike),
        other => panic!("unexpected predicate: {other:?}"),
    }
}

// ==================== Read-only ====================

#[test]
fn test_read_only_refuses_mutations() {
    let mut qb = Builder::read_only(Arc::new(Grammar::default()));

    assert!(qb.insert("users").unwrap_err().is_read_only_violation());
    assert!(qb.update("users").unwrap_err().is_read_only_violation());
    assert!(qb.delete().unwrap_err().is_read_only_violation());
    assert!(qb.delete_from("users").unwrap_err().is_read_only_violation());

    assert_eq!(qb.statement_type(), StatementType::Select);
    assert!(qb.model().from.is_empty());

    qb.from("users").where_("id", "=", 1).unwrap();
    assert_eq!(qb.to_sql().unwrap(), r#"SELECT * FROM "users" WHERE "id" = 1"#);
}

#[test]
fn test_read_only_message() {
    let mut qb = mysql();
    qb.set_read_only(true);
    let err = qb.update("users").unwrap_err();
    assert_eq!(err.to_string(), "Read-only builder cannot update");

    qb.set_read_only(false);
    assert!(qb.update("users").is_ok());
}

#[test]
fn test_new_query_inherits_settings() {
    let mut qb = Builder::read_only(Arc::new(Grammar::new(Dialect::Postgres)));
    qb.table_prefix("app_").use_placeholders(true).from("users");

    let sub = qb.new_query();
    assert!(sub.is_read_only());
    assert!(sub.uses_placeholders());
    assert_eq!(sub.model().table_prefix, "app_");
    assert!(sub.model().from.is_empty());
    assert!(Arc::ptr_eq(sub.grammar(), qb.grammar()));
}

// ==================== Batched conditions ====================

#[test]
fn test_where_many_checks_lengths() {
    let mut qb = mysql();
    let err = qb
        .where_many(&["a", "b"], &["=", "="], vec![1.into()])
        .unwrap_err();
    assert!(matches!(
        err,
        SqlError::BatchLengthMismatch {
            columns: 2,
            operators: 2,
            values: 1
        }
    ));
    assert!(qb.model().wheres.is_empty());
}

#[test]
fn test_where_many_is_all_or_nothing() {
    let mut qb = mysql();
    assert!(
        qb.where_many(&["a", "b"], &["=", "??"], vec![1.into(), 2.into()])
            .is_err()
    );
    assert!(qb.model().wheres.is_empty());

    qb.from("t")
        .where_many(&["a", "b"], &["=", ">"], vec![1.into(), 2.into()])
        .unwrap();
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT * FROM `t` WHERE `a` = 1 AND `b` > 2"
    );
}

// ==================== Joins ====================

#[test]
fn test_on_requires_a_join() {
    let mut qb = mysql();
    qb.from("users");
    assert!(matches!(
        qb.on("id", "=", "posts.user_id").unwrap_err(),
        SqlError::MissingJoin
    ));
    assert!(matches!(
        qb.on_many(&["id"], &["="], &["posts.user_id"]).unwrap_err(),
        SqlError::MissingJoin
    ));
}

#[test]
fn test_on_extends_latest_join() {
    let mut qb = mysql();
    qb.from("users")
        .join("posts", "id", "=", "posts.user_id")
        .unwrap()
        .or_on("posts.editor_id", "=", "users.id")
        .unwrap()
        .left_join("teams", "users.team_id", "=", "teams.id")
        .unwrap()
        .on_many(
            &["teams.region", "teams.tier"],
            &["=", ">="],
            &["users.region", "users.tier"],
        )
        .unwrap();

    let joins = &qb.model().joins;
    assert_eq!(joins.len(), 2);
    assert_eq!(joins[0].ons.len(), 2);
    assert_eq!(joins[1].ons.len(), 3);
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT * FROM `users` \
         INNER JOIN `posts` ON `users`.`id` = `posts`.`user_id` OR `posts`.`editor_id` = `users`.`id` \
         LEFT JOIN `teams` ON `users`.`team_id` = `teams`.`id` AND `teams`.`region` = `users`.`region` AND `teams`.`tier` >= `users`.`tier`"
    );
}

// ==================== Model state ====================

#[test]
fn test_order_buckets_keep_first_use_order() {
    let mut qb = mysql();
    qb.order_by_desc("created_at")
        .order_by("name")
        .order_by_desc("id");

    let orders = &qb.model().orders;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].direction, Direction::Desc);
    assert_eq!(orders[0].columns, vec!["created_at", "id"]);
    assert_eq!(orders[1].direction, Direction::Asc);
    assert_eq!(orders[1].columns, vec!["name"]);
}

#[test]
fn test_paginate_clamps() {
    let mut qb = mysql();
    qb.paginate(3, 25);
    assert_eq!((qb.model().limit, qb.model().offset), (Some(25), Some(50)));

    qb.paginate(0, 0);
    assert_eq!((qb.model().limit, qb.model().offset), (Some(1), Some(0)));
}

#[test]
fn test_select_replaces_and_add_select_appends() {
    let mut qb = mysql();
    qb.select(["a", "b"]).select(["c"]).add_select("d").from("t");
    assert_eq!(qb.to_sql().unwrap(), "SELECT `c`, `d` FROM `t`");
}

#[test]
fn test_aggregate_uppercases_function() {
    let mut qb = mysql();
    qb.aggregate("max", ["price"]).from("products");
    let aggregate = qb.model().aggregate.as_ref().unwrap();
    assert_eq!(aggregate.function, "MAX");
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT MAX(`price`) AS `aggregate` FROM `products`"
    );
}

#[test]
fn test_statement_type_switches() {
    let mut qb = mysql();
    assert_eq!(qb.statement_type(), StatementType::Select);
    qb.random(3);
    assert_eq!(qb.statement_type(), StatementType::Random);
    assert_eq!(qb.model().limit, Some(3));
    qb.insert("t").unwrap();
    assert_eq!(qb.statement_type(), StatementType::Insert);
    qb.delete().unwrap();
    assert_eq!(qb.statement_type(), StatementType::Delete);
    assert!(qb.model().delete);
}

#[test]
fn test_statement_type_from_str() {
    assert_eq!("SELECT".parse::<StatementType>().unwrap(), StatementType::Select);
    assert_eq!(" random ".parse::<StatementType>().unwrap(), StatementType::Random);
    assert!(matches!(
        "merge".parse::<StatementType>().unwrap_err(),
        SqlError::UnsupportedQueryType(_)
    ));
}

#[test]
fn test_table_source_reference_names() {
    assert_eq!(
        TableSource::Table("users as u".into()).reference_name(),
        Some("u".to_string())
    );
    assert_eq!(
        TableSource::Table("public.users".into()).reference_name(),
        Some("users".to_string())
    );
}

#[test]
fn test_any_grammar_compiles_any_builder() {
    let mut qb = mysql();
    qb.from("t").limit(1);
    let sqlite = Grammar::new(Dialect::Sqlite);
    assert_eq!(sqlite.compile(&qb).unwrap(), r#"SELECT * FROM "t" LIMIT 1"#);
    assert_eq!(qb.to_sql().unwrap(), "SELECT * FROM `t` LIMIT 1");
}
