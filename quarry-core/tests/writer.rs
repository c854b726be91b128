#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        CompiledClause, Condition, Conditions, GenericSqlWriter, Operator, Order, Ordered, Query,
        QueryKind, SqlWriter, Value,
    };
    use rust_decimal::Decimal;
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    fn sql(value: &str) -> CompiledClause {
        CompiledClause::Sql(value.into())
    }

    fn command(query: &Query) -> Option<String> {
        let compiled = WRITER.compile(query);
        let mut out = String::new();
        WRITER
            .write_command(&mut out, query, &compiled)
            .ok()
            .map(|_| out)
    }

    #[test]
    fn conditions_neutral() {
        assert_eq!(
            WRITER.conditions(&Conditions::new(), QueryKind::Read),
            CompiledClause::Neutral
        );
        assert_eq!(
            WRITER.conditions(&Conditions::new(), QueryKind::Delete),
            CompiledClause::Neutral
        );
    }

    #[test]
    fn conditions_pass_through() {
        let pairs = Conditions::new().with("id", 5);
        assert_eq!(
            WRITER.conditions(&pairs, QueryKind::Update),
            CompiledClause::Pairs(pairs.clone())
        );
        let falsy = Conditions::new()
            .with("id", 0)
            .with("name", "")
            .with("active", false);
        let CompiledClause::Pairs(compiled) = WRITER.conditions(&falsy, QueryKind::Create) else {
            panic!("Create conditions must be passed through");
        };
        assert_eq!(compiled.len(), 3);
        assert_eq!(compiled.get("id"), Some(&Condition::Equal(Value::Int64(Some(0)))));
        assert_eq!(
            compiled.get("name"),
            Some(&Condition::Equal(Value::Varchar(Some("".into()))))
        );
        assert_eq!(
            compiled.get("active"),
            Some(&Condition::Equal(Value::Boolean(Some(false))))
        );
    }

    #[test]
    fn conditions_filter() {
        let conditions = Conditions::new().with("id", 5i64).with("name", "O'Neil");
        assert_eq!(
            WRITER.conditions(&conditions, QueryKind::Read),
            sql(r#""id" = 5 AND "name" = 'O''Neil'"#)
        );
        let conditions = Conditions::new()
            .with("deleted_at", Value::Timestamp(None))
            .with("id", Value::List(Some(vec![1i64.into(), 2i64.into(), 3i64.into()])));
        assert_eq!(
            WRITER.conditions(&conditions, QueryKind::Read),
            sql(r#""deleted_at" IS NULL AND "id" IN (1, 2, 3)"#)
        );
        let conditions = Conditions::new()
            .with_condition("score", Condition::Compare(Operator::GreaterEqual, 1.5.into()))
            .with_condition("nick", Condition::Compare(Operator::NotEqual, Value::Null))
            .with_condition("name", Condition::Compare(Operator::Like, "Foo%".into()));
        assert_eq!(
            WRITER.conditions(&conditions, QueryKind::Read),
            sql(r#""score" >= 1.5 AND "nick" IS NOT NULL AND "name" LIKE 'Foo%'"#)
        );
        let conditions = Conditions::new().with("company.id", 1i64);
        assert_eq!(
            WRITER.conditions(&conditions, QueryKind::Delete),
            sql(r#""company"."id" = 1"#)
        );
    }

    #[test]
    fn conditions_degrade() {
        let empty_list = Conditions::new().with_condition("id", Condition::In(vec![]));
        assert_eq!(
            WRITER.conditions(&empty_list, QueryKind::Read),
            CompiledClause::Neutral
        );
        let null_compare = Conditions::new()
            .with_condition("id", Condition::Compare(Operator::Greater, Value::Null));
        assert_eq!(
            WRITER.conditions(&null_compare, QueryKind::Read),
            CompiledClause::Neutral
        );
        let nan = Conditions::new().with("score", f64::NAN);
        assert_eq!(
            WRITER.conditions(&nan, QueryKind::Read),
            CompiledClause::Neutral
        );
        let empty_name = Conditions::new().with("", 1);
        assert_eq!(
            WRITER.conditions(&empty_name, QueryKind::Read),
            CompiledClause::Neutral
        );
    }

    #[test]
    fn fields() {
        let query = Query::read("companies");
        assert_eq!(WRITER.fields(&[], &query), sql("*"));
        let query = query.defaults(["id", "name"]);
        assert_eq!(WRITER.fields(&[], &query), sql(r#""id", "name""#));
        assert_eq!(
            WRITER.fields(&["companies.id".into(), "*".into()], &query),
            sql(r#""companies"."id", *"#)
        );
        assert_eq!(
            WRITER.fields(&["".into()], &query),
            CompiledClause::Neutral
        );
    }

    #[test]
    fn order() {
        let query = Query::read("companies");
        assert_eq!(WRITER.order(&Order::None, &query), CompiledClause::Neutral);
        assert_eq!(WRITER.order(&"name".into(), &query), sql(r#""name""#));
        assert_eq!(
            WRITER.order(
                &vec![Ordered::asc("id"), Ordered::desc("name")].into(),
                &query
            ),
            sql(r#""id" ASC, "name" DESC"#)
        );
        assert_eq!(
            WRITER.order(&Order::List(vec![]), &query),
            CompiledClause::Neutral
        );
        assert_eq!(
            WRITER.order(&vec![Ordered::asc("id"), Ordered::asc("")].into(), &query),
            CompiledClause::Neutral
        );
    }

    #[test]
    fn limit() {
        let query = Query::read("companies");
        assert_eq!(WRITER.limit(None, &query), CompiledClause::Neutral);
        assert_eq!(WRITER.limit(Some(0), &query), CompiledClause::Neutral);
        assert_eq!(WRITER.limit(Some(10), &query), sql("LIMIT 10"));
        let query = query.offset(20);
        assert_eq!(WRITER.limit(Some(10), &query), sql("LIMIT 10 OFFSET 20"));
    }

    #[test]
    fn select() {
        assert_eq!(
            command(&Query::read("companies")).as_deref(),
            Some("SELECT *\nFROM \"companies\";")
        );
        let query = Query::read("companies")
            .fields(["id", "name"])
            .condition("active", true)
            .order(vec![Ordered::desc("id")])
            .limit(5);
        assert_eq!(
            command(&query).as_deref(),
            Some(
                indoc! {r#"
                    SELECT "id", "name"
                    FROM "companies"
                    WHERE "active" = true
                    ORDER BY "id" DESC
                    LIMIT 5;
                "#}
                .trim()
            )
        );
        // The unrenderable order is dropped, the rest of the command survives.
        let query = Query::read("companies")
            .condition("id", 1i64)
            .order(Order::List(vec![Ordered::asc("")]));
        assert_eq!(
            command(&query).as_deref(),
            Some(
                indoc! {r#"
                    SELECT *
                    FROM "companies"
                    WHERE "id" = 1;
                "#}
                .trim()
            )
        );
    }

    #[test]
    fn insert() {
        let query = Query::create("companies")
            .condition("id", 1)
            .condition("name", "Foo Company");
        assert_eq!(
            command(&query).as_deref(),
            Some(
                indoc! {r#"
                    INSERT INTO "companies" ("id", "name") VALUES
                    (1, 'Foo Company');
                "#}
                .trim()
            )
        );
        assert_eq!(
            command(&Query::create("companies")).as_deref(),
            Some(r#"INSERT INTO "companies" DEFAULT VALUES;"#)
        );
        let query = Query::create("companies").condition("score", f64::INFINITY);
        assert_eq!(command(&query), None);
    }

    #[test]
    fn update() {
        let query = Query::update("companies")
            .condition("name", "Baz Company")
            .condition("employees", 0)
            .filter("id", 2);
        assert_eq!(
            command(&query).as_deref(),
            Some(
                indoc! {r#"
                    UPDATE "companies" SET "name" = 'Baz Company', "employees" = 0
                    WHERE "id" = 2;
                "#}
                .trim()
            )
        );
        assert_eq!(command(&Query::update("companies").filter("id", 2)), None);
    }

    #[test]
    fn delete() {
        assert_eq!(
            command(&Query::delete("companies")).as_deref(),
            Some(r#"DELETE FROM "companies";"#)
        );
        let query = Query::delete("companies").one_of("id", [1, 2]);
        assert_eq!(
            command(&query).as_deref(),
            Some(
                indoc! {r#"
                    DELETE FROM "companies"
                    WHERE "id" IN (1, 2);
                "#}
                .trim()
            )
        );
    }

    #[test]
    fn degraded_filter_targets_every_row() {
        let delete = Query::delete("companies").condition("score", f64::NAN);
        assert_eq!(
            command(&delete).as_deref(),
            Some(r#"DELETE FROM "companies";"#)
        );
        let update = Query::update("companies")
            .condition("employees", 0)
            .filter("score", f64::INFINITY);
        assert_eq!(
            command(&update).as_deref(),
            Some(r#"UPDATE "companies" SET "employees" = 0;"#)
        );
    }

    #[test]
    fn missing_source() {
        assert_eq!(command(&Query::read("")), None);
        assert_eq!(command(&Query::delete("main.")), None);
    }

    #[test]
    fn quoting() {
        assert_eq!(WRITER.quote_identifier(r#"a"b"#), r#""a""b""#);
        let quote = |v: Value| WRITER.quote_value(&v).ok();
        assert_eq!(quote("it's".into()).as_deref(), Some("'it''s'"));
        assert_eq!(quote(Value::Null).as_deref(), Some("NULL"));
        assert_eq!(quote(Value::Varchar(None)).as_deref(), Some("NULL"));
        assert_eq!(quote(true.into()).as_deref(), Some("true"));
        assert_eq!(quote((-42i32).into()).as_deref(), Some("-42"));
        assert_eq!(quote(u64::MAX.into()).as_deref(), Some("18446744073709551615"));
        assert_eq!(quote(1.5f64.into()).as_deref(), Some("1.5"));
        assert_eq!(quote(f64::NAN.into()), None);
        assert_eq!(
            quote(Decimal::new(1250, 2).into()).as_deref(),
            Some("12.50")
        );
        assert_eq!(
            quote(vec![0xDEu8, 0xAD].into()).as_deref(),
            Some("X'DEAD'")
        );
        assert_eq!(
            quote(date!(2025 - 01 - 31).into()).as_deref(),
            Some("'2025-01-31'")
        );
        assert_eq!(
            quote(time!(10:20:30).into()).as_deref(),
            Some("'10:20:30.0'")
        );
        assert_eq!(
            quote(datetime!(2025-01-31 10:20:30.5).into()).as_deref(),
            Some("'2025-01-31 10:20:30.5'")
        );
        assert_eq!(
            quote(Uuid::nil().into()).as_deref(),
            Some("'00000000-0000-0000-0000-000000000000'")
        );
        assert_eq!(quote(Value::List(Some(vec![]))), None);
    }

    #[test]
    fn transactions() {
        let mut out = String::new();
        WRITER.write_transaction_begin(&mut out);
        assert_eq!(out, "BEGIN;");
        out.clear();
        WRITER.write_transaction_commit(&mut out);
        assert_eq!(out, "COMMIT;");
        out.clear();
        WRITER.write_transaction_rollback(&mut out);
        assert_eq!(out, "ROLLBACK;");
    }
}
