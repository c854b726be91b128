#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry::{GenericSqlWriter, Operator, Ordered, Query, SqlWriter, Value};
    use quarry_duckdb::DuckdbSqlWriter;
    use quarry_mysql::MysqlSqlWriter;
    use quarry_sqlite::SqliteSqlWriter;
    use time::macros::{date, datetime};

    const GENERIC: GenericSqlWriter = GenericSqlWriter::new();
    const SQLITE: SqliteSqlWriter = SqliteSqlWriter::new();
    const DUCKDB: DuckdbSqlWriter = DuckdbSqlWriter::new();
    const MYSQL: MysqlSqlWriter = MysqlSqlWriter::new();

    fn writers() -> [(&'static str, &'static dyn SqlWriter); 4] {
        [
            ("generic", &GENERIC),
            ("sqlite", &SQLITE),
            ("duckdb", &DUCKDB),
            ("mysql", &MYSQL),
        ]
    }

    fn command(writer: &dyn SqlWriter, query: &Query) -> String {
        let mut out = String::new();
        writer
            .write_command(&mut out, query, &writer.compile(query))
            .expect("Could not render the command");
        out
    }

    #[test]
    fn identifier_quoting() {
        let expected = [
            r#""we""ird"."co`l""#,
            r#""we""ird"."co`l""#,
            r#""we""ird"."co`l""#,
            r#"`we"ird`.`co``l`"#,
        ];
        for ((name, writer), expected) in writers().into_iter().zip(expected) {
            let mut out = String::new();
            writer
                .write_field(&mut out, r#"we"ird.co`l"#)
                .expect("Could not write the field");
            assert_eq!(out, expected, "{}", name);
        }
    }

    #[test]
    fn value_literals() {
        let cases: [(Value, [&str; 4]); 7] = [
            (true.into(), ["true", "1", "true", "true"]),
            (
                r"it's \ here".into(),
                [
                    r"'it''s \ here'",
                    r"'it''s \ here'",
                    r"'it''s \ here'",
                    r"'it''s \\ here'",
                ],
            ),
            (
                vec![0xDE_u8, 0xAD].into(),
                ["X'DEAD'", "X'DEAD'", r"'\xDE\xAD'::BLOB", "X'DEAD'"],
            ),
            (
                date!(2024 - 02 - 29).into(),
                ["'2024-02-29'", "'2024-02-29'", "'2024-02-29'", "'2024-02-29'"],
            ),
            (
                datetime!(2024-02-29 10:30:00.25).into(),
                [
                    "'2024-02-29 10:30:00.25'",
                    "'2024-02-29 10:30:00.25'",
                    "'2024-02-29 10:30:00.25'",
                    "'2024-02-29 10:30:00.25'",
                ],
            ),
            (1.5_f64.into(), ["1.5", "1.5", "1.5", "1.5"]),
            (Value::Null, ["NULL", "NULL", "NULL", "NULL"]),
        ];
        for (value, expected) in cases {
            for ((name, writer), expected) in writers().into_iter().zip(expected) {
                assert_eq!(
                    writer.quote_value(&value).as_deref(),
                    Ok(expected),
                    "{} {:?}",
                    name,
                    value
                );
            }
        }
    }

    #[test]
    fn infinity() {
        let value: Value = f64::NEG_INFINITY.into();
        assert!(GENERIC.quote_value(&value).is_err());
        assert!(MYSQL.quote_value(&value).is_err());
        assert_eq!(SQLITE.quote_value(&value).as_deref(), Ok("-1.0e+10000"));
        assert_eq!(DUCKDB.quote_value(&value).as_deref(), Ok("'-inf'::DOUBLE"));
        // The clause is dropped, not the whole query
        let query = Query::read("t")
            .compare("price", Operator::Less, f64::INFINITY)
            .limit(3);
        assert_eq!(command(&GENERIC, &query), "SELECT *\nFROM \"t\"\nLIMIT 3;");
    }

    #[test]
    fn read_in_every_dialect() {
        let query = Query::read("products")
            .fields(["name", "price"])
            .compare("price", Operator::GreaterEqual, 10)
            .one_of("category", ["tools", "garden"])
            .order(vec![Ordered::desc("price"), Ordered::asc("name")])
            .limit(20)
            .offset(40);
        assert_eq!(
            command(&SQLITE, &query),
            indoc! {r#"
                SELECT "name", "price"
                FROM "products"
                WHERE "price" >= 10 AND "category" IN ('tools', 'garden')
                ORDER BY "price" DESC, "name" ASC
                LIMIT 20 OFFSET 40;
            "#}
            .trim()
        );
        assert_eq!(command(&DUCKDB, &query), command(&SQLITE, &query));
        assert_eq!(
            command(&MYSQL, &query),
            indoc! {r#"
                SELECT `name`, `price`
                FROM `products`
                WHERE `price` >= 10 AND `category` IN ('tools', 'garden')
                ORDER BY `price` DESC, `name` ASC
                LIMIT 40, 20;
            "#}
            .trim()
        );
    }

    #[test]
    fn commands_in_every_dialect() {
        let create = Query::create("flags")
            .condition("id", 0)
            .condition("enabled", false)
            .condition("label", "");
        assert_eq!(
            command(&SQLITE, &create),
            "INSERT INTO \"flags\" (\"id\", \"enabled\", \"label\") VALUES\n(0, 0, '');"
        );
        assert_eq!(
            command(&MYSQL, &create),
            "INSERT INTO `flags` (`id`, `enabled`, `label`) VALUES\n(0, false, '');"
        );
        let update = Query::update("flags")
            .condition("enabled", true)
            .filter("id", 0);
        assert_eq!(
            command(&DUCKDB, &update),
            "UPDATE \"flags\" SET \"enabled\" = true\nWHERE \"id\" = 0;"
        );
        let delete = Query::delete("flags").condition("label", Value::Varchar(None));
        assert_eq!(
            command(&MYSQL, &delete),
            "DELETE FROM `flags`\nWHERE `label` IS NULL;"
        );
        let empty = Query::create("flags");
        assert_eq!(command(&SQLITE, &empty), "INSERT INTO \"flags\" DEFAULT VALUES;");
        assert_eq!(command(&MYSQL, &empty), "INSERT INTO `flags` () VALUES ();");
    }

    #[test]
    fn transactions() {
        for (name, writer) in writers() {
            let mut out = String::new();
            writer.write_transaction_begin(&mut out);
            out.push(' ');
            writer.write_transaction_commit(&mut out);
            out.push(' ');
            writer.write_transaction_rollback(&mut out);
            let expected = if name == "mysql" {
                "START TRANSACTION; COMMIT; ROLLBACK;"
            } else {
                "BEGIN; COMMIT; ROLLBACK;"
            };
            assert_eq!(out, expected, "{}", name);
        }
    }
}
