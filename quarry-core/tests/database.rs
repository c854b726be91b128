#[cfg(test)]
mod tests {
    use quarry_core::{
        Connection, ConnectionUrl, Database, Driver, Error, ErrorInfo, FieldInfo,
        GenericSqlWriter, KeyRole, NativeHandle, Outcome, Query, QueryKind, QueryResult, Result,
        Row, RowNames, RowsAffected, Schema, Traversal, Value,
    };
    use std::{cell::RefCell, collections::VecDeque, rc::Rc};

    fn company(id: i64, name: &str) -> Row {
        vec![Value::Int64(Some(id)), Value::Varchar(Some(name.into()))].into_boxed_slice()
    }

    struct MockDriver;

    impl Driver for MockDriver {
        type Connection = MockConnection;
        type SqlWriter = GenericSqlWriter;

        const NAME: &'static str = "mock";

        fn sql_writer(&self) -> GenericSqlWriter {
            GenericSqlWriter::new()
        }
    }

    struct VecHandle {
        labels: RowNames,
        rows: VecDeque<Row>,
    }

    impl NativeHandle for VecHandle {
        const TRAVERSAL: Traversal = Traversal::RowCache;

        fn labels(&self) -> &RowNames {
            &self.labels
        }

        fn is_empty(&self) -> bool {
            self.rows.is_empty()
        }

        fn fetch(&mut self) -> Result<Option<Row>> {
            Ok(self.rows.pop_front())
        }
    }

    struct MockConnection {
        executed: Rc<RefCell<Vec<String>>>,
        last_error: Option<ErrorInfo>,
    }

    impl Connection for MockConnection {
        type Driver = MockDriver;
        type Handle = VecHandle;

        fn connect(url: &str) -> Result<Self> {
            ConnectionUrl::parse(MockDriver::NAME, url)?;
            Ok(Self {
                executed: Default::default(),
                last_error: None,
            })
        }

        fn driver(&self) -> &MockDriver {
            &MockDriver
        }

        fn execute(&mut self, sql: &str) -> Result<QueryResult<VecHandle>> {
            self.executed.borrow_mut().push(sql.to_string());
            if sql.contains("missing") {
                let error = Error::execution("no such table: missing", Some(1), sql);
                self.last_error = Some((&error).into());
                return Err(error);
            }
            if sql.starts_with("SELECT") {
                return Ok(QueryResult::Rows(VecHandle {
                    labels: ["id", "name"].into_iter().map(String::from).collect(),
                    rows: VecDeque::from(vec![company(1, "Foo Company"), company(2, "Bar Company")]),
                }));
            }
            Ok(QueryResult::Affected(RowsAffected {
                rows_affected: 1,
                last_affected_id: None,
            }))
        }

        fn describe_schema(&mut self, source: &str) -> Result<Schema> {
            Ok(Schema {
                source: source.into(),
                fields: vec![FieldInfo {
                    name: "id".into(),
                    data_type: "INTEGER".into(),
                    nullable: false,
                    key: KeyRole::Primary,
                }],
            })
        }

        fn last_error(&self) -> Option<&ErrorInfo> {
            self.last_error.as_ref()
        }
    }

    fn database() -> (Database<MockConnection>, Rc<RefCell<Vec<String>>>) {
        let database = Database::<MockConnection>::connect("mock://memory").expect("connect");
        let executed = database.connection().executed.clone();
        (database, executed)
    }

    #[test]
    fn connect_checks_scheme() {
        assert!(matches!(
            Database::<MockConnection>::connect("sqlite://memory"),
            Err(Error::Connection(..))
        ));
    }

    #[test]
    fn read_round_trip() {
        let (mut database, executed) = database();
        let cursor = database
            .read(&Query::read("companies"))
            .expect("read")
            .expect("cursor");
        let rows: Vec<Row> = cursor.collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], Value::from("Bar Company"));
        assert_eq!(*executed.borrow(), ["SELECT *\nFROM \"companies\";"]);
    }

    #[test]
    fn commands() {
        let (mut database, executed) = database();
        let create = Query::create("companies")
            .condition("id", 3)
            .condition("name", "");
        assert!(database.create(&create).expect("create"));
        let update = Query::update("companies")
            .condition("name", "Baz Company")
            .filter("id", 3);
        assert!(database.update(&update).expect("update"));
        assert!(
            database
                .delete(&Query::delete("companies").condition("id", 3))
                .expect("delete")
        );
        assert_eq!(
            *executed.borrow(),
            [
                "INSERT INTO \"companies\" (\"id\", \"name\") VALUES\n(3, '');",
                "UPDATE \"companies\" SET \"name\" = 'Baz Company'\nWHERE \"id\" = 3;",
                "DELETE FROM \"companies\"\nWHERE \"id\" = 3;",
            ]
        );
    }

    #[test]
    fn unrenderable_command_is_skipped() {
        let (mut database, executed) = database();
        let update = Query::update("companies").filter("id", 3);
        assert!(!database.update(&update).expect("update"));
        assert!(executed.borrow().is_empty());
    }

    #[test]
    fn execution_error() {
        let (mut database, _) = database();
        let result = database.read(&Query::read("missing"));
        assert!(matches!(result, Err(Error::Execution { code: Some(1), .. })));
        let last = database.connection().last_error().cloned();
        assert_eq!(
            last.map(|v| v.message),
            Some("no such table: missing".to_string())
        );
    }

    #[test]
    fn interceptor_veto() {
        let (database, executed) = database();
        let mut database = database.intercept(|operation, query, next| {
            if operation == QueryKind::Delete {
                return Ok(Outcome::Success(false));
            }
            next(query)
        });
        assert!(!database.delete(&Query::delete("companies")).expect("delete"));
        assert!(database.read(&Query::read("companies")).expect("read").is_some());
        assert_eq!(executed.borrow().len(), 1);
    }

    #[test]
    fn interceptor_rewrites_and_observes() {
        let (database, executed) = database();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let observed = seen.clone();
        let mut database = database
            .intercept(move |operation, query, next| {
                observed.borrow_mut().push(operation);
                next(query)
            })
            .intercept(|_, query, next| next(&query.clone().limit(1)));
        let cursor = database.read(&Query::read("companies")).expect("read");
        assert!(cursor.is_some());
        assert_eq!(*seen.borrow(), [QueryKind::Read]);
        assert_eq!(
            *executed.borrow(),
            ["SELECT *\nFROM \"companies\"\nLIMIT 1;"]
        );
    }

    #[test]
    fn read_vetoed() {
        let (database, _) = database();
        let mut database = database.intercept(|_, _, _| Ok(Outcome::Success(false)));
        assert!(database.read(&Query::read("companies")).expect("read").is_none());
    }

    #[test]
    fn transactions_and_schema() {
        let (mut database, executed) = database();
        database.begin().expect("begin");
        database.rollback().expect("rollback");
        database.begin().expect("begin");
        database.commit().expect("commit");
        assert_eq!(
            *executed.borrow(),
            ["BEGIN;", "ROLLBACK;", "BEGIN;", "COMMIT;"]
        );
        let schema = database.describe("companies").expect("describe");
        assert_eq!(schema.primary_key().map(|v| v.name.as_str()).collect::<Vec<_>>(), ["id"]);
    }

    #[test]
    fn quote_helpers() {
        let (database, _) = database();
        let connection = database.connection();
        assert_eq!(connection.quote_identifier("name"), "\"name\"");
        assert_eq!(
            connection.quote_value(&"it's".into()).ok().as_deref(),
            Some("'it''s'")
        );
        assert!(connection.quote_value(&f64::NAN.into()).is_err());
    }
}
