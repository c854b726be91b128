mod init;

#[cfg(test)]
mod tests {
    use crate::init::init;
    use quarry_core::{Connection, Driver, Error, NativeHandle, Query, SqlWriter, Traversal};
    use quarry_mysql::{MysqlConnection, MysqlDriver, MysqlHandle};
    use quarry_tests::{execute_tests, init_logs, silent_logs};
    use std::sync::Mutex;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn mysql() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let Some((url, _container)) = init() else {
            return;
        };
        let driver = MysqlDriver::new();
        let connection = driver.connect(&url).expect("Could not open the database");
        execute_tests(connection);
    }

    #[test]
    fn row_cache_traversal() {
        init_logs();
        assert_eq!(MysqlHandle::TRAVERSAL, Traversal::RowCache);
        let _guard = MUTEX.lock().unwrap();
        let Some((url, _container)) = init() else {
            return;
        };
        let mut connection = MysqlConnection::connect(&url).expect("Could not open the database");
        let mut cursor = connection
            .fetch("SELECT 1 UNION ALL SELECT 2 UNION ALL SELECT 3;")
            .expect("Could not run the query");
        assert_eq!(cursor.traversal(), Traversal::RowCache);
        let forward: Vec<_> = cursor.by_ref().take(3).collect();
        assert_eq!(cursor.cache().map(|v| v.len()), Some(3));
        assert_eq!(cursor.resource().map(|v| v.remaining()), Some(0));
        assert_eq!(cursor.prev(), Some(forward[1].clone()));
        assert_eq!(cursor.prev(), Some(forward[0].clone()));
        assert_eq!(cursor.next(), Some(forward[1].clone()));
        drop(cursor);
        let affected = connection
            .run("DO 1;")
            .expect("Could not run a statement without result");
        assert_eq!(affected.rows_affected, 0);
    }

    #[test]
    fn wrong_url() {
        init_logs();
        silent_logs! {
            assert!(matches!(
                MysqlConnection::connect("postgres://some_value"),
                Err(Error::Connection(..))
            ));
            assert!(matches!(
                MysqlConnection::connect("mysql://user@localhost:1/nothing_listens_here"),
                Err(Error::Connection(..))
            ));
        }
    }

    #[test]
    fn dialect() {
        let writer = MysqlDriver::new().sql_writer();
        assert_eq!(writer.quote_identifier("a`b"), "`a``b`");
        assert_eq!(
            writer.quote_value(&r"it's C:\dir".into()).as_deref(),
            Ok(r"'it''s C:\\dir'")
        );
        let query = Query::read("t").order("id").limit(5).offset(10);
        let mut out = String::new();
        writer
            .write_command(&mut out, &query, &writer.compile(&query))
            .expect("Command");
        assert_eq!(out, "SELECT *\nFROM `t`\nORDER BY `id`\nLIMIT 10, 5;");
        let query = Query::create("t");
        let mut out = String::new();
        writer
            .write_command(&mut out, &query, &writer.compile(&query))
            .expect("Command");
        assert_eq!(out, "INSERT INTO `t` () VALUES ();");
        let mut out = String::new();
        writer.write_transaction_begin(&mut out);
        assert_eq!(out, "START TRANSACTION;");
    }
}
