#[cfg(test)]
mod tests {
    use quarry_core::{Connection, Error};
    use quarry_sqlite::SqliteConnection;
    use quarry_tests::{init_logs, silent_logs};
    use std::{fs, path::Path, sync::Mutex};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            assert!(
                matches!(
                    SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH)),
                    Err(Error::Connection(..))
                ),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[test]
    fn wrong_url() {
        silent_logs! {
            assert!(matches!(
                SqliteConnection::connect("duckdb://some_value"),
                Err(Error::Connection(..))
            ));
        };
    }

    #[test]
    fn read_only() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/read_only.sqlite";
        let _guard = MUTEX.lock().unwrap();
        {
            let mut connection = SqliteConnection::connect(&format!("sqlite://{}", DB_PATH))
                .expect("Could not open the database");
            connection
                .run("CREATE TABLE IF NOT EXISTS t (id INTEGER);")
                .expect("Could not create the table");
        }
        let mut connection = SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .expect("Could not open the database");
        silent_logs! {
            let result = connection.run("INSERT INTO t VALUES (1);");
            assert!(matches!(result, Err(Error::Execution { .. })));
        }
        assert!(connection.last_error().is_some());
        drop(connection);
        let _ = fs::remove_file(DB_PATH);
    }

    #[test]
    fn memory() {
        init_logs();
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        connection
            .run("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);")
            .expect("Could not create the table");
        let affected = connection
            .run("INSERT INTO t (name) VALUES ('a'), ('b');")
            .expect("Could not insert");
        assert_eq!(affected.rows_affected, 2);
        assert_eq!(affected.last_affected_id, Some(2));
        let rows: Vec<_> = connection
            .fetch("SELECT id, name FROM t ORDER BY id;")
            .expect("Could not select")
            .collect();
        assert_eq!(rows.len(), 2);
        silent_logs! {
            assert!(connection.run("SELECT 1; SELECT 2;").is_err());
        }
        assert!(connection.run("   ").is_ok());
    }

    #[test]
    fn long_multibyte_query() {
        init_logs();
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        // Byte 497, where long queries are cut in messages, falls inside an 'é'
        let sql = format!("SELECT '{}{}\0';", "a".repeat(488), "é".repeat(40));
        silent_logs! {
            assert!(matches!(connection.run(&sql), Err(Error::Other(..))));
        }
        let sql = format!("SELECT '{}{}';", "a".repeat(488), "é".repeat(40));
        let rows: Vec<_> = connection.fetch(&sql).expect("Could not select").collect();
        assert_eq!(rows.len(), 1);
    }
}
