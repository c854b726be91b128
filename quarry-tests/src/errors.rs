use crate::silent_logs;
use quarry::{Connection, Database, Error, Query};

pub fn errors<C: Connection>(database: &mut Database<C>) {
    silent_logs! {
        let result = database.read(&Query::read("quarry_missing_table"));
        assert!(matches!(result, Err(Error::Execution { .. })));
        let last = database
            .connection()
            .last_error()
            .expect("The error was not recorded");
        assert!(!last.message.is_empty());

        let result = database.create(
            &Query::create("quarry_companies")
                .condition("id", 1)
                .condition("name", "Duplicate"),
        );
        assert!(matches!(result, Err(Error::Execution { .. })));

        let result = database.connection_mut().run("THIS IS NOT SQL;");
        assert!(result.is_err());
    }
    // The connection is still usable
    let cursor = database
        .read(&Query::read("quarry_companies").condition("id", 1))
        .expect("Failed to read after the errors")
        .expect("The read was skipped");
    assert_eq!(cursor.count(), 1);
}
