use crate::{read_all, recreate};
use quarry::{Connection, Database, Query};

pub fn transactions<C: Connection>(database: &mut Database<C>) {
    recreate(
        database,
        "quarry_ledger",
        "id INTEGER PRIMARY KEY, amount INTEGER NOT NULL",
    );
    let count = |database: &mut Database<C>| {
        read_all(database, &Query::read("quarry_ledger").fields(["id"])).len()
    };

    database.begin().expect("Failed to begin");
    let query = Query::create("quarry_ledger")
        .condition("id", 1)
        .condition("amount", 100);
    assert!(database.create(&query).expect("Failed to insert"));
    assert_eq!(count(database), 1);
    database.rollback().expect("Failed to rollback");
    assert_eq!(count(database), 0);

    database.begin().expect("Failed to begin");
    assert!(database.create(&query).expect("Failed to insert"));
    database.commit().expect("Failed to commit");
    assert_eq!(count(database), 1);
}
