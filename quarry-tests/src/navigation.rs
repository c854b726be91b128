use crate::recreate;
use quarry::{AsValue, Connection, Database, Query, Row};

fn id(row: Option<Row>) -> Option<i64> {
    row.map(|v| i64::try_from_value(v[0].clone()).expect("The id is not an integer"))
}

pub fn navigation<C: Connection>(database: &mut Database<C>) {
    recreate(
        database,
        "quarry_navigation",
        "id INTEGER PRIMARY KEY, label VARCHAR(32)",
    );
    for i in 1..=4 {
        let query = Query::create("quarry_navigation")
            .condition("id", i)
            .condition("label", format!("row {}", i));
        assert!(database.create(&query).expect("Failed to insert a row"));
    }
    let query = Query::read("quarry_navigation")
        .fields(["id", "label"])
        .order("id");

    // Backward and forward
    let mut cursor = database
        .read(&query)
        .expect("Failed to read")
        .expect("The read was skipped");
    assert_eq!(&cursor.labels()[..], ["id", "label"]);
    assert_eq!(cursor.key(), None);
    assert_eq!(cursor.prev(), None);
    assert_eq!(id(cursor.next()), Some(1));
    assert_eq!(cursor.key(), Some(0));
    assert_eq!(id(cursor.next()), Some(2));
    assert_eq!(cursor.key(), Some(1));
    assert_eq!(id(cursor.prev()), Some(1));
    assert_eq!(cursor.key(), Some(0));
    assert_eq!(id(cursor.next()), Some(2));
    assert_eq!(id(cursor.next()), Some(3));
    assert_eq!(id(cursor.prev()), Some(2));
    assert_eq!(id(cursor.prev()), Some(1));
    assert_eq!(cursor.prev(), None);
    assert_eq!(cursor.key(), Some(0));
    assert_eq!(id(cursor.current().cloned()), Some(1));

    // Rewind
    assert_eq!(id(cursor.next()), Some(2));
    cursor.rewind();
    assert_eq!(cursor.key(), None);
    assert_eq!(cursor.position(), -1);
    assert_eq!(id(cursor.next()), Some(1));
    assert_eq!(cursor.key(), Some(0));
    let rest: Vec<_> = (&mut cursor).map(|v| id(Some(v))).collect();
    assert_eq!(rest, [Some(2), Some(3), Some(4)]);
    assert!(!cursor.valid());
    assert_eq!(cursor.prev(), None);

    // Empty
    let mut cursor = database
        .read(&query.clone().condition("id", 999))
        .expect("Failed to read")
        .expect("The read was skipped");
    assert!(!cursor.valid());
    assert!(cursor.resource().is_none());
    let mut iterations = 0;
    for _ in &mut cursor {
        iterations += 1;
    }
    assert_eq!(iterations, 0);

    // Close
    let mut cursor = database
        .read(&query)
        .expect("Failed to read")
        .expect("The read was skipped");
    assert_eq!(id(cursor.next()), Some(1));
    cursor.close();
    assert!(cursor.resource().is_none());
    cursor.close();
    assert!(cursor.resource().is_none());
    assert!(!cursor.valid());
    assert_eq!(cursor.next(), None);
    assert_eq!(cursor.prev(), None);

    // A dropped cursor releases the connection for the next command
    let mut cursor = database
        .read(&query)
        .expect("Failed to read")
        .expect("The read was skipped");
    assert_eq!(id(cursor.next()), Some(1));
    drop(cursor);
    assert!(
        database
            .delete(&Query::delete("quarry_navigation").condition("id", 4))
            .expect("Failed to delete")
    );
}
