use crate::{read_all, recreate};
use quarry::{AsValue, Connection, Database, Ordered, Query, Row, Value};

fn company(row: &Row) -> (i64, String) {
    (
        i64::try_from_value(row[0].clone()).expect("The id is not an integer"),
        String::try_from_value(row[1].clone()).expect("The name is not a string"),
    )
}

pub fn companies<C: Connection>(database: &mut Database<C>) {
    recreate(
        database,
        "quarry_companies",
        "id INTEGER PRIMARY KEY, name VARCHAR(255) NOT NULL, employees INTEGER",
    );

    // Setup
    for (id, name) in [(1, "Foo Company"), (2, "Bar Company")] {
        let query = Query::create("quarry_companies")
            .condition("id", id)
            .condition("name", name);
        assert!(database.create(&query).expect("Failed to insert a company"));
    }

    // Forward completeness
    let query = Query::read("quarry_companies").fields(["id", "name"]);
    let mut cursor = database
        .read(&query)
        .expect("Failed to read the companies")
        .expect("The read was skipped");
    assert!(cursor.valid());
    let row = cursor.next().expect("Missing the first company");
    assert_eq!(company(&row), (1, "Foo Company".into()));
    let row = cursor.next().expect("Missing the second company");
    assert_eq!(company(&row), (2, "Bar Company".into()));
    assert_eq!(cursor.next(), None);
    assert!(!cursor.valid());
    assert!(cursor.resource().is_none());
    assert_eq!(cursor.next(), None);

    // Round trip
    let compiled = read_all(database, &Query::read("quarry_companies"));
    let native: Vec<Row> = {
        let connection = database.connection_mut();
        let sql = format!("SELECT * FROM {};", connection.quote_identifier("quarry_companies"));
        connection
            .fetch(&sql)
            .expect("Failed to run the native query")
            .collect()
    };
    assert_eq!(compiled.len(), 2);
    assert_eq!(compiled, native);

    // Falsy values are data
    let query = Query::create("quarry_companies")
        .condition("id", 0)
        .condition("name", "")
        .condition("employees", 0);
    assert!(database.create(&query).expect("Failed to insert the empty company"));
    let rows = read_all(
        database,
        &Query::read("quarry_companies")
            .condition("id", 0)
            .fields(["id", "name", "employees"]),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(company(&rows[0]), (0, "".into()));
    assert_eq!(i64::try_from_value(rows[0][2].clone()).ok(), Some(0));

    // Update
    let query = Query::update("quarry_companies")
        .condition("name", "Baz Company")
        .condition("employees", 12)
        .filter("id", 2);
    assert!(database.update(&query).expect("Failed to update"));
    let rows = read_all(
        database,
        &Query::read("quarry_companies")
            .fields(["id", "name", "employees"])
            .order(vec![Ordered::desc("id")])
            .limit(1),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(company(&rows[0]), (2, "Baz Company".into()));
    assert_eq!(i64::try_from_value(rows[0][2].clone()).ok(), Some(12));

    // Update without fields is skipped
    let query = Query::update("quarry_companies").filter("id", 2);
    assert!(!database.update(&query).expect("Failed to skip the update"));

    // Delete
    assert!(
        database
            .delete(&Query::delete("quarry_companies").condition("id", 0))
            .expect("Failed to delete")
    );
    let rows = read_all(
        database,
        &Query::read("quarry_companies").fields(["id", "name"]).order("id"),
    );
    assert_eq!(
        rows.iter().map(company).collect::<Vec<_>>(),
        [(1, "Foo Company".into()), (2, "Baz Company".into())]
    );

    // Null
    let query = Query::read("quarry_companies")
        .condition("employees", Value::Null)
        .fields(["id"]);
    let rows = read_all(database, &query);
    assert_eq!(rows.len(), 1);
    assert_eq!(i64::try_from_value(rows[0][0].clone()).ok(), Some(1));
}
