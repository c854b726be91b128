use crate::{read_all, recreate};
use quarry::{
    AsValue, Condition, Conditions, Connection, Database, Operator, Order, Ordered, Query, Row,
    Value,
};

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .map(|v| i64::try_from_value(v[0].clone()).expect("The id is not an integer"))
        .collect()
}

pub fn clauses<C: Connection>(database: &mut Database<C>) {
    recreate(
        database,
        "quarry_products",
        "id INTEGER PRIMARY KEY, name VARCHAR(64) NOT NULL, category VARCHAR(32), price INTEGER",
    );
    let products: [(i64, &str, Option<&str>, i64); 6] = [
        (1, "Anvil", Some("tools"), 120),
        (2, "Hammer", Some("tools"), 25),
        (3, "Apple", Some("food"), 2),
        (4, "Avocado", Some("food"), 3),
        (5, "Mystery box", None, 50),
        (6, "It's a trap", Some("toys"), 7),
    ];
    for (id, name, category, price) in products {
        let query = Query::create("quarry_products")
            .condition("id", id)
            .condition("name", name)
            .condition("category", category.map(String::from))
            .condition("price", price);
        assert!(database.create(&query).expect("Failed to insert a product"));
    }
    let base = Query::read("quarry_products").fields(["id"]).order("id");

    // Membership
    let rows = read_all(database, &base.clone().one_of("id", [2, 4, 6, 8]));
    assert_eq!(ids(&rows), [2, 4, 6]);
    let rows = read_all(
        database,
        &base
            .clone()
            .condition("category", Value::List(Some(vec!["food".into(), "toys".into()]))),
    );
    assert_eq!(ids(&rows), [3, 4, 6]);

    // An empty membership list cannot be rendered, the filter is dropped
    let rows = read_all(
        database,
        &base.clone().conditions(
            Conditions::new().with_condition("id", Condition::In(vec![])),
        ),
    );
    assert_eq!(rows.len(), 6);

    // Operators
    let rows = read_all(
        database,
        &base
            .clone()
            .compare("price", Operator::GreaterEqual, 25)
            .compare("name", Operator::NotEqual, "Anvil"),
    );
    assert_eq!(ids(&rows), [2, 5]);
    let rows = read_all(database, &base.clone().compare("name", Operator::Like, "A%"));
    assert_eq!(ids(&rows), [1, 3, 4]);
    let rows = read_all(database, &base.clone().compare("price", Operator::Less, 5));
    assert_eq!(ids(&rows), [3, 4]);
    let rows = read_all(
        database,
        &base
            .clone()
            .compare("category", Operator::NotEqual, Value::Null),
    );
    assert_eq!(ids(&rows), [1, 2, 3, 4, 6]);
    let rows = read_all(
        database,
        &base.clone().condition("category", Value::Varchar(None)),
    );
    assert_eq!(ids(&rows), [5]);

    // Escaping
    let rows = read_all(database, &base.clone().condition("name", "It's a trap"));
    assert_eq!(ids(&rows), [6]);

    // Fields
    let mut cursor = database
        .read(
            &Query::read("quarry_products")
                .fields(["name", "price"])
                .condition("id", 2),
        )
        .expect("Failed to read")
        .expect("The read was skipped");
    assert_eq!(&cursor.labels()[..], ["name", "price"]);
    let row = cursor.next().expect("Missing the hammer");
    assert_eq!(
        String::try_from_value(row[0].clone()).ok().as_deref(),
        Some("Hammer")
    );
    assert_eq!(i64::try_from_value(row[1].clone()).ok(), Some(25));
    drop(cursor);
    let cursor = database
        .read(
            &Query::read("quarry_products")
                .defaults(["id", "category"])
                .condition("id", 1),
        )
        .expect("Failed to read")
        .expect("The read was skipped");
    assert_eq!(&cursor.labels()[..], ["id", "category"]);
    drop(cursor);

    // Order
    let rows = read_all(
        database,
        &Query::read("quarry_products")
            .fields(["id"])
            .order(vec![Ordered::asc("price"), Ordered::desc("id")])
            .limit(3),
    );
    assert_eq!(ids(&rows), [3, 4, 6]);
    let rows = read_all(
        database,
        &Query::read("quarry_products")
            .fields(["id"])
            .order(vec![Ordered::desc("category"), Ordered::asc("id")])
            .compare("category", Operator::NotEqual, Value::Null),
    );
    assert_eq!(ids(&rows), [6, 1, 2, 3, 4]);
    // Unrenderable order is dropped, the rest of the query still applies
    let rows = read_all(
        database,
        &base
            .clone()
            .order(Order::List(vec![Ordered::asc("")]))
            .condition("id", 3),
    );
    assert_eq!(ids(&rows), [3]);

    // Limit and offset
    let rows = read_all(database, &base.clone().limit(2));
    assert_eq!(ids(&rows), [1, 2]);
    let rows = read_all(database, &base.clone().limit(2).offset(3));
    assert_eq!(ids(&rows), [4, 5]);
    let rows = read_all(database, &base.clone().limit(0));
    assert_eq!(rows.len(), 6);

    // Delete with membership
    assert!(
        database
            .delete(&Query::delete("quarry_products").one_of("id", [5, 6]))
            .expect("Failed to delete")
    );
    let rows = read_all(database, &base);
    assert_eq!(ids(&rows), [1, 2, 3, 4]);
}
