use crate::{read_all, recreate};
use quarry::{AsValue, Connection, Database, Query};
use rust_decimal::Decimal;
use time::{Date, Month};

pub fn values<C: Connection>(database: &mut Database<C>) {
    recreate(
        database,
        "quarry_values",
        "id INTEGER PRIMARY KEY, flag BOOLEAN, ratio DOUBLE, amount DECIMAL(10, 2), \
         note VARCHAR(255), payload BLOB, day DATE",
    );
    let day = Date::from_calendar_date(2025, Month::January, 31).expect("Invalid date");
    let texts = [
        "It's \"quoted\"",
        r"C:\path\to\file",
        "Zürich ☕",
        "",
        "-- not a comment; DROP TABLE quarry_values",
    ];
    for (i, text) in texts.iter().enumerate() {
        let query = Query::create("quarry_values")
            .condition("id", i as i64 + 1)
            .condition("flag", i % 2 == 0)
            .condition("ratio", 0.25 * i as f64)
            .condition("amount", Decimal::new(1250 + i as i64, 2))
            .condition("note", *text)
            .condition("payload", vec![0xDEu8, 0xAD, 0x00, i as u8])
            .condition("day", day);
        assert!(database.create(&query).expect("Failed to insert the values"));
    }
    let rows = read_all(
        database,
        &Query::read("quarry_values")
            .fields(["id", "flag", "ratio", "amount", "note", "payload", "day"])
            .order("id"),
    );
    assert_eq!(rows.len(), texts.len());
    for (i, row) in rows.into_iter().enumerate() {
        let mut values = row.into_vec().into_iter();
        let mut next = || values.next().expect("Missing column");
        assert_eq!(i64::try_from_value(next()).ok(), Some(i as i64 + 1));
        assert_eq!(bool::try_from_value(next()).ok(), Some(i % 2 == 0));
        assert_eq!(f64::try_from_value(next()).ok(), Some(0.25 * i as f64));
        assert_eq!(
            Decimal::try_from_value(next()).ok(),
            Some(Decimal::new(1250 + i as i64, 2))
        );
        assert_eq!(String::try_from_value(next()).ok().as_deref(), Some(texts[i]));
        assert_eq!(
            Vec::<u8>::try_from_value(next()).ok(),
            Some(vec![0xDE, 0xAD, 0x00, i as u8])
        );
        assert_eq!(Date::try_from_value(next()).ok(), Some(day));
    }

    // Nulls keep their place
    let query = Query::create("quarry_values")
        .condition("id", 100)
        .condition("note", Option::<String>::None)
        .condition("payload", Option::<Vec<u8>>::None);
    assert!(database.create(&query).expect("Failed to insert the nulls"));
    let rows = read_all(
        database,
        &Query::read("quarry_values")
            .fields(["note", "payload", "day"])
            .condition("id", 100),
    );
    assert_eq!(rows.len(), 1);
    assert!(rows[0].iter().all(|v| v.is_null()));
}
