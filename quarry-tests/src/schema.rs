use crate::recreate;
use quarry::{Connection, Database, KeyRole};

pub fn schema<C: Connection>(database: &mut Database<C>) {
    recreate(
        database,
        "quarry_schema",
        "id INTEGER PRIMARY KEY, code VARCHAR(16) NOT NULL UNIQUE, \
         name VARCHAR(64) NOT NULL, employees INTEGER",
    );
    let schema = database
        .describe("quarry_schema")
        .expect("Failed to describe the table");
    assert_eq!(schema.source, "quarry_schema");
    assert_eq!(
        schema.names().collect::<Vec<_>>(),
        ["id", "code", "name", "employees"]
    );
    assert_eq!(
        schema.primary_key().map(|v| v.name.as_str()).collect::<Vec<_>>(),
        ["id"]
    );
    let id = schema.get("id").expect("Missing id");
    assert!(id.data_type.to_lowercase().starts_with("int"));
    let code = schema.get("code").expect("Missing code");
    assert!(!code.nullable);
    assert_eq!(code.key, KeyRole::Unique);
    let name = schema.get("name").expect("Missing name");
    assert!(!name.nullable);
    assert_eq!(name.key, KeyRole::None);
    assert!(name.data_type.to_lowercase().starts_with("varchar"));
    let employees = schema.get("employees").expect("Missing employees");
    assert!(employees.nullable);
    assert_eq!(employees.key, KeyRole::None);

    assert!(database.describe("quarry_schema_missing").is_err());
}
