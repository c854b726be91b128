mod clauses;
mod companies;
mod errors;
mod interceptors;
mod navigation;
mod schema;
mod transactions;
mod values;

use crate::{
    clauses::clauses, companies::companies, errors::errors, interceptors::interceptors,
    navigation::navigation, schema::schema, transactions::transactions, values::values,
};
use log::LevelFilter;
use quarry::{Connection, Database, Query, Row};
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub fn execute_tests<C: Connection>(connection: C) {
    let mut database = Database::new(connection);
    companies(&mut database);
    navigation(&mut database);
    clauses(&mut database);
    values(&mut database);
    schema(&mut database);
    transactions(&mut database);
    errors(&mut database);
    interceptors(database.into_inner());
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}

/// Drop and create `table` with the given column definitions.
pub(crate) fn recreate<C: Connection>(database: &mut Database<C>, table: &str, columns: &str) {
    let connection = database.connection_mut();
    let name = connection.quote_identifier(table);
    connection
        .run(&format!("DROP TABLE IF EXISTS {};", name))
        .unwrap_or_else(|e| panic!("Failed to drop the table {}: {:#}", table, e));
    connection
        .run(&format!("CREATE TABLE {} ({});", name, columns))
        .unwrap_or_else(|e| panic!("Failed to create the table {}: {:#}", table, e));
}

pub(crate) fn read_all<C: Connection>(database: &mut Database<C>, query: &Query) -> Vec<Row> {
    database
        .read(query)
        .expect("Failed to read")
        .expect("The read was skipped")
        .collect()
}
