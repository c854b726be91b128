use crate::{DuckdbConnection, DuckdbSqlWriter};
use quarry_core::Driver;

#[derive(Default, Debug, Clone, Copy)]
pub struct DuckdbDriver {}

impl DuckdbDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Driver for DuckdbDriver {
    type Connection = DuckdbConnection;
    type SqlWriter = DuckdbSqlWriter;

    const NAME: &'static str = "duckdb";

    fn sql_writer(&self) -> DuckdbSqlWriter {
        DuckdbSqlWriter::new()
    }
}
