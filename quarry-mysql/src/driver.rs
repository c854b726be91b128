use crate::{MysqlConnection, MysqlSqlWriter};
use quarry_core::Driver;

#[derive(Default, Debug, Clone, Copy)]
pub struct MysqlDriver;

impl MysqlDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MysqlDriver {
    type Connection = MysqlConnection;
    type SqlWriter = MysqlSqlWriter;

    const NAME: &'static str = "mysql";

    fn sql_writer(&self) -> MysqlSqlWriter {
        MysqlSqlWriter::new()
    }
}
