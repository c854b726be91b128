use crate::{Connection, Result, SqlWriter};

/// Entry point of a backend: names it, builds its dialect writer and opens connections.
pub trait Driver {
    type Connection: Connection<Driver = Self>;
    type SqlWriter: SqlWriter;

    /// Scheme of the connection urls this driver accepts (`sqlite` for `sqlite://...`).
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;

    fn connect(&self, url: &str) -> Result<Self::Connection> {
        Self::Connection::connect(url)
    }
}
