use crate::{
    Driver, Error, ErrorInfo, NativeHandle, QueryResult, Result, ResultCursor, RowsAffected,
    Schema, SqlWriter, Value, truncate_long,
};

/// One live connection to a backend.
///
/// Every operation takes `&mut self`: a connection serves a single logical operation at a
/// time, callers needing concurrency open more connections.
pub trait Connection: Sized {
    type Driver: Driver<Connection = Self>;
    /// Result set returned by [`execute`](Connection::execute).
    type Handle: NativeHandle;

    /// Open a connection to the given url, the scheme must match the driver's name.
    fn connect(url: &str) -> Result<Self>;

    fn driver(&self) -> &Self::Driver;

    /// Execute one statement.
    ///
    /// A driver rejection is returned as [`Error::Execution`] and recorded as
    /// [`last_error`](Connection::last_error).
    fn execute(&mut self, sql: &str) -> Result<QueryResult<Self::Handle>>;

    /// Columns of `source` in declaration order.
    fn describe_schema(&mut self, source: &str) -> Result<Schema>;

    /// Most recent error reported by this connection.
    fn last_error(&self) -> Option<&ErrorInfo>;

    fn quote_identifier(&self, value: &str) -> String {
        self.driver().sql_writer().quote_identifier(value)
    }

    fn quote_value(&self, value: &Value) -> Result<String> {
        self.driver().sql_writer().quote_value(value).map_err(|e| {
            let error = Error::msg(e);
            log::error!("{:#}", error);
            error
        })
    }

    /// Execute a statement expected to return rows and wrap its handle in a cursor.
    fn fetch(&mut self, sql: &str) -> Result<ResultCursor<Self::Handle>> {
        match self.execute(sql)? {
            QueryResult::Rows(handle) => Ok(ResultCursor::new(handle)),
            QueryResult::Affected(..) => {
                let error = Error::msg(format!(
                    "The statement did not return a result set:\n{}",
                    truncate_long!(sql)
                ));
                log::error!("{:#}", error);
                Err(error)
            }
        }
    }

    /// Execute a statement discarding any row it returns.
    fn run(&mut self, sql: &str) -> Result<RowsAffected> {
        Ok(self.execute(sql)?.rows_affected().unwrap_or_default())
    }

    fn begin(&mut self) -> Result<()> {
        let mut sql = String::with_capacity(32);
        self.driver().sql_writer().write_transaction_begin(&mut sql);
        self.run(&sql).map(|_| ())
    }

    fn commit(&mut self) -> Result<()> {
        let mut sql = String::with_capacity(32);
        self.driver().sql_writer().write_transaction_commit(&mut sql);
        self.run(&sql).map(|_| ())
    }

    fn rollback(&mut self) -> Result<()> {
        let mut sql = String::with_capacity(32);
        self.driver().sql_writer().write_transaction_rollback(&mut sql);
        self.run(&sql).map(|_| ())
    }
}
