use crate::{
    MysqlDriver, MysqlHandle,
    extract::{extract_labels, extract_row},
};
use mysql_async::{Conn, Opts, prelude::Queryable};
use quarry_core::{
    AsValue, Connection, ConnectionUrl, Driver, Error, ErrorContext, ErrorInfo, FieldInfo,
    KeyRole, QueryResult, Result, Row, RowsAffected, Schema, SqlWriter, Value, truncate_long,
};
use std::collections::VecDeque;
use tokio::runtime::{Builder, Runtime};
use url::Url;

/// Connection to a MySQL server.
///
/// The client is asynchronous, every call blocks on a runtime owned by the connection.
pub struct MysqlConnection {
    connection: Option<Conn>,
    runtime: Runtime,
    last_error: Option<ErrorInfo>,
}

fn map_error(error: mysql_async::Error, sql: &str) -> Error {
    match error {
        mysql_async::Error::Server(e) => Error::execution(e.message, Some(e.code as i64), sql),
        mysql_async::Error::Io(e) => Error::connection(format!("{}", e)),
        other => Error::msg(format!("{}", other)),
    }
}

async fn query(connection: &mut Conn, sql: &str) -> Result<QueryResult<MysqlHandle>> {
    let mut result = connection
        .query_iter(sql)
        .await
        .map_err(|e| map_error(e, sql))?;
    let labels = extract_labels(result.columns_ref());
    if labels.is_empty() {
        let affected = RowsAffected {
            rows_affected: result.affected_rows(),
            last_affected_id: result
                .last_insert_id()
                .filter(|v| *v > 0)
                .map(|v| v as i64),
        };
        result.drop_result().await.map_err(|e| map_error(e, sql))?;
        return Ok(QueryResult::Affected(affected));
    }
    let mut rows = VecDeque::new();
    let mut failure = None;
    // Drained even after a conversion failure, the connection is unusable otherwise
    while let Some(row) = result.next().await.map_err(|e| map_error(e, sql))? {
        if failure.is_none() {
            match extract_row(row) {
                Ok(row) => rows.push_back(row),
                Err(e) => failure = Some(e),
            }
        }
    }
    result.drop_result().await.map_err(|e| map_error(e, sql))?;
    match failure {
        Some(e) => Err(e),
        None => Ok(QueryResult::Rows(MysqlHandle::new(labels, rows))),
    }
}

impl MysqlConnection {
    fn record(&mut self, error: Error, sql: &str) -> Error {
        log::error!("{:#}\n{}", error, truncate_long!(sql));
        self.last_error = Some((&error).into());
        error
    }

    fn open(url: &str) -> Result<Self> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let options = Url::parse(url)
            .with_context(context)
            .and_then(|v| Opts::from_url(v.as_str()).with_context(context))
            .map_err(Error::Connection)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Could not start the runtime of the MySQL client")
            .map_err(Error::Connection)?;
        let connection = runtime
            .block_on(Conn::new(options))
            .with_context(context)
            .map_err(Error::Connection)?;
        Ok(Self {
            connection: Some(connection),
            runtime,
            last_error: None,
        })
    }
}

fn column(row: &Row, index: usize) -> Value {
    row.get(index).cloned().unwrap_or_default()
}

impl Connection for MysqlConnection {
    type Driver = MysqlDriver;
    type Handle = MysqlHandle;

    fn connect(url: &str) -> Result<Self> {
        ConnectionUrl::parse(MysqlDriver::NAME, url)?;
        Self::open(url).inspect_err(|e| log::error!("{:#}", e))
    }

    fn driver(&self) -> &MysqlDriver {
        &MysqlDriver {}
    }

    fn execute(&mut self, sql: &str) -> Result<QueryResult<MysqlHandle>> {
        let Some(connection) = self.connection.as_mut() else {
            let error = Error::connection("The connection was already closed");
            return Err(self.record(error, sql));
        };
        let result = self.runtime.block_on(query(connection, sql));
        result.map_err(|e| self.record(e, sql))
    }

    fn describe_schema(&mut self, source: &str) -> Result<Schema> {
        let writer = self.driver().sql_writer();
        let (schema_name, table_name) = match source.split_once('.') {
            Some((schema, table)) => (
                writer
                    .quote_value(&Value::Varchar(Some(schema.into())))
                    .map_err(Error::msg)?,
                table,
            ),
            None => ("DATABASE()".to_string(), source),
        };
        let sql = format!(
            "SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY\n\
             FROM information_schema.COLUMNS\n\
             WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {}\n\
             ORDER BY ORDINAL_POSITION;",
            schema_name,
            writer
                .quote_value(&Value::Varchar(Some(table_name.into())))
                .map_err(Error::msg)?
        );
        let mut schema = Schema::new(source);
        let mut cursor = self.fetch(&sql)?;
        for row in &mut cursor {
            let key = Option::<String>::try_from_value(column(&row, 3))?;
            schema.fields.push(FieldInfo {
                name: String::try_from_value(column(&row, 0))?,
                data_type: String::try_from_value(column(&row, 1))?,
                nullable: String::try_from_value(column(&row, 2))? == "YES",
                key: match key.as_deref() {
                    Some("PRI") => KeyRole::Primary,
                    Some("UNI") => KeyRole::Unique,
                    Some("MUL") => KeyRole::Index,
                    _ => KeyRole::None,
                },
            });
        }
        if let Some(e) = cursor.take_error() {
            return Err(e);
        }
        if schema.is_empty() {
            let error = Error::execution(format!("Table '{}' doesn't exist", source), None, &sql);
            return Err(self.record(error, &sql));
        }
        Ok(schema)
    }

    fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }
}

impl Drop for MysqlConnection {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(e) = self.runtime.block_on(connection.disconnect()) {
                log::warn!("Error while closing the MySQL connection: {:#}", e);
            }
        }
    }
}
