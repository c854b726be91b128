use crate::{CBox, SqliteDriver, SqliteHandle, error_message_from_ptr};
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_close, sqlite3_column_count, sqlite3_errcode,
    sqlite3_errmsg, sqlite3_finalize, sqlite3_last_insert_rowid, sqlite3_open_v2,
    sqlite3_prepare_v2, sqlite3_step, sqlite3_total_changes,
};
use quarry_core::{
    AsValue, Connection, ConnectionUrl, Driver, Error, ErrorContext, ErrorInfo, FieldInfo,
    KeyRole, QueryResult, Result, Row, RowsAffected, Schema, SqlWriter, Value, truncate_long,
};
use std::{
    ffi::{CStr, CString},
    ptr,
};

pub struct SqliteConnection {
    pub(crate) connection: CBox<sqlite3>,
    last_error: Option<ErrorInfo>,
}

impl SqliteConnection {
    /// Attach the statement text to a driver error and remember it as the last error.
    fn record(&mut self, error: Error, sql: &str) -> Error {
        let error = match error {
            Error::Execution { message, code, .. } => Error::execution(message, code, sql),
            other => other,
        };
        log::error!("{:#}\n{}", error, truncate_long!(sql));
        self.last_error = Some((&error).into());
        error
    }

    fn error_from_connection(&self) -> Error {
        unsafe {
            Error::execution(
                error_message_from_ptr(sqlite3_errmsg(*self.connection)),
                Some(sqlite3_errcode(*self.connection) as i64),
                "",
            )
        }
    }

    /// Step a statement that returns no rows until it completes.
    fn run_to_completion(&mut self, statement: &CBox<libsqlite3_sys::sqlite3_stmt>) -> Result<()> {
        loop {
            match unsafe { sqlite3_step(**statement) } {
                SQLITE_BUSY => continue,
                SQLITE_ROW => continue,
                SQLITE_DONE => return Ok(()),
                _ => return Err(self.error_from_connection()),
            }
        }
    }
}

fn column(row: &Row, index: usize) -> Value {
    row.get(index).cloned().unwrap_or_default()
}

impl Connection for SqliteConnection {
    type Driver = SqliteDriver;
    type Handle = SqliteHandle;

    fn connect(url: &str) -> Result<Self> {
        let url = ConnectionUrl::parse(SqliteDriver::NAME, url)?;
        let mut filename = format!("file:{}", url.location_or_memory());
        if let Some(mode) = url.param("mode") {
            filename.push_str("?mode=");
            filename.push_str(mode);
        }
        let filename = CString::new(filename)
            .with_context(|| format!("While opening `{}`", url.location))
            .map_err(Error::Connection)?;
        let mut connection: CBox<sqlite3> = CBox::new(ptr::null_mut(), |p| unsafe {
            // Busy while a cursor still holds a statement, the connection then stays open
            if sqlite3_close(p) == SQLITE_BUSY {
                log::warn!("SQLite connection dropped while a result is still open, it is not closed");
            }
        });
        let rc = unsafe {
            sqlite3_open_v2(
                filename.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        if rc != SQLITE_OK {
            let message = if connection.is_null() {
                "Out of memory".to_string()
            } else {
                unsafe { error_message_from_ptr(sqlite3_errmsg(*connection)) }
            };
            let error = Error::connection(format!(
                "Could not open the database `{}`: {}",
                url.location_or_memory(),
                message
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(Self {
            connection,
            last_error: None,
        })
    }

    fn driver(&self) -> &SqliteDriver {
        &SqliteDriver {}
    }

    fn execute(&mut self, sql: &str) -> Result<QueryResult<SqliteHandle>> {
        let query = CString::new(sql)
            .with_context(|| format!("While preparing the query:\n{}", truncate_long!(sql)))?;
        let mut statement: CBox<libsqlite3_sys::sqlite3_stmt> = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_finalize(p);
        });
        let mut tail = ptr::null();
        let rc = unsafe {
            sqlite3_prepare_v2(
                *self.connection,
                query.as_ptr(),
                -1,
                &mut *statement,
                &mut tail,
            )
        };
        if rc != SQLITE_OK {
            let error = self.error_from_connection();
            return Err(self.record(error, sql));
        }
        if !tail.is_null()
            && !unsafe { CStr::from_ptr(tail) }
                .to_bytes()
                .iter()
                .all(u8::is_ascii_whitespace)
        {
            let error = Error::execution("Cannot execute more than one statement at a time", None, sql);
            return Err(self.record(error, sql));
        }
        if statement.is_null() {
            // Only whitespace or comments
            return Ok(QueryResult::Affected(Default::default()));
        }
        if unsafe { sqlite3_column_count(*statement) } > 0 {
            return SqliteHandle::new(statement)
                .map(QueryResult::Rows)
                .map_err(|e| self.record(e, sql));
        }
        let before = unsafe { sqlite3_total_changes(*self.connection) };
        if let Err(e) = self.run_to_completion(&statement) {
            return Err(self.record(e, sql));
        }
        let rows_affected = unsafe { sqlite3_total_changes(*self.connection) } - before;
        let last_affected_id = unsafe { sqlite3_last_insert_rowid(*self.connection) };
        Ok(QueryResult::Affected(RowsAffected {
            rows_affected: rows_affected.max(0) as u64,
            last_affected_id: (rows_affected > 0 && last_affected_id > 0)
                .then_some(last_affected_id),
        }))
    }

    fn describe_schema(&mut self, source: &str) -> Result<Schema> {
        let writer = self.driver().sql_writer();
        let table = writer
            .quote_value(&Value::Varchar(Some(source.into())))
            .map_err(Error::msg)?;
        let sql = format!(
            r#"SELECT "name", "type", "notnull", "pk" FROM pragma_table_info({}) ORDER BY "cid";"#,
            table
        );
        let mut schema = Schema::new(source);
        let mut cursor = self.fetch(&sql)?;
        for row in &mut cursor {
            let pk = i64::try_from_value(column(&row, 3))?;
            schema.fields.push(FieldInfo {
                name: String::try_from_value(column(&row, 0))?,
                data_type: Option::<String>::try_from_value(column(&row, 1))?.unwrap_or_default(),
                nullable: !bool::try_from_value(column(&row, 2))?,
                key: if pk > 0 {
                    KeyRole::Primary
                } else {
                    KeyRole::None
                },
            });
        }
        if let Some(e) = cursor.take_error() {
            return Err(e);
        }
        if schema.is_empty() {
            let error = Error::execution(format!("no such table: {}", source), None, &sql);
            return Err(self.record(error, &sql));
        }
        let sql = format!(
            r#"SELECT il."unique", ii."name" FROM pragma_index_list({0}) AS il JOIN pragma_index_info(il."name") AS ii;"#,
            table
        );
        let mut cursor = self.fetch(&sql)?;
        for row in &mut cursor {
            let unique = bool::try_from_value(column(&row, 0))?;
            let Some(name) = Option::<String>::try_from_value(column(&row, 1))? else {
                continue;
            };
            if let Some(field) = schema.fields.iter_mut().find(|v| v.name == name) {
                field.key = match (field.key, unique) {
                    (KeyRole::Primary, _) => KeyRole::Primary,
                    (_, true) | (KeyRole::Unique, _) => KeyRole::Unique,
                    _ => KeyRole::Index,
                };
            }
        }
        if let Some(e) = cursor.take_error() {
            return Err(e);
        }
        Ok(schema)
    }

    fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }
}
