use crate::{CBox, DuckdbDriver, DuckdbHandle, error_message_from_ptr};
use libduckdb_sys::*;
use quarry_core::{
    AsValue, Connection, ConnectionUrl, Driver, Error, ErrorContext, ErrorInfo, FieldInfo,
    KeyRole, QueryResult, Result, Row, RowsAffected, Schema, SqlWriter, Value, truncate_long,
};
use std::{
    ffi::{CString, c_char, c_void},
    mem, ptr,
};

pub struct DuckdbConnection {
    // Dropped in declaration order, the connection goes first
    pub(crate) connection: CBox<duckdb_connection>,
    _database: CBox<duckdb_database>,
    last_error: Option<ErrorInfo>,
}

impl DuckdbConnection {
    fn record(&mut self, error: Error, sql: &str) -> Error {
        let error = match error {
            Error::Execution { message, code, .. } => Error::execution(message, code, sql),
            other => other,
        };
        log::error!("{:#}\n{}", error, truncate_long!(sql));
        self.last_error = Some((&error).into());
        error
    }

    fn open(url: &ConnectionUrl) -> Result<CBox<duckdb_database>> {
        let mut config: CBox<duckdb_config> = CBox::new(ptr::null_mut(), |mut p| unsafe {
            duckdb_destroy_config(&mut p);
        });
        if unsafe { duckdb_create_config(&mut *config) } != duckdb_state_DuckDBSuccess {
            return Err(Error::connection("Could not create the DuckDB configuration"));
        }
        for (name, value) in &url.params {
            let (name, value) = match (name.as_str(), value.as_str()) {
                ("mode", "ro") => ("access_mode", "READ_ONLY"),
                ("mode", "rw") => ("access_mode", "READ_WRITE"),
                ("mode", other) => {
                    return Err(Error::connection(format!(
                        "Unknown DuckDB mode `{}`, expected `ro` or `rw`",
                        other
                    )));
                }
                (name, value) => (name, value),
            };
            let c_name = CString::new(name)
                .with_context(|| format!("While setting the option `{}`", name))
                .map_err(Error::Connection)?;
            let c_value = CString::new(value)
                .with_context(|| format!("While setting the option `{}`", name))
                .map_err(Error::Connection)?;
            if unsafe { duckdb_set_config(*config, c_name.as_ptr(), c_value.as_ptr()) }
                != duckdb_state_DuckDBSuccess
            {
                return Err(Error::connection(format!(
                    "Could not set the option `{}` to `{}`",
                    name, value
                )));
            }
        }
        let path = if url.is_memory() {
            None
        } else {
            Some(
                CString::new(url.location.as_str())
                    .with_context(|| format!("While opening `{}`", url.location))
                    .map_err(Error::Connection)?,
            )
        };
        let mut database: CBox<duckdb_database> = CBox::new(ptr::null_mut(), |mut p| unsafe {
            duckdb_close(&mut p);
        });
        let mut message: *mut c_char = ptr::null_mut();
        let rc = unsafe {
            duckdb_open_ext(
                path.as_ref().map_or(ptr::null(), |v| v.as_ptr()),
                &mut *database,
                *config,
                &mut message,
            )
        };
        if rc != duckdb_state_DuckDBSuccess {
            let reason = error_message_from_ptr(message);
            if !message.is_null() {
                unsafe { duckdb_free(message as *mut c_void) };
            }
            return Err(Error::connection(format!(
                "Could not open the database `{}`: {}",
                url.location_or_memory(),
                reason
            )));
        }
        Ok(database)
    }
}

fn column(row: &Row, index: usize) -> Value {
    row.get(index).cloned().unwrap_or_default()
}

impl Connection for DuckdbConnection {
    type Driver = DuckdbDriver;
    type Handle = DuckdbHandle;

    fn connect(url: &str) -> Result<Self> {
        let url = ConnectionUrl::parse(DuckdbDriver::NAME, url)?;
        let database = Self::open(&url).inspect_err(|e| log::error!("{:#}", e))?;
        let mut connection: CBox<duckdb_connection> = CBox::new(ptr::null_mut(), |mut p| unsafe {
            duckdb_disconnect(&mut p);
        });
        if unsafe { duckdb_connect(*database, &mut *connection) } != duckdb_state_DuckDBSuccess {
            let error = Error::connection(format!(
                "Could not connect to the database `{}`",
                url.location_or_memory()
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(Self {
            connection,
            _database: database,
            last_error: None,
        })
    }

    fn driver(&self) -> &DuckdbDriver {
        &DuckdbDriver {}
    }

    fn execute(&mut self, sql: &str) -> Result<QueryResult<DuckdbHandle>> {
        if sql.trim().is_empty() {
            return Ok(QueryResult::Affected(Default::default()));
        }
        let query = CString::new(sql)
            .with_context(|| format!("While preparing the query:\n{}", truncate_long!(sql)))?;
        let mut result: duckdb_result = unsafe { mem::zeroed() };
        let rc = unsafe { duckdb_query(*self.connection, query.as_ptr(), &mut result) };
        let mut result = CBox::new(result, |mut r| unsafe { duckdb_destroy_result(&mut r) });
        if rc != duckdb_state_DuckDBSuccess {
            let message = error_message_from_ptr(unsafe { duckdb_result_error(&mut *result) });
            let error = Error::execution(message, None, sql);
            return Err(self.record(error, sql));
        }
        let statement_type = unsafe { duckdb_result_statement_type(*result) };
        match statement_type {
            duckdb_statement_type_DUCKDB_STATEMENT_TYPE_INSERT
            | duckdb_statement_type_DUCKDB_STATEMENT_TYPE_UPDATE
            | duckdb_statement_type_DUCKDB_STATEMENT_TYPE_DELETE => {
                let rows_affected = unsafe { duckdb_rows_changed(&mut *result) };
                Ok(QueryResult::Affected(RowsAffected {
                    rows_affected,
                    last_affected_id: None,
                }))
            }
            duckdb_statement_type_DUCKDB_STATEMENT_TYPE_SELECT
            | duckdb_statement_type_DUCKDB_STATEMENT_TYPE_EXPLAIN
            | duckdb_statement_type_DUCKDB_STATEMENT_TYPE_PRAGMA
            | duckdb_statement_type_DUCKDB_STATEMENT_TYPE_CALL
            | duckdb_statement_type_DUCKDB_STATEMENT_TYPE_EXECUTE
            | duckdb_statement_type_DUCKDB_STATEMENT_TYPE_RELATION => DuckdbHandle::new(result)
                .map(QueryResult::Rows)
                .map_err(|e| self.record(e, sql)),
            _ => Ok(QueryResult::Affected(Default::default())),
        }
    }

    fn describe_schema(&mut self, source: &str) -> Result<Schema> {
        let writer = self.driver().sql_writer();
        let (schema_name, table_name) = match source.split_once('.') {
            Some((schema, table)) => (Some(schema), table),
            None => (None, source),
        };
        let mut filter = format!(
            "table_name = {}",
            writer
                .quote_value(&Value::Varchar(Some(table_name.into())))
                .map_err(Error::msg)?
        );
        if let Some(schema_name) = schema_name {
            filter.push_str(" AND schema_name = ");
            filter.push_str(
                &writer
                    .quote_value(&Value::Varchar(Some(schema_name.into())))
                    .map_err(Error::msg)?,
            );
        }
        let sql = format!(
            "SELECT column_name, data_type, is_nullable FROM duckdb_columns() WHERE {} ORDER BY column_index;",
            filter
        );
        let mut schema = Schema::new(source);
        let mut cursor = self.fetch(&sql)?;
        for row in &mut cursor {
            schema.fields.push(FieldInfo {
                name: String::try_from_value(column(&row, 0))?,
                data_type: Option::<String>::try_from_value(column(&row, 1))?.unwrap_or_default(),
                nullable: bool::try_from_value(column(&row, 2))?,
                key: KeyRole::None,
            });
        }
        if let Some(e) = cursor.take_error() {
            return Err(e);
        }
        if schema.is_empty() {
            let error = Error::execution(
                format!("Catalog Error: Table with name {} does not exist!", source),
                None,
                &sql,
            );
            return Err(self.record(error, &sql));
        }
        let sql = format!(
            "SELECT constraint_type, unnest(constraint_column_names) FROM duckdb_constraints() WHERE {} AND constraint_type IN ('PRIMARY KEY', 'UNIQUE');",
            filter
        );
        let mut cursor = self.fetch(&sql)?;
        for row in &mut cursor {
            let primary = String::try_from_value(column(&row, 0))? == "PRIMARY KEY";
            let name = String::try_from_value(column(&row, 1))?;
            if let Some(field) = schema.fields.iter_mut().find(|v| v.name == name) {
                field.key = match (field.key, primary) {
                    (_, true) | (KeyRole::Primary, _) => KeyRole::Primary,
                    _ => KeyRole::Unique,
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
