use libsqlite3_sys::*;
use quarry_core::{Error, ErrorContext, Result, Row, RowNames, Value};
use std::{
    ffi::{CStr, c_int},
    slice,
};

pub(crate) fn extract_value(statement: *mut sqlite3_stmt, index: c_int) -> Result<Value> {
    unsafe {
        let column_type = sqlite3_column_type(statement, index);
        Ok(match column_type {
            SQLITE_NULL => Value::Null,
            SQLITE_INTEGER => Value::Int64(Some(sqlite3_column_int64(statement, index))),
            SQLITE_FLOAT => Value::Float64(Some(sqlite3_column_double(statement, index))),
            SQLITE_BLOB => {
                let ptr = sqlite3_column_blob(statement, index) as *const u8;
                let len = sqlite3_column_bytes(statement, index) as usize;
                if ptr.is_null() {
                    Value::Blob(Some(Box::default()))
                } else {
                    Value::Blob(Some(slice::from_raw_parts(ptr, len).into()))
                }
            }
            SQLITE_TEXT => {
                let ptr = sqlite3_column_text(statement, index);
                let len = sqlite3_column_bytes(statement, index) as usize;
                let text = if ptr.is_null() {
                    ""
                } else {
                    std::str::from_utf8(slice::from_raw_parts(ptr, len))
                        .with_context(|| format!("While reading the text of column {}", index))?
                };
                Value::Varchar(Some(text.into()))
            }
            _ => {
                let error = Error::msg(format!("Unexpected column type {}", column_type));
                log::error!("{:#}", error);
                return Err(error);
            }
        })
    }
}

pub(crate) fn extract_name(statement: *mut sqlite3_stmt, index: c_int) -> Result<String> {
    unsafe {
        let name = sqlite3_column_name(statement, index);
        if name.is_null() {
            return Ok(format!("column{}", index));
        }
        Ok(CStr::from_ptr(name)
            .to_str()
            .with_context(|| format!("While reading the name of column {}", index))?
            .into())
    }
}

pub(crate) fn extract_labels(statement: *mut sqlite3_stmt) -> Result<RowNames> {
    let count = unsafe { sqlite3_column_count(statement) };
    (0..count).map(|i| extract_name(statement, i)).collect()
}

pub(crate) fn extract_row(statement: *mut sqlite3_stmt, count: usize) -> Result<Row> {
    (0..count as c_int)
        .map(|i| extract_value(statement, i))
        .collect()
}
