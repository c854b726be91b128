use crate::{
    CBox, error_message_from_ptr,
    extract::{extract_labels, extract_row},
};
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_ROW, sqlite3_db_handle, sqlite3_errmsg,
    sqlite3_reset, sqlite3_step, sqlite3_stmt,
};
use quarry_core::{Error, NativeHandle, Result, Row, RowNames, Traversal};

/// Prepared statement that has started stepping through its result set.
///
/// SQLite statements only move forward, going back means resetting the statement and
/// stepping again from the first row.
pub struct SqliteHandle {
    statement: CBox<sqlite3_stmt>,
    labels: RowNames,
    /// Row already stepped on but not handed out yet.
    pending: Option<Row>,
    done: bool,
}

impl SqliteHandle {
    /// Take ownership of the statement and step to its first row.
    pub(crate) fn new(statement: CBox<sqlite3_stmt>) -> Result<Self> {
        let labels = extract_labels(*statement)?;
        let mut result = Self {
            statement,
            labels,
            pending: None,
            done: false,
        };
        result.pending = result.step()?;
        result.done = result.pending.is_none();
        Ok(result)
    }

    fn step(&mut self) -> Result<Option<Row>> {
        loop {
            match unsafe { sqlite3_step(*self.statement) } {
                SQLITE_BUSY => continue,
                SQLITE_ROW => return extract_row(*self.statement, self.labels.len()).map(Some),
                SQLITE_DONE => return Ok(None),
                rc => {
                    let message = unsafe {
                        error_message_from_ptr(sqlite3_errmsg(sqlite3_db_handle(*self.statement)))
                    };
                    return Err(Error::execution(message, Some(rc as i64), ""));
                }
            }
        }
    }
}

impl NativeHandle for SqliteHandle {
    const TRAVERSAL: Traversal = Traversal::ReplayOnly;

    fn labels(&self) -> &RowNames {
        &self.labels
    }

    fn is_empty(&self) -> bool {
        self.done && self.pending.is_none()
    }

    fn fetch(&mut self) -> Result<Option<Row>> {
        if let Some(row) = self.pending.take() {
            return Ok(Some(row));
        }
        if self.done {
            return Ok(None);
        }
        let row = self.step()?;
        self.done = row.is_none();
        Ok(row)
    }

    fn reset(&mut self) -> Result<()> {
        let rc = unsafe { sqlite3_reset(*self.statement) };
        if rc != SQLITE_OK {
            let message = unsafe {
                error_message_from_ptr(sqlite3_errmsg(sqlite3_db_handle(*self.statement)))
            };
            return Err(Error::execution(message, Some(rc as i64), ""));
        }
        self.pending = None;
        self.done = false;
        Ok(())
    }
}
