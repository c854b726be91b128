use crate::{Error, Result, Traversal, Value};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted / affected identifier when available.
    pub last_affected_id: Option<i64>,
}

/// What a connection returns after executing one statement.
#[derive(Debug)]
pub enum QueryResult<H> {
    /// The statement produced a result set, still owned by the native handle.
    Rows(H),
    /// The statement modified data and produced no rows.
    Affected(RowsAffected),
}

impl<H> QueryResult<H> {
    pub fn rows_affected(&self) -> Option<RowsAffected> {
        match self {
            QueryResult::Rows(..) => None,
            QueryResult::Affected(v) => Some(*v),
        }
    }
}

/// Native result set returned by a driver.
///
/// A handle reads forward with [`fetch`](NativeHandle::fetch); which backward movement it
/// supports is announced by [`TRAVERSAL`](NativeHandle::TRAVERSAL):
/// - [`Traversal::NativeSeek`] implements [`seek`](NativeHandle::seek) and
///   [`reset`](NativeHandle::reset).
/// - [`Traversal::ReplayOnly`] implements [`reset`](NativeHandle::reset).
/// - [`Traversal::RowCache`] implements neither, the cursor remembers the rows.
///
/// Dropping the handle releases the native resource.
pub trait NativeHandle {
    const TRAVERSAL: Traversal;

    /// Column labels of the result set.
    fn labels(&self) -> &RowNames;

    /// Whether the result set is known to hold no row at all.
    fn is_empty(&self) -> bool;

    /// Next row, `None` once the result set is exhausted.
    fn fetch(&mut self) -> Result<Option<Row>>;

    /// Position the handle so that the next [`fetch`](NativeHandle::fetch) returns the row at
    /// `position`.
    fn seek(&mut self, position: usize) -> Result<()> {
        let _ = position;
        Err(Error::msg(format!(
            "A {:?} result handle cannot seek",
            Self::TRAVERSAL
        )))
    }

    /// Rewind the handle to the first row.
    fn reset(&mut self) -> Result<()> {
        Err(Error::msg(format!(
            "A {:?} result handle cannot be reset",
            Self::TRAVERSAL
        )))
    }
}
