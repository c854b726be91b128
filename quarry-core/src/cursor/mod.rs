mod result_cursor;
mod row_cache;

pub use result_cursor::*;
pub use row_cache::*;

/// How a cursor moves backward over a native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// The handle seeks to an absolute row.
    NativeSeek,
    /// Forward only handle, visited rows are kept in a [`RowCache`].
    RowCache,
    /// Forward only handle that can restart from the first row.
    ReplayOnly,
}
