use quarry_core::{NativeHandle, Result, Row, RowNames, Traversal};
use std::collections::VecDeque;

/// Rows of a MySQL result set, handed out once each.
///
/// The protocol streams rows forward only and the connection cannot run anything else
/// until the stream is drained, so the rows are received when the statement executes and
/// released as they are fetched. Moving back relies on the rows the cursor keeps.
pub struct MysqlHandle {
    labels: RowNames,
    rows: VecDeque<Row>,
    empty: bool,
}

impl MysqlHandle {
    pub(crate) fn new(labels: RowNames, rows: VecDeque<Row>) -> Self {
        Self {
            labels,
            empty: rows.is_empty(),
            rows,
        }
    }

    /// Rows not fetched yet.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl NativeHandle for MysqlHandle {
    const TRAVERSAL: Traversal = Traversal::RowCache;

    fn labels(&self) -> &RowNames {
        &self.labels
    }

    fn is_empty(&self) -> bool {
        self.empty
    }

    fn fetch(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}
