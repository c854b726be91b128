use crate::Row;

/// Append-only buffer of the rows a cursor already fetched, indexed by fetch position.
#[derive(Default, Debug, Clone)]
pub struct RowCache {
    rows: Vec<Row>,
}

impl RowCache {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Store the row fetched at `position`.
    ///
    /// Only the position right after the high-water mark is stored, rows already cached
    /// are never replaced. Returns whether the row was stored.
    pub fn insert(&mut self, position: usize, row: Row) -> bool {
        if position != self.rows.len() {
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn get(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    /// Highest position stored so far, `-1` when empty.
    pub fn max_position(&self) -> isize {
        self.rows.len() as isize - 1
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RowCache;
    use crate::{Row, Value};

    fn row(id: i64) -> Row {
        [Value::Int64(Some(id))].into()
    }

    #[test]
    fn append_only() {
        let mut cache = RowCache::new();
        assert_eq!(cache.max_position(), -1);
        assert!(cache.insert(0, row(1)));
        assert!(cache.insert(1, row(2)));
        assert!(!cache.insert(0, row(3)));
        assert!(!cache.insert(5, row(4)));
        assert_eq!(cache.max_position(), 1);
        assert_eq!(cache.get(0), Some(&row(1)));
        assert_eq!(cache.get(2), None);
    }
}
