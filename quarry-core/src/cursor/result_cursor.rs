use crate::{Error, NativeHandle, Row, RowCache, RowNames, Traversal};

/// Bidirectional cursor over one native result handle.
///
/// The cursor starts before the first row (position `-1`). Moving forward goes through
/// [`Iterator::next`], moving backward through [`prev`](ResultCursor::prev) using the
/// strategy the handle type announces:
/// - [`Traversal::NativeSeek`]: seek the handle to `position - 1` and fetch. The handle
///   reads the row again, a concurrent writer can change what comes back.
/// - [`Traversal::RowCache`]: read `position - 1` from the rows already fetched, the
///   handle is not touched.
/// - [`Traversal::ReplayOnly`]: reset the handle and fetch forward up to `position - 1`.
///   Each step back costs `O(position)` fetches.
///
/// The handle is released as soon as it is exhausted, when a fetch fails, on
/// [`close`](ResultCursor::close) or when the cursor is dropped. A closed cursor never
/// reopens: every movement returns `None`.
pub struct ResultCursor<H: NativeHandle> {
    resource: Option<H>,
    labels: RowNames,
    position: isize,
    current: Option<Row>,
    cache: Option<RowCache>,
    closed: bool,
    error: Option<Error>,
}

impl<H: NativeHandle> ResultCursor<H> {
    pub fn new(resource: H) -> Self {
        let mut result = Self {
            labels: resource.labels().clone(),
            cache: (H::TRAVERSAL == Traversal::RowCache).then(RowCache::new),
            resource: Some(resource),
            position: -1,
            current: None,
            closed: false,
            error: None,
        };
        if result.resource.as_ref().is_some_and(|v| v.is_empty()) {
            log::trace!("Result set is empty, releasing the handle");
            result.close();
        }
        result
    }

    pub fn traversal(&self) -> Traversal {
        H::TRAVERSAL
    }

    pub fn labels(&self) -> &RowNames {
        &self.labels
    }

    /// Row the cursor is on.
    pub fn current(&self) -> Option<&Row> {
        self.current.as_ref()
    }

    /// Zero based index of the current row.
    pub fn key(&self) -> Option<usize> {
        self.current.as_ref().map(|_| self.position as usize)
    }

    /// Zero based index of the current row, `-1` before the first one.
    pub fn position(&self) -> isize {
        self.position
    }

    pub fn valid(&self) -> bool {
        !self.closed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The native handle, absent once the cursor is closed.
    pub fn resource(&self) -> Option<&H> {
        self.resource.as_ref()
    }

    pub fn cache(&self) -> Option<&RowCache> {
        self.cache.as_ref()
    }

    /// Error that closed the cursor, if a fetch failed.
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// Step back one row.
    ///
    /// Returns `None` without moving when the cursor is on the first row, before it or closed.
    pub fn prev(&mut self) -> Option<Row> {
        if self.closed || self.position < 1 {
            return None;
        }
        let target = (self.position - 1) as usize;
        let row = match H::TRAVERSAL {
            Traversal::RowCache => self.cache.as_ref().and_then(|v| v.get(target)).cloned(),
            Traversal::NativeSeek => self.seek_fetch(target),
            Traversal::ReplayOnly => self.replay(target),
        }?;
        self.position = target as isize;
        self.current = Some(row.clone());
        Some(row)
    }

    /// Move back before the first row, keeping the handle.
    pub fn rewind(&mut self) {
        if self.closed {
            return;
        }
        let result = match (H::TRAVERSAL, self.resource.as_mut()) {
            (Traversal::NativeSeek, Some(resource)) => resource.seek(0),
            (Traversal::ReplayOnly, Some(resource)) => resource.reset(),
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.fail(e);
            return;
        }
        self.position = -1;
        self.current = None;
    }

    /// Release the handle and the cached rows, can be called any number of times.
    pub fn close(&mut self) {
        if self.resource.take().is_some() {
            log::trace!("Result handle released at position {}", self.position);
        }
        self.cache = None;
        self.current = None;
        self.closed = true;
    }

    fn fetch(&mut self) -> Option<Row> {
        let resource = self.resource.as_mut()?;
        match resource.fetch() {
            Ok(Some(row)) => Some(row),
            Ok(None) => {
                self.close();
                None
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    fn seek_fetch(&mut self, target: usize) -> Option<Row> {
        let resource = self.resource.as_mut()?;
        if let Err(e) = resource.seek(target) {
            self.fail(e);
            return None;
        }
        self.fetch()
    }

    fn replay(&mut self, target: usize) -> Option<Row> {
        let resource = self.resource.as_mut()?;
        if let Err(e) = resource.reset() {
            self.fail(e);
            return None;
        }
        let mut remaining = target;
        while remaining > 0 {
            self.fetch()?;
            remaining -= 1;
        }
        self.fetch()
    }

    fn fail(&mut self, error: Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        self.close();
    }
}

impl<H: NativeHandle> Iterator for ResultCursor<H> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.closed {
            return None;
        }
        let target = self.position + 1;
        let cached = self
            .cache
            .as_ref()
            .filter(|v| target <= v.max_position())
            .and_then(|v| v.get(target as usize))
            .cloned();
        let row = match cached {
            Some(row) => row,
            None => {
                let row = self.fetch()?;
                if let Some(cache) = self.cache.as_mut() {
                    cache.insert(target as usize, row.clone());
                }
                row
            }
        };
        self.position = target;
        self.current = Some(row.clone());
        Some(row)
    }
}

impl<H: NativeHandle> Drop for ResultCursor<H> {
    fn drop(&mut self) {
        self.close();
    }
}
