use crate::{NativeHandle, Query, QueryKind, Result, ResultCursor};

/// Name of the operation an interceptor wraps.
pub type Operation = QueryKind;

/// Continuation handed to an interceptor, runs the rest of the chain.
pub type Next<'a, T> = &'a mut dyn FnMut(&Query) -> Result<T>;

/// Around-call hook wrapped around every command of a [`Database`](crate::Database).
///
/// An interceptor can inspect or replace the query before calling `next`, inspect the
/// result after it, or veto the operation by returning without calling `next`.
pub trait Interceptor<T> {
    fn intercept(&self, operation: Operation, query: &Query, next: Next<'_, T>) -> Result<T>;
}

impl<T, F> Interceptor<T> for F
where
    F: Fn(Operation, &Query, Next<'_, T>) -> Result<T>,
{
    fn intercept(&self, operation: Operation, query: &Query, next: Next<'_, T>) -> Result<T> {
        self(operation, query, next)
    }
}

/// What an operation produced.
pub enum Outcome<H: NativeHandle> {
    /// Rows of a read.
    Cursor(ResultCursor<H>),
    /// Whether a command ran, `false` when it was skipped.
    Success(bool),
}

/// Ordered list of interceptors, the first one added is the outermost.
pub struct Chain<T> {
    interceptors: Vec<Box<dyn Interceptor<T>>>,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, interceptor: Box<dyn Interceptor<T>>) {
        self.interceptors.push(interceptor);
    }

    pub fn push_fn<F>(&mut self, interceptor: F)
    where
        F: Fn(Operation, &Query, Next<'_, T>) -> Result<T> + 'static,
    {
        self.interceptors.push(Box::new(interceptor));
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run `last` wrapped by every interceptor of the chain.
    pub fn run(
        &self,
        operation: Operation,
        query: &Query,
        last: &mut dyn FnMut(&Query) -> Result<T>,
    ) -> Result<T> {
        self.run_from(0, operation, query, last)
    }

    fn run_from(
        &self,
        index: usize,
        operation: Operation,
        query: &Query,
        last: &mut dyn FnMut(&Query) -> Result<T>,
    ) -> Result<T> {
        match self.interceptors.get(index) {
            Some(interceptor) => interceptor.intercept(operation, query, &mut |query: &Query| {
                self.run_from(index + 1, operation, query, last)
            }),
            None => last(query),
        }
    }
}
