use crate::{
    Chain, Connection, Driver, Interceptor, Next, Operation, Outcome, Query, QueryKind,
    QueryResult, Result, ResultCursor, Schema, SqlWriter, truncate_long,
};

type Handle<C> = <C as Connection>::Handle;

/// Facade running create/read/update/delete queries on one connection.
///
/// Each operation compiles the query with the driver's [`SqlWriter`], executes the command
/// and, for reads, wraps the native handle in a [`ResultCursor`]. The whole operation runs
/// inside the interceptor chain.
///
/// A query the dialect cannot render (an update without fields, a value without literal
/// form) is not executed: the operation reports `false` (or `None` for reads) and logs a
/// warning. Only connection and execution failures are returned as errors.
pub struct Database<C: Connection> {
    connection: C,
    writer: <C::Driver as Driver>::SqlWriter,
    chain: Chain<Outcome<Handle<C>>>,
}

impl<C: Connection> Database<C> {
    pub fn new(connection: C) -> Self {
        let writer = connection.driver().sql_writer();
        Self {
            connection,
            writer,
            chain: Chain::new(),
        }
    }

    pub fn connect(url: &str) -> Result<Self> {
        C::connect(url).map(Self::new)
    }

    pub fn intercept<F>(mut self, interceptor: F) -> Self
    where
        F: Fn(Operation, &Query, Next<'_, Outcome<Handle<C>>>) -> Result<Outcome<Handle<C>>>
            + 'static,
    {
        self.chain.push_fn(interceptor);
        self
    }

    pub fn push_interceptor(&mut self, interceptor: Box<dyn Interceptor<Outcome<Handle<C>>>>) {
        self.chain.push(interceptor);
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_inner(self) -> C {
        self.connection
    }

    pub fn sql_writer(&self) -> &<C::Driver as Driver>::SqlWriter {
        &self.writer
    }

    /// Insert the row described by the conditions of the query.
    pub fn create(&mut self, query: &Query) -> Result<bool> {
        self.command(QueryKind::Create, query)
    }

    /// Cursor over the rows matching the query, `None` when an interceptor or the
    /// dialect skipped the read.
    pub fn read(&mut self, query: &Query) -> Result<Option<ResultCursor<Handle<C>>>> {
        Ok(match self.perform(QueryKind::Read, query)? {
            Outcome::Cursor(cursor) => Some(cursor),
            Outcome::Success(..) => None,
        })
    }

    pub fn update(&mut self, query: &Query) -> Result<bool> {
        self.command(QueryKind::Update, query)
    }

    pub fn delete(&mut self, query: &Query) -> Result<bool> {
        self.command(QueryKind::Delete, query)
    }

    pub fn describe(&mut self, source: &str) -> Result<Schema> {
        self.connection.describe_schema(source)
    }

    pub fn begin(&mut self) -> Result<()> {
        self.connection.begin()
    }

    pub fn commit(&mut self) -> Result<()> {
        self.connection.commit()
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.connection.rollback()
    }

    fn command(&mut self, operation: Operation, query: &Query) -> Result<bool> {
        Ok(match self.perform(operation, query)? {
            Outcome::Cursor(..) => true,
            Outcome::Success(v) => v,
        })
    }

    fn perform(&mut self, operation: Operation, query: &Query) -> Result<Outcome<Handle<C>>> {
        let Self {
            connection,
            writer,
            chain,
        } = self;
        let retargeted;
        let query = if query.kind == operation {
            query
        } else {
            retargeted = Query {
                kind: operation,
                ..query.clone()
            };
            &retargeted
        };
        chain.run(operation, query, &mut |query: &Query| {
            let compiled = writer.compile(query);
            let mut sql = String::with_capacity(128);
            if let Err(e) = writer.write_command(&mut sql, query, &compiled) {
                log::warn!("{:#}, the {} on `{}` is skipped", e, query.kind, query.source);
                return Ok(Outcome::Success(false));
            }
            log::debug!("{}", truncate_long!(sql));
            Ok(match connection.execute(&sql)? {
                QueryResult::Rows(handle) if query.kind == QueryKind::Read => {
                    Outcome::Cursor(ResultCursor::new(handle))
                }
                QueryResult::Rows(..) => Outcome::Success(true),
                QueryResult::Affected(..) => Outcome::Success(query.kind != QueryKind::Read),
            })
        })
    }
}
