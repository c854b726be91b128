use crate::{
    CompileError, CompiledClause, CompiledQuery, Condition, Conditions, Direction, Operator,
    Order, Query, QueryKind, Value, separated_by,
};
use std::fmt::Write;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Log the reason a clause could not be compiled and fall back to the neutral fragment.
fn degrade(result: Result<CompiledClause, CompileError>) -> CompiledClause {
    result.unwrap_or_else(|e| {
        log::warn!("{:#}, the clause will be ignored", e);
        CompiledClause::Neutral
    })
}

fn render<F>(f: F) -> Result<CompiledClause, CompileError>
where
    F: FnOnce(&mut String) -> Result<(), CompileError>,
{
    let mut out = String::with_capacity(64);
    f(&mut out)?;
    Ok(if out.is_empty() {
        CompiledClause::Neutral
    } else {
        CompiledClause::Sql(out)
    })
}

/// Dialect printer turning the abstract [`Query`] into SQL.
///
/// Every method has a default implementation close to standard SQL, a dialect overrides
/// only what differs (quoting, literal syntax, limit syntax). Identifiers always go
/// through [`write_identifier_quoted`](SqlWriter::write_identifier_quoted) and literals
/// through [`write_value`](SqlWriter::write_value).
///
/// The clause methods ([`conditions`](SqlWriter::conditions),
/// [`fields`](SqlWriter::fields), [`order`](SqlWriter::order),
/// [`limit`](SqlWriter::limit)) never fail: a value the dialect cannot render turns the
/// whole clause into [`CompiledClause::Neutral`] and a warning is logged. Dropping a
/// filter this way favours a partially correct command over an error.
pub trait SqlWriter {
    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', "\"\"");
        out.push('"');
    }

    /// Render a possibly qualified field (`table.column`), `*` is left unquoted.
    fn write_field(&self, out: &mut String, value: &str) -> Result<(), CompileError> {
        if value == "*" {
            out.push('*');
            return Ok(());
        }
        if value.is_empty() || value.split('.').any(str::is_empty) {
            return Err(CompileError::new(
                "fields",
                format!("`{}` is not a valid field name", value),
            ));
        }
        separated_by(
            out,
            value.split('.'),
            |out, v| {
                if v == "*" {
                    out.push('*');
                } else {
                    self.write_identifier_quoted(out, v);
                }
            },
            ".",
        );
        Ok(())
    }

    /// Render the table the command operates on.
    fn write_source(&self, out: &mut String, value: &str) -> Result<(), CompileError> {
        if value.is_empty() || value.split('.').any(str::is_empty) {
            return Err(CompileError::new(
                "source",
                format!("`{}` is not a valid table name", value),
            ));
        }
        separated_by(
            out,
            value.split('.'),
            |out, v| self.write_identifier_quoted(out, v),
            ".",
        );
        Ok(())
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, out: &mut String, value: &Value) -> Result<(), CompileError> {
        match value {
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float64(Some(v)) => self.write_value_float(out, *v)?,
            Value::Decimal(Some(v)) => {
                let _ = write!(out, "{}", v);
            }
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v),
            Value::Date(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, v);
                out.push('\'');
            }
            Value::Time(Some(v)) => {
                out.push('\'');
                self.write_value_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(Some(v)) => self.write_value_timestamp(out, v),
            Value::Uuid(Some(v)) => self.write_value_uuid(out, v),
            Value::List(Some(..)) => {
                return Err(CompileError::new(
                    "value",
                    "a list can only be used as the right side of a membership condition",
                ));
            }
            _ => self.write_value_none(out),
        };
        Ok(())
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_float(&self, out: &mut String, value: f64) -> Result<(), CompileError> {
        if !value.is_finite() {
            return Err(CompileError::new(
                "value",
                format!("{} has no literal representation", value),
            ));
        }
        let mut buffer = ryu::Buffer::new();
        out.push_str(buffer.format_finite(value));
        Ok(())
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        let mut subsecond = value.nanosecond();
        let mut width = 9;
        while width > 1 && subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}.{:0width$}",
            value.hour(),
            value.minute(),
            value.second(),
            subsecond
        );
    }

    fn write_value_timestamp(&self, out: &mut String, value: &PrimitiveDateTime) {
        out.push('\'');
        self.write_value_date(out, &value.date());
        out.push(' ');
        self.write_value_time(out, &value.time());
        out.push('\'');
    }

    fn write_value_uuid(&self, out: &mut String, value: &Uuid) {
        let _ = write!(out, "'{}'", value);
    }

    fn write_operator(&self, out: &mut String, value: Operator) {
        out.push_str(match value {
            Operator::Equal => " = ",
            Operator::NotEqual => " != ",
            Operator::Less => " < ",
            Operator::LessEqual => " <= ",
            Operator::Greater => " > ",
            Operator::GreaterEqual => " >= ",
            Operator::Like => " LIKE ",
            Operator::NotLike => " NOT LIKE ",
        });
    }

    fn write_membership(
        &self,
        out: &mut String,
        field: &str,
        values: &[Value],
    ) -> Result<(), CompileError> {
        if values.is_empty() {
            return Err(CompileError::new(
                "conditions",
                format!("the list of values for `{}` is empty", field),
            ));
        }
        self.write_field(out, field)?;
        out.push_str(" IN (");
        let mut result = Ok(());
        separated_by(
            out,
            values,
            |out, v| {
                if result.is_ok() {
                    result = self.write_value(out, v);
                }
            },
            ", ",
        );
        out.push(')');
        result
    }

    /// Render one `field <op> value` predicate.
    fn write_condition(
        &self,
        out: &mut String,
        field: &str,
        condition: &Condition,
    ) -> Result<(), CompileError> {
        match condition {
            Condition::Equal(Value::List(Some(values))) | Condition::In(values) => {
                self.write_membership(out, field, values)
            }
            Condition::Equal(value) | Condition::Compare(Operator::Equal, value)
                if value.is_null() =>
            {
                self.write_field(out, field)?;
                out.push_str(" IS NULL");
                Ok(())
            }
            Condition::Compare(Operator::NotEqual, value) if value.is_null() => {
                self.write_field(out, field)?;
                out.push_str(" IS NOT NULL");
                Ok(())
            }
            Condition::Compare(op, value) if value.is_null() => Err(CompileError::new(
                "conditions",
                format!("cannot compare `{}` with NULL using {:?}", field, op),
            )),
            Condition::Equal(value) => {
                self.write_field(out, field)?;
                self.write_operator(out, Operator::Equal);
                self.write_value(out, value)
            }
            Condition::Compare(op, value) => {
                self.write_field(out, field)?;
                self.write_operator(out, *op);
                self.write_value(out, value)
            }
        }
    }

    /// Compile a condition map.
    ///
    /// Reads and deletes turn the map into a filter, an empty map is neutral. Creates and
    /// updates get their map back untouched: those entries are the row itself and must
    /// survive even when the value is `0`, `''` or `false`.
    fn conditions(&self, conditions: &Conditions, kind: QueryKind) -> CompiledClause {
        if kind.conditions_are_data() {
            return CompiledClause::Pairs(conditions.clone());
        }
        if conditions.is_empty() {
            return CompiledClause::Neutral;
        }
        degrade(render(|out| {
            let mut result = Ok(());
            separated_by(
                out,
                conditions.iter(),
                |out, (field, condition)| {
                    if result.is_ok() {
                        result = self.write_condition(out, field, condition);
                    }
                },
                " AND ",
            );
            result
        }))
    }

    /// Compile the projection, an empty list asks the query for its default fields.
    fn fields(&self, fields: &[String], query: &Query) -> CompiledClause {
        let defaults;
        let fields = if fields.is_empty() {
            defaults = query.default_fields();
            defaults.as_ref()
        } else {
            fields
        };
        degrade(render(|out| {
            let mut result = Ok(());
            separated_by(
                out,
                fields,
                |out, field| {
                    if result.is_ok() {
                        result = self.write_field(out, field);
                    }
                },
                ", ",
            );
            result
        }))
    }

    fn order(&self, order: &Order, _query: &Query) -> CompiledClause {
        match order {
            Order::None => CompiledClause::Neutral,
            Order::Field(field) => degrade(render(|out| self.write_field(out, field))),
            Order::List(list) if list.is_empty() => CompiledClause::Neutral,
            Order::List(list) => degrade(render(|out| {
                let mut result = Ok(());
                separated_by(
                    out,
                    list,
                    |out, v| {
                        if result.is_ok() {
                            result = self.write_field(out, &v.field);
                            out.push_str(match v.direction {
                                Direction::Asc => " ASC",
                                Direction::Desc => " DESC",
                            });
                        }
                    },
                    ", ",
                );
                result.map_err(|e| CompileError::new("order", e.reason))
            })),
        }
    }

    fn limit(&self, limit: Option<u64>, query: &Query) -> CompiledClause {
        match limit {
            None | Some(0) => CompiledClause::Neutral,
            Some(limit) => {
                let mut out = String::with_capacity(32);
                self.write_limit(&mut out, limit, query.offset.filter(|v| *v > 0));
                CompiledClause::Sql(out)
            }
        }
    }

    /// Write the limit clause body (without the `LIMIT` keyword's leading newline).
    fn write_limit(&self, out: &mut String, limit: u64, offset: Option<u64>) {
        out.push_str("LIMIT ");
        write_integer!(out, limit);
        if let Some(offset) = offset {
            out.push_str(" OFFSET ");
            write_integer!(out, offset);
        }
    }

    /// Compile every clause of the query.
    fn compile(&self, query: &Query) -> CompiledQuery {
        CompiledQuery {
            fields: self.fields(&query.fields, query),
            conditions: self.conditions(&query.conditions, query.kind),
            filter: if query.kind == QueryKind::Update {
                self.conditions(&query.filter, QueryKind::Read)
            } else {
                CompiledClause::Neutral
            },
            order: self.order(&query.order, query),
            limit: self.limit(query.limit, query),
        }
    }

    /// Assemble the compiled clauses into one statement.
    fn write_command(
        &self,
        out: &mut String,
        query: &Query,
        compiled: &CompiledQuery,
    ) -> Result<(), CompileError> {
        if !out.is_empty() {
            out.push('\n');
        }
        match query.kind {
            QueryKind::Read => self.write_select(out, query, compiled),
            QueryKind::Create => self.write_insert(out, query, compiled),
            QueryKind::Update => self.write_update(out, query, compiled),
            QueryKind::Delete => self.write_delete(out, query, compiled),
        }
    }

    /// Emit SELECT statement (projection, FROM, WHERE, ORDER, LIMIT), empty clauses omitted.
    fn write_select(
        &self,
        out: &mut String,
        query: &Query,
        compiled: &CompiledQuery,
    ) -> Result<(), CompileError> {
        out.push_str("SELECT ");
        out.push_str(compiled.fields.as_sql().unwrap_or("*"));
        out.push_str("\nFROM ");
        self.write_source(out, &query.source)?;
        if let Some(conditions) = compiled.conditions.as_sql() {
            out.push_str("\nWHERE ");
            out.push_str(conditions);
        }
        if let Some(order) = compiled.order.as_sql() {
            out.push_str("\nORDER BY ");
            out.push_str(order);
        }
        if let Some(limit) = compiled.limit.as_sql() {
            out.push('\n');
            out.push_str(limit);
        }
        out.push(';');
        Ok(())
    }

    /// Emit a single row INSERT from the pass-through pairs.
    fn write_insert(
        &self,
        out: &mut String,
        query: &Query,
        compiled: &CompiledQuery,
    ) -> Result<(), CompileError> {
        let pairs = assignments(&compiled.conditions);
        out.push_str("INSERT INTO ");
        self.write_source(out, &query.source)?;
        if pairs.is_empty() {
            self.write_insert_default_values(out);
            out.push(';');
            return Ok(());
        }
        out.push_str(" (");
        separated_by(
            out,
            pairs.iter(),
            |out, (field, _)| self.write_identifier_quoted(out, field),
            ", ",
        );
        out.push_str(") VALUES\n(");
        let mut result = Ok(());
        separated_by(
            out,
            pairs.iter(),
            |out, (_, value)| {
                if result.is_ok() {
                    result = self.write_value(out, value);
                }
            },
            ", ",
        );
        out.push_str(");");
        result
    }

    /// Tail of an INSERT that provides no column.
    fn write_insert_default_values(&self, out: &mut String) {
        out.push_str(" DEFAULT VALUES");
    }

    /// Emit UPDATE statement, the filter becomes the WHERE clause.
    ///
    /// A filter that compiled to [`CompiledClause::Neutral`] (empty, or degraded because a
    /// value has no literal form) writes no WHERE clause: the update targets every row.
    fn write_update(
        &self,
        out: &mut String,
        query: &Query,
        compiled: &CompiledQuery,
    ) -> Result<(), CompileError> {
        let pairs = assignments(&compiled.conditions);
        if pairs.is_empty() {
            return Err(CompileError::new(
                "conditions",
                format!("the update of `{}` does not set any field", query.source),
            ));
        }
        out.push_str("UPDATE ");
        self.write_source(out, &query.source)?;
        out.push_str(" SET ");
        let mut result = Ok(());
        separated_by(
            out,
            pairs.iter(),
            |out, (field, value)| {
                if result.is_ok() {
                    self.write_identifier_quoted(out, field);
                    out.push_str(" = ");
                    result = self.write_value(out, value);
                }
            },
            ", ",
        );
        result?;
        if let Some(filter) = compiled.filter.as_sql() {
            out.push_str("\nWHERE ");
            out.push_str(filter);
        }
        out.push(';');
        Ok(())
    }

    /// Emit DELETE statement with WHERE clause.
    ///
    /// Conditions that compiled to [`CompiledClause::Neutral`] write no WHERE clause, the
    /// statement then deletes every row of the source.
    fn write_delete(
        &self,
        out: &mut String,
        query: &Query,
        compiled: &CompiledQuery,
    ) -> Result<(), CompileError> {
        out.push_str("DELETE FROM ");
        self.write_source(out, &query.source)?;
        if let Some(conditions) = compiled.conditions.as_sql() {
            out.push_str("\nWHERE ");
            out.push_str(conditions);
        }
        out.push(';');
        Ok(())
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN;");
    }

    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT;");
    }

    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK;");
    }

    fn quote_identifier(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        self.write_identifier_quoted(&mut out, value);
        out
    }

    fn quote_value(&self, value: &Value) -> Result<String, CompileError> {
        let mut out = String::with_capacity(16);
        self.write_value(&mut out, value)?;
        Ok(out)
    }
}

/// The `field = value` pairs a create or update writes, other condition shapes are skipped.
fn assignments(clause: &CompiledClause) -> Vec<(&str, &Value)> {
    let CompiledClause::Pairs(pairs) = clause else {
        return Vec::new();
    };
    pairs
        .iter()
        .filter_map(|(field, condition)| match condition {
            Condition::Equal(value) => Some((field, value)),
            other => {
                log::warn!(
                    "Field `{}` cannot be written with {:?}, it will be ignored",
                    field,
                    other
                );
                None
            }
        })
        .collect()
}

/// Fallback generic SQL writer (closest to PostgreSQL / DuckDB conventions).
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {}
