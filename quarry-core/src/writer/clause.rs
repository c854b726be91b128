use crate::Conditions;

/// Output of compiling one clause for a specific dialect.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum CompiledClause {
    /// The clause contributes nothing to the command.
    #[default]
    Neutral,
    /// Rendered SQL text, without the clause keyword.
    Sql(String),
    /// Field/value pairs of a create or update, passed through untouched.
    Pairs(Conditions),
}

impl CompiledClause {
    pub fn is_neutral(&self) -> bool {
        match self {
            CompiledClause::Neutral => true,
            CompiledClause::Sql(v) => v.is_empty(),
            CompiledClause::Pairs(..) => false,
        }
    }
    pub fn as_sql(&self) -> Option<&str> {
        match self {
            CompiledClause::Sql(v) if !v.is_empty() => Some(v),
            _ => None,
        }
    }
}

/// Every clause of a query, compiled for one dialect.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub fields: CompiledClause,
    pub conditions: CompiledClause,
    pub filter: CompiledClause,
    pub order: CompiledClause,
    pub limit: CompiledClause,
}
