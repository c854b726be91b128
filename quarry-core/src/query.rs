use crate::Value;
use std::{
    borrow::Cow,
    fmt::{self, Display},
};

/// Which of the four commands a [`Query`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Create,
    Read,
    Update,
    Delete,
}

impl QueryKind {
    /// Whether the conditions of this kind are the row's own field/value pairs rather than a filter.
    pub fn conditions_are_data(&self) -> bool {
        matches!(self, QueryKind::Create | QueryKind::Update)
    }
}

impl Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryKind::Create => "create",
            QueryKind::Read => "read",
            QueryKind::Update => "update",
            QueryKind::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Like,
    NotLike,
}

/// Right hand side of one entry of a condition map.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Plain value: equality, `IS NULL` for nulls, membership for lists.
    Equal(Value),
    /// Operator expression.
    Compare(Operator, Value),
    In(Vec<Value>),
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        Condition::Equal(value)
    }
}

/// Ordered field to condition mapping.
///
/// Inserting a field that is already present replaces its condition in place.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Conditions(Vec<(String, Condition)>);

impl Conditions {
    pub fn new() -> Self {
        Self(Vec::new())
    }
    pub fn insert(&mut self, field: impl Into<String>, condition: Condition) {
        let field = field.into();
        match self.0.iter_mut().find(|(k, _)| *k == field) {
            Some((_, v)) => *v = condition,
            None => self.0.push((field, condition)),
        }
    }
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, Condition::Equal(value.into()));
        self
    }
    pub fn with_condition(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.insert(field, condition);
        self
    }
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.0
            .iter()
            .find_map(|(k, v)| if k == field { Some(v) } else { None })
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = Conditions::new();
        for (k, v) in iter {
            result.insert(k, Condition::Equal(v.into()));
        }
        result
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered {
    pub field: String,
    pub direction: Direction,
}

impl Ordered {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum Order {
    #[default]
    None,
    Field(String),
    List(Vec<Ordered>),
}

impl Order {
    pub fn is_none(&self) -> bool {
        matches!(self, Order::None)
    }
}

impl From<&str> for Order {
    fn from(value: &str) -> Self {
        Order::Field(value.into())
    }
}

impl From<String> for Order {
    fn from(value: String) -> Self {
        Order::Field(value)
    }
}

impl From<Vec<Ordered>> for Order {
    fn from(value: Vec<Ordered>) -> Self {
        Order::List(value)
    }
}

/// Dialect independent description of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: QueryKind,
    pub source: String,
    /// Filter for reads and deletes, field/value pairs for creates and updates.
    pub conditions: Conditions,
    /// Rows an update applies to.
    pub filter: Conditions,
    pub fields: Vec<String>,
    pub defaults: Vec<String>,
    pub order: Order,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    pub fn new(kind: QueryKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            conditions: Default::default(),
            filter: Default::default(),
            fields: Default::default(),
            defaults: Default::default(),
            order: Default::default(),
            limit: None,
            offset: None,
        }
    }
    pub fn create(source: impl Into<String>) -> Self {
        Self::new(QueryKind::Create, source)
    }
    pub fn read(source: impl Into<String>) -> Self {
        Self::new(QueryKind::Read, source)
    }
    pub fn update(source: impl Into<String>) -> Self {
        Self::new(QueryKind::Update, source)
    }
    pub fn delete(source: impl Into<String>) -> Self {
        Self::new(QueryKind::Delete, source)
    }

    pub fn condition(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field, Condition::Equal(value.into()));
        self
    }
    pub fn compare(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions
            .insert(field, Condition::Compare(operator, value.into()));
        self
    }
    pub fn one_of<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.conditions.insert(
            field,
            Condition::In(values.into_iter().map(Into::into).collect()),
        );
        self
    }
    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field, Condition::Equal(value.into()));
        self
    }
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
    pub fn defaults<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = fields.into_iter().map(Into::into).collect();
        self
    }
    pub fn order(mut self, order: impl Into<Order>) -> Self {
        self.order = order.into();
        self
    }
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Field list used when the query does not name its fields.
    pub fn default_fields(&self) -> Cow<'_, [String]> {
        if self.defaults.is_empty() {
            Cow::Owned(vec!["*".to_string()])
        } else {
            Cow::Borrowed(&self.defaults)
        }
    }
}
