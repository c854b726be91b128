/// Role a column plays in the keys of its table.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    #[default]
    None,
    Primary,
    Unique,
    Index,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    /// Type as spelled by the backend (`INTEGER`, `VARCHAR`, `varchar(255)`).
    pub data_type: String,
    pub nullable: bool,
    pub key: KeyRole,
}

/// Dialect agnostic description of a table, columns in declaration order.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub source: String,
    pub fields: Vec<FieldInfo>,
}

impl Schema {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fields: Vec::new(),
        }
    }
    pub fn get(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|v| v.name == name)
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|v| v.name.as_str())
    }
    pub fn primary_key(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|v| v.key == KeyRole::Primary)
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
