use quarry_core::SqlWriter;

/// MySQL dialect: backtick identifiers, backslash escapes in strings, `LIMIT offset, count`.
#[derive(Default, Debug, Clone, Copy)]
pub struct MysqlSqlWriter {}

impl MysqlSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for MysqlSqlWriter {
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.reserve(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                '\0' => out.push_str("\\0"),
                c => out.push(c),
            }
        }
        out.push('\'');
    }

    fn write_limit(&self, out: &mut String, limit: u64, offset: Option<u64>) {
        let mut buffer = itoa::Buffer::new();
        out.push_str("LIMIT ");
        if let Some(offset) = offset {
            out.push_str(buffer.format(offset));
            out.push_str(", ");
        }
        out.push_str(buffer.format(limit));
    }

    fn write_insert_default_values(&self, out: &mut String) {
        out.push_str(" () VALUES ()");
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("START TRANSACTION;");
    }
}
