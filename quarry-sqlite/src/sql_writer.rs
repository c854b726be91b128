use quarry_core::{CompileError, GenericSqlWriter, SqlWriter};

/// SQLite dialect: booleans are integers, blobs use the `X'..'` literal.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqliteSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    fn write_value_float(&self, out: &mut String, value: f64) -> Result<(), CompileError> {
        if value.is_infinite() {
            if value.is_sign_negative() {
                out.push('-');
            }
            out.push_str("1.0e+10000");
            return Ok(());
        }
        GenericSqlWriter::new().write_value_float(out, value)
    }
}
