use quarry_core::{CompileError, GenericSqlWriter, SqlWriter};
use std::fmt::Write;
use uuid::Uuid;

/// DuckDB dialect: blobs are escaped byte strings, non finite doubles are cast from text.
#[derive(Default, Debug, Clone, Copy)]
pub struct DuckdbSqlWriter {}

impl DuckdbSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for DuckdbSqlWriter {
    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push('\'');
        for b in value {
            let _ = write!(out, "\\x{:02X}", b);
        }
        out.push_str("'::BLOB");
    }

    fn write_value_float(&self, out: &mut String, value: f64) -> Result<(), CompileError> {
        if value.is_nan() {
            out.push_str("'nan'::DOUBLE");
        } else if value.is_infinite() {
            out.push_str(if value > 0.0 {
                "'inf'::DOUBLE"
            } else {
                "'-inf'::DOUBLE"
            });
        } else {
            GenericSqlWriter::new().write_value_float(out, value)?;
        }
        Ok(())
    }

    fn write_value_uuid(&self, out: &mut String, value: &Uuid) {
        let _ = write!(out, "'{}'::UUID", value);
    }
}
