use mysql_async::{
    Column,
    consts::{ColumnFlags, ColumnType},
    from_value_opt,
    prelude::FromValue,
};
use quarry_core::{ErrorContext, Result, Row, RowNames, Value};
use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime, Time};

/// Character set id MySQL uses for binary strings.
const BINARY_CHARSET: u16 = 63;

pub(crate) fn extract_labels(columns: &[Column]) -> RowNames {
    columns.iter().map(|v| v.name_str().into_owned()).collect()
}

fn decode<T: FromValue>(value: mysql_async::Value, column: &Column) -> Result<T> {
    Ok(from_value_opt::<T>(value)
        .with_context(|| {
            format!(
                "While decoding the column `{}` of type {:?}",
                column.name_str(),
                column.column_type()
            )
        })?)
}

/// Convert a value read through the text protocol, using the column to recover its type.
pub(crate) fn extract_value(value: mysql_async::Value, column: &Column) -> Result<Value> {
    if value == mysql_async::Value::NULL {
        return Ok(Value::Null);
    }
    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);
    let binary = column.character_set() == BINARY_CHARSET;
    Ok(match column.column_type() {
        // BOOLEAN is an alias of TINYINT(1)
        ColumnType::MYSQL_TYPE_TINY if column.column_length() == 1 => {
            Value::Boolean(Some(decode::<bool>(value, column)?))
        }
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            if unsigned {
                Value::UInt64(Some(decode::<u64>(value, column)?))
            } else {
                Value::Int64(Some(decode::<i64>(value, column)?))
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
            Value::Float64(Some(decode::<f64>(value, column)?))
        }
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            Value::Decimal(Some(decode::<Decimal>(value, column)?))
        }
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => {
            Value::Date(Some(decode::<Date>(value, column)?))
        }
        ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => {
            Value::Time(Some(decode::<Time>(value, column)?))
        }
        ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => {
            Value::Timestamp(Some(decode::<PrimitiveDateTime>(value, column)?))
        }
        ColumnType::MYSQL_TYPE_NULL => Value::Null,
        ColumnType::MYSQL_TYPE_BIT => Value::Blob(Some(decode::<Vec<u8>>(value, column)?.into())),
        _ if binary => Value::Blob(Some(decode::<Vec<u8>>(value, column)?.into())),
        _ => Value::Varchar(Some(decode::<String>(value, column)?)),
    })
}

pub(crate) fn extract_row(row: mysql_async::Row) -> Result<Row> {
    let columns = row.columns();
    row.unwrap()
        .into_iter()
        .zip(columns.iter())
        .map(|(value, column)| extract_value(value, column))
        .collect()
}
