use libduckdb_sys::*;
use quarry_core::{Error, ErrorContext, Result, Value};
use rust_decimal::Decimal;
use std::{ffi::c_void, slice};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

fn unsupported(type_id: duckdb_type) -> Error {
    let error = Error::msg(format!(
        "Invalid type value: {}, must be one of the expected DUCKDB_TYPE_DUCKDB_TYPE_* variant",
        type_id
    ));
    log::error!("{:#}", error);
    error
}

pub(crate) fn convert_date(date: duckdb_date_struct) -> Result<Date> {
    let month = Month::try_from(date.month as u8)
        .context("Error while extracting the month of a date value")?;
    Ok(Date::from_calendar_date(date.year, month, date.day as u8)
        .context("Error while extracting a date value")?)
}

pub(crate) fn convert_time(time: duckdb_time_struct) -> Result<Time> {
    Ok(Time::from_hms_micro(
        time.hour as u8,
        time.min as u8,
        time.sec as u8,
        time.micros as u32,
    )
    .context("Error while extracting a time value")?)
}

fn convert_timestamp(nanos: i128) -> Result<PrimitiveDateTime> {
    let date_time = OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .context("Error while extracting a timestamp value")?;
    Ok(PrimitiveDateTime::new(date_time.date(), date_time.time()))
}

/// Read the value at `row` of a DuckDB vector.
///
/// # Safety
/// `vector` must belong to a live data chunk and `row` must be smaller than its size.
pub(crate) unsafe fn extract_value(vector: duckdb_vector, row: usize) -> Result<Value> {
    unsafe {
        let mut logical_type = duckdb_vector_get_column_type(vector);
        let result = extract_typed(vector, row, logical_type);
        duckdb_destroy_logical_type(&mut logical_type);
        result
    }
}

unsafe fn extract_typed(
    vector: duckdb_vector,
    row: usize,
    logical_type: duckdb_logical_type,
) -> Result<Value> {
    unsafe {
        let type_id = duckdb_get_type_id(logical_type);
        let data: *const c_void = duckdb_vector_get_data(vector);
        let validity = duckdb_vector_get_validity(vector);
        let is_valid = validity.is_null() || duckdb_validity_row_is_valid(validity, row as u64);
        macro_rules! read {
            ($type:ty) => {
                *(data as *const $type).add(row)
            };
        }
        if !is_valid {
            return Ok(match type_id {
                DUCKDB_TYPE_DUCKDB_TYPE_BOOLEAN => Value::Boolean(None),
                DUCKDB_TYPE_DUCKDB_TYPE_TINYINT
                | DUCKDB_TYPE_DUCKDB_TYPE_SMALLINT
                | DUCKDB_TYPE_DUCKDB_TYPE_INTEGER
                | DUCKDB_TYPE_DUCKDB_TYPE_BIGINT => Value::Int64(None),
                DUCKDB_TYPE_DUCKDB_TYPE_UTINYINT
                | DUCKDB_TYPE_DUCKDB_TYPE_USMALLINT
                | DUCKDB_TYPE_DUCKDB_TYPE_UINTEGER
                | DUCKDB_TYPE_DUCKDB_TYPE_UBIGINT => Value::UInt64(None),
                DUCKDB_TYPE_DUCKDB_TYPE_FLOAT | DUCKDB_TYPE_DUCKDB_TYPE_DOUBLE => {
                    Value::Float64(None)
                }
                DUCKDB_TYPE_DUCKDB_TYPE_HUGEINT
                | DUCKDB_TYPE_DUCKDB_TYPE_UHUGEINT
                | DUCKDB_TYPE_DUCKDB_TYPE_DECIMAL => Value::Decimal(None),
                DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR => Value::Varchar(None),
                DUCKDB_TYPE_DUCKDB_TYPE_BLOB => Value::Blob(None),
                DUCKDB_TYPE_DUCKDB_TYPE_DATE => Value::Date(None),
                DUCKDB_TYPE_DUCKDB_TYPE_TIME => Value::Time(None),
                DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP
                | DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP_S
                | DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP_MS
                | DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP_NS
                | DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP_TZ => Value::Timestamp(None),
                DUCKDB_TYPE_DUCKDB_TYPE_UUID => Value::Uuid(None),
                DUCKDB_TYPE_DUCKDB_TYPE_LIST => Value::List(None),
                _ => Value::Null,
            });
        }
        let result = match type_id {
            DUCKDB_TYPE_DUCKDB_TYPE_BOOLEAN => Value::Boolean(Some(read!(bool))),
            DUCKDB_TYPE_DUCKDB_TYPE_TINYINT => Value::Int64(Some(read!(i8) as i64)),
            DUCKDB_TYPE_DUCKDB_TYPE_SMALLINT => Value::Int64(Some(read!(i16) as i64)),
            DUCKDB_TYPE_DUCKDB_TYPE_INTEGER => Value::Int64(Some(read!(i32) as i64)),
            DUCKDB_TYPE_DUCKDB_TYPE_BIGINT => Value::Int64(Some(read!(i64))),
            DUCKDB_TYPE_DUCKDB_TYPE_UTINYINT => Value::UInt64(Some(read!(u8) as u64)),
            DUCKDB_TYPE_DUCKDB_TYPE_USMALLINT => Value::UInt64(Some(read!(u16) as u64)),
            DUCKDB_TYPE_DUCKDB_TYPE_UINTEGER => Value::UInt64(Some(read!(u32) as u64)),
            DUCKDB_TYPE_DUCKDB_TYPE_UBIGINT => Value::UInt64(Some(read!(u64))),
            DUCKDB_TYPE_DUCKDB_TYPE_HUGEINT => {
                let raw = read!(duckdb_hugeint);
                let value = (raw.upper as i128) << 64 | raw.lower as i128;
                Value::Decimal(Some(
                    Decimal::try_from_i128_with_scale(value, 0)
                        .context("HUGEINT value out of the decimal range")?,
                ))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_UHUGEINT => {
                let raw = read!(duckdb_uhugeint);
                let value = (raw.upper as u128) << 64 | raw.lower as u128;
                let value = i128::try_from(value).context("UHUGEINT value out of range")?;
                Value::Decimal(Some(
                    Decimal::try_from_i128_with_scale(value, 0)
                        .context("UHUGEINT value out of the decimal range")?,
                ))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_FLOAT => Value::Float64(Some(read!(f32) as f64)),
            DUCKDB_TYPE_DUCKDB_TYPE_DOUBLE => Value::Float64(Some(read!(f64))),
            DUCKDB_TYPE_DUCKDB_TYPE_DECIMAL => {
                let scale = duckdb_decimal_scale(logical_type);
                let value = match duckdb_decimal_internal_type(logical_type) {
                    DUCKDB_TYPE_DUCKDB_TYPE_SMALLINT => read!(i16) as i128,
                    DUCKDB_TYPE_DUCKDB_TYPE_INTEGER => read!(i32) as i128,
                    DUCKDB_TYPE_DUCKDB_TYPE_BIGINT => read!(i64) as i128,
                    DUCKDB_TYPE_DUCKDB_TYPE_HUGEINT => {
                        let raw = read!(duckdb_hugeint);
                        (raw.upper as i128) << 64 | raw.lower as i128
                    }
                    other => return Err(unsupported(other)),
                };
                Value::Decimal(Some(
                    Decimal::try_from_i128_with_scale(value, scale as u32)
                        .context("DECIMAL value out of the decimal range")?,
                ))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR | DUCKDB_TYPE_DUCKDB_TYPE_BLOB => {
                let raw = (data as *const duckdb_string_t).add(row);
                let bytes = if duckdb_string_is_inlined(*raw) {
                    slice::from_raw_parts(
                        (*raw).value.inlined.inlined.as_ptr() as *const u8,
                        (*raw).value.inlined.length as usize,
                    )
                } else {
                    slice::from_raw_parts(
                        (*raw).value.pointer.ptr as *const u8,
                        (*raw).value.pointer.length as usize,
                    )
                };
                if type_id == DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR {
                    Value::Varchar(Some(
                        std::str::from_utf8(bytes)
                            .context("Error while extracting a VARCHAR value")?
                            .into(),
                    ))
                } else {
                    Value::Blob(Some(bytes.into()))
                }
            }
            DUCKDB_TYPE_DUCKDB_TYPE_DATE => {
                Value::Date(Some(convert_date(duckdb_from_date(read!(duckdb_date)))?))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_TIME => {
                Value::Time(Some(convert_time(duckdb_from_time(read!(duckdb_time)))?))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP | DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP_TZ => {
                let micros = read!(duckdb_timestamp).micros as i128;
                Value::Timestamp(Some(convert_timestamp(micros * 1_000)?))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP_S => {
                let seconds = read!(duckdb_timestamp).micros as i128;
                Value::Timestamp(Some(convert_timestamp(seconds * 1_000_000_000)?))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP_MS => {
                let millis = read!(duckdb_timestamp).micros as i128;
                Value::Timestamp(Some(convert_timestamp(millis * 1_000_000)?))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP_NS => {
                let nanos = read!(duckdb_timestamp).micros as i128;
                Value::Timestamp(Some(convert_timestamp(nanos)?))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_UUID => {
                // Stored as a hugeint with the most significant bit flipped
                let raw = read!(duckdb_hugeint);
                let upper = (raw.upper as u64) ^ (1 << 63);
                Value::Uuid(Some(Uuid::from_u128(
                    (upper as u128) << 64 | raw.lower as u128,
                )))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_LIST => {
                let entry = read!(duckdb_list_entry);
                let child = duckdb_list_vector_get_child(vector);
                let values = (entry.offset..entry.offset + entry.length)
                    .map(|i| extract_value(child, i as usize))
                    .collect::<Result<Vec<_>>>()?;
                Value::List(Some(values))
            }
            DUCKDB_TYPE_DUCKDB_TYPE_SQLNULL => Value::Null,
            other => return Err(unsupported(other)),
        };
        Ok(result)
    }
}
