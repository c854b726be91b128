use crate::{CBox, extract::extract_value};
use libduckdb_sys::{
    duckdb_column_count, duckdb_column_name, duckdb_data_chunk, duckdb_data_chunk_get_size,
    duckdb_data_chunk_get_vector, duckdb_destroy_data_chunk, duckdb_result,
    duckdb_result_chunk_count, duckdb_result_get_chunk, idx_t,
};
use quarry_core::{Error, NativeHandle, Result, Row, RowNames, Traversal};
use std::ffi::{CStr, c_char};

/// Materialized DuckDB result.
///
/// The whole result lives in memory as a list of data chunks, any row can be read at any
/// time by loading the chunk containing it.
pub struct DuckdbHandle {
    result: CBox<duckdb_result>,
    labels: RowNames,
    /// Index of the first row of every chunk, followed by the total number of rows.
    offsets: Box<[u64]>,
    /// Chunk the next row is read from.
    chunk: Option<(usize, CBox<duckdb_data_chunk>)>,
    /// Index of the row the next fetch returns.
    row: u64,
}

impl DuckdbHandle {
    pub(crate) fn new(mut result: CBox<duckdb_result>) -> Result<Self> {
        let labels = unsafe {
            let count = duckdb_column_count(&mut *result);
            (0..count)
                .map(|i| column_name(duckdb_column_name(&mut *result, i), i))
                .collect::<RowNames>()
        };
        let chunks = unsafe { duckdb_result_chunk_count(*result) };
        let mut offsets = Vec::with_capacity(chunks as usize + 1);
        let mut total = 0;
        for i in 0..chunks {
            let chunk = Self::load_chunk(&result, i)?;
            offsets.push(total);
            total += unsafe { duckdb_data_chunk_get_size(*chunk) };
        }
        offsets.push(total);
        Ok(Self {
            result,
            labels,
            offsets: offsets.into(),
            chunk: None,
            row: 0,
        })
    }

    fn load_chunk(result: &CBox<duckdb_result>, index: idx_t) -> Result<CBox<duckdb_data_chunk>> {
        let chunk = CBox::new(unsafe { duckdb_result_get_chunk(**result, index) }, |mut v| unsafe {
            duckdb_destroy_data_chunk(&mut v)
        });
        if chunk.is_null() {
            return Err(Error::msg(format!(
                "Could not load the chunk {} of the result",
                index
            )));
        }
        Ok(chunk)
    }

    /// Total number of rows in the result.
    pub fn len(&self) -> u64 {
        self.offsets.last().copied().unwrap_or_default()
    }
}

fn column_name(name: *const c_char, index: idx_t) -> String {
    if name.is_null() {
        return format!("column{}", index);
    }
    unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned()
}

impl NativeHandle for DuckdbHandle {
    const TRAVERSAL: Traversal = Traversal::NativeSeek;

    fn labels(&self) -> &RowNames {
        &self.labels
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fetch(&mut self) -> Result<Option<Row>> {
        if self.row >= self.len() {
            return Ok(None);
        }
        // Last chunk starting at or before the row
        let index = self.offsets.partition_point(|v| *v <= self.row) - 1;
        if !matches!(&self.chunk, Some((i, _)) if *i == index) {
            self.chunk = Some((index, Self::load_chunk(&self.result, index as idx_t)?));
        }
        let Some((_, chunk)) = &self.chunk else {
            return Ok(None);
        };
        let chunk = **chunk;
        let offset = (self.row - self.offsets[index]) as usize;
        let row = (0..self.labels.len())
            .map(|column| unsafe {
                extract_value(
                    duckdb_data_chunk_get_vector(chunk, column as idx_t),
                    offset,
                )
            })
            .collect::<Result<Row>>()?;
        self.row += 1;
        Ok(Some(row))
    }

    fn seek(&mut self, position: usize) -> Result<()> {
        if position as u64 > self.len() {
            return Err(Error::msg(format!(
                "Cannot seek to row {} of a result having {} rows",
                position,
                self.len()
            )));
        }
        self.row = position as u64;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.seek(0)
    }
}
