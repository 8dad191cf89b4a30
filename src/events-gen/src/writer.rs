//! Persists a [`Dataset`] as four raw tables, one file per table.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use arrow::record_batch::RecordBatch;
use bytesize::ByteSize;
use common::fs::write_atomic;
use common::fs::write_parquet;
use common::schema;
use common::types::Format;
use common::types::TABLE_AB_ASSIGNMENTS;
use common::types::TABLE_EVENTS;
use common::types::TABLE_ORDERS;
use common::types::TABLE_USERS;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::dataset::Dataset;
use crate::error::EventsGenError;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub table: &'static str,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

pub fn table_path(dir: &Path, table: &str, format: Format) -> PathBuf {
    dir.join(format!("{table}.{}", format.extension()))
}

pub fn write(ds: &Dataset, dir: &Path, format: Format) -> Result<Vec<TableSummary>> {
    fs::create_dir_all(dir)?;
    debug!("writing {format} tables to {:?}", dir);

    let summary = vec![
        write_table(dir, TABLE_USERS, format, &ds.users, || ds.users_batch())?,
        write_table(dir, TABLE_AB_ASSIGNMENTS, format, &ds.assignments, || {
            ds.assignments_batch()
        })?,
        write_table(dir, TABLE_EVENTS, format, &ds.events, || ds.events_batch())?,
        write_table(dir, TABLE_ORDERS, format, &ds.orders, || ds.orders_batch())?,
    ];

    for t in &summary {
        info!(
            "wrote {:?}: {} rows, {}",
            t.path,
            t.rows,
            ByteSize::b(t.bytes)
        );
    }

    Ok(summary)
}

fn write_table<T, F>(
    dir: &Path,
    table: &'static str,
    format: Format,
    rows: &[T],
    batch: F,
) -> Result<TableSummary>
where
    T: Serialize,
    F: FnOnce() -> Result<RecordBatch>,
{
    let schema = schema::raw(table)
        .ok_or_else(|| EventsGenError::Internal(format!("unknown table {table}")))?;
    let path = table_path(dir, table, format);

    match format {
        Format::Csv => write_atomic(&path, |w| -> Result<()> {
            let mut wr = csv::WriterBuilder::new().has_headers(false).from_writer(w);
            // header comes from the schema so that empty tables keep it too
            wr.write_record(schema.fields().iter().map(|f| f.name()))?;
            for row in rows {
                wr.serialize(row)?;
            }
            wr.flush()?;
            Ok(())
        })?,
        Format::Parquet => {
            let batch = batch()?;
            write_parquet::<EventsGenError>(&path, schema, &[batch])?
        }
    }

    Ok(TableSummary {
        table,
        rows: rows.len(),
        bytes: fs::metadata(&path)?.len(),
        path,
    })
}
