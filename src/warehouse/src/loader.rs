use std::path::Path;

use common::schema;
use common::types::raw_table;
use common::types::Format;
use common::types::RAW_TABLES;
use datafusion::prelude::CsvReadOptions;
use datafusion::prelude::ParquetReadOptions;
use tracing::debug;
use tracing::info;

use crate::error::Result;
use crate::error::WarehouseError;
use crate::path_str;
use crate::Warehouse;

/// Bulk-loads the raw tables found in `dir` as `raw_<table>`, typed by the
/// shared raw schemas. All files are read before any table is replaced, so a
/// missing or unreadable file leaves the previous raw tables in place.
pub async fn load_raw(wh: &Warehouse, dir: &Path, format: Format) -> Result<Vec<(String, usize)>> {
    let mut paths = Vec::with_capacity(RAW_TABLES.len());
    for table in RAW_TABLES {
        let path = dir.join(format!("{table}.{}", format.extension()));
        if !path.try_exists()? {
            return Err(WarehouseError::FileNotFound(format!(
                "raw table {:?} doesn't exist",
                path
            )));
        }
        paths.push((table, path));
    }

    let mut read = Vec::with_capacity(paths.len());
    for (table, path) in paths {
        let schema = schema::raw(table)
            .ok_or_else(|| WarehouseError::Internal(format!("no schema for {table}")))?;
        debug!("reading {:?}", path);

        let df = match format {
            Format::Csv => {
                let opts = CsvReadOptions::new().has_header(true).schema(&schema);
                wh.context().read_csv(path_str(&path)?, opts).await?
            }
            Format::Parquet => {
                wh.context()
                    .read_parquet(path_str(&path)?, ParquetReadOptions::default())
                    .await?
            }
        };
        read.push((table, schema, df.collect().await?));
    }

    let mut loaded = Vec::with_capacity(read.len());
    for (table, schema, batches) in read {
        let name = raw_table(table);
        let rows = wh.replace_table(&name, schema, batches).await?;
        loaded.push((name, rows));
    }

    info!("loaded tables:");
    for (name, rows) in wh.tables().await? {
        info!("  {name}: {rows} rows");
    }

    Ok(loaded)
}
