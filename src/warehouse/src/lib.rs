//! The warehouse is a directory holding one parquet file per table, queried
//! through a DataFusion session. Tables are replaced whole: the new file is
//! written next to the old one and renamed over it.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::datatypes::Schema;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use common::fs::remove_stale_tmp;
use common::fs::write_parquet;
use datafusion::dataframe::DataFrame;
use datafusion::datasource::MemTable;
use datafusion::prelude::ParquetReadOptions;
use datafusion::prelude::SessionContext;
use tracing::debug;
use tracing::warn;

use crate::error::Result;
use crate::error::WarehouseError;

pub mod error;
pub mod loader;
pub mod marts;

const TABLE_EXTENSION: &str = "parquet";

pub(crate) fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| WarehouseError::Internal(format!("non utf-8 path {:?}", path)))
}

pub struct Warehouse {
    path: PathBuf,
    ctx: SessionContext,
}

impl Warehouse {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;
        for stale in remove_stale_tmp(&path)? {
            warn!("removed unfinished table file {:?}", stale);
        }

        let wh = Self {
            path,
            ctx: SessionContext::new(),
        };
        for name in wh.table_names()? {
            let file = wh.table_path(&name);
            debug!("registering {name} from {:?}", file);
            wh.ctx
                .register_parquet(&name, path_str(&file)?, ParquetReadOptions::default())
                .await?;
        }

        Ok(wh)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.{TABLE_EXTENSION}"))
    }

    /// Names of the stored tables, sorted.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut names = vec![];
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != TABLE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(names)
    }

    pub fn has_table(&self, name: &str) -> Result<bool> {
        Ok(self.ctx.table_exist(name)?)
    }

    pub async fn sql(&self, query: &str) -> Result<DataFrame> {
        Ok(self.ctx.sql(query).await?)
    }

    pub async fn collect(&self, name: &str) -> Result<Vec<RecordBatch>> {
        Ok(self.ctx.table(name).await?.collect().await?)
    }

    pub async fn row_count(&self, name: &str) -> Result<usize> {
        Ok(self.ctx.table(name).await?.count().await?)
    }

    /// Stored tables with their row counts.
    pub async fn tables(&self) -> Result<Vec<(String, usize)>> {
        let mut res = vec![];
        for name in self.table_names()? {
            let rows = self.row_count(&name).await?;
            res.push((name, rows));
        }

        Ok(res)
    }

    /// Persists `batches` as table `name`, replacing the previous content.
    /// `schema` is used when there are no batches to take it from.
    pub async fn replace_table(
        &self,
        name: &str,
        schema: SchemaRef,
        batches: Vec<RecordBatch>,
    ) -> Result<usize> {
        let schema = batches.first().map(|b| b.schema()).unwrap_or(schema);
        write_parquet::<WarehouseError>(&self.table_path(name), schema.clone(), &batches)?;
        let rows = batches.iter().map(|b| b.num_rows()).sum();

        self.ctx.deregister_table(name)?;
        let table = MemTable::try_new(schema, vec![batches])?;
        self.ctx.register_table(name, Arc::new(table))?;
        debug!("replaced table {name}: {rows} rows");

        Ok(rows)
    }

    /// Runs `query` and stores its result as table `name`.
    pub async fn create_or_replace(&self, name: &str, query: &str) -> Result<usize> {
        let df = self.sql(query).await?;
        let schema = Arc::new(Schema::from(df.schema()));
        let batches = df.collect().await?;

        self.replace_table(name, schema, batches).await
    }
}
