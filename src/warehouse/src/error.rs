use std::io;
use std::result;

use arrow::error::ArrowError;
use common::error::CommonError;
use datafusion::error::DataFusionError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub type Result<T> = result::Result<T, WarehouseError>;

#[derive(Error, Debug)]
pub enum WarehouseError {
    #[error("internal {0:?}")]
    Internal(String),
    #[error("file not found: {0:?}")]
    FileNotFound(String),
    #[error("table not found: {0:?}")]
    TableNotFound(String),
    #[error("datafusion {0:?}")]
    DataFusion(#[from] DataFusionError),
    #[error("arrow {0:?}")]
    Arrow(#[from] ArrowError),
    #[error("parquet {0:?}")]
    Parquet(#[from] ParquetError),
    #[error("common {0:?}")]
    Common(#[from] CommonError),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] io::Error),
}
