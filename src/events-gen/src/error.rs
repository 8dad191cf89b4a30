use std::io;
use std::result;

use arrow::error::ArrowError;
use common::error::CommonError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub type Result<T> = result::Result<T, EventsGenError>;

#[derive(Error, Debug)]
pub enum EventsGenError {
    #[error("Internal: {0:?}")]
    Internal(String),
    #[error("Common: {0}")]
    Common(#[from] CommonError),
    #[error("ArrowError: {0:?}")]
    ArrowError(#[from] ArrowError),
    #[error("ParquetError: {0:?}")]
    ParquetError(#[from] ParquetError),
    #[error("CSVError: {0:?}")]
    CSVError(#[from] csv::Error),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] io::Error),
}
