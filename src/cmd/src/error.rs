use std::result;

use ::config::ConfigError;
use arrow::error::ArrowError;
use common::error::CommonError;
use events_gen::error::EventsGenError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;
use warehouse::error::WarehouseError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("BadRequest: {0}")]
    BadRequest(String),
    #[error("EventsGen: {0}")]
    EventsGen(#[from] EventsGenError),
    #[error("Warehouse: {0}")]
    Warehouse(#[from] WarehouseError),
    #[error("Common: {0}")]
    Common(#[from] CommonError),
    #[error("Config: {0}")]
    Config(#[from] ConfigError),
    #[error("DateParse: {0}")]
    DateParse(#[from] chrono::ParseError),
    #[error("Arrow: {0:?}")]
    Arrow(#[from] ArrowError),
    #[error("SetGlobalDefaultError: {0:?}")]
    SetGlobalDefaultError(#[from] SetGlobalDefaultError),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
}
