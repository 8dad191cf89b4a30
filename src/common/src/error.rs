use std::io;
use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, CommonError>;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] io::Error),
}
