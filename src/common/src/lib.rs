pub mod config;
pub mod error;
pub mod fs;
pub mod schema;
pub mod types;

pub use types::DECIMAL_PRECISION;
pub use types::DECIMAL_SCALE;
