use std::time::Instant;

use arrow::util::pretty::pretty_format_batches;
use common::config::Config;
use tracing::debug;
use tracing::info;
use warehouse::marts;
use warehouse::Warehouse;

use crate::error::Result;

pub async fn build(cfg: &Config) -> Result<()> {
    debug!("warehouse path: {:?}", cfg.data.warehouse_path);
    let start = Instant::now();
    let wh = Warehouse::open(&cfg.data.warehouse_path).await?;
    marts::build(&wh).await?;
    info!(
        "marts built in {}",
        humantime::format_duration(start.elapsed())
    );

    let results = marts::ab_results(&wh).await?;
    println!("{}", pretty_format_batches(&results)?);

    Ok(())
}
