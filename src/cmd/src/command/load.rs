use std::time::Instant;

use common::config::Config;
use tracing::debug;
use tracing::info;
use warehouse::loader;
use warehouse::Warehouse;

use crate::error::Result;

pub async fn load(cfg: &Config) -> Result<()> {
    debug!("warehouse path: {:?}", cfg.data.warehouse_path);
    let start = Instant::now();
    let wh = Warehouse::open(&cfg.data.warehouse_path).await?;
    loader::load_raw(&wh, &cfg.data.raw_path, cfg.data.format).await?;
    info!(
        "raw tables loaded in {}",
        humantime::format_duration(start.elapsed())
    );

    Ok(())
}
