use std::time::Instant;

use common::config::Config;
use tracing::info;

use crate::command::generate::generate;
use crate::command::load::load;
use crate::command::marts::build;
use crate::error::Result;

pub async fn run(cfg: &Config) -> Result<()> {
    let start = Instant::now();
    generate(cfg)?;
    load(cfg).await?;
    build(cfg).await?;
    info!(
        "pipeline finished in {}",
        humantime::format_duration(start.elapsed())
    );

    Ok(())
}
