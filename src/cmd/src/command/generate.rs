use std::time::Instant;

use common::config::Config;
use events_gen::writer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use tracing::info;

use crate::error::Result;

pub fn generate(cfg: &Config) -> Result<()> {
    let g = &cfg.generator;
    debug!(
        "users: {}, start date: {}, days: {}, seed: {}, experiment: {}",
        g.users, g.start_date, g.days, g.seed, g.experiment_id
    );

    let start = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(g.seed);
    let ds = events_gen::generate(g, &mut rng)?;
    info!(
        "generated {} users, {} events, {} orders",
        ds.users.len(),
        ds.events.len(),
        ds.orders.len()
    );

    writer::write(&ds, &cfg.data.raw_path, cfg.data.format)?;
    info!(
        "raw tables written to {:?} in {}",
        cfg.data.raw_path,
        humantime::format_duration(start.elapsed())
    );

    Ok(())
}
