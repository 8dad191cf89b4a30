//! Synthetic e-commerce dataset: a user roster with a sticky A/B assignment,
//! and per-user sessions walking the page_view → add_to_cart → purchase
//! funnel with a variant-dependent conversion rate.

use common::config;
use rand::Rng;
use tracing::debug;
use tracing::info;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::generator::Generator;
use crate::scenario::Scenario;

pub mod assignment;
pub mod batch_builder;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod profiles;
pub mod scenario;
pub mod writer;

/// Generates the whole dataset from one random stream. Same stream state and
/// same parameters give the same dataset.
pub fn generate<R: Rng + ?Sized>(cfg: &config::Generator, rng: &mut R) -> Result<Dataset> {
    let gen = Generator::try_new(cfg)?;
    let scenario = Scenario::try_new(cfg)?;

    info!("generating population of {} users...", cfg.users);
    let population = gen.population(rng);
    info!("simulating sessions...");
    let activity = scenario.run(&population, rng)?;
    debug!(
        "{} events, {} orders",
        activity.events.len(),
        activity.orders.len()
    );

    Ok(Dataset {
        users: population.users,
        assignments: population.assignments,
        events: activity.events,
        orders: activity.orders,
    })
}
