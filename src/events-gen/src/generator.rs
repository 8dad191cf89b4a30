use std::collections::HashMap;

use chrono::Duration;
use common::config;
use common::types::Variant;
use rand::prelude::*;

use crate::assignment;
use crate::dataset::Assignment;
use crate::dataset::User;
use crate::error::Result;
use crate::profiles::ProfileProvider;

pub struct Population {
    pub users: Vec<User>,
    pub assignments: Vec<Assignment>,
}

impl Population {
    /// Direct user → variant lookup for the simulator.
    pub fn variants(&self) -> HashMap<&str, Variant> {
        self.assignments
            .iter()
            .map(|a| (a.user_id.as_str(), a.variant))
            .collect()
    }
}

pub struct Generator<'a> {
    cfg: &'a config::Generator,
    profiles: ProfileProvider,
}

impl<'a> Generator<'a> {
    pub fn try_new(cfg: &'a config::Generator) -> Result<Self> {
        cfg.validate()?;
        let profiles = ProfileProvider::try_new(&cfg.countries, &cfg.devices)?;

        Ok(Self { cfg, profiles })
    }

    pub fn population<R: Rng + ?Sized>(&self, rng: &mut R) -> Population {
        let start = self.cfg.start();
        let users = (0..self.cfg.users)
            .map(|i| {
                let signup_dt = start + Duration::days(rng.gen_range(0..self.cfg.days) as i64);
                let profile = self.profiles.sample(rng);
                User {
                    user_id: format!("u{i:05}"),
                    signup_dt,
                    country: profile.country.to_string(),
                    device: profile.device.to_string(),
                }
            })
            .collect::<Vec<_>>();

        let assignments = users
            .iter()
            .map(|u| Assignment {
                user_id: u.user_id.clone(),
                experiment_id: self.cfg.experiment_id.clone(),
                variant: assignment::variant(
                    &self.cfg.experiment_id,
                    &u.user_id,
                    self.cfg.treatment_share,
                ),
                assigned_dt: start,
            })
            .collect();

        Population { users, assignments }
    }
}
