use std::collections::HashSet;

use chrono::Duration;
use chrono::NaiveDateTime;
use common::config;
use common::config::MAX_REVENUE;
use common::types::EventType;
use common::DECIMAL_SCALE;
use rand::prelude::*;
use rand_distr::Normal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::dataset::Event;
use crate::dataset::Order;
use crate::dataset::User;
use crate::error::EventsGenError;
use crate::error::Result;
use crate::generator::Population;

const ID_SUFFIX_RANGE: std::ops::RangeInclusive<u32> = 100..=999;

pub struct Activity {
    pub events: Vec<Event>,
    pub orders: Vec<Order>,
}

#[derive(Default)]
struct Ids {
    sessions: HashSet<String>,
    orders: HashSet<String>,
}

/// `<prefix>_<user>_<epoch seconds>_<3 digits>`; a `_<n>` counter is appended
/// when the draw collides with an id handed out before.
fn unique_id<R: Rng + ?Sized>(
    taken: &mut HashSet<String>,
    prefix: &str,
    user_id: &str,
    ts: NaiveDateTime,
    rng: &mut R,
) -> String {
    let id = format!(
        "{prefix}_{user_id}_{}_{}",
        ts.and_utc().timestamp(),
        rng.gen_range(ID_SUFFIX_RANGE)
    );
    let mut candidate = id.clone();
    let mut n = 0;
    while taken.contains(&candidate) {
        n += 1;
        candidate = format!("{id}_{n}");
    }
    taken.insert(candidate.clone());

    candidate
}

pub struct Scenario<'a> {
    cfg: &'a config::Generator,
    sessions: Normal<f64>,
    revenue: Normal<f64>,
    revenue_floor: f64,
    revenue_floor_cents: Decimal,
}

impl<'a> Scenario<'a> {
    pub fn try_new(cfg: &'a config::Generator) -> Result<Self> {
        cfg.validate()?;

        Ok(Self {
            cfg,
            sessions: Normal::new(cfg.sessions_mean, cfg.sessions_std_dev)
                .map_err(|err| EventsGenError::Internal(err.to_string()))?,
            revenue: Normal::new(cfg.revenue_mean, cfg.revenue_std_dev)
                .map_err(|err| EventsGenError::Internal(err.to_string()))?,
            revenue_floor: cfg.revenue_floor,
            revenue_floor_cents: Decimal::from_f64(cfg.revenue_floor)
                .ok_or_else(|| {
                    EventsGenError::Internal(format!(
                        "revenue floor {} is out of range",
                        cfg.revenue_floor
                    ))
                })?
                .round_dp(DECIMAL_SCALE as u32),
        })
    }

    pub fn run<R: Rng + ?Sized>(&self, population: &Population, rng: &mut R) -> Result<Activity> {
        let variants = population.variants();
        let mut ids = Ids::default();
        let mut activity = Activity {
            events: Vec::with_capacity(population.users.len() * 4),
            orders: Vec::with_capacity(population.users.len() / 4),
        };

        for user in &population.users {
            let variant = *variants.get(user.user_id.as_str()).ok_or_else(|| {
                EventsGenError::Internal(format!("user {} has no assignment", user.user_id))
            })?;
            let conversion = self.cfg.conversion.rate(variant);

            for _ in 0..self.session_count(rng) {
                self.session(user, conversion, &mut ids, &mut activity, rng)?;
            }
        }

        Ok(activity)
    }

    // truncated towards zero, at least one session
    fn session_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        (self.sessions.sample(rng) as i64).max(1) as usize
    }

    fn session<R: Rng + ?Sized>(
        &self,
        user: &User,
        conversion: f64,
        ids: &mut Ids,
        activity: &mut Activity,
        rng: &mut R,
    ) -> Result<()> {
        let start = self.cfg.start()
            + Duration::days(rng.gen_range(0..self.cfg.days) as i64)
            + Duration::hours(rng.gen_range(0..24));
        let session_id = unique_id(&mut ids.sessions, "s", &user.user_id, start, rng);

        activity.events.push(Event {
            user_id: user.user_id.clone(),
            session_id: session_id.clone(),
            event_ts: start,
            event_type: EventType::PageView,
            order_id: None,
            revenue: None,
        });

        if !rng.gen_bool(self.cfg.add_to_cart_probability) {
            return Ok(());
        }
        let cart_ts =
            start + Duration::minutes(rng.gen_range(self.cfg.cart_delay_minutes.clone()) as i64);
        activity.events.push(Event {
            user_id: user.user_id.clone(),
            session_id: session_id.clone(),
            event_ts: cart_ts,
            event_type: EventType::AddToCart,
            order_id: None,
            revenue: None,
        });

        if !rng.gen_bool(conversion) {
            return Ok(());
        }
        let purchase_ts = cart_ts
            + Duration::minutes(rng.gen_range(self.cfg.purchase_delay_minutes.clone()) as i64);
        let order_id = unique_id(&mut ids.orders, "o", &user.user_id, purchase_ts, rng);
        let revenue = self.revenue(rng)?;

        activity.events.push(Event {
            user_id: user.user_id.clone(),
            session_id,
            event_ts: purchase_ts,
            event_type: EventType::Purchase,
            order_id: Some(order_id.clone()),
            revenue: Some(revenue),
        });
        activity.orders.push(Order {
            order_id,
            user_id: user.user_id.clone(),
            order_ts: purchase_ts,
            revenue,
        });

        Ok(())
    }

    // floored, then rounded to cents; never below the floor in cents
    fn revenue<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Decimal> {
        let v = self.revenue.sample(rng).max(self.revenue_floor);
        if v > MAX_REVENUE {
            return Err(EventsGenError::Internal(format!(
                "revenue {v} exceeds {MAX_REVENUE}"
            )));
        }
        let mut revenue = Decimal::from_f64(v)
            .ok_or_else(|| EventsGenError::Internal(format!("revenue {v} is out of range")))?
            .round_dp(DECIMAL_SCALE as u32)
            .max(self.revenue_floor_cents);
        revenue.rescale(DECIMAL_SCALE as u32);

        Ok(revenue)
    }
}
