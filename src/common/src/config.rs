use std::ops::RangeInclusive;
use std::path::PathBuf;

use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use tracing::level_filters::LevelFilter;

use crate::error::CommonError;
use crate::error::Result;
use crate::types::Format;
use crate::types::Variant;

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub name: String,
    pub weight: u32,
}

/// Purchase probability of a session that reached the cart, per variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub control: f64,
    pub treatment: f64,
}

impl Conversion {
    pub fn rate(&self, variant: Variant) -> f64 {
        match variant {
            Variant::Control => self.control,
            Variant::Treatment => self.treatment,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    pub users: usize,
    pub start_date: NaiveDate,
    pub days: u32,
    pub seed: u64,
    pub experiment_id: String,
    pub treatment_share: f64,
    pub sessions_mean: f64,
    pub sessions_std_dev: f64,
    pub add_to_cart_probability: f64,
    pub conversion: Conversion,
    pub revenue_mean: f64,
    pub revenue_std_dev: f64,
    pub revenue_floor: f64,
    pub cart_delay_minutes: RangeInclusive<u32>,
    pub purchase_delay_minutes: RangeInclusive<u32>,
    pub countries: Vec<Country>,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub raw_path: PathBuf,
    pub warehouse_path: PathBuf,
    pub format: Format,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    pub level: LevelFilter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub generator: Generator,
    pub data: Data,
    pub log: Log,
}

impl Default for Generator {
    fn default() -> Self {
        Generator {
            users: 5000,
            start_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap_or_default(),
            days: 60,
            seed: 42,
            experiment_id: "checkout_banner_v1".to_string(),
            treatment_share: 0.5,
            sessions_mean: 3.5,
            sessions_std_dev: 1.5,
            add_to_cart_probability: 0.25,
            conversion: Conversion {
                control: 0.06,
                treatment: 0.072,
            },
            revenue_mean: 65.,
            revenue_std_dev: 25.,
            revenue_floor: 5.,
            cart_delay_minutes: 1..=20,
            purchase_delay_minutes: 1..=30,
            countries: vec![
                Country {
                    name: "US".to_string(),
                    weight: 3,
                },
                Country {
                    name: "CA".to_string(),
                    weight: 1,
                },
            ],
            devices: vec!["ios".to_string(), "android".to_string(), "web".to_string()],
        }
    }
}

impl Default for Data {
    fn default() -> Self {
        Data {
            raw_path: PathBuf::from("data/raw"),
            warehouse_path: PathBuf::from("warehouse"),
            format: Format::Parquet,
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: LevelFilter::INFO,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            generator: Generator::default(),
            data: Data::default(),
            log: Log::default(),
        }
    }
}

/// Largest amount a `Decimal128(10, 2)` column holds.
pub const MAX_REVENUE: f64 = 99_999_999.99;

fn probability(name: &str, v: f64) -> Result<()> {
    if !(0. ..=1.).contains(&v) {
        return Err(CommonError::Config(format!(
            "{name} must be within [0, 1], got {v}"
        )));
    }
    Ok(())
}

fn std_dev(name: &str, v: f64) -> Result<()> {
    if !v.is_finite() || v < 0. {
        return Err(CommonError::Config(format!(
            "{name} must be a non-negative number, got {v}"
        )));
    }
    Ok(())
}

fn delay(name: &str, v: &RangeInclusive<u32>) -> Result<()> {
    if *v.start() < 1 || v.start() > v.end() {
        return Err(CommonError::Config(format!(
            "{name} must be a range of at least one minute, got {}..={}",
            v.start(),
            v.end()
        )));
    }
    Ok(())
}

impl Generator {
    /// Campaign start at midnight. Signup and assignment dates are aligned to it.
    pub fn start(&self) -> NaiveDateTime {
        self.start_date.and_time(NaiveTime::MIN)
    }

    pub fn validate(&self) -> Result<()> {
        if self.users == 0 {
            return Err(CommonError::Config("users must be positive".to_string()));
        }
        if self.days == 0 {
            return Err(CommonError::Config("days must be positive".to_string()));
        }
        if self.experiment_id.is_empty() {
            return Err(CommonError::Config(
                "experiment id can't be empty".to_string(),
            ));
        }
        probability("treatment share", self.treatment_share)?;
        probability("add to cart probability", self.add_to_cart_probability)?;
        probability("control conversion", self.conversion.control)?;
        probability("treatment conversion", self.conversion.treatment)?;
        if !self.sessions_mean.is_finite() {
            return Err(CommonError::Config(format!(
                "sessions mean must be a number, got {}",
                self.sessions_mean
            )));
        }
        std_dev("sessions std dev", self.sessions_std_dev)?;
        if !self.revenue_mean.is_finite() || self.revenue_mean > MAX_REVENUE {
            return Err(CommonError::Config(format!(
                "revenue mean must be a number up to {MAX_REVENUE}, got {}",
                self.revenue_mean
            )));
        }
        std_dev("revenue std dev", self.revenue_std_dev)?;
        let floor_cents = self.revenue_floor * 100.;
        if !self.revenue_floor.is_finite()
            || self.revenue_floor < 0.01
            || self.revenue_floor > MAX_REVENUE
            || (floor_cents - floor_cents.round()).abs() > 1e-6
        {
            return Err(CommonError::Config(format!(
                "revenue floor must be a whole number of cents within [0.01, {MAX_REVENUE}], got {}",
                self.revenue_floor
            )));
        }
        delay("cart delay", &self.cart_delay_minutes)?;
        delay("purchase delay", &self.purchase_delay_minutes)?;
        // the last session may spill into the day after the window
        if self
            .start()
            .checked_add_signed(Duration::days(self.days as i64 + 1))
            .is_none()
        {
            return Err(CommonError::Config(format!(
                "a window of {} days from {} is out of the calendar range",
                self.days, self.start_date
            )));
        }
        let total_weight = self.countries.iter().map(|c| c.weight as u64).sum::<u64>();
        if total_weight == 0 || total_weight > u32::MAX as u64 {
            return Err(CommonError::Config(format!(
                "countries must have a total weight within [1, {}], got {total_weight}",
                u32::MAX
            )));
        }
        if self.devices.is_empty() {
            return Err(CommonError::Config("devices can't be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Generator::default().validate().unwrap();
    }

    #[test]
    fn rejects_empty_population_and_window() {
        let cfg = Generator {
            users: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CommonError::Config(_))));

        let cfg = Generator {
            days: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CommonError::Config(_))));
    }

    #[test]
    fn rejects_bad_distribution_parameters() {
        let bad = [
            Generator {
                add_to_cart_probability: 1.5,
                ..Default::default()
            },
            Generator {
                revenue_std_dev: -1.,
                ..Default::default()
            },
            Generator {
                revenue_floor: 0.,
                ..Default::default()
            },
            Generator {
                cart_delay_minutes: 0..=20,
                ..Default::default()
            },
            Generator {
                countries: vec![],
                ..Default::default()
            },
            Generator {
                countries: vec![
                    Country {
                        name: "US".to_string(),
                        weight: u32::MAX,
                    },
                    Country {
                        name: "CA".to_string(),
                        weight: 1,
                    },
                ],
                ..Default::default()
            },
            Generator {
                days: 200_000_000,
                ..Default::default()
            },
            Generator {
                start_date: NaiveDate::MAX,
                days: 1,
                ..Default::default()
            },
            Generator {
                revenue_mean: 1e9,
                ..Default::default()
            },
            Generator {
                revenue_floor: 0.001,
                ..Default::default()
            },
            Generator {
                revenue_floor: 4.999,
                ..Default::default()
            },
        ];

        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?}");
        }
    }

    #[test]
    fn accepts_cent_floors_and_long_windows() {
        let ok = [
            Generator {
                revenue_floor: 0.01,
                ..Default::default()
            },
            Generator {
                revenue_floor: 0.07,
                ..Default::default()
            },
            Generator {
                days: 36_500,
                ..Default::default()
            },
        ];

        for cfg in ok {
            assert!(cfg.validate().is_ok(), "{cfg:?}");
        }
    }

    #[test]
    fn start_is_midnight() {
        let start = Generator::default().start();
        assert_eq!(start.to_string(), "2024-10-01 00:00:00");
    }
}
