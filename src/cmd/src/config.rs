use std::path::Path;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use common::types::Format;
use serde::Deserialize;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::Result;

pub const ENV_PREFIX: &str = "SHOPMART";
pub const ENV_SEPARATOR: &str = "__";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub name: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversion {
    pub control: f64,
    pub treatment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delay {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Generator {
    pub users: usize,
    pub start_date: String,
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
    pub cart_delay_minutes: Delay,
    pub purchase_delay_minutes: Delay,
    pub countries: Vec<Country>,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Data {
    pub raw_path: PathBuf,
    pub warehouse_path: PathBuf,
    pub format: Format,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub generator: Generator,
    pub data: Data,
    pub log: Log,
}

impl From<common::config::Generator> for Generator {
    fn from(g: common::config::Generator) -> Self {
        Generator {
            users: g.users,
            start_date: g.start_date.format(DATE_FORMAT).to_string(),
            days: g.days,
            seed: g.seed,
            experiment_id: g.experiment_id,
            treatment_share: g.treatment_share,
            sessions_mean: g.sessions_mean,
            sessions_std_dev: g.sessions_std_dev,
            add_to_cart_probability: g.add_to_cart_probability,
            conversion: Conversion {
                control: g.conversion.control,
                treatment: g.conversion.treatment,
            },
            revenue_mean: g.revenue_mean,
            revenue_std_dev: g.revenue_std_dev,
            revenue_floor: g.revenue_floor,
            cart_delay_minutes: Delay {
                min: *g.cart_delay_minutes.start(),
                max: *g.cart_delay_minutes.end(),
            },
            purchase_delay_minutes: Delay {
                min: *g.purchase_delay_minutes.start(),
                max: *g.purchase_delay_minutes.end(),
            },
            countries: g
                .countries
                .into_iter()
                .map(|c| Country {
                    name: c.name,
                    weight: c.weight,
                })
                .collect(),
            devices: g.devices,
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        common::config::Generator::default().into()
    }
}

impl Default for Data {
    fn default() -> Self {
        let d = common::config::Data::default();
        Data {
            raw_path: d.raw_path,
            warehouse_path: d.warehouse_path,
            format: d.format,
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: LogLevel::Info,
        }
    }
}

/// Loads the optional TOML file, then applies `SHOPMART__SECTION__KEY` environment overrides.
/// Both layers are merged over the defaults key by key, so partial tables are accepted.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut builder =
        ::config::Config::builder().add_source(::config::Config::try_from(&Config::default())?);
    if let Some(path) = path {
        builder = builder.add_source(::config::File::from(path));
    }

    let cfg = builder
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()?;

    Ok(cfg.try_deserialize()?)
}

impl TryInto<common::config::Config> for Config {
    type Error = crate::error::Error;

    fn try_into(self) -> std::result::Result<common::config::Config, Self::Error> {
        let g = self.generator;
        Ok(common::config::Config {
            generator: common::config::Generator {
                users: g.users,
                start_date: NaiveDate::parse_from_str(g.start_date.as_str(), DATE_FORMAT)?,
                days: g.days,
                seed: g.seed,
                experiment_id: g.experiment_id,
                treatment_share: g.treatment_share,
                sessions_mean: g.sessions_mean,
                sessions_std_dev: g.sessions_std_dev,
                add_to_cart_probability: g.add_to_cart_probability,
                conversion: common::config::Conversion {
                    control: g.conversion.control,
                    treatment: g.conversion.treatment,
                },
                revenue_mean: g.revenue_mean,
                revenue_std_dev: g.revenue_std_dev,
                revenue_floor: g.revenue_floor,
                cart_delay_minutes: g.cart_delay_minutes.min..=g.cart_delay_minutes.max,
                purchase_delay_minutes: g.purchase_delay_minutes.min..=g.purchase_delay_minutes.max,
                countries: g
                    .countries
                    .into_iter()
                    .map(|c| common::config::Country {
                        name: c.name,
                        weight: c.weight,
                    })
                    .collect(),
                devices: g.devices,
            },
            data: common::config::Data {
                raw_path: self.data.raw_path,
                warehouse_path: self.data.warehouse_path,
                format: self.data.format,
            },
            log: common::config::Log {
                level: self.log.level.into(),
            },
        })
    }
}

#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}
