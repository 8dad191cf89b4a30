use enum_iterator::Sequence;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumString;

pub const DECIMAL_PRECISION: u8 = 10;
pub const DECIMAL_SCALE: i8 = 2;

pub const TABLE_USERS: &str = "users";
pub const TABLE_AB_ASSIGNMENTS: &str = "ab_assignments";
pub const TABLE_EVENTS: &str = "events";
pub const TABLE_ORDERS: &str = "orders";

pub const RAW_TABLES: [&str; 4] = [
    TABLE_USERS,
    TABLE_AB_ASSIGNMENTS,
    TABLE_EVENTS,
    TABLE_ORDERS,
];

pub const RAW_TABLE_PREFIX: &str = "raw_";

pub const MART_DIM_USER: &str = "dim_user";
pub const MART_FCT_EVENTS: &str = "fct_events";
pub const MART_FCT_ORDERS: &str = "fct_orders";
pub const MART_FCT_SESSIONS: &str = "fct_sessions";
pub const MART_FCT_FUNNEL_DAILY: &str = "fct_funnel_daily";
pub const MART_AB_RESULTS: &str = "ab_results";

pub const COLUMN_USER_ID: &str = "user_id";
pub const COLUMN_SIGNUP_DT: &str = "signup_dt";
pub const COLUMN_COUNTRY: &str = "country";
pub const COLUMN_DEVICE: &str = "device";
pub const COLUMN_EXPERIMENT_ID: &str = "experiment_id";
pub const COLUMN_VARIANT: &str = "variant";
pub const COLUMN_ASSIGNED_DT: &str = "assigned_dt";
pub const COLUMN_SESSION_ID: &str = "session_id";
pub const COLUMN_EVENT_TS: &str = "event_ts";
pub const COLUMN_EVENT_TYPE: &str = "event_type";
pub const COLUMN_ORDER_ID: &str = "order_id";
pub const COLUMN_REVENUE: &str = "revenue";
pub const COLUMN_ORDER_TS: &str = "order_ts";

pub fn raw_table(table: &str) -> String {
    format!("{RAW_TABLE_PREFIX}{table}")
}

/// Funnel stage of an event. Variants are declared in funnel order, so `Ord`
/// compares stages.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Sequence,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[strum(serialize = "page_view")]
    PageView,
    #[strum(serialize = "add_to_cart")]
    AddToCart,
    #[strum(serialize = "purchase")]
    Purchase,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Sequence,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[strum(serialize = "control")]
    Control,
    #[strum(serialize = "treatment")]
    Treatment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[strum(serialize = "csv")]
    Csv,
    #[strum(serialize = "parquet")]
    Parquet,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Parquet => "parquet",
        }
    }
}
