use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use common::types::EventType;
use common::types::Variant;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: String,
    pub signup_dt: NaiveDateTime,
    pub country: String,
    pub device: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub user_id: String,
    pub experiment_id: String,
    pub variant: Variant,
    pub assigned_dt: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub user_id: String,
    pub session_id: String,
    pub event_ts: NaiveDateTime,
    pub event_type: EventType,
    pub order_id: Option<String>,
    pub revenue: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub order_ts: NaiveDateTime,
    pub revenue: Decimal,
}

/// The four raw tables, each in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub users: Vec<User>,
    pub assignments: Vec<Assignment>,
    pub events: Vec<Event>,
    pub orders: Vec<Order>,
}

impl Dataset {
    /// Events grouped by session, each group in emission order.
    pub fn sessions(&self) -> BTreeMap<&str, Vec<&Event>> {
        let mut sessions: BTreeMap<&str, Vec<&Event>> = BTreeMap::new();
        for event in &self.events {
            sessions
                .entry(event.session_id.as_str())
                .or_default()
                .push(event);
        }

        sessions
    }

    pub fn purchases(&self) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(|e| e.event_type == EventType::Purchase)
    }
}
