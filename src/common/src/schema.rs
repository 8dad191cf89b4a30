//! Arrow schemas of the raw tables. Writers and the warehouse loader both read
//! them from here, so a raw file always round-trips with the same types.

use std::sync::Arc;

use arrow::datatypes::DataType;
use arrow::datatypes::Field;
use arrow::datatypes::Schema;
use arrow::datatypes::SchemaRef;
use arrow::datatypes::TimeUnit;

use crate::types::COLUMN_ASSIGNED_DT;
use crate::types::COLUMN_COUNTRY;
use crate::types::COLUMN_DEVICE;
use crate::types::COLUMN_EVENT_TS;
use crate::types::COLUMN_EVENT_TYPE;
use crate::types::COLUMN_EXPERIMENT_ID;
use crate::types::COLUMN_ORDER_ID;
use crate::types::COLUMN_ORDER_TS;
use crate::types::COLUMN_REVENUE;
use crate::types::COLUMN_SESSION_ID;
use crate::types::COLUMN_SIGNUP_DT;
use crate::types::COLUMN_USER_ID;
use crate::types::COLUMN_VARIANT;
use crate::types::DECIMAL_PRECISION;
use crate::types::DECIMAL_SCALE;
use crate::types::TABLE_AB_ASSIGNMENTS;
use crate::types::TABLE_EVENTS;
use crate::types::TABLE_ORDERS;
use crate::types::TABLE_USERS;

fn timestamp() -> DataType {
    DataType::Timestamp(TimeUnit::Second, None)
}

fn money() -> DataType {
    DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE)
}

pub fn users() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMN_USER_ID, DataType::Utf8, false),
        Field::new(COLUMN_SIGNUP_DT, timestamp(), false),
        Field::new(COLUMN_COUNTRY, DataType::Utf8, false),
        Field::new(COLUMN_DEVICE, DataType::Utf8, false),
    ]))
}

pub fn ab_assignments() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMN_USER_ID, DataType::Utf8, false),
        Field::new(COLUMN_EXPERIMENT_ID, DataType::Utf8, false),
        Field::new(COLUMN_VARIANT, DataType::Utf8, false),
        Field::new(COLUMN_ASSIGNED_DT, timestamp(), false),
    ]))
}

pub fn events() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMN_USER_ID, DataType::Utf8, false),
        Field::new(COLUMN_SESSION_ID, DataType::Utf8, false),
        Field::new(COLUMN_EVENT_TS, timestamp(), false),
        Field::new(COLUMN_EVENT_TYPE, DataType::Utf8, false),
        Field::new(COLUMN_ORDER_ID, DataType::Utf8, true),
        Field::new(COLUMN_REVENUE, money(), true),
    ]))
}

pub fn orders() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMN_ORDER_ID, DataType::Utf8, false),
        Field::new(COLUMN_USER_ID, DataType::Utf8, false),
        Field::new(COLUMN_ORDER_TS, timestamp(), false),
        Field::new(COLUMN_REVENUE, money(), false),
    ]))
}

pub fn raw(table: &str) -> Option<SchemaRef> {
    match table {
        TABLE_USERS => Some(users()),
        TABLE_AB_ASSIGNMENTS => Some(ab_assignments()),
        TABLE_EVENTS => Some(events()),
        TABLE_ORDERS => Some(orders()),
        _ => None,
    }
}
