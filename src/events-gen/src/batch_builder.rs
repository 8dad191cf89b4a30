use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::array::Decimal128Builder;
use arrow::array::StringBuilder;
use arrow::array::TimestampSecondBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use common::schema;
use common::DECIMAL_PRECISION;
use common::DECIMAL_SCALE;
use rust_decimal::Decimal;

use crate::dataset::Assignment;
use crate::dataset::Dataset;
use crate::dataset::Event;
use crate::dataset::Order;
use crate::dataset::User;
use crate::error::Result;

fn seconds(ts: &NaiveDateTime) -> i64 {
    ts.and_utc().timestamp()
}

// mantissa at the column scale
fn cents(v: &Decimal) -> i128 {
    let mut v = *v;
    v.rescale(DECIMAL_SCALE as u32);
    v.mantissa()
}

pub struct UsersBuilder {
    user_id: StringBuilder,
    signup_dt: TimestampSecondBuilder,
    country: StringBuilder,
    device: StringBuilder,
    schema: SchemaRef,
}

impl UsersBuilder {
    pub fn new(cap: usize) -> Self {
        Self {
            user_id: StringBuilder::with_capacity(cap, cap * 6),
            signup_dt: TimestampSecondBuilder::with_capacity(cap),
            country: StringBuilder::with_capacity(cap, cap * 2),
            device: StringBuilder::with_capacity(cap, cap * 7),
            schema: schema::users(),
        }
    }

    pub fn append(&mut self, user: &User) {
        self.user_id.append_value(&user.user_id);
        self.signup_dt.append_value(seconds(&user.signup_dt));
        self.country.append_value(&user.country);
        self.device.append_value(&user.device);
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.user_id.finish()),
            Arc::new(self.signup_dt.finish()),
            Arc::new(self.country.finish()),
            Arc::new(self.device.finish()),
        ];

        Ok(RecordBatch::try_new(self.schema.clone(), cols)?)
    }
}

pub struct AssignmentsBuilder {
    user_id: StringBuilder,
    experiment_id: StringBuilder,
    variant: StringBuilder,
    assigned_dt: TimestampSecondBuilder,
    schema: SchemaRef,
}

impl AssignmentsBuilder {
    pub fn new(cap: usize) -> Self {
        Self {
            user_id: StringBuilder::with_capacity(cap, cap * 6),
            experiment_id: StringBuilder::with_capacity(cap, cap * 16),
            variant: StringBuilder::with_capacity(cap, cap * 9),
            assigned_dt: TimestampSecondBuilder::with_capacity(cap),
            schema: schema::ab_assignments(),
        }
    }

    pub fn append(&mut self, assignment: &Assignment) {
        self.user_id.append_value(&assignment.user_id);
        self.experiment_id.append_value(&assignment.experiment_id);
        self.variant.append_value(assignment.variant.to_string());
        self.assigned_dt
            .append_value(seconds(&assignment.assigned_dt));
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.user_id.finish()),
            Arc::new(self.experiment_id.finish()),
            Arc::new(self.variant.finish()),
            Arc::new(self.assigned_dt.finish()),
        ];

        Ok(RecordBatch::try_new(self.schema.clone(), cols)?)
    }
}

pub struct EventsBuilder {
    user_id: StringBuilder,
    session_id: StringBuilder,
    event_ts: TimestampSecondBuilder,
    event_type: StringBuilder,
    order_id: StringBuilder,
    revenue: Decimal128Builder,
    schema: SchemaRef,
}

impl EventsBuilder {
    pub fn new(cap: usize) -> Self {
        Self {
            user_id: StringBuilder::with_capacity(cap, cap * 6),
            session_id: StringBuilder::with_capacity(cap, cap * 24),
            event_ts: TimestampSecondBuilder::with_capacity(cap),
            event_type: StringBuilder::with_capacity(cap, cap * 10),
            order_id: StringBuilder::with_capacity(cap, cap),
            revenue: Decimal128Builder::with_capacity(cap),
            schema: schema::events(),
        }
    }

    pub fn append(&mut self, event: &Event) {
        self.user_id.append_value(&event.user_id);
        self.session_id.append_value(&event.session_id);
        self.event_ts.append_value(seconds(&event.event_ts));
        self.event_type.append_value(event.event_type.to_string());
        self.order_id.append_option(event.order_id.as_deref());
        self.revenue.append_option(event.revenue.as_ref().map(cents));
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.user_id.finish()),
            Arc::new(self.session_id.finish()),
            Arc::new(self.event_ts.finish()),
            Arc::new(self.event_type.finish()),
            Arc::new(self.order_id.finish()),
            Arc::new(
                self.revenue
                    .finish()
                    .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)?,
            ),
        ];

        Ok(RecordBatch::try_new(self.schema.clone(), cols)?)
    }
}

pub struct OrdersBuilder {
    order_id: StringBuilder,
    user_id: StringBuilder,
    order_ts: TimestampSecondBuilder,
    revenue: Decimal128Builder,
    schema: SchemaRef,
}

impl OrdersBuilder {
    pub fn new(cap: usize) -> Self {
        Self {
            order_id: StringBuilder::with_capacity(cap, cap * 24),
            user_id: StringBuilder::with_capacity(cap, cap * 6),
            order_ts: TimestampSecondBuilder::with_capacity(cap),
            revenue: Decimal128Builder::with_capacity(cap),
            schema: schema::orders(),
        }
    }

    pub fn append(&mut self, order: &Order) {
        self.order_id.append_value(&order.order_id);
        self.user_id.append_value(&order.user_id);
        self.order_ts.append_value(seconds(&order.order_ts));
        self.revenue.append_value(cents(&order.revenue));
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.order_id.finish()),
            Arc::new(self.user_id.finish()),
            Arc::new(self.order_ts.finish()),
            Arc::new(
                self.revenue
                    .finish()
                    .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)?,
            ),
        ];

        Ok(RecordBatch::try_new(self.schema.clone(), cols)?)
    }
}

impl Dataset {
    pub fn users_batch(&self) -> Result<RecordBatch> {
        let mut b = UsersBuilder::new(self.users.len());
        self.users.iter().for_each(|v| b.append(v));
        b.build_record_batch()
    }

    pub fn assignments_batch(&self) -> Result<RecordBatch> {
        let mut b = AssignmentsBuilder::new(self.assignments.len());
        self.assignments.iter().for_each(|v| b.append(v));
        b.build_record_batch()
    }

    pub fn events_batch(&self) -> Result<RecordBatch> {
        let mut b = EventsBuilder::new(self.events.len());
        self.events.iter().for_each(|v| b.append(v));
        b.build_record_batch()
    }

    pub fn orders_batch(&self) -> Result<RecordBatch> {
        let mut b = OrdersBuilder::new(self.orders.len());
        self.orders.iter().for_each(|v| b.append(v));
        b.build_record_batch()
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::Array;
    use arrow::array::AsArray;
    use arrow::datatypes::Decimal128Type;
    use chrono::NaiveDate;
    use common::types::EventType;

    use super::*;

    #[test]
    fn purchase_columns_are_null_outside_purchases() {
        let ts = NaiveDate::from_ymd_opt(2024, 10, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let ds = Dataset {
            events: vec![
                Event {
                    user_id: "u00000".to_string(),
                    session_id: "s_u00000_1727776800_123".to_string(),
                    event_ts: ts,
                    event_type: EventType::PageView,
                    order_id: None,
                    revenue: None,
                },
                Event {
                    user_id: "u00000".to_string(),
                    session_id: "s_u00000_1727776800_123".to_string(),
                    event_ts: ts,
                    event_type: EventType::Purchase,
                    order_id: Some("o_u00000_1727776800_321".to_string()),
                    revenue: Some(Decimal::new(655, 1)),
                },
            ],
            ..Default::default()
        };

        let batch = ds.events_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        let revenue = batch.column(5).as_primitive::<Decimal128Type>();
        assert!(revenue.is_null(0));
        assert_eq!(revenue.value(1), 6550);
        assert!(batch.column(4).is_null(0));
        assert_eq!(batch.column(3).as_string::<i32>().value(1), "purchase");
    }
}
