//! Analytical tables derived from the raw tables. Each mart is one query whose
//! result replaces the table of the same name, so a rebuild is idempotent.

use std::time::Instant;

use arrow::record_batch::RecordBatch;
use common::types::raw_table;
use common::types::MART_AB_RESULTS;
use common::types::MART_DIM_USER;
use common::types::MART_FCT_EVENTS;
use common::types::MART_FCT_FUNNEL_DAILY;
use common::types::MART_FCT_ORDERS;
use common::types::MART_FCT_SESSIONS;
use common::types::RAW_TABLES;
use tracing::info;

use crate::error::Result;
use crate::error::WarehouseError;
use crate::Warehouse;

pub struct Mart {
    pub name: &'static str,
    pub query: &'static str,
}

/// In build order: later marts read earlier ones.
pub const MARTS: [Mart; 6] = [
    Mart {
        name: MART_FCT_EVENTS,
        query: r#"
SELECT
  user_id,
  session_id,
  CAST(event_ts AS TIMESTAMP) AS event_ts,
  event_type,
  order_id,
  CAST(revenue AS DOUBLE) AS revenue
FROM raw_events
"#,
    },
    Mart {
        name: MART_DIM_USER,
        query: r#"
SELECT
  user_id,
  CAST(signup_dt AS TIMESTAMP) AS signup_dt,
  country,
  device
FROM raw_users
"#,
    },
    Mart {
        name: MART_FCT_ORDERS,
        query: r#"
SELECT
  order_id,
  user_id,
  CAST(order_ts AS TIMESTAMP) AS order_ts,
  CAST(revenue AS DOUBLE) AS revenue
FROM raw_orders
"#,
    },
    Mart {
        name: MART_FCT_SESSIONS,
        query: r#"
SELECT
  session_id,
  user_id,
  MIN(event_ts) AS session_start_ts,
  MAX(event_ts) AS session_end_ts,
  SUM(CASE WHEN event_type = 'page_view' THEN 1 ELSE 0 END) AS page_views,
  SUM(CASE WHEN event_type = 'add_to_cart' THEN 1 ELSE 0 END) AS add_to_cart_events,
  SUM(CASE WHEN event_type = 'purchase' THEN 1 ELSE 0 END) AS purchases,
  MAX(CASE WHEN event_type = 'purchase' THEN 1 ELSE 0 END) AS converted
FROM fct_events
GROUP BY session_id, user_id
ORDER BY session_id
"#,
    },
    Mart {
        name: MART_FCT_FUNNEL_DAILY,
        query: r#"
SELECT
  CAST(event_ts AS DATE) AS event_date,
  COUNT(DISTINCT CASE WHEN event_type = 'page_view' THEN session_id END) AS sessions_with_page_view,
  COUNT(DISTINCT CASE WHEN event_type = 'add_to_cart' THEN session_id END) AS sessions_with_add_to_cart,
  COUNT(DISTINCT CASE WHEN event_type = 'purchase' THEN session_id END) AS sessions_with_purchase
FROM fct_events
GROUP BY CAST(event_ts AS DATE)
ORDER BY event_date
"#,
    },
    Mart {
        name: MART_AB_RESULTS,
        query: r#"
SELECT
  a.experiment_id,
  a.variant,
  COUNT(DISTINCT s.session_id) AS sessions,
  SUM(s.converted) AS conversions,
  CAST(SUM(s.converted) AS DOUBLE) / CAST(NULLIF(COUNT(DISTINCT s.session_id), 0) AS DOUBLE) AS conversion_rate
FROM raw_ab_assignments a
JOIN fct_sessions s ON a.user_id = s.user_id
GROUP BY a.experiment_id, a.variant
ORDER BY a.experiment_id, a.variant
"#,
    },
];

pub async fn build(wh: &Warehouse) -> Result<()> {
    for table in RAW_TABLES {
        let name = raw_table(table);
        if !wh.has_table(&name)? {
            return Err(WarehouseError::TableNotFound(name));
        }
    }

    for mart in MARTS.iter() {
        let now = Instant::now();
        let rows = wh.create_or_replace(mart.name, mart.query).await?;
        info!(
            "built {}: {rows} rows in {}",
            mart.name,
            humantime::format_duration(now.elapsed())
        );
    }

    Ok(())
}

pub async fn ab_results(wh: &Warehouse) -> Result<Vec<RecordBatch>> {
    if !wh.has_table(MART_AB_RESULTS)? {
        return Err(WarehouseError::TableNotFound(MART_AB_RESULTS.to_string()));
    }

    Ok(wh
        .sql("SELECT * FROM ab_results ORDER BY experiment_id, variant")
        .await?
        .collect()
        .await?)
}
