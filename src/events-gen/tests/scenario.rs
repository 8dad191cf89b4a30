use std::collections::HashMap;
use std::collections::HashSet;

use common::config;
use common::types::EventType;
use common::types::Variant;
use enum_iterator::all;
use events_gen::dataset::Dataset;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

fn generate(cfg: &config::Generator, seed: u64) -> Dataset {
    events_gen::generate(cfg, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap()
}

#[test]
fn test_orders_match_purchases() {
    let ds = generate(&config::Generator::default(), 42);
    assert!(!ds.orders.is_empty());

    let purchases = ds
        .purchases()
        .map(|e| (e.order_id.clone().unwrap(), e))
        .collect::<HashMap<_, _>>();
    assert_eq!(purchases.len(), ds.purchases().count());
    assert_eq!(purchases.len(), ds.orders.len());

    let order_ids = ds
        .orders
        .iter()
        .map(|o| o.order_id.as_str())
        .collect::<HashSet<_>>();
    assert_eq!(order_ids.len(), ds.orders.len());

    for order in &ds.orders {
        let purchase = purchases[&order.order_id];
        assert_eq!(purchase.user_id, order.user_id);
        assert_eq!(purchase.event_ts, order.order_ts);
        assert_eq!(purchase.revenue, Some(order.revenue));
    }

    // only purchases carry order columns
    for event in ds.events.iter().filter(|e| e.event_type != EventType::Purchase) {
        assert!(event.order_id.is_none());
        assert!(event.revenue.is_none());
    }
}

#[test]
fn test_sessions_follow_funnel() {
    let ds = generate(&config::Generator::default(), 7);

    for (session_id, events) in ds.sessions() {
        assert_eq!(events[0].event_type, EventType::PageView, "{session_id}");
        assert!(events.len() <= 3, "{session_id}");
        let expected = all::<EventType>().take(events.len()).collect::<Vec<_>>();
        let got = events.iter().map(|e| e.event_type).collect::<Vec<_>>();
        assert_eq!(got, expected, "{session_id}");
        for pair in events.windows(2) {
            assert!(pair[0].event_ts < pair[1].event_ts, "{session_id}");
            assert_eq!(pair[0].user_id, pair[1].user_id);
        }
    }
}

#[test]
fn test_every_user_has_a_session() {
    let cfg = config::Generator {
        users: 300,
        sessions_mean: 0.,
        ..Default::default()
    };
    let ds = generate(&cfg, 3);

    let users = ds
        .events
        .iter()
        .map(|e| e.user_id.as_str())
        .collect::<HashSet<_>>();
    assert_eq!(users.len(), 300);

    let session_ids = ds.sessions().len();
    assert!(session_ids >= 300);
    let page_views = ds
        .events
        .iter()
        .filter(|e| e.event_type == EventType::PageView)
        .count();
    assert_eq!(page_views, session_ids);
}

#[test]
fn test_full_funnel() {
    let cfg = config::Generator {
        users: 10,
        days: 5,
        add_to_cart_probability: 1.,
        conversion: config::Conversion {
            control: 1.,
            treatment: 1.,
        },
        ..Default::default()
    };
    let ds = generate(&cfg, 42);
    let sessions = ds.sessions();

    assert!(sessions.len() >= 10);
    for events in sessions.values() {
        let got = events.iter().map(|e| e.event_type).collect::<Vec<_>>();
        assert_eq!(got, vec![
            EventType::PageView,
            EventType::AddToCart,
            EventType::Purchase
        ]);
    }
    assert_eq!(ds.orders.len(), sessions.len());
    assert_eq!(ds.events.len(), sessions.len() * 3);
}

#[test]
fn test_revenue() {
    let ds = generate(&config::Generator::default(), 11);
    let floor = Decimal::new(5, 0);
    for order in &ds.orders {
        assert!(order.revenue >= floor, "{}", order.revenue);
        assert_eq!(order.revenue, order.revenue.round_dp(2));
    }
}

#[test]
fn test_reproducible() {
    let cfg = config::Generator {
        users: 200,
        ..Default::default()
    };
    assert_eq!(generate(&cfg, 42), generate(&cfg, 42));
    assert_ne!(generate(&cfg, 42), generate(&cfg, 43));
}

#[test]
fn test_treatment_lift() {
    let cfg = config::Generator {
        users: 5000,
        days: 60,
        ..Default::default()
    };

    // carts and purchases per variant, pooled over a few seeds
    let mut carts: HashMap<Variant, usize> = HashMap::new();
    let mut purchases: HashMap<Variant, usize> = HashMap::new();
    for seed in 1..=5 {
        let ds = generate(&cfg, seed);
        let variants = ds
            .assignments
            .iter()
            .map(|a| (a.user_id.as_str(), a.variant))
            .collect::<HashMap<_, _>>();
        for event in &ds.events {
            let variant = variants[event.user_id.as_str()];
            match event.event_type {
                EventType::AddToCart => *carts.entry(variant).or_default() += 1,
                EventType::Purchase => *purchases.entry(variant).or_default() += 1,
                EventType::PageView => {}
            }
        }
    }

    let rate = |v: Variant| purchases[&v] as f64 / carts[&v] as f64;
    let control = rate(Variant::Control);
    let treatment = rate(Variant::Treatment);

    assert!(treatment > control, "control {control}, treatment {treatment}");
    assert!((control - 0.06).abs() < 0.015, "control {control}");
    assert!((treatment - 0.072).abs() < 0.015, "treatment {treatment}");
}
