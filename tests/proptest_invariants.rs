// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Property-based invariant tests.
//!
//! Random operation sequences are applied to a fresh engine and drained;
//! the global book invariants must hold at quiescence, for every sequence.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use matchbook::{Discipline, Engine, OrderId, Price, Quantity, RecordingSink, Side};

#[derive(Clone, Debug)]
enum Op {
    Limit { price: i64, quantity: Quantity, buy: bool },
    Market { quantity: Quantity, buy: bool },
    Ioc { price: i64, quantity: Quantity, buy: bool },
    Cancel { target: usize },
    Modify { target: usize, price: i64, quantity: Quantity },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (90_00i64..110_00, 1u64..100, any::<bool>())
            .prop_map(|(price, quantity, buy)| Op::Limit { price, quantity, buy }),
        1 => (1u64..100, any::<bool>()).prop_map(|(quantity, buy)| Op::Market { quantity, buy }),
        1 => (90_00i64..110_00, 1u64..100, any::<bool>())
            .prop_map(|(price, quantity, buy)| Op::Ioc { price, quantity, buy }),
        1 => (0usize..64).prop_map(|target| Op::Cancel { target }),
        1 => (0usize..64, 90_00i64..110_00, 1u64..100)
            .prop_map(|(target, price, quantity)| Op::Modify { target, price, quantity }),
    ]
}

fn side_of(buy: bool) -> Side {
    if buy {
        Side::Buy
    } else {
        Side::Sell
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_ops_preserve_invariants(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let sink = Arc::new(RecordingSink::new());
        let engine = Engine::with_sink(sink.clone());

        let mut next_id = 1u64;
        let mut submitted: Vec<(OrderId, Quantity, Discipline)> = Vec::new();
        let mut rewritten: HashSet<OrderId> = HashSet::new();

        for op in &ops {
            match *op {
                Op::Limit { price, quantity, buy } => {
                    let id = OrderId(next_id);
                    next_id += 1;
                    engine.add_order(id, Price(price), quantity, side_of(buy), Discipline::Limit)
                        .unwrap();
                    submitted.push((id, quantity, Discipline::Limit));
                }
                Op::Market { quantity, buy } => {
                    let id = OrderId(next_id);
                    next_id += 1;
                    engine.add_order(id, Price(100_00), quantity, side_of(buy), Discipline::Market)
                        .unwrap();
                    submitted.push((id, quantity, Discipline::Market));
                }
                Op::Ioc { price, quantity, buy } => {
                    let id = OrderId(next_id);
                    next_id += 1;
                    engine.add_order(id, Price(price), quantity, side_of(buy), Discipline::Ioc)
                        .unwrap();
                    submitted.push((id, quantity, Discipline::Ioc));
                }
                Op::Cancel { target } => {
                    if !submitted.is_empty() {
                        let (id, _, _) = submitted[target % submitted.len()];
                        engine.cancel_order(id);
                    }
                }
                Op::Modify { target, price, quantity } => {
                    if !submitted.is_empty() {
                        let (id, _, _) = submitted[target % submitted.len()];
                        if engine.modify_order(id, quantity, Price(price)) {
                            rewritten.insert(id);
                        }
                    }
                }
            }
        }

        engine.drain();

        // Book never crossed at quiescence.
        prop_assert!(!engine.is_crossed());
        engine.check_consistency();

        // Trade conservation: an order never trades more than submitted.
        // Modified orders are excluded: modify rewrites the quantity.
        let mut traded: HashMap<OrderId, Quantity> = HashMap::new();
        for trade in sink.trades() {
            prop_assert!(trade.quantity > 0);
            *traded.entry(trade.buyer).or_default() += trade.quantity;
            *traded.entry(trade.seller).or_default() += trade.quantity;
        }
        for &(id, quantity, _) in &submitted {
            if !rewritten.contains(&id) {
                prop_assert!(traded.get(&id).copied().unwrap_or(0) <= quantity);
            }
        }

        // Market and IOC orders never rest.
        for &(id, _, _) in &submitted {
            if let Some(resting) = engine.order(id) {
                prop_assert_eq!(resting.discipline, Discipline::Limit);
                prop_assert!(resting.quantity > 0);
            }
        }
    }

    #[test]
    fn modify_equals_cancel_then_add(
        base in proptest::collection::vec((90_00i64..110_00, 1u64..100, any::<bool>()), 1..20),
        new_price in 90_00i64..110_00,
        new_quantity in 1u64..100,
    ) {
        let sink_a = Arc::new(RecordingSink::new());
        let sink_b = Arc::new(RecordingSink::new());
        let a = Engine::with_sink(sink_a.clone());
        let b = Engine::with_sink(sink_b.clone());

        for (i, &(price, quantity, buy)) in base.iter().enumerate() {
            let id = OrderId(i as u64 + 1);
            a.add_order(id, Price(price), quantity, side_of(buy), Discipline::Limit).unwrap();
            b.add_order(id, Price(price), quantity, side_of(buy), Discipline::Limit).unwrap();
        }
        a.drain();
        b.drain();

        let target = OrderId(1);
        if let Some(order) = a.order(target) {
            prop_assert!(a.modify_order(target, new_quantity, Price(new_price)));
            prop_assert!(b.cancel_order(target));
            b.add_order(target, Price(new_price), new_quantity, order.side, Discipline::Limit)
                .unwrap();
            a.drain();
            b.drain();

            let snap_a = a.depth(100);
            let snap_b = b.depth(100);
            prop_assert_eq!(snap_a.bids, snap_b.bids);
            prop_assert_eq!(snap_a.asks, snap_b.asks);
            prop_assert_eq!(a.order(target), b.order(target));
            prop_assert_eq!(sink_a.len(), sink_b.len());
        }
    }

    #[test]
    fn trades_execute_at_resting_price(
        resting_price in 90_00i64..110_00,
        aggressor_offset in 0i64..10_00,
        quantity in 1u64..100,
        buy_rests in any::<bool>(),
    ) {
        let sink = Arc::new(RecordingSink::new());
        let engine = Engine::with_sink(sink.clone());

        let (resting_side, aggressor_side) = if buy_rests {
            (Side::Buy, Side::Sell)
        } else {
            (Side::Sell, Side::Buy)
        };
        // Aggressor priced at or through the resting order.
        let aggressor_price = if buy_rests {
            resting_price - aggressor_offset
        } else {
            resting_price + aggressor_offset
        };

        engine.add_order(OrderId(1), Price(resting_price), quantity, resting_side, Discipline::Limit)
            .unwrap();
        engine.drain();
        engine.add_order(OrderId(2), Price(aggressor_price), quantity, aggressor_side, Discipline::Limit)
            .unwrap();
        engine.drain();

        let trades = sink.trades();
        prop_assert_eq!(trades.len(), 1);
        prop_assert_eq!(trades[0].price, Price(resting_price));
        prop_assert_eq!(trades[0].quantity, quantity);
    }
}
