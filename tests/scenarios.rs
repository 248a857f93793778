// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! End-to-end scenarios exercising the full order lifecycle.
//!
//! Each scenario starts from a reset book and drains the ingress queues
//! before asserting, so the assertions see a quiescent engine.

use std::sync::Arc;

use matchbook::{
    Discipline, Engine, Order, OrderId, Price, RecordingSink, Side, StopScheduler, Trade,
};

fn setup() -> (Engine, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let engine = Engine::with_sink(sink.clone());
    (engine, sink)
}

#[test]
fn full_match_limit_against_limit() {
    let (engine, sink) = setup();
    engine.reset();

    engine
        .add_order(OrderId(1), Price(100_00), 10, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(2), Price(100_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();
    engine.drain();

    assert_eq!(
        sink.trades(),
        vec![Trade {
            buyer: OrderId(1),
            seller: OrderId(2),
            quantity: 10,
            price: Price(100_00),
        }]
    );
    assert_eq!(engine.best_bid(), Price::ZERO);
    assert_eq!(engine.best_ask(), Price::ZERO);
    engine.check_consistency();
}

#[test]
fn partial_fill_leaves_residual_resting() {
    let (engine, sink) = setup();
    engine.reset();

    engine
        .add_order(OrderId(3), Price(150_00), 20, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(4), Price(150_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();
    engine.drain();

    let trades = sink.trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].buyer, OrderId(3));
    assert_eq!(trades[0].seller, OrderId(4));
    assert_eq!(trades[0].quantity, 10);
    assert_eq!(trades[0].price, Price(150_00));

    assert_eq!(engine.best_bid(), Price(150_00));
    assert_eq!(engine.best_ask(), Price::ZERO);
    assert_eq!(engine.order(OrderId(3)).unwrap().quantity, 10);
    assert!(engine.order(OrderId(4)).is_none());
    engine.check_consistency();
}

#[test]
fn market_sell_sweeps_best_bid() {
    let (engine, sink) = setup();
    engine.reset();

    engine
        .add_order(OrderId(8), Price(150_00), 10, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(5), Price(120_00), 5, Side::Sell, Discipline::Market)
        .unwrap();
    engine.drain();

    assert_eq!(
        sink.trades(),
        vec![Trade {
            buyer: OrderId(8),
            seller: OrderId(5),
            quantity: 5,
            price: Price(150_00),
        }]
    );
    assert_eq!(engine.best_bid(), Price(150_00));
    assert_eq!(engine.order(OrderId(8)).unwrap().quantity, 5);
    assert_eq!(engine.best_ask(), Price::ZERO);
}

#[test]
fn no_cross_leaves_both_resting() {
    let (engine, sink) = setup();
    engine.reset();

    engine
        .add_order(OrderId(6), Price(80_00), 5, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(7), Price(120_00), 5, Side::Sell, Discipline::Limit)
        .unwrap();
    engine.drain();

    assert!(sink.is_empty());
    assert_eq!(engine.best_bid(), Price(80_00));
    assert_eq!(engine.best_ask(), Price(120_00));
}

#[test]
fn cancel_then_cancel_again() {
    let (engine, _) = setup();
    engine.reset();

    engine
        .add_order(OrderId(10), Price(110_00), 10, Side::Buy, Discipline::Limit)
        .unwrap();

    assert!(engine.cancel_order(OrderId(10)));
    assert!(!engine.cancel_order(OrderId(10)));
    assert_eq!(engine.best_bid(), Price::ZERO);
    engine.drain();
    engine.check_consistency();
}

#[test]
fn modify_rewrites_residual_and_price() {
    let (engine, _) = setup();
    engine.reset();

    engine
        .add_order(OrderId(11), Price(130_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();

    assert!(engine.modify_order(OrderId(11), 15, Price(125_00)));
    engine.drain();

    assert_eq!(engine.best_ask(), Price(125_00));
    assert_eq!(engine.order(OrderId(11)).unwrap().quantity, 15);
}

#[test]
fn unfilled_ioc_does_not_rest() {
    let (engine, sink) = setup();
    engine.reset();

    engine
        .add_order(OrderId(20), Price(100_00), 5, Side::Sell, Discipline::Ioc)
        .unwrap();
    engine.drain();

    assert!(sink.is_empty());
    assert_eq!(engine.best_ask(), Price::ZERO);
    assert!(engine.order(OrderId(20)).is_none());
}

#[test]
fn buy_stop_promotes_and_fills() {
    let (engine, sink) = setup();
    engine.reset();
    let scheduler = StopScheduler::new(engine.clone());

    scheduler
        .add_stop(Order::stop(OrderId(30), Side::Buy, Price(140_00), Price(150_00), 10))
        .unwrap();
    engine
        .add_order(OrderId(31), Price(155_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();

    scheduler.poll_once();

    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(
        sink.trades(),
        vec![Trade {
            buyer: OrderId(30),
            seller: OrderId(31),
            quantity: 10,
            price: Price(155_00),
        }]
    );
    assert_eq!(engine.best_ask(), Price::ZERO);
    engine.check_consistency();
}

// === Laws ===

#[test]
fn modify_is_cancel_plus_add_with_id_preserved() {
    let (a, _) = setup();
    let (b, _) = setup();

    for engine in [&a, &b] {
        engine
            .add_order(OrderId(1), Price(100_00), 10, Side::Buy, Discipline::Limit)
            .unwrap();
        engine
            .add_order(OrderId(2), Price(100_00), 5, Side::Buy, Discipline::Limit)
            .unwrap();
    }

    assert!(a.modify_order(OrderId(1), 7, Price(99_00)));
    assert!(b.cancel_order(OrderId(1)));
    b.add_order(OrderId(1), Price(99_00), 7, Side::Buy, Discipline::Limit)
        .unwrap();
    a.drain();
    b.drain();

    let snap_a = a.depth(10);
    let snap_b = b.depth(10);
    assert_eq!(snap_a.bids, snap_b.bids);
    assert_eq!(snap_a.asks, snap_b.asks);
    assert_eq!(
        a.order(OrderId(1)).unwrap(),
        b.order(OrderId(1)).unwrap()
    );
}

#[test]
fn add_then_cancel_is_a_noop() {
    let (engine, sink) = setup();

    engine
        .add_order(OrderId(1), Price(90_00), 10, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(2), Price(110_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();
    let before = engine.depth(10);

    engine
        .add_order(OrderId(3), Price(95_00), 20, Side::Buy, Discipline::Limit)
        .unwrap();
    assert!(engine.cancel_order(OrderId(3)));
    engine.drain();

    let after = engine.depth(10);
    assert!(sink.is_empty());
    assert_eq!(before.bids, after.bids);
    assert_eq!(before.asks, after.asks);
}
