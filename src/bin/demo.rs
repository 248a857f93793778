//! Demo driver: exercises the engine end to end.
//!
//! Starts the worker threads, runs the matching / cancellation /
//! modification / IOC / stop-order scenarios, then shuts everything down.
//!
//! Usage:
//!   RUST_LOG=info cargo run --bin demo

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use matchbook::{
    Discipline, Engine, Order, OrderId, Price, RecordingSink, Side, StopScheduler, TradeSink,
};

/// Sink that records for the scenario summaries and logs each trade.
struct TeeSink {
    record: Arc<RecordingSink>,
}

impl TradeSink for TeeSink {
    fn on_trade(&self, trade: &matchbook::Trade) {
        println!("trade executed: {}", trade);
        self.record.on_trade(trade);
    }
}

fn print_book(engine: &Engine) {
    let snap = engine.depth(10);
    println!("  asks:");
    for level in snap.asks.iter().rev() {
        println!(
            "    {}  qty {:>5}  ({} orders)",
            level.price, level.quantity, level.orders
        );
    }
    println!("  bids:");
    for level in &snap.bids {
        println!(
            "    {}  qty {:>5}  ({} orders)",
            level.price, level.quantity, level.orders
        );
    }
    println!(
        "  best bid: {}, best ask: {}\n",
        engine.best_bid(),
        engine.best_ask()
    );
}

fn settle(engine: &Engine) {
    // Give the workers a moment, then force quiescence.
    thread::sleep(Duration::from_millis(20));
    engine.drain();
}

fn run_matching_scenarios(engine: &Engine) {
    println!("Scenario 1: full match");
    engine.reset();
    engine
        .add_order(OrderId(1), Price(100_00), 10, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(2), Price(100_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();
    settle(engine);
    print_book(engine);

    println!("Scenario 2: partial fill");
    engine.reset();
    engine
        .add_order(OrderId(3), Price(150_00), 20, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(4), Price(150_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();
    settle(engine);
    print_book(engine);

    println!("Scenario 3: market order sweep");
    engine.reset();
    engine
        .add_order(OrderId(8), Price(150_00), 10, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(5), Price(120_00), 5, Side::Sell, Discipline::Market)
        .unwrap();
    settle(engine);
    print_book(engine);

    println!("Scenario 4: no cross");
    engine.reset();
    engine
        .add_order(OrderId(6), Price(80_00), 5, Side::Buy, Discipline::Limit)
        .unwrap();
    engine
        .add_order(OrderId(7), Price(120_00), 5, Side::Sell, Discipline::Limit)
        .unwrap();
    settle(engine);
    print_book(engine);
}

fn run_cancellation(engine: &Engine) {
    println!("Scenario 5: cancellation");
    engine.reset();
    engine
        .add_order(OrderId(10), Price(110_00), 10, Side::Buy, Discipline::Limit)
        .unwrap();
    settle(engine);
    println!(
        "  cancel O10 -> {}, again -> {}",
        engine.cancel_order(OrderId(10)),
        engine.cancel_order(OrderId(10))
    );
    print_book(engine);
}

fn run_modification(engine: &Engine) {
    println!("Scenario 6: modification");
    engine.reset();
    engine
        .add_order(OrderId(11), Price(130_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();
    settle(engine);
    println!(
        "  modify O11 to 15 @ $125.00 -> {}",
        engine.modify_order(OrderId(11), 15, Price(125_00))
    );
    settle(engine);
    print_book(engine);
}

fn run_ioc(engine: &Engine) {
    println!("Scenario 7: IOC on an empty book");
    engine.reset();
    engine
        .add_order(OrderId(20), Price(100_00), 5, Side::Sell, Discipline::Ioc)
        .unwrap();
    settle(engine);
    print_book(engine);
}

fn run_stop_order(engine: &Engine) {
    println!("Scenario 8: stop order");
    engine.reset();

    let scheduler = StopScheduler::with_poll_interval(engine.clone(), Duration::from_millis(10));
    scheduler.start();

    // Buy stop triggered once the best ask reaches $150.
    scheduler
        .add_stop(Order::stop(OrderId(30), Side::Buy, Price(140_00), Price(150_00), 10))
        .unwrap();
    engine
        .add_order(OrderId(31), Price(155_00), 10, Side::Sell, Discipline::Limit)
        .unwrap();

    thread::sleep(Duration::from_millis(100));
    scheduler.stop();

    println!("  pending stops after trigger: {}", scheduler.pending_count());
    print_book(engine);
}

fn main() {
    env_logger::init();

    let record = Arc::new(RecordingSink::new());
    let engine = Engine::with_sink(Arc::new(TeeSink {
        record: record.clone(),
    }));

    engine.start_workers();

    run_matching_scenarios(&engine);
    run_cancellation(&engine);
    run_modification(&engine);
    run_ioc(&engine);
    run_stop_order(&engine);

    engine.stop_workers();

    println!("Final book:");
    print_book(&engine);
    println!("{} trades executed in total", record.len());
}
