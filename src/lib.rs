// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! # matchbook
//!
//! A single-symbol limit order book engine with price-time priority
//! matching, an asynchronous ingestion pipeline, and a stop-order
//! scheduler.
//!
//! ## Features
//!
//! - **Order disciplines**: Limit, Market, IOC, Stop
//! - **Price-time priority**: FIFO matching at each price level, best
//!   price first; trades execute at the resting order's price
//! - **Concurrent ingestion**: per-side lock-free queues drained by
//!   worker threads that re-examine resting orders for crosses
//! - **Stop scheduling**: pending stops promoted to market orders when
//!   the best-of-book trigger fires
//! - **Fixed-point prices**: integer cents, no floating-point error
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use matchbook::{Discipline, Engine, OrderId, Price, RecordingSink, Side};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let engine = Engine::with_sink(sink.clone());
//!
//! // A resting ask, then a crossing bid.
//! engine.add_order(OrderId(1), Price(101_00), 100, Side::Sell, Discipline::Limit).unwrap();
//! engine.add_order(OrderId(2), Price(101_00), 40, Side::Buy, Discipline::Limit).unwrap();
//!
//! // Limit orders match when their queue is swept — by the worker
//! // threads in production, or synchronously via drain().
//! engine.drain();
//!
//! let trades = sink.trades();
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].quantity, 40);
//! assert_eq!(trades[0].price, Price(101_00));
//! assert_eq!(engine.best_ask(), Price(101_00)); // 60 remaining
//! ```
//!
//! ## Disciplines
//!
//! | Discipline | Behavior |
//! |------------|----------|
//! | **Limit**  | Executes at or better than its price; remainder rests |
//! | **Market** | Executes at any price; remainder discarded |
//! | **IOC**    | Fills what is immediately available; remainder discarded |
//! | **Stop**   | Inert until triggered, then promoted to Market |
//!
//! ```
//! use std::sync::Arc;
//! use matchbook::{Discipline, Engine, OrderId, Price, RecordingSink, Side};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let engine = Engine::with_sink(sink.clone());
//!
//! engine.add_order(OrderId(1), Price(150_00), 10, Side::Buy, Discipline::Limit).unwrap();
//!
//! // Market sell executes immediately at the resting bid's price.
//! engine.add_order(OrderId(2), Price(120_00), 5, Side::Sell, Discipline::Market).unwrap();
//! assert_eq!(sink.trades()[0].price, Price(150_00));
//!
//! // IOC buy with no asks to hit evaporates without resting.
//! engine.add_order(OrderId(3), Price(100_00), 5, Side::Buy, Discipline::Ioc).unwrap();
//! assert_eq!(sink.trades().len(), 1);
//! assert_eq!(engine.best_bid(), Price(150_00));
//! ```
//!
//! ## Workers and stop orders
//!
//! ```
//! use std::sync::Arc;
//! use matchbook::{Discipline, Engine, Order, OrderId, Price, RecordingSink, Side, StopScheduler};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let engine = Engine::with_sink(sink.clone());
//! let scheduler = StopScheduler::new(engine.clone());
//!
//! // Buy stop: triggers once the best ask reaches $150.
//! scheduler.add_stop(Order::stop(OrderId(30), Side::Buy, Price(140_00), Price(150_00), 10)).unwrap();
//! engine.add_order(OrderId(31), Price(155_00), 10, Side::Sell, Discipline::Limit).unwrap();
//!
//! // start() polls on its own thread; poll_once() is the synchronous form.
//! scheduler.poll_once();
//! assert_eq!(scheduler.pending_count(), 0);
//! assert_eq!(sink.trades()[0].price, Price(155_00));
//! ```

mod book;
mod discipline;
mod engine;
mod error;
mod level;
mod matching;
mod order;
mod side;
mod side_book;
mod snapshot;
mod stop;
mod trade;
mod types;

// Re-export public API
pub use book::Book;
pub use discipline::Discipline;
pub use engine::{Engine, EngineConfig};
pub use error::EngineError;
pub use level::Level;
pub use order::Order;
pub use side::Side;
pub use side_book::SideBook;
pub use snapshot::{BookSnapshot, LevelSnapshot};
pub use stop::{StopScheduler, DEFAULT_POLL_INTERVAL};
pub use trade::{LogSink, RecordingSink, Trade, TradeSink};
pub use types::{OrderId, Price, Quantity};
