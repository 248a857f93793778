//! Engine: order admission, the per-side ingress queues, and the worker
//! pool that re-examines resting orders.
//!
//! A single mutex guards the whole [`Book`] so that matching, admission,
//! cancel/modify, best-of-book reads, and trade emission are mutually
//! consistent. The critical section is short and the engine is
//! single-symbol, so the coarse lock is the point, not a limitation.
//!
//! Limit orders rest immediately and are pushed onto their side's queue;
//! a worker later pops them and runs a match sweep. Two orders admitted
//! concurrently can therefore cross for a moment — the sweep is what
//! guarantees the book uncrosses once ingestion quiesces.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::queue::SegQueue;
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::{
    Book, BookSnapshot, Discipline, EngineError, LogSink, Order, OrderId, Price, Quantity, Side,
    TradeSink,
};

/// Tunables for the worker pool.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Worker threads per side spawned by `start_workers`
    pub workers_per_side: usize,
    /// Sleep between empty try-pops in the worker loop
    pub idle_backoff: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers_per_side: 1,
            idle_backoff: Duration::from_millis(1),
        }
    }
}

struct Shared {
    book: Mutex<Book>,
    buy_queue: SegQueue<OrderId>,
    sell_queue: SegQueue<OrderId>,
    running: AtomicBool,
    sink: Arc<dyn TradeSink>,
    config: EngineConfig,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Shared {
    fn queue(&self, side: Side) -> &SegQueue<OrderId> {
        match side {
            Side::Buy => &self.buy_queue,
            Side::Sell => &self.sell_queue,
        }
    }

    /// Pop-side of the ingress pipeline: re-examine one resting order.
    ///
    /// The order may have been cancelled, modified, or fully filled since
    /// it was enqueued; an id that is no longer active is skipped.
    fn sweep(&self, order_id: OrderId) {
        let mut book = self.book.lock();
        let Some(resting) = book.order(order_id) else {
            return;
        };

        let mut taker = resting.clone();
        book.execute(&mut taker, &*self.sink);

        if taker.is_filled() {
            book.remove(order_id);
        } else if let Some(resting) = book.order_mut(order_id) {
            resting.quantity = taker.quantity;
        }
    }

    fn worker_loop(&self, side: Side) {
        let queue = self.queue(side);
        while self.running.load(Ordering::Relaxed) {
            match queue.pop() {
                Some(id) => self.sweep(id),
                None => thread::sleep(self.config.idle_backoff),
            }
        }
    }
}

/// The single-symbol matching engine.
///
/// Cheap to clone; clones share the same book, queues, and workers.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl Engine {
    /// Create an engine with default config, logging trades via [`LogSink`].
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default(), Arc::new(LogSink))
    }

    /// Create an engine with default config and a custom trade sink.
    pub fn with_sink(sink: Arc<dyn TradeSink>) -> Self {
        Self::with_config(EngineConfig::default(), sink)
    }

    /// Create an engine with explicit config and trade sink.
    pub fn with_config(config: EngineConfig, sink: Arc<dyn TradeSink>) -> Self {
        Self {
            shared: Arc::new(Shared {
                book: Mutex::new(Book::new()),
                buy_queue: SegQueue::new(),
                sell_queue: SegQueue::new(),
                running: AtomicBool::new(false),
                sink,
                config,
                workers: Mutex::new(Vec::new()),
            }),
        }
    }

    // === Order lifecycle ===

    /// Admit an order.
    ///
    /// - **Market / IOC** match synchronously under the book lock; any
    ///   residual is discarded and never rests.
    /// - **Limit** rests at the tail of its price level and is enqueued
    ///   for an asynchronous re-match sweep.
    /// - **Stop** is rejected here; route it through
    ///   [`StopScheduler::add_stop`](crate::StopScheduler::add_stop).
    pub fn add_order(
        &self,
        id: OrderId,
        price: Price,
        quantity: Quantity,
        side: Side,
        discipline: Discipline,
    ) -> Result<(), EngineError> {
        if quantity == 0 {
            return Err(EngineError::InvalidQuantity);
        }
        if price < Price::ZERO {
            return Err(EngineError::InvalidPrice);
        }
        if discipline == Discipline::Stop {
            return Err(EngineError::StopViaScheduler);
        }

        let mut order = Order::new(id, side, discipline, price, quantity);
        let mut book = self.shared.book.lock();
        if book.contains(id) {
            return Err(EngineError::DuplicateId(id));
        }

        if discipline.is_immediate() {
            book.execute(&mut order, &*self.shared.sink);
            drop(book);
            if !order.is_filled() {
                debug!(
                    "{} order {} discarding residual {}",
                    discipline, id, order.quantity
                );
            }
        } else {
            book.insert(order);
            self.shared.queue(side).push(id);
            drop(book);
            debug!("admitted limit order {} {} {} @ {}", id, side, quantity, price);
        }
        Ok(())
    }

    /// Cancel a resting order. Returns false if the id is not active.
    pub fn cancel_order(&self, id: OrderId) -> bool {
        let removed = self.shared.book.lock().remove(id);
        match removed {
            Some(order) => {
                debug!("cancelled order {} with residual {}", id, order.quantity);
                true
            }
            None => {
                debug!("cancel order {}: not active", id);
                false
            }
        }
    }

    /// Rewrite a resting order's price and quantity.
    ///
    /// The order is removed from its current level and reinserted at the
    /// tail of the level for `new_price` — time priority is deliberately
    /// lost. The id is re-enqueued for a match sweep. Returns false if the
    /// id is not active or the arguments are invalid.
    pub fn modify_order(&self, id: OrderId, new_quantity: Quantity, new_price: Price) -> bool {
        if new_quantity == 0 || new_price < Price::ZERO {
            warn!("modify order {} rejected: invalid arguments", id);
            return false;
        }

        let mut book = self.shared.book.lock();
        let Some(mut order) = book.remove(id) else {
            debug!("modify order {}: not active", id);
            return false;
        };

        order.price = new_price;
        order.quantity = new_quantity;
        order.original_quantity = new_quantity;
        let side = order.side;
        book.insert(order);
        self.shared.queue(side).push(id);
        drop(book);

        debug!("modified order {} -> {} @ {}", id, new_quantity, new_price);
        true
    }

    /// Empty both side books and the active-order index.
    ///
    /// Ids still sitting in the ingress queues are tolerated: sweeps skip
    /// anything that is no longer active.
    pub fn reset(&self) {
        self.shared.book.lock().reset();
        info!("book reset");
    }

    // === Queries ===

    /// Best bid price; `Price::ZERO` when the bid side is empty.
    pub fn best_bid(&self) -> Price {
        self.shared.book.lock().best_bid()
    }

    /// Best ask price; `Price::ZERO` when the ask side is empty.
    pub fn best_ask(&self) -> Price {
        self.shared.book.lock().best_ask()
    }

    /// Copy of a resting order.
    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.shared.book.lock().order(id).cloned()
    }

    /// Number of resting orders.
    pub fn active_count(&self) -> usize {
        self.shared.book.lock().active_count()
    }

    /// True if best bid >= best ask with both sides populated. Can hold
    /// transiently while queued sweeps are outstanding.
    pub fn is_crossed(&self) -> bool {
        self.shared.book.lock().is_crossed()
    }

    /// Snapshot the top `depth` levels on each side.
    pub fn depth(&self, depth: usize) -> BookSnapshot {
        self.shared.book.lock().snapshot(depth)
    }

    /// Verify book invariants; panics on violation. Test support.
    pub fn check_consistency(&self) {
        self.shared.book.lock().check_consistency();
    }

    // === Worker pool ===

    /// Spawn the per-side worker threads.
    pub fn start_workers(&self) {
        let mut workers = self.shared.workers.lock();
        if !workers.is_empty() {
            warn!("workers already running");
            return;
        }
        self.shared.running.store(true, Ordering::Relaxed);

        for side in [Side::Buy, Side::Sell] {
            for i in 0..self.shared.config.workers_per_side {
                let shared = Arc::clone(&self.shared);
                let name = format!(
                    "match-{}-{}",
                    match side {
                        Side::Buy => "buy",
                        Side::Sell => "sell",
                    },
                    i
                );
                let handle = thread::Builder::new()
                    .name(name)
                    .spawn(move || shared.worker_loop(side))
                    .expect("failed to spawn matching worker");
                workers.push(handle);
            }
        }
        info!(
            "started {} matching workers per side",
            self.shared.config.workers_per_side
        );
    }

    /// Signal the workers to exit and join them. In-flight sweeps complete.
    pub fn stop_workers(&self) {
        self.shared.running.store(false, Ordering::Relaxed);
        let handles: Vec<_> = self.shared.workers.lock().drain(..).collect();
        for handle in handles {
            if handle.join().is_err() {
                warn!("matching worker panicked");
            }
        }
        info!("matching workers stopped");
    }

    /// Process every queued sweep on the calling thread.
    ///
    /// Quiescence helper for tests and drivers: once this returns (and no
    /// producers are admitting concurrently), the book is uncrossed.
    pub fn drain(&self) {
        loop {
            let mut progressed = false;
            while let Some(id) = self.shared.buy_queue.pop() {
                self.shared.sweep(id);
                progressed = true;
            }
            while let Some(id) = self.shared.sell_queue.pop() {
                self.shared.sweep(id);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
