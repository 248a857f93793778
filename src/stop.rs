//! Stop orders: inert until a best-of-book trigger is met, then promoted
//! to market orders and submitted through the engine.
//!
//! The scheduler holds the pending stop table and a polling thread. Each
//! poll snapshots the best bid and ask once, collects every stop whose
//! trigger predicate is met, releases the table lock, and only then
//! submits the promoted orders — the pending-table lock is never held
//! across a call into the matching engine.
//!
//! Triggering latency is bounded by the poll period; for tests and
//! event-driven integrations [`StopScheduler::poll_once`] runs a single
//! poll synchronously.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::{Discipline, Engine, EngineError, Order, OrderId, Price, Side};

/// Default poll period for the scheduler thread.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

struct Shared {
    pending: Mutex<FxHashMap<OrderId, Order>>,
    running: AtomicBool,
    engine: Engine,
    poll_interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// Scheduler for pending stop orders.
///
/// Cheap to clone; clones share the same pending table and poll thread.
#[derive(Clone)]
pub struct StopScheduler {
    shared: Arc<Shared>,
}

impl StopScheduler {
    /// Create a scheduler over `engine` with the default poll interval.
    pub fn new(engine: Engine) -> Self {
        Self::with_poll_interval(engine, DEFAULT_POLL_INTERVAL)
    }

    /// Create a scheduler with an explicit poll interval.
    pub fn with_poll_interval(engine: Engine, poll_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: Mutex::new(FxHashMap::default()),
                running: AtomicBool::new(false),
                engine,
                poll_interval,
                handle: Mutex::new(None),
            }),
        }
    }

    /// Submit a stop order.
    ///
    /// The order waits in the pending table until its trigger fires:
    /// - buy stop: `best_ask >= stop_price`
    /// - sell stop: `best_bid <= stop_price`
    ///
    /// On trigger it is promoted to a market order; its `price` field
    /// becomes informational only.
    pub fn add_stop(&self, mut order: Order) -> Result<(), EngineError> {
        if order.quantity == 0 {
            return Err(EngineError::InvalidQuantity);
        }
        if order.stop_price < Price::ZERO || order.price < Price::ZERO {
            return Err(EngineError::InvalidPrice);
        }

        order.discipline = Discipline::Stop;
        let mut pending = self.shared.pending.lock();
        if pending.contains_key(&order.id) {
            return Err(EngineError::DuplicateId(order.id));
        }
        debug!(
            "added stop order {} {} {} trigger {}",
            order.id, order.side, order.quantity, order.stop_price
        );
        pending.insert(order.id, order);
        Ok(())
    }

    /// Cancel a pending stop order. Returns false if the id is not pending.
    pub fn cancel_stop(&self, id: OrderId) -> bool {
        let removed = self.shared.pending.lock().remove(&id).is_some();
        if removed {
            debug!("cancelled stop order {}", id);
        }
        removed
    }

    /// Number of stop orders waiting for their trigger.
    pub fn pending_count(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Run one poll iteration synchronously on the calling thread.
    pub fn poll_once(&self) {
        Self::poll(&self.shared);
    }

    /// Spawn the polling thread.
    pub fn start(&self) {
        let mut handle = self.shared.handle.lock();
        if handle.is_some() {
            warn!("stop scheduler already running");
            return;
        }
        self.shared.running.store(true, Ordering::Relaxed);

        let shared = Arc::clone(&self.shared);
        *handle = Some(
            thread::Builder::new()
                .name("stop-scheduler".to_string())
                .spawn(move || {
                    info!("stop scheduler started");
                    while shared.running.load(Ordering::Relaxed) {
                        Self::poll(&shared);
                        thread::sleep(shared.poll_interval);
                    }
                    info!("stop scheduler stopped");
                })
                .expect("failed to spawn stop scheduler"),
        );
    }

    /// Signal the polling thread to exit and join it.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.shared.handle.lock().take() {
            if handle.join().is_err() {
                warn!("stop scheduler thread panicked");
            }
        }
    }

    fn poll(shared: &Shared) {
        let best_bid = shared.engine.best_bid();
        let best_ask = shared.engine.best_ask();

        let triggered: Vec<Order> = {
            let mut pending = shared.pending.lock();
            let ids: Vec<OrderId> = pending
                .values()
                .filter(|order| Self::triggers(order, best_bid, best_ask))
                .map(|order| order.id)
                .collect();
            ids.iter().filter_map(|id| pending.remove(id)).collect()
        };

        // Table lock released: promoted submissions re-enter the engine
        // and may move the market, but never deadlock against add_stop.
        for order in triggered {
            info!(
                "activating stop order {} {} as market order",
                order.id, order.side
            );
            if let Err(e) = shared.engine.add_order(
                order.id,
                order.price,
                order.quantity,
                order.side,
                Discipline::Market,
            ) {
                warn!("promoted stop order {} rejected: {}", order.id, e);
            }
        }
    }

    fn triggers(order: &Order, best_bid: Price, best_ask: Price) -> bool {
        match order.side {
            Side::Buy => best_ask >= order.stop_price,
            Side::Sell => best_bid <= order.stop_price,
        }
    }
}
