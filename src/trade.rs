//! Trade representation and the emission sink.

use std::fmt;

use log::info;
use parking_lot::Mutex;

use crate::{OrderId, Price, Quantity};

/// A completed trade between two orders.
///
/// Created when an incoming (aggressor) order matches against a resting
/// (passive) order. The price is always the resting order's price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trade {
    /// The buy-side order
    pub buyer: OrderId,
    /// The sell-side order
    pub seller: OrderId,
    /// Quantity executed
    pub quantity: Quantity,
    /// Execution price (the passive order's price)
    pub price: Price,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buy {} / sell {}: {} @ {}",
            self.buyer, self.seller, self.quantity, self.price
        )
    }
}

/// Destination for executed trades.
///
/// Called from inside the engine-wide critical section, so per-match
/// trade grouping is preserved. Implementations should return quickly.
pub trait TradeSink: Send + Sync {
    fn on_trade(&self, trade: &Trade);
}

/// Default sink: writes each trade as a human-readable log line.
#[derive(Debug, Default)]
pub struct LogSink;

impl TradeSink for LogSink {
    fn on_trade(&self, trade: &Trade) {
        info!("trade executed: {}", trade);
    }
}

/// Sink that accumulates trades in memory, for tests and demos.
#[derive(Debug, Default)]
pub struct RecordingSink {
    trades: Mutex<Vec<Trade>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every trade recorded so far.
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.lock().clone()
    }

    /// Number of trades recorded so far.
    pub fn len(&self) -> usize {
        self.trades.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain and return the recorded trades.
    pub fn take(&self) -> Vec<Trade> {
        std::mem::take(&mut *self.trades.lock())
    }
}

impl TradeSink for RecordingSink {
    fn on_trade(&self, trade: &Trade) {
        self.trades.lock().push(*trade);
    }
}
