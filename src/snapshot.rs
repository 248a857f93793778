//! Point-in-time views of the book for display and tests.

use crate::{Book, Price, Quantity, Side};

/// Aggregated view of one price level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelSnapshot {
    pub price: Price,
    /// Sum of residuals at this price
    pub quantity: Quantity,
    /// Number of resting orders at this price
    pub orders: usize,
}

/// Top-of-book view, best levels first on both sides.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookSnapshot {
    pub bids: Vec<LevelSnapshot>,
    pub asks: Vec<LevelSnapshot>,
}

impl BookSnapshot {
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|l| l.price)
    }
}

impl Book {
    /// Snapshot the top `depth` levels on each side.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        let collect = |side: Side| -> Vec<LevelSnapshot> {
            self.side(side)
                .iter_best_to_worst()
                .take(depth)
                .map(|(price, level)| LevelSnapshot {
                    price,
                    quantity: level
                        .iter()
                        .filter_map(|id| self.order(id))
                        .map(|o| o.quantity)
                        .sum(),
                    orders: level.len(),
                })
                .collect()
        };
        BookSnapshot {
            bids: collect(Side::Buy),
            asks: collect(Side::Sell),
        }
    }
}
