//! SideBook: one side of the order book (all bids or all asks).
//!
//! A sorted map from price to [`Level`] with a cached best price for O(1)
//! best-of-book reads. Bids are best-first by highest price, asks by
//! lowest. Empty levels are removed eagerly, so a present level always
//! holds at least one order.

use std::collections::BTreeMap;

use crate::{Level, OrderId, Price, Side};

/// Price-indexed FIFO levels for a single side.
#[derive(Clone, Debug)]
pub struct SideBook {
    levels: BTreeMap<Price, Level>,
    /// Cached best price for O(1) access
    best_price: Option<Price>,
    side: Side,
}

impl SideBook {
    /// Create a new empty side.
    pub fn new(side: Side) -> Self {
        Self {
            levels: BTreeMap::new(),
            best_price: None,
            side,
        }
    }

    /// Which side this collection represents.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns true if no orders rest on this side.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of distinct price levels.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Best price (highest for bids, lowest for asks), or `None` if empty.
    #[inline]
    pub fn best_price(&self) -> Option<Price> {
        self.best_price
    }

    /// The order id at the head of the best level.
    pub fn best_front(&self) -> Option<OrderId> {
        self.best_price
            .and_then(|p| self.levels.get(&p))
            .and_then(|l| l.front())
    }

    /// Append an order at the tail of its price level, creating the level
    /// if needed.
    pub fn push_order(&mut self, price: Price, order_id: OrderId) {
        if !self.levels.contains_key(&price) {
            self.note_new_level(price);
            self.levels.insert(price, Level::new());
        }
        self.levels
            .get_mut(&price)
            .expect("level just ensured")
            .push_back(order_id);
    }

    /// Remove a specific order from its price level.
    ///
    /// Returns `true` if the order was found. Deletes the level if it
    /// becomes empty.
    pub fn remove_order(&mut self, price: Price, order_id: OrderId) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.remove(order_id) {
                if level.is_empty() {
                    self.remove_level(price);
                }
                return true;
            }
        }
        false
    }

    /// Pop the head order of the best level, deleting the level if that
    /// empties it.
    pub fn pop_best_front(&mut self) -> Option<OrderId> {
        let price = self.best_price?;
        let level = self.levels.get_mut(&price)?;
        let id = level.pop_front();
        if level.is_empty() {
            self.remove_level(price);
        }
        id
    }

    /// Access the level at `price`, if any.
    pub fn level(&self, price: Price) -> Option<&Level> {
        self.levels.get(&price)
    }

    /// Iterate over levels from best to worst price.
    pub fn iter_best_to_worst<'a>(&'a self) -> Box<dyn Iterator<Item = (Price, &'a Level)> + 'a> {
        match self.side {
            Side::Buy => Box::new(self.levels.iter().rev().map(|(p, l)| (*p, l))),
            Side::Sell => Box::new(self.levels.iter().map(|(p, l)| (*p, l))),
        }
    }

    /// Remove every level.
    pub fn clear(&mut self) {
        self.levels.clear();
        self.best_price = None;
    }

    fn remove_level(&mut self, price: Price) {
        if self.levels.remove(&price).is_some() && self.best_price == Some(price) {
            self.best_price = match self.side {
                Side::Buy => self.levels.keys().next_back().copied(),
                Side::Sell => self.levels.keys().next().copied(),
            };
        }
    }

    fn note_new_level(&mut self, new_price: Price) {
        let is_better = match (self.best_price, self.side) {
            (None, _) => true,
            (Some(best), Side::Buy) => new_price > best,
            (Some(best), Side::Sell) => new_price < best,
        };
        if is_better {
            self.best_price = Some(new_price);
        }
    }
}
