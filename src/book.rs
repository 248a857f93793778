//! Book: the authoritative state — both sides plus the active-order index.
//!
//! Combines:
//! - Bids (buy orders) sorted high → low
//! - Asks (sell orders) sorted low → high
//! - An index from order id to the live order record for O(1) lookup by
//!   cancel/modify
//!
//! Only resting Limit orders are indexed; Market and IOC orders execute
//! and evaporate without ever entering the index. The engine guards the
//! whole structure with a single lock, so `Book` itself is plain data.

use log::warn;
use rustc_hash::FxHashMap;

use crate::{Order, OrderId, Price, Side, SideBook};

/// Both sides of the book and the active-order index.
#[derive(Clone, Debug)]
pub struct Book {
    bids: SideBook,
    asks: SideBook,
    /// Resting Limit orders by id
    orders: FxHashMap<OrderId, Order>,
}

impl Book {
    /// Create a new empty book.
    pub fn new() -> Self {
        Self {
            bids: SideBook::new(Side::Buy),
            asks: SideBook::new(Side::Sell),
            orders: FxHashMap::default(),
        }
    }

    // === Best-of-book ===

    /// Best bid price, or `Price::ZERO` when the bid side is empty.
    #[inline]
    pub fn best_bid(&self) -> Price {
        self.bids.best_price().unwrap_or(Price::ZERO)
    }

    /// Best ask price, or `Price::ZERO` when the ask side is empty.
    #[inline]
    pub fn best_ask(&self) -> Price {
        self.asks.best_price().unwrap_or(Price::ZERO)
    }

    /// Returns true if best bid >= best ask with both sides populated.
    /// Transient while queued orders are being drained; never true at
    /// quiescence.
    pub fn is_crossed(&self) -> bool {
        match (self.bids.best_price(), self.asks.best_price()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    // === Side access ===

    /// The side book holding orders of `side`.
    pub fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// The side book an order of `side` would match against.
    pub fn opposite(&self, side: Side) -> &SideBook {
        self.side(side.opposite())
    }

    pub(crate) fn opposite_mut(&mut self, side: Side) -> &mut SideBook {
        self.side_mut(side.opposite())
    }

    // === Index access ===

    /// Look up a resting order.
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub(crate) fn order_mut(&mut self, order_id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(&order_id)
    }

    /// Returns true if `order_id` is resting on the book.
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Number of resting orders.
    pub fn active_count(&self) -> usize {
        self.orders.len()
    }

    // === Mutation ===

    /// Insert a resting Limit order at the tail of its price level and
    /// index it.
    ///
    /// The caller must have established that the id is not already active
    /// and that the residual is positive.
    pub fn insert(&mut self, order: Order) {
        debug_assert!(
            !self.orders.contains_key(&order.id),
            "order {} already active",
            order.id
        );
        debug_assert!(order.quantity > 0, "resting order {} has no residual", order.id);

        let side = order.side;
        let price = order.price;
        let id = order.id;

        self.orders.insert(id, order);
        self.side_mut(side).push_order(price, id);
    }

    /// Remove a resting order from both the index and its price level.
    ///
    /// Returns the removed record, or `None` if the id is not active.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let order = self.orders.remove(&order_id)?;
        if !self.side_mut(order.side).remove_order(order.price, order_id) {
            // Index and side book disagree; keep going with the index as truth.
            warn!("order {} was indexed but missing from its price level", order_id);
        }
        Some(order)
    }

    /// Empty both sides and the index.
    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.orders.clear();
    }

    /// Verify the index ↔ side-book cross-invariants.
    ///
    /// Debugging and test support; panics on the first violation.
    pub fn check_consistency(&self) {
        for (id, order) in &self.orders {
            let level = self
                .side(order.side)
                .level(order.price)
                .unwrap_or_else(|| panic!("order {} indexed but level {} missing", id, order.price));
            assert_eq!(
                level.iter().filter(|lid| lid == id).count(),
                1,
                "order {} must appear exactly once in its level",
                id
            );
            assert!(order.quantity > 0, "resting order {} has zero residual", id);
        }
        for side in [Side::Buy, Side::Sell] {
            for (price, level) in self.side(side).iter_best_to_worst() {
                assert!(!level.is_empty(), "empty level {} not removed", price);
                for id in level.iter() {
                    let order = self
                        .order(id)
                        .unwrap_or_else(|| panic!("order {} in level {} but not indexed", id, price));
                    assert_eq!(order.price, price);
                    assert_eq!(order.side, side);
                }
            }
        }
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}
