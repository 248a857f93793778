//! Order representation and lifecycle

use crate::{Discipline, OrderId, Price, Quantity, Side};

/// An order: an immutable identity with a mutable residual quantity.
///
/// The residual (`quantity`) only ever decreases through matching, except
/// for an explicit modify which rewrites it. An order leaves the book the
/// instant its residual reaches zero.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    /// Unique identifier assigned by the caller
    pub id: OrderId,
    /// Buy or sell
    pub side: Side,
    /// Execution rule
    pub discipline: Discipline,
    /// Limit price. Ignored for matching by Market/IOC but retained for
    /// logging; informational after a stop promotion.
    pub price: Price,
    /// Trigger price, used only by the Stop discipline
    pub stop_price: Price,
    /// Unfilled residual
    pub quantity: Quantity,
    /// Quantity when the order was admitted
    pub original_quantity: Quantity,
}

impl Order {
    /// Create a new order with `quantity == original_quantity`.
    pub fn new(
        id: OrderId,
        side: Side,
        discipline: Discipline,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            side,
            discipline,
            price,
            stop_price: Price::ZERO,
            quantity,
            original_quantity: quantity,
        }
    }

    /// Create a stop order with the given trigger price.
    pub fn stop(
        id: OrderId,
        side: Side,
        price: Price,
        stop_price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            side,
            discipline: Discipline::Stop,
            price,
            stop_price,
            quantity,
            original_quantity: quantity,
        }
    }

    /// Returns true if the residual is exhausted.
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Returns the quantity filled so far.
    #[inline]
    pub fn filled_quantity(&self) -> Quantity {
        self.original_quantity - self.quantity
    }

    /// Decrement the residual by a fill.
    ///
    /// # Panics
    ///
    /// Panics if `quantity` exceeds the residual.
    pub fn fill(&mut self, quantity: Quantity) {
        assert!(
            quantity <= self.quantity,
            "fill quantity {} exceeds residual {}",
            quantity,
            self.quantity
        );
        self.quantity -= quantity;
    }
}
