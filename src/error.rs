//! Errors surfaced by order admission.

use std::fmt;

use crate::OrderId;

/// Errors returned by [`Engine::add_order`](crate::Engine::add_order) and
/// [`StopScheduler::add_stop`](crate::StopScheduler::add_stop).
///
/// Every error is local to the offending order; the engine never fails as
/// a whole because of one bad submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    /// Quantity must be greater than zero.
    InvalidQuantity,
    /// Price must be non-negative.
    InvalidPrice,
    /// An order with this id is already active.
    DuplicateId(OrderId),
    /// Stop orders are submitted through the stop scheduler, not order
    /// admission.
    StopViaScheduler,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidQuantity => write!(f, "quantity must be greater than zero"),
            EngineError::InvalidPrice => write!(f, "price must be non-negative"),
            EngineError::DuplicateId(id) => write!(f, "order {} is already active", id),
            EngineError::StopViaScheduler => {
                write!(f, "stop orders must be submitted via the stop scheduler")
            }
        }
    }
}

impl std::error::Error for EngineError {}
